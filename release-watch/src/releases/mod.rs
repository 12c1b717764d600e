//! Release fetching from the GitHub Releases API.
//!
//! This module lists the most recent releases of the monitored repository,
//! newest first, after checking that the core rate limit still has capacity.

mod error;
mod release;

pub use error::FetchError;
pub use release::Release;

use crate::config::RepositorySlug;
use crate::rate_limit::{check_core_rate_limit, unix_now};
use async_trait::async_trait;
use octocrab::Octocrab;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

/// Upper bound for a single fetch, rate limit check included.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// A source of recent releases, newest first.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches up to `count` of the most recent releases, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network, auth, rate limit or timeout failures.
    async fn fetch_recent(&self, count: u8) -> Result<Vec<Release>, FetchError>;
}

/// Fetches releases of a single repository through octocrab.
pub struct GitHubReleases {
    octocrab: Octocrab,
    repository: RepositorySlug,
}

impl GitHubReleases {
    /// Creates a fetcher for `repository`.
    #[must_use]
    pub fn new(octocrab: Octocrab, repository: RepositorySlug) -> Self {
        Self {
            octocrab,
            repository,
        }
    }

    /// Returns the monitored repository.
    #[must_use]
    pub fn repository(&self) -> &RepositorySlug {
        &self.repository
    }

    async fn list_releases(&self, count: u8) -> Result<Vec<Release>, FetchError> {
        let rate_limit = check_core_rate_limit(&self.octocrab).await?;
        let now = unix_now();
        if rate_limit.is_exhausted(now) {
            warn!(
                remaining = rate_limit.remaining,
                reset_in_secs = rate_limit.seconds_until_reset(now),
                "Core rate limit exhausted"
            );
            return Err(FetchError::RateLimitExceeded {
                reset_at: rate_limit.reset,
            });
        }

        debug!(count, "Listing releases");
        let page = self
            .octocrab
            .repos(&self.repository.owner, &self.repository.name)
            .releases()
            .list()
            .per_page(count)
            .page(1u32)
            .send()
            .await?;

        Ok(page
            .items
            .into_iter()
            .filter_map(Release::from_github)
            .take(usize::from(count))
            .collect())
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    async fn fetch_recent(&self, count: u8) -> Result<Vec<Release>, FetchError> {
        let span = info_span!("fetch_releases", repo = %self.repository);

        async {
            let releases = tokio::time::timeout(
                Duration::from_secs(FETCH_TIMEOUT_SECS),
                self.list_releases(count),
            )
            .await
            .map_err(|_| FetchError::Timeout {
                timeout_secs: FETCH_TIMEOUT_SECS,
            })??;

            info!(count = releases.len(), "Fetched releases");
            Ok(releases)
        }
        .instrument(span)
        .await
    }
}
