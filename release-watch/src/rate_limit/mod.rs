//! Rate limiting utilities for GitHub API.
//!
//! The watcher never sleeps inside a cycle waiting for the limit to reset.
//! Instead callers check the core limit up front and skip the cycle when it
//! is exhausted.

mod info;

pub use info::RateLimitInfo;

use octocrab::Octocrab;

/// Checks the current rate limit status for core API (releases, repos, etc.).
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Current Unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
