//! Release fetching error types.

use thiserror::Error;

/// Errors that can occur while fetching releases.
///
/// All of these are retryable: the cycle is skipped and the fetch is
/// attempted again after the next sleep.
#[derive(Debug, Error)]
pub enum FetchError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, reset at {reset_at}")]
    RateLimitExceeded { reset_at: u64 },

    /// The request did not complete in time.
    #[error("Fetching releases timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}
