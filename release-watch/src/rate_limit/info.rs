//! Rate limit information.

/// Requests that must remain in the window for a fetch to go ahead.
const MIN_REMAINING_THRESHOLD: u32 = 1;

/// Rate limit information for a specific resource.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Returns true if no request can be made before `reset`.
    ///
    /// A window whose reset time has already passed is never exhausted, since
    /// GitHub will have refilled it by the time the request lands.
    #[must_use]
    pub fn is_exhausted(&self, now: u64) -> bool {
        self.remaining < MIN_REMAINING_THRESHOLD && self.reset > now
    }

    /// Seconds until the window resets, zero if it already has.
    #[must_use]
    pub fn seconds_until_reset(&self, now: u64) -> u64 {
        self.reset.saturating_sub(now)
    }
}
