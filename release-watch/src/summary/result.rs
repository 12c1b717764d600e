//! Per-release processing results.

use crate::classify::Severity;

/// Result of processing a single unseen release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Alert delivered and release marked seen.
    Notified {
        /// Release identifier.
        release_id: String,
        /// Severity that was announced.
        severity: Severity,
        /// Whether the severity was a fallback.
        degraded: bool,
    },

    /// Alert delivery failed; the release stays unseen.
    Failed {
        /// Release identifier.
        release_id: String,
        /// Error message.
        error: String,
    },
}
