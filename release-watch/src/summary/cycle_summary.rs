//! Cycle summary types.

use super::result::ReleaseOutcome;

/// Summary of one fetch-classify-notify-persist cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Whether the fetch failed and the cycle was skipped.
    pub fetch_failed: bool,

    /// Number of releases returned by the fetch.
    pub releases_fetched: usize,

    /// Number of those not yet in the seen set.
    pub releases_unseen: usize,

    /// Number of alerts delivered.
    pub notified: usize,

    /// Number of alerts that failed to deliver.
    pub failed: usize,

    /// Number of delivered alerts carrying a fallback classification.
    pub degraded: usize,

    /// Number of times writing the seen set failed.
    pub persist_failures: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl CycleSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ReleaseOutcome) {
        match result {
            ReleaseOutcome::Notified { degraded, .. } => {
                self.notified += 1;
                if *degraded {
                    self.degraded += 1;
                }
            }
            ReleaseOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.fetch_failed || self.failed > 0 || self.persist_failures > 0
    }
}
