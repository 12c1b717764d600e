//! One fetch-classify-notify-persist pass.

use crate::classify::Classifier;
use crate::notify::Notifier;
use crate::releases::{Release, ReleaseSource};
use crate::store::{SeenSet, SeenStore};
use crate::summary::{CycleSummary, ReleaseOutcome};
use tracing::{error, info, info_span, warn, Instrument};

/// Per-cycle knobs.
#[derive(Debug, Clone, Copy)]
pub struct CycleOptions {
    /// Releases requested from the source.
    pub fetch_count: u8,
    /// Skip writing the seen set.
    pub dry_run: bool,
}

/// Returns the releases whose ids are not in `seen`, keeping source order.
pub fn filter_unseen<'a>(releases: &'a [Release], seen: &SeenSet) -> Vec<&'a Release> {
    releases
        .iter()
        .filter(|release| !seen.contains(&release.id))
        .collect()
}

/// Runs a single cycle.
///
/// A fetch failure skips the cycle without touching the seen set. A release
/// is marked seen, and the set written out, only after its alert was
/// delivered, so delivery failures are retried on the next cycle.
pub async fn run_cycle(
    source: &dyn ReleaseSource,
    classifier: &dyn Classifier,
    notifier: &dyn Notifier,
    store: &SeenStore,
    options: CycleOptions,
) -> CycleSummary {
    let mut summary = CycleSummary::new(options.dry_run);
    let mut seen = store.load();

    let releases = match source.fetch_recent(options.fetch_count).await {
        Ok(releases) => releases,
        Err(e) => {
            warn!(error = %e, "Failed to fetch releases, skipping cycle");
            summary.fetch_failed = true;
            return summary;
        }
    };
    summary.releases_fetched = releases.len();

    let unseen = filter_unseen(&releases, &seen);
    summary.releases_unseen = unseen.len();
    if unseen.is_empty() {
        info!(fetched = releases.len(), "No new releases");
        return summary;
    }
    info!(count = unseen.len(), "Found new releases");

    for release in unseen {
        let span = info_span!("release", id = %release.id);
        let outcome = process_release(classifier, notifier, release)
            .instrument(span)
            .await;

        if matches!(outcome, ReleaseOutcome::Notified { .. }) {
            seen.insert(release.id.clone());
            if !options.dry_run {
                if let Err(e) = store.persist(&seen) {
                    error!(release_id = %release.id, error = %e, "Failed to persist seen releases");
                    summary.persist_failures += 1;
                }
            }
        }
        summary.record_result(&outcome);
    }

    summary
}

async fn process_release(
    classifier: &dyn Classifier,
    notifier: &dyn Notifier,
    release: &Release,
) -> ReleaseOutcome {
    let classification = classifier.classify(release).await;
    info!(
        tag = %release.tag,
        severity = %classification.severity,
        degraded = classification.degraded,
        "Classified release"
    );

    match notifier.notify(release, &classification).await {
        Ok(()) => ReleaseOutcome::Notified {
            release_id: release.id.clone(),
            severity: classification.severity,
            degraded: classification.degraded,
        },
        Err(e) => {
            error!(tag = %release.tag, error = %e, "Failed to deliver alert");
            ReleaseOutcome::Failed {
                release_id: release.id.clone(),
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(id: &str) -> Release {
        Release {
            id: id.to_string(),
            tag: id.to_string(),
            title: id.to_string(),
            notes: String::new(),
            url: format!("https://example.com/{id}"),
            published_at: None,
            prerelease: false,
        }
    }

    #[test]
    fn filter_unseen_keeps_order() {
        let releases: Vec<Release> = ["R5", "R4", "R3", "R2", "R1"]
            .into_iter()
            .map(release)
            .collect();
        let seen: SeenSet = ["R3", "R1"].into_iter().map(String::from).collect();

        let ids: Vec<&str> = filter_unseen(&releases, &seen)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();

        assert_eq!(ids, ["R5", "R4", "R2"]);
    }

    #[test]
    fn filter_unseen_with_empty_set_returns_everything() {
        let releases = vec![release("a"), release("b")];
        assert_eq!(filter_unseen(&releases, &SeenSet::new()).len(), 2);
    }

    #[test]
    fn filter_unseen_with_everything_seen_is_empty() {
        let releases = vec![release("a"), release("b")];
        let seen: SeenSet = ["a", "b", "c"].into_iter().map(String::from).collect();
        assert!(filter_unseen(&releases, &seen).is_empty());
    }
}
