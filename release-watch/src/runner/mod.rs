//! Orchestrates the polling loop.

mod config;
mod cycle;
mod error;

pub use config::{
    ConfigOverrides, RunnerConfig, DEFAULT_FETCH_COUNT, DEFAULT_INTERVAL_SECS, DEFAULT_STATE_FILE,
    MAX_FETCH_COUNT,
};
pub use cycle::{filter_unseen, run_cycle, CycleOptions};
pub use error::RunnerError;

use crate::classify::{Classifier, SeverityClassifier};
use crate::llm::SerdesAiCompletion;
use crate::notify::{ConsoleNotifier, Notifier, WebhookNotifier};
use crate::releases::{GitHubReleases, ReleaseSource};
use crate::store::SeenStore;
use crate::summary::CycleSummary;
use crate::templates::TemplateRenderer;
use octocrab::Octocrab;
use std::future::Future;
use tracing::{info, info_span, warn, Instrument};

/// Runs cycles on a fixed interval until shut down.
pub struct Runner {
    config: RunnerConfig,
    source: Box<dyn ReleaseSource>,
    classifier: Box<dyn Classifier>,
    notifier: Box<dyn Notifier>,
    store: SeenStore,
}

impl Runner {
    /// Builds a runner talking to GitHub, the configured model and the webhook.
    ///
    /// Dry runs print alerts to stdout instead of posting them.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if a client cannot be built, the model
    /// credential is missing or the message template does not compile.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let octocrab = Octocrab::builder()
            .personal_token(config.github_token().to_string())
            .build()?;
        let repository = config.repository().full_name();

        let completion = SerdesAiCompletion::from_config(config.llm())?;
        let classifier = SeverityClassifier::new(completion, repository.clone());

        let renderer = match config.message_template() {
            Some(template) => TemplateRenderer::new(template)?,
            None => TemplateRenderer::with_default_template()?,
        };
        let notifier: Box<dyn Notifier> = match config.webhook_url() {
            Some(url) if !config.dry_run() => Box::new(WebhookNotifier::new(
                url.clone(),
                repository.clone(),
                renderer,
            )?),
            _ => Box::new(ConsoleNotifier::new(repository, renderer)),
        };

        let source = GitHubReleases::new(octocrab, config.repository().clone());
        Ok(Self::with_components(
            config,
            Box::new(source),
            Box::new(classifier),
            notifier,
        ))
    }

    /// Builds a runner from already constructed components.
    pub fn with_components(
        config: RunnerConfig,
        source: Box<dyn ReleaseSource>,
        classifier: Box<dyn Classifier>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let store = SeenStore::new(config.state_file());
        Self {
            config,
            source,
            classifier,
            notifier,
            store,
        }
    }

    /// Returns the runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs a single cycle.
    pub async fn run_once(&self) -> CycleSummary {
        let span = info_span!("cycle", repo = %self.config.repository());
        let options = CycleOptions {
            fetch_count: self.config.fetch_count(),
            dry_run: self.config.dry_run(),
        };
        let summary = run_cycle(
            self.source.as_ref(),
            self.classifier.as_ref(),
            self.notifier.as_ref(),
            &self.store,
            options,
        )
        .instrument(span)
        .await;
        log_summary(&summary);
        summary
    }

    /// Runs cycles until `shutdown` resolves, or once when so configured.
    ///
    /// Shutdown is honoured both mid-cycle and while sleeping. Returns the
    /// summary of the last completed cycle.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Option<CycleSummary> {
        tokio::pin!(shutdown);
        info!(
            repo = %self.config.repository(),
            interval_secs = self.config.interval().as_secs(),
            state_file = %self.config.state_file().display(),
            dry_run = self.config.dry_run(),
            "Starting release watch"
        );

        let mut last = None;
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    return last;
                }
                summary = self.run_once() => last = Some(summary),
            }

            if self.config.once() {
                return last;
            }

            info!(
                secs = self.config.interval().as_secs(),
                "Sleeping until next cycle"
            );
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    return last;
                }
                () = tokio::time::sleep(self.config.interval()) => {}
            }
        }
    }
}

fn log_summary(summary: &CycleSummary) {
    if summary.has_failures() {
        warn!(
            fetched = summary.releases_fetched,
            unseen = summary.releases_unseen,
            notified = summary.notified,
            failed = summary.failed,
            persist_failures = summary.persist_failures,
            fetch_failed = summary.fetch_failed,
            "Cycle finished with failures"
        );
    } else {
        info!(
            fetched = summary.releases_fetched,
            unseen = summary.releases_unseen,
            notified = summary.notified,
            degraded = summary.degraded,
            "Cycle finished"
        );
    }
}
