#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod classify;
pub mod config;
pub(crate) mod llm;
pub mod notify;
pub mod rate_limit;
pub mod releases;
pub mod runner;
pub mod store;
pub mod summary;
pub mod templates;

pub use classify::{Classification, Classifier, Severity, SeverityClassifier};
pub use config::{ConfigError, ConfigFile, RepositorySlug};
pub use llm::{Completion, LlmError};
pub use notify::{ConsoleNotifier, Notifier, NotifyError, WebhookNotifier};
pub use rate_limit::{check_core_rate_limit, RateLimitInfo};
pub use releases::{FetchError, GitHubReleases, Release, ReleaseSource};
pub use runner::{ConfigOverrides, Runner, RunnerConfig, RunnerError};
pub use store::{SeenSet, SeenStore, StoreError};
pub use summary::{CycleSummary, ReleaseOutcome};
pub use templates::{TemplateError, TemplateRenderer};
