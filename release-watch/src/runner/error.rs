//! Runner error types.

/// Fatal errors raised while setting up the watcher.
///
/// Once the loop is running nothing is fatal; failures are logged and the
/// next cycle retries.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading and validation errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Inference model or credential errors.
    #[error(transparent)]
    Llm(#[from] crate::llm::LlmError),

    /// Message template compilation errors.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Webhook client initialization errors.
    #[error(transparent)]
    Notify(#[from] crate::notify::NotifyError),
}
