//! Notification error types.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
///
/// Any of these leaves the release unseen so it is offered again next cycle.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Message rendering failed.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Transport-level HTTP failure.
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("Webhook returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The webhook did not answer in time.
    #[error("Webhook timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}
