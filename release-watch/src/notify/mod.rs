//! Alert delivery.
//!
//! [`WebhookNotifier`] posts Slack-compatible JSON to an incoming webhook.
//! [`ConsoleNotifier`] prints the same message to stdout and is used for dry
//! runs.

mod error;

pub use error::NotifyError;

use crate::classify::{truncate_chars, Classification};
use crate::releases::Release;
use crate::templates::{generate_fallback_text, generate_header, TemplateRenderer};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, info_span, Instrument};
use url::Url;

const NOTIFY_TIMEOUT_SECS: u64 = 15;

/// Slack limits for header and section text.
const MAX_HEADER_CHARS: usize = 150;
const MAX_SECTION_CHARS: usize = 3000;

/// Longest response body kept in a [`NotifyError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Delivers one alert per classified release.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the alert for `release`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the alert was not delivered.
    async fn notify(
        &self,
        release: &Release,
        classification: &Classification,
    ) -> Result<(), NotifyError>;
}

/// Posts alerts to a chat incoming webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: Url,
    repository: String,
    renderer: TemplateRenderer,
    timeout: Duration,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `webhook_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        webhook_url: Url,
        repository: impl Into<String>,
        renderer: TemplateRenderer,
    ) -> Result<Self, NotifyError> {
        Self::with_timeout(
            webhook_url,
            repository,
            renderer,
            Duration::from_secs(NOTIFY_TIMEOUT_SECS),
        )
    }

    /// Creates a notifier with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(
        webhook_url: Url,
        repository: impl Into<String>,
        renderer: TemplateRenderer,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            webhook_url,
            repository: repository.into(),
            renderer,
            timeout,
        })
    }

    /// Builds the JSON payload for an alert.
    fn build_payload(
        &self,
        release: &Release,
        classification: &Classification,
    ) -> Result<Value, NotifyError> {
        let body = self
            .renderer
            .render_message(&self.repository, release, classification)?;
        let header = generate_header(&self.repository, release, classification);

        Ok(json!({
            "text": generate_fallback_text(&self.repository, release, classification),
            "blocks": [
                {
                    "type": "header",
                    "text": {
                        "type": "plain_text",
                        "text": truncate_chars(&header, MAX_HEADER_CHARS),
                        "emoji": true
                    }
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": truncate_chars(&body, MAX_SECTION_CHARS)
                    }
                }
            ]
        }))
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        release: &Release,
        classification: &Classification,
    ) -> Result<(), NotifyError> {
        let span = info_span!(
            "notify",
            release_id = %release.id,
            tag = %release.tag,
            severity = %classification.severity
        );

        async {
            let payload = self.build_payload(release, classification)?;

            let response = self
                .client
                .post(self.webhook_url.clone())
                .json(&payload)
                .send()
                .await
                .map_err(|e| self.map_transport_error(e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(NotifyError::Status {
                    status: status.as_u16(),
                    body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
                });
            }

            info!("Webhook notification sent");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

impl WebhookNotifier {
    fn map_transport_error(&self, error: reqwest::Error) -> NotifyError {
        if error.is_timeout() {
            NotifyError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            NotifyError::Http(error)
        }
    }
}

/// Prints alerts to stdout instead of sending them.
pub struct ConsoleNotifier {
    repository: String,
    renderer: TemplateRenderer,
}

impl ConsoleNotifier {
    /// Creates a console notifier.
    pub fn new(repository: impl Into<String>, renderer: TemplateRenderer) -> Self {
        Self {
            repository: repository.into(),
            renderer,
        }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(
        &self,
        release: &Release,
        classification: &Classification,
    ) -> Result<(), NotifyError> {
        let body = self
            .renderer
            .render_message(&self.repository, release, classification)?;
        let rule = "=".repeat(60);

        println!("\n{rule}");
        println!("{}", generate_header(&self.repository, release, classification));
        println!("{rule}");
        println!("{body}");
        println!("{rule}\n");

        Ok(())
    }
}
