//! Notification text rendering using Handlebars.
//!
//! The message body is a Handlebars template so teams can restyle alerts
//! without a rebuild. Header and fallback text are fixed formats.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

use crate::classify::{Classification, Severity};
use crate::releases::Release;

/// Built-in message template, Slack mrkdwn flavoured.
///
/// Text fields arrive already escaped with [`escape_mrkdwn`]; `url` is left
/// raw so it can be used as a link target.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "\
{{badge}} *{{repository}} {{title}}*{{#if prerelease}} (pre-release){{/if}}
*Status:* {{status}}
*Severity:* {{severity}}{{#if degraded}} (classification unavailable){{/if}}
*Why it matters:* {{rationale}}
{{#if components}}*Affected components:* {{components}}
{{/if}}<{{url}}|View release notes>";

/// Escapes the characters Slack mrkdwn treats as control sequences.
///
/// Without this a `<` in a release title or rationale can swallow the
/// `<url|text>` link that follows it.
#[must_use]
pub fn escape_mrkdwn(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Returns the emoji shortcode shown in front of an alert.
#[must_use]
pub fn severity_badge(classification: &Classification) -> &'static str {
    if classification.degraded {
        return ":grey_question:";
    }
    match classification.severity {
        Severity::Breaking => ":warning:",
        Severity::PotentiallyBreaking => ":large_orange_diamond:",
        Severity::Informational => ":information_source:",
    }
}

/// Returns the status line, marking fallback verdicts distinctly.
#[must_use]
pub fn status_line(classification: &Classification) -> &'static str {
    if classification.degraded {
        "Classification unavailable"
    } else {
        classification.severity.status()
    }
}

/// Generates the header line of an alert.
///
/// Format: "{badge} {repository} release: {title}"
#[must_use]
pub fn generate_header(
    repository: &str,
    release: &Release,
    classification: &Classification,
) -> String {
    format!(
        "{} {} release: {}",
        severity_badge(classification),
        repository,
        release.title
    )
}

/// Generates the plain fallback text used by clients that cannot show blocks.
///
/// Format: "New {repository} release: {title} [{severity}]"
#[must_use]
pub fn generate_fallback_text(
    repository: &str,
    release: &Release,
    classification: &Classification,
) -> String {
    format!(
        "New {} release: {} [{}]",
        repository,
        escape_mrkdwn(&release.title),
        status_line(classification)
    )
}
