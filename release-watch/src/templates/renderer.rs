//! Template renderer.

use crate::classify::Classification;
use crate::releases::Release;
use crate::templates::{escape_mrkdwn, severity_badge, status_line};
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::json;

const MESSAGE_TEMPLATE_NAME: &str = "message";

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for chat markup output)
/// - Strict mode (catches missing variables)
/// - `eq` helper for equality comparisons
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping; webhooks take raw mrkdwn
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    // Register the eq helper for conditionals
    hbs.register_helper("eq", Box::new(eq_helper));

    hbs
}

/// Helper function for equality comparison in templates.
///
/// Usage: `{{#if (eq severity "breaking")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

/// Renders notification messages from a registered template.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer for the given message template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not compile.
    pub fn new(message_template: &str) -> Result<Self, super::TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(MESSAGE_TEMPLATE_NAME, message_template)?;
        Ok(Self { handlebars })
    }

    /// Creates a renderer for [`DEFAULT_MESSAGE_TEMPLATE`](super::DEFAULT_MESSAGE_TEMPLATE).
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in template does not compile.
    pub fn with_default_template() -> Result<Self, super::TemplateError> {
        Self::new(super::DEFAULT_MESSAGE_TEMPLATE)
    }

    /// Renders the message body for a classified release.
    ///
    /// Text fields are passed through [`escape_mrkdwn`]; `url` is not.
    ///
    /// # Arguments
    ///
    /// * `repository` - Monitored repository in `owner/name` form
    /// * `release` - The release being announced
    /// * `classification` - Its severity verdict
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_message(
        &self,
        repository: &str,
        release: &Release,
        classification: &Classification,
    ) -> Result<String, super::TemplateError> {
        let data = json!({
            "repository": escape_mrkdwn(repository),
            "id": release.id,
            "title": escape_mrkdwn(&release.title),
            "tag": escape_mrkdwn(&release.tag),
            "url": release.url,
            "notes": escape_mrkdwn(&release.notes),
            "prerelease": release.prerelease,
            "published_at": release
                .published_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
            "badge": severity_badge(classification),
            "status": status_line(classification),
            "severity": classification.severity.as_str(),
            "rationale": escape_mrkdwn(&classification.rationale),
            "components": escape_mrkdwn(&classification.affected_components.join(", ")),
            "degraded": classification.degraded
        });

        Ok(self.handlebars.render(MESSAGE_TEMPLATE_NAME, &data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Severity;

    fn sample_release() -> Release {
        Release {
            id: "42".to_string(),
            tag: "v1.14.0".to_string(),
            title: "v1.14.0".to_string(),
            notes: "Hard fork: new consensus rules".to_string(),
            url: "https://github.com/ethereum/go-ethereum/releases/tag/v1.14.0".to_string(),
            published_at: None,
            prerelease: false,
        }
    }

    fn classification(severity: Severity, components: &[&str]) -> Classification {
        Classification {
            severity,
            rationale: "Consensus rule change".to_string(),
            affected_components: components.iter().map(|c| c.to_string()).collect(),
            degraded: false,
        }
    }

    #[test]
    fn test_render_default_template() {
        let renderer = TemplateRenderer::with_default_template().unwrap();
        let message = renderer
            .render_message(
                "ethereum/go-ethereum",
                &sample_release(),
                &classification(Severity::Breaking, &["consensus", "rpc"]),
            )
            .unwrap();

        assert_eq!(
            message,
            ":warning: *ethereum/go-ethereum v1.14.0*\n\
*Status:* BREAKING CHANGE DETECTED\n\
*Severity:* breaking\n\
*Why it matters:* Consensus rule change\n\
*Affected components:* consensus, rpc\n\
<https://github.com/ethereum/go-ethereum/releases/tag/v1.14.0|View release notes>"
        );
    }

    #[test]
    fn test_render_default_template_degraded() {
        let renderer = TemplateRenderer::with_default_template().unwrap();
        let message = renderer
            .render_message(
                "ethereum/go-ethereum",
                &sample_release(),
                &Classification::unavailable("timeout"),
            )
            .unwrap();

        assert!(message.starts_with(":grey_question:"));
        assert!(message.contains("*Status:* Classification unavailable"));
        assert!(message.contains("*Severity:* informational (classification unavailable)"));
        assert!(!message.contains("Affected components"));
    }

    #[test]
    fn test_render_conditional_eq() {
        let renderer = TemplateRenderer::new(
            r#"{{#if (eq severity "breaking")}}Upgrade carefully{{else}}Routine{{/if}}"#,
        )
        .unwrap();

        let breaking = renderer
            .render_message("a/b", &sample_release(), &classification(Severity::Breaking, &[]))
            .unwrap();
        let routine = renderer
            .render_message(
                "a/b",
                &sample_release(),
                &classification(Severity::Informational, &[]),
            )
            .unwrap();

        assert_eq!(breaking, "Upgrade carefully");
        assert_eq!(routine, "Routine");
    }

    #[test]
    fn test_no_html_escaping() {
        let renderer = TemplateRenderer::new("{{title}}").unwrap();
        let mut release = sample_release();
        release.title = r#"The "Prague" release's fixes"#.to_string();

        let result = renderer
            .render_message("a/b", &release, &classification(Severity::Informational, &[]))
            .unwrap();

        assert_eq!(result, r#"The "Prague" release's fixes"#);
    }

    #[test]
    fn test_mrkdwn_control_characters_keep_link_intact() {
        let renderer = TemplateRenderer::with_default_template().unwrap();
        let mut release = sample_release();
        release.title = "v1.14.0 <rc & friends>".to_string();
        let mut classification = classification(Severity::Breaking, &["<p2p>"]);
        classification.rationale = "Peers < v1.13 disconnect".to_string();

        let message = renderer.render_message("a/b", &release, &classification).unwrap();

        assert!(message.contains("*a/b v1.14.0 &lt;rc &amp; friends&gt;*"));
        assert!(message.contains("*Why it matters:* Peers &lt; v1.13 disconnect"));
        assert!(message.contains("*Affected components:* &lt;p2p&gt;"));
        assert!(message.ends_with(
            "<https://github.com/ethereum/go-ethereum/releases/tag/v1.14.0|View release notes>"
        ));
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        assert!(TemplateRenderer::new("{{#if title}}unclosed").is_err());
    }

    #[test]
    fn test_strict_mode_rejects_unknown_variable() {
        let renderer = TemplateRenderer::new("{{no_such_field}}").unwrap();
        let result = renderer.render_message(
            "a/b",
            &sample_release(),
            &classification(Severity::Informational, &[]),
        );
        assert!(result.is_err());
    }
}
