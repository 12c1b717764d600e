//! Model response parsing.

use crate::classify::{truncate_chars, Classification, Severity};
use serde::Deserialize;

/// Longest rationale kept from a free-form answer.
const MAX_RATIONALE_CHARS: usize = 600;

/// JSON object the prompt asks for.
#[derive(Debug, Deserialize)]
struct Verdict {
    severity: String,
    #[serde(default, alias = "rationale")]
    reason: Option<String>,
    #[serde(default)]
    affected_components: Vec<String>,
}

/// Maps a model response to a classification.
///
/// Returns `None` when the response names no tier, names more than one, or
/// is a JSON verdict with an unknown severity. Callers fall back to
/// [`Classification::unavailable`].
pub(crate) fn parse_response(response: &str) -> Option<Classification> {
    let body = strip_code_fences(response);
    if body.is_empty() {
        return None;
    }

    let verdict = json_object(body).and_then(|json| serde_json::from_str::<Verdict>(json).ok());
    if let Some(verdict) = verdict {
        return classification_from_verdict(verdict);
    }

    let severity = scan_for_label(body)?;
    Some(Classification {
        severity,
        rationale: truncate_chars(&collapse_whitespace(body), MAX_RATIONALE_CHARS),
        affected_components: Vec::new(),
        degraded: false,
    })
}

fn classification_from_verdict(verdict: Verdict) -> Option<Classification> {
    let severity = Severity::from_label(&verdict.severity)?;
    let rationale = verdict
        .reason
        .map(|reason| collapse_whitespace(&reason))
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| "No rationale provided".to_string());

    Some(Classification {
        severity,
        rationale: truncate_chars(&rationale, MAX_RATIONALE_CHARS),
        affected_components: verdict
            .affected_components
            .into_iter()
            .map(|component| component.trim().to_string())
            .filter(|component| !component.is_empty())
            .collect(),
        degraded: false,
    })
}

/// Removes a surrounding Markdown code fence, if any.
///
/// The fence may span lines or sit on one line, as in ```` ```json {...}``` ````.
fn strip_code_fences(response: &str) -> &str {
    let mut body = response.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.split_once('\n') {
            Some((info, content)) if is_info_string(info) => content,
            _ => strip_json_tag(rest),
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// True for an opening fence line holding only a language tag, or nothing.
fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Drops a leading `json` language tag.
fn strip_json_tag(body: &str) -> &str {
    match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    }
}

/// Returns the outermost `{...}` span of `body`, if any.
fn json_object(body: &str) -> Option<&str> {
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

/// Finds the single severity tier named in free-form text.
///
/// "non-breaking" and "not breaking" do not count as the breaking tier.
fn scan_for_label(text: &str) -> Option<Severity> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .map(|token| token.trim_matches(|c| c == '-' || c == '_'))
        .filter(|token| !token.is_empty())
        .collect();

    let mut found: Vec<Severity> = Vec::new();
    let mut index = 0;
    while index < tokens.len() {
        let previous = index.checked_sub(1).map(|i| tokens[i]);
        let next = tokens.get(index + 1).copied();
        let token = tokens[index];

        let matched = match token {
            "potentially-breaking" | "potentially_breaking" => Some(Severity::PotentiallyBreaking),
            "potentially" if next == Some("breaking") => {
                index += 1;
                Some(Severity::PotentiallyBreaking)
            }
            "breaking" if !matches!(previous, Some("non" | "not")) => Some(Severity::Breaking),
            "informational" => Some(Severity::Informational),
            _ => None,
        };

        if let Some(severity) = matched {
            if !found.contains(&severity) {
                found.push(severity);
            }
        }
        index += 1;
    }

    match found.as_slice() {
        [severity] => Some(*severity),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_verdict() {
        let response = r#"{
  "severity": "breaking",
  "reason": "Hard fork activating new consensus rules.",
  "affected_components": ["consensus", "p2p"]
}"#;

        let classification = parse_response(response).unwrap();
        assert_eq!(classification.severity, Severity::Breaking);
        assert_eq!(
            classification.rationale,
            "Hard fork activating new consensus rules."
        );
        assert_eq!(classification.affected_components, ["consensus", "p2p"]);
        assert!(!classification.degraded);
    }

    #[test]
    fn parses_fenced_json_with_legacy_severity() {
        let response = "```json\n{\"is_breaking\": true, \"severity\": \"medium\", \"reason\": \"Deprecates a flag\", \"affected_components\": []}\n```";

        let classification = parse_response(response).unwrap();
        assert_eq!(classification.severity, Severity::PotentiallyBreaking);
        assert_eq!(classification.rationale, "Deprecates a flag");
    }

    #[test]
    fn parses_single_line_fenced_json() {
        let response = "```json {\"severity\": \"breaking\", \"reason\": \"Removes eth_sign\"} ```";

        let classification = parse_response(response).unwrap();
        assert_eq!(classification.severity, Severity::Breaking);
        assert_eq!(classification.rationale, "Removes eth_sign");
    }

    #[test]
    fn parses_fence_without_language_tag() {
        assert_eq!(
            strip_code_fences("```\n{\"severity\": \"low\"}\n```"),
            "{\"severity\": \"low\"}"
        );
        assert_eq!(
            strip_code_fences("```{\"severity\": \"low\"}```"),
            "{\"severity\": \"low\"}"
        );
        assert_eq!(
            strip_code_fences("```JSON{\"severity\": \"low\"}```"),
            "{\"severity\": \"low\"}"
        );
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let response = "Here is my analysis:\n{\"severity\": \"informational\", \"reason\": \"Bug fixes only\"}\nThanks!";

        let classification = parse_response(response).unwrap();
        assert_eq!(classification.severity, Severity::Informational);
        assert_eq!(classification.rationale, "Bug fixes only");
    }

    #[test]
    fn json_with_unknown_severity_is_unparseable() {
        let response = r#"{"severity": "critical", "reason": "Breaking RPC change"}"#;
        assert!(parse_response(response).is_none());
    }

    #[test]
    fn json_without_reason_gets_placeholder() {
        let classification = parse_response(r#"{"severity": "low"}"#).unwrap();
        assert_eq!(classification.rationale, "No rationale provided");
    }

    #[test]
    fn scans_free_text_for_single_label() {
        let response = "Severity: BREAKING\nThe release removes the eth_sign RPC endpoint.";

        let classification = parse_response(response).unwrap();
        assert_eq!(classification.severity, Severity::Breaking);
        assert_eq!(
            classification.rationale,
            "Severity: BREAKING The release removes the eth_sign RPC endpoint."
        );
    }

    #[test]
    fn potentially_breaking_is_not_read_as_breaking() {
        let response = "This is potentially breaking because the --cache flag is deprecated.";
        assert_eq!(
            parse_response(response).unwrap().severity,
            Severity::PotentiallyBreaking
        );
    }

    #[test]
    fn non_breaking_is_not_a_label() {
        let response = "Informational: a non-breaking bug fix release.";
        assert_eq!(
            parse_response(response).unwrap().severity,
            Severity::Informational
        );
    }

    #[test]
    fn multiple_labels_are_ambiguous() {
        let response = "Could be breaking, could be informational.";
        assert!(parse_response(response).is_none());
    }

    #[test]
    fn response_without_labels_is_unparseable() {
        assert!(parse_response("I am not sure what this release does.").is_none());
        assert!(parse_response("   ").is_none());
        assert!(parse_response("```\n```").is_none());
    }

    #[test]
    fn long_rationale_is_truncated() {
        let response = format!("breaking {}", "word ".repeat(400));
        let classification = parse_response(&response).unwrap();
        assert!(classification.rationale.chars().count() <= MAX_RATIONALE_CHARS + 1);
        assert!(classification.rationale.ends_with('…'));
    }
}
