//! Severity tiers and classification results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Breaking-change severity of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Operators must act before or while upgrading.
    Breaking,

    /// May affect existing setups.
    PotentiallyBreaking,

    /// Safe to pick up at leisure.
    Informational,
}

impl Severity {
    /// Returns the machine label used in prompts and templates.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breaking => "breaking",
            Self::PotentiallyBreaking => "potentially-breaking",
            Self::Informational => "informational",
        }
    }

    /// Returns the status line shown in notifications.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Breaking => "BREAKING CHANGE DETECTED",
            Self::PotentiallyBreaking => "Potentially breaking change",
            Self::Informational => "Informational update",
        }
    }

    /// Parses a label from a model response.
    ///
    /// Accepts the tier names in any case with `-`, `_` or space separators,
    /// plus the `high`/`medium`/`low` scale older prompts used.
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "breaking" | "high" => Some(Self::Breaking),
            "potentially-breaking" | "medium" => Some(Self::PotentiallyBreaking),
            "informational" | "low" => Some(Self::Informational),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity verdict for one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Assigned tier.
    pub severity: Severity,

    /// Short explanation of the verdict.
    pub rationale: String,

    /// Components the model called out, possibly empty.
    pub affected_components: Vec<String>,

    /// True when the model could not be used and the tier is a fallback.
    pub degraded: bool,
}

impl Classification {
    /// Fallback used when the model fails or its answer cannot be parsed.
    #[must_use]
    pub fn unavailable(reason: impl fmt::Display) -> Self {
        Self {
            severity: Severity::Informational,
            rationale: format!("Classification unavailable: {reason}"),
            affected_components: Vec::new(),
            degraded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_accepts_tier_names() {
        assert_eq!(Severity::from_label("BREAKING"), Some(Severity::Breaking));
        assert_eq!(
            Severity::from_label("Potentially Breaking"),
            Some(Severity::PotentiallyBreaking)
        );
        assert_eq!(
            Severity::from_label("potentially_breaking"),
            Some(Severity::PotentiallyBreaking)
        );
        assert_eq!(
            Severity::from_label(" informational "),
            Some(Severity::Informational)
        );
    }

    #[test]
    fn from_label_accepts_legacy_scale() {
        assert_eq!(Severity::from_label("high"), Some(Severity::Breaking));
        assert_eq!(
            Severity::from_label("medium"),
            Some(Severity::PotentiallyBreaking)
        );
        assert_eq!(Severity::from_label("low"), Some(Severity::Informational));
    }

    #[test]
    fn from_label_rejects_unknown() {
        assert_eq!(Severity::from_label("critical"), None);
        assert_eq!(Severity::from_label(""), None);
    }

    #[test]
    fn unavailable_is_degraded_informational() {
        let classification = Classification::unavailable("timeout");
        assert_eq!(classification.severity, Severity::Informational);
        assert!(classification.degraded);
        assert_eq!(classification.rationale, "Classification unavailable: timeout");
    }
}
