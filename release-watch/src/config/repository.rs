//! Upstream repository identifier.

use crate::config::ConfigError;
use std::fmt;
use std::str::FromStr;

/// An `owner/name` pair identifying the monitored GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositorySlug {
    /// Returns the slug in `owner/name` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositorySlug {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ConfigError::ValidationError {
            setting: "repository".to_string(),
            message: format!("'{value}' {message}"),
        };

        let (owner, name) = value
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid("must be in owner/name form"))?;

        for part in [owner, name] {
            if part.is_empty() {
                return Err(invalid("has an empty owner or name"));
            }
            if !part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            {
                return Err(invalid("contains characters GitHub does not allow"));
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let slug: RepositorySlug = "ethereum/go-ethereum".parse().unwrap();
        assert_eq!(slug.owner, "ethereum");
        assert_eq!(slug.name, "go-ethereum");
        assert_eq!(slug.full_name(), "ethereum/go-ethereum");
        assert_eq!(slug.to_string(), "ethereum/go-ethereum");
    }

    #[test]
    fn rejects_missing_separator() {
        let result = "go-ethereum".parse::<RepositorySlug>();
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_empty_parts() {
        assert!("ethereum/".parse::<RepositorySlug>().is_err());
        assert!("/go-ethereum".parse::<RepositorySlug>().is_err());
    }

    #[test]
    fn rejects_extra_path_segments() {
        assert!("ethereum/go-ethereum/releases".parse::<RepositorySlug>().is_err());
    }
}
