//! Configuration file loading.
//!
//! Settings may come from the command line, the environment or an optional
//! `config.toml`. This module only deals with the file and with the small
//! value types shared by all sources; merging happens in
//! [`RunnerConfig::resolve`](crate::runner::RunnerConfig::resolve).

mod error;
mod file;
mod repository;

pub use error::ConfigError;
pub use file::{ConfigFile, WatchSection};
pub use repository::RepositorySlug;

use std::path::Path;
use tracing::{debug, info};

/// Loads `config.toml` if it exists.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file found");
        return Ok(None);
    }

    info!(path = %path.display(), "Loading config file");
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    let parsed = toml::from_str(&contents).map_err(|source| ConfigError::TomlError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(parsed))
}

/// Reads a notification template file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or is empty.
pub fn load_message_template(path: &Path) -> Result<String, ConfigError> {
    let template = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;

    if template.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            setting: "message-template".to_string(),
            message: format!("{} is empty", path.display()),
        });
    }

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = temp.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_config_file_returns_none_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = load_config_file(&temp.path().join("missing.toml")).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn load_config_file_parses_watch_section() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[watch]
repository = "ethereum/go-ethereum"
webhook-url = "https://hooks.slack.com/services/T000/B000/XXX"
interval-secs = 300
fetch-count = 3
state-file = "state/seen.json"
"#,
        );

        let config = load_config_file(&path).unwrap().unwrap();
        assert_eq!(
            config.watch.repository.as_deref(),
            Some("ethereum/go-ethereum")
        );
        assert_eq!(config.watch.interval_secs, Some(300));
        assert_eq!(config.watch.fetch_count, Some(3));
        assert_eq!(
            config.watch.state_file.as_deref(),
            Some(Path::new("state/seen.json"))
        );
        assert!(config.watch.github_token.is_none());
        assert!(config.llm.is_none());
    }

    #[test]
    fn load_config_file_parses_llm_section() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
[llm]
provider = "anthropic"
model = "claude-3-5-haiku-20241022"
"#,
        );

        let config = load_config_file(&path).unwrap().unwrap();
        assert!(config.watch.repository.is_none());
        match config.llm {
            Some(LlmConfig::Anthropic(hosted)) => {
                assert_eq!(hosted.model, "claude-3-5-haiku-20241022");
                assert!(hosted.api_key.is_none());
            }
            _ => panic!("expected anthropic"),
        }
    }

    #[test]
    fn load_config_file_reports_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "not = [valid");
        let error = load_config_file(&path).unwrap_err();
        assert!(matches!(error, ConfigError::TomlError { .. }));
    }

    #[test]
    fn load_message_template_rejects_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("message.hbs");
        fs::write(&path, "  \n").unwrap();

        let result = load_message_template(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn load_message_template_reads_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("message.hbs");
        fs::write(&path, "{{title}}").unwrap();

        assert_eq!(load_message_template(&path).unwrap(), "{{title}}");
    }
}
