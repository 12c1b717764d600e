//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting was present but invalid.
    #[error("Invalid value for '{setting}': {message}")]
    ValidationError { setting: String, message: String },

    /// A required setting was not supplied by any source.
    #[error("Missing required setting '{setting}'; pass --{flag}, set {env} or add it to the [watch] section of the config file")]
    MissingSetting {
        setting: &'static str,
        flag: &'static str,
        env: &'static str,
    },
}
