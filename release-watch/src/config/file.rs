//! `config.toml` deserialization.

use crate::llm::LlmConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level structure for `config.toml`.
///
/// Both sections are optional; anything missing here can still come from
/// the command line or the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Polling settings.
    #[serde(default)]
    pub watch: WatchSection,

    /// LLM provider configuration.
    pub(crate) llm: Option<LlmConfig>,
}

/// The `[watch]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WatchSection {
    /// Upstream repository in `owner/name` form.
    pub repository: Option<String>,

    /// GitHub Personal Access Token.
    pub github_token: Option<String>,

    /// Chat webhook endpoint.
    pub webhook_url: Option<String>,

    /// Seconds to sleep between cycles.
    pub interval_secs: Option<u64>,

    /// Number of recent releases to fetch per cycle.
    pub fetch_count: Option<u8>,

    /// Path of the seen-release state file.
    pub state_file: Option<PathBuf>,

    /// Path of a Handlebars template for the notification text.
    pub message_template: Option<PathBuf>,
}
