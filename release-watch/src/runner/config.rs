//! Runner configuration.

use crate::config::{
    load_config_file, load_message_template, ConfigError, ConfigFile, RepositorySlug,
};
use crate::llm::LlmConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default seconds between cycles.
pub const DEFAULT_INTERVAL_SECS: u64 = 600;

/// Default number of releases fetched per cycle.
pub const DEFAULT_FETCH_COUNT: u8 = 5;

/// Largest page GitHub serves.
pub const MAX_FETCH_COUNT: u8 = 100;

/// Default seen-set location.
pub const DEFAULT_STATE_FILE: &str = "seen_releases.json";

/// Settings supplied on the command line or through the environment.
///
/// These take precedence over the `[watch]` section of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Upstream repository in `owner/name` form.
    pub repository: Option<String>,
    /// GitHub Personal Access Token.
    pub github_token: Option<String>,
    /// Chat webhook endpoint.
    pub webhook_url: Option<String>,
    /// Seconds between cycles.
    pub interval_secs: Option<u64>,
    /// Releases fetched per cycle.
    pub fetch_count: Option<u8>,
    /// Seen-set location.
    pub state_file: Option<PathBuf>,
    /// Handlebars message template file.
    pub message_template: Option<PathBuf>,
    /// Print alerts instead of posting them and never write the seen set.
    pub dry_run: bool,
    /// Run a single cycle and return.
    pub once: bool,
}

/// Configuration for running the release watcher.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Monitored repository.
    repository: RepositorySlug,
    /// GitHub token used for API calls.
    github_token: String,
    /// Webhook endpoint; absent only in dry runs.
    webhook_url: Option<Url>,
    /// Sleep between cycles.
    interval: Duration,
    /// Releases fetched per cycle.
    fetch_count: u8,
    /// Seen-set location.
    state_file: PathBuf,
    /// Custom message template contents.
    message_template: Option<String>,
    /// Whether to preview alerts without posting or persisting.
    dry_run: bool,
    /// Whether to stop after one cycle.
    once: bool,
    /// LLM provider configuration from the config file.
    llm: Option<LlmConfig>,
}

impl RunnerConfig {
    /// Loads the optional config file at `config_path` and merges `overrides` over it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is invalid or a setting is missing or invalid.
    pub fn load(overrides: ConfigOverrides, config_path: &Path) -> Result<Self, ConfigError> {
        let file = load_config_file(config_path)?;
        Self::resolve(overrides, file)
    }

    /// Merges `overrides` over `file`, applies defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required setting is missing or a value is invalid.
    pub fn resolve(
        overrides: ConfigOverrides,
        file: Option<ConfigFile>,
    ) -> Result<Self, ConfigError> {
        let ConfigFile { watch, llm } = file.unwrap_or_default();

        let repository: RepositorySlug = required(
            overrides.repository.or(watch.repository),
            "repository",
            "repository",
            "RELEASE_WATCH_REPOSITORY",
        )?
        .parse()?;

        let github_token = required(
            overrides.github_token.or(watch.github_token),
            "github-token",
            "github-token",
            "GITHUB_TOKEN",
        )?;

        let webhook_url = match non_empty(overrides.webhook_url.or(watch.webhook_url)) {
            Some(raw) => Some(parse_webhook_url(&raw)?),
            None if overrides.dry_run => None,
            None => {
                return Err(ConfigError::MissingSetting {
                    setting: "webhook-url",
                    flag: "webhook-url",
                    env: "SLACK_WEBHOOK_URL",
                })
            }
        };

        let interval_secs = overrides
            .interval_secs
            .or(watch.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(invalid("interval-secs", "must be greater than zero"));
        }

        let fetch_count = overrides
            .fetch_count
            .or(watch.fetch_count)
            .unwrap_or(DEFAULT_FETCH_COUNT);
        if !(1..=MAX_FETCH_COUNT).contains(&fetch_count) {
            return Err(invalid(
                "fetch-count",
                &format!("must be between 1 and {MAX_FETCH_COUNT}"),
            ));
        }

        let state_file = overrides
            .state_file
            .or(watch.state_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let message_template = overrides
            .message_template
            .or(watch.message_template)
            .map(|path| load_message_template(&path))
            .transpose()?;

        Ok(Self {
            repository,
            github_token,
            webhook_url,
            interval: Duration::from_secs(interval_secs),
            fetch_count,
            state_file,
            message_template,
            dry_run: overrides.dry_run,
            once: overrides.once,
            llm,
        })
    }

    /// Returns the monitored repository.
    pub fn repository(&self) -> &RepositorySlug {
        &self.repository
    }

    /// Returns the configured GitHub token.
    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// Returns the webhook endpoint, if any.
    pub fn webhook_url(&self) -> Option<&Url> {
        self.webhook_url.as_ref()
    }

    /// Returns the sleep between cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the number of releases fetched per cycle.
    pub fn fetch_count(&self) -> u8 {
        self.fetch_count
    }

    /// Returns the seen-set location.
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Returns the custom message template, if one was configured.
    pub fn message_template(&self) -> Option<&str> {
        self.message_template.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns whether only one cycle should run.
    pub fn once(&self) -> bool {
        self.once
    }

    /// Returns the LLM provider configuration, if the config file had one.
    pub(crate) fn llm(&self) -> Option<&LlmConfig> {
        self.llm.as_ref()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(
    value: Option<String>,
    setting: &'static str,
    flag: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::MissingSetting { setting, flag, env })
}

fn invalid(setting: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        setting: setting.to_string(),
        message: message.to_string(),
    }
}

fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| invalid("webhook-url", &e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("webhook-url", "must be an http or https URL"));
    }
    Ok(url)
}
