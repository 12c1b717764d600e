//! `[llm]` section of `config.toml`.

use crate::llm::error::LlmError;
use serde::Deserialize;
use serdes_ai_models::{build_model_with_config, infer_model, openrouter::OpenRouterModel, Model};
use std::sync::Arc;
use std::time::Duration;

/// Provider selection, keyed by the `provider` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider")]
pub(crate) enum LlmConfig {
    #[serde(rename = "openai")]
    OpenAi(HostedModel),
    #[serde(rename = "openrouter")]
    OpenRouter(OpenRouterSettings),
    #[serde(rename = "anthropic")]
    Anthropic(HostedModel),
    #[serde(rename = "gemini")]
    Gemini(HostedModel),
}

/// Settings shared by the directly hosted providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct HostedModel {
    /// Model name, e.g. `claude-3-5-haiku-20241022`.
    pub(crate) model: String,
    /// Falls back to the provider's API key variable.
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) temperature: Option<f64>,
}

/// OpenRouter settings; it takes attribution headers instead of a base URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct OpenRouterSettings {
    /// Routed model name, e.g. `anthropic/claude-3.5-haiku`.
    pub(crate) model: String,
    pub(crate) api_key: Option<String>,
    pub(crate) http_referer: Option<String>,
    pub(crate) app_title: Option<String>,
    pub(crate) temperature: Option<f64>,
}

impl LlmConfig {
    /// Provider prefix as used in `provider:model` specs.
    pub(crate) fn provider(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => "openai",
            Self::OpenRouter(_) => "openrouter",
            Self::Anthropic(_) => "anthropic",
            Self::Gemini(_) => "gemini",
        }
    }

    pub(crate) fn temperature(&self) -> Option<f64> {
        match self {
            Self::OpenRouter(settings) => settings.temperature,
            Self::OpenAi(hosted) | Self::Anthropic(hosted) | Self::Gemini(hosted) => {
                hosted.temperature
            }
        }
    }

    fn api_key(&self) -> Option<&str> {
        match self {
            Self::OpenRouter(settings) => settings.api_key.as_deref(),
            Self::OpenAi(hosted) | Self::Anthropic(hosted) | Self::Gemini(hosted) => {
                hosted.api_key.as_deref()
            }
        }
    }

    /// Fails if neither the config nor the environment provides an API key.
    pub(crate) fn ensure_credential(&self) -> Result<(), LlmError> {
        if self.api_key().is_some_and(|key| !key.trim().is_empty()) {
            return Ok(());
        }
        ensure_env_credential(self.provider())
    }

    /// Builds the configured model.
    pub(crate) fn build_model(&self) -> Result<Arc<dyn Model>, LlmError> {
        match self {
            Self::OpenRouter(settings) => settings.build(),
            Self::OpenAi(hosted) | Self::Anthropic(hosted) | Self::Gemini(hosted) => {
                hosted.build(self.provider())
            }
        }
    }
}

impl HostedModel {
    fn build(&self, provider: &str) -> Result<Arc<dyn Model>, LlmError> {
        let api_key = self.api_key.clone().or_else(|| env_api_key(provider));
        if api_key.is_none() && self.base_url.is_none() && self.timeout_secs.is_none() {
            return infer_model(&format!("{provider}:{}", self.model)).map_err(LlmError::Model);
        }
        build_model_with_config(
            provider,
            &self.model,
            api_key.as_deref(),
            self.base_url.as_deref(),
            self.timeout_secs.map(Duration::from_secs),
        )
        .map_err(LlmError::Model)
    }
}

impl OpenRouterSettings {
    fn build(&self) -> Result<Arc<dyn Model>, LlmError> {
        if self.api_key.is_none() && self.http_referer.is_none() && self.app_title.is_none() {
            return infer_model(&format!("openrouter:{}", self.model)).map_err(LlmError::Model);
        }
        let mut model = match &self.api_key {
            Some(key) => OpenRouterModel::new(&self.model, key),
            None => OpenRouterModel::from_env(&self.model).map_err(LlmError::Model)?,
        };
        if let Some(referer) = &self.http_referer {
            model = model.with_http_referer(referer);
        }
        if let Some(title) = &self.app_title {
            model = model.with_app_title(title);
        }
        Ok(Arc::new(model))
    }
}

/// Environment variable holding the API key for a provider.
pub(crate) fn api_key_env(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("OPENAI_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "gemini" => Some("GOOGLE_API_KEY"),
        _ => None,
    }
}

/// Gets the API key from environment variables for a provider.
fn env_api_key(provider: &str) -> Option<String> {
    let var = api_key_env(provider)?;
    std::env::var(var).ok().filter(|key| !key.trim().is_empty())
}

/// Fails if the provider's API key environment variable is unset or empty.
///
/// Unknown providers are let through; model construction reports those.
pub(crate) fn ensure_env_credential(provider: &str) -> Result<(), LlmError> {
    let Some(env) = api_key_env(provider) else {
        return Ok(());
    };
    if env_api_key(provider).is_some() {
        return Ok(());
    }
    Err(LlmError::MissingCredential {
        provider: provider.to_string(),
        env,
    })
}
