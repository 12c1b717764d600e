//! LLM configuration and serdes-ai harness.

mod config;
mod error;

pub(crate) use config::LlmConfig;

use config::ensure_env_credential;
pub use error::LlmError;

use async_trait::async_trait;
use serdes_ai::{agent::Agent, agent::AgentBuilder};
use std::sync::Arc;
use std::time::Duration;

const MODEL_ENV: &str = "RELEASE_WATCH_LLM_MODEL";
const TEMPERATURE_ENV: &str = "RELEASE_WATCH_LLM_TEMPERATURE";
const DEFAULT_MODEL: &str = "anthropic:claude-3-5-haiku-20241022";
const LLM_TIMEOUT_SECS: u64 = 120;

const SYSTEM_PROMPT: &str = "You review software release notes for operators who run the \
software in production. You answer only with the JSON object you are asked for.";

/// A single prompt/response round trip with an inference API.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Sends `prompt` and returns the model's text reply.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on API failures or timeouts.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// [`Completion`] backed by a serdes-ai agent without tools.
pub(crate) struct SerdesAiCompletion {
    agent: Agent<(), String>,
    timeout_secs: u64,
}

impl SerdesAiCompletion {
    /// Resolves the model and its credential, failing fast if either is missing.
    pub(crate) fn from_config(config: Option<&LlmConfig>) -> Result<Self, LlmError> {
        let model = resolve_model(config)?;
        let temperature = resolve_temperature(config);
        Ok(Self {
            agent: build_agent(model, temperature),
            timeout_secs: LLM_TIMEOUT_SECS,
        })
    }
}

#[async_trait]
impl Completion for SerdesAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let result = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.agent.run(prompt.to_string(), ()),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.timeout_secs))??;

        Ok(result.output)
    }
}

/// Resolves the LLM model from config or environment.
fn resolve_model(
    config: Option<&LlmConfig>,
) -> Result<Arc<dyn serdes_ai_models::Model>, LlmError> {
    if let Some(config) = config {
        config.ensure_credential()?;
        return config.build_model();
    }
    let model_spec = resolve_model_spec();
    if let Some((provider, _)) = model_spec.split_once(':') {
        ensure_env_credential(provider)?;
    }
    serdes_ai_models::infer_model(&model_spec).map_err(LlmError::Model)
}

/// Returns the `provider:model` spec from the environment or the default.
fn resolve_model_spec() -> String {
    std::env::var(MODEL_ENV)
        .ok()
        .filter(|spec| !spec.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// Validates that a temperature value is finite and within 0.0-2.0.
fn validate_temperature(value: f64, source: &str) -> Option<f64> {
    if !value.is_finite() || !(0.0..=2.0).contains(&value) {
        tracing::warn!(
            "Invalid temperature {value} from {source}: must be finite and in range 0.0-2.0"
        );
        return None;
    }
    Some(value)
}

/// Resolves the temperature from environment or config.
///
/// Environment variable takes precedence over config file.
fn resolve_temperature(config: Option<&LlmConfig>) -> Option<f64> {
    if let Ok(val) = std::env::var(TEMPERATURE_ENV) {
        if let Ok(temp) = val.parse::<f64>() {
            return validate_temperature(temp, "environment variable");
        }
    }
    config
        .and_then(LlmConfig::temperature)
        .and_then(|t| validate_temperature(t, "config file"))
}

/// Builds a tool-less agent for release classification.
fn build_agent(
    model: Arc<dyn serdes_ai_models::Model>,
    temperature: Option<f64>,
) -> Agent<(), String> {
    let mut builder = AgentBuilder::from_arc(model).system_prompt(SYSTEM_PROMPT.to_string());

    if let Some(temp) = temperature {
        builder = builder.temperature(temp);
    }

    builder.build()
}
