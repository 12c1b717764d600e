//! LLM error types.

use thiserror::Error;

/// Errors from model setup or from a single completion request.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key for the selected provider.
    #[error("No API key for LLM provider '{provider}'; set {env} or api-key in the [llm] section")]
    MissingCredential {
        provider: String,
        env: &'static str,
    },

    /// LLM operation timed out.
    #[error("LLM timed out after {0} seconds")]
    Timeout(u64),

    /// Model error.
    #[error("Model error: {0}")]
    Model(#[from] serdes_ai_models::ModelError),

    /// Agent run error.
    #[error("Agent run error: {0}")]
    AgentRun(#[from] serdes_ai::agent::AgentRunError),
}
