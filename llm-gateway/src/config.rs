//! Gateway configuration and environment loading.

use crate::error::{GatewayError, Result};

/// Configuration for the chat-completion backend.
///
/// Carries both connection data and generation parameters. Loaded once from
/// the environment and passed by value into the gateway constructor; nothing
/// here is read from process-wide state afterwards.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Inference endpoint base URL (e.g. `https://api.openai.com`).
    pub endpoint: String,

    /// Model identifier string (e.g. `"gpt-4"`, `"glm-4"`).
    pub model: String,

    /// Optional API key; sent as a bearer token when present.
    pub api_key: Option<String>,

    /// Maximum number of tokens per completion, if the backend supports it.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl GatewayConfig {
    /// Load the configuration from the environment.
    ///
    /// Required: `LLM_ENDPOINT`, `LLM_MODEL`. Optional: `LLM_API_KEY`,
    /// `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`, `LLM_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// [`GatewayError::MissingVar`] / [`GatewayError::InvalidNumber`] on
    /// absent or malformed values.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: must_env("LLM_ENDPOINT")?,
            model: must_env("LLM_MODEL")?,
            api_key: opt_env("LLM_API_KEY"),
            max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
            temperature: env_opt_f32("LLM_TEMPERATURE")?,
            timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
        })
    }
}

/// Fetches a required, non-empty environment variable.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GatewayError::MissingVar(name)),
    }
}

/// Fetches an optional environment variable (`None` if unset/empty).
pub fn opt_env(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .parse::<u32>()
            .map(Some)
            .map_err(|_| GatewayError::InvalidNumber { var: name, reason: "expected u32" }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .parse::<u64>()
            .map(Some)
            .map_err(|_| GatewayError::InvalidNumber { var: name, reason: "expected u64" }),
        _ => Ok(None),
    }
}

/// Parses an optional `f32` from env (`Ok(None)` if unset/empty).
pub fn env_opt_f32(name: &'static str) -> Result<Option<f32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .parse::<f32>()
            .map(Some)
            .map_err(|_| GatewayError::InvalidNumber { var: name, reason: "expected f32" }),
        _ => Ok(None),
    }
}
