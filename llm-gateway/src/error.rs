//! Unified error handling for `llm-gateway`.
//!
//! One top-level [`GatewayError`] for the whole crate. All messages include
//! the suffix `[LLM Gateway]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The endpoint is empty or does not start with http/https.
    #[error("[LLM Gateway] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error.
    #[error("[LLM Gateway] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("[LLM Gateway] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("[LLM Gateway] failed to decode response: {0}")]
    Decode(String),

    /// The completion response carried no choices.
    #[error("[LLM Gateway] empty choices in completion response")]
    EmptyChoices,

    /// Required environment variable is missing or empty.
    #[error("[LLM Gateway] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (limits, timeouts).
    #[error("[LLM Gateway] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },
}

/// Trim a response body down to a loggable snippet.
pub(crate) fn make_snippet(body: &str) -> String {
    body.chars().take(240).collect()
}
