//! Chat-completion gateway with conversation-history support.
//!
//! A thin, non-streaming client for an OpenAI-compatible
//! `/v1/chat/completions` endpoint. The caller supplies the ordered list of
//! prior turns on every call; the gateway never stores conversation state
//! itself. Token usage comes back as telemetry and never affects control
//! flow.

pub mod chat;
pub mod config;
pub mod error;

mod client;

pub use chat::{ChatTurn, Prediction, Role, TokenUsage};
pub use client::ChatGateway;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
