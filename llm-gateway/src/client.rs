//! Thin client for an OpenAI-compatible chat-completion endpoint.
//!
//! Performs a **non-streaming** `POST {endpoint}/v1/chat/completions` per
//! call. The conversation history is supplied by the caller on every call
//! and sent ahead of the new user message; the client itself is stateless
//! between calls.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::chat::{ChatTurn, Prediction, TokenUsage};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result, make_snippet};

#[derive(Debug)]
pub struct ChatGateway {
    client: reqwest::Client,
    cfg: GatewayConfig,
    url_chat: String,
}

impl ChatGateway {
    /// Creates a new gateway from the given config.
    ///
    /// Validates the endpoint scheme and builds an HTTP client with a
    /// configurable timeout; the API key, when present, becomes a bearer
    /// header on every request.
    ///
    /// # Errors
    /// - [`GatewayError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`GatewayError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(GatewayError::InvalidEndpoint(cfg.endpoint));
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        if let Some(api_key) = cfg.api_key.as_deref() {
            let bearer = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| GatewayError::Decode(format!("invalid API key header: {e}")))?;
            headers.insert(header::AUTHORIZATION, bearer);
        }
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/v1/chat/completions", base);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "ChatGateway initialized"
        );

        Ok(Self { client, cfg, url_chat })
    }

    /// One request/response exchange.
    ///
    /// `history` is the append-only ordered list of prior turns; it is sent
    /// verbatim ahead of the new user message built from `prompt`.
    ///
    /// # Errors
    /// - [`GatewayError::HttpStatus`] for non-2xx responses
    /// - [`GatewayError::Transport`] for client/network failures
    /// - [`GatewayError::Decode`] if the JSON cannot be parsed
    /// - [`GatewayError::EmptyChoices`] if no completion came back
    pub async fn predict(&self, prompt: &str, history: &[ChatTurn]) -> Result<Prediction> {
        let started = Instant::now();

        let mut messages: Vec<ChatTurn> = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(ChatTurn::user(prompt));

        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages,
            stream: false,
            max_tokens: self.cfg.max_tokens,
            temperature: self.cfg.temperature,
        };

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            history_turns = history.len(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(GatewayError::HttpStatus { status, url, snippet });
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            GatewayError::Decode(format!("serde error: {e}; expected `choices[0].message.content`"))
        })?;

        let usage = out
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(GatewayError::EmptyChoices)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            total_tokens = usage.total_tokens,
            "chat completion completed"
        );

        Ok(Prediction { content, usage })
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn>,
    #[serde(default)]
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response body; the generated text is in `choices[0].message.content`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<UsageBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(endpoint: &str) -> GatewayConfig {
        GatewayConfig {
            endpoint: endpoint.to_string(),
            model: "glm-4".to_string(),
            api_key: Some("sk-test".to_string()),
            max_tokens: Some(256),
            temperature: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn rejects_invalid_endpoint_scheme() {
        let err = ChatGateway::new(cfg("ftp://example.com")).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidEndpoint(_)));
        let err = ChatGateway::new(cfg("")).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidEndpoint(_)));
    }

    #[test]
    fn builds_chat_url_from_endpoint() {
        let gateway = ChatGateway::new(cfg("http://localhost:8000/")).expect("valid config");
        assert_eq!(gateway.url_chat, "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn request_body_skips_absent_options() {
        let body = ChatCompletionRequest {
            model: "glm-4",
            messages: vec![ChatTurn::user("hi")],
            stream: false,
            max_tokens: None,
            temperature: None,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
