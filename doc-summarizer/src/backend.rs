//! The contract this crate requires from a generation backend.

use llm_gateway::{ChatGateway, ChatTurn, GatewayError, Prediction};

/// One synchronous request/response exchange with a text-generation service.
///
/// `history` is the append-only ordered list of prior role/content turns the
/// backend must treat as its conversation memory; implementations must not
/// keep conversation state of their own between calls.
#[allow(async_fn_in_trait)]
pub trait GenerationBackend {
    async fn predict(
        &self,
        prompt: &str,
        history: &[ChatTurn],
    ) -> std::result::Result<Prediction, GatewayError>;
}

impl GenerationBackend for ChatGateway {
    async fn predict(
        &self,
        prompt: &str,
        history: &[ChatTurn],
    ) -> std::result::Result<Prediction, GatewayError> {
        ChatGateway::predict(self, prompt, history).await
    }
}

impl<B: GenerationBackend> GenerationBackend for &B {
    async fn predict(
        &self,
        prompt: &str,
        history: &[ChatTurn],
    ) -> std::result::Result<Prediction, GatewayError> {
        (**self).predict(prompt, history).await
    }
}
