//! Naive whole-file commenting.
//!
//! Single-shot: the full source goes out with an instruction to return it
//! with doc comments inserted. Backends routinely wrap such replies in
//! markdown code fences despite the instruction, so the fences are stripped
//! before the result is returned.

use crate::backend::GenerationBackend;
use crate::error::Result;

const COMMENT_PROMPT: &str = "You are an experienced programmer. Add doc comments to the \
following source code: class comments above classes, method comments above methods, \
function comments above functions. Describe roughly what the code does and each \
function's inputs and outputs. Do not replace any existing comments. Return the source \
code only, without wrapping it in ``` fences.\n\n";

/// Ask the backend for a fully commented rendition of `source`.
///
/// # Errors
/// [`crate::SummarizeError::Backend`] on transport failure.
pub async fn comment_file<B: GenerationBackend>(backend: &B, source: &str) -> Result<String> {
    let prompt = format!("{COMMENT_PROMPT}{source}");
    let prediction = backend.predict(&prompt, &[]).await?;
    Ok(strip_markdown_fences(&prediction.content))
}

/// Extract the content of the first fenced code block, or the trimmed reply
/// when no complete fence is present. The opening fence may carry a language
/// tag; content starts after its line break.
pub fn strip_markdown_fences(reply: &str) -> String {
    if let Some(open) = reply.find("```") {
        if let Some(newline) = reply[open..].find('\n') {
            let content_start = open + newline + 1;
            if let Some(close) = reply[content_start..].find("```") {
                return reply[content_start..content_start + close].trim().to_owned();
            }
        }
    }
    reply.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_gateway::{ChatTurn, GatewayError, Prediction, TokenUsage};

    struct EchoBackend(String);

    impl GenerationBackend for EchoBackend {
        async fn predict(
            &self,
            _prompt: &str,
            _history: &[ChatTurn],
        ) -> std::result::Result<Prediction, GatewayError> {
            Ok(Prediction { content: self.0.clone(), usage: TokenUsage::default() })
        }
    }

    #[test]
    fn strips_fence_with_language_tag() {
        let reply = "```python\ndef f():\n    pass\n```";
        assert_eq!(strip_markdown_fences(reply), "def f():\n    pass");
    }

    #[test]
    fn strips_bare_fence_with_surrounding_prose() {
        let reply = "Here you go:\n```\ncode\n```\nEnjoy!";
        assert_eq!(strip_markdown_fences(reply), "code");
    }

    #[test]
    fn unfenced_reply_is_trimmed_verbatim() {
        assert_eq!(strip_markdown_fences("  plain code  \n"), "plain code");
    }

    #[test]
    fn unterminated_fence_falls_back_to_whole_reply() {
        let reply = "```python\ndef f():";
        assert_eq!(strip_markdown_fences(reply), "```python\ndef f():");
    }

    #[tokio::test]
    async fn commented_file_comes_back_unfenced() {
        let backend = EchoBackend("```python\n# doc\ndef f():\n    pass\n```".to_string());
        let out = comment_file(&backend, "def f():\n    pass\n").await.expect("comment");
        assert_eq!(out, "# doc\ndef f():\n    pass");
    }
}
