//! Continuation-bounded assembly of one summary artifact.
//!
//! The backend returns bounded-length completions, so a single artifact may
//! take several turns. Turn 0 carries the task prompt plus the serialized
//! structure; every later turn sends only a short continue directive and
//! relies on the conversation history for context. A response containing the
//! end-of-sequence marker is final; a response without it is presumed cut
//! off mid-sentence, so everything after its last newline is dropped before
//! the text is accumulated or appended to the history. Turns are strictly
//! sequential: turn N's history contains the sanitized contributions of
//! turns 0..N-1 in order.

use crate::backend::GenerationBackend;
use crate::error::Result;
use llm_gateway::{ChatTurn, TokenUsage};
use tracing::{debug, warn};

/// Marker the backend is instructed to emit when truly finished.
pub const DEFAULT_EOS_MARKER: &str = "[|$|EOS|$|]";

/// Hard cap on request/response turns per artifact.
pub const DEFAULT_MAX_TURNS: usize = 3;

/// Protocol configuration, passed explicitly into the summarizer.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// End-of-sequence marker; stripped from the final turn's text.
    pub eos_marker: String,
    /// Instruction prepended to the serialized structure on turn 0.
    pub task_prompt: String,
    /// Fixed directive sent on every turn after the first.
    pub continue_prompt: String,
    /// Turn budget; reaching it without the marker is best-effort success.
    pub max_turns: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            eos_marker: DEFAULT_EOS_MARKER.to_string(),
            task_prompt: format!(
                "You are an experienced software engineer. The JSON document below \
                 describes the structure of one source file: its imports, classes, \
                 methods, functions, global variables and entry-point block. Write a \
                 markdown summary of the file: what it does, how its pieces fit \
                 together, and anything notable. When the summary is truly complete, \
                 end it with the marker {DEFAULT_EOS_MARKER}.\n\nFile structure:\n",
                DEFAULT_EOS_MARKER = DEFAULT_EOS_MARKER
            ),
            continue_prompt: format!(
                "Continue. Always end the finished summary with the marker {DEFAULT_EOS_MARKER}.",
                DEFAULT_EOS_MARKER = DEFAULT_EOS_MARKER
            ),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// How a summarization run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The backend emitted the end-of-sequence marker.
    Finished,
    /// The turn budget ran out without the marker; the accumulated text is
    /// returned as-is. Best-effort, not an error.
    TurnCapped,
}

/// The assembled artifact plus run telemetry.
#[derive(Debug, Clone)]
pub struct SummaryArtifact {
    pub text: String,
    pub turns: usize,
    pub completion: Completion,
    pub usage: TokenUsage,
}

/// Multi-turn summarizer over one generation backend.
///
/// Each instance owns its run state for the duration of one `summarize`
/// call; instances share nothing, so different files may be summarized by
/// independent instances concurrently.
pub struct FileSummarizer<B> {
    backend: B,
    config: SummarizerConfig,
}

impl<B: GenerationBackend> FileSummarizer<B> {
    pub fn new(backend: B, config: SummarizerConfig) -> Self {
        Self { backend, config }
    }

    /// Assemble one complete summary for a serialized file structure.
    ///
    /// # Errors
    /// [`crate::SummarizeError::Backend`] on transport failure; the run is
    /// aborted and nothing partial is returned.
    pub async fn summarize(&self, structure_json: &str) -> Result<SummaryArtifact> {
        let mut history: Vec<ChatTurn> = Vec::new();
        let mut text = String::new();
        let mut usage = TokenUsage::default();
        let mut turns = 0;

        while turns < self.config.max_turns {
            let prompt = if turns == 0 {
                format!("{}{}", self.config.task_prompt, structure_json)
            } else {
                self.config.continue_prompt.clone()
            };

            let prediction = self.backend.predict(&prompt, &history).await?;
            usage.accumulate(&prediction.usage);
            turns += 1;

            if prediction.content.contains(&self.config.eos_marker) {
                let final_text = prediction.content.replace(&self.config.eos_marker, "");
                text.push_str(&final_text);
                debug!(turns, "end-of-sequence marker received");
                return Ok(SummaryArtifact { text, turns, completion: Completion::Finished, usage });
            }

            // Presumed truncated mid-sentence: keep only up to the last
            // complete line before accumulating or extending the history.
            let kept = truncate_to_last_line(&prediction.content);
            history.push(ChatTurn::assistant(kept.clone()));
            text.push_str(&kept);
        }

        warn!(
            max_turns = self.config.max_turns,
            "turn budget exhausted without end-of-sequence marker; returning partial text"
        );
        Ok(SummaryArtifact { text, turns, completion: Completion::TurnCapped, usage })
    }
}

/// Drop everything after the final newline. Text without any newline is kept
/// whole; either way the result ends with a newline so the next turn's
/// contribution starts on a fresh line.
fn truncate_to_last_line(text: &str) -> String {
    match text.rfind('\n') {
        Some(index) => format!("{}\n", &text[..index]),
        None => format!("{}\n", text),
    }
}
