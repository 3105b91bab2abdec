//! Per-section remarks over an indexed file.
//!
//! For every free function and every class method, the recorded span is cut
//! back out of the source and sent to the backend together with the
//! file-level summary; each reply becomes one line-anchored remark. After a
//! class's methods are done, their remarks are rolled up into one remark for
//! the class itself, anchored at the class line.

use crate::backend::GenerationBackend;
use crate::error::Result;
use llm_gateway::TokenUsage;
use serde::{Deserialize, Serialize};
use structure_indexer::sections::extract_lines;
use structure_indexer::types::{FileStructure, FunctionNode};
use tracing::debug;

/// Slot in the section prompt replaced by the file-level summary.
const SUMMARY_SLOT: &str = "```markdown```";

/// Slot in the class prompt replaced by the accumulated method remarks.
const CLASS_REMARKS_SLOT: &str = "[|$|class_remarks|$|]";

/// One line-anchored remark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub line_no: usize,
    pub remark: String,
}

/// The persisted result of one file's section pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionReport {
    pub file_path: String,
    pub comments: Vec<CommentRecord>,
}

/// Prompt templates for the section pass.
#[derive(Debug, Clone)]
pub struct SectionPrompts {
    /// Per-section template; must contain the summary slot.
    pub section: String,
    /// Per-class rollup template; must contain both slots.
    pub class_rollup: String,
}

impl Default for SectionPrompts {
    fn default() -> Self {
        Self {
            section: format!(
                "You are an experienced software engineer reviewing one file of a \
                 larger project. The file-level summary is:\n{SUMMARY_SLOT}\nWrite a \
                 concise remark for the code section that follows: what it does, its \
                 inputs and outputs, and any risks. Reply with the remark only."
            ),
            class_rollup: format!(
                "You are an experienced software engineer reviewing one file of a \
                 larger project. The file-level summary is:\n{SUMMARY_SLOT}\nThe \
                 remarks for this class's methods are:\n{CLASS_REMARKS_SLOT}\nWrite a \
                 concise remark describing the class as a whole. Reply with the \
                 remark only."
            ),
        }
    }
}

/// Single-shot section commenter over one generation backend.
pub struct SectionCommenter<B> {
    backend: B,
    prompts: SectionPrompts,
}

impl<B: GenerationBackend> SectionCommenter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, prompts: SectionPrompts::default() }
    }

    pub fn with_prompts(backend: B, prompts: SectionPrompts) -> Self {
        Self { backend, prompts }
    }

    /// Produce line-anchored remarks for every function, method, and class.
    ///
    /// # Errors
    /// Backend failure aborts the whole file's pass;
    /// [`crate::SummarizeError::Index`] on an invalid recorded span.
    pub async fn comment_sections(
        &self,
        structure: &FileStructure,
        source: &str,
        summary: &str,
    ) -> Result<Vec<CommentRecord>> {
        let summary_block = format!("```markdown\n{summary}\n```");
        let section_prompt = self.prompts.section.replace(SUMMARY_SLOT, &summary_block);
        let class_prompt = self.prompts.class_rollup.replace(SUMMARY_SLOT, &summary_block);

        let mut comments = Vec::new();
        let mut usage = TokenUsage::default();

        for function in structure.functions.values() {
            let record =
                self.comment_one(&section_prompt, source, function, &mut usage).await?;
            comments.push(record);
        }

        for class in structure.classes.values() {
            let mut method_remarks = String::new();
            for method in class.methods.values() {
                let record =
                    self.comment_one(&section_prompt, source, method, &mut usage).await?;
                method_remarks.push_str(&format!(
                    "Method starting at line {}:\n{}\n",
                    record.line_no, record.remark
                ));
                comments.push(record);
            }

            let rollup_prompt = class_prompt.replace(CLASS_REMARKS_SLOT, &method_remarks);
            let prediction = self.backend.predict(&rollup_prompt, &[]).await?;
            usage.accumulate(&prediction.usage);
            comments.push(CommentRecord {
                line_no: class.line_number,
                remark: prediction.content,
            });
        }

        debug!(
            comments = comments.len(),
            total_tokens = usage.total_tokens,
            "section pass finished"
        );
        Ok(comments)
    }

    async fn comment_one(
        &self,
        section_prompt: &str,
        source: &str,
        function: &FunctionNode,
        usage: &mut TokenUsage,
    ) -> Result<CommentRecord> {
        let lines =
            extract_lines(source, function.line_number, function.end_line_number)?;
        let code = lines.join("\n");
        let prompt = format!("{section_prompt}\n```\n{code}\n```");
        let prediction = self.backend.predict(&prompt, &[]).await?;
        usage.accumulate(&prediction.usage);
        Ok(CommentRecord { line_no: function.line_number, remark: prediction.content })
    }
}
