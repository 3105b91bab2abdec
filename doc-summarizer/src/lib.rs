//! LLM-backed documentation generation over indexed file structures.
//!
//! The centerpiece is the continuation-bounded summarizer
//! ([`continuation::FileSummarizer`]): the backend can only return
//! bounded-length completions, so one artifact is assembled over multiple
//! strictly sequential turns, with truncation handling and an
//! end-of-sequence marker to tell "really done" apart from "ran out of
//! room". Section-level remarks and naive whole-file commenting ride on the
//! same backend contract.

pub mod backend;
pub mod commenter;
pub mod continuation;
pub mod error;
pub mod sections;

pub use backend::GenerationBackend;
pub use continuation::{Completion, FileSummarizer, SummarizerConfig, SummaryArtifact};
pub use error::{Result, SummarizeError};
pub use sections::{CommentRecord, SectionCommenter, SectionReport};
