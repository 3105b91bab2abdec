use crate::language::LanguageKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("grammar rejected {language} source")]
    Syntax { language: LanguageKind },

    #[error("no parser registered for language tag: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid line range: start {start}, end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("tree-sitter language error: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
}

pub type Result<T> = std::result::Result<T, Error>;
