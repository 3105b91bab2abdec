//! Structural indexing of source files into a normalized [`FileStructure`].
//!
//! Parsing is grammar-driven (tree-sitter) with one [`StructuralParser`]
//! implementation per supported language, selected through a registry that is
//! populated once at process start. The produced structure is immutable and
//! serialization-friendly; slicing a file by recorded line spans is provided
//! by [`sections::extract_lines`].

pub mod ast;
pub mod errors;
pub mod language;
pub mod sections;
pub mod types;

pub use ast::interface::StructuralParser;
pub use ast::registry::{self, ParserRegistry};
pub use errors::{Error, Result};
pub use language::LanguageKind;
pub use types::FileStructure;

use std::path::Path;

/// Parse one file's bytes with the globally registered parser for its
/// extension-derived language.
///
/// The returned structure carries no `relative_path`; attaching it is the
/// caller's job.
///
/// # Errors
/// - [`Error::UnsupportedLanguage`] when the extension maps to no registered parser
/// - [`Error::Syntax`] when the grammar rejects the source
pub fn index_source(path: &Path, source: &[u8]) -> Result<FileStructure> {
    let parser = registry::global().create_for_path(path)?;
    parser.parse(source)
}
