use crate::errors::Result;
use crate::language::LanguageKind;
use crate::types::FileStructure;

/// One grammar-backed parser implementation per supported language.
///
/// Implementations declare which construct categories they support by
/// leaving unsupported fields of [`FileStructure`] absent; callers must not
/// treat absence as an error.
pub trait StructuralParser: std::fmt::Debug {
    /// Language this parser accepts.
    fn language(&self) -> LanguageKind;

    /// Parse source bytes into a normalized structure.
    ///
    /// Fails with [`crate::Error::Syntax`] when the grammar rejects the
    /// input; no partial structure is returned on that path. A single
    /// construct missing its name node is skipped and logged instead.
    fn parse(&self, source: &[u8]) -> Result<FileStructure>;
}
