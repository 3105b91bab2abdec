//! Language taxonomy and extension-based detection.
//!
//! The extension map is an explicit, closed table: an unmapped extension has
//! no language tag and registry lookup for it fails. Language→grammar wiring
//! lives in the per-language parser modules, not here.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Supported source languages.
///
/// Keep the set tight and add variants deliberately; every variant must have
/// a registered [`crate::StructuralParser`] implementation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    Python,
    Java,
}

impl Display for LanguageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LanguageKind::Python => "python",
            LanguageKind::Java => "java",
        })
    }
}

impl LanguageKind {
    /// Detection by file extension. Returns `None` for unmapped extensions.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Detection by file path, using the extension only.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}
