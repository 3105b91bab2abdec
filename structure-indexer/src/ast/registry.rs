//! Process-wide parser registry keyed by language.
//!
//! Registration happens once, before any `create` call; afterwards the
//! registry is read-only for the lifetime of the process. The global
//! instance is seeded with every built-in language by [`ParserRegistry::bootstrap`].

use crate::ast::interface::StructuralParser;
use crate::ast::{java::JavaParser, python::PythonParser};
use crate::errors::{Error, Result};
use crate::language::LanguageKind;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

type Constructor = fn() -> Box<dyn StructuralParser + Send>;

pub struct ParserRegistry {
    constructors: HashMap<LanguageKind, Constructor>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// Register a constructor for a language. Later registrations for the
    /// same tag replace earlier ones.
    pub fn register(&mut self, language: LanguageKind, constructor: Constructor) {
        self.constructors.insert(language, constructor);
    }

    /// Instantiate a fresh parser for the given language.
    ///
    /// # Errors
    /// [`Error::UnsupportedLanguage`] when no constructor is registered.
    pub fn create(&self, language: LanguageKind) -> Result<Box<dyn StructuralParser + Send>> {
        self.constructors
            .get(&language)
            .map(|constructor| constructor())
            .ok_or_else(|| Error::UnsupportedLanguage(language.to_string()))
    }

    /// Instantiate a parser for the language derived from a path's extension.
    ///
    /// # Errors
    /// [`Error::UnsupportedLanguage`] for unmapped extensions or
    /// unregistered languages.
    pub fn create_for_path(&self, path: &Path) -> Result<Box<dyn StructuralParser + Send>> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let language = LanguageKind::from_extension(ext)
            .ok_or_else(|| Error::UnsupportedLanguage(ext.to_string()))?;
        self.create(language)
    }

    /// A registry with every built-in language registered.
    pub fn bootstrap() -> Self {
        let mut registry = Self::new();
        registry.register(LanguageKind::Python, || Box::new(PythonParser::new()));
        registry.register(LanguageKind::Java, || Box::new(JavaParser::new()));
        registry
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::bootstrap()
    }
}

/// Shared process-wide registry, seeded on first access.
pub fn global() -> &'static ParserRegistry {
    static REGISTRY: OnceLock<ParserRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ParserRegistry::bootstrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_for_registered_languages() {
        let registry = ParserRegistry::bootstrap();
        assert_eq!(
            registry.create(LanguageKind::Python).unwrap().language(),
            LanguageKind::Python
        );
        assert_eq!(
            registry.create_for_path(Path::new("Main.java")).unwrap().language(),
            LanguageKind::Java
        );
    }

    #[test]
    fn unmapped_extension_is_unsupported() {
        let registry = ParserRegistry::bootstrap();
        let err = registry.create_for_path(Path::new("script.rb")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(ext) if ext == "rb"));
    }

    #[test]
    fn empty_registry_rejects_everything() {
        let registry = ParserRegistry::new();
        let err = registry.create(LanguageKind::Python).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(_)));
    }
}
