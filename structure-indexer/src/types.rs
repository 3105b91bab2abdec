//! Normalized structural description of one source file.
//!
//! The model is intentionally language-agnostic: a language that has no
//! concept for a category (e.g. module-level variables in Java) leaves the
//! corresponding field absent, and consumers must not treat absence as an
//! error. A `FileStructure` is built once per parse call from one syntax-tree
//! snapshot and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One imported name, recorded in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Imported identifier as written in the source.
    pub identifier: String,

    /// Module the identifier comes from, for `from X import Y`-style imports.
    #[serde(default)]
    pub source_module: Option<String>,

    /// 1-based declaration line.
    pub line_number: usize,
}

/// A named assignment at the top level of some scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub line_number: usize,
}

/// A declared parameter. The line number is the declaration line of the
/// enclosing construct, not the parameter's own position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub line_number: usize,
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionNode {
    /// Absent only for anonymous constructs; callers tolerate omission.
    #[serde(default)]
    pub name: Option<String>,

    /// Doc comment attached to this construct, if any.
    #[serde(default)]
    pub doc_comment: Option<String>,

    /// Assignments at the top level of the body, in order.
    #[serde(default)]
    pub variables: Vec<Variable>,

    /// Declared parameters, in order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// 1-based declaration line.
    pub line_number: usize,

    /// 1-based last line, confirmed against body-bearing descendants.
    pub end_line_number: usize,

    pub is_async: bool,

    /// Line of the earliest stacked decorator, strictly above the
    /// declaration line when present.
    #[serde(default)]
    pub decorator_line_number: Option<usize>,
}

/// A class declaration with its methods and class-level variables.
///
/// Method keys are unique; when two declarations share a name, the last one
/// in document order wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNode {
    pub name: String,

    #[serde(default)]
    pub methods: BTreeMap<String, FunctionNode>,

    #[serde(default)]
    pub class_variables: Vec<Variable>,

    #[serde(default)]
    pub doc_comment: Option<String>,

    pub line_number: usize,

    pub end_line_number: usize,
}

/// A module-level variable, for languages that have the concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub line_number: usize,
}

/// The source region guarded by a module-level "run only when executed
/// directly" conditional. At most one per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointBlock {
    /// 1-based first line of the guarded block.
    pub line_number: usize,
    /// Raw source span of the guarded block.
    pub source: String,
}

/// Aggregate structural description of one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStructure {
    /// Imports in document order.
    #[serde(default)]
    pub imports: Vec<ImportRecord>,

    /// Classes keyed by name; last declaration with a name wins.
    #[serde(default)]
    pub classes: BTreeMap<String, ClassNode>,

    /// Free functions keyed by name; last declaration with a name wins.
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionNode>,

    /// Module-level variables in document order; `None` when the language
    /// has no such concept.
    #[serde(default)]
    pub global_variables: Option<Vec<GlobalVariable>>,

    /// Entry-point block; `None` when no qualifying conditional exists or
    /// the language has no such concept.
    #[serde(default)]
    pub main_block: Option<EntryPointBlock>,

    /// Repository-relative path, attached by the caller (never the parser).
    #[serde(default)]
    pub relative_path: String,
}

impl FileStructure {
    /// Attach the repository-relative path after parsing.
    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = relative_path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileStructure {
        let method = FunctionNode {
            name: Some("ping".into()),
            doc_comment: None,
            variables: vec![Variable { name: "out".into(), line_number: 9 }],
            parameters: vec![Parameter { name: "self".into(), line_number: 8 }],
            line_number: 8,
            end_line_number: 10,
            is_async: false,
            decorator_line_number: Some(7),
        };
        let mut methods = BTreeMap::new();
        methods.insert("ping".to_string(), method);

        let mut classes = BTreeMap::new();
        classes.insert(
            "Server".to_string(),
            ClassNode {
                name: "Server".into(),
                methods,
                class_variables: vec![Variable { name: "port".into(), line_number: 6 }],
                doc_comment: Some("\"network endpoint\"".into()),
                line_number: 5,
                end_line_number: 10,
            },
        );

        FileStructure {
            imports: vec![
                ImportRecord { identifier: "os".into(), source_module: None, line_number: 1 },
                ImportRecord {
                    identifier: "Path".into(),
                    source_module: Some("pathlib".into()),
                    line_number: 2,
                },
            ],
            classes,
            functions: BTreeMap::new(),
            global_variables: Some(vec![
                GlobalVariable { name: "RETRIES".into(), line_number: 3 },
                GlobalVariable { name: "TIMEOUT".into(), line_number: 4 },
            ]),
            main_block: Some(EntryPointBlock { line_number: 12, source: "run()".into() }),
            relative_path: "src/server.py".into(),
        }
    }

    #[test]
    fn serde_round_trip_preserves_fields_and_order() {
        let original = sample();
        let json = serde_json::to_string_pretty(&original).expect("serialize");
        let restored: FileStructure = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(original, restored);
        // List order is part of the contract.
        let names: Vec<&str> =
            restored.imports.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(names, ["os", "Path"]);
        let globals: Vec<&str> = restored
            .global_variables
            .as_ref()
            .expect("globals present")
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(globals, ["RETRIES", "TIMEOUT"]);
    }

    #[test]
    fn serialized_field_names_are_stable() {
        let json = serde_json::to_value(sample()).expect("serialize");
        let object = json.as_object().expect("object");
        for key in ["imports", "classes", "functions", "global_variables", "main_block", "relative_path"]
        {
            assert!(object.contains_key(key), "missing field {key}");
        }
    }

    #[test]
    fn absent_categories_stay_absent() {
        let json = serde_json::to_string(&FileStructure::default()).expect("serialize");
        let restored: FileStructure = serde_json::from_str(&json).expect("deserialize");
        assert!(restored.global_variables.is_none());
        assert!(restored.main_block.is_none());
    }
}
