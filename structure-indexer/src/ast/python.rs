//! Python structural extractor.
//!
//! Supports all five construct categories: imports, classes, free functions,
//! module-level variables, and the entry-point block. Extraction is a set of
//! small patterns plus pure node walks; there is no mutable traversal state,
//! so each category can be computed independently from the same tree.

use crate::ast::interface::StructuralParser;
use crate::ast::node_util::{
    decorator_line, doc_comment, nearest_ancestor, resolved_end_line, start_line, text,
};
use crate::ast::query::{capture_node, run_pattern};
use crate::errors::{Error, Result};
use crate::language::LanguageKind;
use crate::types::{
    ClassNode, EntryPointBlock, FileStructure, FunctionNode, GlobalVariable, ImportRecord,
    Parameter, Variable,
};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;
use tree_sitter::{Language, Node, Parser};

#[derive(Debug)]
pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    pub fn new() -> Self {
        Self { language: tree_sitter_python::LANGUAGE.into() }
    }

    /// Imports in document order. Plain imports yield one record per name;
    /// `from X import ...` records carry the source module.
    fn collect_imports(&self, root: Node, code: &[u8]) -> Vec<ImportRecord> {
        let mut imports = Vec::new();
        run_pattern(
            &self.language,
            root,
            code,
            "[(import_statement) (import_from_statement)] @import",
            |_, m| {
                let Some(node) = m.captures.first().map(|c| c.node) else { return };
                let line_number = start_line(&node);
                let module_node = node.child_by_field_name("module_name");
                let source_module = module_node.map(|module| text(code, &module));

                let mut walk = node.walk();
                for child in node.named_children(&mut walk) {
                    // The module itself is not an imported name.
                    if module_node.is_some_and(|module| module.id() == child.id()) {
                        continue;
                    }
                    let identifier = match child.kind() {
                        "dotted_name" => Some(text(code, &child)),
                        // `import x as y` / `from m import x as y`
                        "aliased_import" => child
                            .child_by_field_name("name")
                            .map(|inner| text(code, &inner)),
                        "wildcard_import" => Some("*".to_string()),
                        _ => None,
                    };
                    if let Some(identifier) = identifier {
                        imports.push(ImportRecord {
                            identifier,
                            source_module: source_module.clone(),
                            line_number,
                        });
                    }
                }
            },
        );
        imports
    }

    /// Classes and free functions in one pass over all function definitions:
    /// a function whose nearest class ancestor exists is a method of that
    /// class, otherwise it is a free function.
    fn collect_definitions(
        &self,
        root: Node,
        code: &[u8],
    ) -> (BTreeMap<String, ClassNode>, BTreeMap<String, FunctionNode>) {
        struct ClassDraft<'t> {
            node: Node<'t>,
            name: String,
            methods: Vec<(String, FunctionNode)>,
        }

        let mut class_nodes: Vec<Node> = Vec::new();
        run_pattern(&self.language, root, code, "(class_definition) @class", |_, m| {
            if let Some(node) = m.captures.first().map(|c| c.node) {
                class_nodes.push(node);
            }
        });

        let mut drafts: Vec<ClassDraft> = Vec::new();
        let mut draft_index_by_id: HashMap<usize, usize> = HashMap::new();
        for node in class_nodes {
            let Some(name_node) = node.child_by_field_name("name") else {
                warn!(line = start_line(&node), "class match without a name node; skipping");
                continue;
            };
            draft_index_by_id.insert(node.id(), drafts.len());
            drafts.push(ClassDraft { node, name: text(code, &name_node), methods: Vec::new() });
        }

        let mut functions: BTreeMap<String, FunctionNode> = BTreeMap::new();
        run_pattern(&self.language, root, code, "(function_definition) @function", |_, m| {
            let Some(node) = m.captures.first().map(|c| c.node) else { return };
            let Some(name_node) = node.child_by_field_name("name") else {
                warn!(line = start_line(&node), "function match without a name node; skipping");
                return;
            };
            let name = text(code, &name_node);
            let function = self.build_function(code, &node);
            let owner = nearest_ancestor(&node, "class_definition")
                .and_then(|class| draft_index_by_id.get(&class.id()).copied());
            match owner {
                Some(index) => drafts[index].methods.push((name, function)),
                None => {
                    // Last declaration with this name wins.
                    functions.insert(name, function);
                }
            }
        });

        let mut classes = BTreeMap::new();
        for draft in drafts {
            let mut methods = BTreeMap::new();
            for (name, method) in draft.methods {
                methods.insert(name, method);
            }
            let class_variables = draft
                .node
                .child_by_field_name("body")
                .map(|body| block_assignments(code, &body))
                .unwrap_or_default();
            classes.insert(
                draft.name.clone(),
                ClassNode {
                    name: draft.name,
                    methods,
                    class_variables,
                    doc_comment: doc_comment(code, &draft.node),
                    line_number: start_line(&draft.node),
                    end_line_number: resolved_end_line(&draft.node),
                },
            );
        }
        (classes, functions)
    }

    fn build_function(&self, code: &[u8], node: &Node) -> FunctionNode {
        let line_number = start_line(node);
        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| {
                let mut out = Vec::new();
                let mut walk = params.walk();
                for param in params.named_children(&mut walk) {
                    if param.kind() == "identifier" {
                        out.push(Parameter { name: text(code, &param), line_number });
                    }
                }
                out
            })
            .unwrap_or_default();
        let variables = node
            .child_by_field_name("body")
            .map(|body| block_assignments(code, &body))
            .unwrap_or_default();

        FunctionNode {
            name: node.child_by_field_name("name").map(|n| text(code, &n)),
            doc_comment: doc_comment(code, node),
            variables,
            parameters,
            line_number,
            end_line_number: resolved_end_line(node),
            is_async: is_async(code, node),
            decorator_line_number: decorator_line(node, "decorator"),
        }
    }

    /// First module-level conditional comparing `__name__` against
    /// `"__main__"`; its consequence block is the entry point and the search
    /// stops there.
    fn find_entry_point(&self, root: Node, code: &[u8]) -> Option<EntryPointBlock> {
        let mut block = None;
        run_pattern(
            &self.language,
            root,
            code,
            "(module (if_statement condition: (comparison_operator) @condition \
             consequence: (block) @consequence))",
            |query, m| {
                if block.is_some() {
                    return;
                }
                let Some(condition) = capture_node(query, m, "condition") else { return };
                let Some(consequence) = capture_node(query, m, "consequence") else { return };
                if compares_name_to_main(code, &condition) {
                    block = Some(EntryPointBlock {
                        line_number: start_line(&consequence),
                        source: text(code, &consequence),
                    });
                }
            },
        );
        block
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralParser for PythonParser {
    fn language(&self) -> LanguageKind {
        LanguageKind::Python
    }

    fn parse(&self, source: &[u8]) -> Result<FileStructure> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser
            .parse(source, None)
            .ok_or(Error::Syntax { language: LanguageKind::Python })?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(Error::Syntax { language: LanguageKind::Python });
        }

        let imports = self.collect_imports(root, source);
        let (classes, functions) = self.collect_definitions(root, source);
        let global_variables = block_assignments(source, &root)
            .into_iter()
            .map(|v| GlobalVariable { name: v.name, line_number: v.line_number })
            .collect();
        let main_block = self.find_entry_point(root, source);

        Ok(FileStructure {
            imports,
            classes,
            functions,
            global_variables: Some(global_variables),
            main_block,
            relative_path: String::new(),
        })
    }
}

/// Simple `name = value` statements at the top level of a block (or of the
/// module itself). Nested and conditional assignments are not descended into.
fn block_assignments(code: &[u8], block: &Node) -> Vec<Variable> {
    let mut out = Vec::new();
    let mut walk = block.walk();
    for statement in block.named_children(&mut walk) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let mut inner = statement.walk();
        for expression in statement.named_children(&mut inner) {
            if expression.kind() != "assignment" {
                continue;
            }
            let Some(left) = expression.child_by_field_name("left") else { continue };
            if left.kind() == "identifier" {
                out.push(Variable {
                    name: text(code, &left),
                    line_number: start_line(&statement),
                });
            }
        }
    }
    out
}

/// The grammar marks async definitions with a leading `async` token; the
/// textual prefix check is the fallback for grammar versions that do not.
fn is_async(code: &[u8], node: &Node) -> bool {
    if let Some(first) = node.child(0) {
        if first.kind() == "async" {
            return true;
        }
    }
    text(code, node).starts_with("async")
}

fn compares_name_to_main(code: &[u8], condition: &Node) -> bool {
    let mut has_reserved_identifier = false;
    let mut has_reserved_literal = false;
    let mut walk = condition.walk();
    for child in condition.named_children(&mut walk) {
        match child.kind() {
            "identifier" if text(code, &child) == "__name__" => has_reserved_identifier = true,
            "string" => {
                let literal = text(code, &child);
                if literal.trim_matches(|c| c == '"' || c == '\'') == "__main__" {
                    has_reserved_literal = true;
                }
            }
            _ => {}
        }
    }
    has_reserved_identifier && has_reserved_literal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> FileStructure {
        PythonParser::new().parse(source.as_bytes()).expect("parse")
    }

    const MODULE: &str = "\
import os
from pathlib import Path

RETRIES = 3
TIMEOUT = 30


\"fetches a url\"
def fetch(url, timeout):
    retries = 2
    if retries:
        fallback = 1
    return url


@register
@cache
def cached_fetch(url):
    return url


async def poll(url):
    return url


class Store:
    capacity = 10

    def put(self, key):
        slot = key
        return slot

    def get(self, key):
        return key


if __name__ == \"__main__\":
    handle = Store()
";

    #[test]
    fn imports_in_document_order() {
        let structure = parse(MODULE);
        let seen: Vec<(&str, Option<&str>, usize)> = structure
            .imports
            .iter()
            .map(|i| (i.identifier.as_str(), i.source_module.as_deref(), i.line_number))
            .collect();
        assert_eq!(seen, [("os", None, 1), ("Path", Some("pathlib"), 2)]);
    }

    #[test]
    fn globals_are_module_top_level_only() {
        let structure = parse(MODULE);
        let globals = structure.global_variables.expect("python has globals");
        let seen: Vec<(&str, usize)> =
            globals.iter().map(|g| (g.name.as_str(), g.line_number)).collect();
        // `handle` sits inside the entry-point block, `fallback` inside an if.
        assert_eq!(seen, [("RETRIES", 4), ("TIMEOUT", 5)]);
    }

    #[test]
    fn free_functions_and_scope_classification() {
        let structure = parse(MODULE);
        let names: Vec<&str> = structure.functions.keys().map(String::as_str).collect();
        assert_eq!(names, ["cached_fetch", "fetch", "poll"]);

        let fetch = &structure.functions["fetch"];
        assert_eq!(fetch.line_number, 9);
        assert_eq!(fetch.end_line_number, 13);
        assert!(!fetch.is_async);
        assert_eq!(fetch.doc_comment.as_deref(), Some("\"fetches a url\""));
        let params: Vec<(&str, usize)> =
            fetch.parameters.iter().map(|p| (p.name.as_str(), p.line_number)).collect();
        assert_eq!(params, [("url", 9), ("timeout", 9)]);
        // Only the body-top-level assignment is recorded.
        let vars: Vec<(&str, usize)> =
            fetch.variables.iter().map(|v| (v.name.as_str(), v.line_number)).collect();
        assert_eq!(vars, [("retries", 10)]);
    }

    #[test]
    fn stacked_decorators_record_the_earliest_line() {
        let structure = parse(MODULE);
        let cached = &structure.functions["cached_fetch"];
        assert_eq!(cached.line_number, 18);
        assert_eq!(cached.decorator_line_number, Some(16));
        assert!(cached.decorator_line_number.unwrap() < cached.line_number);
    }

    #[test]
    fn async_flag_from_grammar_token() {
        let structure = parse(MODULE);
        assert!(structure.functions["poll"].is_async);
        assert!(!structure.functions["fetch"].is_async);
    }

    #[test]
    fn class_span_and_members() {
        let structure = parse(MODULE);
        let store = &structure.classes["Store"];
        assert_eq!(store.line_number, 26);
        assert_eq!(store.end_line_number, 34);
        assert!(store.end_line_number >= store.line_number);

        let vars: Vec<(&str, usize)> =
            store.class_variables.iter().map(|v| (v.name.as_str(), v.line_number)).collect();
        assert_eq!(vars, [("capacity", 27)]);

        let put = &store.methods["put"];
        assert_eq!((put.line_number, put.end_line_number), (29, 31));
        assert!(put.line_number >= store.line_number);
        assert!(put.end_line_number <= store.end_line_number);
        assert_eq!(put.variables, vec![Variable { name: "slot".into(), line_number: 30 }]);
        // Methods never leak into the free-function map.
        assert!(!structure.functions.contains_key("put"));
    }

    #[test]
    fn entry_point_block_is_captured_once() {
        let structure = parse(MODULE);
        let main = structure.main_block.expect("entry point present");
        assert_eq!(main.line_number, 38);
        assert!(main.source.contains("handle = Store()"));
    }

    #[test]
    fn unrelated_module_conditionals_do_not_qualify() {
        let structure = parse("import sys\n\nif sys.argv:\n    x = 1\n");
        assert!(structure.main_block.is_none());
    }

    #[test]
    fn reversed_comparison_still_qualifies() {
        let structure = parse("if '__main__' == __name__:\n    run = 1\n");
        let main = structure.main_block.expect("entry point present");
        assert_eq!(main.line_number, 2);
    }

    #[test]
    fn duplicate_method_last_declaration_wins() {
        let source = "\
class Dup:
    def ping(self):
        return 1

    def ping(self):
        return 2
";
        let structure = parse(source);
        let dup = &structure.classes["Dup"];
        assert_eq!(dup.methods.len(), 1);
        assert_eq!(dup.methods["ping"].line_number, 5);
    }

    #[test]
    fn wildcard_and_aliased_imports() {
        let structure = parse("from os.path import *\nimport numpy as np\n");
        let seen: Vec<(&str, Option<&str>)> = structure
            .imports
            .iter()
            .map(|i| (i.identifier.as_str(), i.source_module.as_deref()))
            .collect();
        assert_eq!(seen, [("*", Some("os.path")), ("numpy", None)]);
    }

    #[test]
    fn grammar_rejection_is_a_syntax_error() {
        let err = PythonParser::new().parse(b"def broken(:\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { language: LanguageKind::Python }));
    }
}
