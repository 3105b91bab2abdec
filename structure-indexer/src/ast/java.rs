//! Java structural extractor.
//!
//! Supports imports, classes, and functions. Java has no module-level
//! variables or direct-execution guard, so `global_variables` and
//! `main_block` stay absent. Annotations play the decorator role; a line is
//! recorded only when the earliest annotation sits strictly above the
//! declaration line.

use crate::ast::interface::StructuralParser;
use crate::ast::node_util::{nearest_ancestor, resolved_end_line, start_line, text};
use crate::ast::query::run_pattern;
use crate::errors::{Error, Result};
use crate::language::LanguageKind;
use crate::types::{ClassNode, FileStructure, FunctionNode, ImportRecord, Parameter, Variable};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;
use tree_sitter::{Language, Node, Parser};

#[derive(Debug)]
pub struct JavaParser {
    language: Language,
}

impl JavaParser {
    pub fn new() -> Self {
        Self { language: tree_sitter_java::LANGUAGE.into() }
    }

    fn collect_imports(&self, root: Node, code: &[u8]) -> Vec<ImportRecord> {
        let mut imports = Vec::new();
        run_pattern(&self.language, root, code, "(import_declaration) @import", |_, m| {
            if let Some(node) = m.captures.first().map(|c| c.node) {
                imports.push(ImportRecord {
                    identifier: text(code, &node),
                    source_module: None,
                    line_number: start_line(&node),
                });
            }
        });
        imports
    }

    fn collect_definitions(
        &self,
        root: Node,
        code: &[u8],
    ) -> (BTreeMap<String, ClassNode>, BTreeMap<String, FunctionNode>) {
        struct ClassDraft<'t> {
            node: Node<'t>,
            name: String,
            line: usize,
            methods: Vec<(String, FunctionNode)>,
        }

        let mut class_nodes: Vec<Node> = Vec::new();
        run_pattern(&self.language, root, code, "(class_declaration) @class", |_, m| {
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
            drafts.push(ClassDraft {
                node,
                name: text(code, &name_node),
                // Java declaration nodes span their modifier list, so the
                // name row is the declaration line.
                line: start_line(&name_node),
                methods: Vec::new(),
            });
        }

        let mut functions: BTreeMap<String, FunctionNode> = BTreeMap::new();
        run_pattern(&self.language, root, code, "(method_declaration) @method", |_, m| {
            let Some(node) = m.captures.first().map(|c| c.node) else { return };
            let Some(name_node) = node.child_by_field_name("name") else {
                warn!(line = start_line(&node), "method match without a name node; skipping");
                return;
            };
            let name = text(code, &name_node);
            let method = self.build_method(code, &node);
            let owner = nearest_ancestor(&node, "class_declaration")
                .and_then(|class| draft_index_by_id.get(&class.id()).copied());
            match owner {
                Some(index) => drafts[index].methods.push((name, method)),
                None => {
                    functions.insert(name, method);
                }
            }
        });

        let mut classes = BTreeMap::new();
        for draft in drafts {
            let mut methods = BTreeMap::new();
            for (name, method) in draft.methods {
                methods.insert(name, method);
            }
            classes.insert(
                draft.name.clone(),
                ClassNode {
                    name: draft.name,
                    methods,
                    class_variables: class_fields(code, &draft.node),
                    doc_comment: None,
                    line_number: draft.line,
                    end_line_number: resolved_end_line(&draft.node),
                },
            );
        }
        (classes, functions)
    }

    fn build_method(&self, code: &[u8], node: &Node) -> FunctionNode {
        // The node span starts at the modifier list (annotations included),
        // so the name row is the declaration line.
        let line_number = node
            .child_by_field_name("name")
            .map(|name| start_line(&name))
            .unwrap_or_else(|| start_line(node));
        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| {
                let mut out = Vec::new();
                let mut walk = params.walk();
                for param in params.named_children(&mut walk) {
                    if param.kind() != "formal_parameter" {
                        continue;
                    }
                    if let Some(name) = param.child_by_field_name("name") {
                        out.push(Parameter { name: text(code, &name), line_number });
                    }
                }
                out
            })
            .unwrap_or_default();
        let variables = node
            .child_by_field_name("body")
            .map(|body| body_assignments(code, &body))
            .unwrap_or_default();

        FunctionNode {
            name: node.child_by_field_name("name").map(|n| text(code, &n)),
            doc_comment: None,
            variables,
            parameters,
            line_number,
            end_line_number: resolved_end_line(node),
            is_async: false,
            decorator_line_number: annotation_line(node, line_number),
        }
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralParser for JavaParser {
    fn language(&self) -> LanguageKind {
        LanguageKind::Java
    }

    fn parse(&self, source: &[u8]) -> Result<FileStructure> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser
            .parse(source, None)
            .ok_or(Error::Syntax { language: LanguageKind::Java })?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(Error::Syntax { language: LanguageKind::Java });
        }

        let imports = self.collect_imports(root, source);
        let (classes, functions) = self.collect_definitions(root, source);

        Ok(FileStructure {
            imports,
            classes,
            functions,
            global_variables: None,
            main_block: None,
            relative_path: String::new(),
        })
    }
}

/// Field declarations at the top level of the class body.
fn class_fields(code: &[u8], class_node: &Node) -> Vec<Variable> {
    let mut out = Vec::new();
    let Some(body) = class_node.child_by_field_name("body") else { return out };
    let mut walk = body.walk();
    for member in body.named_children(&mut walk) {
        if member.kind() != "field_declaration" {
            continue;
        }
        let mut inner = member.walk();
        for declarator in member.children_by_field_name("declarator", &mut inner) {
            if let Some(name) = declarator.child_by_field_name("name") {
                out.push(Variable {
                    name: text(code, &name),
                    line_number: start_line(&member),
                });
            }
        }
    }
    out
}

/// Plain `name = value;` statements at the top level of a method body.
fn body_assignments(code: &[u8], body: &Node) -> Vec<Variable> {
    let mut out = Vec::new();
    let mut walk = body.walk();
    for statement in body.named_children(&mut walk) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let mut inner = statement.walk();
        for expression in statement.named_children(&mut inner) {
            if expression.kind() != "assignment_expression" {
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

/// Earliest annotation in the construct's modifier list, recorded only when
/// it sits strictly above the declaration line.
fn annotation_line(node: &Node, declaration_line: usize) -> Option<usize> {
    let mut walk = node.walk();
    for child in node.named_children(&mut walk) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner = child.walk();
        for modifier in child.named_children(&mut inner) {
            if matches!(modifier.kind(), "annotation" | "marker_annotation") {
                return Some(modifier.start_position().row + 1)
                    .filter(|&line| line < declaration_line);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
import java.util.List;
import java.util.Map;

public class Greeter {
    private int count;

    @Override
    public String greet(String name) {
        count = 1;
        return name;
    }
}
";

    fn parse(source: &str) -> FileStructure {
        JavaParser::new().parse(source.as_bytes()).expect("parse")
    }

    #[test]
    fn imports_keep_statement_text_and_order() {
        let structure = parse(SOURCE);
        let seen: Vec<(&str, usize)> = structure
            .imports
            .iter()
            .map(|i| (i.identifier.as_str(), i.line_number))
            .collect();
        assert_eq!(seen, [("import java.util.List;", 1), ("import java.util.Map;", 2)]);
    }

    #[test]
    fn unsupported_categories_stay_absent() {
        let structure = parse(SOURCE);
        assert!(structure.global_variables.is_none());
        assert!(structure.main_block.is_none());
    }

    #[test]
    fn class_members_and_spans() {
        let structure = parse(SOURCE);
        let greeter = &structure.classes["Greeter"];
        assert_eq!((greeter.line_number, greeter.end_line_number), (4, 12));
        assert_eq!(
            greeter.class_variables,
            vec![Variable { name: "count".into(), line_number: 5 }]
        );

        let greet = &greeter.methods["greet"];
        assert_eq!((greet.line_number, greet.end_line_number), (8, 11));
        assert!(greet.line_number >= greeter.line_number);
        assert!(greet.end_line_number <= greeter.end_line_number);
        assert_eq!(greet.parameters, vec![Parameter { name: "name".into(), line_number: 8 }]);
        assert_eq!(greet.variables, vec![Variable { name: "count".into(), line_number: 9 }]);
        assert!(!greet.is_async);
        // Methods never double as free functions.
        assert!(structure.functions.is_empty());
    }

    #[test]
    fn annotation_line_is_strictly_above_declaration() {
        let structure = parse(SOURCE);
        let greet = &structure.classes["Greeter"].methods["greet"];
        assert_eq!(greet.decorator_line_number, Some(7));

        // Same-line annotation carries no decorator line.
        let inline = parse(
            "class A {\n    @Deprecated void ping() {\n    }\n}\n",
        );
        assert_eq!(inline.classes["A"].methods["ping"].decorator_line_number, None);
    }

    #[test]
    fn grammar_rejection_is_a_syntax_error() {
        let err = JavaParser::new().parse(b"class {{{\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { language: LanguageKind::Java }));
    }
}
