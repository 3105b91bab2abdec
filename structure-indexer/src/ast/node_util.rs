//! Shared node helpers for the language extractors.

use tree_sitter::Node;

/// 1-based start line of a node.
pub fn start_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Node text with safe bounds against the source buffer.
pub fn text(code: &[u8], node: &Node) -> String {
    let len = code.len();
    let start = node.start_byte().min(len);
    let end = node.end_byte().min(len).max(start);
    String::from_utf8_lossy(&code[start..end]).into_owned()
}

/// Confirmed 1-based end line of a construct.
///
/// A node's declared end position can undercount the true extent for some
/// grammars, so the end line is the maximum over the node itself and every
/// body-bearing descendant, confirmed recursively.
pub fn resolved_end_line(node: &Node) -> usize {
    let mut last = node.end_position().row + 1;
    let mut walk = node.walk();
    for child in node.named_children(&mut walk) {
        last = last.max(child.end_position().row + 1);
        if child.child_by_field_name("body").is_some() {
            last = last.max(resolved_end_line(&child));
        }
    }
    last
}

/// Line of the earliest decorator stacked directly above a construct.
///
/// Walks backward through preceding siblings while each is a decorator node
/// and stops at the first that is not. The recorded line must be strictly
/// above the construct's own declaration line.
pub fn decorator_line(node: &Node, decorator_kind: &str) -> Option<usize> {
    let mut earliest = None;
    let mut prev = node.prev_sibling();
    while let Some(sibling) = prev {
        if sibling.kind() != decorator_kind {
            break;
        }
        earliest = Some(sibling.start_position().row + 1);
        prev = sibling.prev_sibling();
    }
    earliest.filter(|&line| line < start_line(node))
}

/// Doc comment from the immediately preceding named sibling, when that
/// sibling is a string literal (possibly wrapped in a bare expression
/// statement, which is the shape grammars produce at statement level).
pub fn doc_comment(code: &[u8], node: &Node) -> Option<String> {
    let sibling = node.prev_named_sibling()?;
    if sibling.kind() == "string" {
        return Some(text(code, &sibling));
    }
    if sibling.kind() == "expression_statement" && sibling.named_child_count() == 1 {
        let inner = sibling.named_child(0)?;
        if inner.kind() == "string" {
            return Some(text(code, &inner));
        }
    }
    None
}

/// Nearest ancestor of the given kind, walking the full chain to the root
/// without stopping at intervening control-flow nodes.
pub fn nearest_ancestor<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if ancestor.kind() == kind {
            return Some(ancestor);
        }
        current = ancestor.parent();
    }
    None
}
