//! Single-pattern query execution.
//!
//! Each extraction concern runs one small pattern at a time so that a
//! pattern that does not compile for the active grammar version is skipped
//! in isolation instead of breaking the whole parse.

use tracing::warn;
use tree_sitter::{Language, Node, Query, QueryCursor, QueryMatch, StreamingIterator};

/// Run one pattern against a subtree, invoking `on_match` per match in
/// document order. A pattern that fails to compile is logged and skipped.
///
/// `QueryCursor::matches` is a `StreamingIterator`, so the callback receives
/// the `QueryMatch` by reference; captured `Node`s may outlive it.
pub fn run_pattern<'tree, F>(language: &Language, root: Node<'tree>, code: &[u8], pattern: &str, mut on_match: F)
where
    F: FnMut(&Query, &QueryMatch<'_, 'tree>),
{
    let query = match Query::new(language, pattern) {
        Ok(query) => query,
        Err(err) => {
            warn!(error = %err, "query pattern failed to compile; skipping");
            return;
        }
    };
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, root, code);
    while let Some(m) = matches.next() {
        on_match(&query, m);
    }
}

/// The first captured node with the given capture name, if present.
pub fn capture_node<'t>(query: &Query, m: &QueryMatch<'_, 't>, name: &str) -> Option<Node<'t>> {
    let index = query.capture_index_for_name(name)?;
    m.captures
        .iter()
        .find(|capture| capture.index == index)
        .map(|capture| capture.node)
}
