//! Node and text helpers shared by the rewrite passes

use tree_sitter::Node;

/// Named children of `node`, skipping comments
#[must_use]
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// First named, non-comment child of `node`
#[must_use]
pub fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    named_children(node).into_iter().next()
}

/// Check whether `node` has an anonymous token child of the given kind
///
/// Used for keywords that carry no field, e.g. `default` in
/// `export default` or `type` in `import type`.
#[must_use]
pub fn has_token(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == kind);
    found
}

/// Byte offset of the start of the line containing `pos`
#[must_use]
pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Byte offset just past the line break ending the line containing `pos`
///
/// Returns `text.len()` when the line is the last one and has no break.
#[must_use]
pub fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i + 1)
}

/// Leading whitespace of the line containing `pos`
#[must_use]
pub fn line_indent(text: &str, pos: usize) -> &str {
    let start = line_start(text, pos);
    let line = &text[start..];
    let width = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..width]
}
