//! Parsed source file
//!
//! A [`SourceUnit`] owns one file's text together with its tree. The tree is
//! read-only; rewrites are recorded in an [`EditSet`](crate::EditSet) and
//! applied to the text once the pass is over.

use crate::error::{SyntaxError, SyntaxResult};
use crate::language::SourceLanguage;
use tree_sitter::{Node, Parser, Tree};

/// One file's text plus its parsed tree
#[derive(Debug)]
pub struct SourceUnit {
    language: SourceLanguage,
    text: String,
    tree: Tree,
}

impl SourceUnit {
    /// Parse source text
    ///
    /// # Errors
    /// - `SyntaxError::ParserInit` if the grammar cannot be loaded
    /// - `SyntaxError::ParseFailed` if the parser returns no tree
    /// - `SyntaxError::InvalidSyntax` if the tree contains error nodes
    pub fn parse(text: impl Into<String>, language: SourceLanguage) -> SyntaxResult<Self> {
        let text = text.into();

        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::ParserInit(e.to_string()))?;

        let tree = parser.parse(&text, None).ok_or(SyntaxError::ParseFailed)?;

        if let Some(bad) = first_error(tree.root_node()) {
            let point = bad.start_position();
            return Err(SyntaxError::InvalidSyntax {
                line: point.row + 1,
                column: point.column + 1,
            });
        }

        Ok(Self {
            language,
            text,
            tree,
        })
    }

    /// Grammar the unit was parsed with
    #[inline]
    #[must_use]
    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Full source text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Root `program` node
    #[inline]
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node
    #[inline]
    #[must_use]
    pub fn node_text(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
