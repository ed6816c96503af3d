//! Per-file rewrite state

use crate::error::RewriteResult;
use crate::state::ImportState;
use freshup_syntax::{EditSet, Node, SourceUnit};
use std::path::Path;

/// Mutable state owned by one file's rewrite pass
///
/// The tree stays read-only; every pass records into `edits` and the
/// accumulated import names live in `imports` until the import rewrite
/// consumes them.
#[derive(Debug)]
pub struct FilePass<'a> {
    unit: &'a SourceUnit,
    path: &'a Path,
    /// Recorded text edits
    pub edits: EditSet,
    /// Names to ensure imported
    pub imports: ImportState,
    /// Legacy UI symbols dropped from imports
    pub removed_symbols: Vec<String>,
    /// Functions left untouched because they cannot be rewritten safely
    pub warnings: Vec<String>,
}

impl<'a> FilePass<'a> {
    /// Start a pass over `unit`
    #[must_use]
    pub fn new(unit: &'a SourceUnit, path: &'a Path) -> Self {
        Self {
            unit,
            path,
            edits: EditSet::new(),
            imports: ImportState::new(),
            removed_symbols: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Parsed unit
    #[inline]
    #[must_use]
    pub fn unit(&self) -> &'a SourceUnit {
        self.unit
    }

    /// Path used for diagnostics
    #[inline]
    #[must_use]
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Source text of a node
    #[inline]
    #[must_use]
    pub fn text(&self, node: Node<'a>) -> &'a str {
        self.unit.node_text(node)
    }

    /// Record a diagnostic for a construct left as-is
    pub fn warn(&mut self, node: Node<'a>, message: &str) {
        let line = node.start_position().row + 1;
        tracing::warn!(path = %self.path.display(), line, "{message}");
        self.warnings
            .push(format!("{}:{line}: {message}", self.path.display()));
    }

    /// Apply recorded edits to the unit's text
    ///
    /// # Errors
    /// `SyntaxError::OverlappingEdit` if two passes touched the same bytes.
    pub fn render(&self) -> RewriteResult<String> {
        Ok(self.edits.apply(self.unit.text())?)
    }
}
