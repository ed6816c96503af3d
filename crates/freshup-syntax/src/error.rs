//! Error types for source parsing and edit application

use std::ops::Range;
use std::path::PathBuf;

/// Errors raised while turning source text into a tree or applying edits
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// File extension has no grammar
    #[error("unsupported source extension: {path}")]
    UnsupportedExtension { path: PathBuf },

    /// Grammar could not be loaded into the parser
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// Parser returned no tree
    #[error("parser produced no tree")]
    ParseFailed,

    /// Source contains syntax the grammar rejects
    #[error("syntax error at {line}:{column}")]
    InvalidSyntax { line: usize, column: usize },

    /// Two recorded edits touch the same bytes
    #[error("overlapping edits at {first:?} and {second:?}")]
    OverlappingEdit {
        first: Range<usize>,
        second: Range<usize>,
    },
}

impl SyntaxError {
    /// Create unsupported-extension error for path
    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedExtension { path: path.into() }
    }
}

/// Result alias for syntax operations
pub type SyntaxResult<T> = Result<T, SyntaxError>;
