//! Error types for the rewrite engine

use freshup_syntax::SyntaxError;

/// Errors raised while rewriting one source file
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// Parsing or edit application failed
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Result alias for rewrite operations
pub type RewriteResult<T> = Result<T, RewriteError>;
