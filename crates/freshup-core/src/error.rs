//! Error types for the project driver

use freshup_manifest::ManifestError;
use freshup_rewrite::RewriteError;
use std::path::PathBuf;

/// Errors raised while upgrading a project
///
/// Only the pre-flight variants abort a run; per-file errors are collected
/// into the [`RunResult`](crate::RunResult).
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    /// Project root does not exist
    #[error("project root not found: {0}")]
    RootNotFound(PathBuf),

    /// Project root is a file
    #[error("project root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Source discovery failed
    #[error("failed to walk project: {0}")]
    Walk(#[from] walkdir::Error),

    /// Manifest could not be updated
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// I/O error on a project file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be rewritten
    #[error("failed to rewrite {path}: {source}")]
    Rewrite {
        path: PathBuf,
        #[source]
        source: RewriteError,
    },
}

impl UpgradeError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create rewrite error for path
    pub fn rewrite(path: impl Into<PathBuf>, source: RewriteError) -> Self {
        Self::Rewrite {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for driver operations
pub type UpgradeResult<T> = Result<T, UpgradeError>;
