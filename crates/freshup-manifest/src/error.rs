//! Error types for the manifest updater

use std::path::PathBuf;

/// Errors raised while reading, editing or writing a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// I/O error on the manifest file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON with comments
    #[error("syntax error in {path}: {message}")]
    Syntax { path: PathBuf, message: String },

    /// A known key holds a value of the wrong type
    #[error("invalid manifest: `{key}` must be {expected}")]
    InvalidShape { key: String, expected: &'static str },

    /// Edited manifest could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ManifestError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create syntax error for path
    pub fn syntax(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file() {
        let err = ManifestError::syntax("deno.json", "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "syntax error in deno.json: expected value at line 1"
        );

        let err = ManifestError::InvalidShape {
            key: "tasks".into(),
            expected: "an object",
        };
        assert_eq!(err.to_string(), "invalid manifest: `tasks` must be an object");
    }
}
