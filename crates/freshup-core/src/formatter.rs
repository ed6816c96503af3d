//! External formatter boundary

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// What happened when a file was handed to the formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Formatter exited successfully
    Formatted,
    /// Formatting is disabled
    Skipped,
    /// Formatter could not run or exited non-zero
    Failed {
        /// Exit code, if the process ran
        code: Option<i32>,
        /// Captured error output
        stderr: String,
    },
}

/// Formats one source file in place
#[async_trait]
pub trait SourceFormatter: Send + Sync {
    /// Format `path`; failures are reported, never raised
    async fn format(&self, path: &Path) -> FormatOutcome;
}

/// Runs `<program> fmt <file>`
#[derive(Debug, Clone)]
pub struct DenoFormatter {
    program: String,
}

impl DenoFormatter {
    /// Create formatter invoking `program`
    #[inline]
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl SourceFormatter for DenoFormatter {
    async fn format(&self, path: &Path) -> FormatOutcome {
        let output = Command::new(&self.program)
            .arg("fmt")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;
        match output {
            Ok(out) if out.status.success() => FormatOutcome::Formatted,
            Ok(out) => FormatOutcome::Failed {
                code: out.status.code(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            },
            Err(e) => FormatOutcome::Failed {
                code: None,
                stderr: e.to_string(),
            },
        }
    }
}

/// Leaves files as written
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

#[async_trait]
impl SourceFormatter for NoopFormatter {
    async fn format(&self, _path: &Path) -> FormatOutcome {
        FormatOutcome::Skipped
    }
}
