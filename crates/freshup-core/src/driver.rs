//! Project upgrade driver
//!
//! Phases run in order: pre-flight root check, manifest update, source
//! discovery, then every file through [`upgrade_file`] with bounded
//! concurrency. Only the pre-flight check is fatal.

use crate::config::UpgradeConfig;
use crate::discovery::discover_sources;
use crate::error::{UpgradeError, UpgradeResult};
use crate::formatter::{DenoFormatter, NoopFormatter, SourceFormatter};
use crate::result::{FileFailure, RunResult};
use crate::task::upgrade_file;
use freshup_manifest::update_manifest;
use futures::stream::{self, StreamExt};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

/// Upgrades one Fresh project
pub struct ProjectUpgrader {
    config: UpgradeConfig,
    formatter: Arc<dyn SourceFormatter>,
}

impl std::fmt::Debug for ProjectUpgrader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectUpgrader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProjectUpgrader {
    /// Create upgrader; the formatter follows `config.format`
    #[must_use]
    pub fn new(config: UpgradeConfig) -> Self {
        let formatter: Arc<dyn SourceFormatter> = if config.format {
            Arc::new(DenoFormatter::new(config.formatter_program.clone()))
        } else {
            Arc::new(NoopFormatter)
        };
        Self { config, formatter }
    }

    /// Create with custom formatter
    #[must_use]
    pub fn with_formatter(config: UpgradeConfig, formatter: Arc<dyn SourceFormatter>) -> Self {
        Self { config, formatter }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &UpgradeConfig {
        &self.config
    }

    /// Run the upgrade
    ///
    /// # Errors
    /// - `UpgradeError::RootNotFound` / `NotADirectory` / `Io` if the root
    ///   cannot be used
    /// - `UpgradeError::Walk` if source discovery fails
    pub async fn run(&self) -> UpgradeResult<RunResult> {
        let root = self.config.root.as_path();
        preflight(root).await?;

        let mut result = RunResult::default();

        tracing::info!(root = %root.display(), "updating manifest");
        match update_manifest(root).await {
            Ok(update) => {
                result.config_updated = update.written;
                result.manifest_path = update.path;
            }
            Err(e) => {
                tracing::error!(error = %e, "manifest update failed");
                result.errors += 1;
                result.manifest_error = Some(e.to_string());
            }
        }

        let files = discover_sources(root)?;
        tracing::info!(count = files.len(), concurrency = self.config.concurrency, "rewriting sources");

        let formatter = self.formatter.as_ref();
        let outcomes: Vec<_> = stream::iter(files)
            .map(|path| async move {
                let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
                let outcome = upgrade_file(root, &relative, formatter).await;
                (relative, outcome)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "file upgrade failed");
                    failures.push(FileFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }
        result.record_files(reports, failures);

        tracing::info!(
            processed = result.files_processed,
            modified = result.files_modified,
            errors = result.errors,
            "upgrade finished"
        );
        Ok(result)
    }
}

async fn preflight(root: &Path) -> UpgradeResult<()> {
    let metadata = tokio::fs::metadata(root).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => UpgradeError::RootNotFound(root.to_path_buf()),
        _ => UpgradeError::io(root, e),
    })?;
    if !metadata.is_dir() {
        return Err(UpgradeError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Upgrade the project described by `config`
///
/// # Errors
/// See [`ProjectUpgrader::run`].
pub async fn upgrade_project(config: UpgradeConfig) -> UpgradeResult<RunResult> {
    ProjectUpgrader::new(config).run().await
}
