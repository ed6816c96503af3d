//! Per-file upgrade task

use crate::error::{UpgradeError, UpgradeResult};
use crate::formatter::{FormatOutcome, SourceFormatter};
use crate::result::FileReport;
use freshup_rewrite::rewrite_source;
use std::path::Path;

/// Rewrite, save and format one file
///
/// `relative` is the path below `root`; it drives route detection. The file
/// is left untouched when the rewrite fails.
///
/// # Errors
/// - `UpgradeError::Io` if the file cannot be read or written
/// - `UpgradeError::Rewrite` if the source cannot be parsed or rewritten
pub async fn upgrade_file(
    root: &Path,
    relative: &Path,
    formatter: &dyn SourceFormatter,
) -> UpgradeResult<FileReport> {
    let path = root.join(relative);
    let original = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| UpgradeError::io(relative, e))?;

    let rewrite = rewrite_source(relative, &original).map_err(|e| UpgradeError::rewrite(relative, e))?;
    if rewrite.changed {
        tokio::fs::write(&path, &rewrite.text)
            .await
            .map_err(|e| UpgradeError::io(relative, e))?;
    }

    match formatter.format(&path).await {
        FormatOutcome::Failed { code, stderr } => {
            tracing::warn!(path = %relative.display(), ?code, %stderr, "formatter failed");
        }
        FormatOutcome::Formatted | FormatOutcome::Skipped => {}
    }

    let after = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| UpgradeError::io(relative, e))?;
    let modified = after != original;
    tracing::debug!(path = %relative.display(), modified, "processed file");

    Ok(FileReport {
        path: relative.to_path_buf(),
        modified,
        handlers_rewritten: rewrite.handlers_rewritten,
        removed_symbols: rewrite.removed_symbols,
        warnings: rewrite.warnings,
    })
}
