//! Locate, edit and write back the project manifest

use crate::document::ManifestDocument;
use crate::edits::{apply_script, UPGRADE_SCRIPT};
use crate::error::{ManifestError, ManifestResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Manifest file names, tried in order
pub const MANIFEST_FILES: &[&str] = &["deno.json", "deno.jsonc"];

/// Result of a manifest update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestUpdate {
    /// Manifest that was found, if any
    pub path: Option<PathBuf>,
    /// Whether the file was rewritten
    pub written: bool,
}

impl ManifestUpdate {
    /// No manifest in the project
    #[inline]
    #[must_use]
    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Find the first manifest under `dir` and read it
async fn locate(dir: &Path) -> ManifestResult<Option<(PathBuf, String)>> {
    for name in MANIFEST_FILES {
        let path = dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => return Ok(Some((path, text))),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(ManifestError::io(path, e)),
        }
    }
    Ok(None)
}

/// Migrate text through the upgrade script
///
/// Returns `None` when the result matches the input up to surrounding
/// whitespace.
///
/// # Errors
/// Parse, shape or serialization errors from [`ManifestDocument`].
pub fn upgrade_text(path: &Path, text: &str) -> ManifestResult<Option<String>> {
    let mut document = ManifestDocument::parse(path, text)?;
    apply_script(&mut document, UPGRADE_SCRIPT)?;
    let rendered = document.to_pretty()?;
    Ok((rendered.trim() != text.trim()).then_some(rendered))
}

/// Update `deno.json` or `deno.jsonc` in `dir`
///
/// A project without a manifest is not an error.
///
/// # Errors
/// - `ManifestError::Io` if the manifest cannot be read or written
/// - `ManifestError::Syntax` / `InvalidShape` if it cannot be interpreted
pub async fn update_manifest(dir: &Path) -> ManifestResult<ManifestUpdate> {
    let Some((path, text)) = locate(dir).await? else {
        tracing::info!(dir = %dir.display(), "no deno.json or deno.jsonc, skipping manifest");
        return Ok(ManifestUpdate::skipped());
    };

    let written = match upgrade_text(&path, &text)? {
        Some(updated) => {
            tokio::fs::write(&path, updated)
                .await
                .map_err(|e| ManifestError::io(&path, e))?;
            tracing::info!(path = %path.display(), "manifest updated");
            true
        }
        None => {
            tracing::info!(path = %path.display(), "manifest already up to date");
            false
        }
    };

    Ok(ManifestUpdate {
        path: Some(path),
        written,
    })
}
