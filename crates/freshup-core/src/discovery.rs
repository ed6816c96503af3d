//! Source file discovery

use crate::error::UpgradeResult;
use freshup_syntax::SOURCE_EXTENSIONS;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never searched for sources
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "_fresh"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Find `.js`, `.jsx`, `.ts` and `.tsx` files under `root`, sorted
///
/// # Errors
/// `UpgradeError::Walk` if a directory cannot be read.
pub fn discover_sources(root: &Path) -> UpgradeResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_source(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "discovered sources");
    Ok(files)
}
