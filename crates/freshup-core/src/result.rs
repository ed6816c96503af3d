//! Aggregated run outcome

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Outcome for one successfully processed file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Whether the file on disk differs from before the run
    pub modified: bool,
    /// Handler functions visited
    pub handlers_rewritten: usize,
    /// Legacy UI symbols dropped from imports
    pub removed_symbols: Vec<String>,
    /// Constructs left untouched
    pub warnings: Vec<String>,
}

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Rendered error
    pub error: String,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Whether the manifest was rewritten
    pub config_updated: bool,
    /// Manifest that was found, if any
    pub manifest_path: Option<PathBuf>,
    /// Source files discovered and attempted
    pub files_processed: usize,
    /// Source files changed on disk
    pub files_modified: usize,
    /// Failed files plus a failed manifest update
    pub errors: usize,
    /// Number of constructs left untouched
    pub warnings: usize,
    /// Paths that failed, sorted
    pub failed_paths: Vec<PathBuf>,
    /// Distinct legacy UI symbols removed across all files
    pub removed_symbols: Vec<String>,
    /// Manifest error, if the update failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_error: Option<String>,
    /// Per-file reports, sorted by path
    pub files: Vec<FileReport>,
    /// Per-file failures, sorted by path
    pub failures: Vec<FileFailure>,
}

impl RunResult {
    /// Fold per-file outcomes into the summary
    pub fn record_files(&mut self, mut reports: Vec<FileReport>, mut failures: Vec<FileFailure>) {
        reports.sort_by(|a, b| a.path.cmp(&b.path));
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        self.files_processed += reports.len() + failures.len();
        self.files_modified += reports.iter().filter(|r| r.modified).count();
        self.errors += failures.len();
        self.warnings += reports.iter().map(|r| r.warnings.len()).sum::<usize>();
        self.failed_paths
            .extend(failures.iter().map(|f| f.path.clone()));

        let symbols: BTreeSet<String> = self
            .removed_symbols
            .drain(..)
            .chain(reports.iter().flat_map(|r| r.removed_symbols.iter().cloned()))
            .collect();
        self.removed_symbols = symbols.into_iter().collect();

        self.files.extend(reports);
        self.failures.extend(failures);
    }

    /// Whether the run finished without errors
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// Warnings of every file, in path order
    pub fn warning_messages(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .flat_map(|f| f.warnings.iter().map(String::as_str))
    }
}
