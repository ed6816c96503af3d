//! Driver configuration

use std::path::PathBuf;

/// Default formatter executable
pub const DEFAULT_FORMATTER: &str = "deno";

/// Options for one upgrade run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeConfig {
    /// Project root
    pub root: PathBuf,
    /// Run the formatter on every source file after rewriting
    pub format: bool,
    /// Formatter executable, invoked as `<program> fmt <file>`
    pub formatter_program: String,
    /// Maximum number of files processed at once
    pub concurrency: usize,
}

impl UpgradeConfig {
    /// Create default configuration for a project root
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// With formatting enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    /// With formatter executable
    #[inline]
    #[must_use]
    pub fn with_formatter_program(mut self, program: impl Into<String>) -> Self {
        self.formatter_program = program.into();
        self
    }

    /// With concurrency limit (at least 1)
    #[inline]
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            format: true,
            formatter_program: DEFAULT_FORMATTER.to_string(),
            concurrency: std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = UpgradeConfig::new("/srv/site")
            .with_format(false)
            .with_formatter_program("dprint")
            .with_concurrency(0);
        assert_eq!(config.root, PathBuf::from("/srv/site"));
        assert!(!config.format);
        assert_eq!(config.formatter_program, "dprint");
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn defaults() {
        let config = UpgradeConfig::default();
        assert!(config.format);
        assert_eq!(config.formatter_program, "deno");
        assert!(config.concurrency >= 1);
    }
}
