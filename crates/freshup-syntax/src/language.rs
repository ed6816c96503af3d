//! Source dialects and their tree-sitter grammars

use std::path::Path;

/// Extensions picked up by project discovery
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Grammar used for a source file
///
/// `.ts` files need the plain TypeScript grammar because `<T>expr` type
/// assertions are ambiguous with JSX. Everything else goes through TSX,
/// which also accepts plain JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    /// TypeScript without JSX
    TypeScript,
    /// TypeScript or JavaScript with JSX
    Tsx,
}

impl SourceLanguage {
    /// Detect language from file extension
    #[inline]
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "ts" => Some(Self::TypeScript),
            "tsx" | "js" | "jsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Detect language from a path's extension
    #[inline]
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get tree-sitter language
    #[inline]
    #[must_use]
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TSX",
        };
        write!(f, "{name}")
    }
}
