//! freshup syntax layer
//!
//! Wraps tree-sitter so the rewrite passes can inspect a JavaScript or
//! TypeScript file and record edits against it.
//!
//! # Architecture
//!
//! ```text
//! text → SourceUnit (tree-sitter Tree, read-only) → passes record EditSet → EditSet::apply → text'
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use freshup_syntax::{EditSet, SourceLanguage, SourceUnit};
//!
//! let unit = SourceUnit::parse("let req = 1;", SourceLanguage::TypeScript)?;
//! let mut edits = EditSet::new();
//! edits.replace(4..7, "ctx");
//! assert_eq!(edits.apply(unit.text())?, "let ctx = 1;");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod edit;
pub mod error;
pub mod language;
pub mod node;
pub mod unit;

pub use edit::{EditSet, TextEdit};
pub use error::{SyntaxError, SyntaxResult};
pub use language::{SourceLanguage, SOURCE_EXTENSIONS};
pub use unit::SourceUnit;

/// Re-exported so downstream passes name node types without a direct dependency
pub use tree_sitter::Node;
