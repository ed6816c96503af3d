//! freshup rewrite engine
//!
//! Migrates one Fresh 1.x source file to the Fresh 2 API. Pure text in,
//! text out; all I/O lives in `freshup-core`.
//!
//! # Passes
//!
//! - **Directives**: drop `@jsx` pragmas and obsolete triple-slash references
//! - **Handlers**: in public route files, rewrite context member accesses and
//!   fold `(req, ctx)` into `(ctx)`
//! - **Imports**: re-point legacy specifiers, move legacy names to
//!   `fresh/compat`, add accumulated names
//!
//! # Architecture
//!
//! ```text
//! text → strip_directives → SourceUnit → exported_handlers → walk_statements + normalize_parameters
//!                                                                   ↓ (ImportState)
//!                                           text' ← EditSet::apply ← rewrite_imports
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use freshup_rewrite::rewrite_source;
//! use std::path::Path;
//!
//! let out = rewrite_source(
//!     Path::new("routes/index.ts"),
//!     "export const handler = (req) => {\n  return new Response(req.url);\n};\n",
//! )?;
//! assert!(out.text.contains("(ctx: FreshContext)"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod directives;
pub mod error;
pub mod file;
pub mod handler;
pub mod imports;
pub mod member;
pub mod params;
pub mod pass;
pub mod state;
pub mod symbols;
pub mod walker;

pub use directives::strip_directives;
pub use error::{RewriteError, RewriteResult};
pub use file::{is_route_file, rewrite_source, FileRewrite};
pub use handler::{exported_handlers, ExportedHandler, HandlerShape};
pub use state::{ImportState, ImportTarget};
