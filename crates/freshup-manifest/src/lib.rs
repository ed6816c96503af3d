//! freshup manifest updater
//!
//! Upgrades a project's `deno.json` (or `deno.jsonc`): pins Fresh 2 and its
//! Preact dependencies, drops superseded import map entries and the `lock`
//! flag, and removes or rewrites legacy tasks.
//!
//! ```text
//! deno.json(c) → strip_jsonc → ManifestDocument → apply_script → to_pretty → write if changed
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use freshup_manifest::update_manifest;
//!
//! let update = update_manifest(std::path::Path::new(".")).await?;
//! if update.written {
//!     println!("updated {}", update.path.unwrap().display());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod edits;
pub mod error;
pub mod jsonc;
pub mod update;

pub use document::ManifestDocument;
pub use edits::{apply_script, ManifestEdit, TaskAction, UPGRADE_SCRIPT};
pub use error::{ManifestError, ManifestResult};
pub use jsonc::strip_jsonc;
pub use update::{update_manifest, upgrade_text, ManifestUpdate, MANIFEST_FILES};
