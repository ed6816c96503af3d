//! freshup project driver
//!
//! Upgrades a whole Fresh 1.x project: the manifest first, then every
//! script file under the root, each rewritten, saved and formatted
//! independently. One file failing never stops the others.
//!
//! # Example
//!
//! ```rust,ignore
//! use freshup_core::{ProjectUpgrader, UpgradeConfig};
//!
//! let config = UpgradeConfig::new("./my-site").with_format(false);
//! let result = ProjectUpgrader::new(config).run().await?;
//! println!("{} of {} files modified", result.files_modified, result.files_processed);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod formatter;
pub mod result;
pub mod task;

pub use config::UpgradeConfig;
pub use discovery::discover_sources;
pub use driver::{upgrade_project, ProjectUpgrader};
pub use error::{UpgradeError, UpgradeResult};
pub use formatter::{DenoFormatter, FormatOutcome, NoopFormatter, SourceFormatter};
pub use result::{FileFailure, FileReport, RunResult};
pub use task::upgrade_file;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
