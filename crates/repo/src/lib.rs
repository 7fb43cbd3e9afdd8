//! Build the package index and manifest of a Debian-style repository.
//!
//! ```no_run
//! use shelf_config::Config;
//! use shelf_repo::IndexBuilder;
//!
//! let config = Config::load(None).expect("valid configuration");
//! let mut builder = IndexBuilder::new(&config).expect("existing manifest");
//! let report = builder.build(&config.build.compression).expect("build");
//! for artifact in &report.artifacts {
//!     println!("{} ({} bytes)", artifact.path.display(), artifact.size);
//! }
//! ```

mod builder;
pub mod error;
pub mod index;
mod manifest;
mod tree;

pub use crate::builder::{Artifact, BuildReport, BuildState, IndexBuilder};
pub use crate::index::{Index, locate_index, read_index};
pub use crate::manifest::Manifest;
pub use crate::tree::{PackageKey, PackageTree};
