//! greenmode-store
//!
//! Filesystem side of green mode. Everything that touches the disk lives
//! here so the core and the engine stay testable with in-memory data:
//! - directory snapshots for the project data document
//! - reading/writing the project data file
//! - loading file contents
//! - the on-disk file lister used by glob synthesis

pub mod contents;
pub mod error;
pub mod lister;
pub mod project_file;
pub mod snapshot;

pub use crate::contents::load_file_dict;
pub use crate::error::{StoreError, StoreResult};
pub use crate::lister::FsLister;
pub use crate::project_file::{ProjectDataFile, PROJECT_DATA_FILE};
pub use crate::snapshot::{snapshot, Snapshot, SnapshotStats};
