//! greenmode-core
//!
//! Core primitives for green mode:
//! - Setting values, source ranges, findings and the green acceptance rule
//! - The project data document persisted during a run
//! - Shell-style glob matching and glob synthesis from file lists
//! - Filename prefix/suffix detection
//! - Aggregation of green records into section candidates

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod glob;
pub mod model;
pub mod project;

pub use crate::errors::{GreenError, GreenResult};

/// Name of the generated configuration file, relative to the project root.
pub const GREEN_CONFIG_FILE: &str = ".coafile.green";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::aggregate::{aggregate, SettingBucket, SettingGroup};
    pub use crate::config::{validate_config, GreenModeConfig, WorkerPolicy};
    pub use crate::glob::{common_affixes, fnmatch, FileLister, GlobSet, GlobSynthesizer};
    pub use crate::model::{
        findings_are_green, Assignment, FileDict, Finding, IgnoreRange, SettingValue,
        SourcePosition, SourceRange, FILENAME_KEY,
    };
    pub use crate::project::{DirEntry, Extreme, ProjectData, SETTINGS_KEY};
    pub use crate::{GreenError, GreenResult};
}
