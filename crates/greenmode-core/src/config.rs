//! Configuration structures for green mode.
//!
//! This module defines explicit, serializable configuration objects used by
//! the engine and the CLI to control the search space, glob synthesis and
//! parallelism.
//!
//! The core crate itself does not read files or environment variables. The
//! CLI loads a config document and passes the result in.

use serde::{Deserialize, Serialize};

use crate::errors::{GreenError, GreenResult};

/// Global configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GreenModeConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub globs: GlobConfig,
    #[serde(default)]
    pub affixes: AffixConfig,
    #[serde(default)]
    pub project: ProjectConfig,
}

/// Limits on the trial search space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The unified pass only runs while the number of tunable optional
    /// settings stays below this value.
    #[serde(default = "SearchConfig::default_max_optional_args")]
    pub max_optional_args: usize,

    /// The unified pass is skipped when any optional setting has more
    /// candidate values than this.
    #[serde(default = "SearchConfig::default_max_values_per_optional_arg")]
    pub max_values_per_optional_arg: usize,

    #[serde(default)]
    pub workers: WorkerPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_optional_args: Self::default_max_optional_args(),
            max_values_per_optional_arg: Self::default_max_values_per_optional_arg(),
            workers: WorkerPolicy::default(),
        }
    }
}

impl SearchConfig {
    fn default_max_optional_args() -> usize {
        5
    }
    fn default_max_values_per_optional_arg() -> usize {
        5
    }
}

/// How trials are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WorkerPolicy {
    /// Evaluate every trial on the calling thread.
    Sequential,
    /// Evaluate trials on a dedicated pool. `None` sizes the pool to the
    /// available cores minus one.
    Parallel { threads: Option<usize> },
}

impl Default for WorkerPolicy {
    fn default() -> Self {
        Self::Parallel { threads: None }
    }
}

impl WorkerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel { .. } => "parallel",
        }
    }
}

/// Glob synthesis tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobConfig {
    /// A directory is promoted to a glob when at most this many real files
    /// would have to be ignored.
    #[serde(default = "GlobConfig::default_max_ignore_files")]
    pub max_ignore_files: usize,

    /// A directory is promoted to a glob when at least this fraction of its
    /// real files is covered.
    #[serde(default = "GlobConfig::default_coverage_ratio")]
    pub coverage_ratio: f64,
}

impl Default for GlobConfig {
    fn default() -> Self {
        Self {
            max_ignore_files: Self::default_max_ignore_files(),
            coverage_ratio: Self::default_coverage_ratio(),
        }
    }
}

impl GlobConfig {
    fn default_max_ignore_files() -> usize {
        7
    }
    fn default_coverage_ratio() -> f64 {
        0.9
    }
}

/// Filename prefix/suffix detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffixConfig {
    #[serde(default = "AffixConfig::default_min_length")]
    pub min_length: usize,
    #[serde(default = "AffixConfig::default_min_files")]
    pub min_files: usize,
}

impl Default for AffixConfig {
    fn default() -> Self {
        Self {
            min_length: Self::default_min_length(),
            min_files: Self::default_min_files(),
        }
    }
}

impl AffixConfig {
    fn default_min_length() -> usize {
        6
    }
    fn default_min_files() -> usize {
        5
    }
}

/// Project-level inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Globs of files left out of the snapshot.
    #[serde(default)]
    pub ignore_globs: Vec<String>,

    /// Transient project data file, relative to the project root.
    #[serde(default = "ProjectConfig::default_data_file")]
    pub data_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            ignore_globs: Vec::new(),
            data_file: Self::default_data_file(),
        }
    }
}

impl ProjectConfig {
    fn default_data_file() -> String {
        ".project_data.yaml".to_string()
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &GreenModeConfig) -> GreenResult<()> {
    if !(cfg.globs.coverage_ratio > 0.0 && cfg.globs.coverage_ratio <= 1.0) {
        return Err(GreenError::invalid_argument(
            "coverage_ratio must be in (0, 1]",
        ));
    }

    if let WorkerPolicy::Parallel { threads: Some(0) } = cfg.search.workers {
        return Err(GreenError::invalid_argument(
            "parallel worker count must be greater than zero",
        ));
    }

    if cfg.project.data_file.trim().is_empty() {
        return Err(GreenError::invalid_argument(
            "project data file name must not be empty",
        ));
    }

    if cfg.affixes.min_files == 0 {
        return Err(GreenError::invalid_argument(
            "affix min_files must be greater than zero",
        ));
    }

    Ok(())
}
