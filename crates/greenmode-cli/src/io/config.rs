use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use greenmode_core::config::{GreenModeConfig, WorkerPolicy};
use greenmode_plugins::settings::SettingTypeTable;

use crate::args::RunArgs;

/// Configuration from `path`, or the defaults. `.json` files are read as
/// JSON, anything else as YAML.
pub fn load_config(path: Option<&Path>) -> Result<GreenModeConfig> {
    let Some(path) = path else {
        return Ok(GreenModeConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON config {}", path.display()))?
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML config {}", path.display()))?
    };
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Command line flags win over the file.
pub fn apply_run_overrides(cfg: &mut GreenModeConfig, args: &RunArgs) {
    if args.sequential {
        cfg.search.workers = WorkerPolicy::Sequential;
    } else if let Some(threads) = args.jobs {
        cfg.search.workers = WorkerPolicy::Parallel {
            threads: Some(threads),
        };
    }
    if let Some(n) = args.max_optional_args {
        cfg.search.max_optional_args = n;
    }
    if let Some(n) = args.max_values_per_optional_arg {
        cfg.search.max_values_per_optional_arg = n;
    }
    cfg.project.ignore_globs.extend(args.ignore.iter().cloned());
}

pub fn load_table(path: &Path) -> Result<SettingTypeTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read setting table {}", path.display()))?;
    SettingTypeTable::from_yaml_str(&text)
        .with_context(|| format!("invalid setting table {}", path.display()))
}
