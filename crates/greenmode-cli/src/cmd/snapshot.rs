use std::path::Path;

use anyhow::{bail, Result};

use greenmode_core::config::GreenModeConfig;
use greenmode_core::project::ProjectData;
use greenmode_engine::pipeline::{effective_ignore_globs, record_affixes, record_facts};
use greenmode_plugins::settings::SettingTypeTable;
use greenmode_store::{load_file_dict, snapshot};

use crate::output;

/// Project data as a run sees it right before the search: directory
/// structure, filename affixes and line facts.
pub fn run(mut config: GreenModeConfig, project: &Path, ignore: &[String]) -> Result<()> {
    if !project.is_dir() {
        bail!("project directory {} does not exist", project.display());
    }
    config.project.ignore_globs.extend(ignore.iter().cloned());

    let dir = project.to_string_lossy().trim_end_matches('/').to_string();
    let globs = effective_ignore_globs(&dir, &config.project.ignore_globs);
    let snap = snapshot(project, &globs)?;

    let mut data = ProjectData::new(snap.dir_structure);
    record_affixes(&mut data, config.affixes.min_length, config.affixes.min_files);
    let files = load_file_dict(&data.complete_filename_list(&dir))?;
    record_facts(&mut data, &files, &SettingTypeTable::builtin()?.type2_defaults());

    if output::is_json() {
        return output::print(&data);
    }
    print!("{}", serde_yaml::to_string(&data)?);
    Ok(())
}
