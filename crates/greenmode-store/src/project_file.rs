//! Persistence of the project data document.
//!
//! The document lives next to the project while green mode runs and is
//! removed at the end. A file left over from an interrupted run is removed
//! before a new one starts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use greenmode_core::project::ProjectData;

use crate::error::{StoreError, StoreResult};

/// Default file name, relative to the project root.
pub const PROJECT_DATA_FILE: &str = ".project_data.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDataFile {
    path: PathBuf,
}

impl ProjectDataFile {
    pub fn new(project_dir: &Path, file_name: &str) -> Self {
        Self {
            path: project_dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Remove a file left over from an earlier run. Returns whether one was
    /// found.
    pub fn remove_stale(&self) -> StoreResult<bool> {
        if !self.exists() {
            return Ok(false);
        }
        warn!(path = %self.path.display(), "removing stale project data file");
        self.remove()?;
        Ok(true)
    }

    pub fn write(&self, data: &ProjectData) -> StoreResult<()> {
        let text = serde_yaml::to_string(data).map_err(|source| StoreError::Yaml {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "project data written");
        Ok(())
    }

    pub fn read(&self) -> StoreResult<ProjectData> {
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        serde_yaml::from_str(&text).map_err(|source| StoreError::Yaml {
            path: self.path.clone(),
            source,
        })
    }

    pub fn remove(&self) -> StoreResult<()> {
        fs::remove_file(&self.path).map_err(|e| StoreError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenmode_core::model::SettingValue;
    use greenmode_core::project::{DirEntry, Extreme};

    #[test]
    fn write_then_read_keeps_structure_and_facts() {
        let tmp = tempfile::tempdir().unwrap();
        let file = ProjectDataFile::new(tmp.path(), PROJECT_DATA_FILE);

        let mut data = ProjectData::new(vec![
            DirEntry::File("a.py".to_string()),
            DirEntry::dir("src", vec![DirEntry::File("b.py".to_string())]),
        ]);
        data.record_extreme("max_line_length", 79, Extreme::Max);
        data.append_values("filename_prefix", vec![SettingValue::from("test_")]);

        file.write(&data).unwrap();
        assert!(file.exists());
        assert_eq!(file.read().unwrap(), data);

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("green_mode_infinite_value_settings"));
        assert!(text.contains("max_line_length: 79"));
    }

    #[test]
    fn stale_file_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let file = ProjectDataFile::new(tmp.path(), PROJECT_DATA_FILE);
        assert!(!file.remove_stale().unwrap());

        std::fs::write(file.path(), "dir_structure: []\n").unwrap();
        assert!(file.remove_stale().unwrap());
        assert!(!file.exists());
    }

    #[test]
    fn malformed_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let file = ProjectDataFile::new(tmp.path(), PROJECT_DATA_FILE);
        std::fs::write(file.path(), "dir_structure: {").unwrap();
        let err = file.read().unwrap_err();
        assert!(err.to_string().contains(PROJECT_DATA_FILE));
    }
}
