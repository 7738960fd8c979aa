//! Project data document.
//!
//! The project data is a transient document written next to the project while
//! green mode runs. It mirrors the directory tree and collects "infinite
//! value" facts (maximum line length, filename prefixes, ...) that later
//! become candidate values for type2 settings.
//!
//! Shape (YAML):
//!
//! ```yaml
//! dir_structure:
//!   - main.py
//!   - src:
//!       - a.py
//! green_mode_infinite_value_settings:
//!   - max_line_length: 80
//!   - filename_prefix: [test_]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::SettingValue;

/// Top-level key holding the discovered facts.
pub const SETTINGS_KEY: &str = "green_mode_infinite_value_settings";

/// One entry in the directory structure: a bare file name, or a single-key
/// mapping from a directory name to its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirEntry {
    File(String),
    Dir(BTreeMap<String, Vec<DirEntry>>),
}

impl DirEntry {
    pub fn dir(name: impl Into<String>, entries: Vec<DirEntry>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(name.into(), entries);
        Self::Dir(map)
    }
}

/// Direction used when folding a per-file fact into the project-wide value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

impl Extreme {
    fn prefers(self, candidate: i64, current: i64) -> bool {
        match self {
            Self::Max => candidate > current,
            Self::Min => candidate < current,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default)]
    pub dir_structure: Vec<DirEntry>,

    #[serde(rename = "green_mode_infinite_value_settings", default)]
    pub infinite_value_settings: Vec<BTreeMap<String, SettingValue>>,
}

impl ProjectData {
    pub fn new(dir_structure: Vec<DirEntry>) -> Self {
        Self {
            dir_structure,
            infinite_value_settings: Vec::new(),
        }
    }

    /// Bare file names of every file in the tree, depth first.
    pub fn file_names(&self) -> Vec<String> {
        fn collect(entries: &[DirEntry], out: &mut Vec<String>) {
            for entry in entries {
                match entry {
                    DirEntry::File(name) => out.push(name.clone()),
                    DirEntry::Dir(map) => {
                        for children in map.values() {
                            collect(children, out);
                        }
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.dir_structure, &mut out);
        out
    }

    /// Full paths of every file in the tree, rooted at `project_dir`.
    pub fn complete_filename_list(&self, project_dir: &str) -> Vec<String> {
        fn collect(entries: &[DirEntry], prefix: &str, out: &mut Vec<String>) {
            for entry in entries {
                match entry {
                    DirEntry::File(name) => out.push(format!("{prefix}/{name}")),
                    DirEntry::Dir(map) => {
                        for (dir, children) in map {
                            collect(children, &format!("{prefix}/{dir}"), out);
                        }
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(
            &self.dir_structure,
            project_dir.trim_end_matches('/'),
            &mut out,
        );
        out
    }

    /// Current value recorded for `setting`, if any.
    pub fn setting(&self, setting: &str) -> Option<&SettingValue> {
        self.infinite_value_settings
            .iter()
            .find_map(|item| item.get(setting))
    }

    fn setting_mut(&mut self, setting: &str) -> Option<&mut SettingValue> {
        self.infinite_value_settings
            .iter_mut()
            .find_map(|item| item.get_mut(setting))
    }

    fn push_setting(&mut self, setting: &str, value: SettingValue) {
        let mut item = BTreeMap::new();
        item.insert(setting.to_string(), value);
        self.infinite_value_settings.push(item);
    }

    /// Fold `value` into the recorded extreme of `setting`.
    ///
    /// Absent settings are inserted; an existing value is replaced only when
    /// `value` is strictly better in the given direction.
    pub fn record_extreme(&mut self, setting: &str, value: i64, extreme: Extreme) {
        match self.setting_mut(setting) {
            None => self.push_setting(setting, SettingValue::Int(value)),
            Some(current) => {
                let better = match current.as_int() {
                    Some(cur) => extreme.prefers(value, cur),
                    None => true,
                };
                if better {
                    *current = SettingValue::Int(value);
                }
            }
        }
    }

    /// Raise a recorded integer fact to `floor` when it is weaker.
    pub fn raise_to_floor(&mut self, setting: &str, floor: i64) {
        if let Some(current) = self.setting_mut(setting) {
            if matches!(current.as_int(), Some(cur) if cur < floor) {
                *current = SettingValue::Int(floor);
            }
        }
    }

    /// Append `values` to the list stored under `key`, creating it if needed.
    pub fn append_values(&mut self, key: &str, values: Vec<SettingValue>) {
        match self.setting_mut(key) {
            Some(SettingValue::List(items)) => items.extend(values),
            Some(other) => {
                let mut items = vec![other.clone()];
                items.extend(values);
                *other = SettingValue::List(items);
            }
            None => self.push_setting(key, SettingValue::List(values)),
        }
    }
}
