//! Project fact scanner.
//!
//! Reads every file once and records the values of settings that can take an
//! unbounded range of values (maximum line length, file length). The facts
//! become candidate values for type2 settings.

use greenmode_core::project::{Extreme, ProjectData};

/// Project-wide facts folded to their maximum.
pub const FIND_MAX: [&str; 2] = ["max_lines_per_file", "max_line_length"];
/// Project-wide facts folded to their minimum.
pub const FIND_MIN: [&str; 1] = ["min_lines_per_file"];

/// Facts of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFacts {
    /// Longest line in characters, terminator included.
    pub max_line_length: i64,
    pub line_count: i64,
}

impl FileFacts {
    fn value_of(&self, setting: &str) -> Option<i64> {
        match setting {
            "max_line_length" => Some(self.max_line_length),
            "max_lines_per_file" | "min_lines_per_file" => Some(self.line_count),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QuickstartBear;

impl QuickstartBear {
    pub const NAME: &'static str = "QuickstartBear";

    /// Facts of `file`; empty files have none.
    pub fn scan(file: &[String]) -> Option<FileFacts> {
        if file.is_empty() {
            return None;
        }
        let max_line_length = file
            .iter()
            .map(|line| line.chars().count() as i64)
            .max()
            .unwrap_or(0);
        Some(FileFacts {
            max_line_length,
            line_count: file.len() as i64,
        })
    }

    /// Fold the facts of one file into the project data.
    pub fn record(facts: &FileFacts, data: &mut ProjectData) {
        for setting in FIND_MAX {
            if let Some(v) = facts.value_of(setting) {
                data.record_extreme(setting, v, Extreme::Max);
            }
        }
        for setting in FIND_MIN {
            if let Some(v) = facts.value_of(setting) {
                data.record_extreme(setting, v, Extreme::Min);
            }
        }
    }
}
