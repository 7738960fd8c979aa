//! Green mode data models.
//!
//! Models are mostly "dumb" data. Policy (which values to try, which files to
//! group) lives in the engine; I/O lives in the store crate.
//!
//! Recommended imports:
//! - `use greenmode_core::model::{SettingValue, Assignment, FileDict};`
//! - Or: `use greenmode_core::prelude::*;`

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod source;

pub use source::{findings_are_green, Finding, IgnoreRange, SourcePosition, SourceRange};

/// Key under which a local trial records the file it ran against.
pub const FILENAME_KEY: &str = "filename";

/// A value a bear setting can take.
///
/// Serialized untagged so that YAML/JSON documents carry plain scalars and
/// sequences (`max_line_length: 80`, `use_spaces: [true, false]`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<SettingValue>),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Expand a value into a candidate list: lists are taken element-wise,
    /// scalars become a single candidate.
    pub fn into_candidates(self) -> Vec<SettingValue> {
        match self {
            Self::List(items) => items,
            other => vec![other],
        }
    }
}

/// Config-file rendering: booleans as `True`/`False`, lists comma separated.
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// One concrete assignment of values to setting names.
///
/// A `BTreeMap` keeps iteration order independent of insertion order, so two
/// assignments with the same content always compare and print the same.
pub type Assignment = BTreeMap<String, SettingValue>;

/// File name to file lines. Lines keep their terminators.
pub type FileDict = BTreeMap<String, Vec<String>>;

/// Split text into lines, keeping `\n` terminators.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Strip the line terminator from a line produced by [`split_lines`].
pub fn line_body(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
