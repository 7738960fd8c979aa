//! Setting-type resolution.
//!
//! Non-boolean settings are looked up in an ordered table:
//!
//! ```yaml
//! type2:
//!   LineLengthBear:
//!     max_line_length: 80
//! type3:
//!   SpaceConsistencyBear:
//!     indent_size: [2, 4, 8]
//! ```
//!
//! The first tag, then the first bear key contained in the bear name, that
//! lists the setting decides its domain.

use std::fmt;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use greenmode_core::model::{Assignment, SettingValue};
use greenmode_core::GreenError;

const BUILTIN_TABLE: &str = include_str!("bear_settings.yaml");

/// Where candidate values of a setting come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingDomain {
    /// Values discovered from the project.
    Type2,
    /// Values enumerated by the table.
    Type3,
    Unknown(String),
}

impl SettingDomain {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "type2" => Self::Type2,
            "type3" => Self::Type3,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for SettingDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type2 => f.write_str("type2"),
            Self::Type3 => f.write_str("type3"),
            Self::Unknown(tag) => f.write_str(tag),
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("malformed setting table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("setting table entry {path} must be a mapping")]
    Shape { path: String },
}

impl From<TableError> for GreenError {
    fn from(err: TableError) -> Self {
        GreenError::serialization(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BearEntry {
    key: String,
    settings: Vec<(String, SettingValue)>,
}

#[derive(Debug, Clone, PartialEq)]
struct DomainEntry {
    tag: String,
    bears: Vec<BearEntry>,
}

/// Ordered domain tag → bear key → setting → value table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingTypeTable {
    domains: Vec<DomainEntry>,
}

fn as_mapping<'a>(value: &'a Value, path: &str) -> Result<&'a Mapping, TableError> {
    value.as_mapping().ok_or_else(|| TableError::Shape {
        path: path.to_string(),
    })
}

fn key_string(key: &Value, path: &str) -> Result<String, TableError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        _ => Err(TableError::Shape {
            path: format!("{path}.<key>"),
        }),
    }
}

impl SettingTypeTable {
    pub fn from_yaml_str(text: &str) -> Result<Self, TableError> {
        let doc: Value = serde_yaml::from_str(text)?;
        if doc.is_null() {
            return Ok(Self::default());
        }

        let mut domains = Vec::new();
        for (tag, bears) in as_mapping(&doc, "<root>")? {
            let tag = key_string(tag, "<root>")?;
            let mut entries = Vec::new();
            for (key, settings) in as_mapping(bears, &tag)? {
                let key = key_string(key, &tag)?;
                let path = format!("{tag}.{key}");
                let mut values = Vec::new();
                for (name, value) in as_mapping(settings, &path)? {
                    let name = key_string(name, &path)?;
                    let value: SettingValue = serde_yaml::from_value(value.clone())?;
                    values.push((name, value));
                }
                entries.push(BearEntry {
                    key,
                    settings: values,
                });
            }
            domains.push(DomainEntry { tag, bears: entries });
        }
        Ok(Self { domains })
    }

    /// Table shipped with the built-in bears.
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_yaml_str(BUILTIN_TABLE)
    }

    /// Every type2 setting with its floor value; later entries win.
    pub fn type2_defaults(&self) -> Assignment {
        let mut out = Assignment::new();
        for domain in self.domains.iter().filter(|d| d.tag == "type2") {
            for bear in &domain.bears {
                for (name, value) in &bear.settings {
                    out.insert(name.clone(), value.clone());
                }
            }
        }
        out
    }

    pub fn lookup(&self, setting: &str, bear_name: &str) -> Option<(SettingDomain, &SettingValue)> {
        self.domains.iter().find_map(|domain| {
            domain
                .bears
                .iter()
                .filter(|b| bear_name.contains(b.key.as_str()))
                .find_map(|b| b.settings.iter().find(|(n, _)| n == setting))
                .map(|(_, v)| (SettingDomain::from_tag(&domain.tag), v))
        })
    }
}

/// Resolves a bear setting to its domain and table value.
#[derive(Debug, Clone)]
pub struct SettingTypeResolver {
    table: SettingTypeTable,
}

impl SettingTypeResolver {
    pub fn new(table: SettingTypeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SettingTypeTable {
        &self.table
    }

    pub fn resolve(&self, setting: &str, bear_name: &str) -> Option<(SettingDomain, SettingValue)> {
        self.table
            .lookup(setting, bear_name)
            .map(|(domain, value)| (domain, value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn builtin_table_parses() {
        let table = SettingTypeTable::builtin().unwrap();
        let defaults = table.type2_defaults();
        assert_eq!(defaults.get("max_line_length"), Some(&SettingValue::Int(80)));
        assert_eq!(defaults.get("min_lines_per_file"), Some(&SettingValue::Int(1)));
    }

    #[test]
    fn bear_key_matches_by_substring() {
        let resolver = SettingTypeResolver::new(SettingTypeTable::builtin().unwrap());
        let (domain, value) = resolver.resolve("max_line_length", "PyLineLengthBear").unwrap();
        assert_eq!(domain, SettingDomain::Type2);
        assert_eq!(value, SettingValue::Int(80));

        let (domain, value) = resolver.resolve("indent_size", "SpaceConsistencyBear").unwrap();
        assert_eq!(domain, SettingDomain::Type3);
        assert_eq!(
            value,
            SettingValue::List(vec![2i64.into(), 4i64.into(), 8i64.into()])
        );

        assert!(resolver.resolve("indent_size", "LineLengthBear").is_none());
        assert!(resolver.resolve("unknown", "LineLengthBear").is_none());
    }

    #[test]
    fn first_tag_wins_and_unknown_tags_are_kept() {
        let table = SettingTypeTable::from_yaml_str(
            "type4:\n  Bear:\n    width: 3\ntype2:\n  Bear:\n    width: 5\n",
        )
        .unwrap();
        let (domain, value) = table.lookup("width", "SomeBear").unwrap();
        assert_eq!(domain, SettingDomain::Unknown("type4".to_string()));
        assert_eq!(value, &SettingValue::Int(3));
        assert_eq!(domain.to_string(), "type4");
    }

    #[test]
    fn later_type2_entries_override() {
        let table = SettingTypeTable::from_yaml_str(
            "type2:\n  ABear:\n    limit: 1\n  BBear:\n    limit: 2\n",
        )
        .unwrap();
        assert_eq!(table.type2_defaults().get("limit"), Some(&SettingValue::Int(2)));
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert_matches!(
            SettingTypeTable::from_yaml_str("type2: [1, 2]"),
            Err(TableError::Shape { .. })
        );
        assert_matches!(
            SettingTypeTable::from_yaml_str("type2: {Bear: {x: [1"),
            Err(TableError::Yaml(_))
        );
    }
}
