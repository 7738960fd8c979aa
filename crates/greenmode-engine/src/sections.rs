//! Configuration sections from aggregated green records.
//!
//! Every setting group of a bear becomes one section `all.<Bear><n>`, `n`
//! counting the bear's groups from one. The group's files are compressed
//! into globs plus an ignore list. Sections of the same bear that end up
//! with the same `files` value are redundant; only the first one is kept,
//! even when a later one carries a different `ignore` list.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use tracing::debug;

use greenmode_core::aggregate::SettingBucket;
use greenmode_core::glob::{FileLister, GlobSynthesizer};

/// Name of the section every other section inherits from.
pub const ALL_SECTION: &str = "all";

/// A named, ordered list of `key = value` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set `key`. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

struct Entries<'a>(&'a [(String, String)]);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("Section", 2)?;
        st.serialize_field("name", &self.name)?;
        st.serialize_field("entries", &Entries(&self.entries))?;
        st.end()
    }
}

/// Generated sections: the optional `all` section, then every bear's
/// sections keyed by bear name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GreenSections {
    pub all: Option<Section>,
    pub bears: BTreeMap<String, Vec<Section>>,
}

impl GreenSections {
    /// Every section in output order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.all.iter().chain(self.bears.values().flatten())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Escape a value for a comma separated config list.
pub fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\")
}

fn join_escaped<'s>(values: impl IntoIterator<Item = &'s String>) -> String {
    values
        .into_iter()
        .map(|v| escape_value(v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds sections, compressing file lists with a [`GlobSynthesizer`].
pub struct SectionBuilder<'a, L: FileLister + ?Sized> {
    synthesizer: GlobSynthesizer<'a, L>,
    project_dir: &'a str,
    project_files: &'a [String],
    ignore_globs: &'a [String],
}

impl<'a, L: FileLister + ?Sized> SectionBuilder<'a, L> {
    /// `project_files` stands in for the files of global bears, whose
    /// records carry none. `ignore_globs` make up the `all` section.
    pub fn new(
        synthesizer: GlobSynthesizer<'a, L>,
        project_dir: &'a str,
        project_files: &'a [String],
        ignore_globs: &'a [String],
    ) -> Self {
        Self {
            synthesizer,
            project_dir,
            project_files,
            ignore_globs,
        }
    }

    fn all_section(&self) -> Option<Section> {
        if self.ignore_globs.is_empty() {
            return None;
        }
        let mut section = Section::new(ALL_SECTION);
        section.set("ignore", join_escaped(self.ignore_globs));
        Some(section)
    }

    fn bear_sections(&self, bear: &str, buckets: &[SettingBucket], ignore_all: Option<&str>) -> Vec<Section> {
        let mut out: Vec<Section> = Vec::new();
        let mut num = 0usize;
        for group in buckets.iter().flat_map(|b| b.groups.iter()) {
            num += 1;
            let mut section = Section::new(format!("{ALL_SECTION}.{bear}{num}"));
            for (key, value) in &group.values {
                section.set(key.clone(), value.to_string());
            }

            let files = if group.files.is_empty() {
                self.project_files
            } else {
                group.files.as_slice()
            };
            let globs = self.synthesizer.synthesize(files, self.project_dir);
            section.set("files", join_escaped(&globs.globs));

            let ignore = join_escaped(&globs.ignore);
            let ignore = match ignore_all {
                Some(all) if ignore.is_empty() => all.to_string(),
                Some(all) => format!("{all}, {ignore}"),
                None => ignore,
            };
            if !ignore.is_empty() {
                section.set("ignore", ignore);
            }
            section.set("bears", bear);

            if out.iter().any(|s| s.get("files") == section.get("files")) {
                debug!(bear, section = %section.name(), "dropping section with repeated files");
                continue;
            }
            out.push(section);
        }
        out
    }

    /// Sections of every bear in `aggregated`. The `all` section's ignore
    /// value is prepended to every section's own.
    pub fn build(&self, aggregated: &BTreeMap<String, Vec<SettingBucket>>) -> GreenSections {
        let all = self.all_section();
        let ignore_all = all.as_ref().and_then(|s| s.get("ignore")).map(str::to_string);

        let mut bears = BTreeMap::new();
        for (bear, buckets) in aggregated {
            let sections = self.bear_sections(bear, buckets, ignore_all.as_deref());
            if !sections.is_empty() {
                bears.insert(bear.clone(), sections);
            }
        }
        GreenSections { all, bears }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use greenmode_core::aggregate::aggregate;
    use greenmode_core::model::{Assignment, SettingValue};

    /// Lister over a flat project `/p` holding a.py .. d.py.
    struct FlatLister;

    impl FileLister for FlatLister {
        fn list_recursive(&self, dir: &str) -> Vec<String> {
            self.list_direct(dir)
        }
        fn list_direct(&self, dir: &str) -> Vec<String> {
            if dir == "/p" {
                ["a.py", "b.py", "c.py", "d.py"]
                    .iter()
                    .map(|f| format!("/p/{f}"))
                    .collect()
            } else {
                Vec::new()
            }
        }
    }

    fn record(file: &str, key: &str, value: SettingValue) -> Assignment {
        let mut r = Assignment::new();
        r.insert("filename".to_string(), SettingValue::from(file));
        r.insert(key.to_string(), value);
        r
    }

    fn project_files() -> Vec<String> {
        ["a.py", "b.py", "c.py", "d.py"]
            .iter()
            .map(|f| format!("/p/{f}"))
            .collect()
    }

    fn build(records: &[Assignment], ignore_globs: &[String]) -> GreenSections {
        let files = project_files();
        let mut aggregated = BTreeMap::new();
        aggregated.insert("TestLocalBear".to_string(), aggregate(records));
        let synth = GlobSynthesizer::new(&FlatLister, 0, 1.0);
        SectionBuilder::new(synth, "/p", &files, ignore_globs).build(&aggregated)
    }

    #[test]
    fn one_section_per_setting_group() {
        let records = vec![
            record("/p/a.py", "some_setting", SettingValue::Int(3)),
            record("/p/b.py", "some_setting", SettingValue::Int(3)),
            record("/p/c.py", "some_setting", SettingValue::Int(4)),
            record("/p/d.py", "some_other_setting", SettingValue::from("x")),
        ];
        let out = build(&records, &[]);

        assert!(out.all.is_none());
        let sections = &out.bears["TestLocalBear"];
        let names: Vec<&str> = sections.iter().map(Section::name).collect();
        assert_eq!(names, vec!["all.TestLocalBear1", "all.TestLocalBear2", "all.TestLocalBear3"]);

        assert_eq!(sections[0].get("some_setting"), Some("3"));
        assert_eq!(sections[0].get("files"), Some("/p/a.py, /p/b.py"));
        assert_eq!(sections[0].get("bears"), Some("TestLocalBear"));
        assert_eq!(sections[1].get("files"), Some("/p/c.py"));
        assert_eq!(sections[2].get("some_other_setting"), Some("x"));
        assert_eq!(sections[2].get("ignore"), None);
    }

    #[test]
    fn all_section_ignore_is_prepended() {
        let records = vec![record("/p/a.py", "some_setting", SettingValue::Int(3))];
        let out = build(&records, &["/p/vendor/**".to_string()]);

        let all = out.all.as_ref().unwrap();
        assert_eq!(all.name(), "all");
        assert_eq!(all.get("ignore"), Some("/p/vendor/**"));
        assert_eq!(out.bears["TestLocalBear"][0].get("ignore"), Some("/p/vendor/**"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn sections_with_the_same_files_are_deduplicated() {
        let records = vec![
            record("/p/a.py", "use_spaces", SettingValue::Bool(true)),
            record("/p/a.py", "use_spaces", SettingValue::Bool(false)),
        ];
        let out = build(&records, &[]);
        let sections = &out.bears["TestLocalBear"];
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].get("use_spaces"), Some("True"));
    }

    #[test]
    fn first_group_wins_over_same_files_with_other_ignores() {
        let mut records: Vec<Assignment> = ["a.py", "b.py", "c.py", "d.py"]
            .iter()
            .map(|f| record(&format!("/p/{f}"), "use_spaces", SettingValue::Bool(false)))
            .collect();
        records.push(record("/p/a.py", "use_spaces", SettingValue::Bool(true)));
        records.push(record("/p/b.py", "use_spaces", SettingValue::Bool(true)));

        let files = project_files();
        let mut aggregated = BTreeMap::new();
        aggregated.insert("TestLocalBear".to_string(), aggregate(&records));
        let synth = GlobSynthesizer::new(&FlatLister, 7, 0.9);
        let out = SectionBuilder::new(synth, "/p", &files, &[]).build(&aggregated);

        let sections = &out.bears["TestLocalBear"];
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].get("use_spaces"), Some("False"));
        assert_eq!(sections[0].get("files"), Some("/p/**"));
        assert_eq!(sections[0].get("ignore"), None);
    }

    #[test]
    fn global_groups_cover_the_project() {
        let out = build(&[Assignment::new()], &[]);
        let section = &out.bears["TestLocalBear"][0];
        assert_eq!(section.get("files"), Some("/p/**"));
        let keys: BTreeSet<&str> = section.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, BTreeSet::from(["files", "bears"]));
    }

    #[test]
    fn backslashes_are_escaped() {
        assert_eq!(escape_value(r"C:\src\**"), r"C:\\src\\**");
    }

    #[test]
    fn serializes_entries_as_a_map() {
        let mut s = Section::new("all.X1");
        s.set("files", "a.py");
        s.set("bears", "X");
        let json = serde_yaml::to_string(&s).unwrap();
        assert!(json.contains("name: all.X1"));
        assert!(json.contains("files: a.py"));
    }
}
