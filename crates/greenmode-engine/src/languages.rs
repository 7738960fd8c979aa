//! Splitting project files by language.
//!
//! Language keys are lower-cased. Every file also lands in the `all` bucket,
//! which is where language-independent bears look for their files.

use std::collections::BTreeMap;

use greenmode_core::model::FileDict;
use greenmode_plugins::spec::ALL_LANGUAGES;

/// Maps a file to the languages it is written in.
pub trait LanguageDetector: Send + Sync {
    /// Languages of `path`, given its first line when the content is known.
    fn languages(&self, path: &str, first_line: Option<&str>) -> Vec<String>;
}

/// Extension table with a hashbang fallback for extension-less scripts.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    entries: Vec<(&'static str, &'static [&'static str])>,
}

const BUILTIN_EXTENSIONS: &[(&str, &[&str])] = &[
    (".c", &["C"]),
    (".h", &["C", "C++"]),
    (".cc", &["C++"]),
    (".cpp", &["C++"]),
    (".hpp", &["C++"]),
    (".cs", &["C#"]),
    (".css", &["CSS"]),
    (".go", &["Go"]),
    (".html", &["HTML"]),
    (".java", &["Java"]),
    (".js", &["JavaScript"]),
    (".json", &["JSON"]),
    (".md", &["Markdown"]),
    (".php", &["PHP"]),
    (".pl", &["Perl"]),
    (".py", &["Python"]),
    (".rb", &["Ruby"]),
    (".rs", &["Rust"]),
    (".sh", &["Shell"]),
    (".bash", &["Shell"]),
    (".ts", &["TypeScript"]),
    (".xml", &["XML"]),
    (".yaml", &["YAML"]),
    (".yml", &["YAML"]),
];

/// Interpreter names that do not match a language name directly.
const INTERPRETERS: &[(&str, &str)] = &[
    ("bash", "Shell"),
    ("sh", "Shell"),
    ("zsh", "Shell"),
    ("node", "JavaScript"),
];

impl Default for ExtensionTable {
    fn default() -> Self {
        Self {
            entries: BUILTIN_EXTENSIONS.to_vec(),
        }
    }
}

fn extension(path: &str) -> Option<&str> {
    let base = path.rsplit('/').next().unwrap_or(path);
    let dot = base.rfind('.')?;
    if dot == 0 {
        return None;
    }
    Some(&base[dot..])
}

impl ExtensionTable {
    fn by_extension(&self, ext: &str) -> Option<&'static [&'static str]> {
        self.entries
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, langs)| *langs)
    }

    fn known_language(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .flat_map(|(_, langs)| langs.iter())
            .find(|l| l.eq_ignore_ascii_case(name))
            .copied()
    }

    /// Language named by a `#!` line: the interpreter argument when there is
    /// one (`#!/usr/bin/env python3`), otherwise the program's base name.
    fn from_hashbang(&self, line: &str) -> Option<&'static str> {
        let rest = line.strip_prefix("#!")?.trim();
        let mut parts = rest.split_whitespace();
        let program = parts.next()?;
        let name = match parts.next() {
            Some(arg) => arg,
            None => program.rsplit('/').next().unwrap_or(program),
        };
        let name = name.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
        if let Some((_, lang)) = INTERPRETERS.iter().find(|(i, _)| *i == name) {
            return Some(*lang);
        }
        self.known_language(name)
    }
}

impl LanguageDetector for ExtensionTable {
    fn languages(&self, path: &str, first_line: Option<&str>) -> Vec<String> {
        if let Some(langs) = extension(path).and_then(|ext| self.by_extension(ext)) {
            return langs.iter().map(|l| l.to_string()).collect();
        }
        first_line
            .and_then(|line| self.from_hashbang(line))
            .map(|l| vec![l.to_string()])
            .unwrap_or_default()
    }
}

/// Files of each language, in input order. `all` holds every file.
pub fn split_by_language(
    files: &[String],
    contents: &FileDict,
    detector: &dyn LanguageDetector,
) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in files {
        let first_line = contents
            .get(file)
            .and_then(|lines| lines.first())
            .map(String::as_str);
        for lang in detector.languages(file, first_line) {
            let bucket = out.entry(lang.to_lowercase()).or_default();
            if !bucket.contains(file) {
                bucket.push(file.clone());
            }
        }
        let all = out.entry(ALL_LANGUAGES.to_string()).or_default();
        if !all.contains(file) {
            all.push(file.clone());
        }
    }
    out
}

/// Detected languages, without the `all` bucket.
pub fn project_languages(lang_files: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    lang_files
        .keys()
        .filter(|l| l.as_str() != ALL_LANGUAGES)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_by_extension_and_fills_all() {
        let list = files(&["/p/a.py", "/p/inc/x.h", "/p/README"]);
        let split = split_by_language(&list, &FileDict::new(), &ExtensionTable::default());

        assert_eq!(split["python"], files(&["/p/a.py"]));
        assert_eq!(split["c"], files(&["/p/inc/x.h"]));
        assert_eq!(split["c++"], files(&["/p/inc/x.h"]));
        assert_eq!(split["all"], list);
        assert_eq!(project_languages(&split), vec!["c", "c++", "python"]);
    }

    #[test]
    fn hashbang_names_the_language() {
        let table = ExtensionTable::default();
        assert_eq!(table.languages("/p/run", Some("#!/usr/bin/env python3\n")), vec!["Python"]);
        assert_eq!(table.languages("/p/run", Some("#!/bin/bash\n")), vec!["Shell"]);
        assert!(table.languages("/p/run", Some("plain text\n")).is_empty());
        assert!(table.languages("/p/.profile", None).is_empty());
    }

    #[test]
    fn uses_loaded_contents_for_scripts() {
        let list = files(&["/p/tool"]);
        let mut contents = FileDict::new();
        contents.insert("/p/tool".to_string(), vec!["#!/usr/bin/ruby\n".to_string()]);
        let split = split_by_language(&list, &contents, &ExtensionTable::default());
        assert_eq!(split["ruby"], list);
    }
}
