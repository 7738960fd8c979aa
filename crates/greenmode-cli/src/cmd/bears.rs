use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use greenmode_plugins::builtin::default_registry;

use crate::output;

#[derive(Serialize)]
struct BearOut<'a> {
    name: &'a str,
    kind: &'static str,
    languages: &'a BTreeSet<String>,
    can_detect: &'a BTreeSet<String>,
    green_compatible: bool,
    meta: &'a BTreeMap<String, String>,
}

pub fn run(language: Option<&str>) -> Result<()> {
    let registry = default_registry()?;
    let language = language.map(str::to_lowercase);

    let bears: Vec<BearOut<'_>> = registry
        .iter()
        .filter(|(_, reg)| match &language {
            Some(lang) => reg.spec.applies_to(lang),
            None => true,
        })
        .map(|(name, reg)| BearOut {
            name,
            kind: reg.bear.kind().as_str(),
            languages: &reg.spec.languages,
            can_detect: &reg.spec.can_detect,
            green_compatible: reg.spec.green_compatible,
            meta: &reg.spec.meta,
        })
        .collect();

    if output::is_json() {
        return output::print(&bears);
    }

    let mut out = output::stdout();
    for bear in &bears {
        let langs: Vec<&str> = bear.languages.iter().map(String::as_str).collect();
        writeln!(out, "{:<24} {:<7} {}", bear.name, bear.kind, langs.join(", "))?;
    }
    Ok(())
}
