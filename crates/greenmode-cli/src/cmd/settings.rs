use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use greenmode_core::model::SettingValue;
use greenmode_plugins::builtin::default_registry;
use greenmode_plugins::settings::{BearSettings, SettingClassifier, SettingTypeResolver, SettingTypeTable};

use crate::io::config::load_table;
use crate::output;

#[derive(Serialize)]
struct Domain {
    domain: String,
    value: SettingValue,
}

#[derive(Serialize)]
struct SettingsOut {
    #[serde(flatten)]
    settings: BearSettings,
    /// Table entries of the non-boolean settings.
    domains: BTreeMap<String, Domain>,
}

pub fn run(bear: Option<&str>, table: Option<&Path>) -> Result<()> {
    let registry = default_registry()?;
    let table = match table {
        Some(path) => load_table(path)?,
        None => SettingTypeTable::builtin()?,
    };
    let resolver = SettingTypeResolver::new(table);
    let classifier = SettingClassifier::new();

    if let Some(name) = bear {
        if registry.get(name).is_none() {
            bail!("unknown bear {name}");
        }
    }

    let mut all = Vec::new();
    for (name, reg) in registry.iter() {
        if bear.is_some_and(|b| b != name.as_str()) {
            continue;
        }
        let settings = classifier.bear_settings(reg.bear.as_ref())?;
        let domains = settings
            .non_optional
            .settings_others
            .iter()
            .chain(settings.optional.settings_others.iter())
            .filter_map(|key| {
                resolver.resolve(key, name).map(|(domain, value)| {
                    (
                        key.clone(),
                        Domain {
                            domain: domain.to_string(),
                            value,
                        },
                    )
                })
            })
            .collect();
        all.push(SettingsOut { settings, domains });
    }

    if output::is_json() {
        return output::print(&all);
    }

    let mut out = output::stdout();
    for entry in &all {
        let s = &entry.settings;
        writeln!(out, "{} ({})", s.bear, s.kind.as_str())?;
        writeln!(out, "  required bool:   {}", s.non_optional.settings_bool.join(", "))?;
        writeln!(out, "  required other:  {}", s.non_optional.settings_others.join(", "))?;
        writeln!(out, "  optional bool:   {}", s.optional.settings_bool.join(", "))?;
        writeln!(out, "  optional other:  {}", s.optional.settings_others.join(", "))?;
        for (key, d) in &entry.domains {
            writeln!(out, "    {key}: {} {}", d.domain, d.value)?;
        }
    }
    Ok(())
}
