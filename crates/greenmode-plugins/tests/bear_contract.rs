//! Contract tests for the built-in bears.
//!
//! Guarantees every registered bear must keep:
//! - stable registry and classification order
//! - required settings are host-supplied or classifiable
//! - a run with every required setting present never errors
//! - settings inventories serialize the same way twice

use std::collections::BTreeSet;

use greenmode_core::model::{Assignment, FileDict, SettingValue};
use greenmode_plugins::builtin::default_registry;
use greenmode_plugins::settings::{SettingClassifier, SettingTypeResolver, SettingTypeTable};
use greenmode_plugins::{BearKind, TrialInput};

#[test]
fn registry_order_is_deterministic() {
    let r1 = default_registry().unwrap();
    let r2 = default_registry().unwrap();
    let names = r1.list_names();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names, r2.list_names());
}

#[test]
fn settings_inventory_serializes_stably() {
    let reg = default_registry().unwrap();
    for (_, entry) in reg.iter() {
        let a = SettingClassifier::new().bear_settings(entry.bear.as_ref()).unwrap();
        let b = SettingClassifier::new().bear_settings(entry.bear.as_ref()).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

fn candidate(setting: &str, is_bool: bool, bear: &str, resolver: &SettingTypeResolver) -> SettingValue {
    if is_bool {
        return SettingValue::Bool(true);
    }
    match resolver.resolve(setting, bear) {
        Some((_, value)) => value.into_candidates().into_iter().next().unwrap_or(SettingValue::Null),
        None => SettingValue::Null,
    }
}

#[test]
fn required_settings_are_enough_to_run() {
    let reg = default_registry().unwrap();
    let resolver = SettingTypeResolver::new(SettingTypeTable::builtin().unwrap());
    let classifier = SettingClassifier::new();

    let file = vec!["def f():\n".to_string(), "    return 1\n".to_string()];
    let mut files = FileDict::new();
    files.insert("/p/a.py".to_string(), file.clone());

    for (name, entry) in reg.iter() {
        let settings = classifier.bear_settings(entry.bear.as_ref()).unwrap();
        let mut assignment = Assignment::new();
        for s in &settings.non_optional.settings_bool {
            assignment.insert(s.clone(), candidate(s, true, name, &resolver));
        }
        for s in &settings.non_optional.settings_others {
            let value = candidate(s, false, name, &resolver);
            assert_ne!(value, SettingValue::Null, "{name}.{s} has no candidate");
            assignment.insert(s.clone(), value);
        }

        let input = match entry.bear.kind() {
            BearKind::Local => TrialInput::Local {
                filename: "/p/a.py",
                file: &file,
            },
            BearKind::Global => TrialInput::Global { files: &files },
        };
        entry
            .bear
            .run(&assignment, &input)
            .unwrap_or_else(|e| panic!("{name} failed: {e:#}"));
    }
}

#[test]
fn every_builtin_bear_is_green_compatible() {
    let reg = default_registry().unwrap();
    let selected = reg.by_language(&[], &BTreeSet::new());
    assert_eq!(selected["all"].len(), reg.len());
}
