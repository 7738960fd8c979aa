//! Bear registry.
//!
//! The registry stores available bears keyed by name, with their specs.
//! Iteration and selection are deterministic (name order). The registry never
//! runs a bear.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use crate::plugin::Bear;
use crate::spec::{evaluate_spec, BearSpec, ALL_LANGUAGES};

/// A bear instance plus its static spec.
pub struct RegisteredBear {
    pub spec: BearSpec,
    pub bear: Arc<dyn Bear>,
}

/// Registry of bears keyed by bear name.
#[derive(Default)]
pub struct BearRegistry {
    bears: BTreeMap<String, RegisteredBear>,
}

impl BearRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bears.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bears.is_empty()
    }

    /// Register a bear with its spec.
    pub fn register(&mut self, spec: BearSpec, bear: Arc<dyn Bear>) -> anyhow::Result<()> {
        spec.validate()?;

        if spec.name != bear.name() {
            anyhow::bail!(
                "spec name {} does not match bear name {}",
                spec.name,
                bear.name()
            );
        }
        if self.bears.contains_key(&spec.name) {
            anyhow::bail!("bear already registered: {}", spec.name);
        }

        self.bears
            .insert(spec.name.clone(), RegisteredBear { spec, bear });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredBear> {
        self.bears.get(name)
    }

    pub fn list_names(&self) -> Vec<String> {
        self.bears.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegisteredBear)> {
        self.bears.iter()
    }

    /// Bears taking part in green mode, per language.
    ///
    /// `languages` are the languages found in the project; the `all` bucket
    /// is always present and holds the language-independent bears. Languages
    /// without any applicable bear are left out.
    pub fn by_language(
        &self,
        languages: &[String],
        capabilities: &BTreeSet<String>,
    ) -> BTreeMap<String, Vec<Arc<dyn Bear>>> {
        let mut wanted: Vec<String> = languages.iter().map(|l| l.to_lowercase()).collect();
        if !wanted.iter().any(|l| l == ALL_LANGUAGES) {
            wanted.push(ALL_LANGUAGES.to_string());
        }

        let mut out: BTreeMap<String, Vec<Arc<dyn Bear>>> = BTreeMap::new();
        for language in &wanted {
            for reg in self.bears.values() {
                let specific = language == ALL_LANGUAGES
                    || !reg.spec.languages.contains(ALL_LANGUAGES);
                let ev = evaluate_spec(&reg.spec, language, capabilities);
                if !ev.allowed || !specific {
                    if let Some(reason) = ev.reason {
                        debug!(bear = %reg.spec.name, language = %language, %reason, "bear not selected");
                    }
                    continue;
                }
                out.entry(language.clone())
                    .or_default()
                    .push(reg.bear.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{Entry, FunctionSig, TrialInput};
    use greenmode_core::model::{Assignment, Finding};

    struct NamedBear(&'static str);

    impl Bear for NamedBear {
        fn name(&self) -> &str {
            self.0
        }
        fn entry(&self) -> Entry {
            Entry::Run(FunctionSig::new("run"))
        }
        fn run(&self, _: &Assignment, _: &TrialInput<'_>) -> anyhow::Result<Vec<Finding>> {
            Ok(Vec::new())
        }
    }

    fn registry() -> BearRegistry {
        let mut reg = BearRegistry::new();
        reg.register(
            BearSpec::new("PyBear").language("Python").detects("Formatting"),
            Arc::new(NamedBear("PyBear")),
        )
        .unwrap();
        reg.register(
            BearSpec::new("AnyBear").language("all").detects("Formatting"),
            Arc::new(NamedBear("AnyBear")),
        )
        .unwrap();
        reg.register(
            BearSpec::new("OffBear").language("all").green_compatible(false),
            Arc::new(NamedBear("OffBear")),
        )
        .unwrap();
        reg
    }

    fn names(bears: &[Arc<dyn Bear>]) -> Vec<&str> {
        bears.iter().map(|b| b.name()).collect()
    }

    #[test]
    fn registry_register_and_get() {
        let reg = registry();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.list_names(), vec!["AnyBear", "OffBear", "PyBear"]);
        assert_eq!(reg.get("PyBear").unwrap().bear.name(), "PyBear");
        assert!(reg.get("Missing").is_none());
    }

    #[test]
    fn duplicate_and_mismatched_names_are_rejected() {
        let mut reg = registry();
        let dup = reg.register(BearSpec::new("PyBear").language("python"), Arc::new(NamedBear("PyBear")));
        assert!(dup.unwrap_err().to_string().contains("already registered"));

        let mismatch = reg.register(BearSpec::new("X").language("python"), Arc::new(NamedBear("Y")));
        assert!(mismatch.is_err());
    }

    #[test]
    fn selection_splits_language_and_all_bears() {
        let reg = registry();
        let by_lang = reg.by_language(&["Python".to_string(), "C".to_string()], &BTreeSet::new());
        assert_eq!(by_lang.keys().collect::<Vec<_>>(), vec!["all", "python"]);
        assert_eq!(names(&by_lang["python"]), vec!["PyBear"]);
        assert_eq!(names(&by_lang["all"]), vec!["AnyBear"]);
    }

    #[test]
    fn selection_honors_capabilities() {
        let reg = registry();
        let wanted: BTreeSet<String> = ["Security".to_string()].into_iter().collect();
        assert!(reg.by_language(&["python".to_string()], &wanted).is_empty());
    }
}
