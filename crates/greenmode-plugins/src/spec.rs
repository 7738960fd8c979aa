//! Bear specification types.
//!
//! A `BearSpec` is static, data-only metadata stored next to a bear in the
//! registry:
//! - the languages the bear applies to (`all` for language-independent bears)
//! - the issue kinds it can detect
//! - whether green mode may tune it
//!
//! Specs drive bear selection; they never run a bear.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

/// Language tag for bears that apply to every file.
pub const ALL_LANGUAGES: &str = "all";

/// Static description of a bear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearSpec {
    /// Bear name; must equal `Bear::name`.
    pub name: String,

    /// Lower-cased language names.
    pub languages: BTreeSet<String>,

    /// Issue kinds the bear detects (e.g. "Formatting", "Duplication").
    pub can_detect: BTreeSet<String>,

    /// Bears known not to converge on green settings are excluded from green
    /// mode regardless of language.
    pub green_compatible: bool,

    /// Free-form metadata for listings.
    pub meta: BTreeMap<String, String>,
}

impl BearSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            green_compatible: true,
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.languages.insert(language.into().to_lowercase());
        self
    }

    pub fn detects(mut self, capability: impl Into<String>) -> Self {
        self.can_detect.insert(capability.into());
        self
    }

    pub fn green_compatible(mut self, yes: bool) -> Self {
        self.green_compatible = yes;
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// True if the bear applies to files of `language`.
    pub fn applies_to(&self, language: &str) -> bool {
        let language = language.to_lowercase();
        self.languages.contains(ALL_LANGUAGES) || self.languages.contains(&language)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("bear name is empty");
        }
        if !self.name.is_ascii() {
            anyhow::bail!("bear name must be ASCII: {}", self.name);
        }
        if self.languages.is_empty() {
            anyhow::bail!("bear {} declares no language", self.name);
        }
        Ok(())
    }
}

/// Outcome of matching a spec against a selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecEvaluation {
    pub allowed: bool,

    /// Denial reason (if not allowed).
    pub reason: Option<String>,

    /// Requested capabilities the bear cannot detect.
    pub missing: Vec<String>,
}

impl SpecEvaluation {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            missing: Vec::new(),
        }
    }

    pub fn denied(reason: impl Into<String>, missing: Vec<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            missing,
        }
    }
}

/// Decide whether a bear takes part in green mode for `language`.
///
/// An empty `capabilities` set accepts any bear; otherwise the bear must
/// detect at least one of them.
pub fn evaluate_spec(spec: &BearSpec, language: &str, capabilities: &BTreeSet<String>) -> SpecEvaluation {
    if !spec.green_compatible {
        return SpecEvaluation::denied("bear is not green mode compatible", Vec::new());
    }
    if !spec.applies_to(language) {
        return SpecEvaluation::denied(format!("bear does not handle {language}"), Vec::new());
    }
    if capabilities.is_empty() || capabilities.iter().any(|c| spec.can_detect.contains(c)) {
        return SpecEvaluation::allowed();
    }
    let missing = capabilities.iter().cloned().collect();
    SpecEvaluation::denied("bear detects none of the requested capabilities", missing)
}
