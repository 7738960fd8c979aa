//! Setting classification.
//!
//! Every bear setting is sorted into "boolean" or "other". Non-optional
//! settings (no default) and optional settings (with a default) are
//! classified separately:
//!
//! - non-optional: a type annotation on an entry function wins; a parameter
//!   the entry function declares without a default is "other"; anything else
//!   is looked up through the dependency tree.
//! - optional: a type annotation wins (searched through the dependency tree
//!   for run-style bears, through `create_arguments` then `generate_config`
//!   for linter bears); otherwise the runtime type of the default decides.
//!
//! Dependency data is computed once per bear name and shared between every
//! bear that depends on it.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use greenmode_core::model::SettingValue;
use greenmode_core::{GreenError, GreenResult};

use crate::introspect::undecorated;
use crate::plugin::{Annotation, Bear, BearKind, FunctionSig};

/// Which kind of settings a classification pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Optional,
    NonOptional,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::NonOptional => "non-optional",
        }
    }
}

impl FromStr for Trigger {
    type Err = GreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optional" => Ok(Self::Optional),
            "non-optional" => Ok(Self::NonOptional),
            other => Err(GreenError::InvalidTrigger(other.to_string())),
        }
    }
}

/// Setting names split by value kind. The two lists are disjoint and free of
/// duplicates; the first classification of a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingTypes {
    pub settings_bool: Vec<String>,
    pub settings_others: Vec<String>,
}

impl SettingTypes {
    pub fn contains(&self, key: &str) -> bool {
        self.settings_bool.iter().any(|k| k == key) || self.settings_others.iter().any(|k| k == key)
    }

    fn push(&mut self, key: &str, is_bool: bool) {
        if self.contains(key) {
            return;
        }
        if is_bool {
            self.settings_bool.push(key.to_string());
        } else {
            self.settings_others.push(key.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.settings_bool.len() + self.settings_others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Settings inventory of one bear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BearSettings {
    pub bear: String,
    pub kind: BearKind,
    pub non_optional: SettingTypes,
    pub optional: SettingTypes,
    /// Optional settings with their defaults, in inventory order.
    pub defaults: Vec<(String, SettingValue)>,
}

impl BearSettings {
    pub fn default_of(&self, key: &str) -> Option<&SettingValue> {
        self.defaults.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Immutable view of a bear and its dependencies.
#[derive(Debug)]
pub struct DepNode {
    pub name: String,
    pub is_run: bool,
    /// Undecorated entry functions.
    pub functions: Vec<FunctionSig>,
    host_supplied: &'static [&'static str],
    pub deps: Vec<Arc<DepNode>>,
}

impl DepNode {
    fn first_function(&self) -> Option<&FunctionSig> {
        self.functions.first()
    }

    fn own_required(&self) -> Vec<String> {
        self.functions
            .iter()
            .flat_map(|f| f.params.iter())
            .filter(|p| p.is_required() && !self.host_supplied.contains(&p.name.as_str()))
            .map(|p| p.name.clone())
            .collect()
    }

    fn own_defaults(&self) -> Vec<(String, SettingValue)> {
        self.functions
            .iter()
            .flat_map(|f| f.params.iter())
            .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
            .collect()
    }

    /// Required settings of this bear followed by those of every transitive
    /// dependency.
    pub fn non_optional(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_required(&mut out);
        out
    }

    fn collect_required(&self, out: &mut Vec<String>) {
        for name in self.own_required() {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        for dep in &self.deps {
            dep.collect_required(out);
        }
    }

    /// Settings with defaults. For run-style bears the defaults of every
    /// transitive dependency are merged on top; a dependency default replaces
    /// the value but keeps the position of an earlier entry.
    pub fn optional(&self) -> Vec<(String, SettingValue)> {
        let mut out = Vec::new();
        merge_defaults(&mut out, self.own_defaults());
        if self.is_run {
            for dep in &self.deps {
                dep.collect_optional(&mut out);
            }
        }
        out
    }

    fn collect_optional(&self, out: &mut Vec<(String, SettingValue)>) {
        merge_defaults(out, self.own_defaults());
        for dep in &self.deps {
            dep.collect_optional(out);
        }
    }

    fn annotation_in_functions(&self, key: &str) -> Option<&Annotation> {
        self.functions.iter().find_map(|f| f.annotation(key))
    }

    fn annotation_recursive(&self, key: &str) -> Option<&Annotation> {
        if let Some(a) = self.first_function().and_then(|f| f.annotation(key)) {
            return Some(a);
        }
        self.deps.iter().find_map(|d| d.annotation_recursive(key))
    }
}

fn merge_defaults(out: &mut Vec<(String, SettingValue)>, items: Vec<(String, SettingValue)>) {
    for (name, value) in items {
        match out.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => out.push((name, value)),
        }
    }
}

/// Dependency-tree nodes memoized by bear name.
#[derive(Debug, Default)]
pub struct DependencyTree {
    nodes: Mutex<BTreeMap<String, Arc<DepNode>>>,
}

impl DependencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, bear: &dyn Bear) -> GreenResult<Arc<DepNode>> {
        let mut stack = Vec::new();
        self.build(bear, &mut stack)
    }

    /// Number of distinct bears expanded so far.
    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(&self, bear: &dyn Bear, stack: &mut Vec<String>) -> GreenResult<Arc<DepNode>> {
        let name = bear.name().to_string();
        if let Some(node) = self.nodes.lock().get(&name) {
            return Ok(node.clone());
        }
        if stack.contains(&name) {
            return Err(GreenError::invariant(format!(
                "bear dependency cycle through {name}"
            )));
        }

        stack.push(name.clone());
        let deps = bear
            .deps()
            .iter()
            .map(|dep| self.build(dep.as_ref(), stack))
            .collect::<GreenResult<Vec<_>>>()?;
        stack.pop();

        let entry = bear.entry();
        let node = Arc::new(DepNode {
            name: name.clone(),
            is_run: entry.is_run(),
            functions: entry
                .functions()
                .into_iter()
                .map(|f| undecorated(f).clone())
                .collect(),
            host_supplied: entry.host_supplied(),
            deps,
        });

        Ok(self.nodes.lock().entry(name).or_insert(node).clone())
    }
}

/// Classifies bear settings, sharing dependency data between bears.
#[derive(Debug, Default)]
pub struct SettingClassifier {
    tree: DependencyTree,
}

impl SettingClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &DependencyTree {
        &self.tree
    }

    /// Classify `settings` (name plus default, `None` for required ones) of
    /// `bear` under the given trigger.
    ///
    /// An unknown trigger fails before anything is classified.
    pub fn classify(
        &self,
        bear: &dyn Bear,
        settings: &[(String, Option<SettingValue>)],
        trigger: &str,
    ) -> GreenResult<SettingTypes> {
        let trigger: Trigger = trigger.parse()?;
        let node = self.tree.node(bear)?;
        Ok(classify_node(&node, settings, trigger))
    }

    /// Full settings inventory of `bear`.
    pub fn bear_settings(&self, bear: &dyn Bear) -> GreenResult<BearSettings> {
        let node = self.tree.node(bear)?;

        let required: Vec<(String, Option<SettingValue>)> =
            node.non_optional().into_iter().map(|n| (n, None)).collect();
        let defaults = node.optional();
        let optional: Vec<(String, Option<SettingValue>)> = defaults
            .iter()
            .map(|(n, v)| (n.clone(), Some(v.clone())))
            .collect();

        let out = BearSettings {
            bear: node.name.clone(),
            kind: bear.kind(),
            non_optional: classify_node(&node, &required, Trigger::NonOptional),
            optional: classify_node(&node, &optional, Trigger::Optional),
            defaults,
        };
        debug!(
            bear = %out.bear,
            non_optional = out.non_optional.len(),
            optional = out.optional.len(),
            "classified bear settings"
        );
        Ok(out)
    }
}

/// Settings inventories of every bear, first occurrence per bear name.
pub fn collect_bear_settings(
    bears: &BTreeMap<String, Vec<Arc<dyn Bear>>>,
) -> GreenResult<Vec<BearSettings>> {
    let classifier = SettingClassifier::new();
    let mut out: Vec<BearSettings> = Vec::new();
    for bear in bears.values().flatten() {
        if out.iter().any(|s| s.bear == bear.name()) {
            continue;
        }
        out.push(classifier.bear_settings(bear.as_ref())?);
    }
    Ok(out)
}

fn classify_node(
    node: &DepNode,
    settings: &[(String, Option<SettingValue>)],
    trigger: Trigger,
) -> SettingTypes {
    let mut out = SettingTypes::default();
    for (key, default) in settings {
        match trigger {
            Trigger::Optional => classify_optional(node, key, default.as_ref(), &mut out),
            Trigger::NonOptional => classify_non_optional(node, key, &mut out),
        }
    }
    out
}

fn classify_optional(node: &DepNode, key: &str, default: Option<&SettingValue>, out: &mut SettingTypes) {
    let annotation = if node.is_run {
        node.annotation_recursive(key)
    } else {
        node.annotation_in_functions(key)
    };
    match annotation {
        Some(a) => out.push(key, a.is_bool()),
        None => out.push(key, matches!(default, Some(SettingValue::Bool(_)))),
    }
}

fn classify_non_optional(node: &DepNode, key: &str, out: &mut SettingTypes) {
    if let Some(a) = node.annotation_in_functions(key) {
        out.push(key, a.is_bool());
        return;
    }

    let params = node.functions.iter().flat_map(|f| f.params.iter());
    let has_default = params.clone().any(|p| p.name == key && !p.is_required());
    let declared = params.clone().any(|p| p.name == key);
    if declared && !has_default {
        out.push(key, false);
        return;
    }

    classify_from_deps(node, key, out);
}

fn classify_from_deps(node: &DepNode, key: &str, out: &mut SettingTypes) {
    for dep in &node.deps {
        let run = dep.first_function();
        if let Some(a) = run.and_then(|f| f.annotation(key)) {
            out.push(key, a.is_bool());
        } else if run
            .and_then(|f| f.param_named(key))
            .map_or(false, |p| p.is_required())
        {
            out.push(key, false);
        }
        classify_from_deps(dep, key, out);
    }
}
