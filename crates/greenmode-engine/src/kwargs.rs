//! Candidate values for bear settings.
//!
//! Boolean settings are tried both ways. Other settings take their values
//! from the setting-type table: type2 settings from the facts recorded in the
//! project data, type3 settings from the table itself. Settings the table
//! does not know are left to the bear's default when optional; a required
//! one gets an empty candidate list, which makes the whole product empty.

use itertools::Itertools;
use tracing::debug;

use greenmode_core::model::{Assignment, SettingValue};
use greenmode_core::project::ProjectData;
use greenmode_plugins::settings::{BearSettings, SettingDomain, SettingTypeResolver};

/// Ordered setting name → candidate values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates {
    lists: Vec<(String, Vec<SettingValue>)>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidates of `name`. A name seen before keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<SettingValue>) {
        let name = name.into();
        match self.lists.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = values,
            None => self.lists.push((name, values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[SettingValue]> {
        self.lists
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Length of the longest candidate list.
    pub fn longest(&self) -> usize {
        self.lists.iter().map(|(_, v)| v.len()).max().unwrap_or(0)
    }

    /// Settings without a single candidate value.
    pub fn exhausted(&self) -> Vec<String> {
        self.lists
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// `self` updated with `other`; shared names take `other`'s values.
    pub fn merged(&self, other: &Candidates) -> Candidates {
        let mut out = self.clone();
        for (name, values) in &other.lists {
            out.insert(name.clone(), values.clone());
        }
        out
    }

    /// Number of assignments [`Candidates::product`] yields.
    pub fn product_len(&self) -> usize {
        self.lists.iter().map(|(_, v)| v.len()).product()
    }

    /// Every assignment of the cartesian product, the first setting varying
    /// slowest. No settings at all gives a single empty assignment.
    pub fn product(&self) -> Vec<Assignment> {
        if self.lists.is_empty() {
            return vec![Assignment::new()];
        }
        self.lists
            .iter()
            .map(|(_, values)| values.iter())
            .multi_cartesian_product()
            .map(|combo| {
                self.lists
                    .iter()
                    .map(|(name, _)| name.clone())
                    .zip(combo.into_iter().cloned())
                    .collect()
            })
            .collect()
    }
}

fn bool_candidates() -> Vec<SettingValue> {
    vec![SettingValue::Bool(true), SettingValue::Bool(false)]
}

/// Raise integer candidates below `floor` to it, dropping repeats.
fn clamp_to_floor(values: Vec<SettingValue>, floor: Option<i64>) -> Vec<SettingValue> {
    let mut out: Vec<SettingValue> = Vec::with_capacity(values.len());
    for value in values {
        let value = match (value.as_int(), floor) {
            (Some(v), Some(f)) if v < f => SettingValue::Int(f),
            _ => value,
        };
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Builds candidate lists for the two search passes of a bear.
#[derive(Debug, Clone, Copy)]
pub struct CandidateBuilder<'a> {
    resolver: &'a SettingTypeResolver,
    data: &'a ProjectData,
}

impl<'a> CandidateBuilder<'a> {
    pub fn new(resolver: &'a SettingTypeResolver, data: &'a ProjectData) -> Self {
        Self { resolver, data }
    }

    fn others(&self, setting: &str, bear: &str, default: Option<&SettingValue>) -> Option<Vec<SettingValue>> {
        let (domain, table_value) = self.resolver.resolve(setting, bear)?;
        match domain {
            SettingDomain::Type2 => {
                let found = self.data.setting(setting)?.clone().into_candidates();
                Some(clamp_to_floor(found, default.and_then(SettingValue::as_int)))
            }
            SettingDomain::Type3 => Some(table_value.into_candidates()),
            SettingDomain::Unknown(tag) => {
                debug!(bear, setting, %tag, "setting has an unknown domain");
                None
            }
        }
    }

    /// Candidates for the required settings of a bear.
    pub fn non_optional(&self, settings: &BearSettings) -> Candidates {
        let mut out = Candidates::new();
        for name in &settings.non_optional.settings_bool {
            out.insert(name.clone(), bool_candidates());
        }
        for name in &settings.non_optional.settings_others {
            let values = self.others(name, &settings.bear, None).unwrap_or_default();
            out.insert(name.clone(), values);
        }
        out
    }

    /// Candidates for the optional settings of a bear. Settings without any
    /// candidate keep their default and are left out.
    pub fn optional(&self, settings: &BearSettings) -> Candidates {
        let mut out = Candidates::new();
        for name in &settings.optional.settings_bool {
            out.insert(name.clone(), bool_candidates());
        }
        for name in &settings.optional.settings_others {
            match self.others(name, &settings.bear, settings.default_of(name)) {
                Some(values) if !values.is_empty() => out.insert(name.clone(), values),
                _ => {}
            }
        }
        out
    }
}
