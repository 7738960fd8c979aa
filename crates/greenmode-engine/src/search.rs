//! Trial search.
//!
//! For every bear the cartesian product of candidate values is tried: per
//! file of the bear's language for local bears, once over the whole project
//! for global bears. A trial is green when the bear (and every bear it
//! depends on) reports nothing outside the project's ignore ranges.
//!
//! Each bear is searched twice. The non-op pass covers the required settings
//! only; the unified pass adds the optional ones and is skipped when the
//! optional search space is too large.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use greenmode_core::config::SearchConfig;
use greenmode_core::model::{findings_are_green, Assignment, FileDict, IgnoreRange, SettingValue, FILENAME_KEY};
use greenmode_core::{GreenError, GreenResult};
use greenmode_plugins::introspect::undecorated;
use greenmode_plugins::settings::BearSettings;
use greenmode_plugins::{Bear, BearKind, TrialInput};

use crate::kwargs::{CandidateBuilder, Candidates};
use crate::pool::WorkerPool;

/// Which pass produced a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    NonOp,
    Unified,
}

impl Pass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonOp => "non-op",
            Self::Unified => "unified",
        }
    }
}

/// Search result of one bear in one language bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BearOutcome {
    pub bear: String,
    pub language: String,
    /// Green records of the non-op pass.
    pub non_op: Vec<Assignment>,
    /// Green records of the unified pass; `None` when the pass was skipped.
    pub unified: Option<Vec<Assignment>>,
    /// Required settings that had no candidate value.
    pub exhausted: Vec<String>,
    /// Trials evaluated over both passes.
    pub trials: usize,
}

impl BearOutcome {
    /// Unified records when that pass ran, non-op records otherwise.
    pub fn preferred(&self) -> &[Assignment] {
        self.unified.as_deref().unwrap_or(&self.non_op)
    }
}

/// Records of every bear, merged across language buckets in bucket order.
pub fn preferred_records(outcomes: &[BearOutcome]) -> BTreeMap<String, Vec<Assignment>> {
    let mut out: BTreeMap<String, Vec<Assignment>> = BTreeMap::new();
    for outcome in outcomes {
        out.entry(outcome.bear.clone())
            .or_default()
            .extend(outcome.preferred().iter().cloned());
    }
    out
}

/// Shared, read-only inputs of every trial.
#[derive(Debug, Clone, Copy)]
pub struct TrialContext<'a> {
    pub files: &'a FileDict,
    pub lang_files: &'a BTreeMap<String, Vec<String>>,
    pub ignores: &'a [IgnoreRange],
}

struct Trial<'a> {
    filename: Option<&'a str>,
    assignment: Assignment,
}

/// A dependency and the parameter names its entry point declares.
struct Gate {
    bear: Arc<dyn Bear>,
    params: BTreeSet<String>,
}

impl Gate {
    fn new(bear: Arc<dyn Bear>) -> Self {
        let params = bear
            .entry()
            .functions()
            .into_iter()
            .flat_map(|f| undecorated(f).params.iter().map(|p| p.name.clone()))
            .collect();
        Self { bear, params }
    }

    fn restrict(&self, assignment: &Assignment) -> Assignment {
        assignment
            .iter()
            .filter(|(k, _)| self.params.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

pub struct SearchEngine<'a> {
    pool: &'a WorkerPool,
    limits: &'a SearchConfig,
    ctx: TrialContext<'a>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(pool: &'a WorkerPool, limits: &'a SearchConfig, ctx: TrialContext<'a>) -> Self {
        Self { pool, limits, ctx }
    }

    fn lines(&self, file: &str) -> &'a [String] {
        self.ctx.files.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    fn is_green(&self, bear: &dyn Bear, settings: &Assignment, input: &TrialInput<'_>) -> GreenResult<bool> {
        let findings = bear
            .run(settings, input)
            .map_err(|err| GreenError::bear(bear.name(), &err))?;
        Ok(findings_are_green(&findings, self.ctx.ignores))
    }

    fn gate_passes(&self, gate: &Gate, assignment: &Assignment, input: &TrialInput<'_>) -> GreenResult<bool> {
        let settings = gate.restrict(assignment);
        match (gate.bear.kind(), input) {
            (BearKind::Local, TrialInput::Global { files }) => {
                for (filename, file) in files.iter() {
                    let local = TrialInput::Local {
                        filename: filename.as_str(),
                        file: file.as_slice(),
                    };
                    if !self.is_green(gate.bear.as_ref(), &settings, &local)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (BearKind::Global, TrialInput::Local { .. }) => {
                let global = TrialInput::Global { files: self.ctx.files };
                self.is_green(gate.bear.as_ref(), &settings, &global)
            }
            _ => self.is_green(gate.bear.as_ref(), &settings, input),
        }
    }

    fn run_trial(&self, bear: &dyn Bear, gates: &[Gate], trial: &Trial<'_>) -> GreenResult<Option<Assignment>> {
        let input = match trial.filename {
            Some(filename) => TrialInput::Local {
                filename,
                file: self.lines(filename),
            },
            None => TrialInput::Global { files: self.ctx.files },
        };

        for gate in gates {
            if !self.gate_passes(gate, &trial.assignment, &input)? {
                return Ok(None);
            }
        }
        if !self.is_green(bear, &trial.assignment, &input)? {
            return Ok(None);
        }

        let mut record = trial.assignment.clone();
        if let Some(filename) = trial.filename {
            record.insert(FILENAME_KEY.to_string(), SettingValue::from(filename));
        }
        Ok(Some(record))
    }

    /// Try every assignment of `candidates`, returning the green records in
    /// product order (files outermost for local bears).
    pub fn run_pass(
        &self,
        bear: &Arc<dyn Bear>,
        language: &str,
        candidates: &Candidates,
        pass: Pass,
    ) -> GreenResult<(Vec<Assignment>, usize)> {
        let product = candidates.product();
        if product.is_empty() {
            debug!(bear = bear.name(), language, pass = pass.as_str(), "no candidate assignments");
            return Ok((Vec::new(), 0));
        }

        let trials: Vec<Trial<'a>> = match bear.kind() {
            BearKind::Local => {
                let files = self.ctx.lang_files.get(language).map(Vec::as_slice).unwrap_or(&[]);
                files
                    .iter()
                    .flat_map(|file| {
                        product.iter().map(move |assignment| Trial {
                            filename: Some(file.as_str()),
                            assignment: assignment.clone(),
                        })
                    })
                    .collect()
            }
            BearKind::Global => product
                .into_iter()
                .map(|assignment| Trial {
                    filename: None,
                    assignment,
                })
                .collect(),
        };

        let gates: Vec<Gate> = bear.deps().into_iter().map(Gate::new).collect();
        let results = self
            .pool
            .try_map(&trials, |trial| self.run_trial(bear.as_ref(), &gates, trial))?;
        let records: Vec<Assignment> = results.into_iter().flatten().collect();

        debug!(
            bear = bear.name(),
            language,
            pass = pass.as_str(),
            trials = trials.len(),
            green = records.len(),
            "pass finished"
        );
        Ok((records, trials.len()))
    }

    fn unified_allowed(&self, optional: &Candidates) -> bool {
        optional.len() < self.limits.max_optional_args
            && optional.longest() <= self.limits.max_values_per_optional_arg
    }

    /// Both passes for one bear.
    pub fn search_bear(
        &self,
        bear: &Arc<dyn Bear>,
        language: &str,
        settings: &BearSettings,
        builder: &CandidateBuilder<'_>,
    ) -> GreenResult<BearOutcome> {
        let non_op = builder.non_optional(settings);
        let (non_op_records, mut trials) = self.run_pass(bear, language, &non_op, Pass::NonOp)?;

        let optional = builder.optional(settings);
        let unified = if self.unified_allowed(&optional) {
            let (records, n) = self.run_pass(bear, language, &non_op.merged(&optional), Pass::Unified)?;
            trials += n;
            Some(records)
        } else {
            info!(
                bear = bear.name(),
                optional = optional.len(),
                longest = optional.longest(),
                "optional search space too large, skipping unified pass"
            );
            None
        };

        Ok(BearOutcome {
            bear: bear.name().to_string(),
            language: language.to_string(),
            non_op: non_op_records,
            unified,
            exhausted: non_op.exhausted(),
            trials,
        })
    }

    /// Search every bear of every language bucket, buckets in key order.
    pub fn search_all(
        &self,
        bears: &BTreeMap<String, Vec<Arc<dyn Bear>>>,
        settings: &[BearSettings],
        builder: &CandidateBuilder<'_>,
    ) -> GreenResult<Vec<BearOutcome>> {
        let mut out = Vec::new();
        for (language, list) in bears {
            for bear in list {
                let bear_settings = settings
                    .iter()
                    .find(|s| s.bear == bear.name())
                    .ok_or_else(|| GreenError::invariant(format!("no settings inventory for {}", bear.name())))?;
                out.push(self.search_bear(bear, language, bear_settings, builder)?);
            }
        }
        Ok(out)
    }
}
