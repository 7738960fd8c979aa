//! Green mode run orchestration.
//!
//! One run goes through these stages, in order:
//! - `project.snapshot`: snapshot the tree into the project data file and
//!   read it back
//! - `project.affixes`: record common filename prefixes and suffixes
//! - `project.facts`: load every file, collect ignore ranges and line facts
//! - `bears.select`: split files by language and pick the bears
//! - `search`: non-op and unified trial passes per bear
//! - `sections`: aggregate green records and build the sections
//!
//! The project data file is written at the start and deleted at the end of a
//! run; one left over by an interrupted run is removed first.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use greenmode_core::aggregate::{aggregate, SettingBucket};
use greenmode_core::config::{validate_config, GreenModeConfig};
use greenmode_core::glob::{common_affixes, GlobSynthesizer};
use greenmode_core::model::{FileDict, IgnoreRange, SettingValue};
use greenmode_core::project::ProjectData;
use greenmode_core::{GreenError, GreenResult};
use greenmode_plugins::builtin::{MarkerIgnoreProvider, QuickstartBear};
use greenmode_plugins::plugin::IgnoreRangeProvider;
use greenmode_plugins::settings::{collect_bear_settings, SettingTypeResolver, SettingTypeTable};
use greenmode_plugins::BearRegistry;
use greenmode_store::{load_file_dict, snapshot, FsLister, ProjectDataFile};

use crate::kwargs::CandidateBuilder;
use crate::languages::{project_languages, split_by_language, ExtensionTable, LanguageDetector};
use crate::pool::WorkerPool;
use crate::search::{preferred_records, BearOutcome, SearchEngine, TrialContext};
use crate::sections::{GreenSections, SectionBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// A structured note collected during a run, for display by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
}

/// Diagnostics sink shared by the stages of a run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub diagnostics: Vec<Diagnostic>,
}

impl RunContext {
    pub fn push_info(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Info,
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn push_warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warning,
            code: code.into(),
            message: message.into(),
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files: usize,
    pub languages: Vec<String>,
    pub bears: usize,
    pub trials: usize,
    pub sections: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GreenReport {
    pub project_dir: String,
    pub sections: GreenSections,
    pub outcomes: Vec<BearOutcome>,
    /// Project data as it was at the end of the run.
    pub project_data: ProjectData,
    pub stats: RunStats,
    pub diagnostics: Vec<Diagnostic>,
}

impl GreenReport {
    pub fn warnings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .count()
    }
}

/// Resolve relative ignore globs against the project and always leave the
/// `.git` directory out.
pub fn effective_ignore_globs(project_dir: &str, ignore_globs: &[String]) -> Vec<String> {
    let mut out: Vec<String> = ignore_globs
        .iter()
        .map(|glob| {
            if glob.starts_with('/') {
                glob.clone()
            } else {
                format!("{project_dir}/{}", glob.trim_start_matches("./"))
            }
        })
        .collect();
    let git = format!("{project_dir}/.git/**");
    if !out.contains(&git) {
        out.push(git);
    }
    out
}

/// Record detected filename affixes in the project data.
pub fn record_affixes(data: &mut ProjectData, min_length: usize, min_files: usize) {
    let affixes = common_affixes(&data.file_names(), min_length, min_files);
    let as_values = |items: Vec<String>| -> Vec<SettingValue> {
        items.into_iter().map(SettingValue::from).collect()
    };
    data.append_values("filename_prefix", as_values(affixes.prefixes));
    data.append_values("filename_suffix", as_values(affixes.suffixes));
}

/// Fold per-file line facts into the project data, then raise every fact
/// that falls below its type2 floor.
pub fn record_facts(data: &mut ProjectData, files: &FileDict, floors: &BTreeMap<String, SettingValue>) {
    for lines in files.values() {
        if let Some(facts) = QuickstartBear::scan(lines) {
            QuickstartBear::record(&facts, data);
        }
    }
    for (setting, floor) in floors {
        if let Some(floor) = floor.as_int() {
            data.raise_to_floor(setting, floor);
        }
    }
}

/// Green mode driver. Holds the configuration and the pluggable parts; a
/// run takes the project directory and the bears to consider.
pub struct GreenMode {
    config: GreenModeConfig,
    resolver: SettingTypeResolver,
    ignore_provider: Box<dyn IgnoreRangeProvider>,
    detector: Box<dyn LanguageDetector>,
    capabilities: BTreeSet<String>,
}

impl GreenMode {
    /// Driver with the built-in setting table, comment-marker ignore ranges
    /// and the built-in extension table.
    pub fn new(config: GreenModeConfig) -> GreenResult<Self> {
        validate_config(&config)?;
        Ok(Self {
            config,
            resolver: SettingTypeResolver::new(SettingTypeTable::builtin()?),
            ignore_provider: Box::new(MarkerIgnoreProvider),
            detector: Box::new(ExtensionTable::default()),
            capabilities: BTreeSet::new(),
        })
    }

    pub fn with_setting_table(mut self, table: SettingTypeTable) -> Self {
        self.resolver = SettingTypeResolver::new(table);
        self
    }

    pub fn with_ignore_provider(mut self, provider: Box<dyn IgnoreRangeProvider>) -> Self {
        self.ignore_provider = provider;
        self
    }

    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Only bears detecting at least one of `capabilities` take part. Empty
    /// means every bear.
    pub fn with_capabilities(mut self, capabilities: BTreeSet<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn config(&self) -> &GreenModeConfig {
        &self.config
    }

    /// Run green mode over `project_dir`.
    pub fn run(&self, project_dir: &Path, registry: &BearRegistry) -> GreenResult<GreenReport> {
        if !project_dir.is_dir() {
            return Err(GreenError::invalid_argument(format!(
                "project directory {} does not exist",
                project_dir.display()
            )));
        }
        let dir = project_dir.to_string_lossy().trim_end_matches('/').to_string();
        let mut ctx = RunContext::default();
        let ignore_globs = effective_ignore_globs(&dir, &self.config.project.ignore_globs);

        let data_file = ProjectDataFile::new(project_dir, &self.config.project.data_file);
        if data_file.remove_stale()? {
            ctx.push_warning(
                "project.stale_data",
                format!("removed stale {}", data_file.path().display()),
            );
        }

        let snap = snapshot(project_dir, &ignore_globs)?;
        data_file.write(&ProjectData::new(snap.dir_structure))?;
        info!(
            project = %dir,
            files = snap.stats.files,
            skipped = snap.stats.skipped,
            "project snapshot written"
        );

        let result = data_file
            .read()
            .map_err(GreenError::from)
            .and_then(|data| self.run_stages(&dir, &ignore_globs, data, registry, &mut ctx));

        // Final dump, then remove.
        let mut report = match result {
            Ok(report) => {
                data_file.write(&report.project_data)?;
                data_file.remove()?;
                report
            }
            Err(err) => {
                if let Err(cleanup) = data_file.remove() {
                    warn!(error = %cleanup, "could not remove project data file");
                }
                return Err(err);
            }
        };

        report.diagnostics = ctx.diagnostics;
        info!(
            project = %dir,
            bears = report.stats.bears,
            trials = report.stats.trials,
            sections = report.stats.sections,
            "green mode finished"
        );
        Ok(report)
    }

    fn run_stages(
        &self,
        dir: &str,
        ignore_globs: &[String],
        mut data: ProjectData,
        registry: &BearRegistry,
        ctx: &mut RunContext,
    ) -> GreenResult<GreenReport> {
        record_affixes(&mut data, self.config.affixes.min_length, self.config.affixes.min_files);

        let files = data.complete_filename_list(dir);
        let file_dict = load_file_dict(&files)?;
        let ignores: Vec<IgnoreRange> = self.ignore_provider.ignore_ranges(&file_dict);
        record_facts(&mut data, &file_dict, &self.resolver.table().type2_defaults());
        debug!(files = files.len(), ignores = ignores.len(), "project facts recorded");

        let lang_files = split_by_language(&files, &file_dict, self.detector.as_ref());
        let languages = project_languages(&lang_files);
        let bears = registry.by_language(&languages, &self.capabilities);
        let settings = collect_bear_settings(&bears)?;
        if settings.is_empty() {
            ctx.push_warning("bears.none", "no bear applies to this project");
        }

        let pool = WorkerPool::new(self.config.search.workers);
        debug!(
            policy = self.config.search.workers.as_str(),
            threads = pool.threads(),
            "searching green settings"
        );
        let trial_ctx = TrialContext {
            files: &file_dict,
            lang_files: &lang_files,
            ignores: &ignores,
        };
        let engine = SearchEngine::new(&pool, &self.config.search, trial_ctx);
        let builder = CandidateBuilder::new(&self.resolver, &data);
        let outcomes = engine.search_all(&bears, &settings, &builder)?;
        for outcome in &outcomes {
            note_outcome(outcome, ctx);
        }

        let aggregated: BTreeMap<String, Vec<SettingBucket>> = preferred_records(&outcomes)
            .into_iter()
            .map(|(bear, records)| (bear, aggregate(&records)))
            .collect();
        let lister = FsLister::new(ignore_globs.to_vec())
            .excluding(format!("{dir}/{}", self.config.project.data_file));
        let synthesizer = GlobSynthesizer::new(
            &lister,
            self.config.globs.max_ignore_files,
            self.config.globs.coverage_ratio,
        );
        let sections = SectionBuilder::new(synthesizer, dir, &files, ignore_globs).build(&aggregated);
        for bear in aggregated.keys().filter(|b| !sections.bears.contains_key(*b)) {
            ctx.push_info("sections.none", format!("{bear} has no green settings"));
        }

        let stats = RunStats {
            files: files.len(),
            languages,
            bears: settings.len(),
            trials: outcomes.iter().map(|o| o.trials).sum(),
            sections: sections.len(),
        };
        Ok(GreenReport {
            project_dir: dir.to_string(),
            sections,
            outcomes,
            project_data: data,
            stats,
            diagnostics: Vec::new(),
        })
    }
}

fn note_outcome(outcome: &BearOutcome, ctx: &mut RunContext) {
    if !outcome.exhausted.is_empty() {
        ctx.push_warning(
            "search.no_candidates",
            format!(
                "{} ({}): no candidate values for {}",
                outcome.bear,
                outcome.language,
                outcome.exhausted.join(", ")
            ),
        );
    }
    if outcome.unified.is_none() {
        ctx.push_info(
            "search.unified_skipped",
            format!("{} ({}): optional settings not searched", outcome.bear, outcome.language),
        );
    }
}
