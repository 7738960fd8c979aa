use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use termcolor::Color;

use greenmode_core::config::GreenModeConfig;
use greenmode_engine::{Diagnostic, DiagnosticLevel, GreenMode, GreenSections, RunStats};
use greenmode_plugins::builtin::default_registry;

use crate::args::RunArgs;
use crate::io::config::{apply_run_overrides, load_table};
use crate::io::export::{render_coafile, write_coafile};
use crate::output;

#[derive(Serialize)]
struct RunOut<'a> {
    project: &'a str,
    written: Option<PathBuf>,
    stats: &'a RunStats,
    sections: &'a GreenSections,
    diagnostics: &'a [Diagnostic],
}

pub fn run(mut config: GreenModeConfig, args: &RunArgs) -> Result<()> {
    apply_run_overrides(&mut config, args);

    let registry = default_registry()?;
    let capabilities: BTreeSet<String> = args.capabilities.iter().cloned().collect();
    let mut green = GreenMode::new(config)?.with_capabilities(capabilities);
    if let Some(table) = &args.table {
        green = green.with_setting_table(load_table(table)?);
    }

    let pb = if output::is_json() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("searching green settings in {}", args.project.display()));

    let result = green.run(&args.project, &registry);
    pb.finish_and_clear();
    let report = result?;

    let text = render_coafile(&report.sections);
    let written = if args.dry_run {
        None
    } else {
        Some(write_coafile(&args.project, &args.suffix, &text)?)
    };

    if output::is_json() {
        return output::print(&RunOut {
            project: &report.project_dir,
            written,
            stats: &report.stats,
            sections: &report.sections,
            diagnostics: &report.diagnostics,
        });
    }

    for diag in &report.diagnostics {
        if diag.level == DiagnosticLevel::Warning {
            output::eprintln_line(&format!("warning[{}]: {}", diag.code, diag.message));
        }
    }
    match written {
        Some(path) => output::colored_line(
            Color::Green,
            true,
            &format!("'{}' successfully generated.", path.display()),
        )?,
        None => print!("{text}"),
    }
    println!(
        "{} files, {} bears, {} trials, {} sections",
        report.stats.files, report.stats.bears, report.stats.trials, report.stats.sections
    );
    Ok(())
}
