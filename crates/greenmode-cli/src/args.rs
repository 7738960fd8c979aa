use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "greenmode", version, about = "Infer a green configuration for a project")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (repeat for trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Green mode configuration file (YAML or JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search green settings and write `.coafile.green`.
    Run(RunArgs),

    /// List registered bears.
    Bears {
        /// Only bears applying to this language.
        #[arg(long)]
        language: Option<String>,
    },

    /// Show how every bear's settings are classified and where their
    /// candidate values come from.
    Settings {
        /// Only this bear.
        bear: Option<String>,

        /// Setting table replacing the built-in one.
        #[arg(long)]
        table: Option<PathBuf>,
    },

    /// Dump the project data green mode would search with.
    Snapshot {
        /// Project directory.
        #[arg(default_value = ".")]
        project: PathBuf,

        /// Extra ignore globs, relative to the project.
        #[arg(long)]
        ignore: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Project directory.
    #[arg(default_value = ".")]
    pub project: PathBuf,

    /// Extra ignore globs, relative to the project.
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Worker threads for trials (default: cores - 1).
    #[arg(long, conflicts_with = "sequential")]
    pub jobs: Option<usize>,

    /// Run every trial on the main thread.
    #[arg(long)]
    pub sequential: bool,

    #[arg(long)]
    pub max_optional_args: Option<usize>,

    #[arg(long)]
    pub max_values_per_optional_arg: Option<usize>,

    /// Only bears detecting one of these capabilities.
    #[arg(long = "capability")]
    pub capabilities: Vec<String>,

    /// Setting table replacing the built-in one.
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Appended to the output file name.
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Print the sections instead of writing them.
    #[arg(long)]
    pub dry_run: bool,
}
