use anyhow::Result;

use crate::args::{Cli, Command};
use crate::io::config::load_config;

mod bears;
mod run;
mod settings;
mod snapshot;

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Run(args) => run::run(config, &args),
        Command::Bears { language } => bears::run(language.as_deref()),
        Command::Settings { bear, table } => settings::run(bear.as_deref(), table.as_deref()),
        Command::Snapshot { project, ignore } => snapshot::run(config, &project, &ignore),
    }
}
