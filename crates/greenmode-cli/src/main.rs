use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod io;
mod logging;
mod output;

fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);
    logging::init(logging::Verbosity::from_flags(cli.quiet, cli.verbose));

    cmd::dispatch(cli)
}
