mod cli;
mod commands;
mod config;
mod error;
mod installer;
mod logging;
mod manifest;
mod report;
mod spec;
mod vcs;
mod version;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use crate::cli::{Cli, Command};

fn main() {
    if let Err(err) = run() {
        error!(error = %err, "command failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let cwd = std::env::current_dir().context("failed to get current working directory")?;
    let config = config::load(&cwd).context("failed to load configuration")?;

    info!(
        mode = command_mode(&cli.command),
        cwd = %cwd.display(),
        package_index = %config.package_index,
        "starting command"
    );

    commands::execute(&cwd, &config, cli.command)
}

fn command_mode(command: &Command) -> &'static str {
    match command {
        Command::Install {
            jlcpcb: Some(_), ..
        } => "install_footprint",
        Command::Install { spec: Some(_), .. } => "install_one",
        Command::Install { .. } => "install_all",
    }
}
