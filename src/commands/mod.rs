mod footprint;
mod install;

use std::path::Path;

use crate::cli::Command;
use crate::config::Config;

pub fn execute(cwd: &Path, config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Install {
            spec,
            upgrade,
            jlcpcb,
        } => {
            if let Some(component_id) = jlcpcb {
                footprint::run_footprint(cwd, &component_id)?;
            } else if let Some(spec) = spec {
                install::run_install_one(cwd, config, &spec, upgrade)?;
            } else {
                install::run_install_all(cwd, config, upgrade)?;
            }
            println!("Done!");
            Ok(())
        }
    }
}
