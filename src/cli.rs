use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "atofetch",
    version,
    about = "Dependency installer for atopile-style electronics projects"
)]
pub struct Cli {
    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install one dependency, every manifest dependency, or a JLCPCB footprint.
    Install {
        /// Dependency spec, for example:
        /// widget
        /// widget^1.2.0
        /// widget>=1.0
        /// widget@main (pin an explicit branch, tag, or commit)
        /// When omitted, installs everything listed in the project manifest.
        spec: Option<String>,

        /// Fetch and update working copies that already exist.
        #[arg(long)]
        upgrade: bool,

        /// Install a JLCPCB footprint by component id (for example C123)
        /// instead of a package dependency.
        #[arg(long, value_name = "COMPONENT_ID", conflicts_with = "spec")]
        jlcpcb: Option<String>,
    },
}
