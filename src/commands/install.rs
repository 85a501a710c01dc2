use std::path::{Path, PathBuf};

use anyhow::Context;
use git2::Repository;
use tracing::info;

use crate::config::Config;
use crate::installer;
use crate::manifest;
use crate::report::ConsoleReporter;
use crate::spec;
use crate::vcs::GitBackend;

pub(super) fn run_install_one(
    cwd: &Path,
    config: &Config,
    raw_spec: &str,
    upgrade: bool,
) -> anyhow::Result<()> {
    let project_root = discover_project_root(cwd)?;
    let installed = installer::install_dependency(
        &GitBackend,
        &project_root,
        config,
        &ConsoleReporter,
        raw_spec,
        upgrade,
    )?;

    let dep = spec::split(raw_spec);
    let manifest_entry = match (&dep.constraint, &installed) {
        // The user gave no constraint: pin a caret range to what was
        // actually installed.
        (None, Some(version)) => format!("{}^{version}", dep.name),
        _ => raw_spec.to_string(),
    };
    manifest::add_dependency(&project_root, &manifest_entry)?;
    info!(package = %dep.name, entry = %manifest_entry, "recorded manifest dependency");

    Ok(())
}

pub(super) fn run_install_all(cwd: &Path, config: &Config, upgrade: bool) -> anyhow::Result<()> {
    let project_root = discover_project_root(cwd)?;
    installer::install_all(&GitBackend, &project_root, config, &ConsoleReporter, upgrade)
}

/// Walk upward from `cwd` to the working tree root of the enclosing
/// repository; that directory is the project root.
pub(super) fn discover_project_root(cwd: &Path) -> anyhow::Result<PathBuf> {
    let repo = Repository::discover(cwd)
        .with_context(|| format!("{} is not inside a project repository", cwd.display()))?;
    repo.workdir().map(Path::to_path_buf).ok_or_else(|| {
        anyhow::anyhow!(
            "project repository at {} has no working tree",
            repo.path().display()
        )
    })
}
