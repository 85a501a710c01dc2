//! The install state machine.
//!
//! Given one dependency spec, make sure a working copy exists under the
//! project's modules directory, bring it up to date when asked, and check out
//! the best ref for the spec's constraint.

use std::path::Path;

use anyhow::Context;
use semver::Version;

use crate::config::Config;
use crate::error::AtofetchError;
use crate::manifest::ProjectManifest;
use crate::report::Reporter;
use crate::spec;
use crate::vcs::{VcsBackend, WorkingCopy};
use crate::version::{self, Selection};

/// Install a single dependency. Returns the installed semantic version when
/// selection went through version matching; `@ref` pins and the no-tags
/// default-branch fallback report `None`.
///
/// An existing working copy is left completely untouched unless `upgrade` is
/// set; that path returns `None` immediately.
pub fn install_dependency<B: VcsBackend>(
    backend: &B,
    project_root: &Path,
    config: &Config,
    reporter: &dyn Reporter,
    raw_spec: &str,
    upgrade: bool,
) -> anyhow::Result<Option<Version>> {
    let dep = spec::split(raw_spec);
    if dep.name.is_empty() {
        return Err(AtofetchError::InvalidPackageName(raw_spec.to_string()).into());
    }
    let constraint = dep
        .constraint
        .unwrap_or_else(|| version::WILDCARD.to_string());

    let manifest = ProjectManifest::load(project_root)?;
    let modules_path = project_root.join(manifest.modules_dir());
    std::fs::create_dir_all(&modules_path).with_context(|| {
        format!(
            "failed to create modules directory {}",
            modules_path.display()
        )
    })?;

    let package_path = modules_path.join(&dep.name);
    let working_copy = match backend.probe(&package_path) {
        Some(existing) => {
            if !upgrade {
                reporter.info(&format!(
                    "{} already exists. If you wish to upgrade, use --upgrade",
                    dep.name
                ));
                return Ok(None);
            }
            reporter.info(&format!("Fetching latest changes for {}", dep.name));
            existing.fetch_origin()?;
            existing
        }
        None => {
            reporter.info(&format!("Installing dependency {}", dep.name));
            backend.clone(&config.package_url(&dep.name), &package_path)?
        }
    };

    let tags = working_copy.tag_names()?;
    let (checkout_ref, installed_version) =
        match version::select(&dep.name, &constraint, &tags, reporter)? {
            Selection::Pinned(refname) => (refname, None),
            Selection::Tag { version, tag } => (tag, Some(version)),
            Selection::DefaultBranch => (working_copy.default_branch()?, None),
        };

    // Refuse to clobber local edits. The fetch above is deliberately allowed
    // first; only the checkout is destructive.
    if working_copy.is_dirty()? {
        return Err(AtofetchError::DirtyWorkingCopy { name: dep.name }.into());
    }

    let head_before = working_copy.head_commit()?;
    working_copy.checkout(&checkout_ref)?;
    if working_copy.head_commit()? == head_before {
        reporter.info(&format!(
            "Already on the best option ({checkout_ref}) for {}",
            dep.name
        ));
    } else {
        reporter.info(&format!("Using {checkout_ref} of {}", dep.name));
    }

    Ok(installed_version)
}

/// Install every dependency declared in the project manifest, strictly in
/// order. The first failure aborts the batch.
pub fn install_all<B: VcsBackend>(
    backend: &B,
    project_root: &Path,
    config: &Config,
    reporter: &dyn Reporter,
    upgrade: bool,
) -> anyhow::Result<()> {
    let manifest = ProjectManifest::load(project_root)?;
    for raw_spec in &manifest.dependencies {
        install_dependency(backend, project_root, config, reporter, raw_spec, upgrade)?;
    }
    Ok(())
}
