//! Version-control plumbing behind the installer.
//!
//! The installer only sees the two traits here, so its state machine can be
//! exercised against an in-memory backend in tests while production runs on
//! git2.

use std::path::Path;

use anyhow::Context;
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{AutotagOption, FetchOptions, RemoteCallbacks, Repository};
use tracing::debug;

/// A local clone of a package repository.
pub trait WorkingCopy {
    fn fetch_origin(&self) -> anyhow::Result<()>;
    fn tag_names(&self) -> anyhow::Result<Vec<String>>;
    /// Staged or worktree modifications; untracked files don't count.
    fn is_dirty(&self) -> anyhow::Result<bool>;
    fn head_commit(&self) -> anyhow::Result<String>;
    fn default_branch(&self) -> anyhow::Result<String>;
    fn checkout(&self, refname: &str) -> anyhow::Result<()>;
}

pub trait VcsBackend {
    type Repo: WorkingCopy;

    /// `Some` when `path` holds a valid repository, `None` otherwise.
    fn probe(&self, path: &Path) -> Option<Self::Repo>;
    fn clone(&self, url: &str, path: &Path) -> anyhow::Result<Self::Repo>;
}

pub struct GitBackend;

pub struct GitWorkingCopy {
    repo: Repository,
}

impl VcsBackend for GitBackend {
    type Repo = GitWorkingCopy;

    fn probe(&self, path: &Path) -> Option<GitWorkingCopy> {
        Repository::open(path).ok().map(|repo| GitWorkingCopy { repo })
    }

    fn clone(&self, url: &str, path: &Path) -> anyhow::Result<GitWorkingCopy> {
        let repo = RepoBuilder::new()
            .fetch_options(fetch_options_with_progress("clone", url))
            .clone(url, path)
            .with_context(|| format!("failed to clone {} into {}", url, path.display()))?;
        Ok(GitWorkingCopy { repo })
    }
}

impl WorkingCopy for GitWorkingCopy {
    fn fetch_origin(&self) -> anyhow::Result<()> {
        let mut remote = self
            .repo
            .find_remote("origin")
            .context("working copy has no origin remote")?;
        let remote_url = remote.url().unwrap_or("<unknown>").to_string();

        let mut options = fetch_options_with_progress("fetch", &remote_url);
        remote
            .fetch(&[] as &[&str], Some(&mut options), None)
            .with_context(|| format!("failed to fetch updates from {remote_url}"))?;
        Ok(())
    }

    fn tag_names(&self) -> anyhow::Result<Vec<String>> {
        let tags = self
            .repo
            .tag_names(None)
            .context("failed to list repository tags")?;
        Ok(tags.iter().flatten().map(str::to_string).collect())
    }

    fn is_dirty(&self) -> anyhow::Result<bool> {
        let mut options = git2::StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .context("failed to read working copy status")?;
        Ok(!statuses.is_empty())
    }

    fn head_commit(&self) -> anyhow::Result<String> {
        let head = self.repo.head().context("failed to resolve HEAD")?;
        let commit = head
            .peel_to_commit()
            .context("HEAD does not point at a commit")?;
        Ok(commit.id().to_string())
    }

    fn default_branch(&self) -> anyhow::Result<String> {
        if let Ok(reference) = self.repo.find_reference("refs/remotes/origin/HEAD")
            && let Some(target) = reference.symbolic_target()
            && let Some(branch) = target.strip_prefix("refs/remotes/origin/")
        {
            return Ok(branch.to_string());
        }

        let head = self.repo.head().context("failed to resolve HEAD")?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("unable to determine a default branch"))
    }

    fn checkout(&self, refname: &str) -> anyhow::Result<()> {
        // Tags and local branches resolve directly; a branch that only exists
        // on the remote needs the origin/ prefix.
        let candidates = [refname.to_string(), format!("origin/{refname}")];
        let (object, reference) = candidates
            .iter()
            .find_map(|candidate| self.repo.revparse_ext(candidate).ok())
            .ok_or_else(|| anyhow::anyhow!("'{refname}' does not name a known ref"))?;

        let mut options = CheckoutBuilder::new();
        self.repo
            .checkout_tree(&object, Some(&mut options))
            .with_context(|| format!("failed to check out '{refname}'"))?;

        match reference.as_ref().filter(|r| r.is_branch()).and_then(|r| r.name()) {
            Some(branch_ref) => self
                .repo
                .set_head(branch_ref)
                .with_context(|| format!("failed to point HEAD at {branch_ref}"))?,
            None => {
                let commit = object
                    .peel_to_commit()
                    .with_context(|| format!("'{refname}' does not peel to a commit"))?;
                self.repo
                    .set_head_detached(commit.id())
                    .with_context(|| format!("failed to detach HEAD at '{refname}'"))?;
            }
        }

        Ok(())
    }
}

fn fetch_options_with_progress(operation: &'static str, git_url: &str) -> FetchOptions<'static> {
    let mut callbacks = RemoteCallbacks::new();
    let git_url = git_url.to_string();
    let mut last_reported_percent = 0usize;
    callbacks.transfer_progress(move |stats| {
        let total_objects = stats.total_objects();
        if total_objects == 0 {
            return true;
        }

        let percent = stats.received_objects().saturating_mul(100) / total_objects;
        if percent >= last_reported_percent.saturating_add(10) || percent == 100 {
            debug!(
                operation = operation,
                git_url = %git_url,
                received_objects = stats.received_objects(),
                total_objects = total_objects,
                received_bytes = stats.received_bytes(),
                percent = percent,
                "git transfer progress"
            );
            last_reported_percent = percent;
        }

        true
    });

    let mut options = FetchOptions::new();
    // Tag refs are the whole point of a package working copy.
    options.download_tags(AutotagOption::All);
    options.remote_callbacks(callbacks);
    options
}
