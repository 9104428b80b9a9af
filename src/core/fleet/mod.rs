//! Git fleet management.
//!
//! Applies one git operation to every working copy in a directory. Working
//! copies are the direct subdirectories containing `.git`, processed in name
//! order. Blacklisted names are never touched, and names containing
//! `outdated.` are ignored by delete, fetch, branch listing and status.

mod devops;
mod git;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::config::FleetConfig;
use crate::core::constants::{MAIN_BRANCH, MAIN_UPSTREAM, OUTDATED_MARKER, OUTDATED_PREFIX};
use crate::core::types::RepoName;
use crate::error::{FleetError, Result};

pub use devops::{list_repositories, organization_url, RemoteRepo};
pub use git::Git;

/// A working copy inside the fleet directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub name: RepoName,
    pub path: PathBuf,
}

impl Repo {
    /// Git handle for this working copy.
    pub fn git(&self) -> Git<'_> {
        Git::new(&self.name, &self.path)
    }
}

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    CheckedOut(String),
    Reset,
    /// Branch deleted; `true` when `master` was checked out first.
    Deleted(bool),
    Fetched(Vec<String>),
    /// Current branch; `None` when HEAD is detached.
    Branch(Option<String>),
    Clean,
    Dirty(Vec<String>),
    Cloned,
    /// Left alone because of uncommitted changes.
    SkippedDirty,
    /// The requested branch does not exist locally.
    MissingBranch,
}

/// Outcome for a named repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub repo: RepoName,
    pub outcome: Outcome,
}

impl RepoReport {
    fn new(repo: &str, outcome: Outcome) -> Self {
        Self {
            repo: repo.to_string(),
            outcome,
        }
    }
}

/// The set of working copies under one directory.
#[derive(Debug, Clone)]
pub struct Fleet {
    root: PathBuf,
    blacklist: Vec<String>,
}

impl Fleet {
    /// Fleet rooted at `root`, never touching names in `blacklist`.
    pub fn new(root: impl Into<PathBuf>, blacklist: Vec<String>) -> Self {
        Self {
            root: root.into(),
            blacklist,
        }
    }

    /// Fleet from the `[fleet]` config section.
    pub fn from_config(config: &FleetConfig) -> Self {
        Self::new(config.directory.clone(), config.blacklist.clone())
    }

    /// Fleet directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist.iter().any(|b| b == name)
    }

    /// Every git working copy, blacklisted ones included, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `FleetError::MissingDirectory` if the root does not exist.
    pub fn discover(&self) -> Result<Vec<Repo>> {
        if !self.root.is_dir() {
            return Err(FleetError::MissingDirectory(self.root.clone()).into());
        }

        let mut repos: Vec<Repo> = std::fs::read_dir(&self.root)?
            .flatten()
            .filter(|e| e.path().is_dir() && e.path().join(".git").exists())
            .map(|e| Repo {
                name: e.file_name().to_string_lossy().to_string(),
                path: e.path(),
            })
            .collect();
        repos.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(root = %self.root.display(), repos = repos.len(), "discovered repositories");
        Ok(repos)
    }

    /// Working copies that are not blacklisted.
    pub fn repositories(&self) -> Result<Vec<Repo>> {
        Ok(self
            .discover()?
            .into_iter()
            .filter(|r| !self.is_blacklisted(&r.name))
            .collect())
    }

    /// Non-blacklisted working copies, without `outdated.` ones.
    pub fn current(&self) -> Result<Vec<Repo>> {
        Ok(self
            .repositories()?
            .into_iter()
            .filter(|r| !r.name.contains(OUTDATED_MARKER))
            .collect())
    }

    fn ssh_only(repos: Vec<Repo>) -> Result<Vec<Repo>> {
        let mut ssh = Vec::with_capacity(repos.len());
        for repo in repos {
            if repo.git().is_ssh()? {
                ssh.push(repo);
            } else {
                debug!(repo = %repo.name, "skipping non-ssh remote");
            }
        }
        Ok(ssh)
    }

    /// Check out `branch` wherever it exists locally.
    pub fn checkout(&self, branch: &str) -> Result<Vec<RepoReport>> {
        let mut reports = Vec::new();
        for repo in self.repositories()? {
            let git = repo.git();
            let outcome = if !git.has_branch(branch)? {
                Outcome::MissingBranch
            } else if git.has_local_changes()? {
                Outcome::SkippedDirty
            } else {
                git.checkout(branch)?;
                info!(repo = %repo.name, branch, "checked out");
                Outcome::CheckedOut(branch.to_string())
            };
            reports.push(RepoReport::new(&repo.name, outcome));
        }
        Ok(reports)
    }

    fn check_known(repos: &[Repo], names: &[String]) -> Result<()> {
        let unknown: Vec<String> = names
            .iter()
            .filter(|name| !repos.iter().any(|r| &r.name == *name))
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(FleetError::UnknownRepositories(unknown).into())
        }
    }

    /// Fail unless every name in `names` is a working copy of the fleet.
    pub fn ensure_known(&self, names: &[String]) -> Result<()> {
        Self::check_known(&self.discover()?, names)
    }

    /// Point `master` at `origin/master` and check it out, except in `except`.
    ///
    /// # Errors
    ///
    /// Returns `FleetError::UnknownRepositories` before touching anything if
    /// a name in `except` is not a working copy.
    pub fn reset(&self, except: &[String]) -> Result<Vec<RepoReport>> {
        let repos = self.discover()?;
        Self::check_known(&repos, except)?;

        let mut reports = Vec::new();
        for repo in repos
            .into_iter()
            .filter(|r| !self.is_blacklisted(&r.name) && !except.contains(&r.name))
        {
            let git = repo.git();
            let outcome = if git.has_local_changes()? {
                Outcome::SkippedDirty
            } else {
                git.checkout_reset(MAIN_BRANCH, MAIN_UPSTREAM)?;
                info!(repo = %repo.name, "reset to {}", MAIN_UPSTREAM);
                Outcome::Reset
            };
            reports.push(RepoReport::new(&repo.name, outcome));
        }
        Ok(reports)
    }

    /// Delete a local branch, moving to `master` first when it is checked out.
    pub fn delete_branch(&self, branch: &str) -> Result<Vec<RepoReport>> {
        let mut reports = Vec::new();
        for repo in self.current()? {
            let git = repo.git();
            if !git.has_branch(branch)? {
                reports.push(RepoReport::new(&repo.name, Outcome::MissingBranch));
                continue;
            }
            let switched = git.current_branch()?.as_deref() == Some(branch);
            if switched {
                git.checkout(MAIN_BRANCH)?;
            }
            git.delete_branch(branch)?;
            info!(repo = %repo.name, branch, "deleted branch");
            reports.push(RepoReport::new(&repo.name, Outcome::Deleted(switched)));
        }
        Ok(reports)
    }

    /// Fetch and prune every ssh working copy.
    pub fn fetch(&self) -> Result<Vec<RepoReport>> {
        let mut reports = Vec::new();
        for repo in Self::ssh_only(self.current()?)? {
            let lines = repo.git().fetch_prune()?;
            reports.push(RepoReport::new(&repo.name, Outcome::Fetched(lines)));
        }
        Ok(reports)
    }

    /// Current branch of every ssh working copy.
    pub fn branches(&self) -> Result<Vec<RepoReport>> {
        let mut reports = Vec::new();
        for repo in Self::ssh_only(self.current()?)? {
            let branch = repo.git().current_branch()?;
            reports.push(RepoReport::new(&repo.name, Outcome::Branch(branch)));
        }
        Ok(reports)
    }

    /// Modified paths of every dirty ssh working copy.
    pub fn status(&self) -> Result<Vec<RepoReport>> {
        let mut reports = Vec::new();
        for repo in Self::ssh_only(self.current()?)? {
            let git = repo.git();
            let outcome = if git.is_dirty()? {
                Outcome::Dirty(git.modified_paths()?)
            } else {
                Outcome::Clean
            };
            reports.push(RepoReport::new(&repo.name, outcome));
        }
        Ok(reports)
    }

    /// Remote repositories that should be cloned: not outdated, not
    /// blacklisted and not present in the fleet directory.
    pub fn missing<'r>(&self, remotes: &'r [RemoteRepo]) -> Vec<&'r RemoteRepo> {
        remotes
            .iter()
            .filter(|r| !r.name.starts_with(OUTDATED_PREFIX))
            .filter(|r| !self.is_blacklisted(&r.name))
            .filter(|r| !self.root.join(&r.name).exists())
            .collect()
    }

    /// Clone every missing remote repository.
    pub fn clone_missing(&self, remotes: &[RemoteRepo]) -> Result<Vec<RepoReport>> {
        if !self.root.is_dir() {
            return Err(FleetError::MissingDirectory(self.root.clone()).into());
        }
        let mut reports = Vec::new();
        for remote in self.missing(remotes) {
            git::clone(&self.root, &remote.name, &remote.ssh_url)?;
            info!(repo = %remote.name, "cloned");
            reports.push(RepoReport::new(&remote.name, Outcome::Cloned));
        }
        Ok(reports)
    }
}
