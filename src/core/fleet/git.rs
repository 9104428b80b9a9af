//! Git working copy operations.
//!
//! Every call runs `git` with the repository as working directory.

use std::path::Path;

use crate::core::process::{self, Captured};
use crate::error::{FleetError, Result};

const GIT: &str = "git";

/// A git working copy.
#[derive(Debug, Clone, Copy)]
pub struct Git<'a> {
    name: &'a str,
    dir: &'a Path,
}

impl<'a> Git<'a> {
    /// Working copy `name` located at `dir`.
    pub fn new(name: &'a str, dir: &'a Path) -> Self {
        Self { name, dir }
    }

    fn run(&self, args: &[&str]) -> Result<Captured> {
        process::run(GIT, args, Some(self.dir))
    }

    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let captured = self.run(args)?;
        if !captured.success {
            return Err(FleetError::Git {
                repo: self.name.to_string(),
                detail: captured.stderr,
            }
            .into());
        }
        Ok(captured.stdout)
    }

    /// Whether tracked files have uncommitted changes (untracked files ignored).
    pub fn is_dirty(&self) -> Result<bool> {
        let out = self.run_checked(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(!out.is_empty())
    }

    /// Whether HEAD is detached.
    pub fn is_detached(&self) -> Result<bool> {
        Ok(!self.run(&["symbolic-ref", "-q", "HEAD"])?.success)
    }

    /// Whether the working copy should be left alone: on a branch with local changes.
    pub fn has_local_changes(&self) -> Result<bool> {
        Ok(!self.is_detached()? && self.is_dirty()?)
    }

    /// Whether a local branch exists.
    pub fn has_branch(&self, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{}", branch);
        Ok(self
            .run(&["show-ref", "--verify", "--quiet", reference.as_str()])?
            .success)
    }

    /// Checked-out branch; `None` when HEAD is detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let captured = self.run(&["symbolic-ref", "--short", "-q", "HEAD"])?;
        Ok(captured.success.then_some(captured.stdout))
    }

    /// `git checkout <branch>`.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run_checked(&["checkout", branch]).map(|_| ())
    }

    /// `git checkout -B <branch> <upstream>`, discarding local commits on `branch`.
    pub fn checkout_reset(&self, branch: &str, upstream: &str) -> Result<()> {
        self.run_checked(&["checkout", "-B", branch, upstream])
            .map(|_| ())
    }

    /// `git branch -D <branch>`.
    pub fn delete_branch(&self, branch: &str) -> Result<()> {
        self.run_checked(&["branch", "-D", branch]).map(|_| ())
    }

    /// `git fetch origin --prune`; returns the progress lines git printed.
    pub fn fetch_prune(&self) -> Result<Vec<String>> {
        let captured = self.run(&["fetch", "origin", "--prune"])?;
        if !captured.success {
            return Err(FleetError::Git {
                repo: self.name.to_string(),
                detail: captured.stderr,
            }
            .into());
        }
        Ok(captured
            .stderr
            .lines()
            .chain(captured.stdout.lines())
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Url of the `origin` remote, if configured.
    pub fn origin_url(&self) -> Result<Option<String>> {
        let captured = self.run(&["remote", "get-url", "origin"])?;
        Ok((captured.success && !captured.stdout.is_empty()).then_some(captured.stdout))
    }

    /// Whether `origin` is reached over ssh (any url without `http`).
    pub fn is_ssh(&self) -> Result<bool> {
        Ok(self
            .origin_url()?
            .map_or(false, |url| !url.contains("http")))
    }

    /// Tracked paths with unstaged changes.
    pub fn modified_paths(&self) -> Result<Vec<String>> {
        let out = self.run_checked(&["diff", "--name-only"])?;
        Ok(out.lines().map(str::to_string).collect())
    }
}

/// Clone `url` into `parent/name`.
pub fn clone(parent: &Path, name: &str, url: &str) -> Result<()> {
    let captured = process::run(GIT, &["clone", url, name], Some(parent))?;
    if !captured.success {
        return Err(FleetError::Git {
            repo: name.to_string(),
            detail: captured.stderr,
        }
        .into());
    }
    Ok(())
}
