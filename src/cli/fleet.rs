//! Fleet commands: git operations across every working copy.

use crate::cli::{output, prompt, Context};
use crate::core::confirm::{Answer, Choices};
use crate::core::constants::MAIN_UPSTREAM;
use crate::core::fleet::{self, Fleet, Outcome, RepoReport};
use crate::error::{ConfigError, Error, Result};

fn open(ctx: &Context) -> Result<Fleet> {
    Ok(Fleet::from_config(ctx.config.fleet()?))
}

fn report(reports: &[RepoReport]) {
    if reports.is_empty() {
        output::dimmed("no repositories");
        return;
    }

    for r in reports {
        let name = output::key(&r.repo);
        match &r.outcome {
            Outcome::CheckedOut(branch) => output::success(&format!("{}: on {}", name, branch)),
            Outcome::Reset => output::success(&format!("{}: reset to {}", name, MAIN_UPSTREAM)),
            Outcome::Deleted(switched) => {
                if *switched {
                    output::success(&format!("{}: deleted (switched to master first)", name))
                } else {
                    output::success(&format!("{}: deleted", name))
                }
            }
            Outcome::Fetched(lines) => {
                output::success(&format!("{}: fetched", name));
                for line in lines {
                    output::dimmed(&format!("    {}", line));
                }
            }
            Outcome::Branch(Some(branch)) => println!("  {}  {}", name, branch),
            Outcome::Branch(None) => println!("  {}  (detached)", name),
            Outcome::Clean => {}
            Outcome::Dirty(paths) => {
                output::header(&r.repo);
                for path in paths {
                    output::list_item(path);
                }
            }
            Outcome::Cloned => output::success(&format!("{}: cloned", name)),
            Outcome::SkippedDirty => output::warn(&format!("Skipped - repo {} is dirty", r.repo)),
            Outcome::MissingBranch => {}
        }
    }
}

/// Check out a branch in every repository that has it.
pub fn checkout(ctx: &Context, branch: &str) -> Result<()> {
    let reports = open(ctx)?.checkout(branch)?;
    report(&reports);
    if !reports
        .iter()
        .any(|r| matches!(r.outcome, Outcome::CheckedOut(_) | Outcome::SkippedDirty))
    {
        output::hint(&format!("no repository has a local branch '{}'", branch));
    }
    Ok(())
}

/// Clone every Azure DevOps repository not yet present.
pub fn clone(ctx: &Context) -> Result<()> {
    let config = ctx.config.fleet()?;
    let organization = config
        .organization
        .as_deref()
        .ok_or(ConfigError::MissingField {
            field: "fleet.organization",
        })?;
    let project = config.project.as_deref().ok_or(ConfigError::MissingField {
        field: "fleet.project",
    })?;

    let remotes = fleet::list_repositories(organization, project)?;
    let reports = Fleet::from_config(config).clone_missing(&remotes)?;
    if reports.is_empty() {
        output::success("every repository is already cloned");
    } else {
        report(&reports);
    }
    Ok(())
}

/// Delete a local branch everywhere.
pub fn delete_branch(ctx: &Context, branch: &str) -> Result<()> {
    let reports = open(ctx)?.delete_branch(branch)?;
    report(&reports);
    Ok(())
}

/// Fetch and prune every ssh repository.
pub fn fetch(ctx: &Context) -> Result<()> {
    report(&open(ctx)?.fetch()?);
    Ok(())
}

/// Print the current branch of every ssh repository.
pub fn branches(ctx: &Context) -> Result<()> {
    report(&open(ctx)?.branches()?);
    Ok(())
}

/// Reset master to origin/master everywhere except in `except`.
pub fn reset(ctx: &Context, except: &[String]) -> Result<()> {
    let fleet = open(ctx)?;
    fleet.ensure_known(except)?;

    let prompt = format!(
        "Reset master to {} in every repository of {}? Local commits on master are lost",
        MAIN_UPSTREAM,
        fleet.root().display()
    );
    let mut gate = prompt::gate(ctx.assume_yes);
    if gate.ask(&prompt, Choices::YesNo)? != Answer::Yes {
        return Err(Error::UserAbort);
    }

    report(&fleet.reset(except)?);
    Ok(())
}

/// List modified files of every dirty ssh repository.
pub fn status(ctx: &Context) -> Result<()> {
    let reports = open(ctx)?.status()?;
    if reports.iter().all(|r| r.outcome == Outcome::Clean) {
        output::success("every repository is clean");
    } else {
        report(&reports);
    }
    Ok(())
}
