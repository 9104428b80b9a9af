//! External command execution.
//!
//! Thin wrapper over `std::process::Command` used for `az`, `confluent` and
//! `git`. Output is captured and trimmed; callers decide what a failure means.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::trace;

use crate::error::{ProcessError, Result};

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct Captured {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Turn a failed run into `ProcessError::Failed`.
    pub fn check(self, program: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            let stderr = if self.stderr.is_empty() {
                self.stdout.clone()
            } else {
                self.stderr.clone()
            };
            Err(ProcessError::Failed {
                program: program.to_string(),
                stderr,
            }
            .into())
        }
    }
}

/// Locate a program on PATH.
///
/// # Errors
///
/// Returns `ProcessError::NotInstalled` if the program cannot be found.
pub fn require(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|_| {
        ProcessError::NotInstalled {
            program: program.to_string(),
        }
        .into()
    })
}

/// Run a program to completion and capture its output.
///
/// A non-zero exit status is not an error here; see [`Captured::check`].
///
/// # Errors
///
/// Returns `ProcessError::Spawn` if the program cannot be started.
pub fn run<S: AsRef<str>>(program: &str, args: &[S], cwd: Option<&Path>) -> Result<Captured> {
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    // Only the subcommand; arguments carry vault names and temp file paths.
    trace!(
        program,
        subcommand = args.first().copied().unwrap_or_default(),
        argc = args.len(),
        cwd = ?cwd,
        "running"
    );

    let mut cmd = Command::new(program);
    cmd.args(&args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let captured = Captured {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };
    trace!(program, success = captured.success, "finished");
    Ok(captured)
}
