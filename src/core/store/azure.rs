//! Azure Key Vault store.
//!
//! Drives the `az` CLI. The subscription is passed on every call instead of
//! relying on whatever `az account set` left behind.
//!
//! ## Requirements
//!
//! - `az` CLI must be installed and logged in
//! - The caller needs secret list/get (and set for writes) permissions
//!
//! Values are written through an owner-only temporary file passed with
//! `--file`, so they never appear on the `az` command line.

use std::io::Write;
use std::path::Path;

use tracing::{debug, trace};

use super::SecretStore;
use crate::core::domain::Snapshot;
use crate::core::process::{self, Captured};
use crate::error::{ProcessError, Result, StoreError};

const AZ: &str = "az";

/// Markers in `az` error output that mean the caller lacks access.
const DENIED_MARKERS: &[&str] = &[
    "Forbidden",
    "AuthorizationFailed",
    "does not have secrets",
    "not authorized",
    "Please run 'az login'",
];

/// Markers in `az` error output that mean a secret does not exist.
const NOT_FOUND_MARKERS: &[&str] = &["SecretNotFound", "was not found"];

/// A Key Vault reached through the `az` CLI.
#[derive(Debug, Clone)]
pub struct AzureKeyVault {
    name: String,
    subscription: Option<String>,
}

impl AzureKeyVault {
    /// Vault by name; `subscription` is threaded into every call.
    pub fn new(name: String, subscription: Option<String>) -> Self {
        Self { name, subscription }
    }

    fn args(&self, action: &str, extra: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = ["keyvault", "secret", action, "--vault-name", self.name.as_str()]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(subscription) = &self.subscription {
            args.push("--subscription".to_string());
            args.push(subscription.clone());
        }
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    pub(crate) fn list_args(&self) -> Vec<String> {
        self.args("list", &["--query", "[?attributes.enabled].name", "-o", "json"])
    }

    pub(crate) fn show_args(&self, name: &str) -> Vec<String> {
        self.args("show", &["--name", name, "--query", "value", "-o", "json"])
    }

    pub(crate) fn set_args(&self, name: &str, value_file: &Path) -> Vec<String> {
        let path = value_file.to_string_lossy().into_owned();
        self.args(
            "set",
            &["--name", name, "--file", path.as_str(), "--encoding", "utf-8", "-o", "none"],
        )
    }

    fn call(&self, args: &[String]) -> Result<Captured> {
        process::require(AZ)?;
        let captured = process::run(AZ, args, None)?;
        if !captured.success && is_denied(&captured.stderr) {
            return Err(StoreError::AccessDenied {
                store: self.name.clone(),
                detail: first_line(&captured.stderr),
            }
            .into());
        }
        Ok(captured)
    }

    fn failed(&self, captured: &Captured) -> StoreError {
        StoreError::CommandFailed {
            store: self.name.clone(),
            detail: first_line(&captured.stderr),
        }
    }
}

fn is_denied(stderr: &str) -> bool {
    DENIED_MARKERS.iter().any(|m| stderr.contains(m))
}

fn is_not_found(stderr: &str) -> bool {
    NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m))
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

fn parse_json<T: serde::de::DeserializeOwned>(stdout: &str) -> Result<T> {
    serde_json::from_str(stdout).map_err(|e| {
        ProcessError::Output {
            program: AZ.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

impl SecretStore for AzureKeyVault {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn list(&self) -> Result<Snapshot> {
        debug!(vault = %self.name, "listing secrets");
        let captured = self.call(&self.list_args())?;
        if !captured.success {
            return Err(self.failed(&captured).into());
        }

        let names: Vec<String> = parse_json(&captured.stdout)?;
        let mut snapshot = Snapshot::new(self.name.clone());
        for name in names {
            trace!(vault = %self.name, name = %name, "fetching value");
            let value = self.get(&name)?.ok_or_else(|| StoreError::NotFound {
                store: self.name.clone(),
                name: name.clone(),
            })?;
            snapshot.insert(name, value);
        }
        debug!(vault = %self.name, secrets = snapshot.len(), "listed secrets");
        Ok(snapshot)
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        let captured = self.call(&self.show_args(name))?;
        if !captured.success {
            if is_not_found(&captured.stderr) {
                return Ok(None);
            }
            return Err(self.failed(&captured).into());
        }
        Ok(Some(parse_json(&captured.stdout)?))
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        debug!(vault = %self.name, name, "setting secret");
        let mut value_file = tempfile::Builder::new().prefix("opskit-").tempfile()?;
        value_file.write_all(value.as_bytes())?;
        value_file.flush()?;

        let captured = self.call(&self.set_args(name, value_file.path()))?;
        if !captured.success {
            return Err(self.failed(&captured).into());
        }
        Ok(())
    }
}
