//! Error types for opskit.
//!
//! Every error is terminal for the run: `main` prints it and exits with 1.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    /// The operator declined a confirmation prompt.
    #[error("aborted: operation declined by operator")]
    UserAbort,

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Misconfiguration: bad color, bad store locator, broken config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid color '{0}': expected 'blue' or 'green'")]
    InvalidColor(String),

    #[error("active color unknown: pass --color or set secret '{secret}' in the environment store")]
    MissingColor { secret: String },

    #[error("invalid store '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("missing config field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failures while talking to a secret store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("access denied to {store}: {detail}")]
    AccessDenied { store: String, detail: String },

    #[error("secret '{name}' not found in {store}")]
    NotFound { store: String, name: String },

    #[error("{store}: {detail}")]
    CommandFailed { store: String, detail: String },

    #[error("invalid snapshot file {path}: {reason}")]
    InvalidSnapshot { path: PathBuf, reason: String },
}

/// Failures of the blue/green reconciliation run.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("source store {store} has no secrets (likely misconfigured)")]
    EmptySource { store: String },

    #[error("schema registry api key '{name}' differs between stores")]
    SchemaRegistryKeyMismatch { name: String },
}

/// Failures of external command-line tools.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{program} not found on PATH")]
    NotInstalled { program: String },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed: {stderr}")]
    Failed { program: String, stderr: String },

    #[error("{program} is not authorized: {detail}")]
    Unauthorized { program: String, detail: String },

    #[error("unexpected output from {program}: {reason}")]
    Output { program: String, reason: String },
}

/// Failures of git fleet operations.
#[derive(Error, Debug)]
pub enum FleetError {
    #[error("fleet directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("not git repositories: {}", .0.join(", "))]
    UnknownRepositories(Vec<String>),

    #[error("git failed in {repo}: {detail}")]
    Git { repo: String, detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
