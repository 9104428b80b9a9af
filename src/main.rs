//! opskit - operator automation for blue/green Kafka credentials, Key Vaults and git fleets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use opskit::cli::output;
use opskit::cli::{execute, Cli};
use opskit::core::constants::LOG_ENV;
use opskit::error::{ConfigError, Error, ProcessError, ReconcileError, StoreError};

/// Follow-up suggestion for errors the operator can fix directly.
fn suggestion(e: &Error) -> Option<String> {
    match e {
        Error::Store(StoreError::AccessDenied { .. }) => {
            Some("run: az login, and check the vault access policy".to_string())
        }
        Error::Process(ProcessError::Unauthorized { program, .. }) => {
            Some(format!("run: {} login", program))
        }
        Error::Process(ProcessError::NotInstalled { program }) => {
            Some(format!("install the {} CLI and make sure it is on PATH", program))
        }
        Error::Config(ConfigError::MissingColor { .. }) => {
            Some("pass --color blue or --color green".to_string())
        }
        Error::Config(ConfigError::MissingField { field }) if field.starts_with("fleet") => {
            Some("add a [fleet] section with a directory to .opskit.toml".to_string())
        }
        Error::Reconcile(ReconcileError::EmptySource { .. }) => {
            Some("check the --kafka store and the Azure subscription".to_string())
        }
        Error::Reconcile(ReconcileError::SchemaRegistryKeyMismatch { .. }) => Some(
            "update the schema registry key in the environment store, then run again".to_string(),
        ),
        _ => None,
    }
}

fn main() {
    // Usage errors exit 1 like every other misconfiguration; help and version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("opskit=debug")
        } else {
            EnvFilter::new("opskit=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
