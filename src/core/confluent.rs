//! Kafka inspection through the Confluent CLI.
//!
//! Lists clusters, service accounts and api keys. Read-only; every call
//! uses `-o json` and is parsed with serde.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::core::process;
use crate::error::{ProcessError, Result};

const CONFLUENT: &str = "confluent";

/// Markers in Confluent CLI error output that mean the session is missing.
const LOGIN_MARKERS: &[&str] = &["confluent login", "not logged in", "Unauthorized"];

/// A Kafka cluster.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, alias = "service_provider")]
    pub provider: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub status: String,
}

/// A service account.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// An api key (the secret half is never listed).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiKey {
    #[serde(alias = "api_key")]
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "owner")]
    pub owner_resource_id: String,
    #[serde(default)]
    pub created: String,
}

fn call<T: DeserializeOwned>(args: &[&str]) -> Result<T> {
    process::require(CONFLUENT)?;
    debug!(?args, "calling confluent");
    let captured = process::run(CONFLUENT, args, None)?;

    if !captured.success {
        if LOGIN_MARKERS.iter().any(|m| captured.stderr.contains(m)) {
            return Err(ProcessError::Unauthorized {
                program: CONFLUENT.to_string(),
                detail: "run `confluent login` first".to_string(),
            }
            .into());
        }
    }

    parse(&captured.check(CONFLUENT)?.stdout)
}

fn parse<T: DeserializeOwned>(stdout: &str) -> Result<T> {
    serde_json::from_str(stdout).map_err(|e| {
        ProcessError::Output {
            program: CONFLUENT.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// All Kafka clusters in the current environment.
pub fn clusters() -> Result<Vec<Cluster>> {
    call(&["kafka", "cluster", "list", "-o", "json"])
}

/// All service accounts of the organization.
pub fn service_accounts() -> Result<Vec<ServiceAccount>> {
    call(&["iam", "service-account", "list", "-o", "json"])
}

/// Api keys scoped to a cluster, optionally limited to one service account.
pub fn api_keys(cluster: &str, service_account: Option<&str>) -> Result<Vec<ApiKey>> {
    let mut args = vec!["api-key", "list", "--resource", cluster];
    if let Some(account) = service_account {
        args.extend(["--service-account", account]);
    }
    args.extend(["-o", "json"]);
    call(&args)
}
