//! Azure DevOps repository listing.
//!
//! Uses `az repos list` so authentication is whatever the `az` CLI holds.

use serde::Deserialize;
use tracing::debug;

use crate::core::constants::DEVOPS_BASE_URL;
use crate::core::process;
use crate::error::{ProcessError, Result};

const AZ: &str = "az";

/// Markers in `az repos` error output that mean the caller is not authorized.
const UNAUTHORIZED_MARKERS: &[&str] = &["401", "Unauthorized", "az login", "TF400813"];

/// A repository hosted in Azure DevOps.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteRepo {
    pub name: String,
    #[serde(rename = "sshUrl")]
    pub ssh_url: String,
}

/// Organization url from a bare name or a full url.
pub fn organization_url(organization: &str) -> String {
    if organization.starts_with("https://") || organization.starts_with("http://") {
        organization.trim_end_matches('/').to_string()
    } else {
        format!("{}{}", DEVOPS_BASE_URL, organization)
    }
}

/// List all repositories of a project.
///
/// # Errors
///
/// Returns `ProcessError::Unauthorized` when `az` is not logged in or the
/// token lacks access.
pub fn list_repositories(organization: &str, project: &str) -> Result<Vec<RemoteRepo>> {
    process::require(AZ)?;
    let org = organization_url(organization);
    debug!(organization = %org, project, "listing repositories");

    let captured = process::run(
        AZ,
        &[
            "repos",
            "list",
            "--organization",
            org.as_str(),
            "--project",
            project,
            "-o",
            "json",
        ],
        None,
    )?;

    if !captured.success {
        if UNAUTHORIZED_MARKERS.iter().any(|m| captured.stderr.contains(m)) {
            return Err(ProcessError::Unauthorized {
                program: AZ.to_string(),
                detail: "Azure DevOps rejected the request; check `az login` or your access token"
                    .to_string(),
            }
            .into());
        }
    }

    serde_json::from_str(&captured.check(AZ)?.stdout).map_err(|e| {
        ProcessError::Output {
            program: AZ.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
