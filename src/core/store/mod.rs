//! Secret store access.
//!
//! Every store is reached through the [`SecretStore`] trait so the
//! reconciliation and transfer logic never knows which backend it talks to.
//!
//! ## Adding a New Store Backend
//!
//! 1. Implement the `SecretStore` trait in a new file
//! 2. Add a [`Locator`] variant and parse rule
//! 3. Construct it in [`open`]

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::core::constants::{AZURE_LOCATOR_PREFIX, FILE_LOCATOR_PREFIX};
use crate::core::domain::Snapshot;
use crate::error::{ConfigError, Result};

mod azure;
mod file;
mod memory;

pub use azure::AzureKeyVault;
pub use file::FileStore;
pub use memory::Memory;

/// Secret store capability: list, read and write.
pub trait SecretStore {
    /// Human-readable store identifier for output and errors.
    fn describe(&self) -> String;

    /// Fetch every secret with its value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccessDenied` when the caller is not authorized.
    fn list(&self) -> Result<Snapshot>;

    /// Fetch a single value; `None` when the secret does not exist.
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Create or overwrite a secret.
    fn set(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Where a store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// JSON snapshot file (`file:<path>`).
    File(PathBuf),
    /// Azure Key Vault by name (`<name>` or `az:<name>`).
    Azure(String),
}

impl FromStr for Locator {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidLocator {
            locator: s.to_string(),
            reason: reason.to_string(),
        };

        if let Some(path) = s.strip_prefix(FILE_LOCATOR_PREFIX) {
            if path.is_empty() {
                return Err(invalid("file path is empty"));
            }
            return Ok(Locator::File(PathBuf::from(path)));
        }

        let name = s.strip_prefix(AZURE_LOCATOR_PREFIX).unwrap_or(s);
        validate_vault_name(name).map_err(|reason| invalid(&reason))?;
        Ok(Locator::Azure(name.to_string()))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::File(path) => write!(f, "{}{}", FILE_LOCATOR_PREFIX, path.display()),
            Locator::Azure(name) => f.write_str(name),
        }
    }
}

/// Check an Azure Key Vault name.
///
/// Names are 3-24 characters of letters, digits and hyphens, start with a
/// letter, end with a letter or digit and contain no consecutive hyphens.
pub fn validate_vault_name(name: &str) -> std::result::Result<(), String> {
    if !(3..=24).contains(&name.len()) {
        return Err("vault names are 3-24 characters long".to_string());
    }
    if let Some(ch) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(format!("invalid character '{}'", ch));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err("must start with a letter".to_string());
    }
    if name.ends_with('-') {
        return Err("cannot end with a hyphen".to_string());
    }
    if name.contains("--") {
        return Err("cannot contain consecutive hyphens".to_string());
    }
    Ok(())
}

/// Open the store a locator points at.
///
/// The Azure subscription is passed explicitly and used on every call.
pub fn open(locator: &Locator, subscription: Option<&str>) -> Result<Box<dyn SecretStore>> {
    debug!(store = %locator, "opening store");
    match locator {
        Locator::File(path) => Ok(Box::new(FileStore::open(path)?)),
        Locator::Azure(name) => Ok(Box::new(AzureKeyVault::new(
            name.clone(),
            subscription.map(str::to_string),
        ))),
    }
}
