//! JSON snapshot file store.
//!
//! Used for Key Vault backups and restores, and as an offline stand-in for
//! a vault. Values are stored in plaintext, so files are written with
//! owner-only permissions on Unix.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SecretStore;
use crate::core::domain::Snapshot;
use crate::error::{Result, StoreError};

/// On-disk layout of a snapshot file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotFile {
    /// Store the snapshot was taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    /// RFC 3339 creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<String>,
    #[serde(default)]
    secrets: Vec<Entry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    name: String,
    value: String,
}

/// Store backed by a JSON snapshot file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    origin: Option<String>,
    secrets: Snapshot,
}

impl FileStore {
    /// Open a snapshot file; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidSnapshot` if the file is not valid JSON.
    pub fn open(path: &Path) -> Result<Self> {
        let describe = format!("file:{}", path.display());
        if !path.exists() {
            debug!(path = %path.display(), "snapshot file missing, starting empty");
            return Ok(Self {
                path: path.to_path_buf(),
                origin: None,
                secrets: Snapshot::new(describe),
            });
        }

        let contents = fs::read_to_string(path)?;
        let file: SnapshotFile =
            serde_json::from_str(&contents).map_err(|e| StoreError::InvalidSnapshot {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let secrets = Snapshot::from_pairs(
            describe,
            file.secrets.into_iter().map(|e| (e.name, e.value)),
        );
        debug!(path = %path.display(), secrets = secrets.len(), "snapshot file loaded");

        Ok(Self {
            path: path.to_path_buf(),
            origin: file.source,
            secrets,
        })
    }

    /// Store the snapshot was originally taken from, if recorded.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Write a new snapshot file. Refuses to overwrite an existing file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists or cannot be written.
    pub fn create(path: &Path, snapshot: &Snapshot) -> Result<()> {
        let file = SnapshotFile {
            source: Some(snapshot.source().to_string()),
            created: Some(chrono::Utc::now().to_rfc3339()),
            secrets: entries(snapshot),
        };
        write_file(path, &file, true)
    }

    fn persist(&self) -> Result<()> {
        let file = SnapshotFile {
            source: self.origin.clone(),
            created: Some(chrono::Utc::now().to_rfc3339()),
            secrets: entries(&self.secrets),
        };
        write_file(&self.path, &file, false)
    }
}

fn entries(snapshot: &Snapshot) -> Vec<Entry> {
    snapshot
        .iter()
        .map(|r| Entry {
            name: r.name().to_string(),
            value: r.value().to_string(),
        })
        .collect()
}

fn write_file(path: &Path, file: &SnapshotFile, create_new: bool) -> Result<()> {
    let json = serde_json::to_string_pretty(file)?;

    let mut options = fs::OpenOptions::new();
    options.write(true);
    if create_new {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut handle = options.open(path)?;

    // `mode` only applies on creation; an existing file keeps its bits otherwise.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        handle.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    handle.write_all(json.as_bytes())?;
    handle.write_all(b"\n")?;
    debug!(path = %path.display(), secrets = file.secrets.len(), "snapshot file written");
    Ok(())
}

impl SecretStore for FileStore {
    fn describe(&self) -> String {
        self.secrets.source().to_string()
    }

    fn list(&self) -> Result<Snapshot> {
        Ok(self.secrets.clone())
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.secrets.value(name).map(str::to_string))
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.secrets.insert(name, value);
        self.persist()
    }
}
