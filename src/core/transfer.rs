//! Key Vault backup, restore and copy.
//!
//! A backup writes a store snapshot to a JSON file. Restore and copy compare
//! a source snapshot with the target store and write only what differs,
//! after confirmation.

use std::path::Path;

use tracing::{debug, info};

use crate::core::confirm::{Answer, Choices, Gate};
use crate::core::domain::Snapshot;
use crate::core::store::{FileStore, SecretStore};
use crate::error::{Error, Result};

/// How a source secret relates to the target store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// Missing from the target.
    Create,
    /// Present in the target with a different value.
    Update,
    /// Present in the target with the same value.
    Unchanged,
}

/// A single entry of a transfer plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEntry {
    pub name: String,
    pub status: TransferStatus,
}

/// Comparison of a source snapshot with a target snapshot.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    entries: Vec<TransferEntry>,
}

impl TransferPlan {
    /// Compare `source` with `target`, optionally limited to names starting with `prefix`.
    pub fn compute(source: &Snapshot, target: &Snapshot, prefix: Option<&str>) -> Self {
        let entries = source
            .iter()
            .filter(|r| prefix.map_or(true, |p| r.name().starts_with(p)))
            .map(|r| {
                let status = match target.value(r.name()) {
                    None => TransferStatus::Create,
                    Some(v) if v != r.value() => TransferStatus::Update,
                    Some(_) => TransferStatus::Unchanged,
                };
                TransferEntry {
                    name: r.name().to_string(),
                    status,
                }
            })
            .collect();
        Self { entries }
    }

    /// All entries in source order.
    pub fn entries(&self) -> &[TransferEntry] {
        &self.entries
    }

    /// Entries that would be written.
    pub fn writes(&self) -> Vec<&TransferEntry> {
        self.entries
            .iter()
            .filter(|e| e.status != TransferStatus::Unchanged)
            .collect()
    }

    /// Number of entries with the given status.
    pub fn count(&self, status: TransferStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

/// Write a snapshot of `source` to a new JSON file.
///
/// # Returns
///
/// The number of secrets written.
pub fn backup(source: &dyn SecretStore, path: &Path) -> Result<usize> {
    let snapshot = source.list()?;
    FileStore::create(path, &snapshot)?;
    info!(store = %source.describe(), path = %path.display(), secrets = snapshot.len(), "backup written");
    Ok(snapshot.len())
}

/// Default backup file name for a store.
pub fn backup_file_name(store: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let safe: String = store
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("backup-{}-{}.json", safe, timestamp)
}

/// Write the differing secrets of `source` into `target` after confirmation.
///
/// # Returns
///
/// Names written, in source order. Empty when nothing differed or the
/// operator skipped.
///
/// # Errors
///
/// Returns `Error::UserAbort` if the operator answers no.
pub fn copy_secrets(
    source: &Snapshot,
    plan: &TransferPlan,
    target: &mut dyn SecretStore,
    gate: &mut dyn Gate,
) -> Result<Vec<String>> {
    let writes = plan.writes();
    if writes.is_empty() {
        debug!("target already up to date");
        return Ok(Vec::new());
    }

    let prompt = format!(
        "Write {} secret{} from {} into {}?",
        writes.len(),
        if writes.len() == 1 { "" } else { "s" },
        source.source(),
        target.describe()
    );
    match gate.ask(&prompt, Choices::YesNoSkip)? {
        Answer::Yes => {}
        Answer::Skip => return Ok(Vec::new()),
        Answer::No => return Err(Error::UserAbort),
    }

    let mut written = Vec::with_capacity(writes.len());
    for entry in writes {
        if let Some(value) = source.value(&entry.name) {
            target.set(&entry.name, value)?;
            info!(name = %entry.name, "wrote secret");
            written.push(entry.name.clone());
        }
    }
    Ok(written)
}
