//! In-memory store.

use super::SecretStore;
use crate::core::domain::Snapshot;
use crate::error::Result;

/// Store backed by a snapshot in memory. Records every write.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    secrets: Snapshot,
    writes: Vec<String>,
}

impl Memory {
    /// Empty store with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            secrets: Snapshot::new(name),
            writes: Vec::new(),
        }
    }

    /// Store preloaded with name/value pairs.
    pub fn with_secrets(name: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        Self {
            secrets: Snapshot::from_pairs(name, pairs.iter().copied()),
            writes: Vec::new(),
        }
    }

    /// Names written through [`SecretStore::set`], in order.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl SecretStore for Memory {
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
        self.writes.push(name.to_string());
        Ok(())
    }
}
