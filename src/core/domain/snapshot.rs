//! Store snapshot.
//!
//! All secrets of one store captured at a single point in time. Lives for
//! one run; there is no caching or incremental refresh.

use std::collections::HashMap;

use crate::core::domain::SecretRecord;

/// Ordered name -> record mapping for one store.
///
/// Iteration follows the order in which the store listed its entries.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    source: String,
    records: Vec<SecretRecord>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Empty snapshot of the named store.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a snapshot from name/value pairs in listing order.
    pub fn from_pairs<I, K, V>(source: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut snapshot = Self::new(source);
        for (name, value) in pairs {
            snapshot.insert(name, value);
        }
        snapshot
    }

    /// Insert a secret. An existing name keeps its position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&i) => self.records[i].replace_value(value),
            None => {
                self.index.insert(name.clone(), self.records.len());
                self.records.push(SecretRecord::new(name, value));
            }
        }
    }

    /// Description of the store this snapshot was taken from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Record by exact name.
    pub fn get(&self, name: &str) -> Option<&SecretRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Value by exact name.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|r| r.value())
    }

    /// Whether a secret with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Records in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &SecretRecord> {
        self.records.iter()
    }

    /// Names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name())
    }

    /// Number of secrets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store listed no secrets.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
