//! Reconciliation type.
//!
//! The outcome of comparing the colorless environment store with the
//! colored active-cluster store.

use crate::core::domain::{Color, SecretName};

/// How a secret differs between the two stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Colored secret with no colorless counterpart.
    New,
    /// Colored secret whose colorless counterpart holds a different value.
    Changed,
    /// Colorless family secret with no colored counterpart.
    Obsolete,
}

/// A single entry of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    name: SecretName,
    status: EntryStatus,
}

impl PlanEntry {
    /// Create a new plan entry.
    pub fn new(name: SecretName, status: EntryStatus) -> Self {
        Self { name, status }
    }

    /// The name as listed: colored for new/changed, colorless for obsolete.
    pub fn key(&self) -> String {
        self.name.full()
    }

    /// The colorless name the entry maps to.
    pub fn base(&self) -> &str {
        self.name.base()
    }

    /// The classification.
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Whether applying the plan writes this entry.
    pub fn is_copy_target(&self) -> bool {
        matches!(self.status, EntryStatus::New | EntryStatus::Changed)
    }
}

/// New, changed and obsolete secrets in source order.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    color: Color,
    entries: Vec<PlanEntry>,
}

impl Reconciliation {
    /// Create a reconciliation from classified entries.
    pub fn new(color: Color, entries: Vec<PlanEntry>) -> Self {
        Self { color, entries }
    }

    /// The active color the plan was computed for.
    pub fn color(&self) -> Color {
        self.color
    }

    /// All entries.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    fn with_status(&self, status: EntryStatus) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.key())
            .collect()
    }

    /// Colored names missing from the colorless store.
    pub fn new_secrets(&self) -> Vec<String> {
        self.with_status(EntryStatus::New)
    }

    /// Colored names whose value differs from the colorless store.
    pub fn changed(&self) -> Vec<String> {
        self.with_status(EntryStatus::Changed)
    }

    /// Colorless names with no colored counterpart.
    pub fn obsolete(&self) -> Vec<String> {
        self.with_status(EntryStatus::Obsolete)
    }

    /// Entries the copy step writes, in source order.
    pub fn copy_targets(&self) -> Vec<&PlanEntry> {
        self.entries.iter().filter(|e| e.is_copy_target()).collect()
    }

    /// Whether there is nothing to copy.
    pub fn is_in_sync(&self) -> bool {
        self.entries.iter().all(|e| !e.is_copy_target())
    }

    /// Whether nothing at all was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
