//! Blue/green secret reconciliation.
//!
//! Compares the colorless environment store with the colored store of the
//! active Kafka cluster and classifies every difference as new, changed or
//! obsolete. Pure: nothing is written here, see [`crate::core::apply`].

use tracing::{debug, trace};

use crate::core::domain::{Color, EntryStatus, PlanEntry, Reconciliation, SecretName, Snapshot};
use crate::error::{ReconcileError, Result};

/// Kind of Kafka credential a colorless secret belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Broker,
    SchemaRegistry,
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Broker => write!(f, "broker"),
            Family::SchemaRegistry => write!(f, "schema registry"),
        }
    }
}

/// Prefix rules recognizing secret families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Families {
    broker: Vec<String>,
    schema_registry: Vec<String>,
}

impl Families {
    /// Families from explicit prefix lists.
    pub fn new(broker: Vec<String>, schema_registry: Vec<String>) -> Self {
        Self {
            broker,
            schema_registry,
        }
    }

    /// The family a colorless name belongs to, if any.
    pub fn classify(&self, name: &str) -> Option<Family> {
        if self.broker.iter().any(|p| name.starts_with(p.as_str())) {
            Some(Family::Broker)
        } else if self
            .schema_registry
            .iter()
            .any(|p| name.starts_with(p.as_str()))
        {
            Some(Family::SchemaRegistry)
        } else {
            None
        }
    }

    /// Whether the name belongs to any recognized family.
    pub fn matches(&self, name: &str) -> bool {
        self.classify(name).is_some()
    }
}

impl Default for Families {
    fn default() -> Self {
        crate::core::config::KafkaConfig::default().families()
    }
}

/// Fail when the colored store listed nothing.
///
/// An empty source is treated as a misconfiguration, never as "nothing to copy".
pub fn ensure_source(kafka: &Snapshot) -> Result<()> {
    if kafka.is_empty() {
        return Err(ReconcileError::EmptySource {
            store: kafka.source().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Classify the differences between the two stores.
///
/// # Arguments
///
/// * `env` - Snapshot of the colorless environment store
/// * `kafka` - Snapshot of the colored store of the active cluster
/// * `color` - The active color
/// * `families` - Prefix rules for obsolete detection
///
/// # Errors
///
/// Returns `ReconcileError::EmptySource` if `kafka` is empty.
pub fn reconcile(
    env: &Snapshot,
    kafka: &Snapshot,
    color: Color,
    families: &Families,
) -> Result<Reconciliation> {
    ensure_source(kafka)?;

    let mut entries = Vec::new();

    for record in kafka.iter() {
        let name = record.secret_name();
        if !name.has_color(color) {
            debug!(name = record.name(), active = %color, "skipping secret without active color");
            continue;
        }

        let status = match env.value(name.base()) {
            None => EntryStatus::New,
            Some(current) if current != record.value() => EntryStatus::Changed,
            Some(_) => {
                trace!(name = record.name(), "in sync");
                continue;
            }
        };
        entries.push(PlanEntry::new(name, status));
    }

    for record in env.iter() {
        let colored = SecretName::colored(record.name(), color);
        if kafka.contains(&colored.full()) || !families.matches(record.name()) {
            continue;
        }
        entries.push(PlanEntry::new(
            SecretName::plain(record.name()),
            EntryStatus::Obsolete,
        ));
    }

    let plan = Reconciliation::new(color, entries);
    debug!(
        new = plan.new_secrets().len(),
        changed = plan.changed().len(),
        obsolete = plan.obsolete().len(),
        "reconciled"
    );
    Ok(plan)
}
