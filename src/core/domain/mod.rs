//! Domain types.

mod color;
mod reconciliation;
mod secret;
mod snapshot;

pub use color::Color;
pub use reconciliation::{EntryStatus, PlanEntry, Reconciliation};
pub use secret::{fingerprint, SecretName, SecretRecord};
pub use snapshot::Snapshot;
