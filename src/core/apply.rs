//! Copy plan application.
//!
//! Writes the new and changed secrets of a [`Reconciliation`] into the
//! colorless store, under their base names, after an explicit confirmation.
//! Obsolete secrets are never deleted here.

use tracing::info;

use crate::core::confirm::{Answer, Choices, Gate};
use crate::core::domain::{Reconciliation, Snapshot};
use crate::core::store::SecretStore;
use crate::error::{Error, Result, StoreError};

/// What the apply step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Nothing to copy; the gate was not asked.
    InSync,
    /// The operator chose to skip the copy.
    Skipped,
    /// Base names written, in plan order.
    Copied(Vec<String>),
}

/// Apply a reconciliation to the colorless store.
///
/// # Arguments
///
/// * `plan` - The reconciliation to apply
/// * `kafka` - Snapshot the plan was computed from; source of the values
/// * `target` - The colorless environment store
/// * `gate` - Confirmation gate asked once before any write
///
/// # Errors
///
/// Returns `Error::UserAbort` if the operator answers no, and store errors
/// from the writes. Writes that already happened are not rolled back.
pub fn apply(
    plan: &Reconciliation,
    kafka: &Snapshot,
    target: &mut dyn SecretStore,
    gate: &mut dyn Gate,
) -> Result<ApplyOutcome> {
    let targets = plan.copy_targets();
    if targets.is_empty() {
        return Ok(ApplyOutcome::InSync);
    }

    let prompt = format!(
        "Copy {} secret{} from the {} cluster into {}?",
        targets.len(),
        if targets.len() == 1 { "" } else { "s" },
        plan.color(),
        target.describe()
    );
    match gate.ask(&prompt, Choices::YesNoSkip)? {
        Answer::Yes => {}
        Answer::Skip => return Ok(ApplyOutcome::Skipped),
        Answer::No => return Err(Error::UserAbort),
    }

    let mut copied = Vec::with_capacity(targets.len());
    for entry in targets {
        let key = entry.key();
        let value = kafka.value(&key).ok_or_else(|| StoreError::NotFound {
            store: kafka.source().to_string(),
            name: key.clone(),
        })?;
        target.set(entry.base(), value)?;
        info!(from = %key, to = entry.base(), "copied secret");
        copied.push(entry.base().to_string());
    }

    Ok(ApplyOutcome::Copied(copied))
}
