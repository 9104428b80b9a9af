//! Api-key rotation sanity check.
//!
//! Before reconciling, the broker and schema registry api keys of the
//! colorless store are compared with the active color's entries. A schema
//! registry mismatch is fatal; a broker mismatch only needs confirmation.

use tracing::{debug, warn};

use crate::core::confirm::{Answer, Choices, Gate};
use crate::core::domain::{Color, SecretName, Snapshot};
use crate::error::{Error, ReconcileError, Result};

/// Names of the two compared credentials (colorless form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyNames {
    pub broker: String,
    pub schema_registry: String,
}

impl Default for ApiKeyNames {
    fn default() -> Self {
        crate::core::config::KafkaConfig::default().api_keys()
    }
}

/// Result of comparing one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyComparison {
    /// Both stores hold the same value.
    Match,
    /// Values differ, or the colored store lacks the credential.
    Mismatch,
    /// The colorless store does not hold the credential yet.
    Untracked,
}

/// Comparison of both credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationCheck {
    pub broker: KeyComparison,
    pub schema_registry: KeyComparison,
}

impl RotationCheck {
    /// Whether nothing needs attention.
    pub fn is_clean(&self) -> bool {
        self.broker != KeyComparison::Mismatch && self.schema_registry != KeyComparison::Mismatch
    }
}

fn compare(env: &Snapshot, kafka: &Snapshot, name: &str, color: Color) -> KeyComparison {
    let Some(current) = env.value(name) else {
        return KeyComparison::Untracked;
    };
    match kafka.value(&SecretName::colored(name, color).full()) {
        Some(active) if active == current => KeyComparison::Match,
        _ => KeyComparison::Mismatch,
    }
}

/// Compare both credentials without acting on the result.
pub fn compare_api_keys(
    env: &Snapshot,
    kafka: &Snapshot,
    color: Color,
    names: &ApiKeyNames,
) -> RotationCheck {
    let check = RotationCheck {
        broker: compare(env, kafka, &names.broker, color),
        schema_registry: compare(env, kafka, &names.schema_registry, color),
    };
    debug!(?check, "api key comparison");
    check
}

/// Run the sanity check and enforce its outcome.
///
/// # Errors
///
/// Returns `ReconcileError::SchemaRegistryKeyMismatch` when the schema
/// registry key differs, and `Error::UserAbort` when the operator does not
/// confirm a broker key mismatch.
pub fn verify_api_keys(
    env: &Snapshot,
    kafka: &Snapshot,
    color: Color,
    names: &ApiKeyNames,
    gate: &mut dyn Gate,
) -> Result<RotationCheck> {
    let check = compare_api_keys(env, kafka, color, names);

    if check.schema_registry == KeyComparison::Mismatch {
        return Err(ReconcileError::SchemaRegistryKeyMismatch {
            name: names.schema_registry.clone(),
        }
        .into());
    }

    if check.broker == KeyComparison::Mismatch {
        warn!(name = %names.broker, "broker api key differs between stores");
        let prompt = format!(
            "Broker api key '{}' differs from the {} cluster. Continue anyway?",
            names.broker, color
        );
        if gate.ask(&prompt, Choices::YesNo)? != Answer::Yes {
            return Err(Error::UserAbort);
        }
    }

    Ok(check)
}
