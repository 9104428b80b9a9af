//! Secret types.
//!
//! A [`SecretName`] splits a store name into its base and optional color tag.
//! A [`SecretRecord`] is one entry of a store snapshot.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::core::constants::FINGERPRINT_LEN;
use crate::core::domain::Color;
use crate::core::types::{BaseKey, SecretKey, SecretValue};

/// A secret name decomposed into base name and color tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretName {
    base: BaseKey,
    color: Option<Color>,
}

impl SecretName {
    /// Decompose a store name.
    ///
    /// `broker-key-blue` becomes base `broker-key` tagged blue. A bare
    /// `-blue` or `blue` has no base and stays colorless.
    pub fn parse(name: &str) -> Self {
        for color in Color::ALL {
            if let Some(base) = name.strip_suffix(color.suffix().as_str()) {
                if !base.is_empty() {
                    return Self {
                        base: base.to_string(),
                        color: Some(color),
                    };
                }
            }
        }
        Self {
            base: name.to_string(),
            color: None,
        }
    }

    /// A colorless name.
    pub fn plain(base: impl Into<BaseKey>) -> Self {
        Self {
            base: base.into(),
            color: None,
        }
    }

    /// A name tagged with `color`.
    pub fn colored(base: impl Into<BaseKey>, color: Color) -> Self {
        Self {
            base: base.into(),
            color: Some(color),
        }
    }

    /// Base name without any color suffix.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Color tag, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Whether the name carries exactly `color`.
    pub fn has_color(&self, color: Color) -> bool {
        self.color == Some(color)
    }

    /// The name as stored.
    pub fn full(&self) -> SecretKey {
        match self.color {
            Some(color) => format!("{}-{}", self.base, color),
            None => self.base.clone(),
        }
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full())
    }
}

/// A secret with its plaintext value.
///
/// The value is wiped from memory when the record is dropped and never
/// appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretRecord {
    name: SecretKey,
    value: SecretValue,
    color_suffix: Option<Color>,
}

impl SecretRecord {
    /// Create a record; the color tag is derived from the name.
    pub fn new(name: impl Into<SecretKey>, value: impl Into<SecretValue>) -> Self {
        let name = name.into();
        let color_suffix = SecretName::parse(&name).color();
        Self {
            name,
            value: value.into(),
            color_suffix,
        }
    }

    /// Name as listed by the store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plaintext value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Color tag parsed from the name.
    pub fn color_suffix(&self) -> Option<Color> {
        self.color_suffix
    }

    /// Structured form of the name.
    pub fn secret_name(&self) -> SecretName {
        SecretName::parse(&self.name)
    }

    /// Short SHA-256 fingerprint of the value, safe to print.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.value)
    }

    pub(crate) fn replace_value(&mut self, value: SecretValue) {
        self.value.zeroize();
        self.value = value;
    }
}

impl fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("color_suffix", &self.color_suffix)
            .finish()
    }
}

impl Drop for SecretRecord {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

/// Short SHA-256 fingerprint of a value.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    digest
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
        .chars()
        .take(FINGERPRINT_LEN)
        .collect()
}
