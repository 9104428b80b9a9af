//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret name as the store lists it (e.g. `kafka-broker-api-key-blue`).
pub type SecretKey = String;

/// A plaintext secret value.
pub type SecretValue = String;

/// A base secret name without any color suffix.
pub type BaseKey = String;

/// A git repository directory name inside the fleet directory.
pub type RepoName = String;
