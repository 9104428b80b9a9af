//! opskit - operator automation for blue/green Kafka credentials, Azure Key
//! Vaults and git repository fleets.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── kafka         # diff/sync reconciliation, Confluent inspection
//! │   ├── vault         # list, backup, restore, copy
//! │   ├── fleet         # git operations across many repositories
//! │   ├── prompt        # interactive confirmation gate
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── domain/       # Color, SecretName, Snapshot, Reconciliation
//!     ├── reconcile     # new/changed/obsolete classification
//!     ├── sanity        # api-key rotation check
//!     ├── apply         # confirmed copy of a reconciliation
//!     ├── transfer      # backup/restore/copy between stores
//!     ├── store/        # SecretStore trait: memory, file, Azure Key Vault
//!     ├── confirm       # Gate trait and non-interactive gates
//!     ├── fleet/        # git working copies, Azure DevOps listing
//!     ├── confluent     # Confluent CLI queries
//!     └── config        # .opskit.toml
//! ```
//!
//! # Example
//!
//! ```
//! use opskit::{reconcile, Color, Families, Snapshot};
//!
//! let env = Snapshot::from_pairs("env", [("broker-key", "A")]);
//! let kafka = Snapshot::from_pairs("kafka", [("broker-key-blue", "B")]);
//!
//! let plan = reconcile(&env, &kafka, Color::Blue, &Families::default()).unwrap();
//! assert_eq!(plan.changed(), vec!["broker-key-blue"]);
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::domain::{Color, Reconciliation, SecretName, SecretRecord, Snapshot};
pub use crate::core::reconcile::{reconcile, Families};
pub use crate::core::store::SecretStore;
pub use crate::error::{Error, Result};
