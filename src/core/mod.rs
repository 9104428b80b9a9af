//! Core library components.
//!
//! Reconciliation, secret stores, confirmation and the git fleet logic.
//! Nothing here prints; the CLI layer owns all output.

pub mod apply;
pub mod config;
pub mod confirm;
pub mod confluent;
pub mod constants;
pub mod domain;
pub mod fleet;
pub mod process;
pub mod reconcile;
pub mod sanity;
pub mod store;
pub mod transfer;
pub mod types;
