//! Ledger-facing side of the bridge AMM: raw pool records, currency
//! resolution and assembly of pool snapshots.
//!
//! Fetching is the only asynchronous step. [`assembler::load_pools`] awaits
//! the loader and the registry, then builds every pool synchronously.

/// Snapshot assembly.
pub mod assembler;
/// Loader error type.
pub mod error;
/// Snapshot sources.
pub mod loader;
/// Prelude module for convenient imports.
pub mod prelude;
/// Raw ledger records.
pub mod records;
/// Currency registries.
pub mod registry;
/// U256 as decimal strings.
pub mod serde_u256;
