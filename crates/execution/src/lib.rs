//! Transaction parameters for swaps and liquidity operations.
//!
//! This crate turns routed trades and liquidity intents into unsigned,
//! serialisable bundles:
//! - Swap bundles (plain path or stable router)
//! - Deposit and withdrawal bundles for every pool kind
//! - Farming reward claims
//!
//! Signing, submission and deadline enforcement are left to the ledger
//! client.

/// Prelude module for convenient imports.
pub mod prelude;

/// Bundle types.
pub mod bundle;
/// Executor configuration.
pub mod config;
/// Execution errors.
pub mod error;
/// Bundle construction.
pub mod executor;
