//! Domain model for bridge AMM liquidity pools.
//!
//! This crate provides:
//! - Currencies and currency-tagged monetary amounts
//! - Immutable snapshots of standard, stable and stable meta pools
//! - Constant-product and StableSwap swap math replicating on-chain truncation
//! - Deposit and withdrawal liquidity math, including meta-pool decomposition

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool and currency entities.
pub mod entities;
/// Shared enumerations.
pub mod enums;
/// Domain error type.
pub mod error;
/// Pure integer AMM math.
pub mod math;
/// Value objects (amounts, fees, percentages, prices).
pub mod value_objects;

#[cfg(test)]
mod proptest_properties;
