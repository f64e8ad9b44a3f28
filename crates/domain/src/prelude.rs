//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use bridge_amm_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::{
    Currency, CurrencyId, LiquidityPool, StableLiquidityMetaPool, StableLiquidityPool,
    StandardLiquidityPool,
};

// Enums
pub use crate::enums::{PairStatus, PoolType, Rounding, StableSwapMode};

// Errors
pub use crate::error::{DomainError, DomainResult};

// Value objects
pub use crate::value_objects::{FeeRate, MonetaryAmount, Percentage, PooledCurrencies, Price};

// Math
pub use crate::math::stable_swap::StableCurve;
