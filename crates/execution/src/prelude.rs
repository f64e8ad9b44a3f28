//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use bridge_amm_execution::prelude::*;
//! ```

// Bundles
pub use crate::bundle::{
    DepositBundle, RewardClaim, RewardClaimBundle, RouteSegment, StablePath, SwapBundle,
    WithdrawBundle,
};

// Executor
pub use crate::config::ExecutorConfig;
pub use crate::error::{ExecutionError, ExecutionResult};
pub use crate::executor::{ClaimableReward, TradeExecutor};
