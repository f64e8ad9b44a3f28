//! Prelude module for convenient imports.
//!
//! ```rust
//! use bridge_amm_protocols::prelude::*;
//! ```

pub use crate::assembler::{PoolSnapshot, assemble, load_pools};
pub use crate::error::LoaderError;
pub use crate::loader::{InMemoryLoader, JsonSnapshotLoader, PoolStateLoader, SnapshotFile};
pub use crate::records::{LedgerSnapshot, RawReward, RawStablePool, RawStandardPool};
pub use crate::registry::{CurrencyRegistry, InMemoryRegistry, LP_TOKEN_DECIMALS};
