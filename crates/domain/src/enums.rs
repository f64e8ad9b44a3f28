use serde::{Deserialize, Serialize};

/// Pool variant discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    /// Two-currency constant-product pool.
    Standard,
    /// N-currency StableSwap pool.
    Stable,
    /// StableSwap pool holding another stable pool's LP token.
    StableMeta,
}

/// How a hop through a stable meta pool interacts with its base pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StableSwapMode {
    /// Both currencies are held directly by the meta pool.
    Single,
    /// Input is a base-pool currency, output a meta-pool currency.
    FromBase,
    /// Input is a meta-pool currency, output a base-pool currency.
    ToBase,
}

/// On-chain trading status of a standard pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairStatus {
    /// Pool accepts swaps.
    Trading,
    /// Pool is collecting initial liquidity and rejects swaps.
    Bootstrap,
    /// Pool is disabled.
    Disabled,
}

/// Explicit rounding direction for integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Round towards positive infinity.
    Up,
    /// Round towards zero.
    Down,
}

impl Rounding {
    /// Returns `true` for [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}
