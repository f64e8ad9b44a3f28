//! Unsigned transaction parameters handed to the ledger client.
//!
//! Bundles carry raw atomic amounts (decimal strings once serialised) and
//! currency ids. Nothing here signs or submits.

use bridge_amm_domain::entities::CurrencyId;
use bridge_amm_domain::enums::StableSwapMode;
use bridge_amm_protocols::serde_u256;
use bridge_amm_routing::trade::PathElement;
use primitive_types::U256;
use serde::Serialize;

/// Hop through a stable or meta pool, as the router encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StablePath {
    pub pool_id: u32,
    /// Base pool of a meta pool; equal to `pool_id` for plain stable pools.
    pub base_pool_id: u32,
    pub mode: StableSwapMode,
    pub from_currency: CurrencyId,
    pub to_currency: CurrencyId,
}

/// One router segment: a run of standard hops or a single stable hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RouteSegment {
    /// Currency path through consecutive standard pools.
    Normal(Vec<CurrencyId>),
    Stable(StablePath),
}

impl RouteSegment {
    /// Segments for `path`, merging adjacent standard hops.
    #[must_use]
    pub fn from_path(path: &[PathElement]) -> Vec<Self> {
        let mut segments: Vec<Self> = Vec::new();
        for hop in path {
            let stable = match hop {
                PathElement::Standard { input, output, .. } => {
                    if let Some(Self::Normal(currencies)) = segments.last_mut() {
                        currencies.push(output.id.clone());
                    } else {
                        segments.push(Self::Normal(vec![input.id.clone(), output.id.clone()]));
                    }
                    continue;
                }
                PathElement::Stable { pool, input, output } => StablePath {
                    pool_id: pool.pool_id,
                    base_pool_id: pool.pool_id,
                    mode: StableSwapMode::Single,
                    from_currency: input.id.clone(),
                    to_currency: output.id.clone(),
                },
                PathElement::Meta { pool, input, output, mode } => StablePath {
                    pool_id: pool.pool_id(),
                    base_pool_id: pool.base_pool_id(),
                    mode: *mode,
                    from_currency: input.id.clone(),
                    to_currency: output.id.clone(),
                },
            };
            segments.push(Self::Stable(stable));
        }
        segments
    }
}

/// Swap parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwapBundle {
    /// Every hop is a standard pool: a plain currency path.
    StandardOnly {
        #[serde(with = "serde_u256")]
        amount_in: U256,
        #[serde(with = "serde_u256")]
        amount_out_min: U256,
        path: Vec<CurrencyId>,
        recipient: String,
        deadline: u64,
    },
    /// At least one stable hop: routed through the stable router.
    Router {
        #[serde(with = "serde_u256")]
        amount_in: U256,
        #[serde(with = "serde_u256")]
        amount_out_min: U256,
        routes: Vec<RouteSegment>,
        recipient: String,
        deadline: u64,
    },
}

impl SwapBundle {
    #[must_use]
    pub fn amount_out_min(&self) -> U256 {
        match self {
            Self::StandardOnly { amount_out_min, .. } | Self::Router { amount_out_min, .. } => {
                *amount_out_min
            }
        }
    }
}

/// Liquidity deposit parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepositBundle {
    Standard {
        asset0: CurrencyId,
        asset1: CurrencyId,
        #[serde(with = "serde_u256")]
        amount0_desired: U256,
        #[serde(with = "serde_u256")]
        amount1_desired: U256,
        #[serde(with = "serde_u256")]
        amount0_min: U256,
        #[serde(with = "serde_u256")]
        amount1_min: U256,
        deadline: u64,
    },
    Stable {
        pool_id: u32,
        /// One amount per pooled currency, in pool order.
        #[serde(with = "serde_u256::vec")]
        amounts: Vec<U256>,
        #[serde(with = "serde_u256")]
        min_lp_out: U256,
        recipient: String,
        deadline: u64,
    },
    Meta {
        pool_id: u32,
        base_pool_id: u32,
        /// Meta pool currencies other than the base LP token, in pool order.
        #[serde(with = "serde_u256::vec")]
        meta_amounts: Vec<U256>,
        /// Base pool currencies, in base pool order.
        #[serde(with = "serde_u256::vec")]
        base_amounts: Vec<U256>,
        #[serde(with = "serde_u256")]
        min_lp_out: U256,
        recipient: String,
        deadline: u64,
    },
}

/// Liquidity withdrawal parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WithdrawBundle {
    Standard {
        asset0: CurrencyId,
        asset1: CurrencyId,
        #[serde(with = "serde_u256")]
        lp_amount: U256,
        #[serde(with = "serde_u256")]
        amount0_min: U256,
        #[serde(with = "serde_u256")]
        amount1_min: U256,
        recipient: String,
        deadline: u64,
    },
    Stable {
        pool_id: u32,
        #[serde(with = "serde_u256")]
        lp_amount: U256,
        #[serde(with = "serde_u256::vec")]
        min_amounts: Vec<U256>,
        recipient: String,
        deadline: u64,
    },
    Meta {
        pool_id: u32,
        base_pool_id: u32,
        #[serde(with = "serde_u256")]
        lp_amount: U256,
        #[serde(with = "serde_u256::vec")]
        meta_min_amounts: Vec<U256>,
        #[serde(with = "serde_u256::vec")]
        base_min_amounts: Vec<U256>,
        recipient: String,
        deadline: u64,
    },
}

/// One farming reward to claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardClaim {
    pub lp_token: CurrencyId,
    pub reward_currency: CurrencyId,
    #[serde(with = "serde_u256")]
    pub amount: U256,
}

/// Every reward claim sent in one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardClaimBundle {
    pub claims: Vec<RewardClaim>,
}

impl RewardClaimBundle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
