//! Raw ledger records, exactly as fetched and before currency resolution.

use crate::serde_u256;
use bridge_amm_domain::entities::CurrencyId;
use bridge_amm_domain::enums::PairStatus;
use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Yearly farming reward of a standard pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReward {
    pub currency: CurrencyId,
    #[serde(with = "serde_u256")]
    pub amount: U256,
}

/// Standard pair record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStandardPool {
    pub token0: CurrencyId,
    pub token1: CurrencyId,
    #[serde(with = "serde_u256")]
    pub reserve0: U256,
    #[serde(with = "serde_u256")]
    pub reserve1: U256,
    /// Fee numerator over 10_000.
    pub fee_numerator: u128,
    #[serde(with = "serde_u256")]
    pub total_supply: U256,
    pub status: PairStatus,
    #[serde(default)]
    pub yearly_rewards: Vec<RawReward>,
}

impl RawStandardPool {
    /// LP token id of the pair.
    #[must_use]
    pub fn lp_token(&self) -> CurrencyId {
        CurrencyId::lp_token(self.token0.clone(), self.token1.clone())
    }
}

/// Stable pool record. Currencies and balances share one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStablePool {
    pub pool_id: u32,
    pub currencies: Vec<CurrencyId>,
    #[serde(with = "serde_u256::vec")]
    pub balances: Vec<U256>,
    /// Amplification coefficient `A`.
    pub amplification: u128,
    /// Fee numerator over 10_000_000_000.
    pub fee_numerator: u128,
    #[serde(with = "serde_u256")]
    pub total_supply: U256,
}

impl RawStablePool {
    #[must_use]
    pub fn lp_token(&self) -> CurrencyId {
        CurrencyId::StableLpToken(self.pool_id)
    }

    /// Ids of stable pools whose LP token this pool holds.
    pub fn held_pool_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.currencies.iter().filter_map(|c| match c {
            CurrencyId::StableLpToken(id) => Some(*id),
            _ => None,
        })
    }
}

/// Every pool record read at one block. `None` marks an uninitialised
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub block_number: u64,
    #[serde(default)]
    pub standard_pools: Vec<Option<RawStandardPool>>,
    #[serde(default)]
    pub stable_pools: Vec<Option<RawStablePool>>,
}

impl LedgerSnapshot {
    /// Every currency id the snapshot refers to, LP tokens included, in
    /// first-seen order.
    #[must_use]
    pub fn referenced_currencies(&self) -> Vec<CurrencyId> {
        let mut ids: Vec<CurrencyId> = Vec::new();
        let mut push = |id: CurrencyId| {
            if !ids.contains(&id) {
                ids.push(id);
            }
        };
        for raw in self.standard_pools.iter().flatten() {
            push(raw.token0.clone());
            push(raw.token1.clone());
            push(raw.lp_token());
            for reward in &raw.yearly_rewards {
                push(reward.currency.clone());
            }
        }
        for raw in self.stable_pools.iter().flatten() {
            for id in &raw.currencies {
                push(id.clone());
            }
            push(raw.lp_token());
        }
        ids
    }
}
