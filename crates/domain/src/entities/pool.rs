use crate::entities::currency::{Currency, CurrencyId};
use crate::entities::meta_pool::StableLiquidityMetaPool;
use crate::entities::stable_pool::StableLiquidityPool;
use crate::entities::standard_pool::StandardLiquidityPool;
use crate::enums::PoolType;
use crate::error::DomainResult;
use crate::value_objects::{FeeRate, MonetaryAmount, PooledCurrencies, Price};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable snapshot of one liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityPool {
    Standard(StandardLiquidityPool),
    Stable(StableLiquidityPool),
    StableMeta(StableLiquidityMetaPool),
}

impl LiquidityPool {
    #[must_use]
    pub fn pool_type(&self) -> PoolType {
        match self {
            Self::Standard(_) => PoolType::Standard,
            Self::Stable(_) => PoolType::Stable,
            Self::StableMeta(_) => PoolType::StableMeta,
        }
    }

    #[must_use]
    pub fn lp_token(&self) -> &Currency {
        match self {
            Self::Standard(p) => &p.lp_token,
            Self::Stable(p) => &p.lp_token,
            Self::StableMeta(p) => &p.pool.lp_token,
        }
    }

    /// Identifier of the pool, unique within a snapshot.
    #[must_use]
    pub fn key(&self) -> &CurrencyId {
        &self.lp_token().id
    }

    /// Stable pool id, `None` for standard pools.
    #[must_use]
    pub fn stable_pool_id(&self) -> Option<u32> {
        match self {
            Self::Standard(_) => None,
            Self::Stable(p) => Some(p.pool_id),
            Self::StableMeta(p) => Some(p.pool_id()),
        }
    }

    /// Raw reserves in on-chain order (a meta pool lists the base LP token).
    #[must_use]
    pub fn pooled_currencies(&self) -> &PooledCurrencies {
        match self {
            Self::Standard(p) => &p.pooled_currencies,
            Self::Stable(p) => &p.pooled_currencies,
            Self::StableMeta(p) => &p.pool.pooled_currencies,
        }
    }

    /// Currencies a deposit or withdrawal works with. For meta pools the
    /// base LP slot is replaced by the base pool's currencies.
    #[must_use]
    pub fn involved_currencies(&self) -> Vec<Currency> {
        match self {
            Self::Standard(p) => p.pooled_currencies.currency_list(),
            Self::Stable(p) => p.pooled_currencies.currency_list(),
            Self::StableMeta(p) => p.involved_currencies(),
        }
    }

    #[must_use]
    pub fn trading_fee(&self) -> FeeRate {
        match self {
            Self::Standard(p) => p.trading_fee,
            Self::Stable(p) => p.trading_fee,
            Self::StableMeta(p) => p.pool.trading_fee,
        }
    }

    #[must_use]
    pub fn total_supply(&self) -> &MonetaryAmount {
        match self {
            Self::Standard(p) => &p.total_supply,
            Self::Stable(p) => &p.total_supply,
            Self::StableMeta(p) => &p.pool.total_supply,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Standard(p) => p.is_empty(),
            Self::Stable(p) => p.is_empty(),
            Self::StableMeta(p) => p.is_empty(),
        }
    }

    /// Stable pools always trade; standard pools only when their status says so.
    #[must_use]
    pub fn is_trading_active(&self) -> bool {
        match self {
            Self::Standard(p) => p.is_trading_active,
            Self::Stable(_) | Self::StableMeta(_) => true,
        }
    }

    /// Whether the pool can price a trade right now.
    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.is_trading_active() && !self.is_empty()
    }

    pub fn output_amount(
        &self,
        input: &MonetaryAmount,
        output: &Currency,
    ) -> DomainResult<MonetaryAmount> {
        match self {
            Self::Standard(p) => p.output_amount(input, output),
            Self::Stable(p) => p.output_amount(input, output),
            Self::StableMeta(p) => p.output_amount(input, output),
        }
    }

    pub fn spot_price(&self, input: &Currency, output: &Currency) -> DomainResult<Price> {
        match self {
            Self::Standard(p) => p.spot_price(input, output),
            Self::Stable(p) => p.spot_price(input, output),
            Self::StableMeta(p) => p.spot_price(input, output),
        }
    }

    /// LP tokens minted for depositing `amounts`.
    ///
    /// Standard pools take `[token0, token1]` in order; stable and meta pools
    /// take one amount per involved currency in any order.
    pub fn deposit_lp_token_amount(
        &self,
        amounts: &[MonetaryAmount],
    ) -> DomainResult<MonetaryAmount> {
        match self {
            Self::Standard(p) => p.deposit_lp_token_amount(amounts),
            Self::Stable(p) => p.deposit_lp_token_amount(amounts),
            Self::StableMeta(p) => p.deposit_lp_token_amount(amounts),
        }
    }

    /// Amounts returned for burning `lp_amount`, one per involved currency.
    pub fn withdrawal_amounts(&self, lp_amount: &MonetaryAmount) -> DomainResult<PooledCurrencies> {
        match self {
            Self::Standard(p) => p.withdrawal_amounts(lp_amount),
            Self::Stable(p) => p.withdrawal_amounts(lp_amount),
            Self::StableMeta(p) => p.withdrawal_amounts(lp_amount),
        }
    }

    /// Deposit amounts of every involved currency matching `amount`.
    pub fn deposit_input_amounts(
        &self,
        amount: &MonetaryAmount,
    ) -> DomainResult<Vec<MonetaryAmount>> {
        match self {
            Self::Standard(p) => p.deposit_input_amounts(amount),
            Self::Stable(p) => p.deposit_input_amounts(amount),
            Self::StableMeta(p) => p.deposit_input_amounts(amount),
        }
    }
}

impl fmt::Display for LiquidityPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(p) => write!(f, "standard {}/{}", p.token0, p.token1),
            Self::Stable(p) => {
                write!(f, "stable #{} [{}]", p.pool_id, p.pooled_currencies.describe())
            }
            Self::StableMeta(p) => write!(
                f,
                "meta #{} over #{} [{}]",
                p.pool_id(),
                p.base_pool_id(),
                p.pool.pooled_currencies.describe()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::PairStatus;
    use primitive_types::U256;

    fn coin(id: u32, ticker: &str) -> Currency {
        Currency::new(CurrencyId::ForeignAsset(id), ticker, 6)
    }

    #[test]
    fn test_inactive_and_empty_pools_are_not_routable() {
        let (a, b) = (coin(1, "A"), coin(2, "B"));
        let lp = Currency::new(CurrencyId::lp_token(a.id.clone(), b.id.clone()), "LP", 18);
        let funded = PooledCurrencies::from_atomics(
            &[a.clone(), b.clone()],
            &[U256::from(10), U256::from(10)],
        )
        .unwrap();
        let empty =
            PooledCurrencies::from_atomics(&[a, b], &[U256::from(10), U256::zero()]).unwrap();
        let build = |pooled: PooledCurrencies, status: PairStatus| {
            let fee = FeeRate::standard(30);
            let pool =
                StandardLiquidityPool::new(lp.clone(), pooled, fee, U256::one(), status, vec![]);
            LiquidityPool::Standard(pool.unwrap())
        };

        let bootstrap = build(funded.clone(), PairStatus::Bootstrap);
        assert!(!bootstrap.is_routable());

        let drained = build(empty, PairStatus::Trading);
        assert!(drained.is_empty());
        assert!(!drained.is_routable());

        let live = build(funded, PairStatus::Trading);
        assert!(live.is_routable());
        assert_eq!(live.pool_type(), PoolType::Standard);
        assert_eq!(live.stable_pool_id(), None);
        assert_eq!(live.to_string(), "standard A/B");
    }

    #[test]
    fn test_stable_pool_accessors() {
        let pooled = PooledCurrencies::from_atomics(
            &[coin(1, "A"), coin(2, "B"), coin(3, "C")],
            &[U256::from(10), U256::from(10), U256::from(10)],
        )
        .unwrap();
        let lp = Currency::new(CurrencyId::StableLpToken(4), "LP4", 18);
        let pool = LiquidityPool::Stable(
            StableLiquidityPool::new(4, lp, pooled, 100, FeeRate::stable(0), U256::from(30))
                .unwrap(),
        );
        assert_eq!(pool.stable_pool_id(), Some(4));
        assert_eq!(pool.involved_currencies().len(), 3);
        assert_eq!(pool.key(), &CurrencyId::StableLpToken(4));
        assert!(pool.is_trading_active());
    }
}
