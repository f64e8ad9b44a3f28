//! Turns raw ledger records into pool snapshots.
//!
//! Every fetch happens up front: the loader is awaited once and each
//! referenced currency is resolved once. Assembly itself is synchronous and
//! fails on the first malformed record.

use crate::error::LoaderError;
use crate::loader::PoolStateLoader;
use crate::records::{LedgerSnapshot, RawStablePool, RawStandardPool};
use crate::registry::CurrencyRegistry;
use bridge_amm_domain::prelude::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info};

/// Deepest base-pool chain followed while nesting meta pools.
const MAX_NESTING: usize = 2;

/// Pools built from one ledger snapshot.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub block_number: u64,
    /// Standard pools first, then stable and meta pools, in record order.
    pub pools: Vec<LiquidityPool>,
}

impl PoolSnapshot {
    /// Pool whose LP token has the given id.
    #[must_use]
    pub fn pool_by_lp(&self, id: &CurrencyId) -> Option<&LiquidityPool> {
        self.pools.iter().find(|p| p.key() == id)
    }

    /// Currency with the given ticker among every pooled, involved or LP
    /// currency of the snapshot.
    #[must_use]
    pub fn currency_by_ticker(&self, ticker: &str) -> Option<Currency> {
        self.pools.iter().find_map(|pool| {
            std::iter::once(pool.lp_token().clone())
                .chain(pool.pooled_currencies().currency_list())
                .chain(pool.involved_currencies())
                .find(|c| c.ticker.eq_ignore_ascii_case(ticker))
        })
    }
}

/// Loads a snapshot and assembles its pools.
pub async fn load_pools<L, R>(loader: &L, registry: &R) -> Result<PoolSnapshot, LoaderError>
where
    L: PoolStateLoader + ?Sized,
    R: CurrencyRegistry + ?Sized,
{
    let snapshot = loader.load_snapshot().await?;
    let mut currencies = HashMap::new();
    for id in snapshot.referenced_currencies() {
        let currency = registry.resolve(&id).await?;
        currencies.insert(id, currency);
    }

    let pools = assemble(&snapshot, &currencies)?;
    info!(
        block = snapshot.block_number,
        fetched_at = %snapshot.fetched_at,
        pools = pools.len(),
        currencies = currencies.len(),
        "Pool snapshot assembled"
    );
    Ok(PoolSnapshot {
        fetched_at: snapshot.fetched_at,
        block_number: snapshot.block_number,
        pools,
    })
}

/// Builds every initialised record of `snapshot` into a pool.
pub fn assemble(
    snapshot: &LedgerSnapshot,
    currencies: &HashMap<CurrencyId, Currency>,
) -> Result<Vec<LiquidityPool>, LoaderError> {
    let mut pools = Vec::new();

    for (index, record) in snapshot.standard_pools.iter().enumerate() {
        match record {
            Some(raw) => pools.push(LiquidityPool::Standard(build_standard(raw, currencies)?)),
            None => debug!(index, "Dropping uninitialised standard pool record"),
        }
    }

    let stable: HashMap<u32, &RawStablePool> = snapshot
        .stable_pools
        .iter()
        .flatten()
        .map(|raw| (raw.pool_id, raw))
        .collect();
    for (index, record) in snapshot.stable_pools.iter().enumerate() {
        match record {
            Some(raw) => pools.push(build_stable(raw, &stable, currencies, 0)?),
            None => debug!(index, "Dropping uninitialised stable pool record"),
        }
    }

    Ok(pools)
}

fn lookup(
    currencies: &HashMap<CurrencyId, Currency>,
    id: &CurrencyId,
) -> Result<Currency, LoaderError> {
    currencies
        .get(id)
        .cloned()
        .ok_or_else(|| LoaderError::UnknownCurrency(id.clone()))
}

fn build_standard(
    raw: &RawStandardPool,
    currencies: &HashMap<CurrencyId, Currency>,
) -> Result<StandardLiquidityPool, LoaderError> {
    let token0 = lookup(currencies, &raw.token0)?;
    let token1 = lookup(currencies, &raw.token1)?;
    let lp_token = lookup(currencies, &raw.lp_token())?;
    let pooled = PooledCurrencies::from_atomics(&[token0, token1], &[raw.reserve0, raw.reserve1])?;
    let rewards = raw
        .yearly_rewards
        .iter()
        .map(|r| -> Result<MonetaryAmount, LoaderError> {
            Ok(MonetaryAmount::new(lookup(currencies, &r.currency)?, r.amount))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StandardLiquidityPool::new(
        lp_token,
        pooled,
        FeeRate::standard(raw.fee_numerator),
        raw.total_supply,
        raw.status,
        rewards,
    )?)
}

fn build_plain_stable(
    raw: &RawStablePool,
    currencies: &HashMap<CurrencyId, Currency>,
) -> Result<StableLiquidityPool, LoaderError> {
    let resolved = raw
        .currencies
        .iter()
        .map(|id| lookup(currencies, id))
        .collect::<Result<Vec<_>, _>>()?;
    let pooled = PooledCurrencies::from_atomics(&resolved, &raw.balances)?;
    let lp_token = lookup(currencies, &raw.lp_token())?;
    Ok(StableLiquidityPool::new(
        raw.pool_id,
        lp_token,
        pooled,
        raw.amplification,
        FeeRate::stable(raw.fee_numerator),
        raw.total_supply,
    )?)
}

/// Builds a stable pool, nesting it over its base when it holds another
/// stable pool's LP token.
fn build_stable(
    raw: &RawStablePool,
    stable: &HashMap<u32, &RawStablePool>,
    currencies: &HashMap<CurrencyId, Currency>,
    depth: usize,
) -> Result<LiquidityPool, LoaderError> {
    let pool = build_plain_stable(raw, currencies)?;
    let held: Vec<u32> = raw.held_pool_ids().collect();
    let base_id = match held.as_slice() {
        [] => return Ok(LiquidityPool::Stable(pool)),
        [base_id] => *base_id,
        _ => {
            return Err(DomainError::InvalidPoolStructure(format!(
                "stable pool {} holds {} base LP tokens",
                raw.pool_id,
                held.len()
            ))
            .into());
        }
    };
    if depth >= MAX_NESTING {
        return Err(DomainError::InvalidPoolStructure(format!(
            "pool nesting deeper than {MAX_NESTING} at pool {}",
            raw.pool_id
        ))
        .into());
    }

    let base_raw = stable.get(&base_id).ok_or_else(|| {
        DomainError::PoolDataUnavailable(format!(
            "base pool {base_id} of meta pool {}",
            raw.pool_id
        ))
    })?;
    let base = build_stable(base_raw, stable, currencies, depth + 1)?;
    debug!(pool = raw.pool_id, base = base_id, "Nesting meta pool over base");
    Ok(LiquidityPool::StableMeta(StableLiquidityMetaPool::new(pool, base)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemoryLoader;
    use crate::records::RawReward;
    use crate::registry::InMemoryRegistry;
    use primitive_types::U256;

    fn asset(id: u32) -> CurrencyId {
        CurrencyId::ForeignAsset(id)
    }

    fn stable_lp(pool_id: u32) -> CurrencyId {
        CurrencyId::StableLpToken(pool_id)
    }

    fn unit(decimals: usize, whole: u64) -> U256 {
        U256::from(whole) * U256::exp10(decimals)
    }

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::new([
            Currency::new(CurrencyId::token("KSM"), "KSM", 12),
            Currency::new(CurrencyId::token("KBTC"), "KBTC", 8),
            Currency::new(CurrencyId::ForeignAsset(1), "USDT", 6),
            Currency::new(CurrencyId::ForeignAsset(2), "USDC", 6),
            Currency::new(CurrencyId::ForeignAsset(3), "DAI", 6),
        ])
    }

    fn standard_record() -> RawStandardPool {
        RawStandardPool {
            token0: CurrencyId::token("KSM"),
            token1: CurrencyId::ForeignAsset(1),
            reserve0: unit(12, 1_000),
            reserve1: unit(6, 30_000),
            fee_numerator: 30,
            total_supply: unit(18, 5_000),
            status: PairStatus::Trading,
            yearly_rewards: vec![RawReward {
                currency: CurrencyId::token("KBTC"),
                amount: unit(8, 1),
            }],
        }
    }

    fn stable_record(pool_id: u32, currencies: Vec<CurrencyId>) -> RawStablePool {
        let n = currencies.len();
        let balances = currencies
            .iter()
            .map(|id| match id {
                CurrencyId::StableLpToken(_) => unit(18, 1_000_000),
                _ => unit(6, 1_000_000),
            })
            .collect();
        RawStablePool {
            pool_id,
            currencies,
            balances,
            amplification: 200,
            fee_numerator: 4_000_000,
            total_supply: unit(18, 1_000_000) * U256::from(n),
        }
    }

    fn snapshot(
        standard: Vec<Option<RawStandardPool>>,
        stable: Vec<Option<RawStablePool>>,
    ) -> LedgerSnapshot {
        LedgerSnapshot {
            fetched_at: Utc::now(),
            block_number: 7,
            standard_pools: standard,
            stable_pools: stable,
        }
    }

    #[tokio::test]
    async fn test_assembles_standard_stable_and_meta_pools() {
        let loader = InMemoryLoader::new(snapshot(
            vec![Some(standard_record()), None],
            vec![
                Some(stable_record(0, vec![asset(1), asset(2)])),
                None,
                Some(stable_record(1, vec![asset(3), stable_lp(0)])),
            ],
        ));
        let snapshot = load_pools(&loader, &registry()).await.unwrap();

        assert_eq!(snapshot.block_number, 7);
        let kinds: Vec<PoolType> = snapshot.pools.iter().map(LiquidityPool::pool_type).collect();
        assert_eq!(kinds, vec![PoolType::Standard, PoolType::Stable, PoolType::StableMeta]);

        let LiquidityPool::Standard(standard) = &snapshot.pools[0] else {
            panic!("standard first");
        };
        assert_eq!(standard.lp_token.ticker, "LP KSM-USDT");
        assert!(standard.is_trading_active);
        assert_eq!(standard.yearly_rewards[0].currency().ticker, "KBTC");

        let LiquidityPool::StableMeta(meta) = &snapshot.pools[2] else {
            panic!("meta pool last");
        };
        assert_eq!(meta.base_pool_id(), 0);
        let tickers: Vec<String> =
            meta.involved_currencies().into_iter().map(|c| c.ticker).collect();
        assert_eq!(tickers, vec!["DAI", "USDT", "USDC"]);

        assert!(snapshot.pool_by_lp(&CurrencyId::StableLpToken(1)).is_some());
        assert_eq!(snapshot.currency_by_ticker("usdc").unwrap().id, CurrencyId::ForeignAsset(2));
    }

    #[tokio::test]
    async fn test_missing_base_pool_is_unavailable() {
        let loader = InMemoryLoader::new(snapshot(
            vec![],
            vec![
                None,
                Some(stable_record(1, vec![asset(3), stable_lp(0)])),
            ],
        ));
        let err = load_pools(&loader, &registry()).await.unwrap_err();
        assert!(matches!(err, LoaderError::Domain(DomainError::PoolDataUnavailable(_))));
    }

    #[tokio::test]
    async fn test_meta_over_meta_is_rejected() {
        let loader = InMemoryLoader::new(snapshot(
            vec![],
            vec![
                Some(stable_record(0, vec![asset(1), asset(2)])),
                Some(stable_record(1, vec![asset(3), stable_lp(0)])),
                Some(stable_record(2, vec![asset(1), stable_lp(1)])),
            ],
        ));
        let err = load_pools(&loader, &registry()).await.unwrap_err();
        assert!(matches!(err, LoaderError::Domain(DomainError::InvalidPoolStructure(_))));
    }

    #[tokio::test]
    async fn test_cyclic_nesting_is_rejected() {
        let loader = InMemoryLoader::new(snapshot(
            vec![],
            vec![
                Some(stable_record(0, vec![asset(1), stable_lp(1)])),
                Some(stable_record(1, vec![asset(2), stable_lp(0)])),
            ],
        ));
        let err = load_pools(&loader, &registry()).await.unwrap_err();
        assert!(matches!(err, LoaderError::Domain(DomainError::InvalidPoolStructure(_))));
    }

    #[tokio::test]
    async fn test_stable_fee_above_one_hundred_percent_is_rejected() {
        let mut record = stable_record(
            0,
            vec![CurrencyId::ForeignAsset(1), CurrencyId::ForeignAsset(2)],
        );
        record.fee_numerator = 20_000_000_000;
        let loader = InMemoryLoader::new(snapshot(vec![], vec![Some(record)]));
        let err = load_pools(&loader, &registry()).await.unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Domain(DomainError::InvalidPoolStructure(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_currency_fails_before_assembly() {
        let mut record = standard_record();
        record.token1 = CurrencyId::ForeignAsset(99);
        let loader = InMemoryLoader::new(snapshot(vec![Some(record)], vec![]));
        let err = load_pools(&loader, &registry()).await.unwrap_err();
        assert!(matches!(err, LoaderError::UnknownCurrency(CurrencyId::ForeignAsset(99))));
    }

    #[test]
    fn test_bootstrap_pair_is_not_trading() {
        let mut record = standard_record();
        record.status = PairStatus::Bootstrap;
        let snapshot = snapshot(vec![Some(record)], vec![]);
        let mut currencies = HashMap::new();
        for id in snapshot.referenced_currencies() {
            let currency = match &id {
                CurrencyId::LpToken(..) => Currency::new(id.clone(), "LP", 18),
                CurrencyId::Token(t) => Currency::new(id.clone(), t.clone(), 12),
                _ => Currency::new(id.clone(), "X", 6),
            };
            currencies.insert(id, currency);
        }
        let pools = assemble(&snapshot, &currencies).unwrap();
        assert!(!pools[0].is_trading_active());
        assert!(!pools[0].is_routable());
    }
}
