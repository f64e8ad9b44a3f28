//! Pool builders shared by the routing tests.

use bridge_amm_domain::prelude::*;
use primitive_types::U256;

pub(crate) const UNIT: u64 = 100_000_000;

pub(crate) fn coin(id: u32) -> Currency {
    Currency::new(CurrencyId::ForeignAsset(id), format!("C{id}"), 8)
}

pub(crate) fn amount(currency: &Currency, whole: u64) -> MonetaryAmount {
    MonetaryAmount::new(currency.clone(), U256::from(whole) * U256::from(UNIT))
}

fn standard_raw(
    lp_id: CurrencyId,
    a: &Currency,
    b: &Currency,
    ra: U256,
    rb: U256,
    status: PairStatus,
) -> LiquidityPool {
    let lp = Currency::new(lp_id, format!("LP {a}-{b}"), 18);
    let pooled = PooledCurrencies::from_atomics(&[a.clone(), b.clone()], &[ra, rb]).unwrap();
    let pool =
        StandardLiquidityPool::new(lp, pooled, FeeRate::standard(30), ra, status, vec![]).unwrap();
    LiquidityPool::Standard(pool)
}

fn standard_with(
    lp_id: CurrencyId,
    a: &Currency,
    b: &Currency,
    ra: u64,
    rb: u64,
    status: PairStatus,
) -> LiquidityPool {
    let unit = U256::from(UNIT);
    standard_raw(lp_id, a, b, U256::from(ra) * unit, U256::from(rb) * unit, status)
}

/// Trading standard pool with reserves given in whole units.
pub(crate) fn standard(a: &Currency, b: &Currency, ra: u64, rb: u64) -> LiquidityPool {
    let lp_id = CurrencyId::lp_token(a.id.clone(), b.id.clone());
    standard_with(lp_id, a, b, ra, rb, PairStatus::Trading)
}

/// Trading standard pool with reserves given in atomic units.
pub(crate) fn standard_atomic(a: &Currency, b: &Currency, ra: U256, rb: U256) -> LiquidityPool {
    let lp_id = CurrencyId::lp_token(a.id.clone(), b.id.clone());
    standard_raw(lp_id, a, b, ra, rb, PairStatus::Trading)
}

/// Standard pool with an explicit LP token name, for parallel pairs.
pub(crate) fn named_standard(
    name: &str,
    a: &Currency,
    b: &Currency,
    ra: u64,
    rb: u64,
) -> LiquidityPool {
    standard_with(CurrencyId::token(name), a, b, ra, rb, PairStatus::Trading)
}

pub(crate) fn bootstrap(a: &Currency, b: &Currency, ra: u64, rb: u64) -> LiquidityPool {
    let lp_id = CurrencyId::lp_token(a.id.clone(), b.id.clone());
    standard_with(lp_id, a, b, ra, rb, PairStatus::Bootstrap)
}

fn stable_pool(pool_id: u32, coins: &[Currency], reserve: u64) -> StableLiquidityPool {
    let lp = Currency::new(CurrencyId::StableLpToken(pool_id), format!("LP{pool_id}"), 18);
    let reserves = vec![U256::from(reserve) * U256::from(UNIT); coins.len()];
    let pooled = PooledCurrencies::from_atomics(coins, &reserves).unwrap();
    // supply equal to D for balanced 8-decimal reserves
    let supply = U256::from(reserve) * U256::exp10(18) * U256::from(coins.len());
    StableLiquidityPool::new(pool_id, lp, pooled, 200, FeeRate::stable(4_000_000), supply).unwrap()
}

/// Balanced stable pool with `reserve` whole units of every coin.
pub(crate) fn stable(pool_id: u32, coins: &[Currency], reserve: u64) -> LiquidityPool {
    LiquidityPool::Stable(stable_pool(pool_id, coins, reserve))
}

/// Meta pool holding `own` and the base LP token, balanced at `reserve`.
pub(crate) fn meta(
    pool_id: u32,
    own: &Currency,
    base: LiquidityPool,
    reserve: u64,
) -> LiquidityPool {
    let LiquidityPool::Stable(base_pool) = &base else {
        panic!("stable base");
    };
    let lp = Currency::new(CurrencyId::StableLpToken(pool_id), format!("LP{pool_id}"), 18);
    let pooled = PooledCurrencies::from_atomics(
        &[own.clone(), base_pool.lp_token.clone()],
        &[
            U256::from(reserve) * U256::from(UNIT),
            U256::from(reserve) * U256::exp10(18),
        ],
    )
    .unwrap();
    let supply = U256::from(reserve) * U256::exp10(18) * U256::from(2u8);
    let pool =
        StableLiquidityPool::new(pool_id, lp, pooled, 100, FeeRate::stable(4_000_000), supply)
            .unwrap();
    LiquidityPool::StableMeta(StableLiquidityMetaPool::new(pool, base).unwrap())
}
