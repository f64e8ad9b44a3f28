//! Property-based tests for the pool invariants.
//!
//! 1. **Swap reversibility**: A→B→A through the same pool never gains.
//! 2. **Invariant preservation**: `k` (standard) and `D` (stable) never
//!    decrease after a swap.
//! 3. **Deposit homogeneity**: k× proportional amounts mint k× LP.
//! 4. **Deposit/withdraw round trip** on a fee-free standard pool.
//! 5. **Meta withdrawal accounting**: flattened amounts match the
//!    proportional share with nothing dropped or doubled.

use proptest::prelude::*;

use crate::entities::{
    Currency, CurrencyId, LiquidityPool, StableLiquidityMetaPool, StableLiquidityPool,
    StandardLiquidityPool,
};
use crate::enums::PairStatus;
use crate::math::fixed::abs_diff;
use crate::value_objects::{FeeRate, MonetaryAmount, PooledCurrencies};
use primitive_types::U256;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn coin(id: u32, decimals: u8) -> Currency {
    Currency::new(CurrencyId::ForeignAsset(id), format!("C{id}"), decimals)
}

fn make_standard(ra: u128, rb: u128, supply: u128, fee: u128) -> StandardLiquidityPool {
    let (a, b) = (coin(1, 12), coin(2, 12));
    let lp = Currency::new(CurrencyId::lp_token(a.id.clone(), b.id.clone()), "LP", 18);
    let pooled =
        PooledCurrencies::from_atomics(&[a, b], &[U256::from(ra), U256::from(rb)]).unwrap();
    StandardLiquidityPool::new(
        lp,
        pooled,
        FeeRate::standard(fee),
        U256::from(supply),
        PairStatus::Trading,
        vec![],
    )
    .unwrap()
}

fn make_stable(
    pool_id: u32,
    coins: &[Currency],
    reserves: &[U256],
    amp: u128,
    fee: u128,
    supply: U256,
) -> StableLiquidityPool {
    let lp = Currency::new(CurrencyId::StableLpToken(pool_id), format!("LP{pool_id}"), 18);
    let pooled = PooledCurrencies::from_atomics(coins, reserves).unwrap();
    StableLiquidityPool::new(pool_id, lp, pooled, amp, FeeRate::stable(fee), supply).unwrap()
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [10_000, 10_000_000_000].
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000_000u128
}

/// Standard fee numerators in [1, 100] (0.01% to 1%).
fn standard_fee_strategy() -> impl Strategy<Value = u128> {
    1u128..=100u128
}

fn amplification_strategy() -> impl Strategy<Value = u128> {
    1u128..=1_000u128
}

// ---------------------------------------------------------------------------
// Property 1 and 2: reversibility and invariant preservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_standard_round_trip_loses_value(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        fee in standard_fee_strategy(),
        divisor in 2u128..=1_000u128,
    ) {
        let swap_in = (ra / divisor).max(1);
        let pool = make_standard(ra, rb, ra, fee);
        let input = MonetaryAmount::new(coin(1, 12), swap_in);
        let Ok(received) = pool.output_amount(&input, &coin(2, 12)) else {
            return Ok(());
        };
        if received.is_zero() { return Ok(()); }

        let after = make_standard(ra + swap_in, rb - received.atomic().as_u128(), ra, fee);
        let Ok(back) = after.output_amount(&received, &coin(1, 12)) else {
            return Ok(());
        };
        prop_assert!(
            back.atomic() < U256::from(swap_in),
            "round trip gained: {} from {}",
            back.atomic(), swap_in
        );
    }

    #[test]
    fn prop_standard_invariant_net_of_fee(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        fee in 0u128..=100u128,
        dx in 1u128..=1_000_000_000u128,
    ) {
        let pool = make_standard(ra, rb, ra, fee);
        let input = MonetaryAmount::new(coin(1, 12), dx);
        let Ok(out) = pool.output_amount(&input, &coin(2, 12)) else {
            return Ok(());
        };
        let dy = out.atomic();
        let scale = U256::from(10_000u64);
        let lhs = (U256::from(ra) * scale + U256::from(dx) * U256::from(10_000 - fee))
            * (U256::from(rb) - dy);
        let rhs = U256::from(ra) * U256::from(rb) * scale;
        prop_assert!(lhs >= rhs);
    }

    #[test]
    fn prop_stable_round_trip_loses_value(
        reserve in reserve_strategy(),
        skew in 1u128..=4u128,
        amp in amplification_strategy(),
        divisor in 10u128..=1_000u128,
    ) {
        let coins = [coin(1, 12), coin(2, 12)];
        let reserves = [U256::from(reserve), U256::from(reserve * skew)];
        let fee = 4_000_000u128;
        let pool = make_stable(0, &coins, &reserves, amp, fee, U256::from(reserve));
        let swap_in = (reserve / divisor).max(1);

        let input = MonetaryAmount::new(coins[0].clone(), swap_in);
        let Ok(received) = pool.output_amount(&input, &coins[1]) else {
            return Ok(());
        };
        if received.is_zero() { return Ok(()); }

        let after_reserves = [
            reserves[0] + U256::from(swap_in),
            reserves[1] - received.atomic(),
        ];
        let after = make_stable(0, &coins, &after_reserves, amp, fee, U256::from(reserve));
        let Ok(before_d) = pool.curve().and_then(|c| c.invariant()) else {
            return Ok(());
        };
        let Ok(after_d) = after.curve().and_then(|c| c.invariant()) else {
            return Ok(());
        };
        prop_assert!(after_d >= before_d, "D decreased: {} < {}", after_d, before_d);

        let Ok(back) = after.output_amount(&received, &coins[0]) else {
            return Ok(());
        };
        prop_assert!(back.atomic() < U256::from(swap_in));
    }
}

// ---------------------------------------------------------------------------
// Property 3 and 4: deposit homogeneity and round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_standard_deposit_is_homogeneous(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        supply in reserve_strategy(),
        divisor in 10u128..=1_000u128,
        k in 2u128..=50u128,
    ) {
        let pool = make_standard(ra, rb, supply, 30);
        let (a, b) = ((ra / divisor).max(1), (rb / divisor).max(1));
        let deposit = |x: u128, y: u128| {
            pool.deposit_lp_token_amount(&[
                MonetaryAmount::new(coin(1, 12), x),
                MonetaryAmount::new(coin(2, 12), y),
            ])
        };
        let (Ok(single), Ok(scaled)) = (deposit(a, b), deposit(a * k, b * k)) else {
            return Ok(());
        };
        let expected = single.atomic() * U256::from(k);
        prop_assert!(scaled.atomic() >= expected);
        prop_assert!(abs_diff(scaled.atomic(), expected) <= U256::from(k));
    }

    #[test]
    fn prop_deposit_then_withdraw_returns_deposit(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        divisor in 2u128..=1_000u128,
    ) {
        let pool = make_standard(ra, rb, ra, 0);
        let a = (ra / divisor).max(1);
        let first = MonetaryAmount::new(coin(1, 12), a);
        let Ok(amounts) = pool.deposit_input_amounts(&first) else {
            return Ok(());
        };
        let b = amounts[1].atomic().as_u128();
        let Ok(minted) = pool.deposit_lp_token_amount(&amounts) else {
            return Ok(());
        };
        if minted.is_zero() { return Ok(()); }

        let after = make_standard(ra + a, rb + b, ra + minted.atomic().as_u128(), 0);
        let Ok(out) = after.withdrawal_amounts(&minted) else {
            return Ok(());
        };
        let tolerance = U256::from(3 + ra / rb + rb / ra);
        let (x, y) = (out.atomics()[0], out.atomics()[1]);
        prop_assert!(x <= U256::from(a) && U256::from(a) - x <= tolerance);
        prop_assert!(y <= U256::from(b) && U256::from(b) - y <= tolerance);
    }
}

// ---------------------------------------------------------------------------
// Property 5: meta withdrawal accounting
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_meta_withdrawal_accounts_for_share(
        base_reserve in reserve_strategy(),
        base_supply in reserve_strategy(),
        held in reserve_strategy(),
        own in reserve_strategy(),
        supply in reserve_strategy(),
        share_bps in 1u128..=10_000u128,
    ) {
        let held = held.min(base_supply);
        let base_coins = [coin(1, 12), coin(2, 12)];
        let base = make_stable(
            0,
            &base_coins,
            &[U256::from(base_reserve), U256::from(base_reserve)],
            100,
            0,
            U256::from(base_supply),
        );
        let meta_coins = [coin(3, 12), base.lp_token.clone()];
        let pool = make_stable(
            1,
            &meta_coins,
            &[U256::from(own), U256::from(held)],
            100,
            0,
            U256::from(supply),
        );
        let meta = StableLiquidityMetaPool::new(pool, LiquidityPool::Stable(base)).unwrap();

        let lp = supply * share_bps / 10_000;
        let burned = meta.pool.total_supply.with_atomic(U256::from(lp));
        let Ok(out) = meta.withdrawal_amounts(&burned) else {
            return Ok(());
        };
        prop_assert_eq!(out.len(), 3);
        prop_assert_eq!(out.currency_list(), meta.involved_currencies());

        // own currency: plain proportional share
        prop_assert_eq!(
            out.atomics()[0],
            U256::from(own) * U256::from(lp) / U256::from(supply)
        );

        // base currencies: never above the exact nested share, and below it
        // by no more than the two truncations allow
        let exact = U256::from(lp) * U256::from(held) * U256::from(base_reserve)
            / (U256::from(supply) * U256::from(base_supply));
        let slack = U256::from(base_reserve / base_supply + 1);
        for amount in &out.atomics()[1..] {
            prop_assert!(*amount <= exact);
            prop_assert!(exact - *amount <= slack);
        }
    }
}
