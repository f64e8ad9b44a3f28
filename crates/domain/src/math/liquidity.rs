//! Deposit and withdrawal share math on raw reserves.
//!
//! StableSwap deposits need the invariant and live in
//! [`crate::math::stable_swap::StableCurve::deposit_lp`]; everything here is
//! plain proportional arithmetic.

use crate::enums::Rounding;
use crate::error::{DomainError, DomainResult};
use crate::math::constant_product::initial_liquidity;
use crate::math::fixed::mul_div;
use primitive_types::U256;

/// Proportional share of every reserve for `lp_amount` out of `total_supply`:
/// `lp × reserve_i / supply`, truncating.
pub fn proportional_withdrawal(
    lp_amount: U256,
    reserves: &[U256],
    total_supply: U256,
) -> DomainResult<Vec<U256>> {
    if lp_amount > total_supply {
        return Err(DomainError::InvalidAmount(format!(
            "LP amount {lp_amount} exceeds total supply {total_supply}"
        )));
    }
    if total_supply.is_zero() {
        return Ok(vec![U256::zero(); reserves.len()]);
    }
    reserves
        .iter()
        .map(|r| mul_div(lp_amount, *r, total_supply, Rounding::Down))
        .collect()
}

/// LP tokens minted by a two-sided constant-product deposit.
///
/// Non-empty pools mint `min_i(amount_i × supply / reserve_i)`; an empty
/// pool (zero supply or a zero reserve) mints `isqrt(amount0 × amount1)`.
pub fn standard_deposit_lp(
    amounts: [U256; 2],
    reserves: [U256; 2],
    total_supply: U256,
) -> DomainResult<U256> {
    if total_supply.is_zero() || reserves.iter().any(U256::is_zero) {
        return initial_liquidity(amounts[0], amounts[1]);
    }
    let share0 = mul_div(amounts[0], total_supply, reserves[0], Rounding::Down)?;
    let share1 = mul_div(amounts[1], total_supply, reserves[1], Rounding::Down)?;
    Ok(share0.min(share1))
}

/// Amounts of every currency matching `amount` of the currency at `index`
/// at the current reserve ratio. The entry at `index` is `amount` itself.
pub fn proportional_amounts(
    amount: U256,
    index: usize,
    reserves: &[U256],
) -> DomainResult<Vec<U256>> {
    let reference = *reserves.get(index).ok_or_else(|| {
        DomainError::InvalidAmount(format!("reserve index {index} out of range"))
    })?;
    if reference.is_zero() {
        return Err(DomainError::EmptyPool(
            "cannot derive a ratio from a zero reserve".to_string(),
        ));
    }
    reserves
        .iter()
        .enumerate()
        .map(|(i, r)| {
            if i == index {
                Ok(amount)
            } else {
                mul_div(amount, *r, reference, Rounding::Down)
            }
        })
        .collect()
}
