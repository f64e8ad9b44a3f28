use crate::error::{DomainError, DomainResult};
use crate::math::fixed::ratio_to_decimal;
use crate::value_objects::fee_rate::FeeRate;
use primitive_types::U256;

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * (dx * (1 - fee)) / (x + (dx * (1 - fee)))
///
/// Evaluated in integers scaled by the fee denominator; the final division
/// truncates toward zero exactly like the ledger.
pub fn calculate_out_amount(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: FeeRate,
) -> DomainResult<U256> {
    if amount_in.is_zero() {
        return Ok(U256::zero());
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DomainError::InsufficientLiquidity);
    }
    if fee.is_total() {
        return Ok(U256::zero());
    }

    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(fee.denominator - fee.numerator))
        .ok_or(DomainError::Overflow("cp: amount in with fee"))?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(DomainError::Overflow("cp: numerator"))?;
    let denominator = reserve_in
        .checked_mul(U256::from(fee.denominator))
        .ok_or(DomainError::Overflow("cp: denominator"))?
        .checked_add(amount_in_with_fee)
        .ok_or(DomainError::Overflow("cp: denominator"))?;

    Ok(numerator / denominator)
}

/// Calculates the input required to receive `amount_out`, rounded up.
pub fn calculate_in_amount(
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: FeeRate,
) -> DomainResult<U256> {
    if amount_out.is_zero() {
        return Ok(U256::zero());
    }
    if reserve_in.is_zero() || amount_out >= reserve_out {
        return Err(DomainError::InsufficientLiquidity);
    }
    if fee.is_total() {
        return Err(DomainError::InsufficientLiquidity);
    }

    let numerator = reserve_in
        .checked_mul(amount_out)
        .and_then(|v| v.checked_mul(U256::from(fee.denominator)))
        .ok_or(DomainError::Overflow("cp: in numerator"))?;
    let denominator = (reserve_out - amount_out)
        .checked_mul(U256::from(fee.denominator - fee.numerator))
        .ok_or(DomainError::Overflow("cp: in denominator"))?;

    Ok(numerator / denominator + U256::one())
}

/// Calculates the spot price of token_in in terms of token_out (atomic units).
/// Price = reserve_out / reserve_in
pub fn calculate_spot_price(
    reserve_in: U256,
    reserve_out: U256,
) -> DomainResult<rust_decimal::Decimal> {
    if reserve_in.is_zero() {
        return Err(DomainError::DivisionByZero);
    }
    ratio_to_decimal(reserve_out, reserve_in)
}

/// LP tokens minted by the first deposit into an empty pool: `sqrt(a0 * a1)`.
pub fn initial_liquidity(amount0: U256, amount1: U256) -> DomainResult<U256> {
    let product = amount0
        .checked_mul(amount1)
        .ok_or(DomainError::Overflow("cp: initial liquidity"))?;
    Ok(product.integer_sqrt())
}
