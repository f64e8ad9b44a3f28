//! Integer helpers shared by the swap and liquidity math.
//!
//! All on-chain quantities are handled as `U256` atomic units so that the
//! ledger's truncating division is reproduced bit for bit. `Decimal` is only
//! used at the edges for display and for human-entered values.

use crate::enums::Rounding;
use crate::error::{DomainError, DomainResult};
use primitive_types::U256;
use rust_decimal::Decimal;

/// Largest number of significant bits a `Decimal` mantissa can carry.
const DECIMAL_MANTISSA_BITS: usize = 96;

/// Largest scale a `Decimal` can carry.
const DECIMAL_MAX_SCALE: u32 = 28;

/// Returns `10^exp`.
pub fn pow10(exp: u32) -> DomainResult<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(DomainError::Overflow("10^exp"))
}

/// Computes `a * b / denominator` with the requested rounding.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> DomainResult<U256> {
    if denominator.is_zero() {
        return Err(DomainError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(DomainError::Overflow("mul_div"))?;
    let quotient = product / denominator;
    if rounding.is_up() && !(product % denominator).is_zero() {
        return quotient
            .checked_add(U256::one())
            .ok_or(DomainError::Overflow("mul_div round up"));
    }
    Ok(quotient)
}

/// Absolute difference of two unsigned values.
#[must_use]
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b { a - b } else { b - a }
}

/// Converts `value / 10^scale` into a `Decimal`.
///
/// The conversion is exact when the value fits the decimal mantissa; larger
/// values drop trailing fractional digits until they fit.
pub fn u256_to_decimal(value: U256, scale: u32) -> DomainResult<Decimal> {
    let mut value = value;
    let mut scale = scale;
    while scale > DECIMAL_MAX_SCALE {
        value /= U256::from(10u8);
        scale -= 1;
    }
    while value.bits() > DECIMAL_MANTISSA_BITS {
        if scale == 0 {
            return Err(DomainError::Conversion(format!(
                "{value} does not fit a decimal"
            )));
        }
        value /= U256::from(10u8);
        scale -= 1;
    }
    let mantissa = i128::try_from(value.low_u128())
        .map_err(|_| DomainError::Conversion("mantissa exceeds i128".to_string()))?;
    Ok(Decimal::from_i128_with_scale(mantissa, scale).normalize())
}

/// Converts a non-negative decimal into `value * 10^scale` atomic units,
/// truncating any digits beyond `scale`.
pub fn decimal_to_u256(value: Decimal, scale: u32) -> DomainResult<U256> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::InvalidAmount(format!("{value} is negative")));
    }
    let mantissa = u128::try_from(value.mantissa())
        .map_err(|_| DomainError::Conversion(format!("{value} has a negative mantissa")))?;
    mul_div(
        U256::from(mantissa),
        pow10(scale)?,
        pow10(value.scale())?,
        Rounding::Down,
    )
}

/// Converts the ratio `numerator / denominator` into a `Decimal`, keeping
/// as many fractional digits (up to 18) as the decimal mantissa allows.
pub fn ratio_to_decimal(numerator: U256, denominator: U256) -> DomainResult<Decimal> {
    if denominator.is_zero() {
        return Err(DomainError::DivisionByZero);
    }
    for scale in (0..=18u32).rev() {
        let scaled = mul_div(numerator, pow10(scale)?, denominator, Rounding::Down);
        if let Ok(scaled) = scaled
            && scaled.bits() <= DECIMAL_MANTISSA_BITS
        {
            return u256_to_decimal(scaled, scale);
        }
    }
    Err(DomainError::Conversion(
        "ratio does not fit a decimal".to_string(),
    ))
}

/// Multiplies `value` by `10^exp` (`exp` may be negative).
///
/// Used to turn an atomic-unit rate into a whole-unit price.
pub fn shift_decimal(value: Decimal, exp: i32) -> DomainResult<Decimal> {
    if exp == 0 {
        return Ok(value);
    }
    let factor = 10i128
        .checked_pow(exp.unsigned_abs())
        .and_then(|f| Decimal::try_from_i128_with_scale(f, 0).ok())
        .ok_or(DomainError::Overflow("decimal shift"))?;
    let shifted = if exp > 0 {
        value.checked_mul(factor)
    } else {
        value.checked_div(factor)
    };
    shifted.ok_or(DomainError::Overflow("decimal shift"))
}
