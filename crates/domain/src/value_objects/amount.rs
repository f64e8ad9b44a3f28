use crate::entities::currency::Currency;
use crate::enums::Rounding;
use crate::error::{DomainError, DomainResult};
use crate::math::fixed::{decimal_to_u256, mul_div, u256_to_decimal};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of a specific currency, held in atomic units.
///
/// Arithmetic between amounts of different currencies is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonetaryAmount {
    currency: Currency,
    atomic: U256,
}

impl MonetaryAmount {
    pub fn new(currency: Currency, atomic: impl Into<U256>) -> Self {
        Self {
            currency,
            atomic: atomic.into(),
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(currency, U256::zero())
    }

    /// Builds an amount from a human-readable decimal value, truncating
    /// digits beyond the currency's precision.
    pub fn from_decimal(currency: Currency, value: Decimal) -> DomainResult<Self> {
        let atomic = decimal_to_u256(value, u32::from(currency.decimals))?;
        Ok(Self { currency, atomic })
    }

    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Raw on-chain value.
    #[must_use]
    pub fn atomic(&self) -> U256 {
        self.atomic
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.atomic.is_zero()
    }

    /// Human-readable value (`atomic / 10^decimals`).
    pub fn to_decimal(&self) -> DomainResult<Decimal> {
        u256_to_decimal(self.atomic, u32::from(self.currency.decimals))
    }

    /// Returns a new amount of the same currency with a different value.
    #[must_use]
    pub fn with_atomic(&self, atomic: U256) -> Self {
        Self::new(self.currency.clone(), atomic)
    }

    /// Fails with [`DomainError::CurrencyMismatch`] unless `other` has the same currency.
    pub fn ensure_same_currency(&self, other: &Currency) -> DomainResult<()> {
        if &self.currency != other {
            return Err(DomainError::mismatch(&self.currency, other));
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Self) -> DomainResult<Self> {
        self.ensure_same_currency(&other.currency)?;
        let sum = self
            .atomic
            .checked_add(other.atomic)
            .ok_or(DomainError::Overflow("amount add"))?;
        Ok(self.with_atomic(sum))
    }

    pub fn checked_sub(&self, other: &Self) -> DomainResult<Self> {
        self.ensure_same_currency(&other.currency)?;
        let diff = self
            .atomic
            .checked_sub(other.atomic)
            .ok_or(DomainError::Underflow("amount sub"))?;
        Ok(self.with_atomic(diff))
    }

    /// Scales the amount by `numerator / denominator`.
    pub fn mul_ratio(
        &self,
        numerator: U256,
        denominator: U256,
        rounding: Rounding,
    ) -> DomainResult<Self> {
        Ok(self.with_atomic(mul_div(self.atomic, numerator, denominator, rounding)?))
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(value) => write!(f, "{} {}", value, self.currency),
            Err(_) => write!(f, "{} atomic {}", self.atomic, self.currency),
        }
    }
}
