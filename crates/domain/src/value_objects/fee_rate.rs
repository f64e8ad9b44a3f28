use crate::error::DomainResult;
use crate::math::fixed::ratio_to_decimal;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee denominator of standard (constant-product) pools.
pub const STANDARD_FEE_DENOMINATOR: u128 = 10_000;

/// Fee denominator of stable pools.
pub const STABLE_FEE_DENOMINATOR: u128 = 10_000_000_000;

/// A trading fee expressed as `numerator / denominator`, exactly as stored on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeRate {
    pub numerator: u128,
    pub denominator: u128,
}

impl FeeRate {
    /// Standard pool fee (`numerator / 10_000`).
    #[must_use]
    pub fn standard(numerator: u128) -> Self {
        Self {
            numerator,
            denominator: STANDARD_FEE_DENOMINATOR,
        }
    }

    /// Stable pool fee (`numerator / 10_000_000_000`).
    #[must_use]
    pub fn stable(numerator: u128) -> Self {
        Self {
            numerator,
            denominator: STABLE_FEE_DENOMINATOR,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// `true` when the fee would consume the whole input.
    #[must_use]
    pub fn is_total(&self) -> bool {
        self.numerator >= self.denominator
    }

    /// Fee as a fraction, e.g. `0.003`.
    pub fn as_decimal(&self) -> DomainResult<Decimal> {
        ratio_to_decimal(U256::from(self.numerator), U256::from(self.denominator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_fractions() {
        assert_eq!(FeeRate::standard(30).as_decimal().unwrap(), dec!(0.003));
        assert_eq!(FeeRate::stable(4_000_000).as_decimal().unwrap(), dec!(0.0004));
        assert!(FeeRate::standard(0).is_zero());
        assert!(FeeRate::standard(10_000).is_total());
    }
}
