use crate::enums::Rounding;
use crate::error::{DomainError, DomainResult};
use crate::math::fixed::{decimal_to_u256, pow10};
use crate::value_objects::amount::MonetaryAmount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed-point scale used when applying a percentage to an atomic amount.
const PERCENT_SCALE: u32 = 10;

/// A percentage in `[0, 100]`, e.g. `0.5` for half a percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(DomainError::InvalidAmount(format!(
                "percentage {value} outside [0, 100]"
            )));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Minimum acceptable amount under this tolerance:
    /// `amount × (1 − pct/100)`, rounded down.
    pub fn apply_min(&self, amount: &MonetaryAmount) -> DomainResult<MonetaryAmount> {
        // pct/100 expressed in units of 10^-(PERCENT_SCALE + 2)
        let full = pow10(PERCENT_SCALE + 2)?;
        let cut = decimal_to_u256(self.0, PERCENT_SCALE)?;
        let keep = full
            .checked_sub(cut)
            .ok_or(DomainError::Underflow("slippage above 100%"))?;
        amount.mul_ratio(keep, full, Rounding::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::currency::{Currency, CurrencyId};
    use primitive_types::U256;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bounds() {
        assert!(Percentage::new(dec!(-0.1)).is_err());
        assert!(Percentage::new(dec!(100.1)).is_err());
        assert!(Percentage::new(dec!(0)).is_ok());
        assert!(Percentage::new(dec!(100)).is_ok());
    }

    #[test]
    fn test_apply_min() {
        let usdt = Currency::new(CurrencyId::ForeignAsset(2), "USDT", 6);
        let amount = MonetaryAmount::new(usdt, 1_000_000u64);

        let min = Percentage::new(dec!(0.5)).unwrap().apply_min(&amount).unwrap();
        assert_eq!(min.atomic(), U256::from(995_000u64));

        let all = Percentage::new(dec!(100)).unwrap().apply_min(&amount).unwrap();
        assert!(all.is_zero());

        let none = Percentage::new(dec!(0)).unwrap().apply_min(&amount).unwrap();
        assert_eq!(none.atomic(), amount.atomic());
    }

    #[test]
    fn test_apply_min_truncates() {
        let kbtc = Currency::new(CurrencyId::token("KBTC"), "KBTC", 8);
        let amount = MonetaryAmount::new(kbtc, 3u64);
        // 3 * 0.99 = 2.97 -> 2
        let min = Percentage::new(dec!(1)).unwrap().apply_min(&amount).unwrap();
        assert_eq!(min.atomic(), U256::from(2u64));
    }
}
