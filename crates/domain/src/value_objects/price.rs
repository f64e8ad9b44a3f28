use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Units of quote currency per unit of base currency, in whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Chains two prices (`A→B` then `B→C` gives `A→C`).
    #[must_use]
    pub fn then(&self, next: &Price) -> Self {
        Self {
            value: self.value.checked_mul(next.value).unwrap_or(Decimal::MAX),
        }
    }
}
