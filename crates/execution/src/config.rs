use bridge_amm_domain::value_objects::Percentage;
use rust_decimal::Decimal;

/// Configuration for bundle construction.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Slippage applied when the caller gives none.
    pub default_slippage: Percentage,
    /// Ledger time (seconds) added to "now" to form a deadline.
    pub deadline_offset: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            // 0.5%
            default_slippage: Percentage::new(Decimal::new(5, 1)).unwrap_or(Percentage::ZERO),
            deadline_offset: 1_800, // 30 minutes
        }
    }
}

impl ExecutorConfig {
    /// Deadline for a bundle built at ledger time `now`.
    #[must_use]
    pub fn deadline_from(&self, now: u64) -> u64 {
        now.saturating_add(self.deadline_offset)
    }

    /// `slippage` or the configured default.
    #[must_use]
    pub fn slippage_or_default(&self, slippage: Option<Percentage>) -> Percentage {
        slippage.unwrap_or(self.default_slippage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.default_slippage.value(), dec!(0.5));
        assert_eq!(config.deadline_from(1_000), 2_800);
        assert_eq!(config.deadline_from(u64::MAX), u64::MAX);

        let one = Percentage::new(dec!(1)).unwrap();
        assert_eq!(config.slippage_or_default(Some(one)).value(), dec!(1));
        assert_eq!(config.slippage_or_default(None).value(), dec!(0.5));
    }
}
