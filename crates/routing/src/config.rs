use serde::{Deserialize, Serialize};

/// Upper bound on the number of hops in a trade.
pub const MAX_HOPS: usize = 4;

/// Configuration for the route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Maximum hops per trade, at most [`MAX_HOPS`].
    pub max_hops: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { max_hops: MAX_HOPS }
    }
}

impl RoutingConfig {
    /// Creates a config with the hop limit clamped to `1..=MAX_HOPS`.
    #[must_use]
    pub fn with_max_hops(max_hops: usize) -> Self {
        Self {
            max_hops: max_hops.clamp(1, MAX_HOPS),
        }
    }

    /// Hop budget actually used by the search.
    #[must_use]
    pub fn hop_budget(&self) -> usize {
        self.max_hops.min(MAX_HOPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_limit_only_lowers() {
        assert_eq!(RoutingConfig::default().hop_budget(), 4);
        assert_eq!(RoutingConfig::with_max_hops(2).hop_budget(), 2);
        assert_eq!(RoutingConfig::with_max_hops(9).hop_budget(), 4);
        assert_eq!(RoutingConfig::with_max_hops(0).hop_budget(), 1);
        assert_eq!(RoutingConfig { max_hops: 7 }.hop_budget(), 4);
    }
}
