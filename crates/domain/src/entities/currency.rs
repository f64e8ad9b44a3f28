use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain currency identifier.
///
/// LP tokens carry their pool membership: a standard pool's LP token names
/// both pooled currencies, a stable pool's LP token names the pool id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurrencyId {
    /// Native ledger token identified by ticker.
    Token(String),
    /// Registered foreign asset.
    ForeignAsset(u32),
    /// LP token of a standard pool over `(token0, token1)`.
    LpToken(Box<CurrencyId>, Box<CurrencyId>),
    /// LP token of the stable pool with the given id.
    StableLpToken(u32),
}

impl CurrencyId {
    /// Convenience constructor for a native token.
    pub fn token(ticker: impl Into<String>) -> Self {
        Self::Token(ticker.into())
    }

    /// Convenience constructor for a standard LP token.
    pub fn lp_token(token0: CurrencyId, token1: CurrencyId) -> Self {
        Self::LpToken(Box::new(token0), Box::new(token1))
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(ticker) => write!(f, "{ticker}"),
            Self::ForeignAsset(id) => write!(f, "foreign:{id}"),
            Self::LpToken(a, b) => write!(f, "lp:{a}-{b}"),
            Self::StableLpToken(id) => write!(f, "stable-lp:{id}"),
        }
    }
}

/// A currency descriptor resolved from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    /// On-chain identifier.
    pub id: CurrencyId,
    /// Display ticker.
    pub ticker: String,
    /// Number of decimal places of one whole unit.
    pub decimals: u8,
}

impl Currency {
    pub fn new(id: CurrencyId, ticker: impl Into<String>, decimals: u8) -> Self {
        Self {
            id,
            ticker: ticker.into(),
            decimals,
        }
    }

    /// Returns the pooled currencies of a standard LP token.
    #[must_use]
    pub fn lp_components(&self) -> Option<(&CurrencyId, &CurrencyId)> {
        match &self.id {
            CurrencyId::LpToken(a, b) => Some((a, b)),
            _ => None,
        }
    }

    /// Returns the pool id of a stable LP token.
    #[must_use]
    pub fn stable_pool_id(&self) -> Option<u32> {
        match self.id {
            CurrencyId::StableLpToken(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_lp_token(&self) -> bool {
        matches!(
            self.id,
            CurrencyId::LpToken(..) | CurrencyId::StableLpToken(_)
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker)
    }
}
