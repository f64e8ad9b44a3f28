use crate::error::LoaderError;
use async_trait::async_trait;
use bridge_amm_domain::entities::{Currency, CurrencyId};
use std::collections::HashMap;

/// Decimals of every LP token minted by the ledger.
pub const LP_TOKEN_DECIMALS: u8 = 18;

/// Resolves currency ids into full currency descriptors.
#[async_trait]
pub trait CurrencyRegistry: Send + Sync {
    async fn resolve(&self, id: &CurrencyId) -> Result<Currency, LoaderError>;
}

/// Registry backed by a fixed currency table.
///
/// LP tokens never need registering: their descriptor is derived from the
/// id, with the ticker built from the resolved pooled currencies.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    currencies: HashMap<CurrencyId, Currency>,
}

impl InMemoryRegistry {
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Self {
        Self {
            currencies: currencies.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    fn lookup(&self, id: &CurrencyId) -> Result<Currency, LoaderError> {
        if let Some(currency) = self.currencies.get(id) {
            return Ok(currency.clone());
        }
        match id {
            CurrencyId::LpToken(a, b) => {
                let (a, b) = (self.lookup(a)?, self.lookup(b)?);
                Ok(Currency::new(id.clone(), format!("LP {a}-{b}"), LP_TOKEN_DECIMALS))
            }
            CurrencyId::StableLpToken(pool_id) => Ok(Currency::new(
                id.clone(),
                format!("LP stable {pool_id}"),
                LP_TOKEN_DECIMALS,
            )),
            CurrencyId::Token(_) | CurrencyId::ForeignAsset(_) => {
                Err(LoaderError::UnknownCurrency(id.clone()))
            }
        }
    }
}

#[async_trait]
impl CurrencyRegistry for InMemoryRegistry {
    async fn resolve(&self, id: &CurrencyId) -> Result<Currency, LoaderError> {
        self.lookup(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::new([
            Currency::new(CurrencyId::token("KSM"), "KSM", 12),
            Currency::new(CurrencyId::ForeignAsset(1), "USDT", 6),
        ])
    }

    #[tokio::test]
    async fn test_resolves_registered_currency() {
        let usdt = registry().resolve(&CurrencyId::ForeignAsset(1)).await.unwrap();
        assert_eq!(usdt.ticker, "USDT");
        assert_eq!(usdt.decimals, 6);
    }

    #[tokio::test]
    async fn test_derives_lp_tokens() {
        let registry = registry();
        let lp = registry
            .resolve(&CurrencyId::lp_token(CurrencyId::token("KSM"), CurrencyId::ForeignAsset(1)))
            .await
            .unwrap();
        assert_eq!(lp.ticker, "LP KSM-USDT");
        assert_eq!(lp.decimals, LP_TOKEN_DECIMALS);

        let stable = registry.resolve(&CurrencyId::StableLpToken(4)).await.unwrap();
        assert_eq!(stable.ticker, "LP stable 4");
    }

    #[tokio::test]
    async fn test_unknown_currency() {
        let registry = registry();
        let err = registry.resolve(&CurrencyId::ForeignAsset(9)).await.unwrap_err();
        assert!(matches!(err, LoaderError::UnknownCurrency(CurrencyId::ForeignAsset(9))));

        let lp = CurrencyId::lp_token(CurrencyId::token("KSM"), CurrencyId::token("DOT"));
        assert!(registry.resolve(&lp).await.is_err());
    }
}
