use crate::entities::currency::Currency;
use crate::error::{DomainError, DomainResult};
use crate::value_objects::amount::MonetaryAmount;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

fn tickers<'a>(currencies: impl Iterator<Item = &'a Currency>) -> String {
    currencies
        .map(|c| c.ticker.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Matches caller-supplied amounts against an expected currency list and
/// returns their raw values in the expected order.
///
/// With `ordered` the currencies must appear exactly in `expected` order;
/// otherwise any permutation is accepted (membership check).
pub fn align_amounts(
    expected: &[Currency],
    amounts: &[MonetaryAmount],
    ordered: bool,
) -> DomainResult<Vec<U256>> {
    if amounts.len() != expected.len() {
        return Err(DomainError::ImbalancedInputCount {
            expected: expected.len(),
            found: amounts.len(),
        });
    }
    let mismatch = || {
        DomainError::mismatch(
            tickers(expected.iter()),
            tickers(amounts.iter().map(MonetaryAmount::currency)),
        )
    };

    if ordered {
        if expected.iter().zip(amounts).any(|(c, a)| a.currency() != c) {
            return Err(mismatch());
        }
        return Ok(amounts.iter().map(MonetaryAmount::atomic).collect());
    }

    let mut aligned = Vec::with_capacity(expected.len());
    for currency in expected {
        let mut matching = amounts.iter().filter(|a| a.currency() == currency);
        match (matching.next(), matching.next()) {
            (Some(amount), None) => aligned.push(amount.atomic()),
            _ => return Err(mismatch()),
        }
    }
    Ok(aligned)
}

/// Reserves of a pool, one amount per constituent, in on-chain order.
///
/// The order is fixed at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PooledCurrencies(Vec<MonetaryAmount>);

impl PooledCurrencies {
    /// Wraps reserves, rejecting duplicated currencies.
    pub fn new(amounts: Vec<MonetaryAmount>) -> DomainResult<Self> {
        for (i, a) in amounts.iter().enumerate() {
            if amounts[..i].iter().any(|b| b.currency() == a.currency()) {
                return Err(DomainError::InvalidPoolStructure(format!(
                    "currency {} pooled twice",
                    a.currency()
                )));
            }
        }
        Ok(Self(amounts))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonetaryAmount> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MonetaryAmount> {
        self.0.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[MonetaryAmount] {
        &self.0
    }

    /// Currencies in reserve order.
    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.0.iter().map(MonetaryAmount::currency)
    }

    /// Raw reserves in reserve order.
    #[must_use]
    pub fn atomics(&self) -> Vec<U256> {
        self.0.iter().map(MonetaryAmount::atomic).collect()
    }

    #[must_use]
    pub fn position_of(&self, currency: &Currency) -> Option<usize> {
        self.0.iter().position(|a| a.currency() == currency)
    }

    #[must_use]
    pub fn contains(&self, currency: &Currency) -> bool {
        self.position_of(currency).is_some()
    }

    /// Reserve held of `currency`.
    pub fn amount_of(&self, currency: &Currency) -> DomainResult<&MonetaryAmount> {
        self.position_of(currency)
            .map(|i| &self.0[i])
            .ok_or_else(|| DomainError::mismatch(self.describe(), currency))
    }

    /// `true` when any reserve is zero.
    #[must_use]
    pub fn has_zero_reserve(&self) -> bool {
        self.0.iter().any(MonetaryAmount::is_zero)
    }

    /// Builds reserves from currencies and raw values given in the same order.
    pub fn from_atomics(currencies: &[Currency], atomics: &[U256]) -> DomainResult<Self> {
        if currencies.len() != atomics.len() {
            return Err(DomainError::ImbalancedInputCount {
                expected: currencies.len(),
                found: atomics.len(),
            });
        }
        Self::new(
            currencies
                .iter()
                .zip(atomics)
                .map(|(c, a)| MonetaryAmount::new(c.clone(), *a))
                .collect(),
        )
    }

    /// Owned list of the currencies, in reserve order.
    #[must_use]
    pub fn currency_list(&self) -> Vec<Currency> {
        self.currencies().cloned().collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<MonetaryAmount> {
        self.0
    }

    /// Comma-separated tickers, used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        tickers(self.currencies())
    }
}
