use bridge_amm_domain::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// One hop of a trade: a pool and the direction it is traded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathElement {
    Standard {
        pool: StandardLiquidityPool,
        input: Currency,
        output: Currency,
    },
    Stable {
        pool: StableLiquidityPool,
        input: Currency,
        output: Currency,
    },
    /// Hop through a meta pool; `mode` tells whether it crosses the base pool.
    Meta {
        pool: StableLiquidityMetaPool,
        input: Currency,
        output: Currency,
        mode: StableSwapMode,
    },
}

impl PathElement {
    /// Builds the hop trading `input` for `output` through `pool`.
    pub fn new(pool: &LiquidityPool, input: &Currency, output: &Currency) -> DomainResult<Self> {
        let (input, output) = (input.clone(), output.clone());
        Ok(match pool {
            LiquidityPool::Standard(p) => {
                if !p.contains(&input) || !p.contains(&output) || input == output {
                    return Err(hop_mismatch(&p.pooled_currencies, &input, &output));
                }
                Self::Standard { pool: p.clone(), input, output }
            }
            LiquidityPool::Stable(p) => {
                if !p.contains(&input) || !p.contains(&output) || input == output {
                    return Err(hop_mismatch(&p.pooled_currencies, &input, &output));
                }
                Self::Stable { pool: p.clone(), input, output }
            }
            LiquidityPool::StableMeta(p) => {
                let mode = p.swap_mode(&input, &output)?;
                Self::Meta { pool: p.clone(), input, output, mode }
            }
        })
    }

    #[must_use]
    pub fn input(&self) -> &Currency {
        match self {
            Self::Standard { input, .. }
            | Self::Stable { input, .. }
            | Self::Meta { input, .. } => input,
        }
    }

    #[must_use]
    pub fn output(&self) -> &Currency {
        match self {
            Self::Standard { output, .. }
            | Self::Stable { output, .. }
            | Self::Meta { output, .. } => output,
        }
    }

    /// LP token of the traded pool.
    #[must_use]
    pub fn lp_token(&self) -> &Currency {
        match self {
            Self::Standard { pool, .. } => &pool.lp_token,
            Self::Stable { pool, .. } => &pool.lp_token,
            Self::Meta { pool, .. } => &pool.pool.lp_token,
        }
    }

    /// `true` for every hop through a stable or meta pool.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        !matches!(self, Self::Standard { .. })
    }

    /// `true` for meta hops that enter or leave the base pool.
    #[must_use]
    pub fn crosses_base(&self) -> bool {
        matches!(
            self,
            Self::Meta {
                mode: StableSwapMode::FromBase | StableSwapMode::ToBase,
                ..
            }
        )
    }

    /// Output of this hop for `amount` of its input currency.
    pub fn output_amount(&self, amount: &MonetaryAmount) -> DomainResult<MonetaryAmount> {
        amount.ensure_same_currency(self.input())?;
        match self {
            Self::Standard { pool, output, .. } => pool.output_amount(amount, output),
            Self::Stable { pool, output, .. } => pool.output_amount(amount, output),
            Self::Meta { pool, output, .. } => pool.output_amount(amount, output),
        }
    }

    /// Fee-free marginal price of the hop's input in units of its output.
    pub fn spot_price(&self) -> DomainResult<Price> {
        match self {
            Self::Standard { pool, input, output } => pool.spot_price(input, output),
            Self::Stable { pool, input, output } => pool.spot_price(input, output),
            Self::Meta { pool, input, output, .. } => pool.spot_price(input, output),
        }
    }
}

fn hop_mismatch(pooled: &PooledCurrencies, input: &Currency, output: &Currency) -> DomainError {
    DomainError::mismatch(pooled.describe(), format!("{input} -> {output}"))
}

/// A priced route from one currency to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    path: Vec<PathElement>,
    input_amount: MonetaryAmount,
    output_amount: MonetaryAmount,
    /// Percentage (0-100) by which the execution price falls short of the
    /// chained spot price.
    price_impact: Decimal,
}

impl Trade {
    /// Creates a trade and computes its price impact.
    ///
    /// The hops must chain from the input currency to the output currency.
    /// When the spot or execution price cannot be represented the impact is
    /// recorded as zero and the trade is kept.
    pub fn new(
        path: Vec<PathElement>,
        input_amount: MonetaryAmount,
        output_amount: MonetaryAmount,
    ) -> DomainResult<Self> {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Err(DomainError::InvalidAmount("trade without hops".to_string()));
        };
        input_amount.ensure_same_currency(first.input())?;
        output_amount.ensure_same_currency(last.output())?;
        if let Some(gap) = path.windows(2).find(|w| w[0].output() != w[1].input()) {
            return Err(DomainError::mismatch(gap[0].output(), gap[1].input()));
        }

        let mut trade = Self {
            path,
            input_amount,
            output_amount,
            price_impact: Decimal::ZERO,
        };
        trade.price_impact = trade.compute_price_impact().unwrap_or_else(|e| {
            warn!(error = %e, "Price impact unavailable, recording zero");
            Decimal::ZERO
        });
        Ok(trade)
    }

    #[must_use]
    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.path.len()
    }

    #[must_use]
    pub fn input_amount(&self) -> &MonetaryAmount {
        &self.input_amount
    }

    #[must_use]
    pub fn output_amount(&self) -> &MonetaryAmount {
        &self.output_amount
    }

    #[must_use]
    pub fn price_impact(&self) -> Decimal {
        self.price_impact
    }

    /// Currencies visited, input first.
    #[must_use]
    pub fn currency_path(&self) -> Vec<&Currency> {
        let mut currencies = Vec::with_capacity(self.path.len() + 1);
        if let Some(first) = self.path.first() {
            currencies.push(first.input());
        }
        currencies.extend(self.path.iter().map(PathElement::output));
        currencies
    }

    #[must_use]
    pub fn involves_stable_pool(&self) -> bool {
        self.path.iter().any(PathElement::is_stable)
    }

    /// Output per unit of input, in whole units.
    pub fn execution_price(&self) -> DomainResult<Price> {
        let input = self.input_amount.to_decimal()?;
        if input.is_zero() {
            return Err(DomainError::DivisionByZero);
        }
        let output = self.output_amount.to_decimal()?;
        output
            .checked_div(input)
            .map(Price::new)
            .ok_or(DomainError::Overflow("execution price"))
    }

    /// Product of the hops' spot prices.
    pub fn spot_price(&self) -> DomainResult<Price> {
        self.path
            .iter()
            .try_fold(Price::new(Decimal::ONE), |acc, hop| -> DomainResult<Price> {
                Ok(acc.then(&hop.spot_price()?))
            })
    }

    fn compute_price_impact(&self) -> DomainResult<Decimal> {
        let spot = self.spot_price()?.value;
        if spot.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let execution = self.execution_price()?.value;
        let shortfall = (spot - execution) / spot * Decimal::ONE_HUNDRED;
        Ok(shortfall.max(Decimal::ZERO).round_dp(6))
    }

    /// Smallest output accepted under `slippage`, rounded down.
    pub fn minimum_output_amount(&self, slippage: &Percentage) -> DomainResult<MonetaryAmount> {
        slippage.apply_min(&self.output_amount)
    }
}
