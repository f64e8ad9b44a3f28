//! Stable pools that hold another stable pool's LP token.
//!
//! The meta pool keeps its raw reserves (including the base LP slot) for
//! curve math. Deposits and withdrawals work on the *involved* currency list,
//! where the base LP slot is replaced in place by the base pool's currencies.

use crate::entities::currency::Currency;
use crate::entities::pool::LiquidityPool;
use crate::entities::stable_pool::StableLiquidityPool;
use crate::enums::StableSwapMode;
use crate::error::{DomainError, DomainResult};
use crate::math::fixed::shift_decimal;
use crate::math::liquidity::{proportional_amounts, proportional_withdrawal};
use crate::math::stable_swap::StableCurve;
use crate::value_objects::pooled_currencies::align_amounts;
use crate::value_objects::{MonetaryAmount, PooledCurrencies, Price};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableLiquidityMetaPool {
    /// The meta pool itself, with the base LP token among its reserves.
    pub pool: StableLiquidityPool,
    /// The nested base pool.
    pub base_pool: StableLiquidityPool,
    base_lp_index: usize,
}

impl StableLiquidityMetaPool {
    /// Nests `pool` over `base`.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidPoolStructure`] when the base is not a plain
    /// stable pool or `pool` does not hold the base LP token.
    pub fn new(pool: StableLiquidityPool, base: LiquidityPool) -> DomainResult<Self> {
        let base_pool = match base {
            LiquidityPool::Stable(base) => base,
            LiquidityPool::StableMeta(base) => {
                return Err(DomainError::InvalidPoolStructure(format!(
                    "meta pool {} cannot nest meta pool {}",
                    pool.pool_id,
                    base.pool_id()
                )));
            }
            LiquidityPool::Standard(base) => {
                return Err(DomainError::InvalidPoolStructure(format!(
                    "meta pool {} cannot nest standard pool {}",
                    pool.pool_id, base.lp_token
                )));
            }
        };
        let base_lp_index = pool
            .pooled_currencies
            .position_of(&base_pool.lp_token)
            .ok_or_else(|| {
                DomainError::InvalidPoolStructure(format!(
                    "meta pool {} does not hold {}",
                    pool.pool_id, base_pool.lp_token
                ))
            })?;
        Ok(Self {
            pool,
            base_pool,
            base_lp_index,
        })
    }

    #[must_use]
    pub fn pool_id(&self) -> u32 {
        self.pool.pool_id
    }

    #[must_use]
    pub fn base_pool_id(&self) -> u32 {
        self.base_pool.pool_id
    }

    /// Position of the base LP token among the meta pool's reserves.
    #[must_use]
    pub fn base_lp_index(&self) -> usize {
        self.base_lp_index
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty() || self.base_pool.is_empty()
    }

    /// Meta pool currencies other than the base LP token, in reserve order.
    #[must_use]
    pub fn meta_currencies(&self) -> Vec<Currency> {
        self.pool
            .pooled_currencies
            .currencies()
            .enumerate()
            .filter(|(i, _)| *i != self.base_lp_index)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Own currencies with the base LP slot replaced by the base currencies.
    #[must_use]
    pub fn involved_currencies(&self) -> Vec<Currency> {
        let mut currencies = Vec::new();
        for (i, c) in self.pool.pooled_currencies.currencies().enumerate() {
            if i == self.base_lp_index {
                currencies.extend(self.base_pool.pooled_currencies.currencies().cloned());
            } else {
                currencies.push(c.clone());
            }
        }
        currencies
    }

    /// Per-coin rates; the base LP slot is priced at the base virtual price.
    pub fn rates(&self) -> DomainResult<Vec<U256>> {
        let mut rates = self.pool.rates()?;
        rates[self.base_lp_index] = self.base_pool.virtual_price()?;
        Ok(rates)
    }

    pub fn curve(&self) -> DomainResult<StableCurve> {
        self.pool.curve_with_rates(self.rates()?)
    }

    /// How a trade between `input` and `output` crosses the base pool.
    pub fn swap_mode(&self, input: &Currency, output: &Currency) -> DomainResult<StableSwapMode> {
        let lp = &self.base_pool.lp_token;
        let (in_meta, out_meta) = (self.pool.contains(input), self.pool.contains(output));
        let (in_base, out_base) = (self.base_pool.contains(input), self.base_pool.contains(output));

        if input != output {
            if in_meta && out_meta {
                return Ok(StableSwapMode::Single);
            }
            if in_base && out_meta && output != lp {
                return Ok(StableSwapMode::FromBase);
            }
            if in_meta && input != lp && out_base {
                return Ok(StableSwapMode::ToBase);
            }
        }
        Err(DomainError::mismatch(
            format!(
                "{} or {}",
                self.pool.pooled_currencies.describe(),
                self.base_pool.pooled_currencies.describe()
            ),
            format!("{input} -> {output}"),
        ))
    }

    /// Amount of `output` received for `input`, crossing the base pool when
    /// one side lives there.
    pub fn output_amount(
        &self,
        input: &MonetaryAmount,
        output: &Currency,
    ) -> DomainResult<MonetaryAmount> {
        let curve = self.curve()?;
        let out = match self.swap_mode(input.currency(), output)? {
            StableSwapMode::Single => {
                let i = self.pool.index_of(input.currency())?;
                let j = self.pool.index_of(output)?;
                curve.swap_out(i, j, input.atomic())?
            }
            StableSwapMode::FromBase => {
                let base_lp = self.base_pool.single_deposit_lp(input)?;
                let j = self.pool.index_of(output)?;
                curve.swap_out(self.base_lp_index, j, base_lp.atomic())?
            }
            StableSwapMode::ToBase => {
                let i = self.pool.index_of(input.currency())?;
                let base_lp = curve.swap_out(i, self.base_lp_index, input.atomic())?;
                let lp_amount = self.base_pool.total_supply.with_atomic(base_lp);
                return self.base_pool.withdraw_one_coin(&lp_amount, output);
            }
        };
        Ok(MonetaryAmount::new(output.clone(), out))
    }

    /// Marginal price of `input` in units of `output`, fee excluded.
    pub fn spot_price(&self, input: &Currency, output: &Currency) -> DomainResult<Price> {
        let curve = self.curve()?;
        let overflow = DomainError::Overflow("meta spot price");
        let atomic = match self.swap_mode(input, output)? {
            StableSwapMode::Single => {
                curve.spot_rate(self.pool.index_of(input)?, self.pool.index_of(output)?)?
            }
            StableSwapMode::FromBase => {
                let lp_per_coin = self.base_pool.lp_per_coin_rate(input)?;
                let coin_per_lp = curve.spot_rate(self.base_lp_index, self.pool.index_of(output)?)?;
                lp_per_coin.checked_mul(coin_per_lp).ok_or(overflow)?
            }
            StableSwapMode::ToBase => {
                let lp_per_input = curve.spot_rate(self.pool.index_of(input)?, self.base_lp_index)?;
                let lp_per_output = self.base_pool.lp_per_coin_rate(output)?;
                lp_per_input.checked_div(lp_per_output).ok_or(overflow)?
            }
        };
        let exp = i32::from(input.decimals) - i32::from(output.decimals);
        Ok(Price::new(shift_decimal(atomic, exp)?))
    }

    /// Share of every involved currency for `lp_atomic` meta LP tokens: the
    /// base LP share is expanded through the base pool in slot position.
    fn flattened_share(&self, lp_atomic: U256) -> DomainResult<PooledCurrencies> {
        let shares = proportional_withdrawal(
            lp_atomic,
            &self.pool.pooled_currencies.atomics(),
            self.pool.total_supply.atomic(),
        )?;
        let base_shares = proportional_withdrawal(
            shares[self.base_lp_index],
            &self.base_pool.pooled_currencies.atomics(),
            self.base_pool.total_supply.atomic(),
        )?;

        let mut flattened = Vec::with_capacity(shares.len() + base_shares.len() - 1);
        flattened.extend_from_slice(&shares[..self.base_lp_index]);
        flattened.extend_from_slice(&base_shares);
        flattened.extend_from_slice(&shares[self.base_lp_index + 1..]);
        PooledCurrencies::from_atomics(&self.involved_currencies(), &flattened)
    }

    /// Reserves attributable to the meta pool over the involved currencies:
    /// its own reserves plus `(held base LP / base supply) × base reserves`.
    pub fn effective_reserves(&self) -> DomainResult<PooledCurrencies> {
        self.flattened_share(self.pool.total_supply.atomic())
    }

    /// Splits amounts given over the involved currencies (any order) into
    /// meta-level amounts (reserve order, base LP excluded) and base amounts
    /// (base order).
    pub fn split_amounts(
        &self,
        amounts: &[MonetaryAmount],
    ) -> DomainResult<(Vec<MonetaryAmount>, Vec<MonetaryAmount>)> {
        let involved = self.involved_currencies();
        let aligned = align_amounts(&involved, amounts, false)?;
        let base_len = self.base_pool.pooled_currencies.len();
        let base_range = self.base_lp_index..self.base_lp_index + base_len;

        let mut meta = Vec::new();
        let mut base = Vec::new();
        for (k, (currency, atomic)) in involved.into_iter().zip(aligned).enumerate() {
            let amount = MonetaryAmount::new(currency, atomic);
            if base_range.contains(&k) {
                base.push(amount);
            } else {
                meta.push(amount);
            }
        }
        Ok((meta, base))
    }

    /// LP tokens minted for depositing `amounts` over the involved currencies.
    ///
    /// Base amounts are first deposited into the base pool; the minted base
    /// LP joins the meta pool's LP slot.
    pub fn deposit_lp_token_amount(
        &self,
        amounts: &[MonetaryAmount],
    ) -> DomainResult<MonetaryAmount> {
        let (meta, base) = self.split_amounts(amounts)?;
        let base_atomics: Vec<U256> = base.iter().map(MonetaryAmount::atomic).collect();
        let base_lp = if base_atomics.iter().all(U256::is_zero) {
            U256::zero()
        } else {
            self.base_pool.deposit_lp_raw(&base_atomics)?.atomic()
        };

        let mut meta_atomics: Vec<U256> = meta.iter().map(MonetaryAmount::atomic).collect();
        meta_atomics.insert(self.base_lp_index, base_lp);
        let minted = self.curve()?.deposit_lp(&meta_atomics)?;
        Ok(self.pool.total_supply.with_atomic(minted))
    }

    /// Proportional share of every involved currency for burning `lp_amount`.
    pub fn withdrawal_amounts(&self, lp_amount: &MonetaryAmount) -> DomainResult<PooledCurrencies> {
        lp_amount.ensure_same_currency(&self.pool.lp_token)?;
        self.flattened_share(lp_amount.atomic())
    }

    /// Amounts of every involved currency matching `amount` at the effective
    /// reserve ratio.
    pub fn deposit_input_amounts(
        &self,
        amount: &MonetaryAmount,
    ) -> DomainResult<Vec<MonetaryAmount>> {
        let reserves = self.effective_reserves()?;
        let i = reserves
            .position_of(amount.currency())
            .ok_or_else(|| DomainError::mismatch(reserves.describe(), amount.currency()))?;
        let amounts = proportional_amounts(amount.atomic(), i, &reserves.atomics())?;
        Ok(PooledCurrencies::from_atomics(&reserves.currency_list(), &amounts)?.into_vec())
    }
}
