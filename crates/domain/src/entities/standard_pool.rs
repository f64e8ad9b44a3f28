use crate::entities::currency::Currency;
use crate::enums::PairStatus;
use crate::error::{DomainError, DomainResult};
use crate::math::constant_product::{
    calculate_in_amount, calculate_out_amount, calculate_spot_price,
};
use crate::math::fixed::shift_decimal;
use crate::math::liquidity::{proportional_amounts, proportional_withdrawal, standard_deposit_lp};
use crate::value_objects::pooled_currencies::align_amounts;
use crate::value_objects::{FeeRate, MonetaryAmount, PooledCurrencies, Price};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Two-currency constant-product pool snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardLiquidityPool {
    /// LP token of the pair.
    pub lp_token: Currency,
    pub token0: Currency,
    pub token1: Currency,
    /// Reserves of `token0` and `token1`, in that order.
    pub pooled_currencies: PooledCurrencies,
    /// Trading fee (`/10_000`).
    pub trading_fee: FeeRate,
    /// LP token total supply.
    pub total_supply: MonetaryAmount,
    /// `false` while the pair is bootstrapping or disabled.
    pub is_trading_active: bool,
    /// Farming rewards paid to the pair per year.
    pub yearly_rewards: Vec<MonetaryAmount>,
}

impl StandardLiquidityPool {
    pub fn new(
        lp_token: Currency,
        pooled_currencies: PooledCurrencies,
        trading_fee: FeeRate,
        total_supply: U256,
        status: PairStatus,
        yearly_rewards: Vec<MonetaryAmount>,
    ) -> DomainResult<Self> {
        let (Some(reserve0), Some(reserve1), 2) = (
            pooled_currencies.get(0),
            pooled_currencies.get(1),
            pooled_currencies.len(),
        ) else {
            return Err(DomainError::InvalidPoolStructure(format!(
                "standard pool {lp_token} must hold exactly 2 currencies, got {}",
                pooled_currencies.len()
            )));
        };
        if let Some((a, b)) = lp_token.lp_components()
            && (a != &reserve0.currency().id || b != &reserve1.currency().id)
        {
            return Err(DomainError::InvalidPoolStructure(format!(
                "LP token {lp_token} does not match pooled currencies {}",
                pooled_currencies.describe()
            )));
        }

        Ok(Self {
            token0: reserve0.currency().clone(),
            token1: reserve1.currency().clone(),
            total_supply: MonetaryAmount::new(lp_token.clone(), total_supply),
            lp_token,
            pooled_currencies,
            trading_fee,
            is_trading_active: status == PairStatus::Trading,
            yearly_rewards,
        })
    }

    /// A pool is empty when either reserve is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pooled_currencies.has_zero_reserve()
    }

    /// Whether the pool holds `currency`.
    #[must_use]
    pub fn contains(&self, currency: &Currency) -> bool {
        self.pooled_currencies.contains(currency)
    }

    /// `(reserve_in, reserve_out)` for a trade between the two currencies.
    fn reserves(&self, input: &Currency, output: &Currency) -> DomainResult<(U256, U256)> {
        let reserve_in = self.pooled_currencies.amount_of(input)?;
        let reserve_out = self.pooled_currencies.amount_of(output)?;
        if input == output {
            return Err(DomainError::mismatch(self.pooled_currencies.describe(), output));
        }
        Ok((reserve_in.atomic(), reserve_out.atomic()))
    }

    /// Amount of `output` received for `input`, truncated like the ledger.
    pub fn output_amount(
        &self,
        input: &MonetaryAmount,
        output: &Currency,
    ) -> DomainResult<MonetaryAmount> {
        let (reserve_in, reserve_out) = self.reserves(input.currency(), output)?;
        let out = calculate_out_amount(input.atomic(), reserve_in, reserve_out, self.trading_fee)?;
        Ok(MonetaryAmount::new(output.clone(), out))
    }

    /// Amount of `input_currency` needed to receive `output`, rounded up.
    pub fn input_amount(
        &self,
        output: &MonetaryAmount,
        input_currency: &Currency,
    ) -> DomainResult<MonetaryAmount> {
        let (reserve_in, reserve_out) = self.reserves(input_currency, output.currency())?;
        let needed =
            calculate_in_amount(output.atomic(), reserve_in, reserve_out, self.trading_fee)?;
        Ok(MonetaryAmount::new(input_currency.clone(), needed))
    }

    /// Marginal price of `input` in units of `output`, fee excluded.
    pub fn spot_price(&self, input: &Currency, output: &Currency) -> DomainResult<Price> {
        let (reserve_in, reserve_out) = self.reserves(input, output)?;
        if reserve_in.is_zero() {
            return Err(DomainError::EmptyPool(self.lp_token.to_string()));
        }
        let atomic = calculate_spot_price(reserve_in, reserve_out)?;
        let exp = i32::from(input.decimals) - i32::from(output.decimals);
        Ok(Price::new(shift_decimal(atomic, exp)?))
    }

    /// LP tokens minted for depositing `amounts`, given as `[token0, token1]`.
    pub fn deposit_lp_token_amount(
        &self,
        amounts: &[MonetaryAmount],
    ) -> DomainResult<MonetaryAmount> {
        let atomics = align_amounts(&self.pooled_currencies.currency_list(), amounts, true)?;
        let reserves = self.pooled_currencies.atomics();
        let minted = standard_deposit_lp(
            [atomics[0], atomics[1]],
            [reserves[0], reserves[1]],
            self.total_supply.atomic(),
        )?;
        Ok(self.total_supply.with_atomic(minted))
    }

    /// Proportional share of both reserves for burning `lp_amount`.
    pub fn withdrawal_amounts(&self, lp_amount: &MonetaryAmount) -> DomainResult<PooledCurrencies> {
        lp_amount.ensure_same_currency(&self.lp_token)?;
        let shares = proportional_withdrawal(
            lp_amount.atomic(),
            &self.pooled_currencies.atomics(),
            self.total_supply.atomic(),
        )?;
        PooledCurrencies::from_atomics(&self.pooled_currencies.currency_list(), &shares)
    }

    /// Both deposit amounts matching `amount` at the current reserve ratio.
    pub fn deposit_input_amounts(
        &self,
        amount: &MonetaryAmount,
    ) -> DomainResult<Vec<MonetaryAmount>> {
        let index = self
            .pooled_currencies
            .position_of(amount.currency())
            .ok_or_else(|| {
                DomainError::mismatch(self.pooled_currencies.describe(), amount.currency())
            })?;
        let amounts =
            proportional_amounts(amount.atomic(), index, &self.pooled_currencies.atomics())?;
        let currencies = self.pooled_currencies.currency_list();
        Ok(PooledCurrencies::from_atomics(&currencies, &amounts)?.into_vec())
    }
}
