use crate::entities::currency::Currency;
use crate::error::{DomainError, DomainResult};
use crate::math::fixed::shift_decimal;
use crate::math::liquidity::{proportional_amounts, proportional_withdrawal};
use crate::math::stable_swap::{StableCurve, rate_for_decimals};
use crate::value_objects::pooled_currencies::align_amounts;
use crate::value_objects::{FeeRate, MonetaryAmount, PooledCurrencies, Price};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// N-currency StableSwap pool snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableLiquidityPool {
    /// On-chain pool id.
    pub pool_id: u32,
    /// LP token of the pool.
    pub lp_token: Currency,
    /// Reserves in on-chain coin order.
    pub pooled_currencies: PooledCurrencies,
    /// Amplification coefficient `A` as stored on chain.
    pub amplification: u128,
    /// Trading fee (`/10_000_000_000`).
    pub trading_fee: FeeRate,
    /// LP token total supply.
    pub total_supply: MonetaryAmount,
}

impl StableLiquidityPool {
    pub fn new(
        pool_id: u32,
        lp_token: Currency,
        pooled_currencies: PooledCurrencies,
        amplification: u128,
        trading_fee: FeeRate,
        total_supply: U256,
    ) -> DomainResult<Self> {
        if pooled_currencies.len() < 2 {
            return Err(DomainError::InvalidPoolStructure(format!(
                "stable pool {pool_id} must hold at least 2 currencies"
            )));
        }
        if trading_fee.is_total() {
            return Err(DomainError::InvalidPoolStructure(format!(
                "stable pool {pool_id} fee {}/{} must be below 100%",
                trading_fee.numerator, trading_fee.denominator
            )));
        }
        if let Some(id) = lp_token.stable_pool_id()
            && id != pool_id
        {
            return Err(DomainError::InvalidPoolStructure(format!(
                "LP token of pool {id} attached to pool {pool_id}"
            )));
        }
        Ok(Self {
            pool_id,
            total_supply: MonetaryAmount::new(lp_token.clone(), total_supply),
            lp_token,
            pooled_currencies,
            amplification,
            trading_fee,
        })
    }

    /// A pool is empty when any reserve is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pooled_currencies.has_zero_reserve()
    }

    #[must_use]
    pub fn contains(&self, currency: &Currency) -> bool {
        self.pooled_currencies.contains(currency)
    }

    pub(crate) fn index_of(&self, currency: &Currency) -> DomainResult<usize> {
        self.pooled_currencies
            .position_of(currency)
            .ok_or_else(|| DomainError::mismatch(self.pooled_currencies.describe(), currency))
    }

    /// Plain decimal-normalisation rates, one per coin.
    pub fn rates(&self) -> DomainResult<Vec<U256>> {
        self.pooled_currencies
            .currencies()
            .map(|c| rate_for_decimals(c.decimals))
            .collect()
    }

    /// Curve over the pool's reserves with the given per-coin rates.
    pub(crate) fn curve_with_rates(&self, rates: Vec<U256>) -> DomainResult<StableCurve> {
        StableCurve::new(
            self.pooled_currencies.atomics(),
            rates,
            self.amplification,
            self.trading_fee,
            self.total_supply.atomic(),
        )
    }

    pub fn curve(&self) -> DomainResult<StableCurve> {
        self.curve_with_rates(self.rates()?)
    }

    /// Value of one LP token in normalised units, scaled by `10^18`.
    pub fn virtual_price(&self) -> DomainResult<U256> {
        self.curve()?.virtual_price()
    }

    /// Amount of `output` received for `input`, net of fee.
    pub fn output_amount(
        &self,
        input: &MonetaryAmount,
        output: &Currency,
    ) -> DomainResult<MonetaryAmount> {
        let i = self.index_of(input.currency())?;
        let j = self.index_of(output)?;
        let out = self.curve()?.swap_out(i, j, input.atomic())?;
        Ok(MonetaryAmount::new(output.clone(), out))
    }

    /// Marginal price of `input` in units of `output`, fee excluded.
    pub fn spot_price(&self, input: &Currency, output: &Currency) -> DomainResult<Price> {
        let i = self.index_of(input)?;
        let j = self.index_of(output)?;
        let atomic = self.curve()?.spot_rate(i, j)?;
        let exp = i32::from(input.decimals) - i32::from(output.decimals);
        Ok(Price::new(shift_decimal(atomic, exp)?))
    }

    /// Marginal LP tokens (atomic) minted per atomic unit of `currency`.
    pub fn lp_per_coin_rate(&self, currency: &Currency) -> DomainResult<Decimal> {
        let i = self.index_of(currency)?;
        self.curve()?.lp_per_coin_rate(i)
    }

    /// LP tokens minted for depositing raw `amounts` given in coin order.
    pub(crate) fn deposit_lp_raw(&self, amounts: &[U256]) -> DomainResult<MonetaryAmount> {
        let minted = self.curve()?.deposit_lp(amounts)?;
        Ok(self.total_supply.with_atomic(minted))
    }

    /// LP tokens minted for depositing `amounts`, one per pooled currency in
    /// any order.
    pub fn deposit_lp_token_amount(
        &self,
        amounts: &[MonetaryAmount],
    ) -> DomainResult<MonetaryAmount> {
        let atomics = align_amounts(&self.pooled_currencies.currency_list(), amounts, false)?;
        self.deposit_lp_raw(&atomics)
    }

    /// LP tokens minted for a single-sided deposit of `amount`.
    pub fn single_deposit_lp(&self, amount: &MonetaryAmount) -> DomainResult<MonetaryAmount> {
        let i = self.index_of(amount.currency())?;
        let mut atomics = vec![U256::zero(); self.pooled_currencies.len()];
        atomics[i] = amount.atomic();
        self.deposit_lp_raw(&atomics)
    }

    /// Proportional share of every reserve for burning `lp_amount`.
    pub fn withdrawal_amounts(&self, lp_amount: &MonetaryAmount) -> DomainResult<PooledCurrencies> {
        lp_amount.ensure_same_currency(&self.lp_token)?;
        let shares = proportional_withdrawal(
            lp_amount.atomic(),
            &self.pooled_currencies.atomics(),
            self.total_supply.atomic(),
        )?;
        PooledCurrencies::from_atomics(&self.pooled_currencies.currency_list(), &shares)
    }

    /// Amount of `output` received for burning `lp_amount` single-sided.
    pub fn withdraw_one_coin(
        &self,
        lp_amount: &MonetaryAmount,
        output: &Currency,
    ) -> DomainResult<MonetaryAmount> {
        lp_amount.ensure_same_currency(&self.lp_token)?;
        let i = self.index_of(output)?;
        let out = self.curve()?.withdraw_one(lp_amount.atomic(), i)?;
        Ok(MonetaryAmount::new(output.clone(), out))
    }

    /// Amounts of every pooled currency matching `amount` at the current
    /// reserve ratio.
    pub fn deposit_input_amounts(
        &self,
        amount: &MonetaryAmount,
    ) -> DomainResult<Vec<MonetaryAmount>> {
        let i = self.index_of(amount.currency())?;
        let amounts = proportional_amounts(amount.atomic(), i, &self.pooled_currencies.atomics())?;
        let currencies = self.pooled_currencies.currency_list();
        Ok(PooledCurrencies::from_atomics(&currencies, &amounts)?.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::currency::CurrencyId;
    use rust_decimal_macros::dec;

    fn usdt() -> Currency {
        Currency::new(CurrencyId::ForeignAsset(1), "USDT", 6)
    }

    fn usdc() -> Currency {
        Currency::new(CurrencyId::ForeignAsset(2), "USDC", 6)
    }

    fn dai() -> Currency {
        Currency::new(CurrencyId::ForeignAsset(3), "DAI", 18)
    }

    fn pool() -> StableLiquidityPool {
        let e18 = U256::exp10(18);
        let pooled = PooledCurrencies::from_atomics(
            &[usdt(), usdc(), dai()],
            &[
                U256::from(1_000_000_000_000u64),
                U256::from(1_000_000_000_000u64),
                e18 * U256::from(1_000_000u64),
            ],
        )
        .unwrap();
        let lp = Currency::new(CurrencyId::StableLpToken(0), "LP stable 0", 18);
        StableLiquidityPool::new(
            0,
            lp,
            pooled,
            200,
            FeeRate::stable(4_000_000),
            e18 * U256::from(3_000_000u64),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_fee_above_denominator() {
        let pooled = PooledCurrencies::from_atomics(
            &[usdt(), usdc()],
            &[U256::from(1_000_000_000u64), U256::from(1_000_000_000u64)],
        )
        .unwrap();
        let lp = Currency::new(CurrencyId::StableLpToken(1), "LP stable 1", 18);
        let err = StableLiquidityPool::new(
            1,
            lp,
            pooled,
            100,
            FeeRate::stable(20_000_000_000),
            U256::exp10(21),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPoolStructure(_)));
    }

    #[test]
    fn test_swap_near_parity() {
        let p = pool();
        let out = p
            .output_amount(&MonetaryAmount::new(usdt(), 1_000_000u64), &dai())
            .unwrap();
        let value = out.to_decimal().unwrap();
        assert!(value < dec!(1));
        assert!(value > dec!(0.999));
    }

    #[test]
    fn test_spot_price_in_whole_units() {
        let p = pool();
        let price = p.spot_price(&usdt(), &dai()).unwrap();
        assert!((price.value - dec!(1)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_deposit_by_membership() {
        let p = pool();
        let amounts = [
            MonetaryAmount::new(dai(), U256::exp10(18) * U256::from(10u64)),
            MonetaryAmount::new(usdt(), 10_000_000u64),
            MonetaryAmount::new(usdc(), 10_000_000u64),
        ];
        let lp = p.deposit_lp_token_amount(&amounts).unwrap();
        // 30 units into a balanced 3M pool whose supply equals D
        let minted = lp.to_decimal().unwrap();
        assert!((minted - dec!(30)).abs() < dec!(0.0001));

        assert!(matches!(
            p.deposit_lp_token_amount(&amounts[..2]),
            Err(DomainError::ImbalancedInputCount { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_withdrawal_is_proportional() {
        let p = pool();
        let lp = p.total_supply.with_atomic(U256::exp10(18) * U256::from(30_000u64));
        let out = p.withdrawal_amounts(&lp).unwrap();
        assert_eq!(out.get(0).unwrap().atomic(), U256::from(10_000_000_000u64));
        assert_eq!(out.get(2).unwrap().to_decimal().unwrap(), dec!(10000));
    }

    #[test]
    fn test_lp_token_pool_id_checked() {
        let pooled = pool().pooled_currencies;
        let lp = Currency::new(CurrencyId::StableLpToken(9), "LP", 18);
        assert!(matches!(
            StableLiquidityPool::new(0, lp, pooled, 200, FeeRate::stable(0), U256::zero()),
            Err(DomainError::InvalidPoolStructure(_))
        ));
    }

    #[test]
    fn test_virtual_price_near_one() {
        let p = pool();
        let vp = p.virtual_price().unwrap();
        let diff = if vp > U256::exp10(18) { vp - U256::exp10(18) } else { U256::exp10(18) - vp };
        assert!(diff <= U256::from(1_000u64));
    }
}
