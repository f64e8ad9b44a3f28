//! StableSwap (Curve style) invariant math for N-coin pools.
//!
//! # Invariant
//!
//! ```text
//! Ann · Σx + D = Ann · D + D^(n+1) / (n^n · Πx)
//! ```
//!
//! where `Ann = A · n` (the ledger stores `A` with `n^(n-1)` folded in) and
//! balances `x` are normalised to 18 decimals.
//!
//! # Swap algorithm
//!
//! 1. Normalise balances with per-coin rates.
//! 2. Solve `D` for the current balances (Newton).
//! 3. Add the input to its balance and solve for the output balance `y`
//!    that keeps `D` constant (Newton).
//! 4. `dy = x_j − y − 1`, then deduct `dy · fee / 10^10`.
//! 5. De-normalise.
//!
//! All steps use truncating `U256` arithmetic in the same order as the
//! ledger, so quotes match execution exactly.

use crate::error::{DomainError, DomainResult};
use crate::math::fixed::{abs_diff, pow10, ratio_to_decimal};
use crate::value_objects::fee_rate::FeeRate;
use primitive_types::U256;
use rust_decimal::Decimal;

/// Scale applied to the amplification coefficient.
pub const A_PRECISION: u128 = 100;

/// Maximum Newton iterations for both `D` and `y`.
pub const MAX_ITERATIONS: u32 = 255;

/// Decimals every balance is normalised to.
pub const POOL_TOKEN_COMMON_DECIMALS: u32 = 18;

/// Fixed-point unit of rates and virtual prices (`10^18`).
pub fn precision() -> U256 {
    U256::exp10(18)
}

fn overflow(what: &'static str) -> DomainError {
    DomainError::Overflow(what)
}

/// Rate of a plain coin with `decimals` places: `10^(18 − decimals) · 10^18`.
pub fn rate_for_decimals(decimals: u8) -> DomainResult<U256> {
    let decimals = u32::from(decimals);
    if decimals > POOL_TOKEN_COMMON_DECIMALS {
        return Err(DomainError::InvalidPoolStructure(format!(
            "stable pools support at most {POOL_TOKEN_COMMON_DECIMALS} decimals, got {decimals}"
        )));
    }
    pow10(POOL_TOKEN_COMMON_DECIMALS - decimals)?
        .checked_mul(precision())
        .ok_or(overflow("rate"))
}

/// Normalises raw balances: `x_i = balance_i · rate_i / 10^18`.
pub fn normalize(balances: &[U256], rates: &[U256]) -> DomainResult<Vec<U256>> {
    balances
        .iter()
        .zip(rates)
        .map(|(b, r)| {
            b.checked_mul(*r)
                .map(|v| v / precision())
                .ok_or(overflow("xp"))
        })
        .collect()
}

fn checked_sum(xp: &[U256]) -> DomainResult<U256> {
    xp.iter()
        .try_fold(U256::zero(), |acc, x| acc.checked_add(*x))
        .ok_or(overflow("sum"))
}

/// `D^(n+1) / (n^n · Πx)` computed step by step as the ledger does.
fn d_product(xp: &[U256], d: U256) -> DomainResult<U256> {
    let n = U256::from(xp.len());
    let mut d_p = d;
    for x in xp {
        let denominator = x.checked_mul(n).ok_or(overflow("D_P denominator"))?;
        if denominator.is_zero() {
            return Err(DomainError::DivisionByZero);
        }
        d_p = d_p.checked_mul(d).ok_or(overflow("D_P"))? / denominator;
    }
    Ok(d_p)
}

/// Computes the invariant `D` for normalised balances `xp`.
///
/// `amp` is the precise amplification (`A · A_PRECISION`).
///
/// # Errors
///
/// Returns [`DomainError::NonConvergence`] if Newton's method does not
/// settle within [`MAX_ITERATIONS`] steps.
pub fn compute_d(xp: &[U256], amp: U256) -> DomainResult<U256> {
    let sum = checked_sum(xp)?;
    if sum.is_zero() {
        return Ok(U256::zero());
    }

    let n = U256::from(xp.len());
    let a_precision = U256::from(A_PRECISION);
    let ann = amp.checked_mul(n).ok_or(overflow("Ann"))?;
    let ann_less_precision = ann
        .checked_sub(a_precision)
        .ok_or(DomainError::InvalidPoolStructure(
            "amplification coefficient too low".to_string(),
        ))?;

    let mut d = sum;
    for _ in 0..MAX_ITERATIONS {
        let d_p = d_product(xp, d)?;
        let prev = d;

        // (Ann·S/A_P + n·D_P) · D
        let numerator = ann
            .checked_mul(sum)
            .map(|v| v / a_precision)
            .and_then(|v| v.checked_add(d_p.checked_mul(n)?))
            .and_then(|v| v.checked_mul(d))
            .ok_or(overflow("D numerator"))?;
        // (Ann − A_P)·D/A_P + (n+1)·D_P
        let denominator = ann_less_precision
            .checked_mul(d)
            .map(|v| v / a_precision)
            .and_then(|v| v.checked_add(d_p.checked_mul(n + U256::one())?))
            .ok_or(overflow("D denominator"))?;
        if denominator.is_zero() {
            return Err(DomainError::DivisionByZero);
        }

        d = numerator / denominator;
        if abs_diff(d, prev) <= U256::one() {
            return Ok(d);
        }
    }

    Err(DomainError::NonConvergence("stable invariant D"))
}

/// Newton iteration `y ← (y² + c) / (2y + b − D)` starting at `y = D`.
fn solve_y(c: U256, b: U256, d: U256) -> DomainResult<U256> {
    let two = U256::from(2u8);
    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
        let prev = y;
        let numerator = y
            .checked_mul(y)
            .and_then(|v| v.checked_add(c))
            .ok_or(overflow("y numerator"))?;
        let denominator = y
            .checked_mul(two)
            .and_then(|v| v.checked_add(b))
            .ok_or(overflow("y denominator"))?
            .checked_sub(d)
            .ok_or(DomainError::Underflow("y denominator"))?;
        if denominator.is_zero() {
            return Err(DomainError::DivisionByZero);
        }
        y = numerator / denominator;
        if abs_diff(y, prev) <= U256::one() {
            return Ok(y);
        }
    }
    Err(DomainError::NonConvergence("stable balance y"))
}

/// Shared tail of [`compute_y`] and [`compute_y_d`]: folds the known balances
/// into `c` and `b` and solves for the remaining one.
fn y_from_known(known: &[U256], n: usize, amp: U256, d: U256) -> DomainResult<U256> {
    let n_u = U256::from(n);
    let a_precision = U256::from(A_PRECISION);
    let ann = amp.checked_mul(n_u).ok_or(overflow("Ann"))?;
    if ann.is_zero() {
        return Err(DomainError::DivisionByZero);
    }

    let mut c = d;
    let mut s = U256::zero();
    for x in known {
        s = s.checked_add(*x).ok_or(overflow("y sum"))?;
        let denominator = x.checked_mul(n_u).ok_or(overflow("c denominator"))?;
        if denominator.is_zero() {
            return Err(DomainError::DivisionByZero);
        }
        c = c.checked_mul(d).ok_or(overflow("c"))? / denominator;
    }
    // c = c · D · A_P / (Ann · n)
    c = c
        .checked_mul(d)
        .and_then(|v| v.checked_mul(a_precision))
        .ok_or(overflow("c"))?
        / ann.checked_mul(n_u).ok_or(overflow("Ann·n"))?;
    // b = S + D · A_P / Ann
    let b = d
        .checked_mul(a_precision)
        .map(|v| v / ann)
        .and_then(|v| v.checked_add(s))
        .ok_or(overflow("b"))?;

    solve_y(c, b, d)
}

/// Balance of coin `j` after coin `i`'s balance becomes `x`, keeping the
/// invariant of `xp` constant.
pub fn compute_y(amp: U256, i: usize, j: usize, x: U256, xp: &[U256]) -> DomainResult<U256> {
    let n = xp.len();
    if i == j || i >= n || j >= n {
        return Err(DomainError::InvalidAmount(format!(
            "invalid coin indices {i} -> {j} for {n} coins"
        )));
    }
    let d = compute_d(xp, amp)?;
    let known: Vec<U256> = xp
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != j)
        .map(|(k, v)| if k == i { x } else { *v })
        .collect();
    y_from_known(&known, n, amp, d)
}

/// Balance of coin `i` that yields invariant `d` with the other balances of `xp`.
pub fn compute_y_d(amp: U256, i: usize, xp: &[U256], d: U256) -> DomainResult<U256> {
    let n = xp.len();
    if i >= n {
        return Err(DomainError::InvalidAmount(format!(
            "invalid coin index {i} for {n} coins"
        )));
    }
    let known: Vec<U256> = xp
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != i)
        .map(|(_, v)| *v)
        .collect();
    y_from_known(&known, n, amp, d)
}

/// Snapshot of one StableSwap curve: raw balances with their rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableCurve {
    balances: Vec<U256>,
    rates: Vec<U256>,
    amp: U256,
    fee: FeeRate,
    total_supply: U256,
}

impl StableCurve {
    /// Creates a curve from raw balances, per-coin rates, the ledger's
    /// amplification coefficient `A` and the LP total supply.
    pub fn new(
        balances: Vec<U256>,
        rates: Vec<U256>,
        amplification: u128,
        fee: FeeRate,
        total_supply: U256,
    ) -> DomainResult<Self> {
        if balances.len() < 2 || balances.len() != rates.len() {
            return Err(DomainError::InvalidPoolStructure(format!(
                "stable curve needs matching balances and rates for 2+ coins, got {} and {}",
                balances.len(),
                rates.len()
            )));
        }
        if rates.iter().any(U256::is_zero) {
            return Err(DomainError::InvalidPoolStructure(
                "zero rate".to_string(),
            ));
        }
        if fee.is_total() {
            return Err(DomainError::InvalidPoolStructure(format!(
                "stable fee {}/{} must be below 100%",
                fee.numerator, fee.denominator
            )));
        }
        let amp = U256::from(amplification)
            .checked_mul(U256::from(A_PRECISION))
            .ok_or(overflow("amp"))?;
        Ok(Self {
            balances,
            rates,
            amp,
            fee,
            total_supply,
        })
    }

    #[must_use]
    pub fn coin_count(&self) -> usize {
        self.balances.len()
    }

    pub fn xp(&self) -> DomainResult<Vec<U256>> {
        normalize(&self.balances, &self.rates)
    }

    pub fn invariant(&self) -> DomainResult<U256> {
        compute_d(&self.xp()?, self.amp)
    }

    fn check_index(&self, i: usize) -> DomainResult<()> {
        if i >= self.coin_count() {
            return Err(DomainError::InvalidAmount(format!(
                "coin index {i} out of range"
            )));
        }
        Ok(())
    }

    /// Output of swapping `dx` of coin `i` for coin `j`, net of fee.
    pub fn swap_out(&self, i: usize, j: usize, dx: U256) -> DomainResult<U256> {
        self.check_index(i)?;
        self.check_index(j)?;
        if dx.is_zero() {
            return Ok(U256::zero());
        }
        let xp = self.xp()?;
        let x = dx
            .checked_mul(self.rates[i])
            .map(|v| v / precision())
            .and_then(|v| v.checked_add(xp[i]))
            .ok_or(overflow("swap x"))?;
        let y = compute_y(self.amp, i, j, x, &xp)?;

        let Some(dy) = xp[j]
            .checked_sub(y)
            .and_then(|v| v.checked_sub(U256::one()))
        else {
            return Ok(U256::zero());
        };
        let fee = dy
            .checked_mul(U256::from(self.fee.numerator))
            .ok_or(overflow("swap fee"))?
            / U256::from(self.fee.denominator);
        let out = dy
            .checked_sub(fee)
            .ok_or(DomainError::Underflow("swap fee"))?
            .checked_mul(precision())
            .ok_or(overflow("swap out"))?
            / self.rates[j];
        Ok(out)
    }

    /// LP tokens minted for depositing `amounts` (raw, in coin order):
    /// proportional to the relative growth of `D`.
    pub fn deposit_lp(&self, amounts: &[U256]) -> DomainResult<U256> {
        if amounts.len() != self.coin_count() {
            return Err(DomainError::ImbalancedInputCount {
                expected: self.coin_count(),
                found: amounts.len(),
            });
        }
        let new_balances = self
            .balances
            .iter()
            .zip(amounts)
            .map(|(b, a)| b.checked_add(*a).ok_or(overflow("deposit balance")))
            .collect::<DomainResult<Vec<_>>>()?;

        if self.total_supply.is_zero() {
            if new_balances.iter().any(U256::is_zero) {
                return Err(DomainError::InvalidAmount(
                    "initial deposit must include every currency".to_string(),
                ));
            }
            return compute_d(&normalize(&new_balances, &self.rates)?, self.amp);
        }
        if self.balances.iter().any(U256::is_zero) {
            return Err(DomainError::EmptyPool(
                "stable pool with supply but zero reserve".to_string(),
            ));
        }

        let d0 = self.invariant()?;
        let d1 = compute_d(&normalize(&new_balances, &self.rates)?, self.amp)?;
        if d1 <= d0 {
            return Ok(U256::zero());
        }
        Ok((d1 - d0)
            .checked_mul(self.total_supply)
            .ok_or(overflow("deposit lp"))?
            / d0)
    }

    /// Amount of coin `i` received for burning `lp_amount`, including the
    /// imbalance fee.
    pub fn withdraw_one(&self, lp_amount: U256, i: usize) -> DomainResult<U256> {
        self.check_index(i)?;
        if lp_amount.is_zero() {
            return Ok(U256::zero());
        }
        if lp_amount > self.total_supply {
            return Err(DomainError::InvalidAmount(
                "withdrawal exceeds LP supply".to_string(),
            ));
        }

        let n = self.coin_count();
        let xp = self.xp()?;
        let d0 = compute_d(&xp, self.amp)?;
        if d0.is_zero() {
            return Err(DomainError::EmptyPool("stable pool".to_string()));
        }
        let d1 = d0
            - lp_amount
                .checked_mul(d0)
                .ok_or(overflow("withdraw d1"))?
                / self.total_supply;
        let new_y = compute_y_d(self.amp, i, &xp, d1)?;

        // fee · n / (4 · (n − 1)), over the fee denominator
        let fee_per_token = U256::from(self.fee.numerator) * U256::from(n)
            / U256::from(4 * (n as u128 - 1));
        let fee_denominator = U256::from(self.fee.denominator);

        let mut xp_reduced = xp.clone();
        for (k, x) in xp.iter().enumerate() {
            let scaled = x.checked_mul(d1).ok_or(overflow("withdraw xp"))? / d0;
            let dx_expected = if k == i {
                scaled.saturating_sub(new_y)
            } else {
                x.saturating_sub(scaled)
            };
            let fee = fee_per_token
                .checked_mul(dx_expected)
                .ok_or(overflow("withdraw fee"))?
                / fee_denominator;
            xp_reduced[k] = xp_reduced[k].saturating_sub(fee);
        }

        let y_reduced = compute_y_d(self.amp, i, &xp_reduced, d1)?;
        let dy = xp_reduced[i].saturating_sub(y_reduced).saturating_sub(U256::one());
        Ok(dy.checked_mul(precision()).ok_or(overflow("withdraw out"))? / self.rates[i])
    }

    /// Value of one LP token in normalised units, scaled by `10^18`.
    pub fn virtual_price(&self) -> DomainResult<U256> {
        if self.total_supply.is_zero() {
            return Ok(U256::zero());
        }
        self.invariant()?
            .checked_mul(precision())
            .map(|v| v / self.total_supply)
            .ok_or(overflow("virtual price"))
    }

    /// Marginal (fee-free) rate of coin `j` received per atomic unit of coin
    /// `i`, in atomic units.
    pub fn spot_rate(&self, i: usize, j: usize) -> DomainResult<Decimal> {
        self.check_index(i)?;
        self.check_index(j)?;
        let xp = self.xp()?;
        let d = compute_d(&xp, self.amp)?;
        let d_p = d_product(&xp, d)?;
        let ann = self.amp * U256::from(self.coin_count());
        let a_precision = U256::from(A_PRECISION);

        // (Ann·x_i + A_P·D_P)·x_j / ((Ann·x_j + A_P·D_P)·x_i)
        let numerator = ann
            .checked_mul(xp[i])
            .and_then(|v| v.checked_add(a_precision.checked_mul(d_p)?))
            .and_then(|v| v.checked_mul(xp[j]))
            .ok_or(overflow("spot numerator"))?;
        let denominator = ann
            .checked_mul(xp[j])
            .and_then(|v| v.checked_add(a_precision.checked_mul(d_p)?))
            .and_then(|v| v.checked_mul(xp[i]))
            .ok_or(overflow("spot denominator"))?;

        let normalised = ratio_to_decimal(numerator, denominator)?;
        let rates = ratio_to_decimal(self.rates[i], self.rates[j])?;
        normalised
            .checked_mul(rates)
            .ok_or(overflow("spot rate"))
    }

    /// Marginal LP tokens minted per atomic unit of coin `i` deposited.
    pub fn lp_per_coin_rate(&self, i: usize) -> DomainResult<Decimal> {
        self.check_index(i)?;
        let xp = self.xp()?;
        let d = compute_d(&xp, self.amp)?;
        let d_p = d_product(&xp, d)?;
        let n = U256::from(self.coin_count());
        let ann = self.amp * n;
        let a_precision = U256::from(A_PRECISION);

        // dD/dx_i · supply / D
        //   = supply · (Ann·x_i + A_P·D_P) / (x_i · ((Ann − A_P)·D + A_P·(n+1)·D_P))
        let numerator = ann
            .checked_mul(xp[i])
            .and_then(|v| v.checked_add(a_precision.checked_mul(d_p)?))
            .and_then(|v| v.checked_mul(self.total_supply))
            .ok_or(overflow("lp rate numerator"))?;
        let denominator = ann
            .checked_sub(a_precision)
            .and_then(|v| v.checked_mul(d))
            .and_then(|v| {
                let tail = a_precision
                    .checked_mul(n + U256::one())?
                    .checked_mul(d_p)?;
                v.checked_add(tail)
            })
            .and_then(|v| v.checked_mul(xp[i]))
            .ok_or(overflow("lp rate denominator"))?;

        let per_xp = ratio_to_decimal(numerator, denominator)?;
        let rate = ratio_to_decimal(self.rates[i], precision())?;
        per_xp.checked_mul(rate).ok_or(overflow("lp rate"))
    }
}
