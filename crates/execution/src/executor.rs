//! Builds unsigned bundles from trades and liquidity intents.

use crate::bundle::{
    DepositBundle, RewardClaim, RewardClaimBundle, RouteSegment, SwapBundle, WithdrawBundle,
};
use crate::config::ExecutorConfig;
use crate::error::{ExecutionError, ExecutionResult};
use bridge_amm_domain::prelude::*;
use bridge_amm_domain::value_objects::pooled_currencies::align_amounts;
use bridge_amm_routing::trade::Trade;
use primitive_types::U256;
use tracing::{debug, info};

/// Reward currently claimable by the account for one LP token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimableReward {
    pub lp_token: Currency,
    pub reward: MonetaryAmount,
}

/// Turns trades and liquidity intents into transaction bundles.
///
/// The executor is a pure transform: it validates currencies and amounts,
/// derives slippage minimums and never talks to the ledger.
#[derive(Debug, Clone, Default)]
pub struct TradeExecutor {
    config: ExecutorConfig,
}

fn ensure_recipient(recipient: &str) -> ExecutionResult<()> {
    if recipient.trim().is_empty() {
        return Err(ExecutionError::MissingRecipient);
    }
    Ok(())
}

fn ensure_positive(amount: &MonetaryAmount, what: &str) -> ExecutionResult<()> {
    if amount.is_zero() {
        return Err(ExecutionError::NonPositiveAmount(format!("{what} ({})", amount.currency())));
    }
    Ok(())
}

fn minimums(amounts: &[MonetaryAmount], slippage: &Percentage) -> ExecutionResult<Vec<U256>> {
    amounts
        .iter()
        .map(|a| -> ExecutionResult<U256> { Ok(slippage.apply_min(a)?.atomic()) })
        .collect()
}

fn atomics(amounts: &[MonetaryAmount]) -> Vec<U256> {
    amounts.iter().map(MonetaryAmount::atomic).collect()
}

impl TradeExecutor {
    #[must_use]
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Swap bundle for `trade`, accepting no less than `minimum_output`.
    ///
    /// All-standard trades become a plain path swap; anything touching a
    /// stable pool goes through the router.
    pub fn swap(
        &self,
        trade: &Trade,
        minimum_output: &MonetaryAmount,
        recipient: &str,
        deadline: u64,
    ) -> ExecutionResult<SwapBundle> {
        ensure_recipient(recipient)?;
        minimum_output.ensure_same_currency(trade.output_amount().currency())?;
        ensure_positive(trade.input_amount(), "swap input")?;
        ensure_positive(minimum_output, "minimum output")?;

        let amount_in = trade.input_amount().atomic();
        let amount_out_min = minimum_output.atomic();
        let recipient = recipient.to_string();
        let bundle = if trade.involves_stable_pool() {
            SwapBundle::Router {
                amount_in,
                amount_out_min,
                routes: RouteSegment::from_path(trade.path()),
                recipient,
                deadline,
            }
        } else {
            SwapBundle::StandardOnly {
                amount_in,
                amount_out_min,
                path: trade.currency_path().into_iter().map(|c| c.id.clone()).collect(),
                recipient,
                deadline,
            }
        };

        info!(
            input = %trade.input_amount(),
            output = %trade.output_amount(),
            min_out = %minimum_output,
            hops = trade.hop_count(),
            router = trade.involves_stable_pool(),
            "Swap bundle built"
        );
        Ok(bundle)
    }

    /// Swap bundle with the minimum output derived from `slippage` (or the
    /// configured default).
    pub fn swap_with_slippage(
        &self,
        trade: &Trade,
        slippage: Option<Percentage>,
        recipient: &str,
        deadline: u64,
    ) -> ExecutionResult<SwapBundle> {
        let slippage = self.config.slippage_or_default(slippage);
        let minimum_output = trade.minimum_output_amount(&slippage)?;
        self.swap(trade, &minimum_output, recipient, deadline)
    }

    /// Deposit bundle for `amounts` into `pool`.
    ///
    /// Standard pools take both currencies in pool order. Stable pools take
    /// every pooled currency in any order; meta pools every involved one.
    pub fn deposit(
        &self,
        pool: &LiquidityPool,
        amounts: &[MonetaryAmount],
        slippage: Option<Percentage>,
        recipient: &str,
        deadline: u64,
    ) -> ExecutionResult<DepositBundle> {
        ensure_recipient(recipient)?;
        let slippage = self.config.slippage_or_default(slippage);
        let recipient = recipient.to_string();

        let bundle = match pool {
            LiquidityPool::Standard(p) => {
                let desired = align_amounts(&p.pooled_currencies.currency_list(), amounts, true)?;
                for amount in amounts {
                    ensure_positive(amount, "deposit amount")?;
                }
                let mins = minimums(amounts, &slippage)?;
                DepositBundle::Standard {
                    asset0: p.token0.id.clone(),
                    asset1: p.token1.id.clone(),
                    amount0_desired: desired[0],
                    amount1_desired: desired[1],
                    amount0_min: mins[0],
                    amount1_min: mins[1],
                    deadline,
                }
            }
            LiquidityPool::Stable(p) => {
                let ordered = align_amounts(&p.pooled_currencies.currency_list(), amounts, false)?;
                if ordered.iter().all(U256::is_zero) {
                    return Err(ExecutionError::NonPositiveAmount("deposit amounts".to_string()));
                }
                let minted = p.deposit_lp_token_amount(amounts)?;
                DepositBundle::Stable {
                    pool_id: p.pool_id,
                    amounts: ordered,
                    min_lp_out: slippage.apply_min(&minted)?.atomic(),
                    recipient,
                    deadline,
                }
            }
            LiquidityPool::StableMeta(p) => {
                let (meta, base) = p.split_amounts(amounts)?;
                if meta.iter().chain(&base).all(MonetaryAmount::is_zero) {
                    return Err(ExecutionError::NonPositiveAmount("deposit amounts".to_string()));
                }
                let minted = p.deposit_lp_token_amount(amounts)?;
                DepositBundle::Meta {
                    pool_id: p.pool_id(),
                    base_pool_id: p.base_pool_id(),
                    meta_amounts: atomics(&meta),
                    base_amounts: atomics(&base),
                    min_lp_out: slippage.apply_min(&minted)?.atomic(),
                    recipient,
                    deadline,
                }
            }
        };

        info!(pool = %pool, amounts = amounts.len(), "Deposit bundle built");
        Ok(bundle)
    }

    /// Withdrawal bundle burning `lp_amount` of `pool`'s LP token.
    pub fn withdraw(
        &self,
        pool: &LiquidityPool,
        lp_amount: &MonetaryAmount,
        slippage: Option<Percentage>,
        recipient: &str,
        deadline: u64,
    ) -> ExecutionResult<WithdrawBundle> {
        ensure_recipient(recipient)?;
        lp_amount.ensure_same_currency(pool.lp_token())?;
        ensure_positive(lp_amount, "LP amount")?;
        if lp_amount.atomic() > pool.total_supply().atomic() {
            return Err(DomainError::InsufficientLiquidity.into());
        }
        let slippage = self.config.slippage_or_default(slippage);
        let recipient = recipient.to_string();
        let lp = lp_amount.atomic();

        let bundle = match pool {
            LiquidityPool::Standard(p) => {
                let out = p.withdrawal_amounts(lp_amount)?;
                let mins = minimums(out.as_slice(), &slippage)?;
                WithdrawBundle::Standard {
                    asset0: p.token0.id.clone(),
                    asset1: p.token1.id.clone(),
                    lp_amount: lp,
                    amount0_min: mins[0],
                    amount1_min: mins[1],
                    recipient,
                    deadline,
                }
            }
            LiquidityPool::Stable(p) => {
                let out = p.withdrawal_amounts(lp_amount)?;
                WithdrawBundle::Stable {
                    pool_id: p.pool_id,
                    lp_amount: lp,
                    min_amounts: minimums(out.as_slice(), &slippage)?,
                    recipient,
                    deadline,
                }
            }
            LiquidityPool::StableMeta(p) => {
                let out = p.withdrawal_amounts(lp_amount)?;
                let (meta, base) = p.split_amounts(out.as_slice())?;
                WithdrawBundle::Meta {
                    pool_id: p.pool_id(),
                    base_pool_id: p.base_pool_id(),
                    lp_amount: lp,
                    meta_min_amounts: minimums(&meta, &slippage)?,
                    base_min_amounts: minimums(&base, &slippage)?,
                    recipient,
                    deadline,
                }
            }
        };

        info!(pool = %pool, lp_amount = %lp_amount, "Withdrawal bundle built");
        Ok(bundle)
    }

    /// Claim bundle for every strictly positive claimable reward.
    #[must_use]
    pub fn claim_rewards(&self, claimable: &[ClaimableReward]) -> RewardClaimBundle {
        let claims: Vec<RewardClaim> = claimable
            .iter()
            .filter(|c| !c.reward.is_zero())
            .map(|c| RewardClaim {
                lp_token: c.lp_token.id.clone(),
                reward_currency: c.reward.currency().id.clone(),
                amount: c.reward.atomic(),
            })
            .collect();
        debug!(
            offered = claimable.len(),
            claims = claims.len(),
            "Reward claim bundle built"
        );
        RewardClaimBundle { claims }
    }
}
