//! Command Line Interface for the bridge AMM: inspect pools, quote trades
//! and print unsigned transaction bundles.
use anyhow::{Context, Result, anyhow, bail};
use bridge_amm_domain::prelude::*;
use bridge_amm_execution::prelude::*;
use bridge_amm_protocols::prelude::*;
use bridge_amm_routing::prelude::*;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rust_decimal::Decimal;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SNAPSHOT: &str = "demos/snapshot.json";

#[derive(Parser)]
#[command(name = "amm-cli")]
#[command(about = "Bridge AMM pool inspector, router and bundle builder", long_about = None)]
struct Cli {
    /// Snapshot file (falls back to AMM_SNAPSHOT, then demos/snapshot.json)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every pool of the snapshot
    Pools,
    /// Find the best trade without building a bundle
    Quote {
        /// Input currency ticker
        #[arg(long)]
        from: String,

        /// Output currency ticker
        #[arg(long)]
        to: String,

        /// Input amount in whole units (e.g. 0.5)
        #[arg(long)]
        amount: Decimal,

        /// Maximum number of hops (1-4)
        #[arg(long, default_value_t = MAX_HOPS)]
        max_hops: usize,
    },
    /// Build a swap bundle for the best trade
    Swap {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long)]
        amount: Decimal,

        /// Slippage tolerance in percent
        #[arg(long)]
        slippage: Option<Decimal>,

        /// Recipient account (falls back to AMM_RECIPIENT)
        #[arg(long)]
        recipient: Option<String>,
    },
    /// Build a deposit bundle
    Deposit {
        /// LP token ticker of the pool (e.g. "LP KSM-USDT")
        #[arg(long)]
        pool: String,

        /// Deposit amount as TICKER:VALUE; give one to deposit at the pool ratio
        #[arg(long = "amount", value_parser = parse_amount, required = true)]
        amounts: Vec<(String, Decimal)>,

        #[arg(long)]
        slippage: Option<Decimal>,

        #[arg(long)]
        recipient: Option<String>,
    },
    /// Build a withdrawal bundle
    Withdraw {
        #[arg(long)]
        pool: String,

        /// LP tokens to burn, in whole units
        #[arg(long)]
        lp: Decimal,

        #[arg(long)]
        slippage: Option<Decimal>,

        #[arg(long)]
        recipient: Option<String>,
    },
}

fn parse_amount(raw: &str) -> Result<(String, Decimal), String> {
    let (ticker, value) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected TICKER:VALUE, got {raw:?}"))?;
    let value = value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount {value:?}: {e}"))?;
    Ok((ticker.trim().to_string(), value))
}

fn currency(snapshot: &PoolSnapshot, ticker: &str) -> Result<Currency> {
    snapshot
        .currency_by_ticker(ticker)
        .ok_or_else(|| anyhow!("unknown currency {ticker}"))
}

fn pool<'a>(snapshot: &'a PoolSnapshot, lp_ticker: &str) -> Result<&'a LiquidityPool> {
    let lp = currency(snapshot, lp_ticker)?;
    snapshot
        .pool_by_lp(&lp.id)
        .ok_or_else(|| anyhow!("{lp_ticker} is not the LP token of any pool"))
}

fn recipient(explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| env::var("AMM_RECIPIENT").ok())
        .context("recipient missing: pass --recipient or set AMM_RECIPIENT")
}

fn slippage(value: Option<Decimal>) -> Result<Option<Percentage>> {
    Ok(value.map(Percentage::new).transpose()?)
}

fn deadline(executor: &TradeExecutor) -> u64 {
    let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
    executor.config().deadline_from(now)
}

fn print_bundle(bundle: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}

fn best_trade(
    snapshot: &PoolSnapshot,
    from: &str,
    to: &str,
    amount: Decimal,
    config: RoutingConfig,
) -> Result<Trade> {
    let input = MonetaryAmount::from_decimal(currency(snapshot, from)?, amount)?;
    let output = currency(snapshot, to)?;
    RouteFinder::new(&snapshot.pools, config)
        .find_best_trade(&input, &output)
        .ok_or_else(|| anyhow!("no trade from {from} to {to} for {amount}"))
}

fn print_trade(trade: &Trade) -> Result<()> {
    let path: Vec<&str> = trade.currency_path().iter().map(|c| c.ticker.as_str()).collect();
    println!("Route:           {}", path.join(" -> "));
    println!("Input:           {}", trade.input_amount());
    println!("Output:          {}", trade.output_amount());
    println!("Execution price: {}", trade.execution_price()?.value);
    println!("Price impact:    {}%", trade.price_impact());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let path = cli
        .snapshot
        .or_else(|| env::var("AMM_SNAPSHOT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));

    let loader = JsonSnapshotLoader::new(&path);
    let registry = loader.registry().await?;
    let snapshot = load_pools(&loader, &registry)
        .await
        .with_context(|| format!("loading pools from {}", path.display()))?;
    info!(path = %path.display(), block = snapshot.block_number, "Snapshot loaded");

    let executor = TradeExecutor::default();

    match cli.command {
        Commands::Pools => {
            println!("Block {} ({})", snapshot.block_number, snapshot.fetched_at);
            println!("{:<40} | {:<8} | {:<10} | Reserves", "Pool", "Active", "Fee");
            println!("{}", "-".repeat(100));
            for pool in &snapshot.pools {
                let reserves = pool
                    .pooled_currencies()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{:<40} | {:<8} | {:<10} | {}",
                    pool.to_string(),
                    pool.is_routable(),
                    format!("{}%", pool.trading_fee().as_decimal()? * Decimal::ONE_HUNDRED),
                    reserves
                );
            }
        }
        Commands::Quote {
            from,
            to,
            amount,
            max_hops,
        } => {
            let config = RoutingConfig::with_max_hops(max_hops);
            let trade = best_trade(&snapshot, &from, &to, amount, config)?;
            print_trade(&trade)?;
        }
        Commands::Swap {
            from,
            to,
            amount,
            slippage: tolerance,
            recipient: account,
        } => {
            let trade = best_trade(&snapshot, &from, &to, amount, RoutingConfig::default())?;
            print_trade(&trade)?;
            let bundle = executor.swap_with_slippage(
                &trade,
                slippage(tolerance)?,
                &recipient(account)?,
                deadline(&executor),
            )?;
            print_bundle(serde_json::to_value(&bundle)?)?;
        }
        Commands::Deposit {
            pool: lp_ticker,
            amounts,
            slippage: tolerance,
            recipient: account,
        } => {
            let target = pool(&snapshot, &lp_ticker)?;
            let mut parsed = amounts
                .iter()
                .map(|(ticker, value)| -> Result<MonetaryAmount> {
                    Ok(MonetaryAmount::from_decimal(currency(&snapshot, ticker)?, *value)?)
                })
                .collect::<Result<Vec<_>>>()?;
            if let [single] = parsed.as_slice() {
                parsed = target.deposit_input_amounts(single)?;
            }
            if parsed.is_empty() {
                bail!("no deposit amounts given");
            }
            let minted = target.deposit_lp_token_amount(&parsed)?;
            println!("Expected LP out: {minted}");
            let bundle = executor.deposit(
                target,
                &parsed,
                slippage(tolerance)?,
                &recipient(account)?,
                deadline(&executor),
            )?;
            print_bundle(serde_json::to_value(&bundle)?)?;
        }
        Commands::Withdraw {
            pool: lp_ticker,
            lp,
            slippage: tolerance,
            recipient: account,
        } => {
            let target = pool(&snapshot, &lp_ticker)?;
            let lp_amount = MonetaryAmount::from_decimal(target.lp_token().clone(), lp)?;
            for amount in target.withdrawal_amounts(&lp_amount)?.iter() {
                println!("Expected out:    {amount}");
            }
            let bundle = executor.withdraw(
                target,
                &lp_amount,
                slippage(tolerance)?,
                &recipient(account)?,
                deadline(&executor),
            )?;
            print_bundle(serde_json::to_value(&bundle)?)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("LP KSM-USDT:1.5").unwrap(),
            ("LP KSM-USDT".to_string(), Decimal::new(15, 1))
        );
        assert!(parse_amount("KSM").is_err());
        assert!(parse_amount("KSM:abc").is_err());
    }

    #[tokio::test]
    async fn test_demo_snapshot_assembles() {
        let file: SnapshotFile =
            serde_json::from_str(include_str!("../../../demos/snapshot.json")).unwrap();
        let snapshot = load_pools(&InMemoryLoader::new(file.snapshot.clone()), &file.registry())
            .await
            .unwrap();
        assert_eq!(snapshot.pools.len(), 5);
        assert!(pool(&snapshot, "LP KSM-USDT").is_ok());
        assert!(!pool(&snapshot, "LP KINT-KSM").unwrap().is_routable());

        let amount = Decimal::new(1, 2);
        let trade =
            best_trade(&snapshot, "KBTC", "DAI", amount, RoutingConfig::default()).unwrap();
        assert_eq!(trade.hop_count(), 3);
    }
}
