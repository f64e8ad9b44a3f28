//! Multi-hop trade routing across standard, stable and meta pools.
//!
//! This crate provides:
//! - A pair graph derived from pool snapshots
//! - A depth-bounded search for the trade with the largest output
//! - The [`trade::Trade`] value with execution price and price impact

/// Prelude module for convenient imports.
pub mod prelude;

/// Routing configuration.
pub mod config;
/// Best-trade search.
pub mod finder;
/// Currency pair graph.
pub mod graph;
/// Trades and their hops.
pub mod trade;

#[cfg(test)]
pub(crate) mod fixtures;
