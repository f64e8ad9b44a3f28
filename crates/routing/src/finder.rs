//! Depth-bounded search for the trade with the largest output.
//!
//! The search walks the pair graph depth first from the input currency. Each
//! branch carries the set of pools it already used (by value), so a pool is
//! never traded twice on one path, while currencies may be revisited. A
//! branch ends when it reaches the destination or runs out of hops.

use crate::config::RoutingConfig;
use crate::graph::{PairEdge, PairGraph};
use crate::trade::{PathElement, Trade};
use bridge_amm_domain::prelude::*;
use tracing::{debug, trace, warn};

/// A complete path and the amount it delivers.
#[derive(Debug, Clone)]
struct Candidate {
    path: Vec<PathElement>,
    output: MonetaryAmount,
}

/// Finds the best trade over a fixed set of pool snapshots.
#[derive(Debug, Clone)]
pub struct RouteFinder<'a> {
    graph: PairGraph<'a>,
    config: RoutingConfig,
}

impl<'a> RouteFinder<'a> {
    pub fn new(pools: &'a [LiquidityPool], config: RoutingConfig) -> Self {
        Self {
            graph: PairGraph::build(pools),
            config,
        }
    }

    #[must_use]
    pub fn graph(&self) -> &PairGraph<'a> {
        &self.graph
    }

    /// Best trade of `input` into `output`, or `None` when no trade exists.
    ///
    /// A zero input, identical currencies or an empty pool set yield `None`.
    /// Among paths with equal output the first one discovered (in pool
    /// order) wins.
    pub fn find_best_trade(&self, input: &MonetaryAmount, output: &Currency) -> Option<Trade> {
        if input.is_zero() || input.currency() == output || self.graph.pools().is_empty() {
            debug!(
                input = %input,
                output = %output,
                pools = self.graph.pools().len(),
                "No trade: empty input, same currency or no pools"
            );
            return None;
        }

        let best = self.search(input, output, self.config.hop_budget(), Vec::new(), Vec::new())?;
        match Trade::new(best.path, input.clone(), best.output) {
            Ok(trade) => {
                debug!(
                    input = %trade.input_amount(),
                    output = %trade.output_amount(),
                    hops = trade.hop_count(),
                    price_impact = %trade.price_impact(),
                    "Best trade found"
                );
                Some(trade)
            }
            Err(e) => {
                warn!(error = %e, "Discarding route whose hops do not chain");
                None
            }
        }
    }

    /// Pools consumed by taking `edge`: the pool itself, plus its base pool
    /// when the edge crosses into it.
    fn consumed_pools(&self, edge: &PairEdge) -> Vec<usize> {
        let mut consumed = vec![edge.pool_index];
        if edge.crosses_base
            && let Some(base) = self.graph.base_pool_index(edge.pool_index)
        {
            consumed.push(base);
        }
        consumed
    }

    fn search(
        &self,
        carried: &MonetaryAmount,
        destination: &Currency,
        hops_left: usize,
        used: Vec<usize>,
        path: Vec<PathElement>,
    ) -> Option<Candidate> {
        if hops_left == 0 {
            return None;
        }

        let mut best: Option<Candidate> = None;
        for edge in self.graph.edges_from(carried.currency()) {
            let consumed = self.consumed_pools(edge);
            if consumed.iter().any(|p| used.contains(p)) {
                continue;
            }
            let Some(pool) = self.graph.pool(edge.pool_index) else {
                continue;
            };
            if !pool.is_routable() {
                trace!(pool = %pool, "Skipping empty or inactive pool");
                continue;
            }
            let Some(next) = edge.other(carried.currency()) else {
                continue;
            };

            let hop = match PathElement::new(pool, carried.currency(), next) {
                Ok(hop) => hop,
                Err(e) => {
                    trace!(pool = %pool, error = %e, "Skipping unusable hop");
                    continue;
                }
            };
            let out = match hop.output_amount(carried) {
                Ok(out) if !out.is_zero() => out,
                Ok(_) => continue,
                Err(e) => {
                    trace!(
                        pool = %pool,
                        input = %carried,
                        error = %e,
                        "Pruning branch on math error"
                    );
                    continue;
                }
            };

            let mut next_path = path.clone();
            next_path.push(hop);
            let candidate = if next == destination {
                Some(Candidate {
                    path: next_path,
                    output: out,
                })
            } else {
                let mut next_used = used.clone();
                next_used.extend(consumed);
                self.search(&out, destination, hops_left - 1, next_used, next_path)
            };

            if let Some(candidate) = candidate
                && best
                    .as_ref()
                    .is_none_or(|b| candidate.output.atomic() > b.output.atomic())
            {
                best = Some(candidate);
            }
        }
        best
    }
}
