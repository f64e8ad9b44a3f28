use bridge_amm_domain::entities::{Currency, CurrencyId, LiquidityPool};
use std::collections::HashMap;

/// One tradeable pair inside one pool. Edges are undirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEdge {
    /// Index of the pool in the supplied pool list.
    pub pool_index: usize,
    pub currency_a: Currency,
    pub currency_b: Currency,
    /// `true` when the pair crosses from a meta pool into its base pool.
    pub crosses_base: bool,
}

impl PairEdge {
    /// The other end of the edge, if `from` is one of its ends.
    #[must_use]
    pub fn other(&self, from: &Currency) -> Option<&Currency> {
        if &self.currency_a == from {
            Some(&self.currency_b)
        } else if &self.currency_b == from {
            Some(&self.currency_a)
        } else {
            None
        }
    }
}

/// Undirected multigraph of currencies connected by pool pairs.
///
/// Edge order follows the supplied pool order, so traversal is deterministic.
#[derive(Debug, Clone)]
pub struct PairGraph<'a> {
    pools: &'a [LiquidityPool],
    edges: Vec<PairEdge>,
    adjacency: HashMap<CurrencyId, Vec<usize>>,
    /// For each pool, the index of its base pool when that is also supplied.
    base_index: Vec<Option<usize>>,
}

impl<'a> PairGraph<'a> {
    pub fn build(pools: &'a [LiquidityPool]) -> Self {
        let mut graph = Self {
            pools,
            edges: Vec::new(),
            adjacency: HashMap::new(),
            base_index: Vec::with_capacity(pools.len()),
        };

        for (pool_index, pool) in pools.iter().enumerate() {
            match pool {
                LiquidityPool::Standard(p) => {
                    graph.add_edge(pool_index, &p.token0, &p.token1, false);
                }
                LiquidityPool::Stable(p) => {
                    let currencies = p.pooled_currencies.currency_list();
                    graph.add_all_pairs(pool_index, &currencies);
                }
                LiquidityPool::StableMeta(p) => {
                    let own = p.pool.pooled_currencies.currency_list();
                    graph.add_all_pairs(pool_index, &own);
                    for meta_currency in p.meta_currencies() {
                        for base_currency in p.base_pool.pooled_currencies.currencies() {
                            graph.add_edge(pool_index, &meta_currency, base_currency, true);
                        }
                    }
                }
            }

            let base = match pool {
                LiquidityPool::StableMeta(p) => {
                    pools.iter().position(|other| other.key() == &p.base_pool.lp_token.id)
                }
                LiquidityPool::Standard(_) | LiquidityPool::Stable(_) => None,
            };
            graph.base_index.push(base);
        }

        graph
    }

    fn add_all_pairs(&mut self, pool_index: usize, currencies: &[Currency]) {
        for (i, a) in currencies.iter().enumerate() {
            for b in &currencies[i + 1..] {
                self.add_edge(pool_index, a, b, false);
            }
        }
    }

    fn add_edge(&mut self, pool_index: usize, a: &Currency, b: &Currency, crosses_base: bool) {
        let index = self.edges.len();
        self.edges.push(PairEdge {
            pool_index,
            currency_a: a.clone(),
            currency_b: b.clone(),
            crosses_base,
        });
        self.adjacency.entry(a.id.clone()).or_default().push(index);
        self.adjacency.entry(b.id.clone()).or_default().push(index);
    }

    #[must_use]
    pub fn pools(&self) -> &'a [LiquidityPool] {
        self.pools
    }

    #[must_use]
    pub fn pool(&self, index: usize) -> Option<&'a LiquidityPool> {
        self.pools.get(index)
    }

    #[must_use]
    pub fn edges(&self) -> &[PairEdge] {
        &self.edges
    }

    /// Index of the supplied base pool of the meta pool at `pool_index`.
    #[must_use]
    pub fn base_pool_index(&self, pool_index: usize) -> Option<usize> {
        self.base_index.get(pool_index).copied().flatten()
    }

    /// Edges touching `currency`, in pool order.
    pub fn edges_from<'g>(
        &'g self,
        currency: &Currency,
    ) -> impl Iterator<Item = &'g PairEdge> + 'g {
        self.adjacency
            .get(&currency.id)
            .into_iter()
            .flatten()
            .map(|index| &self.edges[*index])
    }

    #[must_use]
    pub fn contains_currency(&self, currency: &Currency) -> bool {
        self.adjacency.contains_key(&currency.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn test_standard_pool_has_one_edge() {
        let pools = vec![standard(&coin(1), &coin(2), 1_000, 2_000)];
        let graph = PairGraph::build(&pools);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges_from(&coin(1)).count(), 1);
        assert_eq!(graph.edges()[0].other(&coin(2)), Some(&coin(1)));
        assert_eq!(graph.edges()[0].other(&coin(3)), None);
    }

    #[test]
    fn test_stable_pool_connects_every_pair() {
        let pools = vec![stable(0, &[coin(1), coin(2), coin(3), coin(4)], 1_000_000)];
        let graph = PairGraph::build(&pools);
        // 4 choose 2
        assert_eq!(graph.edges().len(), 6);
        assert_eq!(graph.edges_from(&coin(3)).count(), 3);
    }

    #[test]
    fn test_meta_pool_edges_cross_into_base() {
        let base = stable(0, &[coin(1), coin(2)], 1_000_000);
        let meta = meta(1, &coin(3), base.clone(), 1_000_000);
        let pools = vec![base, meta];
        let graph = PairGraph::build(&pools);

        // base: 1 edge; meta: own pair (3, LP0) plus (3,1) and (3,2)
        assert_eq!(graph.edges().len(), 4);
        let crossing: Vec<_> = graph.edges().iter().filter(|e| e.crosses_base).collect();
        assert_eq!(crossing.len(), 2);
        assert!(crossing.iter().all(|e| e.pool_index == 1));
        assert_eq!(graph.base_pool_index(1), Some(0));
        assert_eq!(graph.base_pool_index(0), None);
        assert!(graph.contains_currency(&coin(3)));
    }
}
