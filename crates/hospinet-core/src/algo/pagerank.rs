//! Weighted PageRank over facility graphs.
//!
//! Rank flows along out-edges in proportion to edge weight. Nodes without
//! positive outgoing weight spread their rank uniformly.

use super::GraphMetric;
use crate::graph::FacilityGraph;
use crate::{FacilityId, HospinetError};
use std::collections::BTreeMap;

/// PageRank configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRank {
    /// Probability of following a link rather than teleporting.
    pub damping: f64,
    /// Maximum power iterations.
    pub max_iterations: usize,
    /// Convergence tolerance on the L1 change of the score vector.
    pub tolerance: f64,
}

impl Default for PageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl PageRank {
    /// Compute scores for every facility. Scores sum to 1.
    ///
    /// # Errors
    ///
    /// Returns `HospinetError::Metric` for a damping factor outside `[0, 1]`
    /// or a negative edge weight.
    pub fn scores(&self, graph: &FacilityGraph) -> Result<BTreeMap<FacilityId, f64>, HospinetError> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(HospinetError::Metric(format!(
                "damping factor {} outside [0, 1]",
                self.damping
            )));
        }
        if let Some((u, v, w)) = graph.edges().find(|(_, _, w)| !(w.is_finite() && **w >= 0.0)) {
            return Err(HospinetError::Metric(format!(
                "edge {} -> {} has invalid weight {}",
                u, v, w
            )));
        }

        let nodes: Vec<&FacilityId> = graph.nodes().collect();
        let n = nodes.len();
        if n == 0 {
            return Ok(BTreeMap::new());
        }
        let index: BTreeMap<&FacilityId, usize> =
            nodes.iter().enumerate().map(|(i, node)| (*node, i)).collect();

        let out_weight: Vec<f64> = nodes
            .iter()
            .map(|node| graph.out_edges(node).map(|(_, w)| *w).sum())
            .collect();
        let edges: Vec<(usize, usize, f64)> = graph
            .edges()
            .filter_map(|(u, v, w)| Some((*index.get(u)?, *index.get(v)?, *w)))
            .collect();

        let size = n as f64;
        let teleport = (1.0 - self.damping) / size;
        let mut rank = vec![1.0 / size; n];

        for iteration in 0..self.max_iterations {
            let dangling: f64 = rank
                .iter()
                .zip(&out_weight)
                .filter(|(_, out)| **out <= 0.0)
                .map(|(r, _)| r)
                .sum();

            let mut next = vec![teleport + self.damping * dangling / size; n];
            for &(u, v, w) in &edges {
                if out_weight[u] > 0.0 {
                    next[v] += self.damping * rank[u] * w / out_weight[u];
                }
            }

            let change: f64 = next.iter().zip(&rank).map(|(a, b)| (a - b).abs()).sum();
            rank = next;
            if change < self.tolerance {
                tracing::trace!(iteration, change, "pagerank converged");
                break;
            }
        }

        Ok(nodes.into_iter().cloned().zip(rank).collect())
    }
}

impl GraphMetric for PageRank {
    type Output = BTreeMap<FacilityId, f64>;

    fn name(&self) -> &'static str {
        "pagerank"
    }

    fn compute(&self, graph: &FacilityGraph) -> Result<Self::Output, HospinetError> {
        self.scores(graph)
    }
}

/// The highest PageRank score in a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaxPageRank(pub PageRank);

impl GraphMetric for MaxPageRank {
    type Output = f64;

    fn name(&self) -> &'static str {
        "pagerank_max"
    }

    fn compute(&self, graph: &FacilityGraph) -> Result<f64, HospinetError> {
        self.0
            .scores(graph)?
            .into_values()
            .reduce(f64::max)
            .ok_or_else(|| HospinetError::Metric("pagerank of an empty graph".to_string()))
    }
}
