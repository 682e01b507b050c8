//! Weighted, normalised reaching centrality.
//!
//! Edge weights are read as strengths. Path lengths use the distance
//! `total_weight / w`, so heavy edges are short. The local reaching
//! centrality of `v` is the sum, over all nodes reachable from `v`, of the
//! average edge weight along the shortest path, divided by the mean edge
//! weight and by `N - 1`. The global value is `Σ(max C - C(v)) / (N - 1)`.

use super::GraphMetric;
use crate::graph::FacilityGraph;
use crate::{FacilityId, HospinetError};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

/// Global reaching centrality of a facility graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalReachingCentrality;

impl GraphMetric for GlobalReachingCentrality {
    type Output = f64;

    fn name(&self) -> &'static str {
        "global_reaching_centrality"
    }

    fn compute(&self, graph: &FacilityGraph) -> Result<f64, HospinetError> {
        let scale = Scale::of(graph)?;
        let local: Vec<f64> = graph
            .nodes()
            .map(|node| scale.local(graph, node))
            .collect();

        let max = local.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(local.iter().map(|c| max - c).sum::<f64>() / scale.denominator)
    }
}

/// Local reaching centrality of one node.
///
/// # Errors
///
/// Returns `HospinetError::Metric` if `node` is absent, the graph has fewer
/// than two nodes, or the weights are unusable.
pub fn local_reaching_centrality(
    graph: &FacilityGraph,
    node: &FacilityId,
) -> Result<f64, HospinetError> {
    if !graph.contains_node(node) {
        return Err(HospinetError::Metric(format!("node {} not in graph", node)));
    }
    Ok(Scale::of(graph)?.local(graph, node))
}

// =============================================================================
// SHORTEST PATHS
// =============================================================================

/// Graph-wide quantities shared by every local evaluation.
struct Scale {
    total_weight: f64,
    /// Mean edge weight.
    norm: f64,
    /// `N - 1`
    denominator: f64,
}

impl Scale {
    fn of(graph: &FacilityGraph) -> Result<Self, HospinetError> {
        let n = graph.node_count();
        if n < 2 {
            return Err(HospinetError::Metric(format!(
                "reaching centrality needs at least 2 nodes, got {}",
                n
            )));
        }
        if let Some((u, v, w)) = graph.edges().find(|(_, _, w)| !(w.is_finite() && **w > 0.0)) {
            return Err(HospinetError::Metric(format!(
                "edge {} -> {} has non-positive weight {}",
                u, v, w
            )));
        }

        let total_weight = graph.total_weight();
        if total_weight <= 0.0 {
            return Err(HospinetError::Metric(
                "graph has no positive weight".to_string(),
            ));
        }

        Ok(Self {
            total_weight,
            norm: total_weight / graph.edge_count() as f64,
            denominator: (n - 1) as f64,
        })
    }

    fn local(&self, graph: &FacilityGraph, source: &FacilityId) -> f64 {
        let sum_average: f64 = self
            .shortest_paths(graph, source)
            .values()
            .filter(|path| path.hops > 0)
            .map(|path| path.weight / path.hops as f64)
            .sum();
        sum_average / self.norm / self.denominator
    }

    /// Dijkstra from `source`; ties go to the first path found.
    fn shortest_paths<'a>(
        &self,
        graph: &'a FacilityGraph,
        source: &'a FacilityId,
    ) -> BTreeMap<&'a FacilityId, PathState> {
        let mut best: BTreeMap<&FacilityId, PathState> = BTreeMap::new();
        let mut settled: BTreeSet<&FacilityId> = BTreeSet::new();
        let mut frontier = BinaryHeap::new();

        best.insert(source, PathState::default());
        frontier.push(Frontier {
            distance: 0.0,
            node: source,
        });

        while let Some(Frontier { node, .. }) = frontier.pop() {
            if !settled.insert(node) {
                continue;
            }
            let Some(here) = best.get(node).copied() else {
                continue;
            };

            for (next, weight) in graph.out_edges(node) {
                if settled.contains(next) {
                    continue;
                }
                let candidate = PathState {
                    distance: here.distance + self.total_weight / weight,
                    weight: here.weight + weight,
                    hops: here.hops + 1,
                };
                if best
                    .get(next)
                    .is_none_or(|known| candidate.distance < known.distance)
                {
                    best.insert(next, candidate);
                    frontier.push(Frontier {
                        distance: candidate.distance,
                        node: next,
                    });
                }
            }
        }

        best
    }
}

/// Best known path to a node.
#[derive(Debug, Clone, Copy, Default)]
struct PathState {
    distance: f64,
    /// Sum of edge weights along the path.
    weight: f64,
    hops: usize,
}

/// Min-heap entry: shortest distance first, then smallest node.
struct Frontier<'a> {
    distance: f64,
    node: &'a FacilityId,
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(self.node))
    }
}

// =============================================================================
// TESTS
// =============================================================================
