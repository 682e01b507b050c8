//! # Graph Metrics
//!
//! The capability interface through which snapshots are measured.
//!
//! A metric takes a plain weighted directed [`FacilityGraph`] and returns a
//! per-graph or per-node result. Edge weights are read from the graph itself;
//! there is no attribute lookup.

use crate::HospinetError;
use crate::graph::FacilityGraph;

/// Global reaching centrality.
pub mod reaching;

/// Weighted PageRank.
pub mod pagerank;

pub use pagerank::{MaxPageRank, PageRank};
pub use reaching::{GlobalReachingCentrality, local_reaching_centrality};

/// A computation over a facility graph.
pub trait GraphMetric {
    /// Result of one evaluation.
    type Output;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Evaluate the metric on `graph`.
    ///
    /// # Errors
    ///
    /// Returns `HospinetError::Metric` when the metric is undefined for the
    /// given graph.
    fn compute(&self, graph: &FacilityGraph) -> Result<Self::Output, HospinetError>;
}

/// A metric backed by a plain function or closure.
#[derive(Debug, Clone, Copy)]
pub struct FnMetric<F> {
    name: &'static str,
    f: F,
}

impl<F> FnMetric<F> {
    /// Wrap `f` as a named metric.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F, T> GraphMetric for FnMetric<F>
where
    F: Fn(&FacilityGraph) -> Result<T, HospinetError>,
{
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn compute(&self, graph: &FacilityGraph) -> Result<T, HospinetError> {
        (self.f)(graph)
    }
}

impl<M: GraphMetric + ?Sized> GraphMetric for &M {
    type Output = M::Output;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compute(&self, graph: &FacilityGraph) -> Result<Self::Output, HospinetError> {
        (**self).compute(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_metric_delegates() {
        let metric = FnMetric::new("edges", |g: &FacilityGraph| {
            Ok::<_, HospinetError>(g.edge_count())
        });

        assert_eq!(metric.name(), "edges");
        assert_eq!(metric.compute(&FacilityGraph::new()).expect("compute"), 0);
    }

    #[test]
    fn reference_is_a_metric() {
        let metric = GlobalReachingCentrality;
        let by_ref: &dyn GraphMetric<Output = f64> = &metric;
        assert_eq!(by_ref.name(), "global_reaching_centrality");
    }
}
