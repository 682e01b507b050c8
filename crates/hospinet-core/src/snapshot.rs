//! # Snapshots and Time Series
//!
//! Per-instant views of a temporal network and metric time series over them.
//!
//! A snapshot at time `t` is a [`FacilityGraph`] holding, for every facility
//! present at `t`, its outbound transitions with the time of the target
//! discarded. Snapshots are produced lazily, one per time unit.

use crate::algo::{GlobalReachingCentrality, GraphMetric};
use crate::graph::FacilityGraph;
use crate::network::TemporalNetwork;
use crate::{FacilityId, HospinetError, TemporalNode, TimeUnit};
use std::collections::{BTreeSet, btree_map};

/// Default weight composition: addition.
pub type AddWeights = fn(f64, f64) -> f64;

fn add_weights(existing: f64, weight: f64) -> f64 {
    existing + weight
}

// =============================================================================
// OUTBOUND SNAPSHOTS
// =============================================================================

/// Lazy iterator over the outbound snapshots of a temporal network.
///
/// Yields `(t, snapshot)` in ascending `t`, including empty snapshots for
/// times without outbound transitions. Not restartable: call
/// [`snapshots_outbound`] again for a fresh pass.
pub struct OutboundSnapshots<'a, C> {
    network: &'a TemporalNetwork,
    times: btree_map::Iter<'a, TimeUnit, BTreeSet<FacilityId>>,
    compose: C,
}

impl<C> Iterator for OutboundSnapshots<'_, C>
where
    C: Fn(f64, f64) -> f64,
{
    type Item = (TimeUnit, FacilityGraph);

    fn next(&mut self) -> Option<Self::Item> {
        let (&t, facilities) = self.times.next()?;

        let mut snapshot = FacilityGraph::new();
        for facility in facilities {
            let source = TemporalNode::at(facility.clone(), t);
            for (target, weight) in self.network.out_edges(&source) {
                snapshot.update_edge(facility.clone(), target.facility.clone(), |existing| {
                    (self.compose)(existing.unwrap_or(0.0), weight.value() as f64)
                });
            }
        }

        Some((t, snapshot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.times.size_hint()
    }
}

/// Outbound snapshots with summed weights.
pub fn snapshots_outbound(network: &TemporalNetwork) -> OutboundSnapshots<'_, AddWeights> {
    snapshots_outbound_with(network, add_weights)
}

/// Outbound snapshots with a custom weight composition.
///
/// When several transitions map to the same facility pair, the snapshot
/// weight is `compose(existing, weight)`, starting from `existing = 0`.
pub fn snapshots_outbound_with<C>(network: &TemporalNetwork, compose: C) -> OutboundSnapshots<'_, C>
where
    C: Fn(f64, f64) -> f64,
{
    OutboundSnapshots {
        network,
        times: network.snapshot_index().iter(),
        compose,
    }
}

// =============================================================================
// FAILOVER
// =============================================================================

/// A metric whose failures are replaced by a default value.
#[derive(Debug, Clone)]
pub struct Failover<M: GraphMetric> {
    metric: M,
    default: M::Output,
}

/// Wrap `metric` so that it never fails.
///
/// A failure is logged at `warn` level and `default` returned in its place.
pub fn failover<M: GraphMetric>(metric: M, default: M::Output) -> Failover<M> {
    Failover { metric, default }
}

impl<M> Failover<M>
where
    M: GraphMetric,
    M::Output: Clone,
{
    /// Evaluate the wrapped metric, substituting the default on failure.
    pub fn evaluate(&self, graph: &FacilityGraph) -> M::Output {
        match self.metric.compute(graph) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(metric = self.metric.name(), error = %e, "metric failed, using default");
                self.default.clone()
            }
        }
    }
}

impl<M> GraphMetric for Failover<M>
where
    M: GraphMetric,
    M::Output: Clone,
{
    type Output = M::Output;

    fn name(&self) -> &'static str {
        self.metric.name()
    }

    fn compute(&self, graph: &FacilityGraph) -> Result<M::Output, HospinetError> {
        Ok(self.evaluate(graph))
    }
}

// =============================================================================
// TIME SERIES
// =============================================================================

/// Evaluate a metric over every outbound snapshot of `network`.
///
/// With `safe = false` a failing snapshot contributes `default` and a
/// warning; with `safe = true` the first failure is returned.
pub fn temporal_timeseries<M>(
    network: &TemporalNetwork,
    metric: M,
    safe: bool,
    default: M::Output,
) -> Result<Vec<(TimeUnit, M::Output)>, HospinetError>
where
    M: GraphMetric,
    M::Output: Clone,
{
    temporal_timeseries_over(snapshots_outbound(network), metric, safe, default)
}

/// Evaluate a metric over caller-supplied snapshots.
///
/// The result is sorted ascending by time regardless of input order.
pub fn temporal_timeseries_over<I, M>(
    snapshots: I,
    metric: M,
    safe: bool,
    default: M::Output,
) -> Result<Vec<(TimeUnit, M::Output)>, HospinetError>
where
    I: IntoIterator<Item = (TimeUnit, FacilityGraph)>,
    M: GraphMetric,
    M::Output: Clone,
{
    let mut series = if safe {
        collect_series(snapshots, &metric)?
    } else {
        collect_series(snapshots, &failover(&metric, default))?
    };
    series.sort_by_key(|(t, _)| *t);
    Ok(series)
}

fn collect_series<I, M>(snapshots: I, metric: &M) -> Result<Vec<(TimeUnit, M::Output)>, HospinetError>
where
    I: IntoIterator<Item = (TimeUnit, FacilityGraph)>,
    M: GraphMetric,
{
    snapshots
        .into_iter()
        .map(|(t, snapshot)| Ok((t, metric.compute(&snapshot)?)))
        .collect()
}

/// Global reaching centrality of every outbound snapshot.
///
/// Snapshots with fewer than two nodes score 0 without invoking the metric;
/// any other metric failure is returned.
pub fn global_reaching_timeseries(
    network: &TemporalNetwork,
) -> Result<Vec<(TimeUnit, f64)>, HospinetError> {
    global_reaching_timeseries_over(snapshots_outbound(network))
}

/// Global reaching centrality of caller-supplied snapshots.
pub fn global_reaching_timeseries_over<I>(snapshots: I) -> Result<Vec<(TimeUnit, f64)>, HospinetError>
where
    I: IntoIterator<Item = (TimeUnit, FacilityGraph)>,
{
    let mut series = snapshots
        .into_iter()
        .map(|(t, snapshot)| {
            if snapshot.node_count() < 2 {
                return Ok((t, 0.0));
            }
            Ok((t, GlobalReachingCentrality.compute(&snapshot)?))
        })
        .collect::<Result<Vec<_>, HospinetError>>()?;
    series.sort_by_key(|(t, _)| *t);
    Ok(series)
}

// =============================================================================
// TESTS
// =============================================================================
