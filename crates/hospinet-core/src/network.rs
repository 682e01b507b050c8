//! # Temporal Network
//!
//! A time-discretised directed graph of patient movement between facilities.
//!
//! Nodes are `(facility, time)` pairs; an edge `(a, t) -> (b, t')` counts the
//! subjects present at `a` during `t` whose next presence is `b` during `t'`.
//!
//! The network composes an opaque [`DiGraph`] store with two derived indices:
//! - `snapshots`: time -> facilities present at that time
//! - `presence`: facility -> times at which it has presence
//!
//! Every insertion entry point funnels through [`TemporalNetwork::register`],
//! the only mutator of the indices, so they always agree with the node set.

use crate::graph::{DiGraph, FacilityGraph};
use crate::{EdgeWeight, FacilityId, TemporalNode, TimeUnit};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static NO_FACILITIES: BTreeSet<FacilityId> = BTreeSet::new();
static NO_TIMES: BTreeSet<TimeUnit> = BTreeSet::new();

// =============================================================================
// TEMPORAL NETWORK
// =============================================================================

/// A temporal network of facility transfers.
///
/// Built once per input table, then read many times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporalNetwork {
    /// Node and edge storage.
    graph: DiGraph<TemporalNode, EdgeWeight>,

    /// time -> facilities present at that time
    snapshots: BTreeMap<TimeUnit, BTreeSet<FacilityId>>,

    /// facility -> times the facility has presence
    presence: BTreeMap<FacilityId, BTreeSet<TimeUnit>>,
}

impl TemporalNetwork {
    /// Create a new empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a network from its nodes and weighted edges.
    ///
    /// Goes through the regular insertion entry points, so the indices are
    /// derived exactly as they are during construction.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = TemporalNode>,
        edges: impl IntoIterator<Item = (TemporalNode, TemporalNode, EdgeWeight)>,
    ) -> Self {
        let mut network = Self::new();
        for node in nodes {
            network.add_node(node);
        }
        for (from, to, weight) in edges {
            network.add_edge(from, to, weight);
        }
        network
    }

    /// Index maintenance: record `node` in both lookup indices.
    fn register(&mut self, node: &TemporalNode) {
        self.snapshots
            .entry(node.time)
            .or_default()
            .insert(node.facility.clone());
        self.presence
            .entry(node.facility.clone())
            .or_default()
            .insert(node.time);
    }

    /// Insert a node. Returns `true` if the node was not present.
    pub fn add_node(&mut self, node: TemporalNode) -> bool {
        self.register(&node);
        self.graph.add_node(node)
    }

    /// Insert or overwrite an edge, registering both endpoints.
    pub fn add_edge(&mut self, from: TemporalNode, to: TemporalNode, weight: EdgeWeight) {
        self.register(&from);
        self.register(&to);
        self.graph.add_edge(from, to, weight);
    }

    /// Increment an edge by one transition, creating it with weight 1.
    pub fn increment_edge(&mut self, from: TemporalNode, to: TemporalNode) {
        self.register(&from);
        self.register(&to);
        self.graph
            .update_edge(from, to, |w| w.unwrap_or_default().increment());
    }

    // =========================================================================
    // INDEX LOOKUPS
    // =========================================================================

    /// Facilities present at time `t`. Empty when nothing is present.
    #[must_use]
    pub fn nodes_at_time(&self, t: TimeUnit) -> &BTreeSet<FacilityId> {
        self.snapshots.get(&t).unwrap_or(&NO_FACILITIES)
    }

    /// Times at which `facility` has presence. Empty for unknown facilities.
    #[must_use]
    pub fn when_present(&self, facility: &FacilityId) -> &BTreeSet<TimeUnit> {
        self.presence.get(facility).unwrap_or(&NO_TIMES)
    }

    /// All distinct time units, ascending.
    pub fn times(&self) -> impl Iterator<Item = TimeUnit> + '_ {
        self.snapshots.keys().copied()
    }

    /// All facilities, in sorted order.
    pub fn facilities(&self) -> impl Iterator<Item = &FacilityId> {
        self.presence.keys()
    }

    /// Number of distinct time units.
    #[must_use]
    pub fn time_count(&self) -> usize {
        self.snapshots.len()
    }

    /// The time -> facilities index, in ascending time order.
    pub(crate) fn snapshot_index(&self) -> &BTreeMap<TimeUnit, BTreeSet<FacilityId>> {
        &self.snapshots
    }

    // =========================================================================
    // GRAPH READS
    // =========================================================================

    /// Get all nodes in deterministic order.
    pub fn nodes(&self) -> impl Iterator<Item = &TemporalNode> {
        self.graph.nodes()
    }

    /// Get all edges in deterministic order.
    pub fn edges(&self) -> impl Iterator<Item = (&TemporalNode, &TemporalNode, EdgeWeight)> {
        self.graph.edges().map(|(u, v, w)| (u, v, *w))
    }

    /// Outgoing edges of a node.
    pub fn out_edges<'a>(
        &'a self,
        node: &TemporalNode,
    ) -> impl Iterator<Item = (&'a TemporalNode, EdgeWeight)> + use<'a> {
        self.graph.out_edges(node).map(|(v, w)| (v, *w))
    }

    /// Weight of the edge `from -> to`, if present.
    #[must_use]
    pub fn edge_weight(&self, from: &TemporalNode, to: &TemporalNode) -> Option<EdgeWeight> {
        self.graph.edge(from, to).copied()
    }

    /// Check if the network contains a node.
    #[must_use]
    pub fn contains_node(&self, node: &TemporalNode) -> bool {
        self.graph.contains_node(node)
    }

    /// Get the total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check that both indices describe exactly the node set.
    ///
    /// `f ∈ nodes_at_time(t)` ⟺ `t ∈ when_present(f)` ⟺ `(f, t)` is a node.
    #[must_use]
    pub fn indices_consistent(&self) -> bool {
        let from_snapshots: BTreeSet<TemporalNode> = self
            .snapshots
            .iter()
            .flat_map(|(t, fs)| fs.iter().map(|f| TemporalNode::at(f.clone(), *t)))
            .collect();
        let from_presence: BTreeSet<TemporalNode> = self
            .presence
            .iter()
            .flat_map(|(f, ts)| ts.iter().map(|t| TemporalNode::at(f.clone(), *t)))
            .collect();
        let nodes: BTreeSet<TemporalNode> = self.graph.nodes().cloned().collect();

        from_snapshots == nodes && from_presence == nodes
    }

    /// Summary counts for reporting.
    #[must_use]
    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            facility_count: self.presence.len(),
            time_count: self.snapshots.len(),
            first_time: self.snapshots.keys().next().copied(),
            last_time: self.snapshots.keys().next_back().copied(),
            total_weight: self
                .edges()
                .fold(0i64, |acc, (_, _, w)| acc.saturating_add(w.value())),
        }
    }

    // =========================================================================
    // PROJECTIONS
    // =========================================================================

    /// Project onto a static weighted graph over facilities.
    ///
    /// Edge weights are summed over all times for each ordered facility pair;
    /// transitions that stay within one facility are dropped. Each facility is
    /// annotated with the fraction of time units at which it has presence.
    #[must_use]
    pub fn to_static(&self) -> StaticProjection {
        let mut graph = FacilityGraph::new();
        let mut presence = BTreeMap::new();
        let n_times = self.snapshots.len() as f64;

        for (facility, times) in &self.presence {
            graph.add_node(facility.clone());
            presence.insert(facility.clone(), times.len() as f64 / n_times);
        }

        for (from, to, weight) in self.graph.edges() {
            if from.facility != to.facility {
                graph.update_edge(from.facility.clone(), to.facility.clone(), |w| {
                    w.unwrap_or(0.0) + weight.value() as f64
                });
            }
        }

        StaticProjection { graph, presence }
    }
}

// =============================================================================
// DERIVED VIEWS
// =============================================================================

/// A temporal network flattened onto its facilities.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticProjection {
    /// Inter-facility transfer graph with summed weights.
    pub graph: FacilityGraph,

    /// facility -> fraction of time units with presence
    pub presence: BTreeMap<FacilityId, f64>,
}

impl StaticProjection {
    /// Presence fraction of a facility.
    #[must_use]
    pub fn presence_of(&self, facility: &FacilityId) -> Option<f64> {
        self.presence.get(facility).copied()
    }
}

/// Summary counts of a temporal network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Number of (facility, time) nodes.
    pub node_count: usize,
    /// Number of weighted edges.
    pub edge_count: usize,
    /// Number of distinct facilities.
    pub facility_count: usize,
    /// Number of distinct time units.
    pub time_count: usize,
    /// Earliest time unit.
    pub first_time: Option<TimeUnit>,
    /// Latest time unit.
    pub last_time: Option<TimeUnit>,
    /// Sum of all edge weights (total transitions).
    pub total_weight: i64,
}

// =============================================================================
// TESTS
// =============================================================================
