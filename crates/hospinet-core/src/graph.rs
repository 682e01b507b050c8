//! # Graph Store
//!
//! The deterministic directed graph storage underneath every hospinet graph.
//!
//! `DiGraph` is a simple (non-multi) weighted directed graph: at most one edge
//! per ordered node pair. It knows nothing about time; the temporal network
//! wraps it and maintains its own indices on top.
//! All data structures use `BTreeMap` for deterministic ordering.

use crate::FacilityId;
use std::collections::{BTreeMap, BTreeSet};

/// A plain weighted directed graph over facilities.
///
/// This is the graph shape handed to graph-metric implementations.
pub type FacilityGraph = DiGraph<FacilityId, f64>;

// =============================================================================
// GRAPH IMPLEMENTATION
// =============================================================================

/// A weighted directed graph.
///
/// Uses `BTreeMap`/`BTreeSet` exclusively for deterministic ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct DiGraph<N: Ord, W> {
    /// Node storage, including isolated nodes.
    nodes: BTreeSet<N>,

    /// Adjacency list: from_node -> (to_node -> weight)
    edges: BTreeMap<N, BTreeMap<N, W>>,
}

impl<N: Ord, W> Default for DiGraph<N, W> {
    fn default() -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
        }
    }
}

impl<N: Ord + Clone, W> DiGraph<N, W> {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `true` if the node was not present.
    pub fn add_node(&mut self, node: N) -> bool {
        self.nodes.insert(node)
    }

    /// Insert or overwrite an edge, adding missing endpoints.
    pub fn add_edge(&mut self, from: N, to: N, weight: W) {
        self.update_edge(from, to, |_| weight);
    }

    /// Set an edge to `f(existing_weight)`, adding missing endpoints.
    ///
    /// `f` receives `None` when the edge does not exist yet.
    pub fn update_edge(&mut self, from: N, to: N, f: impl FnOnce(Option<W>) -> W) {
        self.nodes.insert(from.clone());
        self.nodes.insert(to.clone());
        let targets = self.edges.entry(from).or_default();
        let existing = targets.remove(&to);
        targets.insert(to, f(existing));
    }

    /// Check if the graph contains a node.
    #[must_use]
    pub fn contains_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Check if the graph contains an edge.
    #[must_use]
    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        self.edges
            .get(from)
            .is_some_and(|targets| targets.contains_key(to))
    }

    /// Get the weight of an edge.
    #[must_use]
    pub fn edge(&self, from: &N, to: &N) -> Option<&W> {
        self.edges.get(from)?.get(to)
    }

    /// Get all nodes in deterministic order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Get all edges in deterministic order, sorted by (from, to).
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, &W)> {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |(to, weight)| (from, to, weight)))
    }

    /// Get the outgoing edges of a node.
    pub fn out_edges<'a>(&'a self, node: &N) -> impl Iterator<Item = (&'a N, &'a W)> + use<'a, N, W> {
        self.edges
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter())
    }

    /// Number of outgoing edges of a node.
    #[must_use]
    pub fn out_degree(&self, node: &N) -> usize {
        self.edges.get(node).map_or(0, BTreeMap::len)
    }

    /// Get the total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Check if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Ord + Clone> DiGraph<N, f64> {
    /// Sum of all edge weights (the weighted size of the graph).
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges().map(|(_, _, w)| *w).sum()
    }
}

// =============================================================================
// TESTS
// =============================================================================
