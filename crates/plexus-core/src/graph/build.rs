//! Graph construction from an adjacency edge list.
//!
//! # Overview
//!
//! An edge list is a sequence of unordered node pairs, typically produced by
//! a spatial-adjacency detector (one pair per pair of touching rooms). This
//! module turns that sequence into a canonical undirected [`petgraph`] graph
//! that every centrality metric reads from.
//!
//! ## Canonical form
//!
//! - **Self-loops** `(u, u)` are dropped without error. A node that only
//!   ever appears in a self-loop does not become part of the graph.
//! - **Duplicate edges** collapse: `(u, v)`, `(v, u)` and any repetition of
//!   either contribute exactly one adjacency relation.
//! - **Node universe** is exactly the set of endpoints of retained edges.
//!   Nodes are indexed in first-appearance order.
//!
//! A node is inserted with an empty neighbor set the first time a retained
//! edge references it; after [`GraphBuilder::build`] the adjacency is
//! complete and read-only.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while building a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge record was not a two-element unordered pair.
    #[error("edge record {index} has {arity} endpoint(s), expected exactly 2")]
    InvalidInput {
        /// Zero-based position of the record in the input sequence.
        index: usize,
        /// Number of endpoints the record actually carried.
        arity: usize,
    },
}

// ---------------------------------------------------------------------------
// BuildReport
// ---------------------------------------------------------------------------

/// What happened to the input records during construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Number of edge records consumed.
    pub records: usize,
    /// Records dropped because both endpoints were equal.
    pub self_loops: usize,
    /// Records that repeated an already-present unordered pair.
    pub duplicates: usize,
    /// Nodes in the resulting graph.
    pub node_count: usize,
    /// Distinct undirected edges in the resulting graph.
    pub edge_count: usize,
}

/// Result of feeding one pair to [`GraphBuilder::add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// A new adjacency relation was recorded.
    Added,
    /// Both endpoints were equal; nothing was recorded.
    SelfLoop,
    /// The unordered pair was already present.
    Duplicate,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An undirected, unweighted, simple graph over nodes of type `N`.
///
/// Only equality and hashing are required of `N`; no ordering is assumed.
/// Adjacency is symmetric, self-loop free, and has set semantics by
/// construction.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    graph: UnGraph<N, ()>,
    node_map: HashMap<N, NodeIndex>,
    report: BuildReport,
}

impl<N> Graph<N>
where
    N: Eq + Hash + Clone,
{
    /// Build a graph from unordered node pairs.
    ///
    /// Self-loops are dropped and duplicate pairs collapse to one edge. The
    /// input is consumed by value; borrowed inputs can be passed through
    /// `.iter().cloned()`.
    #[must_use]
    #[instrument(skip_all)]
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut builder = GraphBuilder::new();
        for (u, v) in edges {
            builder.add_edge(u, v);
        }
        builder.build()
    }

    /// Build a graph from loosely-typed records such as parsed file rows.
    ///
    /// Each record must contain exactly two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidInput`] for the first record whose length
    /// is not 2. No partial graph is returned.
    #[instrument(skip_all)]
    pub fn try_from_records<I, R>(records: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[N]>,
    {
        let mut builder = GraphBuilder::new();
        for (index, record) in records.into_iter().enumerate() {
            builder.add_record(index, record.as_ref())?;
        }
        Ok(builder.build())
    }
}

impl<N> Graph<N>
where
    N: Eq + Hash,
{
    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True when no edge survived construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// True when `node` is an endpoint of at least one retained edge.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.node_map.contains_key(node)
    }

    /// Iterate nodes in first-appearance order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_weights()
    }

    /// Neighbors of `node`, or `None` if the node is not in the graph.
    pub fn neighbors<'a>(
        &'a self,
        node: &N,
    ) -> Option<impl Iterator<Item = &'a N> + use<'a, N>> {
        let idx = *self.node_map.get(node)?;
        Some(self.graph.neighbors(idx).map(move |n| &self.graph[n]))
    }

    /// Number of neighbors of `node`, or `None` if the node is not in the graph.
    #[must_use]
    pub fn degree(&self, node: &N) -> Option<usize> {
        self.node_map
            .get(node)
            .map(|&idx| self.graph.neighbors(idx).count())
    }

    /// Counts gathered while the graph was built.
    #[must_use]
    pub const fn report(&self) -> &BuildReport {
        &self.report
    }

    /// The underlying petgraph structure. Node weights are the node values.
    #[must_use]
    pub const fn petgraph(&self) -> &UnGraph<N, ()> {
        &self.graph
    }

    /// Node value at a dense index in `0..node_count()`.
    pub(crate) fn node_at(&self, index: usize) -> &N {
        &self.graph[NodeIndex::new(index)]
    }

    /// Dense neighbor indices of the node at `index`.
    pub(crate) fn neighbor_indices(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors(NodeIndex::new(index))
            .map(NodeIndex::index)
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Incremental builder for [`Graph`].
#[derive(Debug)]
pub struct GraphBuilder<N> {
    graph: UnGraph<N, ()>,
    node_map: HashMap<N, NodeIndex>,
    seen: HashSet<(NodeIndex, NodeIndex)>,
    report: BuildReport,
}

impl<N> Default for GraphBuilder<N>
where
    N: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> GraphBuilder<N>
where
    N: Eq + Hash + Clone,
{
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            node_map: HashMap::new(),
            seen: HashSet::new(),
            report: BuildReport::default(),
        }
    }

    /// Create an empty builder sized for roughly `nodes` nodes and `edges` edges.
    #[must_use]
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            node_map: HashMap::with_capacity(nodes),
            seen: HashSet::with_capacity(edges),
            report: BuildReport::default(),
        }
    }

    /// Record one unordered pair.
    pub fn add_edge(&mut self, u: N, v: N) -> EdgeOutcome {
        self.report.records += 1;

        if u == v {
            self.report.self_loops += 1;
            return EdgeOutcome::SelfLoop;
        }

        let a = self.intern(u);
        let b = self.intern(v);
        let key = if a < b { (a, b) } else { (b, a) };

        if !self.seen.insert(key) {
            self.report.duplicates += 1;
            return EdgeOutcome::Duplicate;
        }

        self.graph.add_edge(a, b, ());
        EdgeOutcome::Added
    }

    /// Record one loosely-typed record that must hold exactly two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidInput`] when `record.len() != 2`.
    pub fn add_record(&mut self, index: usize, record: &[N]) -> Result<EdgeOutcome, GraphError> {
        match record {
            [u, v] => Ok(self.add_edge(u.clone(), v.clone())),
            _ => Err(GraphError::InvalidInput {
                index,
                arity: record.len(),
            }),
        }
    }

    /// Counts so far.
    #[must_use]
    pub fn report(&self) -> BuildReport {
        BuildReport {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            ..self.report
        }
    }

    /// Finish construction.
    #[must_use]
    pub fn build(self) -> Graph<N> {
        let report = self.report();
        debug!(
            records = report.records,
            self_loops = report.self_loops,
            duplicates = report.duplicates,
            nodes = report.node_count,
            edges = report.edge_count,
            "graph built"
        );

        Graph {
            graph: self.graph,
            node_map: self.node_map,
            report,
        }
    }

    fn intern(&mut self, node: N) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_map.insert(node, idx);
        idx
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor_set<'a>(g: &'a Graph<&'a str>, node: &'a str) -> HashSet<&'a str> {
        g.neighbors(&node)
            .expect("node must exist")
            .copied()
            .collect()
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let g: Graph<u32> = Graph::from_edges(Vec::new());
        assert!(g.is_empty());
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = Graph::from_edges([("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
        for u in g.nodes() {
            for v in g.neighbors(u).expect("node exists") {
                assert!(
                    neighbor_set(&g, v).contains(u),
                    "{v} should list {u} as a neighbor"
                );
            }
        }
    }

    #[test]
    fn self_loops_are_dropped_and_not_nodes() {
        let g = Graph::from_edges([("A", "A"), ("A", "B"), ("Z", "Z")]);
        assert_eq!(g.node_count(), 2);
        assert!(!g.contains(&"Z"));
        assert!(!neighbor_set(&g, "A").contains("A"));
        assert_eq!(g.report().self_loops, 2);
    }

    #[test]
    fn duplicates_collapse_in_any_order() {
        let g = Graph::from_edges([("A", "B"), ("B", "A"), ("A", "B"), ("B", "C")]);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.degree(&"A"), Some(1));
        assert_eq!(g.degree(&"B"), Some(2));
        assert_eq!(g.report().duplicates, 2);
        assert_eq!(g.report().records, 4);
    }

    #[test]
    fn nodes_follow_first_appearance() {
        let g = Graph::from_edges([(3, 1), (1, 2), (2, 3)]);
        let order: Vec<i32> = g.nodes().copied().collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn records_with_wrong_arity_are_rejected() {
        let records = vec![vec!["A", "B"], vec!["C"], vec!["D", "E"]];
        let err = Graph::try_from_records(records).expect_err("second record is malformed");
        assert_eq!(err, GraphError::InvalidInput { index: 1, arity: 1 });

        let records = vec![vec!["A", "B", "C"]];
        let err = Graph::try_from_records(records).expect_err("triple is malformed");
        assert_eq!(err, GraphError::InvalidInput { index: 0, arity: 3 });
    }

    #[test]
    fn well_formed_records_build() {
        let records = vec![["A", "B"], ["B", "C"], ["C", "C"]];
        let g = Graph::try_from_records(records).expect("records are pairs");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn builder_reports_each_outcome() {
        let mut b = GraphBuilder::with_capacity(4, 4);
        assert_eq!(b.add_edge("A", "B"), EdgeOutcome::Added);
        assert_eq!(b.add_edge("B", "A"), EdgeOutcome::Duplicate);
        assert_eq!(b.add_edge("C", "C"), EdgeOutcome::SelfLoop);

        let report = b.report();
        assert_eq!(report.records, 3);
        assert_eq!(report.node_count, 2);
        assert_eq!(report.edge_count, 1);
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let g = Graph::from_edges([("A", "B")]);
        assert!(g.neighbors(&"Q").is_none());
        assert!(g.degree(&"Q").is_none());
    }
}
