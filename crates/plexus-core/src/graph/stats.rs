//! Summary statistics for an adjacency graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the canonical graph.
//! - **density**: `2m / (n(n - 1))` for an undirected simple graph. Zero for
//!   graphs with fewer than two nodes.
//! - **component_count**: number of connected components. Values above 1
//!   mean closeness scores carry the Wasserman–Faust penalty.
//! - **largest_component**: node count of the biggest component.
//! - **max_degree**: highest neighbor count.
//! - **leaf_count**: nodes with exactly one neighbor (pendant rooms).

use std::hash::Hash;

use petgraph::unionfind::UnionFind;
use serde::Serialize;

use crate::graph::Graph;

/// Summary statistics for a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of distinct undirected edges.
    pub edge_count: usize,
    /// Undirected density in `[0, 1]`.
    pub density: f64,
    /// Number of connected components.
    pub component_count: usize,
    /// Size of the largest connected component.
    pub largest_component: usize,
    /// Highest degree of any node.
    pub max_degree: usize,
    /// Nodes with degree 1.
    pub leaf_count: usize,
}

impl GraphStats {
    /// Compute statistics from a built graph.
    #[must_use]
    pub fn from_graph<N: Eq + Hash>(graph: &Graph<N>) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let sizes = component_sizes(graph);
        let degrees: Vec<usize> = (0..node_count)
            .map(|i| graph.neighbor_indices(i).count())
            .collect();

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            component_count: sizes.len(),
            largest_component: sizes.iter().copied().max().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            leaf_count: degrees.iter().filter(|&&d| d == 1).count(),
        }
    }

    /// True when every node can reach every other node.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count <= 1
    }
}

/// Sizes of connected components, in order of first member index.
fn component_sizes<N: Eq + Hash>(graph: &Graph<N>) -> Vec<usize> {
    let n = graph.node_count();
    let mut uf = UnionFind::<usize>::new(n);
    for edge in graph.petgraph().raw_edges() {
        uf.union(edge.source().index(), edge.target().index());
    }

    let labels = uf.into_labeling();
    let mut root_slot: Vec<Option<usize>> = vec![None; n];
    let mut sizes = Vec::new();
    for root in labels {
        let slot = *root_slot[root].get_or_insert_with(|| {
            sizes.push(0);
            sizes.len() - 1
        });
        sizes[slot] += 1;
    }
    sizes
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    2.0 * edge_count as f64 / max_edges
}
