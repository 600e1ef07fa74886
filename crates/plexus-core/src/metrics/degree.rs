//! Degree centrality.
//!
//! `score(v) = deg(v) / (n - 1)`, where `n` is the node count. A graph with
//! one node or none has no "others" to be adjacent to, so every score is
//! `0.0` there.

use std::hash::Hash;

use tracing::instrument;

use crate::graph::Graph;
use crate::metrics::CentralityScores;

/// Compute degree centrality for every node in `graph`.
///
/// Runs in O(n + m).
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality<N>(graph: &Graph<N>) -> CentralityScores<N>
where
    N: Eq + Hash + Clone,
{
    let n = graph.node_count();
    if n <= 1 {
        return graph.nodes().map(|v| (v.clone(), 0.0)).collect();
    }

    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| {
            let degree = graph.neighbor_indices(i).count();
            (graph.node_at(i).clone(), degree as f64 / denom)
        })
        .collect()
}
