//! Closeness centrality with the Wasserman–Faust correction.
//!
//! # Definition
//!
//! For each source `s`, a BFS gives the hop distance to every node `s` can
//! reach. With `reachable` counting `s` itself and `total` the sum of
//! distances to the other reached nodes:
//!
//! ```text
//! C(s) = (reachable - 1) / total
//! ```
//!
//! With `wf_improved` (the default) the score is further multiplied by
//! `(reachable - 1) / (N - 1)`, where `N` is the node count of the whole
//! graph. Without it, a node sitting in a two-node component scores the
//! same `1.0` as the hub of a large connected graph.
//!
//! An isolated source, or one whose distance sum is zero, scores `0.0`.
//!
//! # Complexity
//!
//! One BFS per node: O(n · (n + m)).

use std::collections::VecDeque;
use std::hash::Hash;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::graph::Graph;
use crate::metrics::CentralityScores;

/// Configuration for [`closeness_centrality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosenessConfig {
    /// Apply the Wasserman–Faust scaling for graphs with several components.
    pub wf_improved: bool,
    /// Run the per-source searches on the rayon pool.
    pub parallel: bool,
}

impl Default for ClosenessConfig {
    fn default() -> Self {
        Self {
            wf_improved: true,
            parallel: false,
        }
    }
}

/// Compute closeness centrality for every node in `graph`.
///
/// An empty graph yields an empty map.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn closeness_centrality<N>(graph: &Graph<N>, config: &ClosenessConfig) -> CentralityScores<N>
where
    N: Eq + Hash + Clone + Sync,
{
    let n = graph.node_count();
    if n == 0 {
        return CentralityScores::new();
    }

    let scores: Vec<f64> = if config.parallel {
        (0..n)
            .into_par_iter()
            .map_init(
                || BfsScratch::new(n),
                |scratch, s| source_score(graph, s, scratch, config.wf_improved),
            )
            .collect()
    } else {
        let mut scratch = BfsScratch::new(n);
        (0..n)
            .map(|s| source_score(graph, s, &mut scratch, config.wf_improved))
            .collect()
    };

    scores
        .into_iter()
        .enumerate()
        .map(|(i, score)| (graph.node_at(i).clone(), score))
        .collect()
}

/// Reusable BFS buffers, reset between sources.
struct BfsScratch {
    dist: Vec<Option<usize>>,
    queue: VecDeque<usize>,
}

impl BfsScratch {
    fn new(n: usize) -> Self {
        Self {
            dist: vec![None; n],
            queue: VecDeque::with_capacity(n),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn source_score<N: Eq + Hash>(
    graph: &Graph<N>,
    s: usize,
    scratch: &mut BfsScratch,
    wf_improved: bool,
) -> f64 {
    let (reachable, total) = bfs_distance_sum(graph, s, scratch);

    if reachable <= 1 || total == 0 {
        return 0.0;
    }

    let mut score = (reachable - 1) as f64 / total as f64;

    let n = graph.node_count();
    if wf_improved && n > 1 {
        score *= (reachable - 1) as f64 / (n - 1) as f64;
    }

    score
}

/// BFS from `s`; returns `(reachable including s, sum of hop distances)`.
fn bfs_distance_sum<N: Eq + Hash>(
    graph: &Graph<N>,
    s: usize,
    scratch: &mut BfsScratch,
) -> (usize, usize) {
    scratch.dist.fill(None);
    scratch.queue.clear();

    scratch.dist[s] = Some(0);
    scratch.queue.push_back(s);

    let mut reachable = 0;
    let mut total = 0;

    while let Some(v) = scratch.queue.pop_front() {
        let dv = scratch.dist[v].unwrap_or(0);
        reachable += 1;
        total += dv;

        for w in graph.neighbor_indices(v) {
            if scratch.dist[w].is_none() {
                scratch.dist[w] = Some(dv + 1);
                scratch.queue.push_back(w);
            }
        }
    }

    (reachable, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wf() -> ClosenessConfig {
        ClosenessConfig::default()
    }

    fn plain() -> ClosenessConfig {
        ClosenessConfig {
            wf_improved: false,
            ..ClosenessConfig::default()
        }
    }

    #[test]
    fn empty_graph_returns_empty() {
        let g: Graph<u32> = Graph::from_edges(Vec::new());
        assert!(closeness_centrality(&g, &wf()).is_empty());
    }

    #[test]
    fn path_of_three() {
        // A - B - C: B reaches both at distance 1, ends sum to 3.
        let g = Graph::from_edges([("A", "B"), ("B", "C")]);
        let cc = closeness_centrality(&g, &wf());
        assert!((cc["B"] - 1.0).abs() < 1e-12);
        assert!((cc["A"] - 2.0 / 3.0).abs() < 1e-12);
        assert!((cc["C"] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn disconnected_without_correction_matches_component_local_value() {
        // a-b and c-d-e; without WF both a and d look perfectly central.
        let g = Graph::from_edges([("a", "b"), ("c", "d"), ("d", "e")]);
        let cc = closeness_centrality(&g, &plain());
        assert!((cc["a"] - 1.0).abs() < 1e-12);
        assert!((cc["d"] - 1.0).abs() < 1e-12);
        assert!((cc["c"] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn disconnected_with_correction_penalizes_small_component() {
        let g = Graph::from_edges([("a", "b"), ("c", "d"), ("d", "e")]);
        let cc = closeness_centrality(&g, &wf());
        // a: 1/1 * 1/4
        assert!((cc["a"] - 0.25).abs() < 1e-12);
        // d: 2/2 * 2/4
        assert!((cc["d"] - 0.5).abs() < 1e-12);
        // c: 2/3 * 2/4
        assert!((cc["c"] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_matches_sequential() {
        let g = Graph::from_edges([(1, 2), (2, 3), (3, 4), (4, 1), (4, 5), (6, 7)]);
        let seq = closeness_centrality(&g, &wf());
        let par = closeness_centrality(
            &g,
            &ClosenessConfig {
                parallel: true,
                ..wf()
            },
        );
        for (node, score) in &seq {
            assert_eq!(score.to_bits(), par[node].to_bits(), "node {node}");
        }
    }
}
