//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. In a room-adjacency graph, high-betweenness
//! rooms are the corridors and halls that circulation has to pass through.
//!
//! # Algorithm
//!
//! We implement Brandes' algorithm (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS recording hop distance, the number
//!    of shortest paths `sigma`, the shortest-path predecessors, and the
//!    visitation order.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes
//!    first). The shortest-path DAG is layered by distance, so every node
//!    further from `s` has its dependency finalized before it is needed.
//! 3. Sum the dependency scores across all source nodes.
//!
//! Each unordered pair is seen once from each endpoint, so the sums are
//! halved at the end.
//!
//! Complexity: O(n · m).
//!
//! # Normalization
//!
//! With `normalized` (the default) scores are multiplied by
//! `2 / ((n - 1)(n - 2))`, giving the fraction of pairs of *other* nodes
//! whose shortest paths run through the node. Graphs with two nodes or
//! fewer have no such pairs; every score there is `0.0` whether or not
//! normalization is requested.
//!
//! # Parallelism
//!
//! Sources are processed in fixed-size chunks. Each chunk folds into its
//! own accumulator and the chunk accumulators are summed elementwise in
//! chunk order, so the sequential and rayon paths add the same numbers in
//! the same order and produce bit-identical scores.

use std::collections::VecDeque;
use std::hash::Hash;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::Graph;
use crate::metrics::CentralityScores;

/// Sources folded into one partial accumulator.
const SOURCE_CHUNK: usize = 64;

/// Configuration for [`betweenness_centrality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetweennessConfig {
    /// Scale scores by `2 / ((n - 1)(n - 2))`.
    pub normalized: bool,
    /// Run the per-source passes on the rayon pool.
    pub parallel: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            normalized: true,
            parallel: false,
        }
    }
}

/// Compute betweenness centrality for every node in `graph`.
///
/// Total over any graph, including disconnected ones: unreachable pairs
/// contribute nothing.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn betweenness_centrality<N>(
    graph: &Graph<N>,
    config: &BetweennessConfig,
) -> CentralityScores<N>
where
    N: Eq + Hash + Clone + Sync,
{
    let n = graph.node_count();

    if n <= 2 {
        return graph.nodes().map(|v| (v.clone(), 0.0)).collect();
    }

    let sources: Vec<usize> = (0..n).collect();
    let partials: Vec<Vec<f64>> = if config.parallel {
        sources
            .par_chunks(SOURCE_CHUNK)
            .map(|chunk| accumulate_sources(graph, chunk))
            .collect()
    } else {
        sources
            .chunks(SOURCE_CHUNK)
            .map(|chunk| accumulate_sources(graph, chunk))
            .collect()
    };
    debug!(chunks = partials.len(), "brandes passes complete");

    let mut cb = vec![0.0_f64; n];
    for partial in &partials {
        for (acc, value) in cb.iter_mut().zip(partial) {
            *acc += value;
        }
    }

    // Undirected: every pair was counted from both endpoints.
    for score in &mut cb {
        *score /= 2.0;
    }

    if config.normalized {
        let scale = normalization_scale(n);
        for score in &mut cb {
            *score *= scale;
        }
    }

    cb.into_iter()
        .enumerate()
        .map(|(i, score)| (graph.node_at(i).clone(), score))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn normalization_scale(n: usize) -> f64 {
    2.0 / ((n - 1) * (n - 2)) as f64
}

/// Run Brandes' single-source pass for every source in `sources`, summing
/// dependencies into a fresh node-indexed accumulator.
fn accumulate_sources<N: Eq + Hash>(graph: &Graph<N>, sources: &[usize]) -> Vec<f64> {
    let n = graph.node_count();
    let mut acc = vec![0.0_f64; n];
    let mut state = BrandesState::new(n);

    for &s in sources {
        state.reset();
        state.forward(graph, s);
        state.backward(s, &mut acc);
    }

    acc
}

/// Per-source working state. Nothing here survives past one source.
struct BrandesState {
    /// Nodes in order of discovery (farthest popped first).
    stack: Vec<usize>,
    /// predecessors[w] = nodes immediately preceding w on shortest paths from s.
    predecessors: Vec<Vec<usize>>,
    /// sigma[t] = number of shortest paths from s to t.
    sigma: Vec<f64>,
    /// dist[t] = hop distance from s to t, `None` if unvisited.
    dist: Vec<Option<usize>>,
    delta: Vec<f64>,
    queue: VecDeque<usize>,
}

impl BrandesState {
    fn new(n: usize) -> Self {
        Self {
            stack: Vec::with_capacity(n),
            predecessors: vec![Vec::new(); n],
            sigma: vec![0.0; n],
            dist: vec![None; n],
            delta: vec![0.0; n],
            queue: VecDeque::with_capacity(n),
        }
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.queue.clear();
        for preds in &mut self.predecessors {
            preds.clear();
        }
        self.sigma.fill(0.0);
        self.dist.fill(None);
        self.delta.fill(0.0);
    }

    fn forward<N: Eq + Hash>(&mut self, graph: &Graph<N>, s: usize) {
        self.sigma[s] = 1.0;
        self.dist[s] = Some(0);
        self.queue.push_back(s);

        while let Some(v) = self.queue.pop_front() {
            self.stack.push(v);
            let next = self.dist[v].map_or(0, |d| d + 1);

            for w in graph.neighbor_indices(v) {
                // First visit to w?
                if self.dist[w].is_none() {
                    self.dist[w] = Some(next);
                    self.queue.push_back(w);
                }

                // Shortest path to w via v?
                if self.dist[w] == Some(next) {
                    self.sigma[w] += self.sigma[v];
                    self.predecessors[w].push(v);
                }
            }
        }
    }

    fn backward(&mut self, s: usize, acc: &mut [f64]) {
        while let Some(w) = self.stack.pop() {
            let sigma_w = self.sigma[w];
            if sigma_w > 0.0 {
                let coeff = (1.0 + self.delta[w]) / sigma_w;
                for &v in &self.predecessors[w] {
                    self.delta[v] += self.sigma[v] * coeff;
                }
            }

            if w != s {
                acc[w] += self.delta[w];
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
