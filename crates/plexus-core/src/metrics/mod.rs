//! Centrality metrics for the adjacency graph.
//!
//! # Overview
//!
//! Each metric answers a different question about a room's (node's)
//! position in the plan:
//!
//! - **Degree centrality** (`degree`): How many rooms does it touch, as a
//!   fraction of all other rooms?
//! - **Closeness centrality** (`closeness`): How few hops does it take to
//!   reach everything else?
//! - **Betweenness centrality** (`betweenness`): How much circulation
//!   between other rooms has to pass through it?
//!
//! All metrics take a [`Graph`] reference and return a
//! [`CentralityScores`] map with one entry per node in the graph. They
//! share no state and can run in any order or concurrently.
//!
//! # Usage
//!
//! ```rust
//! use plexus_core::graph::Graph;
//! use plexus_core::metrics::{CentralityConfig, compute_all, rank};
//!
//! let g = Graph::from_edges([("hall", "kitchen"), ("hall", "office"), ("office", "store")]);
//! let report = compute_all(&g, &CentralityConfig::default());
//!
//! let ranked = rank(&g, &report.betweenness);
//! assert_eq!(*ranked[0].0, "hall");
//! ```

pub mod betweenness;
pub mod closeness;
pub mod degree;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::graph::Graph;

pub use betweenness::{BetweennessConfig, betweenness_centrality};
pub use closeness::{ClosenessConfig, closeness_centrality};
pub use degree::degree_centrality;

/// Node → score mapping, one entry per node present in the graph.
pub type CentralityScores<N> = HashMap<N, f64>;

/// Settings for every metric, grouped for callers that compute several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralityConfig {
    /// Closeness settings.
    pub closeness: ClosenessConfig,
    /// Betweenness settings.
    pub betweenness: BetweennessConfig,
}

impl CentralityConfig {
    /// Turn rayon parallelism on or off for every metric that supports it.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.closeness.parallel = parallel;
        self.betweenness.parallel = parallel;
        self
    }
}

/// The metrics this crate computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Centrality {
    Degree,
    Closeness,
    Betweenness,
}

impl Centrality {
    /// Every metric, in report order.
    pub const ALL: [Self; 3] = [Self::Degree, Self::Closeness, Self::Betweenness];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Closeness => "closeness",
            Self::Betweenness => "betweenness",
        }
    }

    /// Compute this metric over `graph`.
    #[must_use]
    pub fn compute<N>(self, graph: &Graph<N>, config: &CentralityConfig) -> CentralityScores<N>
    where
        N: Eq + Hash + Clone + Sync,
    {
        match self {
            Self::Degree => degree_centrality(graph),
            Self::Closeness => closeness_centrality(graph, &config.closeness),
            Self::Betweenness => betweenness_centrality(graph, &config.betweenness),
        }
    }
}

impl fmt::Display for Centrality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown centrality '{0}' (expected degree, closeness, or betweenness)")]
pub struct UnknownCentrality(pub String);

impl FromStr for Centrality {
    type Err = UnknownCentrality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "closeness" => Ok(Self::Closeness),
            "betweenness" => Ok(Self::Betweenness),
            other => Err(UnknownCentrality(other.to_string())),
        }
    }
}

/// All three metrics computed over one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityReport<N>
where
    N: Eq + Hash,
{
    pub degree: CentralityScores<N>,
    pub closeness: CentralityScores<N>,
    pub betweenness: CentralityScores<N>,
}

impl<N> CentralityReport<N>
where
    N: Eq + Hash,
{
    /// Scores for one metric.
    #[must_use]
    pub const fn get(&self, metric: Centrality) -> &CentralityScores<N> {
        match metric {
            Centrality::Degree => &self.degree,
            Centrality::Closeness => &self.closeness,
            Centrality::Betweenness => &self.betweenness,
        }
    }
}

/// Compute degree, closeness, and betweenness centrality over `graph`.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn compute_all<N>(graph: &Graph<N>, config: &CentralityConfig) -> CentralityReport<N>
where
    N: Eq + Hash + Clone + Sync,
{
    let report = CentralityReport {
        degree: degree_centrality(graph),
        closeness: closeness_centrality(graph, &config.closeness),
        betweenness: betweenness_centrality(graph, &config.betweenness),
    };
    info!(nodes = graph.node_count(), "all centralities computed");
    report
}

/// Order nodes by score, highest first.
///
/// Ties keep the graph's first-appearance order, so the ranking is stable
/// for a given input sequence.
#[must_use]
pub fn rank<'g, N>(graph: &'g Graph<N>, scores: &CentralityScores<N>) -> Vec<(&'g N, f64)>
where
    N: Eq + Hash,
{
    let mut ranked: Vec<(&N, f64)> = graph
        .nodes()
        .map(|node| (node, scores.get(node).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
