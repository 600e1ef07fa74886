//! Adjacency graph module.
//!
//! # Overview
//!
//! This module turns a raw edge sequence into the canonical undirected graph
//! consumed by every metric in [`crate::metrics`].
//!
//! ## Pipeline
//!
//! ```text
//! edge list (pairs from an adjacency detector or an edge file)
//!        ↓  build::Graph::from_edges() / Graph::try_from_records()
//! Graph (symmetric, self-loop free, duplicate free)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, component count, leaf count, …)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use plexus_core::graph::{Graph, GraphStats};
//!
//! let g = Graph::from_edges([("hall", "kitchen"), ("hall", "office")]);
//! let stats = GraphStats::from_graph(&g);
//! assert_eq!(stats.node_count, 3);
//! assert_eq!(stats.component_count, 1);
//! ```

pub mod build;
pub mod stats;

pub use build::{BuildReport, EdgeOutcome, Graph, GraphBuilder, GraphError};
pub use stats::GraphStats;
