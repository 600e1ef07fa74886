#![forbid(unsafe_code)]
//! plexus-core library.
//!
//! Builds a canonical undirected graph from an adjacency edge list and
//! computes exact degree, closeness, and betweenness centrality over it.
//!
//! # Conventions
//!
//! - **Errors**: Typed `thiserror` enums per module; `anyhow::Result` at
//!   configuration boundaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! ```rust
//! use plexus_core::graph::Graph;
//! use plexus_core::metrics::betweenness::{BetweennessConfig, betweenness_centrality};
//!
//! let g = Graph::from_edges([("A", "B"), ("B", "C")]);
//! let bc = betweenness_centrality(&g, &BetweennessConfig::default());
//! assert!((bc[&"B"] - 1.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod edges;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod timing;

pub use edges::{EdgeFormat, EdgeReadError, EdgeRecords, NodeKey};
pub use error::ErrorCode;
pub use graph::{Graph, GraphBuilder, GraphError};
pub use metrics::{Centrality, CentralityConfig, CentralityReport, CentralityScores};
