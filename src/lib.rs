// Allow minor clippy style warnings at crate level
// These are mostly style preferences, not bugs
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! Auditable credit attribution over agent/artifact/outcome graphs.
//!
//! Given typed nodes ([`Node`]) and typed, weighted edges ([`Edge`]), the
//! engine scores every agent with a blend of two `PageRank` runs:
//!
//! - **Forward** `PageRank` over the graph as authored, with uniform restart.
//!   Measures structural importance.
//! - **Reverse** `PageRank` over the graph with contribution edges flipped,
//!   restarting at outcome nodes in proportion to the value they emit.
//!   Measures how much realized value traces back to each node.
//!
//! ```text
//! hybrid(agent) = alpha * forward(agent) + (1 - alpha) * reverse(agent)
//! ```
//!
//! Scores can then be split across a reward pool with [`reward`].
//!
//! # Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Edge weight normalization | [`normalize`] |
//! | Forward/reverse views | [`graph`] |
//! | Outcome restart vector | [`personalization`] |
//! | Power iteration | [`algo::pagerank`] |
//! | Hybrid blend, reward split | [`CreditEngine`], [`reward`] |
//!
//! # Example
//!
//! ```rust
//! use creditrank::{CreditEngine, Edge, Node};
//!
//! let nodes = vec![
//!     Node::agent("alice"),
//!     Node::artifact("paper"),
//!     Node::outcome("citations"),
//! ];
//! let edges = vec![
//!     Edge::new("alice", "paper", "authors"),
//!     Edge::new("citations", "paper", "cites").with_weight(12.0),
//! ];
//!
//! let engine = CreditEngine::from_json_str(r#"{ "alpha": 0.3 }"#)?;
//! let scores = engine.evaluate(&nodes, &edges)?;
//! assert_eq!(scores.len(), 1);
//! # Ok::<(), creditrank::Error>(())
//! ```

pub mod algo;
mod config;
mod edge;
mod engine;
mod error;
pub mod graph;
mod node;
pub mod normalize;
pub mod personalization;

pub use config::{
    Config, EdgeWeightMode, NodeTypeWeights, NormalizationConfig, PartialConfig,
    PartialNodeTypeWeights, PartialNormalization, PartialSolverSettings, PartialWeights,
    SolverSettings, WeightTransform, WeightsConfig,
};
pub use edge::{Edge, EdgeType};
pub use engine::{reward, AgentScore, CreditEngine, Evaluation};
pub use error::{Error, Result};
pub use graph::{CreditGraph, GraphStats};
pub use node::{Node, NodeId, NodeKind};

// Re-export petgraph for advanced graph operations
pub use petgraph;
