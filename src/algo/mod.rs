//! Graph algorithms.

/// Weighted personalized PageRank.
pub mod pagerank;
