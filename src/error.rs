//! Error types for creditrank.

use thiserror::Error;

/// Error type for attribution operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A restart/personalization distribution cannot be renormalized.
    #[error("Invalid graph input: {0}")]
    InvalidGraphInput(String),

    /// Power iteration hit its iteration ceiling before meeting the tolerance.
    #[error(
        "PageRank did not converge after {iterations} iterations \
         (L1 diff {diff_l1:e}, threshold {threshold:e})"
    )]
    NonConvergence {
        /// Iterations performed.
        iterations: usize,
        /// L1 change of the last iteration.
        diff_l1: f64,
        /// Convergence threshold (`node_count * tolerance`).
        threshold: f64,
    },

    /// Configuration value out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for attribution operations.
pub type Result<T> = std::result::Result<T, Error>;
