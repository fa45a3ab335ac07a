//! Weighted, personalized `PageRank`.
//!
//! Power iteration over a [`CreditGraph`] with an arbitrary restart
//! distribution `p`:
//!
//! ```text
//! next[v] = d * Σ_{u→v} rank[u] * w(u→v) / out(u)
//!         + d * dangling * p[v]
//!         + (1 - d) * p[v]
//! ```
//!
//! where `out(u)` is the total outgoing weight of `u` and `dangling` is the
//! rank held by nodes with zero outgoing weight. Both the teleport and the
//! dangling mass go back to `p` rather than to a uniform vector, so the
//! stationary distribution is biased toward the restart nodes.
//!
//! The whole vector is recomputed each pass. Iteration stops once the L1
//! change drops below `node_count * tolerance`; running out of iterations
//! first is an error, not a best-effort result.

use crate::graph::CreditGraph;
use crate::{Error, NodeId, Result};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// `PageRank` configuration.
#[derive(Debug, Clone, Copy)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Typically 0.85.
    pub damping_factor: f64,
    /// Maximum iterations before giving up.
    pub max_iterations: usize,
    /// Per-node convergence tolerance. The L1 threshold is
    /// `node_count * tolerance`.
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Result of a converged run.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankRun {
    /// Score per node, summing to 1 over the whole graph.
    pub scores: HashMap<NodeId, f64>,
    /// Iterations performed.
    pub iterations: usize,
    /// L1 change of the final iteration.
    pub diff_l1: f64,
}

impl PageRankRun {
    fn empty() -> Self {
        Self {
            scores: HashMap::new(),
            iterations: 0,
            diff_l1: 0.0,
        }
    }

    /// Score of a node, or 0 when absent.
    pub fn score(&self, id: &str) -> f64 {
        self.scores.get(id).copied().unwrap_or(0.0)
    }
}

/// Compute `PageRank` for every node of `graph`.
///
/// With `restart = None` the restart distribution is uniform. Otherwise the
/// given weights are renormalized to sum to 1; entries for ids not in the
/// graph are ignored and missing ids get 0.
///
/// # Errors
///
/// - [`Error::InvalidGraphInput`] if `restart` sums to zero (or is not finite)
///   over the graph's nodes.
/// - [`Error::NonConvergence`] if `max_iterations` passes do not reach the
///   tolerance.
///
/// # Example
///
/// ```rust
/// use creditrank::algo::pagerank::{pagerank, PageRankConfig};
/// use creditrank::graph::{CreditGraph, WeightedArc};
///
/// let mut g = CreditGraph::new();
/// let arc = |w| WeightedArc { edge_type: "cites".into(), weight: w, source_edge: 0 };
/// g.add_arc(&"a".into(), &"b".into(), arc(1.0));
/// g.add_arc(&"b".into(), &"a".into(), arc(1.0));
///
/// let run = pagerank(&g, PageRankConfig::default(), None).unwrap();
/// assert!((run.score("a") - 0.5).abs() < 1e-9);
/// ```
#[allow(clippy::cast_precision_loss)] // node counts won't exceed f64 precision
pub fn pagerank(
    graph: &CreditGraph,
    config: PageRankConfig,
    restart: Option<&HashMap<NodeId, f64>>,
) -> Result<PageRankRun> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(PageRankRun::empty());
    }

    let p = restart_vector(graph, restart)?;
    let d = config.damping_factor;
    let threshold = n as f64 * config.tolerance;

    // Pre-compute outgoing weight shares; nodes with no outgoing weight dangle.
    let pg = graph.as_petgraph();
    let mut shares: Vec<Vec<(usize, f64)>> = Vec::with_capacity(n);
    let mut dangling: Vec<usize> = Vec::new();
    for u in pg.node_indices() {
        let out = graph.out_weight(u);
        if out == 0.0 {
            dangling.push(u.index());
            shares.push(Vec::new());
        } else {
            shares.push(
                graph
                    .arcs_from(u)
                    .map(|(v, arc)| (v.index(), arc.weight / out))
                    .collect(),
            );
        }
    }

    let mut scores = p.clone();
    let mut new_scores = vec![0.0; n];
    let mut diff = f64::INFINITY;

    for iter in 1..=config.max_iterations {
        let dangling_sum: f64 = dangling.iter().map(|&i| scores[i]).sum();
        let restart_mass = d * dangling_sum + (1.0 - d);
        for (slot, &pv) in new_scores.iter_mut().zip(&p) {
            *slot = restart_mass * pv;
        }

        for (u, out) in shares.iter().enumerate() {
            let mass = d * scores[u];
            for &(v, share) in out {
                new_scores[v] += mass * share;
            }
        }

        diff = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut scores, &mut new_scores);
        trace!(iteration = iter, diff_l1 = diff, "PageRank iteration");

        if diff < threshold {
            debug!(nodes = n, iterations = iter, diff_l1 = diff, "PageRank converged");
            let scores = pg
                .node_indices()
                .map(|idx| (graph.node_id(idx).clone(), scores[idx.index()]))
                .collect();
            return Ok(PageRankRun {
                scores,
                iterations: iter,
                diff_l1: diff,
            });
        }
    }

    warn!(
        nodes = n,
        iterations = config.max_iterations,
        diff_l1 = diff,
        "PageRank did not converge"
    );
    Err(Error::NonConvergence {
        iterations: config.max_iterations,
        diff_l1: diff,
        threshold,
    })
}

/// Restart distribution in node-index order, summing to 1.
#[allow(clippy::cast_precision_loss)]
fn restart_vector(
    graph: &CreditGraph,
    restart: Option<&HashMap<NodeId, f64>>,
) -> Result<Vec<f64>> {
    let n = graph.node_count();
    let Some(restart) = restart else {
        return Ok(vec![1.0 / n as f64; n]);
    };

    let ignored = restart.keys().filter(|id| !graph.contains(id)).count();
    if ignored > 0 {
        debug!(count = ignored, "Restart entries for nodes outside the graph ignored");
    }

    let mut p: Vec<f64> = graph
        .node_ids()
        .map(|id| restart.get(id).copied().unwrap_or(0.0))
        .collect();
    let sum: f64 = p.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return Err(Error::InvalidGraphInput(format!(
            "restart distribution must have a finite, nonzero sum (got {sum})"
        )));
    }
    for x in &mut p {
        *x /= sum;
    }
    Ok(p)
}
