//! Hybrid credit scoring and reward splitting.

use crate::algo::pagerank::{pagerank, PageRankConfig, PageRankRun};
use crate::graph::{build_views, GraphStats, NodeTable};
use crate::normalize::normalize_weights;
use crate::personalization::build_personalization;
use crate::{Config, Edge, Node, NodeId, NodeKind, PartialConfig, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Scores of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentScore {
    /// Agent id.
    pub id: NodeId,
    /// Forward (structural) `PageRank`.
    pub forward: f64,
    /// Reverse (personalized) `PageRank`.
    pub reverse: f64,
    /// `alpha * forward + (1 - alpha) * reverse`.
    pub hybrid: f64,
}

/// Full breakdown of one evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Forward run over every graph node.
    pub forward: PageRankRun,
    /// Reverse run over every graph node.
    pub reverse: PageRankRun,
    /// Unnormalized restart weights of the reverse run (empty means uniform).
    pub personalization: HashMap<NodeId, f64>,
    /// Agents in declaration order.
    pub agents: Vec<AgentScore>,
    /// Shape of the forward view.
    pub forward_stats: GraphStats,
    /// Shape of the reverse view.
    pub reverse_stats: GraphStats,
}

impl Evaluation {
    /// Hybrid score per agent.
    pub fn hybrid_scores(&self) -> HashMap<NodeId, f64> {
        self.agents
            .iter()
            .map(|a| (a.id.clone(), a.hybrid))
            .collect()
    }

    /// Score breakdown of one agent.
    pub fn agent(&self, id: &str) -> Option<&AgentScore> {
        self.agents.iter().find(|a| a.id.as_str() == id)
    }

    /// Agents by descending hybrid score, ties broken by id.
    pub fn ranked(&self) -> Vec<&AgentScore> {
        let mut ranked: Vec<&AgentScore> = self.agents.iter().collect();
        ranked.sort_by(|a, b| {
            b.hybrid
                .partial_cmp(&a.hybrid)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        ranked
    }
}

/// Attribution engine.
///
/// Holds only its configuration; every call is a pure function of its
/// arguments, so one engine can serve concurrent evaluations.
///
/// # Example
///
/// ```rust
/// use creditrank::{CreditEngine, Edge, Node};
///
/// let nodes = vec![
///     Node::agent("alice"),
///     Node::agent("bob"),
///     Node::artifact("library"),
///     Node::outcome("downloads"),
/// ];
/// let edges = vec![
///     Edge::new("alice", "library", "creates").with_weight(1.0),
///     Edge::new("bob", "library", "creates").with_weight(0.5),
///     Edge::new("downloads", "library", "generates").with_weight(50.0),
/// ];
///
/// let engine = CreditEngine::default();
/// let scores = engine.evaluate(&nodes, &edges).unwrap();
/// assert!(scores["alice"] > scores["bob"]);
///
/// let payout = engine.reward(&scores, 1000.0);
/// let total: f64 = payout.values().sum();
/// assert!((total - 1000.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreditEngine {
    config: Config,
}

impl CreditEngine {
    /// Create an engine from a resolved config.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if a value is out of range.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine from a partial config merged over the defaults.
    pub fn from_partial(partial: PartialConfig) -> Result<Self> {
        Self::new(partial.resolve())
    }

    /// Create an engine from a JSON partial config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let partial: PartialConfig = serde_json::from_str(json)?;
        Self::from_partial(partial)
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hybrid score per agent node.
    ///
    /// # Errors
    ///
    /// Fails if either `PageRank` run does not converge, or if the outcome
    /// personalization sums to zero.
    pub fn evaluate(&self, nodes: &[Node], edges: &[Edge]) -> Result<HashMap<NodeId, f64>> {
        Ok(self.evaluate_detailed(nodes, edges)?.hybrid_scores())
    }

    /// Evaluate and keep the intermediate results.
    pub fn evaluate_detailed(&self, nodes: &[Node], edges: &[Edge]) -> Result<Evaluation> {
        let config = &self.config;
        let table = NodeTable::new(nodes);
        let normalized = normalize_weights(edges, &config.normalization);
        let views = build_views(&table, edges, &normalized, config);
        let personalization = build_personalization(&table, edges, &views.weights, config);

        let pr_config = PageRankConfig {
            damping_factor: config.damping,
            max_iterations: config.solver.max_iterations,
            tolerance: config.solver.tolerance,
        };
        let forward = pagerank(&views.forward, pr_config, None)?;
        let restart = (!personalization.is_empty()).then_some(&personalization);
        let reverse = pagerank(&views.reverse, pr_config, restart)?;

        let alpha = config.alpha;
        let agents: Vec<AgentScore> = table
            .of_kind(NodeKind::Agent)
            .map(|node| {
                let f = forward.score(node.id.as_str());
                let r = reverse.score(node.id.as_str());
                AgentScore {
                    id: node.id.clone(),
                    forward: f,
                    reverse: r,
                    hybrid: alpha * f + (1.0 - alpha) * r,
                }
            })
            .collect();

        debug!(
            agents = agents.len(),
            forward_iterations = forward.iterations,
            reverse_iterations = reverse.iterations,
            "Evaluation finished"
        );

        Ok(Evaluation {
            forward_stats: views.forward.stats(),
            reverse_stats: views.reverse.stats(),
            forward,
            reverse,
            personalization,
            agents,
        })
    }

    /// Split `pool` across `scores`; see [`reward`].
    pub fn reward(&self, scores: &HashMap<NodeId, f64>, pool: f64) -> HashMap<NodeId, f64> {
        reward(scores, pool)
    }
}

/// Scale scores so they sum to `pool`.
///
/// If the scores sum to exactly zero they are returned unchanged.
pub fn reward(scores: &HashMap<NodeId, f64>, pool: f64) -> HashMap<NodeId, f64> {
    let total: f64 = scores.values().sum();
    if total == 0.0 {
        return scores.clone();
    }
    scores
        .iter()
        .map(|(id, &score)| (id.clone(), score / total * pool))
        .collect()
}
