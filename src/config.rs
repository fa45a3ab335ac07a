//! Engine configuration.
//!
//! [`Config`] is the fully resolved configuration. Callers usually describe
//! only what they want to change with a [`PartialConfig`], whose fields are
//! all optional; [`Config::merge`] applies it over a base one field at a
//! time, descending into the nested normalization, weight and solver
//! sections, so a nested override never wipes its siblings.
//!
//! ```rust
//! use creditrank::{Config, EdgeWeightMode, PartialConfig};
//!
//! let partial: PartialConfig = serde_json::from_str(
//!     r#"{ "alpha": 0.3, "weights": { "edges": { "creates": 2.0 } } }"#,
//! ).unwrap();
//! let config = partial.resolve();
//!
//! assert_eq!(config.alpha, 0.3);
//! assert_eq!(config.damping, 0.85);
//! assert_eq!(config.normalization.edge_weight, EdgeWeightMode::PerTypeSum);
//! assert_eq!(config.edge_multiplier(&"creates".into()), 2.0);
//! assert_eq!(config.edge_multiplier(&"cites".into()), 1.0);
//! ```

use crate::{EdgeType, Error, NodeId, NodeKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How transformed edge weights are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeWeightMode {
    /// Use transformed weights as-is.
    None,
    /// Divide by the sum over all edges of the same type.
    #[default]
    PerTypeSum,
    /// Divide by the sum over all edges sharing `(from, type)`.
    PerSourceTypeSum,
    /// Divide by the maximum over all edges of the same type.
    PerTypeMax,
}

/// Transform applied to raw edge weights before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightTransform {
    /// Raw weight.
    #[default]
    None,
    /// `ln(1 + max(0, w))`.
    Log1p,
}

/// Edge weight normalization settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationConfig {
    /// Scaling mode.
    pub edge_weight: EdgeWeightMode,
    /// Transform applied before scaling.
    pub transform: WeightTransform,
    /// Added to every scaling denominator.
    pub epsilon: f64,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            edge_weight: EdgeWeightMode::PerTypeSum,
            transform: WeightTransform::None,
            epsilon: 1e-12,
        }
    }
}

/// Multipliers per node kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeWeights {
    /// Multiplier for agent nodes.
    pub agent: f64,
    /// Multiplier for artifact nodes.
    pub artifact: f64,
    /// Multiplier for outcome nodes.
    pub outcome: f64,
}

impl Default for NodeTypeWeights {
    fn default() -> Self {
        Self {
            agent: 1.0,
            artifact: 1.0,
            outcome: 1.0,
        }
    }
}

impl NodeTypeWeights {
    /// Multiplier for a node kind.
    pub fn get(&self, kind: NodeKind) -> f64 {
        match kind {
            NodeKind::Agent => self.agent,
            NodeKind::Artifact => self.artifact,
            NodeKind::Outcome => self.outcome,
        }
    }

    fn set(&mut self, kind: NodeKind, value: f64) {
        match kind {
            NodeKind::Agent => self.agent = value,
            NodeKind::Artifact => self.artifact = value,
            NodeKind::Outcome => self.outcome = value,
        }
    }
}

/// Multiplier tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightsConfig {
    /// Per edge type. Missing types count as 1.0.
    pub edges: HashMap<EdgeType, f64>,
    /// Per node kind.
    pub nodes_by_type: NodeTypeWeights,
    /// Per node id. Missing ids count as 1.0.
    pub nodes_by_id: HashMap<NodeId, f64>,
}

/// Power-iteration limits for the two PageRank runs of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverSettings {
    /// Hard iteration ceiling.
    pub max_iterations: usize,
    /// Per-node tolerance; the L1 threshold is `node_count * tolerance`.
    pub tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Fully resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Forward share of the hybrid score, in `[0, 1]`.
    pub alpha: f64,
    /// PageRank damping (probability of following a link), in `[0, 1]`.
    pub damping: f64,
    /// Edge weight normalization.
    pub normalization: NormalizationConfig,
    /// Multiplier tables.
    pub weights: WeightsConfig,
    /// Solver limits.
    pub solver: SolverSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            damping: 0.85,
            normalization: NormalizationConfig::default(),
            weights: WeightsConfig::default(),
            solver: SolverSettings::default(),
        }
    }
}

impl Config {
    /// Apply a partial config over `self`, field by field.
    pub fn merge(mut self, partial: PartialConfig) -> Self {
        if let Some(alpha) = partial.alpha {
            self.alpha = alpha;
        }
        if let Some(damping) = partial.damping {
            self.damping = damping;
        }
        if let Some(norm) = partial.normalization {
            if let Some(mode) = norm.edge_weight {
                self.normalization.edge_weight = mode;
            }
            if let Some(transform) = norm.transform {
                self.normalization.transform = transform;
            }
            if let Some(epsilon) = norm.epsilon {
                self.normalization.epsilon = epsilon;
            }
        }
        if let Some(weights) = partial.weights {
            if let Some(edges) = weights.edges {
                self.weights.edges.extend(edges);
            }
            if let Some(by_id) = weights.nodes_by_id {
                self.weights.nodes_by_id.extend(by_id);
            }
            if let Some(by_type) = weights.nodes_by_type {
                for (kind, value) in [
                    (NodeKind::Agent, by_type.agent),
                    (NodeKind::Artifact, by_type.artifact),
                    (NodeKind::Outcome, by_type.outcome),
                ] {
                    if let Some(value) = value {
                        self.weights.nodes_by_type.set(kind, value);
                    }
                }
            }
        }
        if let Some(solver) = partial.solver {
            if let Some(max_iterations) = solver.max_iterations {
                self.solver.max_iterations = max_iterations;
            }
            if let Some(tolerance) = solver.tolerance {
                self.solver.tolerance = tolerance;
            }
        }
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(Error::InvalidConfig(format!(
                "damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        let epsilon = self.normalization.epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "normalization epsilon must be finite and >= 0, got {epsilon}"
            )));
        }
        if self.solver.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "solver max_iterations must be > 0".to_string(),
            ));
        }
        let tolerance = self.solver.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "solver tolerance must be finite and > 0, got {tolerance}"
            )));
        }
        Ok(())
    }

    /// Set alpha.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set damping.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the normalization mode.
    pub fn with_edge_weight_mode(mut self, mode: EdgeWeightMode) -> Self {
        self.normalization.edge_weight = mode;
        self
    }

    /// Set the weight transform.
    pub fn with_transform(mut self, transform: WeightTransform) -> Self {
        self.normalization.transform = transform;
        self
    }

    /// Set the multiplier for an edge type.
    pub fn with_edge_multiplier(mut self, edge_type: impl Into<EdgeType>, value: f64) -> Self {
        self.weights.edges.insert(edge_type.into(), value);
        self
    }

    /// Set the multiplier for a node kind.
    pub fn with_node_type_multiplier(mut self, kind: NodeKind, value: f64) -> Self {
        self.weights.nodes_by_type.set(kind, value);
        self
    }

    /// Set the multiplier for a single node.
    pub fn with_node_multiplier(mut self, id: impl Into<NodeId>, value: f64) -> Self {
        self.weights.nodes_by_id.insert(id.into(), value);
        self
    }

    /// Multiplier for an edge type (1.0 when unset).
    pub fn edge_multiplier(&self, edge_type: &EdgeType) -> f64 {
        self.weights.edges.get(edge_type).copied().unwrap_or(1.0)
    }

    /// Multiplier for a node id (1.0 when unset).
    pub fn node_id_multiplier(&self, id: &NodeId) -> f64 {
        self.weights.nodes_by_id.get(id).copied().unwrap_or(1.0)
    }
}

/// A configuration where every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialConfig {
    /// Forward share of the hybrid score.
    pub alpha: Option<f64>,
    /// `PageRank` damping factor.
    pub damping: Option<f64>,
    /// Normalization overrides.
    pub normalization: Option<PartialNormalization>,
    /// Multiplier overrides.
    pub weights: Option<PartialWeights>,
    /// Solver overrides.
    pub solver: Option<PartialSolverSettings>,
}

impl PartialConfig {
    /// Resolve over [`Config::default`].
    pub fn resolve(self) -> Config {
        Config::default().merge(self)
    }
}

/// Optional normalization fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialNormalization {
    /// Group scaling mode.
    pub edge_weight: Option<EdgeWeightMode>,
    /// Raw weight transform.
    pub transform: Option<WeightTransform>,
    /// Denominator guard.
    pub epsilon: Option<f64>,
}

/// Optional multiplier fields. Map entries are merged key by key; a
/// missing or `null` map leaves the base untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialWeights {
    /// Per edge-type multipliers to add or replace.
    pub edges: Option<HashMap<EdgeType, f64>>,
    /// Per-kind multiplier overrides.
    pub nodes_by_type: Option<PartialNodeTypeWeights>,
    /// Per node-id multipliers to add or replace.
    pub nodes_by_id: Option<HashMap<NodeId, f64>>,
}

/// Optional per-kind multipliers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialNodeTypeWeights {
    /// Agent multiplier.
    pub agent: Option<f64>,
    /// Artifact multiplier.
    pub artifact: Option<f64>,
    /// Outcome multiplier.
    pub outcome: Option<f64>,
}

/// Optional solver fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialSolverSettings {
    /// Iteration cap.
    pub max_iterations: Option<usize>,
    /// Per-node convergence tolerance.
    pub tolerance: Option<f64>,
}
