//! Edge types for attribution graphs.

use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// An edge type (edge label).
///
/// The vocabulary is open: any caller-chosen string is valid, and its
/// multiplier is looked up in [`WeightsConfig::edges`](crate::WeightsConfig),
/// defaulting to 1.0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeType(pub String);

impl EdgeType {
    /// Create a new edge type.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the edge type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for EdgeType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A directed, typed edge between two nodes.
///
/// Several edges may share the same `(from, to)` pair; each one is kept
/// and weighted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Source node.
    pub from: NodeId,

    /// Target node.
    pub to: NodeId,

    /// Edge type.
    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    /// Raw weight (defaults to 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Confidence in `[0, 1]` (defaults to 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Opaque caller data. Never read by the engine.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Edge {
    /// Create a new edge.
    pub fn new(
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        edge_type: impl Into<EdgeType>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            edge_type: edge_type.into(),
            weight: None,
            confidence: None,
            context: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the raw weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Set the context string.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Raw weight, defaulting to 1.
    pub fn weight_or_default(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    /// Confidence clamped to `[0, 1]`, defaulting to 1.
    ///
    /// The field itself is left as given, so deserialized or hand-built
    /// edges are held to the same range as [`Edge::with_confidence`].
    pub fn confidence_or_default(&self) -> f64 {
        self.confidence.unwrap_or(1.0).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.edge_type, self.to)
    }
}
