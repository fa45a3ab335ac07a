//! Node types for attribution graphs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The role a node plays in the attribution graph.
///
/// Only [`NodeKind::Agent`] nodes receive hybrid scores. [`NodeKind::Outcome`]
/// nodes seed the restart distribution of the reverse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A credited party (person, team).
    Agent,
    /// A produced output (library, paper, app).
    Artifact,
    /// A realized value signal (downloads, grant, citation).
    Outcome,
}

impl NodeKind {
    /// Lowercase name, as used in serialized configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Artifact => "artifact",
            Self::Outcome => "outcome",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in an attribution graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,

    /// Node role.
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Per-node weight multiplier (defaults to 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Opaque caller data. Never read by the engine.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Node {
    /// Create a node of the given kind.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            weight: None,
            context: None,
            metadata: HashMap::new(),
        }
    }

    /// Create an agent node.
    pub fn agent(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Agent)
    }

    /// Create an artifact node.
    pub fn artifact(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Artifact)
    }

    /// Create an outcome node.
    pub fn outcome(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Outcome)
    }

    /// Set the node weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
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

    /// Node weight, defaulting to 1.
    pub fn weight_or_default(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_json_shape() {
        let node: Node =
            serde_json::from_str(r#"{"id":"alice","type":"agent","weight":2.0}"#).unwrap();
        assert_eq!(node.id.as_str(), "alice");
        assert_eq!(node.kind, NodeKind::Agent);
        assert_eq!(node.weight_or_default(), 2.0);
        assert!(node.metadata.is_empty());
    }

    #[test]
    fn test_weight_defaults_to_one() {
        let node = Node::outcome("downloads");
        assert_eq!(node.weight_or_default(), 1.0);
        assert_eq!(node.to_string(), "downloads (outcome)");
    }

    #[test]
    fn test_context_survives_json() {
        let node = Node::artifact("lib").with_context("core parser crate");
        assert_eq!(node.context.as_deref(), Some("core parser crate"));

        let back: Node = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        assert_eq!(back, node);
    }
}
