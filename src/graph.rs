//! Weighted graph views over nodes and edges.
//!
//! Attribution runs PageRank over two views of the same input:
//!
//! - **forward**: every edge as authored, `from -> to`.
//! - **reverse**: every edge flipped to `to -> from`, except edges leaving an
//!   outcome node, which already point toward the credited party and are kept
//!   as authored.
//!
//! Both views carry the same effective weight per edge:
//!
//! ```text
//! normalized(e) * confidence(e) * edges[e.type] * mult(from) * mult(to)
//! mult(n) = nodesByType[n.type] * nodesById[n.id] * n.weight
//! ```
//!
//! An endpoint missing from the node list has multiplier 1. It still becomes
//! an (implicit) graph node so the edge takes part in PageRank.

use crate::{Config, Edge, EdgeType, Node, NodeId, NodeKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Multiplier contributed by a single node.
pub fn node_multiplier(node: &Node, config: &Config) -> f64 {
    config.weights.nodes_by_type.get(node.kind)
        * config.node_id_multiplier(&node.id)
        * node.weight_or_default()
}

/// Lookup from node id to its declaration.
///
/// When an id is declared more than once, the first declaration wins.
#[derive(Debug, Clone)]
pub struct NodeTable<'a> {
    nodes: Vec<&'a Node>,
    index: HashMap<&'a NodeId, usize>,
}

impl<'a> NodeTable<'a> {
    /// Index a node list.
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut table = Self {
            nodes: Vec::with_capacity(nodes.len()),
            index: HashMap::with_capacity(nodes.len()),
        };
        let mut negative = 0usize;
        for node in nodes {
            if table.index.contains_key(&node.id) {
                debug!(node_id = %node.id, "Ignoring duplicate node declaration");
                continue;
            }
            if node.weight.is_some_and(|w| w < 0.0) {
                negative += 1;
            }
            table.index.insert(&node.id, table.nodes.len());
            table.nodes.push(node);
        }
        if negative > 0 {
            warn!(count = negative, "Negative node weights present");
        }
        table
    }

    /// Declared node by id.
    pub fn get(&self, id: &NodeId) -> Option<&'a Node> {
        self.index.get(id).map(|&i| self.nodes[i])
    }

    /// Declared kind of a node, if any.
    pub fn kind(&self, id: &NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| n.kind)
    }

    /// Whether `id` is declared.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Multiplier for `id`; 1.0 for undeclared ids.
    pub fn multiplier(&self, id: &NodeId, config: &Config) -> f64 {
        self.get(id).map_or(1.0, |n| node_multiplier(n, config))
    }

    /// Declared nodes in input order (duplicates removed).
    pub fn iter(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Declared nodes of one kind, in input order.
    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &'a Node> + '_ {
        self.iter().filter(move |n| n.kind == kind)
    }

    /// Number of distinct declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes are declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Effective weight of every edge, in input order.
///
/// `normalized` holds the per-edge output of
/// [`normalize_weights`](crate::normalize::normalize_weights).
pub fn effective_weights(
    table: &NodeTable<'_>,
    edges: &[Edge],
    normalized: &[f64],
    config: &Config,
) -> Vec<f64> {
    debug_assert_eq!(edges.len(), normalized.len());
    let negative = edges.iter().filter(|e| e.weight.is_some_and(|w| w < 0.0)).count();
    if negative > 0 {
        warn!(count = negative, "Negative edge weights present");
    }
    let out_of_range = edges
        .iter()
        .filter(|e| e.confidence.is_some_and(|c| !(0.0..=1.0).contains(&c)))
        .count();
    if out_of_range > 0 {
        warn!(count = out_of_range, "Edge confidences outside [0, 1] clamped");
    }

    edges
        .iter()
        .zip(normalized)
        .map(|(e, &w)| {
            w * e.confidence_or_default()
                * config.edge_multiplier(&e.edge_type)
                * table.multiplier(&e.from, config)
                * table.multiplier(&e.to, config)
        })
        .collect()
}

/// A weighted arc in a [`CreditGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedArc {
    /// Type of the originating edge.
    pub edge_type: EdgeType,
    /// Effective weight.
    pub weight: f64,
    /// Position of the originating edge in the input list.
    pub source_edge: usize,
}

/// A weighted directed multigraph keyed by node id.
///
/// Uses petgraph's arena-backed `DiGraph`, so parallel arcs between the
/// same pair of nodes stay distinct.
#[derive(Debug, Clone, Default)]
pub struct CreditGraph {
    graph: DiGraph<NodeId, WeightedArc>,
    index: HashMap<NodeId, NodeIndex>,
    implicit: usize,
}

impl CreditGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with estimated capacity.
    pub fn with_capacity(nodes: usize, arcs: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, arcs),
            index: HashMap::with_capacity(nodes),
            implicit: 0,
        }
    }

    /// Add a node (no-op if present).
    pub fn add_node(&mut self, id: &NodeId) -> NodeIndex {
        self.get_or_create(id).0
    }

    /// Add an arc, creating implicit endpoints as needed.
    pub fn add_arc(&mut self, from: &NodeId, to: &NodeId, arc: WeightedArc) {
        let (src, created_src) = self.get_or_create(from);
        let (dst, created_dst) = self.get_or_create(to);
        self.implicit += usize::from(created_src) + usize::from(created_dst);
        self.graph.add_edge(src, dst, arc);
    }

    fn get_or_create(&mut self, id: &NodeId) -> (NodeIndex, bool) {
        if let Some(&idx) = self.index.get(id) {
            return (idx, false);
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        (idx, true)
    }

    /// Node index for an id.
    pub fn node_index(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Node id at an index.
    pub fn node_id(&self, idx: NodeIndex) -> &NodeId {
        &self.graph[idx]
    }

    /// Whether the graph holds `id`.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of arcs (parallel arcs counted separately).
    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over node ids in index order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.graph.node_weights()
    }

    /// Outgoing arcs of a node as `(target, arc)`.
    pub fn arcs_from(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, &WeightedArc)> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight()))
    }

    /// Sum of outgoing arc weights.
    pub fn out_weight(&self, idx: NodeIndex) -> f64 {
        self.arcs_from(idx).map(|(_, arc)| arc.weight).sum()
    }

    /// Get the underlying petgraph for advanced operations.
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, WeightedArc> {
        &self.graph
    }

    /// Compute statistics about the graph.
    pub fn stats(&self) -> GraphStats {
        let dangling_count = self
            .graph
            .node_indices()
            .filter(|&idx| self.out_weight(idx) == 0.0)
            .count();
        GraphStats {
            node_count: self.node_count(),
            implicit_node_count: self.implicit,
            arc_count: self.arc_count(),
            dangling_count,
        }
    }
}

/// Statistics about a [`CreditGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes, declared and implicit.
    pub node_count: usize,
    /// Nodes created only because an edge referenced them.
    pub implicit_node_count: usize,
    /// Number of arcs.
    pub arc_count: usize,
    /// Nodes with zero outgoing weight.
    pub dangling_count: usize,
}

/// The forward and reverse views plus the per-edge effective weights they share.
#[derive(Debug, Clone)]
pub struct GraphViews {
    /// Structural view, edges as authored.
    pub forward: CreditGraph,
    /// Credit-propagation view.
    pub reverse: CreditGraph,
    /// Effective weight per input edge, in input order.
    pub weights: Vec<f64>,
}

/// Build both views.
///
/// Every declared node appears in both views (in declaration order), even
/// when it has no edges.
pub fn build_views(
    table: &NodeTable<'_>,
    edges: &[Edge],
    normalized: &[f64],
    config: &Config,
) -> GraphViews {
    let weights = effective_weights(table, edges, normalized, config);

    let mut forward = CreditGraph::with_capacity(table.len(), edges.len());
    let mut reverse = CreditGraph::with_capacity(table.len(), edges.len());
    for node in table.iter() {
        forward.add_node(&node.id);
        reverse.add_node(&node.id);
    }

    for (i, (e, &weight)) in edges.iter().zip(&weights).enumerate() {
        for endpoint in [&e.from, &e.to] {
            if !table.contains(endpoint) {
                debug!(edge = i, node_id = %endpoint, "Edge references undeclared node");
            }
        }

        let arc = WeightedArc {
            edge_type: e.edge_type.clone(),
            weight,
            source_edge: i,
        };
        forward.add_arc(&e.from, &e.to, arc.clone());
        if table.kind(&e.from) == Some(NodeKind::Outcome) {
            reverse.add_arc(&e.from, &e.to, arc);
        } else {
            reverse.add_arc(&e.to, &e.from, arc);
        }
    }

    GraphViews {
        forward,
        reverse,
        weights,
    }
}
