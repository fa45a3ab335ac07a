//! Restart distribution for the reverse PageRank run.
//!
//! Reverse PageRank should restart where value was realized, so the restart
//! mass is concentrated on outcome nodes in proportion to the effective
//! weight of the edges they emit.

use crate::graph::{node_multiplier, NodeTable};
use crate::{Config, Edge, NodeId, NodeKind};
use std::collections::HashMap;

/// Build the (unnormalized) restart distribution.
///
/// `weights` must be the effective per-edge weights of the graph views
/// ([`GraphViews::weights`](crate::graph::GraphViews)), so both stages see
/// the same numbers.
///
/// - Edges leaving an outcome node add their weight to that node.
/// - With outcome nodes but no such edges, each outcome node gets its own
///   multiplier.
/// - With no outcome nodes, the result is empty and the solver falls back
///   to uniform restart.
pub fn build_personalization(
    table: &NodeTable<'_>,
    edges: &[Edge],
    weights: &[f64],
    config: &Config,
) -> HashMap<NodeId, f64> {
    let mut personalization: HashMap<NodeId, f64> = HashMap::new();
    let mut outcome_edges = 0usize;

    for (e, &w) in edges.iter().zip(weights) {
        if table.kind(&e.from) == Some(NodeKind::Outcome) {
            *personalization.entry(e.from.clone()).or_insert(0.0) += w;
            outcome_edges += 1;
        }
    }

    if outcome_edges == 0 {
        for node in table.of_kind(NodeKind::Outcome) {
            personalization.insert(node.id.clone(), node_multiplier(node, config));
        }
    }

    personalization
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EdgeWeightMode, Node};

    fn raw_config() -> Config {
        Config::default().with_edge_weight_mode(EdgeWeightMode::None)
    }

    #[test]
    fn test_accumulates_outcome_edges() {
        let nodes = vec![
            Node::outcome("downloads"),
            Node::outcome("grant"),
            Node::artifact("lib"),
            Node::agent("alice"),
        ];
        let edges = vec![
            Edge::new("downloads", "lib", "generates"),
            Edge::new("downloads", "alice", "generates"),
            Edge::new("grant", "lib", "funds"),
            Edge::new("alice", "lib", "creates"),
        ];
        let table = NodeTable::new(&nodes);
        let weights = vec![5.0, 2.0, 4.0, 100.0];
        let p = build_personalization(&table, &edges, &weights, &raw_config());

        assert_eq!(p.len(), 2);
        assert_eq!(p["downloads"], 7.0);
        assert_eq!(p["grant"], 4.0);
    }

    #[test]
    fn test_fallback_uses_outcome_multipliers() {
        let nodes = vec![
            Node::outcome("downloads").with_weight(3.0),
            Node::outcome("grant"),
            Node::agent("alice"),
        ];
        let edges = vec![Edge::new("alice", "grant", "applies")];
        let config = raw_config().with_node_type_multiplier(NodeKind::Outcome, 2.0);
        let table = NodeTable::new(&nodes);
        let p = build_personalization(&table, &edges, &[1.0], &config);

        assert_eq!(p["downloads"], 6.0);
        assert_eq!(p["grant"], 2.0);
        assert!(!p.contains_key("alice"));
    }

    #[test]
    fn test_no_outcomes_is_empty() {
        let nodes = vec![Node::agent("alice"), Node::artifact("lib")];
        let edges = vec![Edge::new("alice", "lib", "creates")];
        let table = NodeTable::new(&nodes);
        let p = build_personalization(&table, &edges, &[1.0], &raw_config());
        assert!(p.is_empty());
    }

    #[test]
    fn test_zero_weight_outcome_edges_do_not_fall_back() {
        let nodes = vec![Node::outcome("downloads"), Node::artifact("lib")];
        let edges = vec![Edge::new("downloads", "lib", "generates").with_weight(0.0)];
        let table = NodeTable::new(&nodes);
        let p = build_personalization(&table, &edges, &[0.0], &raw_config());
        assert_eq!(p["downloads"], 0.0);
    }

    #[test]
    fn test_undeclared_source_is_not_an_outcome() {
        let nodes = vec![Node::artifact("lib")];
        let edges = vec![Edge::new("ghost", "lib", "generates")];
        let table = NodeTable::new(&nodes);
        let p = build_personalization(&table, &edges, &[1.0], &raw_config());
        assert!(p.is_empty());
    }
}
