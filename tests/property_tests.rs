//! Property-based tests for credit attribution.
//!
//! These tests verify invariants that should hold for any attribution graph:
//! - PageRank conserves probability mass
//! - Rewards split the whole pool
//! - Evaluation is deterministic and linear in alpha
//! - Normalization groups are self-consistent

use creditrank::normalize::normalize_weights;
use creditrank::{reward, Config, CreditEngine, Edge, EdgeWeightMode, Node, NodeId};
use proptest::prelude::*;
use std::collections::HashMap;

const EDGE_TYPES: [&str; 4] = ["creates", "depends_on", "generates", "funds"];

prop_compose! {
    /// A graph with at least one agent. Edge weights are strictly positive,
    /// so outcome personalization never sums to zero.
    fn arb_graph()(
        agents in 1usize..5,
        artifacts in 0usize..4,
        outcomes in 0usize..3,
        raw_edges in prop::collection::vec(
            (0usize..12, 0usize..12, 0usize..EDGE_TYPES.len(), 0.1f64..10.0),
            0..30,
        ),
    ) -> (Vec<Node>, Vec<Edge>) {
        let mut nodes: Vec<Node> = Vec::new();
        nodes.extend((0..agents).map(|i| Node::agent(format!("agent{i}"))));
        nodes.extend((0..artifacts).map(|i| Node::artifact(format!("artifact{i}"))));
        nodes.extend((0..outcomes).map(|i| Node::outcome(format!("outcome{i}"))));

        let n = nodes.len();
        let edges = raw_edges
            .into_iter()
            .map(|(from, to, ty, w)| {
                Edge::new(nodes[from % n].id.clone(), nodes[to % n].id.clone(), EDGE_TYPES[ty])
                    .with_weight(w)
            })
            .collect();
        (nodes, edges)
    }
}

fn arb_mode() -> impl Strategy<Value = EdgeWeightMode> {
    prop_oneof![
        Just(EdgeWeightMode::None),
        Just(EdgeWeightMode::PerTypeSum),
        Just(EdgeWeightMode::PerSourceTypeSum),
        Just(EdgeWeightMode::PerTypeMax),
    ]
}

mod pagerank_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn runs_conserve_probability(
            (nodes, edges) in arb_graph(),
            mode in arb_mode(),
            damping in 0.0f64..=0.85,
        ) {
            let config = Config::default().with_edge_weight_mode(mode).with_damping(damping);
            let engine = CreditEngine::new(config).unwrap();
            let eval = engine.evaluate_detailed(&nodes, &edges).unwrap();

            for run in [&eval.forward, &eval.reverse] {
                let total: f64 = run.scores.values().sum();
                prop_assert!((total - 1.0).abs() < 1e-9, "total = {}", total);
                prop_assert!(run.scores.values().all(|s| *s >= 0.0));
                prop_assert_eq!(run.scores.len(), nodes.len());
            }
        }

        #[test]
        fn evaluation_is_deterministic((nodes, edges) in arb_graph()) {
            let engine = CreditEngine::default();
            let first = engine.evaluate(&nodes, &edges).unwrap();
            let second = engine.evaluate(&nodes, &edges).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn edge_order_does_not_matter((nodes, edges) in arb_graph()) {
            let engine = CreditEngine::default();
            let mut reversed = edges.clone();
            reversed.reverse();

            let a = engine.evaluate(&nodes, &edges).unwrap();
            let b = engine.evaluate(&nodes, &reversed).unwrap();
            for (id, score) in &a {
                prop_assert!((score - b[id]).abs() < 1e-9, "{}: {} vs {}", id, score, b[id]);
            }
        }
    }
}

mod hybrid_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn hybrid_is_linear_in_alpha(
            (nodes, edges) in arb_graph(),
            lo in 0.0f64..=1.0,
            hi in 0.0f64..=1.0,
        ) {
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            let at = |alpha: f64| {
                CreditEngine::new(Config::default().with_alpha(alpha))
                    .unwrap()
                    .evaluate_detailed(&nodes, &edges)
                    .unwrap()
            };
            let low = at(lo);
            let high = at(hi);

            for (a, b) in low.agents.iter().zip(&high.agents) {
                prop_assert_eq!(&a.id, &b.id);
                let (f, r) = (a.forward, a.reverse);
                prop_assert!(a.hybrid >= f.min(r) - 1e-12 && a.hybrid <= f.max(r) + 1e-12);
                // Moving alpha up moves the score toward the forward value.
                prop_assert!((b.hybrid - a.hybrid) * (f - r) >= -1e-12);
            }
        }

        #[test]
        fn only_agents_are_scored((nodes, edges) in arb_graph()) {
            let scores = CreditEngine::default().evaluate(&nodes, &edges).unwrap();
            let agents = nodes.iter().filter(|n| n.id.as_str().starts_with("agent")).count();
            prop_assert_eq!(scores.len(), agents);
        }
    }
}

mod reward_props {
    use super::*;

    fn arb_scores() -> impl Strategy<Value = HashMap<NodeId, f64>> {
        prop::collection::hash_map("[a-z]{1,8}".prop_map(NodeId::from), 0.0f64..1.0, 1..20)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn reward_sums_to_pool(scores in arb_scores(), pool in 1.0f64..1e6) {
            let total: f64 = scores.values().sum();
            prop_assume!(total > 0.0);

            let payout = reward(&scores, pool);
            let paid: f64 = payout.values().sum();
            prop_assert!((paid - pool).abs() <= pool * 1e-9, "paid {} of {}", paid, pool);
            prop_assert_eq!(payout.len(), scores.len());
        }

        #[test]
        fn zero_scores_pass_through(
            ids in prop::collection::hash_set("[a-z]{1,8}", 0..10),
            pool in 1.0f64..1e6,
        ) {
            let scores: HashMap<NodeId, f64> =
                ids.into_iter().map(|id| (NodeId::from(id), 0.0)).collect();
            prop_assert_eq!(reward(&scores, pool), scores);
        }
    }
}

mod normalize_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn per_type_sum_groups_sum_to_one((_, edges) in arb_graph()) {
            let config = Config::default().normalization;
            let normalized = normalize_weights(&edges, &config);

            let mut raw: HashMap<&str, f64> = HashMap::new();
            let mut scaled: HashMap<&str, f64> = HashMap::new();
            for (e, w) in edges.iter().zip(&normalized) {
                *raw.entry(e.edge_type.as_str()).or_default() += e.weight_or_default();
                *scaled.entry(e.edge_type.as_str()).or_default() += w;
            }
            for (ty, sum) in raw {
                let expected = 1.0 / (1.0 + config.epsilon / sum);
                prop_assert!((scaled[ty] - expected).abs() < 1e-9, "{}: {}", ty, scaled[ty]);
            }
        }

        #[test]
        fn normalized_values_keep_input_order((_, edges) in arb_graph(), mode in arb_mode()) {
            let config = Config::default().with_edge_weight_mode(mode).normalization;
            let normalized = normalize_weights(&edges, &config);
            prop_assert_eq!(normalized.len(), edges.len());
            prop_assert!(normalized.iter().all(|w| w.is_finite() && *w >= 0.0));
        }
    }
}
