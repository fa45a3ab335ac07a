//! Edge weight normalization.
//!
//! Each edge's raw weight is first transformed ([`WeightTransform`]) and then
//! scaled against the other edges in its group ([`EdgeWeightMode`]). Groups
//! are keyed by value (edge type, or source plus type), so reordering the
//! edge list never changes any edge's normalized value. Every denominator
//! carries `epsilon`, which keeps empty or all-zero groups finite.

use crate::{Edge, EdgeType, EdgeWeightMode, NodeId, NormalizationConfig, WeightTransform};
use std::collections::HashMap;

/// Apply the transform stage to a raw weight (`None` counts as 1).
pub fn transform_weight(raw: Option<f64>, transform: WeightTransform) -> f64 {
    let w = raw.unwrap_or(1.0);
    match transform {
        WeightTransform::None => w,
        WeightTransform::Log1p => w.max(0.0).ln_1p(),
    }
}

/// Normalize every edge weight.
///
/// Returns one value per edge, in input order.
pub fn normalize_weights(edges: &[Edge], config: &NormalizationConfig) -> Vec<f64> {
    let transformed: Vec<f64> = edges
        .iter()
        .map(|e| transform_weight(e.weight, config.transform))
        .collect();
    let eps = config.epsilon;

    match config.edge_weight {
        EdgeWeightMode::None => transformed,
        EdgeWeightMode::PerTypeSum => {
            let mut sums: HashMap<&EdgeType, f64> = HashMap::new();
            for (e, &w) in edges.iter().zip(&transformed) {
                *sums.entry(&e.edge_type).or_insert(0.0) += w;
            }
            edges
                .iter()
                .zip(&transformed)
                .map(|(e, &w)| w / (sums[&e.edge_type] + eps))
                .collect()
        }
        EdgeWeightMode::PerTypeMax => {
            let mut maxes: HashMap<&EdgeType, f64> = HashMap::new();
            for (e, &w) in edges.iter().zip(&transformed) {
                let m = maxes.entry(&e.edge_type).or_insert(f64::NEG_INFINITY);
                *m = m.max(w);
            }
            edges
                .iter()
                .zip(&transformed)
                .map(|(e, &w)| w / (maxes[&e.edge_type] + eps))
                .collect()
        }
        EdgeWeightMode::PerSourceTypeSum => {
            let mut sums: HashMap<(&NodeId, &EdgeType), f64> = HashMap::new();
            for (e, &w) in edges.iter().zip(&transformed) {
                *sums.entry((&e.from, &e.edge_type)).or_insert(0.0) += w;
            }
            edges
                .iter()
                .zip(&transformed)
                .map(|(e, &w)| w / (sums[&(&e.from, &e.edge_type)] + eps))
                .collect()
        }
    }
}
