//! Linear scoring of feature vectors.

use std::collections::BTreeSet;

use crate::agents::{Feature, FeatureVector, WeightTable};
use crate::game::Action;

/// Dot product of features and weights over the union of their keys.
///
/// A key missing on either side contributes zero.
#[must_use]
pub fn evaluate(features: &FeatureVector, weights: &WeightTable) -> f64 {
    let keys: BTreeSet<Feature> = features
        .iter()
        .map(|(k, _)| k)
        .chain(weights.iter().map(|(k, _)| k))
        .collect();
    keys.into_iter()
        .map(|k| features.get(k) * weights.get(k))
        .sum()
}

/// Score every legal action with a feature extractor, keeping order.
#[must_use]
pub fn score_actions<S, F>(
    state: &S,
    legal: &[Action],
    weights: &WeightTable,
    features: F,
) -> Vec<(Action, f64)>
where
    F: Fn(&S, Action) -> FeatureVector,
{
    legal
        .iter()
        .map(|&action| (action, evaluate(&features(state, action), weights)))
        .collect()
}
