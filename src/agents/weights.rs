//! Fixed per-role weight tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agents::Feature;

/// Weight per feature. Features without a weight contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable(BTreeMap<Feature, f64>);

impl WeightTable {
    /// Weights of the food-seeking role.
    #[must_use]
    pub fn offensive() -> Self {
        [
            (Feature::SuccessorScore, 100.0),
            (Feature::DistanceToFood, -1.0),
            (Feature::GhostDistance, 20.0),
            (Feature::AvoidGhost, 1000.0),
            (Feature::Stop, -1000.0),
            (Feature::Reverse, -5.0),
            (Feature::InSafeZone, 100.0),
            (Feature::RetreatToSafeZone, 50.0),
        ]
        .into_iter()
        .collect()
    }

    /// Weights of the invader-blocking role.
    #[must_use]
    pub fn defensive() -> Self {
        [
            (Feature::NumInvaders, -1000.0),
            (Feature::OnDefense, 100.0),
            (Feature::InvaderDistance, -10.0),
            (Feature::DistanceToCapsule, -2.0),
            (Feature::Stop, -100.0),
            (Feature::Reverse, -2.0),
        ]
        .into_iter()
        .collect()
    }

    /// Weight of a feature, zero when absent.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.0.get(&feature).copied().unwrap_or(0.0)
    }

    /// Weighted features in name order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }
}

impl FromIterator<(Feature, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (Feature, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
