//! Named features and sparse feature vectors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Every feature either role can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Negative count of enemy food left after the move.
    SuccessorScore,
    /// Maze distance to the nearest enemy food.
    DistanceToFood,
    /// Maze distance to the nearest visible enemy ghost.
    GhostDistance,
    /// Set when a ghost is dangerously close.
    AvoidGhost,
    /// Set when the action is `Stop`.
    Stop,
    /// Set when the action reverses the current facing.
    Reverse,
    /// Set while retreating and already home.
    InSafeZone,
    /// Negative distance to start while retreating on the enemy half.
    RetreatToSafeZone,
    /// Set when the agent stays a ghost.
    OnDefense,
    /// Number of visible invaders.
    NumInvaders,
    /// Maze distance to the nearest visible invader.
    InvaderDistance,
    /// Maze distance to the nearest defended capsule.
    DistanceToCapsule,
}

impl Feature {
    /// Every feature, in name order.
    pub const ALL: [Feature; 12] = [
        Feature::SuccessorScore,
        Feature::DistanceToFood,
        Feature::GhostDistance,
        Feature::AvoidGhost,
        Feature::Stop,
        Feature::Reverse,
        Feature::InSafeZone,
        Feature::RetreatToSafeZone,
        Feature::OnDefense,
        Feature::NumInvaders,
        Feature::InvaderDistance,
        Feature::DistanceToCapsule,
    ];

    /// Stable snake_case identifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Feature::SuccessorScore => "successor_score",
            Feature::DistanceToFood => "distance_to_food",
            Feature::GhostDistance => "ghost_distance",
            Feature::AvoidGhost => "avoid_ghost",
            Feature::Stop => "stop",
            Feature::Reverse => "reverse",
            Feature::InSafeZone => "in_safe_zone",
            Feature::RetreatToSafeZone => "retreat_to_safe_zone",
            Feature::OnDefense => "on_defense",
            Feature::NumInvaders => "num_invaders",
            Feature::InvaderDistance => "invader_distance",
            Feature::DistanceToCapsule => "distance_to_capsule",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sparse feature values. An absent feature reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(BTreeMap<Feature, f64>);

impl FeatureVector {
    /// Empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature, replacing any previous value.
    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0.insert(feature, value);
    }

    /// Set a binary indicator feature to 1.
    pub fn flag(&mut self, feature: Feature) {
        self.set(feature, 1.0);
    }

    /// Value of a feature, zero when absent.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.0.get(&feature).copied().unwrap_or(0.0)
    }

    /// Whether the feature is present.
    #[must_use]
    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains_key(&feature)
    }

    /// Present features in name order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    /// Number of present features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no feature is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Feature, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (Feature, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (feature, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{feature}: {value}")?;
        }
        f.write_str("}")
    }
}
