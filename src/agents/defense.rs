//! Invader-blocking role.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::agents::selector::best_actions;
use crate::agents::{
    CaptureAgent, Feature, FeatureVector, ReflexCore, RoleId, WeightTable, evaluate,
    nearest_distance, score_actions,
};
use crate::config::AgentConfig;
use crate::game::{Action, AgentIndex, GameView};

/// Stays home, chases visible invaders and hovers near its capsules.
#[derive(Debug)]
pub struct DefensiveAgent<R = StdRng> {
    core: ReflexCore<R>,
    weights: WeightTable,
}

impl DefensiveAgent<StdRng> {
    /// Agent with a tie-break generator seeded from `seed`.
    #[must_use]
    pub fn new(index: AgentIndex, seed: u64, config: AgentConfig) -> Self {
        Self::with_rng(index, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DefensiveAgent<R> {
    /// Agent with an injected tie-break generator.
    #[must_use]
    pub fn with_rng(index: AgentIndex, config: AgentConfig, rng: R) -> Self {
        Self {
            core: ReflexCore::new(index, config, rng),
            weights: WeightTable::defensive(),
        }
    }

    /// Features of playing `action` in `state`.
    #[must_use]
    pub fn features<S: GameView>(&self, state: &S, action: Action) -> FeatureVector {
        let next = self.core.successor(state, action);
        let mut features = FeatureVector::new();

        let on_defense = next
            .agent_state(self.core.index())
            .is_some_and(|me| !me.is_pacman);
        features.set(Feature::OnDefense, if on_defense { 1.0 } else { 0.0 });

        let invaders: Vec<_> = self
            .core
            .opponents(&next)
            .into_iter()
            .filter_map(|i| next.agent_state(i))
            .filter(|enemy| enemy.is_pacman)
            .filter_map(|enemy| enemy.cell())
            .collect();
        features.set(
            Feature::NumInvaders,
            f64::from(u32::try_from(invaders.len()).unwrap_or(u32::MAX)),
        );

        if let Some(me) = self.core.cell(&next) {
            if let Some(dist) = nearest_distance(&next, me, invaders) {
                features.set(Feature::InvaderDistance, f64::from(dist));
            }
            let capsules = self.core.capsules_defending(&next);
            if let Some(dist) = nearest_distance(&next, me, capsules) {
                features.set(Feature::DistanceToCapsule, f64::from(dist));
            }
        }

        if action == Action::Stop {
            features.flag(Feature::Stop);
        }
        if self.core.is_reverse(state, action) {
            features.flag(Feature::Reverse);
        }

        trace!(agent = self.core.index(), %action, %features, "defense features");
        features
    }

    /// Linear score of playing `action` in `state`.
    #[must_use]
    pub fn evaluate<S: GameView>(&self, state: &S, action: Action) -> f64 {
        evaluate(&self.features(state, action), &self.weights)
    }
}

impl<S: GameView, R: Rng + std::fmt::Debug> CaptureAgent<S> for DefensiveAgent<R> {
    fn index(&self) -> AgentIndex {
        self.core.index()
    }

    fn role(&self) -> RoleId {
        RoleId::Defensive
    }

    fn time_budget(&self) -> Duration {
        self.core.time_budget()
    }

    fn register_initial_state(&mut self, state: &S) {
        self.core.register(state);
    }

    fn choose_action(&mut self, state: &S) -> Action {
        let legal = state.legal_actions(self.core.index());
        if legal.is_empty() {
            debug!(agent = self.core.index(), "no legal actions");
            return Action::Stop;
        }
        self.core.ensure_registered(state);

        let scored = score_actions(state, &legal, &self.weights, |s, a| self.features(s, a));
        if let Some(action) = self.core.low_food_retreat(state, &legal) {
            return action;
        }
        let candidates = best_actions(&scored);
        debug!(agent = self.core.index(), ?scored, ?candidates, "defense candidates");
        self.core.pick(&candidates)
    }
}
