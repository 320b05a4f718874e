//! Food-seeking role.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::agents::selector::{avoid_oscillation, avoid_stop, best_actions};
use crate::agents::{
    CaptureAgent, Feature, FeatureVector, ReflexCore, RoleId, RoleMemory, WeightTable, evaluate,
    nearest_distance, score_actions,
};
use crate::config::AgentConfig;
use crate::game::{Action, AgentIndex, GameView, Position};

/// Eats enemy food, dodges ghosts and banks food once it carries enough.
#[derive(Debug)]
pub struct OffensiveAgent<R = StdRng> {
    core: ReflexCore<R>,
    memory: RoleMemory,
    weights: WeightTable,
}

impl OffensiveAgent<StdRng> {
    /// Agent with a tie-break generator seeded from `seed`.
    #[must_use]
    pub fn new(index: AgentIndex, seed: u64, config: AgentConfig) -> Self {
        Self::with_rng(index, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> OffensiveAgent<R> {
    /// Agent with an injected tie-break generator.
    #[must_use]
    pub fn with_rng(index: AgentIndex, config: AgentConfig, rng: R) -> Self {
        Self {
            core: ReflexCore::new(index, config, rng),
            memory: RoleMemory::default(),
            weights: WeightTable::offensive(),
        }
    }

    /// Current memory.
    #[must_use]
    pub const fn memory(&self) -> &RoleMemory {
        &self.memory
    }

    /// Mutable memory, for hosts restoring an agent mid-game.
    pub const fn memory_mut(&mut self) -> &mut RoleMemory {
        &mut self.memory
    }

    /// Features of playing `action` in `state`.
    #[must_use]
    pub fn features<S: GameView>(&self, state: &S, action: Action) -> FeatureVector {
        let config = self.core.config();
        let next = self.core.successor(state, action);
        let mut features = FeatureVector::new();

        let food = self.core.food_to_eat(&next);
        features.set(Feature::SuccessorScore, -count(food.len()));

        if action == Action::Stop {
            features.flag(Feature::Stop);
        }
        if self.core.is_reverse(state, action) {
            features.flag(Feature::Reverse);
        }

        let Some(me) = self.core.cell(&next) else {
            return features;
        };

        if let Some(dist) = nearest_distance(&next, me, food) {
            features.set(Feature::DistanceToFood, f64::from(dist));
        }

        let ghosts = self
            .core
            .opponents(&next)
            .into_iter()
            .filter_map(|i| next.agent_state(i))
            .filter(|enemy| !enemy.is_pacman)
            .filter_map(|enemy| enemy.cell());
        if let Some(dist) = nearest_distance(&next, me, ghosts) {
            features.set(Feature::GhostDistance, f64::from(dist));
            if dist < config.ghost_danger_distance {
                features.flag(Feature::AvoidGhost);
            }
        }

        if self.memory.is_retreating(config.retreat_threshold) {
            if self.core.is_home_side(&next, me) {
                features.flag(Feature::InSafeZone);
            } else if let Some(start) = self.core.start() {
                let dist = next.maze_distance(me, start);
                features.set(Feature::RetreatToSafeZone, -f64::from(dist));
            }
        }

        trace!(agent = self.core.index(), %action, %features, "offense features");
        features
    }

    /// Linear score of playing `action` in `state`.
    #[must_use]
    pub fn evaluate<S: GameView>(&self, state: &S, action: Action) -> f64 {
        evaluate(&self.features(state, action), &self.weights)
    }

    /// Update memory after committing to `chosen`.
    fn remember<S: GameView>(&mut self, state: &S, from: Option<Position>, chosen: Action) {
        let next = self.core.successor(state, chosen);
        let ate = self.core.food_to_eat(&next).len() < self.core.food_to_eat(state).len();
        let home_after = self
            .core
            .cell(&next)
            .is_some_and(|cell| self.core.is_home_side(&next, cell));
        let threshold = self.core.config().retreat_threshold;
        self.memory.record(from, chosen, ate, home_after, threshold);
    }
}

impl<S: GameView, R: Rng + std::fmt::Debug> CaptureAgent<S> for OffensiveAgent<R> {
    fn index(&self) -> AgentIndex {
        self.core.index()
    }

    fn role(&self) -> RoleId {
        RoleId::Offensive
    }

    fn time_budget(&self) -> Duration {
        self.core.time_budget()
    }

    fn register_initial_state(&mut self, state: &S) {
        if let Some(start) = self.core.register(state) {
            self.memory = RoleMemory::new(start);
        }
    }

    fn choose_action(&mut self, state: &S) -> Action {
        let legal = state.legal_actions(self.core.index());
        if legal.is_empty() {
            debug!(agent = self.core.index(), "no legal actions");
            return Action::Stop;
        }
        if self.core.start().is_none() {
            self.register_initial_state(state);
        }

        let scored = score_actions(state, &legal, &self.weights, |s, a| self.features(s, a));
        let current = self.core.position(state);

        let chosen = if let Some(action) = self.core.low_food_retreat(state, &legal) {
            action
        } else {
            let mut candidates = best_actions(&scored);
            if current.is_some_and(|p| self.memory.is_repeat(p)) {
                candidates = avoid_oscillation(candidates, &legal, self.memory.last_action);
            }
            let candidates = avoid_stop(candidates);
            debug!(
                agent = self.core.index(),
                ?scored,
                ?candidates,
                food_collected = self.memory.food_collected,
                "offense candidates"
            );
            self.core.pick(&candidates)
        };

        self.remember(state, current, chosen);
        chosen
    }
}

/// Collection size as a feature value.
fn count(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::game::{CaptureState, Coord, Layout};

    // Width 10, midline 5. Red agent 0 starts at (1, 2).
    const FIELD: &str = "\
%%%%%%%%%%
%1   ...2%
%3  .  .4%
%%%%%%%%%%";

    fn field() -> CaptureState {
        CaptureState::new(Layout::parse(FIELD).unwrap(), 300)
    }

    // Mirror image about row 3. From (8, 3), North and South tie.
    const FORK: &str = "\
%%%%%%%%%%
%1    . 2%
% %%%%%% %
%3   .   %
% %%%%%% %
%     . 4%
%%%%%%%%%%";

    // One row, midline 8. Red agent 0 starts at (7, 1).
    const DEAD_END: &str = "\
%%%%%%%%%%%%%%%%
%3     1 ....24%
%%%%%%%%%%%%%%%%";

    fn agent(state: &CaptureState) -> OffensiveAgent {
        seeded(state, 11)
    }

    fn seeded(state: &CaptureState, seed: u64) -> OffensiveAgent {
        let mut agent = OffensiveAgent::new(0, seed, AgentConfig::default());
        CaptureAgent::<CaptureState>::register_initial_state(&mut agent, state);
        agent
    }

    fn candidates(agent: &OffensiveAgent, state: &CaptureState) -> Vec<Action> {
        let scored: Vec<(Action, f64)> = state
            .legal_actions(0)
            .into_iter()
            .map(|action| (action, agent.evaluate(state, action)))
            .collect();
        best_actions(&scored)
    }

    fn fork_at_junction() -> (CaptureState, CaptureState) {
        let initial = CaptureState::new(Layout::parse(FORK).unwrap(), 300);
        let mut state = initial.clone();
        state.place(0, Coord::new(8, 3).into()).unwrap();
        (initial, state)
    }

    #[test]
    fn test_register_captures_start() {
        let state = field();
        let agent = agent(&state);
        assert_eq!(agent.memory().start_position, Some(Coord::new(1, 2)));
        assert_eq!(agent.memory().food_collected, 0);
    }

    #[test]
    fn test_basic_features() {
        let state = field();
        let agent = agent(&state);
        let features = agent.features(&state, Action::East);
        assert!((features.get(Feature::SuccessorScore) + 4.0).abs() < 1e-9);
        // Nearest enemy food from (2, 2) is (5, 2).
        assert!((features.get(Feature::DistanceToFood) - 3.0).abs() < 1e-9);
        assert!((features.get(Feature::GhostDistance) - 6.0).abs() < 1e-9);
        assert!(!features.contains(Feature::AvoidGhost));
        assert!(!features.contains(Feature::Stop));
        let stop = agent.features(&state, Action::Stop);
        assert!(stop.contains(Feature::Stop));
    }

    #[test]
    fn test_retreat_feature_on_enemy_half() {
        let mut state = field();
        let mut agent = agent(&state);
        state.place(0, Coord::new(6, 1).into()).unwrap();
        agent.memory_mut().food_collected = 3;

        let features = agent.features(&state, Action::North);
        assert!(!features.contains(Feature::InSafeZone));
        let expected = -f64::from(state.maze_distance(Coord::new(6, 2), Coord::new(1, 2)));
        assert!((features.get(Feature::RetreatToSafeZone) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_safe_zone_flag_at_home() {
        let mut state = field();
        let mut agent = agent(&state);
        state.place(0, Coord::new(5, 1).into()).unwrap();
        agent.memory_mut().food_collected = 3;
        let features = agent.features(&state, Action::West);
        assert!(features.contains(Feature::InSafeZone));
        assert!(!features.contains(Feature::RetreatToSafeZone));
    }

    #[test]
    fn test_ghost_features() {
        let mut state = field();
        let agent = agent(&state);
        state.place(0, Coord::new(6, 1).into()).unwrap();
        // Blue agent 3 guards (8, 1), two cells east of (6, 1).
        let features = agent.features(&state, Action::East);
        assert!((features.get(Feature::GhostDistance) - 1.0).abs() < 1e-9);
        assert!(features.contains(Feature::AvoidGhost));
    }

    #[test]
    fn test_reverse_flag_follows_facing() {
        let mut state = field();
        let agent = agent(&state);
        state.apply(0, Action::East).unwrap();
        assert!(agent.features(&state, Action::West).contains(Feature::Reverse));
        assert!(!agent.features(&state, Action::East).contains(Feature::Reverse));
    }

    #[test]
    fn test_never_stops_with_alternatives() {
        let state = field();
        let mut agent = agent(&state);
        for _ in 0..20 {
            assert_ne!(agent.choose_action(&state), Action::Stop);
        }
    }

    #[test]
    fn test_choose_action_updates_memory() {
        let mut state = field();
        let mut agent = agent(&state);
        state.place(0, Coord::new(5, 1).into()).unwrap();
        let chosen = agent.choose_action(&state);
        assert_eq!(agent.memory().last_action, Some(chosen));
        assert_eq!(agent.memory().last_position, Some(Position::new(5.0, 1.0)));
    }

    #[test]
    fn test_eating_increments_counter() {
        let mut state = field();
        let mut agent = agent(&state);
        state.place(0, Coord::new(4, 2).into()).unwrap();
        let chosen = agent.choose_action(&state);
        assert_eq!(chosen, Action::East);
        assert_eq!(agent.memory().food_collected, 1);
    }

    #[test]
    fn test_tied_moves_split_across_seeds() {
        let (initial, state) = fork_at_junction();
        assert_eq!(
            candidates(&seeded(&initial, 0), &state),
            vec![Action::North, Action::South]
        );

        let chosen: BTreeSet<Action> = (0..40)
            .map(|seed| seeded(&initial, seed).choose_action(&state))
            .collect();
        assert_eq!(chosen, BTreeSet::from([Action::North, Action::South]));
    }

    #[test]
    fn test_repeat_drops_last_action_from_tie() {
        let (initial, state) = fork_at_junction();
        for (last, other) in [(Action::North, Action::South), (Action::South, Action::North)] {
            for seed in 0..30 {
                let mut agent = seeded(&initial, seed);
                agent.memory_mut().last_position = Some(Position::new(8.0, 3.0));
                agent.memory_mut().last_action = Some(last);
                assert_eq!(agent.choose_action(&state), other, "seed {seed}");
            }
        }
    }

    #[test]
    fn test_repeat_with_single_best_opens_legal_set() {
        let initial = field();
        let mut state = initial.clone();
        state.place(0, Coord::new(4, 2).into()).unwrap();
        let best = candidates(&agent(&initial), &state);
        assert_eq!(best, vec![Action::East]);

        let legal = state.legal_actions(0);
        let mut chosen = BTreeSet::new();
        for seed in 0..30 {
            let mut agent = seeded(&initial, seed);
            agent.memory_mut().last_position = Some(Position::new(4.0, 2.0));
            agent.memory_mut().last_action = Some(Action::East);
            let action = agent.choose_action(&state);
            assert!(legal.contains(&action));
            assert_ne!(action, Action::Stop);
            chosen.insert(action);
        }
        assert!(chosen.len() > 1, "only {chosen:?}");
    }

    #[test]
    fn test_stop_tie_resolves_to_the_move() {
        let initial = CaptureState::new(Layout::parse(DEAD_END).unwrap(), 300);
        let mut state = initial.clone();
        // Both ghosts block the exit of the dead end at (14, 1).
        state.place(3, Coord::new(13, 1).into()).unwrap();
        // Carry the food at (9, 1) so dying puts it back.
        state.place(0, Coord::new(10, 1).into()).unwrap();
        state.apply(0, Action::West).unwrap();
        state.place(0, Coord::new(14, 1).into()).unwrap();
        assert_eq!(state.agent_state(0).unwrap().carrying.len(), 1);

        // Stop keeps the ghost bonus; West dies but restores the food.
        let agent = agent(&initial);
        assert!((agent.evaluate(&state, Action::Stop) + 282.0).abs() < 1e-9);
        assert!((agent.evaluate(&state, Action::West) + 282.0).abs() < 1e-9);
        assert_eq!(candidates(&agent, &state), vec![Action::West, Action::Stop]);

        for seed in 0..30 {
            assert_eq!(seeded(&initial, seed).choose_action(&state), Action::West);
        }
    }
}
