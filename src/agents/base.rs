//! Shared machinery of the reflex agents.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::agents::selector;
use crate::config::AgentConfig;
use crate::game::{Action, AgentIndex, Coord, GameView, Position, Team};

/// Per-agent state and helpers common to every role.
#[derive(Debug)]
pub struct ReflexCore<R> {
    /// Agent index.
    index: AgentIndex,
    /// Team derived from the index.
    team: Team,
    /// Spawn cell, set by registration.
    start: Option<Coord>,
    /// Tunables.
    config: AgentConfig,
    /// Tie-break randomness.
    rng: R,
}

impl<R: Rng> ReflexCore<R> {
    /// New core for `index`.
    #[must_use]
    pub fn new(index: AgentIndex, config: AgentConfig, rng: R) -> Self {
        Self {
            index,
            team: Team::of_index(index),
            start: None,
            config,
            rng,
        }
    }

    /// Agent index.
    #[must_use]
    pub const fn index(&self) -> AgentIndex {
        self.index
    }

    /// Agent team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Tunables.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Per-turn decision budget.
    #[must_use]
    pub const fn time_budget(&self) -> Duration {
        self.config.time_budget()
    }

    /// Spawn cell, if registered.
    #[must_use]
    pub const fn start(&self) -> Option<Coord> {
        self.start
    }

    /// Capture the spawn cell from the initial state.
    pub fn register<S: GameView>(&mut self, state: &S) -> Option<Coord> {
        self.start = self.cell(state);
        debug!(agent = self.index, start = ?self.start, "registered");
        self.start
    }

    /// Register on first use if the host skipped registration.
    pub fn ensure_registered<S: GameView>(&mut self, state: &S) -> Option<Coord> {
        match self.start {
            Some(start) => Some(start),
            None => self.register(state),
        }
    }

    /// Own continuous position.
    #[must_use]
    pub fn position<S: GameView>(&self, state: &S) -> Option<Position> {
        state.agent_state(self.index).and_then(|a| a.position)
    }

    /// Own grid cell.
    #[must_use]
    pub fn cell<S: GameView>(&self, state: &S) -> Option<Coord> {
        self.position(state).map(Position::nearest)
    }

    /// Own facing direction.
    #[must_use]
    pub fn facing<S: GameView>(&self, state: &S) -> Action {
        state
            .agent_state(self.index)
            .map_or(Action::Stop, |a| a.direction)
    }

    /// Whether `action` turns the agent around.
    #[must_use]
    pub fn is_reverse<S: GameView>(&self, state: &S, action: Action) -> bool {
        self.facing(state).reverse() == Some(action)
    }

    /// One-ply successor, applying `action` a second time when the first
    /// move leaves the agent between cells.
    #[must_use]
    pub fn successor<S: GameView>(&self, state: &S, action: Action) -> S {
        let next = state.successor(self.index, action);
        if self.position(&next).is_some_and(|p| !p.is_aligned()) {
            next.successor(self.index, action)
        } else {
            next
        }
    }

    /// Food this agent's team can eat.
    #[must_use]
    pub fn food_to_eat<S: GameView>(&self, state: &S) -> Vec<Coord> {
        state.food(self.team.opponent())
    }

    /// Capsules on this agent's home half.
    #[must_use]
    pub fn capsules_defending<S: GameView>(&self, state: &S) -> Vec<Coord> {
        state.capsules(self.team)
    }

    /// Indices of the opposing agents.
    #[must_use]
    pub fn opponents<S: GameView>(&self, state: &S) -> Vec<AgentIndex> {
        state.team_indices(self.team.opponent())
    }

    /// Whether `cell` is on this agent's home half.
    #[must_use]
    pub fn is_home_side<S: GameView>(&self, state: &S, cell: Coord) -> bool {
        self.team.is_home(cell.x, state.layout_width())
    }

    /// Head for the spawn cell once little enemy food remains.
    ///
    /// Returns `None` while food is plentiful. Otherwise picks, among all
    /// legal actions, the one whose settled successor is closest to the
    /// start; ties go to the first action in engine order and an empty
    /// legal set yields `Stop`.
    #[must_use]
    pub fn low_food_retreat<S: GameView>(&self, state: &S, legal: &[Action]) -> Option<Action> {
        let food_left = self.food_to_eat(state).len();
        if food_left > self.config.low_food_threshold {
            return None;
        }
        let start = self.start?;
        let distances = legal.iter().map(|&action| {
            let next = self.successor(state, action);
            let dist = self
                .cell(&next)
                .map_or(u32::MAX, |cell| state.maze_distance(start, cell));
            (action, dist)
        });
        let chosen = selector::closest(distances).unwrap_or(Action::Stop);
        debug!(agent = self.index, food_left, %chosen, "low food retreat");
        Some(chosen)
    }

    /// Uniform random choice among candidates.
    pub fn pick(&mut self, candidates: &[Action]) -> Action {
        selector::pick(candidates, &mut self.rng)
    }
}

/// Smallest maze distance from `from` to any of `targets`.
#[must_use]
pub fn nearest_distance<S: GameView>(
    state: &S,
    from: Coord,
    targets: impl IntoIterator<Item = Coord>,
) -> Option<u32> {
    targets
        .into_iter()
        .map(|target| state.maze_distance(from, target))
        .min()
}
