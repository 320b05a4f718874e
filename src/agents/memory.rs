//! Per-agent memory of the offensive role.

use crate::game::{Action, Coord, Position};

/// What the offensive agent remembers between turns.
///
/// `food_collected` only grows by eating and drops back to zero once the
/// agent is home with at least the retreat threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoleMemory {
    /// Food eaten since the last return home.
    pub food_collected: u32,
    /// Position before the previous move.
    pub last_position: Option<Position>,
    /// The previous move.
    pub last_action: Option<Action>,
    /// Spawn cell, fixed at registration.
    pub start_position: Option<Coord>,
}

impl RoleMemory {
    /// Fresh memory for an agent spawning at `start`.
    #[must_use]
    pub const fn new(start: Coord) -> Self {
        Self {
            food_collected: 0,
            last_position: None,
            last_action: None,
            start_position: Some(start),
        }
    }

    /// Whether the agent did not net-move since the previous turn.
    #[must_use]
    pub fn is_repeat(&self, current: Position) -> bool {
        self.last_position == Some(current)
    }

    /// Whether enough food is carried to head home.
    #[must_use]
    pub const fn is_retreating(&self, threshold: u32) -> bool {
        self.food_collected >= threshold
    }

    /// Record a committed move.
    ///
    /// `ate` tells whether the move consumed food, `home_after` whether the
    /// settled position is on the agent's own half.
    pub fn record(
        &mut self,
        from: Option<Position>,
        action: Action,
        ate: bool,
        home_after: bool,
        threshold: u32,
    ) {
        if from.is_some() {
            self.last_position = from;
        }
        self.last_action = Some(action);
        if ate {
            self.food_collected += 1;
        }
        if self.is_retreating(threshold) && home_after {
            self.food_collected = 0;
        }
    }
}
