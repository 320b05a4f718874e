//! Game invariants - sanity checks that detect engine bugs.
//!
//! These should never trigger for states produced by [`CaptureState::apply`].

use crate::game::{CaptureState, Team};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &CaptureState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = state.board();
    let maze = &board.layout.maze;

    // Food is on the maze, carried, or returned
    let initial = board.layout.food.len();
    let carried: usize = state.agents().iter().map(|a| a.carrying.len()).sum();
    let returned: usize = state.agents().iter().map(|a| a.returned as usize).sum();
    let accounted = state.food_set().len() + carried + returned;
    if accounted != initial {
        violations.push(InvariantViolation {
            message: format!(
                "Food not conserved: {} on maze + {carried} carried + {returned} returned != {initial}",
                state.food_set().len()
            ),
        });
    }

    for food in state.food_set() {
        if !board.layout.food.contains(food) {
            violations.push(InvariantViolation {
                message: format!("Food at {food:?} was never in the layout"),
            });
        }
    }

    for agent in state.agents() {
        if let Some(cell) = agent.cell() {
            if maze.is_wall(cell) {
                violations.push(InvariantViolation {
                    message: format!("Agent {} inside wall at {cell:?}", agent.index),
                });
            }
            let on_enemy_half = !agent.team().is_home(cell.x, maze.width());
            if agent.is_pacman != on_enemy_half {
                violations.push(InvariantViolation {
                    message: format!(
                        "Agent {} pacman flag {} disagrees with cell {cell:?}",
                        agent.index, agent.is_pacman
                    ),
                });
            }
        }
        if !agent.is_pacman && !agent.carrying.is_empty() {
            violations.push(InvariantViolation {
                message: format!("Ghost {} is carrying food", agent.index),
            });
        }
    }

    // Score is the difference of returned food
    let expected = i64::from(state.returned(Team::Red)) - i64::from(state.returned(Team::Blue));
    if i64::from(state.score()) != expected {
        violations.push(InvariantViolation {
            message: format!("Score {} != returned difference {expected}", state.score()),
        });
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &CaptureState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &CaptureState) {}
