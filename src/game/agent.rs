//! Teams and per-agent engine state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Action, Coord, Position};

/// Index of an agent in turn order.
pub type AgentIndex = usize;

/// One of the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Even agent indices, home half `x < width / 2`.
    Red,
    /// Odd agent indices, home half `x >= width / 2`.
    Blue,
}

impl Team {
    /// Both teams, red first.
    pub const BOTH: [Team; 2] = [Team::Red, Team::Blue];

    /// Team of an agent index.
    #[must_use]
    pub const fn of_index(index: AgentIndex) -> Self {
        if index % 2 == 0 { Team::Red } else { Team::Blue }
    }

    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Whether column `x` lies on this team's home half of a maze `width`
    /// cells wide.
    #[must_use]
    pub const fn is_home(self, x: i32, width: i32) -> bool {
        match self {
            Team::Red => x < width / 2,
            Team::Blue => x >= width / 2,
        }
    }

    /// Lowercase team name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    /// Sign of this team's contribution to the score (red positive).
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Team::Red => 1,
            Team::Blue => -1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine-side state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Turn-order index.
    pub index: AgentIndex,
    /// Spawn cell.
    pub start: Coord,
    /// Current position, `None` when hidden from the observer.
    pub position: Option<Position>,
    /// Direction of the last move. `Stop` never overwrites it.
    pub direction: Action,
    /// Whether the agent is on the enemy half.
    pub is_pacman: bool,
    /// Moves left while scared.
    pub scared_timer: u32,
    /// Food picked up and not yet returned home.
    pub carrying: Vec<Coord>,
    /// Food returned home over the game.
    pub returned: u32,
}

impl AgentState {
    /// Fresh state at the spawn cell.
    #[must_use]
    pub fn spawn(index: AgentIndex, start: Coord) -> Self {
        Self {
            index,
            start,
            position: Some(start.into()),
            direction: Action::Stop,
            is_pacman: false,
            scared_timer: 0,
            carrying: Vec::new(),
            returned: 0,
        }
    }

    /// The agent's team.
    #[must_use]
    pub const fn team(&self) -> Team {
        Team::of_index(self.index)
    }

    /// Nearest grid cell of a visible agent.
    #[must_use]
    pub fn cell(&self) -> Option<Coord> {
        self.position.map(Position::nearest)
    }

    /// Whether the agent is a ghost and currently scared.
    #[must_use]
    pub const fn is_scared(&self) -> bool {
        !self.is_pacman && self.scared_timer > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_of_index() {
        assert_eq!(Team::of_index(0), Team::Red);
        assert_eq!(Team::of_index(1), Team::Blue);
        assert_eq!(Team::of_index(2), Team::Red);
        assert_eq!(Team::of_index(3).opponent(), Team::Red);
    }

    #[test]
    fn test_home_halves_partition_columns() {
        let width = 10;
        for x in 0..width {
            assert_ne!(Team::Red.is_home(x, width), Team::Blue.is_home(x, width));
        }
        assert!(Team::Red.is_home(4, width));
        assert!(Team::Blue.is_home(5, width));
    }

    #[test]
    fn test_spawn_state() {
        let state = AgentState::spawn(1, Coord::new(3, 4));
        assert_eq!(state.team(), Team::Blue);
        assert_eq!(state.cell(), Some(Coord::new(3, 4)));
        assert!(!state.is_pacman);
        assert!(!state.is_scared());
    }
}
