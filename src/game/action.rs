//! Movement actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single movement action.
///
/// The declaration order is the order in which the engine enumerates
/// legal actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move one cell up (`y + 1`).
    North,
    /// Move one cell down (`y - 1`).
    South,
    /// Move one cell right (`x + 1`).
    East,
    /// Move one cell left (`x - 1`).
    West,
    /// Stay in place.
    Stop,
}

impl Action {
    /// All actions in engine enumeration order.
    pub const ALL: [Action; 5] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Stop,
    ];

    /// The opposite direction. `Stop` has no reverse.
    #[must_use]
    pub const fn reverse(self) -> Option<Action> {
        match self {
            Action::North => Some(Action::South),
            Action::South => Some(Action::North),
            Action::East => Some(Action::West),
            Action::West => Some(Action::East),
            Action::Stop => None,
        }
    }

    /// Unit displacement `(dx, dy)` of this action.
    #[must_use]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Action::North => (0, 1),
            Action::South => (0, -1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stop => (0, 0),
        }
    }

    /// Lowercase name, as used on the command line and in JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Action::North => "north",
            Action::South => "south",
            Action::East => "east",
            Action::West => "west",
            Action::Stop => "stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Action::North),
            "south" | "s" => Ok(Action::South),
            "east" | "e" => Ok(Action::East),
            "west" | "w" => Ok(Action::West),
            "stop" => Ok(Action::Stop),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}
