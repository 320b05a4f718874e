//! Error types for the host side of the crate.
//!
//! The decision core never fails: every degenerate input is resolved by
//! policy. These errors cover layout parsing, the reference engine, team
//! construction, match running, configuration and replay.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::game::{Action, AgentIndex};

/// Layout text could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout has no non-empty lines.
    #[error("layout is empty")]
    Empty,
    /// A dimension does not fit the coordinate type.
    #[error("layout dimension {0} is too large")]
    TooLarge(usize),
    /// Lines have different lengths.
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        /// Zero-based row in the text.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
    /// A character outside the layout alphabet.
    #[error("unknown tile '{ch}' at row {row}, column {col}")]
    UnknownTile {
        /// The offending character.
        ch: char,
        /// Zero-based row in the text.
        row: usize,
        /// Zero-based column in the text.
        col: usize,
    },
    /// An agent digit appears twice.
    #[error("agent {0} placed more than once")]
    DuplicateAgent(usize),
    /// A gap in the agent digits.
    #[error("agent {0} is missing")]
    MissingAgent(usize),
    /// Agents must come in red/blue pairs.
    #[error("layout places {0} agents, need an even number of at least 2")]
    AgentCount(usize),
}

/// An operation on the reference engine was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// The agent index does not exist.
    #[error("no agent with index {0}")]
    UnknownAgent(AgentIndex),
    /// The action is not legal for the agent in the current state.
    #[error("agent {agent} cannot play {action}")]
    IllegalAction {
        /// Acting agent.
        agent: AgentIndex,
        /// Rejected action.
        action: Action,
    },
    /// The game already ended.
    #[error("game is over")]
    GameOver,
}

/// A team could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    /// No role is registered under this name.
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    /// The index belongs to the other team.
    #[error("agent {index} is not on the {team} team")]
    WrongTeam {
        /// Offending agent index.
        index: AgentIndex,
        /// Requested team name.
        team: &'static str,
    },
    /// Both agents were given the same index.
    #[error("agent index {0} used twice")]
    DuplicateIndex(AgentIndex),
}

/// A match could not be set up or run.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The lineup does not fit the layout.
    #[error("layout has {layout} agents but the lineup fields {lineup}")]
    AgentCount {
        /// Agents placed by the layout.
        layout: usize,
        /// Agents provided by the lineup.
        lineup: usize,
    },
    /// Team construction failed.
    #[error(transparent)]
    Team(#[from] TeamError),
    /// The engine rejected a move.
    #[error(transparent)]
    Game(#[from] GameError),
    /// An engine invariant broke during the match.
    #[error("invariant violated on turn {turn}: {message}")]
    Invariant {
        /// Ply after which the check failed.
        turn: u32,
        /// First violation found.
        message: String,
    },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The file is not valid JSON for the target type.
    #[error("invalid config {path}: {source}")]
    Json {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Random layout generation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapGenError {
    /// Requested dimensions are outside the supported range.
    #[error("layout size {width}x{height} is outside {min_width}..={max}x{min_height}..={max}")]
    BadSize {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
        /// Smallest width.
        min_width: i32,
        /// Smallest height.
        min_height: i32,
        /// Largest width or height.
        max: i32,
    },
    /// Point symmetry needs an even width.
    #[error("layout width {0} is odd")]
    OddWidth(i32),
    /// No connected layout was found within the attempt budget.
    #[error("no connected layout after {0} attempts")]
    Exhausted(u32),
    /// The generated text failed to parse.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A recording could not be loaded or replayed.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// File I/O failed.
    #[error("recording I/O: {0}")]
    Io(#[from] io::Error),
    /// The recording is not valid JSON.
    #[error("recording format: {0}")]
    Json(#[from] serde_json::Error),
    /// The embedded layout does not parse.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// Re-simulation failed.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// The replayed match already ended.
    #[error("match is over")]
    GameOver,
    /// The requested turn is outside the match.
    #[error("turn {requested} is out of bounds (max {max_turn})")]
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Last valid turn.
        max_turn: u32,
    },
}
