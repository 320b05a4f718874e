//! Match replay and viewing.
//!
//! Because matches are 100% deterministic, replay requires only:
//! - `seed: u64` - Seeds every agent's tie-break generator
//! - `layout: String` - The layout text
//! - `lineup` and `config` - Who played and under which limits
//!
//! No state deltas needed. To view turn N, re-run the match from turn 0 to N.
//!
//! # Time Travel
//!
//! - **Forward**: Continue stepping the match
//! - **Backward**: Re-run from turn 0 to (`current_turn` - 1)
//! - **Jump to turn N**: Re-run from turn 0 to N

mod render;
mod text;

pub use render::render_ascii;
pub use text::render_status;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::error::{LayoutError, ReplayError};
use crate::game::{Action, AgentIndex, CaptureState, Layout};
use crate::tournament::{Lineup, Match};

/// Minimal recording: seed, layout, lineup and config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Match seed.
    pub seed: u64,
    /// Layout text.
    pub layout: String,
    /// Roles of both teams.
    pub lineup: Lineup,
    /// Match configuration.
    pub config: MatchConfig,
}

impl Recording {
    /// Record the inputs of a match.
    #[must_use]
    pub fn new(seed: u64, layout: &Layout, lineup: Lineup, config: MatchConfig) -> Self {
        Self {
            seed,
            layout: layout.text().to_string(),
            lineup,
            config,
        }
    }

    /// Parse the recorded layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout text is invalid.
    pub fn layout(&self) -> Result<Layout, LayoutError> {
        Layout::parse(&self.layout)
    }

    /// Save the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations or serialization fail.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a recording saved with [`Recording::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Replay engine - steps through a match deterministically.
///
/// Since matches are deterministic, this engine can:
/// - Step forward by playing one ply
/// - Step backward by replaying from turn 0
/// - Jump to any turn by replaying from turn 0
#[derive(Debug)]
pub struct ReplayEngine {
    /// The recording being replayed.
    recording: Recording,
    /// The re-simulated match.
    game: Match,
    /// Most recent ply.
    last_move: Option<(AgentIndex, Action)>,
}

impl ReplayEngine {
    /// Create a replay engine at turn 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout or lineup is invalid.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at_turn(recording, 0)
    }

    /// Create a replay engine at `target_turn`, stopping early if the match
    /// ends first.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout or lineup is invalid or the match
    /// fails while replaying.
    pub fn new_at_turn(recording: Recording, target_turn: u32) -> Result<Self, ReplayError> {
        let layout = recording.layout()?;
        let game = Match::new(recording.seed, layout, &recording.lineup, &recording.config)?;
        let mut engine = Self {
            recording,
            game,
            last_move: None,
        };
        while engine.turn() < target_turn && !engine.is_game_over() {
            engine.step_forward()?;
        }
        Ok(engine)
    }

    /// The recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Current turn number.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.game.state().turn()
    }

    /// Current engine state.
    #[must_use]
    pub const fn state(&self) -> &CaptureState {
        self.game.state()
    }

    /// Most recent ply, if any was played since the engine was built.
    #[must_use]
    pub const fn last_move(&self) -> Option<(AgentIndex, Action)> {
        self.last_move
    }

    /// Check if the match is over.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game.is_over()
    }

    /// Play one ply.
    ///
    /// # Errors
    ///
    /// Returns an error if the match is already over or fails.
    pub fn step_forward(&mut self) -> Result<(AgentIndex, Action), ReplayError> {
        let played = self.game.step()?.ok_or(ReplayError::GameOver)?;
        self.last_move = Some(played);
        Ok(played)
    }

    /// Step backward one ply.
    ///
    /// # Errors
    ///
    /// Returns an error if already at turn 0 or replaying fails.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        let turn = self.turn();
        if turn == 0 {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.recording.config.max_turns,
            });
        }
        self.goto_turn(turn - 1)
    }

    /// Jump to a specific turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is past the turn limit or replaying
    /// fails.
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        let max_turn = self.recording.config.max_turns;
        if target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }
        let recording = self.recording.clone();
        *self = Self::new_at_turn(recording, target_turn)?;
        Ok(())
    }

    /// Render the current state as an ASCII grid.
    #[must_use]
    pub fn render_ascii(&self, color: bool) -> String {
        render_ascii(self.game.state(), color)
    }

    /// Render the current state as structured text.
    #[must_use]
    pub fn render_status(&self) -> String {
        render_status(self.game.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DEFAULT_LAYOUT;

    fn recording(max_turns: u32) -> Recording {
        let layout = Layout::parse(DEFAULT_LAYOUT).unwrap();
        let config = MatchConfig {
            max_turns,
            ..MatchConfig::default()
        };
        Recording::new(21, &layout, Lineup::default(), config)
    }

    #[test]
    fn test_recording_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.json");
        let original = recording(60);
        original.save(&path).unwrap();
        let loaded = Recording::load(&path).unwrap();
        assert_eq!(loaded, original);
        assert_eq!(loaded.layout().unwrap().num_agents(), 4);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Recording::load(&path), Err(ReplayError::Json(_))));
        let missing = dir.path().join("missing.json");
        assert!(matches!(Recording::load(&missing), Err(ReplayError::Io(_))));
    }

    #[test]
    fn test_goto_matches_stepping() {
        let mut stepped = ReplayEngine::new(recording(60)).unwrap();
        for _ in 0..17 {
            stepped.step_forward().unwrap();
        }
        let jumped = ReplayEngine::new_at_turn(recording(60), 17).unwrap();
        assert_eq!(jumped.turn(), 17);
        assert_eq!(jumped.state().agents(), stepped.state().agents());
        assert_eq!(jumped.state().food_set(), stepped.state().food_set());
        assert_eq!(jumped.last_move(), stepped.last_move());
    }

    #[test]
    fn test_step_backward() {
        let mut engine = ReplayEngine::new_at_turn(recording(60), 5).unwrap();
        engine.step_backward().unwrap();
        assert_eq!(engine.turn(), 4);
        let mut start = ReplayEngine::new(recording(60)).unwrap();
        assert!(matches!(
            start.step_backward(),
            Err(ReplayError::TurnOutOfBounds { requested: 0, .. })
        ));
    }

    #[test]
    fn test_replay_stops_at_end() {
        let mut engine = ReplayEngine::new_at_turn(recording(8), 100).unwrap();
        assert_eq!(engine.turn(), 8);
        assert!(engine.is_game_over());
        assert!(matches!(engine.step_forward(), Err(ReplayError::GameOver)));
        assert!(matches!(
            engine.goto_turn(9),
            Err(ReplayError::TurnOutOfBounds {
                requested: 9,
                max_turn: 8
            })
        ));
    }
}
