//! Replay command implementation.

use std::path::Path;

use ctf_reflex::replay::{Recording, ReplayEngine};

use super::{CliError, ReplayFormat};

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording_path: &Path,
    format: ReplayFormat,
    turn: Option<u32>,
    all: bool,
    color: bool,
) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;
    let target = turn.unwrap_or(recording.config.max_turns);

    let render = |engine: &ReplayEngine| match format {
        ReplayFormat::Ascii => engine.render_ascii(color),
        ReplayFormat::Status => engine.render_status(),
    };

    if !all {
        let engine = ReplayEngine::new_at_turn(recording, target)?;
        println!("{}", render(&engine));
        return Ok(());
    }

    let mut engine = ReplayEngine::new(recording)?;
    println!("{}", render(&engine));
    while engine.turn() < target && !engine.is_game_over() {
        let (agent, action) = engine.step_forward()?;
        println!("--- agent {agent} plays {action} ---");
        println!("{}", render(&engine));
    }
    Ok(())
}
