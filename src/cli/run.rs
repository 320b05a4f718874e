//! Run command implementation.

use std::path::Path;

use ctf_reflex::replay::{Recording, render_ascii};
use ctf_reflex::tournament::Match;

use super::output::{JsonMatchResult, format_text};
use super::{CliError, MatchArgs, OutputFormat, resolve_seed};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the setup is invalid or the match fails.
pub(crate) fn execute(
    setup: &MatchArgs,
    seed: Option<u64>,
    format: OutputFormat,
    save: Option<&Path>,
    show: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let seed = resolve_seed(seed);
    let config = setup.match_config()?;
    let lineup = setup.lineup();
    let layout = setup.layout(seed)?;

    if !quiet && format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        println!(
            "Red: {} + {}   Blue: {} + {}",
            lineup.red.0, lineup.red.1, lineup.blue.0, lineup.blue.1
        );
        println!();
    }

    let recording = Recording::new(seed, &layout, lineup, config);
    let mut game = Match::new(seed, layout, &lineup, &config)?;
    while game.step()?.is_some() {}
    let result = game.result();

    if let Some(save_path) = save {
        recording.save(save_path)?;
        if !quiet && format == OutputFormat::Text {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            if show {
                println!("{}", render_ascii(game.state(), false));
            }
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let json_result = JsonMatchResult::from_match_result(&result);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
