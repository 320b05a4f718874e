//! Tournament command implementation.

use std::sync::Arc;
use std::time::Instant;

use ctf_reflex::game::Board;
use ctf_reflex::tournament::{LayoutSource, run_tournament};
use indicatif::{ProgressBar, ProgressStyle};

use super::output::{JsonTournamentResult, format_tournament_csv, format_tournament_text};
use super::{CliError, MatchArgs, TournamentFormat, resolve_seed};

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the setup is invalid.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn execute(
    setup: &MatchArgs,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = setup.match_config()?;
    let lineup = setup.lineup();
    let base_seed = resolve_seed(seed);

    // Fixed layouts share one distance table across every game
    let source = match setup.random_layout {
        Some((width, height)) => LayoutSource::Random { width, height },
        None => LayoutSource::Fixed(Arc::new(Board::new(setup.layout(base_seed)?))),
    };

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_tournament(base_seed, games, &source, &lineup, &config);

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(stats.games_played + stats.games_failed);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, duration.as_secs_f64());
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats));
        }
    }

    Ok(())
}
