//! Output formatting utilities for CLI.

// Allow format! with push_str for readability
#![allow(clippy::format_push_string)]

use ctf_reflex::Team;
use ctf_reflex::tournament::{MatchResult, TournamentStats};
use serde::Serialize;

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Seed used.
    seed: u64,
    /// Winning team (null on a tie).
    winner: Option<Team>,
    /// Final score, positive when red leads.
    score: i32,
    /// Total plies played.
    turns_played: u32,
    /// Per-agent results.
    agents: Vec<JsonAgentResult>,
}

/// JSON-serializable agent result.
#[derive(Debug, Serialize)]
struct JsonAgentResult {
    /// Agent index.
    index: usize,
    /// Role name.
    role: &'static str,
    /// Team.
    team: Team,
    /// Decisions made.
    decisions: u32,
    /// Decisions over the time budget.
    overruns: u32,
    /// Illegal moves replaced.
    illegal_actions: u32,
    /// Slowest decision in microseconds.
    slowest_us: u64,
}

impl JsonMatchResult {
    /// Create from a `MatchResult`.
    pub(super) fn from_match_result(result: &MatchResult) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner,
            score: result.score,
            turns_played: result.turns_played,
            agents: result
                .agent_stats
                .iter()
                .map(|stats| JsonAgentResult {
                    index: stats.index,
                    role: stats.role.name(),
                    team: stats.team,
                    decisions: stats.decisions,
                    overruns: stats.overruns,
                    illegal_actions: stats.illegal_actions,
                    slowest_us: stats.slowest_us,
                })
                .collect(),
        }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result (seed: {})\n", result.seed));
    match result.winner {
        Some(team) => output.push_str(&format!("  Winner: {team}\n")),
        None => output.push_str("  Winner: tie\n"),
    }
    output.push_str(&format!(
        "  Score: {:+} (red returned {}, blue returned {})\n",
        result.score, result.red_returned, result.blue_returned
    ));
    output.push_str(&format!("  Turns: {}\n\n", result.turns_played));

    for stats in &result.agent_stats {
        output.push_str(&format!(
            "  Agent {} ({}, {}): {} decisions, slowest {}us",
            stats.index, stats.team, stats.role, stats.decisions, stats.slowest_us
        ));
        if stats.overruns > 0 {
            output.push_str(&format!(" [{} over budget]", stats.overruns));
        }
        if stats.illegal_actions > 0 {
            output.push_str(&format!(" [{} illegal]", stats.illegal_actions));
        }
        output.push('\n');
    }

    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult<'a> {
    /// Raw counters.
    #[serde(flatten)]
    stats: &'a TournamentStats,
    /// Red win rate (0.0-1.0).
    red_win_rate: f64,
    /// Blue win rate (0.0-1.0).
    blue_win_rate: f64,
    /// Mean score.
    avg_score: f64,
    /// Score standard deviation.
    score_std_dev: f64,
    /// Mean game length in plies.
    avg_turns: f64,
    /// Wall-clock duration in seconds.
    duration_secs: f64,
}

impl<'a> JsonTournamentResult<'a> {
    /// Create from stats.
    pub(super) fn from_stats(stats: &'a TournamentStats, duration_secs: f64) -> Self {
        Self {
            stats,
            red_win_rate: stats.win_rate(Team::Red),
            blue_win_rate: stats.win_rate(Team::Blue),
            avg_score: stats.avg_score(),
            score_std_dev: stats.score_std_dev(),
            avg_turns: stats.avg_turns(),
            duration_secs,
        }
    }
}

/// Format tournament stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_tournament_text(stats: &TournamentStats) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Tournament Results ({} games)\n",
        stats.games_played
    ));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    output.push_str(&format!(
        "  Red:  {:.1}% ({} wins)\n",
        stats.win_rate(Team::Red) * 100.0,
        stats.red_wins
    ));
    output.push_str(&format!(
        "  Blue: {:.1}% ({} wins)\n",
        stats.win_rate(Team::Blue) * 100.0,
        stats.blue_wins
    ));
    let tie_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.ties as f64 / stats.games_played as f64 * 100.0
    };
    output.push_str(&format!("  Ties: {} ({tie_rate:.1}%)\n\n", stats.ties));

    output.push_str(&format!(
        "Average Score: {:+.2} (+/- {:.2})\n",
        stats.avg_score(),
        stats.score_std_dev()
    ));
    output.push_str(&format!(
        "Average Game Length: {:.0} turns\n",
        stats.avg_turns()
    ));
    if stats.overruns > 0 || stats.illegal_actions > 0 {
        output.push_str(&format!(
            "Budget overruns: {}  Illegal actions: {}\n",
            stats.overruns, stats.illegal_actions
        ));
    }
    if stats.games_failed > 0 {
        output.push_str(&format!("Failed games: {}\n", stats.games_failed));
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats) -> String {
    let mut output = String::new();

    output.push_str("team,wins,win_rate,avg_score,score_std_dev,avg_turns\n");
    for (team, wins) in [(Team::Red, stats.red_wins), (Team::Blue, stats.blue_wins)] {
        let sign = f64::from(team.sign());
        output.push_str(&format!(
            "{},{},{:.4},{:.2},{:.2},{:.1}\n",
            team,
            wins,
            stats.win_rate(team),
            stats.avg_score() * sign,
            stats.score_std_dev(),
            stats.avg_turns()
        ));
    }

    output
}
