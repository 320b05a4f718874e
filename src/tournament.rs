//! Match and tournament runner.
//!
//! Provides a pure function interface: `(seed, layout, lineup) -> MatchResult`
//!
//! The runner handles:
//! - Team construction from the role registry
//! - Fog of war: each agent decides on its team's observation
//! - Per-decision time budget accounting
//! - Replacing illegal moves with the first legal one
//! - Parallel tournaments with rayon

mod mapgen;

pub use mapgen::{MAX_SIZE, MIN_HEIGHT, MIN_WIDTH, generate_layout};

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agents::{CaptureAgent, DEFAULT_ROLES, RoleId, create_team};
use crate::config::MatchConfig;
use crate::error::{GameError, MapGenError, MatchError};
use crate::game::invariants::check_invariants;
use crate::game::{Action, AgentIndex, Board, CaptureState, GameView, Layout, Team};

/// Number of agents a lineup fields.
pub const LINEUP_SIZE: usize = 4;

/// Roles fielded by both teams, first and second agent of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    /// Red roles for agents 0 and 2.
    pub red: (RoleId, RoleId),
    /// Blue roles for agents 1 and 3.
    pub blue: (RoleId, RoleId),
}

impl Default for Lineup {
    fn default() -> Self {
        Self {
            red: DEFAULT_ROLES,
            blue: DEFAULT_ROLES,
        }
    }
}

impl Lineup {
    /// Role played by agent `index`.
    #[must_use]
    pub const fn role(&self, index: AgentIndex) -> RoleId {
        let (first, second) = match Team::of_index(index) {
            Team::Red => self.red,
            Team::Blue => self.blue,
        };
        if index < 2 { first } else { second }
    }
}

/// Per-agent statistics for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Agent index.
    pub index: AgentIndex,
    /// Role played.
    pub role: RoleId,
    /// Owning team.
    pub team: Team,
    /// Decisions made.
    pub decisions: u32,
    /// Decisions that exceeded the time budget.
    pub overruns: u32,
    /// Illegal moves replaced by the runner.
    pub illegal_actions: u32,
    /// Slowest decision in microseconds.
    pub slowest_us: u64,
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The seed used for this match.
    pub seed: u64,
    /// Leading team, `None` on a tie.
    pub winner: Option<Team>,
    /// Final score, positive when red leads.
    pub score: i32,
    /// Plies played.
    pub turns_played: u32,
    /// Food returned by red.
    pub red_returned: u32,
    /// Food returned by blue.
    pub blue_returned: u32,
    /// Per-agent statistics in index order.
    pub agent_stats: Vec<AgentStats>,
}

/// A match in progress, advanced one ply at a time.
#[derive(Debug)]
pub struct Match {
    state: CaptureState,
    agents: Vec<Box<dyn CaptureAgent<CaptureState>>>,
    stats: Vec<AgentStats>,
    config: MatchConfig,
    seed: u64,
    next: AgentIndex,
}

impl Match {
    /// Set up a match on `layout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout does not place four agents.
    pub fn new(
        seed: u64,
        layout: Layout,
        lineup: &Lineup,
        config: &MatchConfig,
    ) -> Result<Self, MatchError> {
        Self::with_board(seed, Arc::new(Board::new(layout)), lineup, config)
    }

    /// Set up a match on a shared board.
    ///
    /// Every agent sees its team's observation of the initial state in
    /// `register_initial_state` before the first ply.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout does not place four agents.
    pub fn with_board(
        seed: u64,
        board: Arc<Board>,
        lineup: &Lineup,
        config: &MatchConfig,
    ) -> Result<Self, MatchError> {
        let placed = board.layout.num_agents();
        if placed != LINEUP_SIZE {
            return Err(MatchError::AgentCount {
                layout: placed,
                lineup: LINEUP_SIZE,
            });
        }
        let state = CaptureState::with_board(board, config.max_turns);

        let [red_a, red_b] = create_team(
            0,
            2,
            true,
            lineup.red.0.name(),
            lineup.red.1.name(),
            seed,
            config.agents,
        )?;
        let [blue_a, blue_b] = create_team(
            1,
            3,
            false,
            lineup.blue.0.name(),
            lineup.blue.1.name(),
            seed,
            config.agents,
        )?;
        let mut agents = vec![red_a, blue_a, red_b, blue_b];

        for agent in &mut agents {
            let view = state.observe(Team::of_index(agent.index()));
            agent.register_initial_state(&view);
        }
        let stats = agents
            .iter()
            .map(|agent| AgentStats {
                index: agent.index(),
                role: agent.role(),
                team: Team::of_index(agent.index()),
                decisions: 0,
                overruns: 0,
                illegal_actions: 0,
                slowest_us: 0,
            })
            .collect();

        Ok(Self {
            state,
            agents,
            stats,
            config: *config,
            seed,
            next: 0,
        })
    }

    /// Current engine state.
    #[must_use]
    pub const fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Whether the match has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Play one ply for the agent whose turn it is.
    ///
    /// Returns the agent and the move applied, or `None` once the match is
    /// over.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the move or, with invariant
    /// checking enabled, the resulting state is inconsistent.
    pub fn step(&mut self) -> Result<Option<(AgentIndex, Action)>, MatchError> {
        if self.state.is_over() {
            return Ok(None);
        }
        let index = self.next;
        self.next = (self.next + 1) % self.agents.len();

        let view = self.state.observe(Team::of_index(index));
        let legal = self.state.legal_actions(index);
        let (agent, stats) = match (self.agents.get_mut(index), self.stats.get_mut(index)) {
            (Some(agent), Some(stats)) => (agent, stats),
            _ => return Err(GameError::UnknownAgent(index).into()),
        };

        let started = Instant::now();
        let proposed = agent.choose_action(&view);
        let elapsed = started.elapsed();
        let budget = agent.time_budget();

        stats.decisions += 1;
        stats.slowest_us = stats.slowest_us.max(micros(elapsed));
        if elapsed > budget {
            stats.overruns += 1;
            warn!(
                agent = index,
                elapsed_us = micros(elapsed),
                budget_us = micros(budget),
                "decision over time budget"
            );
        }

        let action = if legal.contains(&proposed) {
            proposed
        } else {
            stats.illegal_actions += 1;
            let fallback = legal.first().copied().unwrap_or(Action::Stop);
            warn!(agent = index, %proposed, %fallback, "illegal action replaced");
            fallback
        };

        self.state.apply(index, action)?;

        if self.config.check_invariants
            && let Some(violation) = check_invariants(&self.state).into_iter().next()
        {
            return Err(MatchError::Invariant {
                turn: self.state.turn(),
                message: violation.message,
            });
        }
        Ok(Some((index, action)))
    }

    /// Play until the match ends.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Match::step`].
    pub fn run(mut self) -> Result<MatchResult, MatchError> {
        while self.step()?.is_some() {}
        let result = self.result();
        info!(
            seed = result.seed,
            score = result.score,
            turns = result.turns_played,
            winner = result.winner.map_or("tie", Team::name),
            "match finished"
        );
        Ok(result)
    }

    /// Result of the match so far.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        MatchResult {
            seed: self.seed,
            winner: self.state.winner(),
            score: self.state.score(),
            turns_played: self.state.turn(),
            red_returned: self.state.returned(Team::Red),
            blue_returned: self.state.returned(Team::Blue),
            agent_stats: self.stats.clone(),
        }
    }
}

/// Run a complete match.
///
/// # Errors
///
/// Returns an error if the layout does not fit the lineup or the match
/// fails.
pub fn run_match(
    seed: u64,
    layout: Layout,
    lineup: &Lineup,
    config: &MatchConfig,
) -> Result<MatchResult, MatchError> {
    Match::new(seed, layout, lineup, config)?.run()
}

/// Where tournament games get their layout.
#[derive(Debug, Clone)]
pub enum LayoutSource {
    /// Every game on the same board.
    Fixed(Arc<Board>),
    /// A fresh symmetric layout per game, generated from the game seed.
    Random {
        /// Layout width.
        width: i32,
        /// Layout height.
        height: i32,
    },
}

impl LayoutSource {
    /// Board for the game played with `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if random generation fails.
    pub fn board(&self, seed: u64) -> Result<Arc<Board>, MapGenError> {
        match self {
            LayoutSource::Fixed(board) => Ok(Arc::clone(board)),
            LayoutSource::Random { width, height } => Ok(Arc::new(Board::new(generate_layout(
                seed, *width, *height,
            )?))),
        }
    }
}

/// Aggregated tournament statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentStats {
    /// Games completed.
    pub games_played: u64,
    /// Games that failed to set up or run.
    pub games_failed: u64,
    /// Red wins.
    pub red_wins: u64,
    /// Blue wins.
    pub blue_wins: u64,
    /// Ties.
    pub ties: u64,
    /// Sum of final scores.
    total_score: i64,
    /// Sum of squared final scores.
    score_sq_sum: i64,
    /// Total plies across all games.
    total_turns: u64,
    /// Decisions over budget across all agents.
    pub overruns: u64,
    /// Illegal moves across all agents.
    pub illegal_actions: u64,
}

impl TournamentStats {
    /// Add a match result to the stats.
    pub fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);
        match result.winner {
            Some(Team::Red) => self.red_wins += 1,
            Some(Team::Blue) => self.blue_wins += 1,
            None => self.ties += 1,
        }
        let score = i64::from(result.score);
        self.total_score += score;
        self.score_sq_sum += score * score;
        for stats in &result.agent_stats {
            self.overruns += u64::from(stats.overruns);
            self.illegal_actions += u64::from(stats.illegal_actions);
        }
    }

    /// Merge stats accumulated on another thread.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.games_failed += other.games_failed;
        self.red_wins += other.red_wins;
        self.blue_wins += other.blue_wins;
        self.ties += other.ties;
        self.total_score += other.total_score;
        self.score_sq_sum += other.score_sq_sum;
        self.total_turns += other.total_turns;
        self.overruns += other.overruns;
        self.illegal_actions += other.illegal_actions;
    }

    /// Share of games won by `team` (0.0-1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, team: Team) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let wins = match team {
            Team::Red => self.red_wins,
            Team::Blue => self.blue_wins,
        };
        wins as f64 / self.games_played as f64
    }

    /// Mean final score, positive when red leads.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_score(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.games_played as f64
    }

    /// Standard deviation of the final score.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_std_dev(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let mean = self.avg_score();
        let variance = self.score_sq_sum as f64 / self.games_played as f64 - mean * mean;
        variance.max(0.0).sqrt()
    }

    /// Mean match length in plies.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

/// Run `games` matches in parallel, seeds `base_seed..base_seed + games`.
///
/// Failed games are counted in [`TournamentStats::games_failed`] and logged.
#[must_use]
pub fn run_tournament(
    base_seed: u64,
    games: u64,
    source: &LayoutSource,
    lineup: &Lineup,
    config: &MatchConfig,
) -> TournamentStats {
    (0..games)
        .into_par_iter()
        .fold(TournamentStats::default, |mut local, i| {
            let seed = base_seed.wrapping_add(i);
            let outcome = source
                .board(seed)
                .map_err(|err| err.to_string())
                .and_then(|board| {
                    Match::with_board(seed, board, lineup, config)
                        .and_then(Match::run)
                        .map_err(|err| err.to_string())
                });
            match outcome {
                Ok(result) => local.add_result(&result),
                Err(err) => {
                    warn!(seed, %err, "tournament game failed");
                    local.games_failed += 1;
                }
            }
            local
        })
        .reduce(TournamentStats::default, |mut a, b| {
            a.merge(&b);
            a
        })
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
