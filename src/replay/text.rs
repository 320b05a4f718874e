//! Structured status text.
//!
//! This format is optimized for machine readability while remaining
//! human-parseable.

// Allow format! with push_str for readability
#![allow(clippy::format_push_string)]

use crate::game::{CaptureState, GameView, MIN_FOOD, Team};

/// Render a state as structured text.
///
/// Output format:
/// ```text
/// === TURN 42 OF 1200 ===
///
/// MAP (24x11): red x < 12, blue x >= 12
///
/// RED TEAM:
/// - Returned: 1
/// - Food left to defend: 9
/// - Capsules left to defend: 1
/// - Agent 0: ghost at (1, 1) facing north
/// - Agent 2: pacman at (13, 4) facing east, carrying 2
///
/// ...
///
/// MATCH STATUS:
/// - Score: +1 (red leads)
/// - Turns remaining: 1158
/// ```
#[must_use]
pub fn render_status(state: &CaptureState) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "=== TURN {} OF {} ===\n\n",
        state.turn(),
        state.max_turns()
    ));

    let maze = &state.board().layout.maze;
    output.push_str(&format!(
        "MAP ({}x{}): red x < {mid}, blue x >= {mid}\n\n",
        maze.width(),
        maze.height(),
        mid = maze.midline(),
    ));

    for team in Team::BOTH {
        render_team(&mut output, state, team);
    }

    render_match_status(&mut output, state);
    output
}

fn render_team(output: &mut String, state: &CaptureState, team: Team) {
    output.push_str(&format!("{} TEAM:\n", team.name().to_uppercase()));
    output.push_str(&format!("- Returned: {}\n", state.returned(team)));
    output.push_str(&format!("- Food left to defend: {}\n", state.food(team).len()));
    output.push_str(&format!(
        "- Capsules left to defend: {}\n",
        state.capsules(team).len()
    ));

    for index in state.team_indices(team) {
        let Some(agent) = state.agent_state(index) else {
            continue;
        };
        let form = if agent.is_pacman { "pacman" } else { "ghost" };
        output.push_str(&format!("- Agent {index}: {form}"));
        match agent.position {
            Some(position) => output.push_str(&format!(
                " at ({}, {}) facing {}",
                position.x, position.y, agent.direction
            )),
            None => output.push_str(" at unknown position"),
        }
        if !agent.carrying.is_empty() {
            output.push_str(&format!(", carrying {}", agent.carrying.len()));
        }
        if agent.is_scared() {
            output.push_str(&format!(", scared for {}", agent.scared_timer));
        }
        output.push('\n');
    }
    output.push('\n');
}

fn render_match_status(output: &mut String, state: &CaptureState) {
    output.push_str("MATCH STATUS:\n");
    let score = state.score();
    let leader = match state.winner() {
        Some(team) => format!("{team} leads"),
        None => "tied".to_string(),
    };
    output.push_str(&format!("- Score: {score:+} ({leader})\n"));

    for team in Team::BOTH {
        let target = state.board().edible_food(team).saturating_sub(MIN_FOOD);
        output.push_str(&format!(
            "- {} needs {} returned to win early\n",
            team.name(),
            target
        ));
    }

    if state.is_over() {
        output.push_str("- MATCH OVER\n");
        match state.winner() {
            Some(team) => output.push_str(&format!("- Winner: {team}\n")),
            None => output.push_str("- Result: tie\n"),
        }
    } else {
        let remaining = state.max_turns().saturating_sub(state.turn());
        output.push_str(&format!("- Turns remaining: {remaining}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, Coord, Layout};

    const SMALL: &str = "\
%%%%%%%%%%
%1 .  o 2%
%3 o  . 4%
%%%%%%%%%%";

    fn state(max_turns: u32) -> CaptureState {
        CaptureState::new(Layout::parse(SMALL).unwrap(), max_turns)
    }

    #[test]
    fn test_render_status_basic() {
        let output = render_status(&state(300));
        assert!(output.contains("=== TURN 0 OF 300 ==="));
        assert!(output.contains("MAP (10x4): red x < 5, blue x >= 5"));
        assert!(output.contains("RED TEAM:"));
        assert!(output.contains("BLUE TEAM:"));
        assert!(output.contains("- Agent 0: ghost at (1, 2) facing stop"));
        assert!(output.contains("- Score: +0 (tied)"));
        assert!(output.contains("- Turns remaining: 300"));
    }

    #[test]
    fn test_render_status_pacman_carrying() {
        let mut state = state(300);
        state.place(0, Coord::new(5, 1).into()).unwrap();
        state.apply(0, Action::East).unwrap();
        let output = render_status(&state);
        assert!(output.contains("- Agent 0: pacman at (6, 1) facing east, carrying 1"));
    }

    #[test]
    fn test_render_status_game_over() {
        let mut state = state(1);
        state.apply(0, Action::East).unwrap();
        let output = render_status(&state);
        assert!(output.contains("- MATCH OVER"));
        assert!(output.contains("- Result: tie"));
    }
}
