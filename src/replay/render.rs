//! ASCII renderer for terminal viewing with optional ANSI colors.

// Allow format! with push_str for readability
#![allow(clippy::format_push_string)]

use crate::game::{AgentState, CaptureState, Coord, Team};

const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GRAY: &str = "\x1b[90m";

/// Render a state as a grid in layout notation.
///
/// Output format:
/// ```text
/// Turn 42/1200  Score +1  (red 1, blue 0)
/// %%%%%%%%%%
/// %  .   4%
/// %1 o  2 %
/// %%%%%%%%%%
///
/// Legend: %=Wall .=Food o=Capsule 1-4=Agent (bold: pacman, dim: scared)
/// ```
///
/// Agents are drawn with their layout digit. With `color`, red agents are
/// red and blue agents blue.
#[must_use]
pub fn render_ascii(state: &CaptureState, color: bool) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Turn {}/{}  Score {:+}  (red {}, blue {})\n",
        state.turn(),
        state.max_turns(),
        state.score(),
        state.returned(Team::Red),
        state.returned(Team::Blue),
    ));

    let maze = &state.board().layout.maze;
    for y in (0..maze.height()).rev() {
        for x in 0..maze.width() {
            render_cell(&mut output, state, Coord::new(x, y), color);
        }
        output.push('\n');
    }

    output.push_str("\nLegend: %=Wall .=Food o=Capsule 1-4=Agent (bold: pacman, dim: scared)\n");
    output
}

fn render_cell(output: &mut String, state: &CaptureState, coord: Coord, color: bool) {
    if let Some(agent) = state.agents().iter().find(|a| a.cell() == Some(coord)) {
        render_agent(output, agent, color);
        return;
    }
    let maze = &state.board().layout.maze;
    let tile = if maze.is_wall(coord) {
        '%'
    } else if state.food_set().contains(&coord) {
        '.'
    } else if state.capsule_set().contains(&coord) {
        'o'
    } else {
        ' '
    };
    if color && tile == '%' {
        output.push_str(GRAY);
        output.push(tile);
        output.push_str(RESET);
    } else {
        output.push(tile);
    }
}

fn render_agent(output: &mut String, agent: &AgentState, color: bool) {
    let digit = char::from_digit(u32::try_from(agent.index + 1).unwrap_or(0), 10).unwrap_or('?');
    if !color {
        output.push(digit);
        return;
    }
    output.push_str(team_color(agent.team()));
    if agent.is_pacman {
        output.push_str(BOLD);
    }
    if agent.is_scared() {
        output.push_str(DIM);
    }
    output.push(digit);
    output.push_str(RESET);
}

const fn team_color(team: Team) -> &'static str {
    match team {
        Team::Red => RED,
        Team::Blue => BLUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, Layout};

    const SMALL: &str = "\
%%%%%%%%%%
%1 .  o 2%
%3 o  . 4%
%%%%%%%%%%";

    fn state() -> CaptureState {
        CaptureState::new(Layout::parse(SMALL).unwrap(), 300)
    }

    #[test]
    fn test_render_plain_reproduces_layout() {
        let output = render_ascii(&state(), false);
        assert!(output.starts_with("Turn 0/300  Score +0  (red 0, blue 0)\n"));
        let grid: Vec<&str> = output.lines().skip(1).take(4).collect();
        assert_eq!(grid.join("\n"), SMALL);
        assert!(output.contains("Legend"));
    }

    #[test]
    fn test_render_tracks_moves() {
        let mut state = state();
        state.apply(0, Action::East).unwrap();
        let output = render_ascii(&state, false);
        assert!(output.contains("% 1.  o 2%"));
        assert!(output.contains("Turn 1/300"));
    }

    #[test]
    fn test_render_color() {
        let output = render_ascii(&state(), true);
        assert!(output.contains(&format!("{RED}1{RESET}")));
        assert!(output.contains(&format!("{BLUE}2{RESET}")));
        assert!(output.contains(GRAY));
    }
}
