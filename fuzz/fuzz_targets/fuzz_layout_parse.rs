#![no_main]

//! Layout parser fuzzer.
//!
//! Arbitrary text must either parse into a consistent layout or produce a
//! `LayoutError`, never panic. Parsed layouts also go through the distance
//! table and, when every agent starts at home, the validity check for a
//! fresh state.

use ctf_reflex::game::invariants::check_invariants;
use ctf_reflex::game::{Board, Distancer};
use ctf_reflex::{CaptureState, Layout, Team};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Distance tables are quadratic in open cells
    if text.len() > 4096 {
        return;
    }
    let Ok(layout) = Layout::parse(text) else {
        return;
    };

    let maze = &layout.maze;
    for food in &layout.food {
        assert!(!maze.is_wall(*food), "food on a wall at {food:?}");
    }
    for start in &layout.agent_starts {
        assert!(!maze.is_wall(*start), "agent starts on a wall at {start:?}");
    }

    let distancer = Distancer::new(maze);
    for cell in maze.open_cells() {
        assert_eq!(distancer.distance(cell, cell), 0);
    }

    // Agents spawn as ghosts, so only home-half starts give a valid state
    let width = maze.width();
    let home_starts = layout
        .agent_starts
        .iter()
        .enumerate()
        .all(|(index, start)| Team::of_index(index).is_home(start.x, width));
    if !home_starts {
        return;
    }

    let board = std::sync::Arc::new(Board::new(layout));
    let state = CaptureState::with_board(board, 10);
    let violations = check_invariants(&state);
    assert!(violations.is_empty(), "fresh state invalid: {violations:?}");
});
