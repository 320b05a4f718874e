#![no_main]

//! Full match fuzzer.
//!
//! Generates a layout from fuzzer-chosen size and seed, then plays a short
//! match with invariant checking on. Any `MatchError::Invariant` is a bug.

use arbitrary::Arbitrary;
use ctf_reflex::error::MatchError;
use ctf_reflex::tournament::{Lineup, MAX_SIZE, MIN_HEIGHT, MIN_WIDTH, Match, generate_layout};
use ctf_reflex::{MatchConfig, RoleId};
use libfuzzer_sys::fuzz_target;

/// Structured input for match fuzzing.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    /// Layout generator seed.
    layout_seed: u64,
    /// Agent seed.
    match_seed: u64,
    /// Half-width offset, doubled to keep the width even.
    half_width: u8,
    /// Height offset.
    height: u8,
    /// Role bits, one per agent.
    roles: u8,
    /// Number of plies to play.
    plies: u8,
}

fn role(bit: bool) -> RoleId {
    if bit { RoleId::Defensive } else { RoleId::Offensive }
}

fuzz_target!(|input: MatchInput| {
    // Cap sizes to keep each run fast
    let max = MAX_SIZE.min(24);
    let width = MIN_WIDTH + 2 * (i32::from(input.half_width) % ((max - MIN_WIDTH) / 2 + 1));
    let height = MIN_HEIGHT + i32::from(input.height) % (max - MIN_HEIGHT + 1);
    let Ok(layout) = generate_layout(input.layout_seed, width, height) else {
        return;
    };

    let lineup = Lineup {
        red: (role(input.roles & 1 != 0), role(input.roles & 2 != 0)),
        blue: (role(input.roles & 4 != 0), role(input.roles & 8 != 0)),
    };
    let config = MatchConfig {
        max_turns: u32::from(input.plies).max(1),
        check_invariants: true,
        ..MatchConfig::default()
    };

    let mut game = match Match::new(input.match_seed, layout, &lineup, &config) {
        Ok(game) => game,
        Err(e) => panic!("generated layout rejected: {e}"),
    };
    loop {
        match game.step() {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(MatchError::Invariant { turn, message }) => {
                panic!("invariant violated at turn {turn}: {message}")
            }
            Err(e) => panic!("match failed: {e}"),
        }
    }
    assert!(game.state().turn() <= config.max_turns);
});
