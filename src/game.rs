//! Reference capture-the-flag engine.
//!
//! Hosts the decision agents:
//! - Layout parsing and maze geometry
//! - All-pairs maze distances
//! - Agent states, capture rules and fog of war
//! - The [`GameView`] contract the agents consume

mod action;
mod agent;
mod distance;
pub mod invariants;
mod layout;
mod map;
mod state;
mod view;

pub use action::{Action, ParseActionError};
pub use agent::{AgentIndex, AgentState, Team};
pub use distance::{Distancer, UNREACHABLE};
pub use layout::{DEFAULT_LAYOUT, Layout};
pub use map::{Coord, Maze, Position};
pub use state::{
    Board, COLLISION_TOLERANCE, CaptureState, DEFAULT_MAX_TURNS, MIN_FOOD, SCARED_TIME,
    SIGHT_RANGE,
};
pub use view::GameView;
