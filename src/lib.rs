// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! ctf-reflex: reflex decision agents for grid-based capture the flag.
//!
//! Two teams of agents share a maze split down the middle. Each agent picks
//! one move per turn by scoring its legal moves with a linear function of
//! hand-written features.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / Tournament / Replay         │
//! ├─────────────────────────────────────┤
//! │   Agents (features, policy, roles)  │
//! ├─────────────────────────────────────┤
//! │   GameView ◄── reference engine     │
//! └─────────────────────────────────────┘
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod game;
pub mod replay;
pub mod tournament;

pub use agents::{CaptureAgent, DefensiveAgent, OffensiveAgent, RoleId, create_team};
pub use config::{AgentConfig, MatchConfig};
pub use game::{Action, CaptureState, Coord, GameView, Layout, Team};
