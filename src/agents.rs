//! Reflex decision agents.
//!
//! Each turn an agent scores every legal action with a linear function of
//! hand-written features, keeps the best ones and applies a small policy
//! on top:
//!
//! ```text
//! legal actions ─► features ─► evaluate ─► best actions
//!                                              │
//!                low food? ─► run to start ◄───┤
//!                                              ▼
//!                   anti-oscillation ─► anti-stop ─► random tie-break
//! ```
//!
//! The offensive role eats enemy food and retreats once it carries enough;
//! the defensive role guards its half against invaders. Agents only see
//! the game through [`GameView`].

mod base;
mod defense;
mod evaluation;
mod features;
mod memory;
mod offense;
mod roster;
pub mod selector;
mod weights;

use std::fmt;
use std::time::Duration;

pub use base::{ReflexCore, nearest_distance};
pub use defense::DefensiveAgent;
pub use evaluation::{evaluate, score_actions};
pub use features::{Feature, FeatureVector};
pub use memory::RoleMemory;
pub use offense::OffensiveAgent;
pub use roster::{
    DEFAULT_ROLES, RoleId, agent_seed, create_agent, create_team, describe_roles, role_ids,
};
pub use weights::WeightTable;

use crate::game::{Action, AgentIndex, GameView};

/// A per-turn decision maker bound to one agent index.
pub trait CaptureAgent<S: GameView>: fmt::Debug {
    /// Agent index this agent plays.
    fn index(&self) -> AgentIndex;

    /// Registered role.
    fn role(&self) -> RoleId;

    /// Per-turn decision budget.
    fn time_budget(&self) -> Duration;

    /// One-time hook before the first turn; captures the start position.
    fn register_initial_state(&mut self, state: &S);

    /// Pick the action for this turn.
    fn choose_action(&mut self, state: &S) -> Action;
}
