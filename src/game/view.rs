//! The engine contract consumed by decision agents.

use crate::game::{Action, AgentIndex, AgentState, Coord, Team};

/// Read-only view of a game state, as seen by one agent.
///
/// Agents never mutate a view; they only ask for one-ply successors. Any
/// engine implementing this trait can host the agents in
/// [`crate::agents`].
pub trait GameView: Sized {
    /// Legal actions for `agent`, in engine enumeration order.
    fn legal_actions(&self, agent: AgentIndex) -> Vec<Action>;

    /// State after `agent` plays `action`.
    fn successor(&self, agent: AgentIndex, action: Action) -> Self;

    /// State of `agent`. Its position is `None` when not observable.
    fn agent_state(&self, agent: AgentIndex) -> Option<&AgentState>;

    /// Food lying on `team`'s home half.
    fn food(&self, team: Team) -> Vec<Coord>;

    /// Capsules lying on `team`'s home half.
    fn capsules(&self, team: Team) -> Vec<Coord>;

    /// Agent indices belonging to `team`.
    fn team_indices(&self, team: Team) -> Vec<AgentIndex>;

    /// Width of the maze, used to locate the midline.
    fn layout_width(&self) -> i32;

    /// Shortest walkable path length between two cells.
    fn maze_distance(&self, a: Coord, b: Coord) -> u32;
}
