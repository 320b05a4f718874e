//! Game state and capture rules.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::GameError;
use crate::game::{
    Action, AgentIndex, AgentState, Coord, Distancer, GameView, Layout, Position, Team,
};

/// Moves a ghost stays scared after an enemy eats a capsule.
pub const SCARED_TIME: u32 = 40;

/// Pacman and ghost closer than this collide.
pub const COLLISION_TOLERANCE: f64 = 0.7;

/// Enemies farther than this (Manhattan) from every teammate are hidden.
pub const SIGHT_RANGE: u32 = 5;

/// The game ends once a team has returned all but this much food.
pub const MIN_FOOD: usize = 2;

/// Default game length in plies.
pub const DEFAULT_MAX_TURNS: u32 = 1200;

/// Immutable per-layout data shared by every state of a game.
#[derive(Debug)]
pub struct Board {
    /// The parsed layout.
    pub layout: Layout,
    /// Maze distance table.
    pub distancer: Distancer,
}

impl Board {
    /// Build the board for a layout, computing the distance table.
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        let distancer = Distancer::new(&layout.maze);
        Self { layout, distancer }
    }

    /// Initial food a team can eat (food on the other team's half).
    #[must_use]
    pub fn edible_food(&self, team: Team) -> usize {
        let width = self.layout.maze.width();
        self.layout
            .food
            .iter()
            .filter(|food| team.opponent().is_home(food.x, width))
            .count()
    }
}

/// Complete game state.
#[derive(Debug, Clone)]
pub struct CaptureState {
    /// Shared layout and distance table.
    board: Arc<Board>,
    /// Food still on the maze.
    food: BTreeSet<Coord>,
    /// Capsules still on the maze.
    capsules: BTreeSet<Coord>,
    /// All agents in turn order.
    agents: Vec<AgentState>,
    /// Score, positive when red leads.
    score: i32,
    /// Plies played so far.
    turn: u32,
    /// Plies before the game ends.
    max_turns: u32,
}

impl CaptureState {
    /// Initial state for a layout.
    #[must_use]
    pub fn new(layout: Layout, max_turns: u32) -> Self {
        Self::with_board(Arc::new(Board::new(layout)), max_turns)
    }

    /// Initial state reusing an existing board.
    #[must_use]
    pub fn with_board(board: Arc<Board>, max_turns: u32) -> Self {
        let agents = board
            .layout
            .agent_starts
            .iter()
            .enumerate()
            .map(|(index, &start)| AgentState::spawn(index, start))
            .collect();
        Self {
            food: board.layout.food.clone(),
            capsules: board.layout.capsules.clone(),
            agents,
            score: 0,
            turn: 0,
            max_turns,
            board,
        }
    }

    /// Shared board.
    #[must_use]
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    /// Food still on the maze.
    #[must_use]
    pub const fn food_set(&self) -> &BTreeSet<Coord> {
        &self.food
    }

    /// Capsules still on the maze.
    #[must_use]
    pub const fn capsule_set(&self) -> &BTreeSet<Coord> {
        &self.capsules
    }

    /// All agents in turn order.
    #[must_use]
    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    /// Number of agents.
    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    /// Score, positive when red leads.
    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }

    /// Plies played so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Plies before the game ends.
    #[must_use]
    pub const fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// Food returned home by a team.
    #[must_use]
    pub fn returned(&self, team: Team) -> u32 {
        self.agents
            .iter()
            .filter(|agent| agent.team() == team)
            .map(|agent| agent.returned)
            .sum()
    }

    /// Check if the game is over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        if self.turn >= self.max_turns {
            return true;
        }
        Team::BOTH.into_iter().any(|team| {
            let target = self.board.edible_food(team).saturating_sub(MIN_FOOD);
            target > 0 && self.returned(team) as usize >= target
        })
    }

    /// Leading team, `None` on a tie.
    #[must_use]
    pub const fn winner(&self) -> Option<Team> {
        match self.score {
            s if s > 0 => Some(Team::Red),
            s if s < 0 => Some(Team::Blue),
            _ => None,
        }
    }

    /// Apply one move for `agent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is over, the agent does not exist, or
    /// the action is not legal.
    pub fn apply(&mut self, agent: AgentIndex, action: Action) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if agent >= self.agents.len() {
            return Err(GameError::UnknownAgent(agent));
        }
        if !self.legal_actions(agent).contains(&action) {
            return Err(GameError::IllegalAction { agent, action });
        }

        let width = self.board.layout.maze.width();
        let me = &mut self.agents[agent];
        let team = me.team();
        let Some(position) = me.position else {
            return Err(GameError::UnknownAgent(agent));
        };

        let speed = if me.scared_timer > 0 { 0.5 } else { 1.0 };
        let mut next = position.advance(action, speed);
        if action != Action::Stop {
            me.direction = action;
        }
        if me.scared_timer > 0 {
            if me.scared_timer == 1 {
                next = next.nearest().into();
            }
            me.scared_timer -= 1;
        }
        me.position = Some(next);

        let cell = next.nearest();
        me.is_pacman = !team.is_home(cell.x, width);
        if !me.is_pacman && !me.carrying.is_empty() {
            let delivered = u32::try_from(me.carrying.len()).unwrap_or(u32::MAX);
            me.returned += delivered;
            me.carrying.clear();
            self.score += team.sign() * i32::try_from(delivered).unwrap_or(i32::MAX);
            trace!(agent, delivered, score = self.score, "food returned");
        }

        if next.is_aligned() && !team.is_home(cell.x, width) {
            self.consume(agent, cell);
        }
        self.resolve_collisions(agent);
        self.turn += 1;
        Ok(())
    }

    /// Eat food or a capsule on the enemy half.
    fn consume(&mut self, agent: AgentIndex, cell: Coord) {
        if self.food.remove(&cell) {
            self.agents[agent].carrying.push(cell);
        }
        if self.capsules.remove(&cell) {
            let team = Team::of_index(agent);
            for enemy in self.agents.iter_mut().filter(|a| a.team() != team) {
                enemy.scared_timer = SCARED_TIME;
            }
            trace!(agent, ?cell, "capsule eaten");
        }
    }

    fn resolve_collisions(&mut self, agent: AgentIndex) {
        let Some(mine) = self.agents[agent].position else {
            return;
        };
        let team = Team::of_index(agent);
        let enemies: Vec<AgentIndex> = self.team_indices(team.opponent());
        for enemy in enemies {
            let Some(theirs) = self.agents[enemy].position else {
                continue;
            };
            if mine.manhattan(theirs) > COLLISION_TOLERANCE {
                continue;
            }
            let (me, them) = (&self.agents[agent], &self.agents[enemy]);
            let victim = match (me.is_pacman, them.is_pacman) {
                (true, false) if them.scared_timer > 0 => Some(enemy),
                (true, false) => Some(agent),
                (false, true) if me.scared_timer > 0 => Some(agent),
                (false, true) => Some(enemy),
                _ => None,
            };
            if let Some(victim) = victim {
                self.kill(victim);
                if victim == agent {
                    return;
                }
            }
        }
    }

    /// Send an agent back to its start, dropping carried food where it
    /// was picked up.
    fn kill(&mut self, victim: AgentIndex) {
        let state = &mut self.agents[victim];
        trace!(victim, dropped = state.carrying.len(), "agent eaten");
        self.food.extend(state.carrying.drain(..));
        state.position = Some(state.start.into());
        state.direction = Action::Stop;
        state.is_pacman = false;
        state.scared_timer = 0;
    }

    /// Place an agent directly, bypassing the rules. The pacman flag
    /// follows the cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent does not exist.
    pub fn place(&mut self, agent: AgentIndex, position: Position) -> Result<(), GameError> {
        let width = self.layout_width();
        let state = self
            .agents
            .get_mut(agent)
            .ok_or(GameError::UnknownAgent(agent))?;
        state.position = Some(position);
        state.is_pacman = !state.team().is_home(position.nearest().x, width);
        Ok(())
    }

    /// The state as observed by `team`: enemies farther than
    /// [`SIGHT_RANGE`] from every teammate have no position.
    #[must_use]
    pub fn observe(&self, team: Team) -> Self {
        let mut observed = self.clone();
        let eyes: Vec<Coord> = self
            .agents
            .iter()
            .filter(|a| a.team() == team)
            .filter_map(AgentState::cell)
            .collect();
        for enemy in observed.agents.iter_mut().filter(|a| a.team() != team) {
            let visible = enemy
                .cell()
                .is_some_and(|cell| eyes.iter().any(|eye| eye.manhattan(cell) <= SIGHT_RANGE));
            if !visible {
                enemy.position = None;
            }
        }
        observed
    }
}

impl GameView for CaptureState {
    fn legal_actions(&self, agent: AgentIndex) -> Vec<Action> {
        let Some(state) = self.agents.get(agent) else {
            return Vec::new();
        };
        let Some(position) = state.position else {
            return vec![Action::Stop];
        };
        if !position.is_aligned() {
            return vec![state.direction];
        }
        let cell = position.nearest();
        let maze = &self.board.layout.maze;
        Action::ALL
            .into_iter()
            .filter(|&action| action == Action::Stop || !maze.is_wall(cell.step(action)))
            .collect()
    }

    fn successor(&self, agent: AgentIndex, action: Action) -> Self {
        let mut next = self.clone();
        if let Err(err) = next.apply(agent, action) {
            warn!(agent, %action, %err, "successor of rejected move");
        }
        next
    }

    fn agent_state(&self, agent: AgentIndex) -> Option<&AgentState> {
        self.agents.get(agent)
    }

    fn food(&self, team: Team) -> Vec<Coord> {
        let width = self.layout_width();
        self.food
            .iter()
            .copied()
            .filter(|food| team.is_home(food.x, width))
            .collect()
    }

    fn capsules(&self, team: Team) -> Vec<Coord> {
        let width = self.layout_width();
        self.capsules
            .iter()
            .copied()
            .filter(|capsule| team.is_home(capsule.x, width))
            .collect()
    }

    fn team_indices(&self, team: Team) -> Vec<AgentIndex> {
        (0..self.agents.len())
            .filter(|&index| Team::of_index(index) == team)
            .collect()
    }

    fn layout_width(&self) -> i32 {
        self.board.layout.maze.width()
    }

    fn maze_distance(&self, a: Coord, b: Coord) -> u32 {
        self.board.distancer.distance(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // %%%%%%%%%%
    // %1 .  o 2%
    // %3 o  . 4%
    // %%%%%%%%%%
    const SMALL: &str = "%%%%%%%%%%\n%1 .  o 2%\n%3 o  . 4%\n%%%%%%%%%%";

    fn small() -> CaptureState {
        CaptureState::new(Layout::parse(SMALL).unwrap(), 100)
    }

    #[test]
    fn test_initial_state() {
        let state = small();
        assert_eq!(state.num_agents(), 4);
        assert_eq!(state.score(), 0);
        assert_eq!(state.food(Team::Red), vec![Coord::new(3, 2)]);
        assert_eq!(state.food(Team::Blue), vec![Coord::new(6, 1)]);
        assert_eq!(state.capsules(Team::Red), vec![Coord::new(3, 1)]);
        assert_eq!(state.team_indices(Team::Blue), vec![1, 3]);
        assert!(!state.is_over());
    }

    #[test]
    fn test_legal_actions_respect_walls() {
        let state = small();
        // Agent 0 at (1, 2): wall north and west, agent 2 below is not a wall.
        assert_eq!(
            state.legal_actions(0),
            vec![Action::South, Action::East, Action::Stop]
        );
    }

    #[test]
    fn test_illegal_action_rejected() {
        let mut state = small();
        assert_eq!(
            state.apply(0, Action::North),
            Err(GameError::IllegalAction {
                agent: 0,
                action: Action::North
            })
        );
        assert_eq!(state.apply(9, Action::Stop), Err(GameError::UnknownAgent(9)));
    }

    #[test]
    fn test_stop_keeps_facing() {
        let mut state = small();
        state.apply(0, Action::East).unwrap();
        state.apply(0, Action::Stop).unwrap();
        assert_eq!(state.agents()[0].direction, Action::East);
        assert_eq!(state.turn(), 2);
    }

    #[test]
    fn test_eat_and_return_food() {
        let mut state = small();
        state.place(0, Coord::new(5, 1).into()).unwrap();
        assert!(state.agents()[0].is_pacman);
        state.apply(0, Action::East).unwrap();
        assert_eq!(state.agents()[0].carrying, vec![Coord::new(6, 1)]);
        assert!(state.food(Team::Blue).is_empty());
        state.apply(0, Action::West).unwrap();
        state.apply(0, Action::West).unwrap();
        assert!(!state.agents()[0].is_pacman);
        assert_eq!(state.score(), 1);
        assert_eq!(state.returned(Team::Red), 1);
    }

    #[test]
    fn test_pacman_eaten_by_ghost_drops_food() {
        let mut state = small();
        state.place(0, Coord::new(6, 1).into()).unwrap();
        state.place(3, Coord::new(7, 2).into()).unwrap();
        state.apply(0, Action::West).unwrap();
        state.apply(0, Action::East).unwrap();
        assert_eq!(state.agents()[0].carrying.len(), 1);
        state.apply(0, Action::East).unwrap();
        state.apply(0, Action::North).unwrap();
        // Agent 0 walked into the ghost at (7, 2).
        assert_eq!(state.agents()[0].position, Some(Coord::new(1, 2).into()));
        assert!(state.agents()[0].carrying.is_empty());
        assert!(state.food_set().contains(&Coord::new(6, 1)));
    }

    #[test]
    fn test_capsule_scares_and_slows_ghosts() {
        let mut state = small();
        state.place(0, Coord::new(5, 2).into()).unwrap();
        state.apply(0, Action::East).unwrap();
        assert_eq!(state.agents()[1].scared_timer, SCARED_TIME);
        assert_eq!(state.agents()[3].scared_timer, SCARED_TIME);

        state.apply(1, Action::West).unwrap();
        let pos = state.agents()[1].position.unwrap();
        assert!(!pos.is_aligned());
        assert_eq!(state.legal_actions(1), vec![Action::West]);
        state.apply(1, Action::West).unwrap();
        assert_eq!(state.agents()[1].position, Some(Coord::new(7, 2).into()));
    }

    #[test]
    fn test_scared_ghost_is_eaten() {
        let mut state = small();
        state.place(0, Coord::new(5, 2).into()).unwrap();
        state.apply(0, Action::East).unwrap();
        state.apply(0, Action::East).unwrap();
        // Pacman walks onto scared ghost 1 at (8, 2).
        state.apply(0, Action::East).unwrap();
        assert_eq!(state.agents()[0].position, Some(Coord::new(8, 2).into()));
        assert_eq!(state.agents()[1].position, Some(Coord::new(8, 2).into()));
        assert_eq!(state.agents()[1].scared_timer, 0);
        assert_eq!(state.agents()[3].scared_timer, SCARED_TIME);
    }

    #[test]
    fn test_game_ends_at_max_turns() {
        let mut state = CaptureState::new(Layout::parse(SMALL).unwrap(), 2);
        state.apply(0, Action::Stop).unwrap();
        state.apply(1, Action::Stop).unwrap();
        assert!(state.is_over());
        assert_eq!(state.apply(2, Action::Stop), Err(GameError::GameOver));
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_observe_hides_distant_enemies() {
        let state = small();
        let seen = state.observe(Team::Red);
        assert!(seen.agents()[0].position.is_some());
        assert!(seen.agents()[1].position.is_none());
        let mut close = small();
        close.place(1, Coord::new(4, 2).into()).unwrap();
        assert!(close.observe(Team::Red).agents()[1].position.is_some());
    }

    #[test]
    fn test_successor_leaves_original_untouched() {
        let state = small();
        let next = state.successor(0, Action::East);
        assert_eq!(next.agents()[0].cell(), Some(Coord::new(2, 2)));
        assert_eq!(state.agents()[0].cell(), Some(Coord::new(1, 2)));
        let same = state.successor(0, Action::North);
        assert_eq!(same.turn(), 0);
    }
}
