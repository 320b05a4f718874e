//! Text layouts.
//!
//! A layout is a rectangle of characters:
//!
//! ```text
//! %  wall
//! .  food
//! o  capsule
//! 1-9 agent start (agent index = digit - 1)
//!    (space) open floor
//! ```
//!
//! The first line is the northern edge of the maze.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::LayoutError;
use crate::game::{Coord, Maze};

/// Default two-versus-two capture layout.
pub const DEFAULT_LAYOUT: &str = "\
%%%%%%%%%%%%%%%%%%%%%%%%
%      .  %%%  .  .   2%
% %%% %%.   .   %% %%% %
% %.    %% %% %   ... 4%
% % %%.      .  %%%% % %
%o. .  %%      %%  . .o%
% % %%%%  .      .%% % %
%3 ...   % %% %%    .% %
% %%% %%   .   .%% %%% %
%1   .  .  %%%  .      %
%%%%%%%%%%%%%%%%%%%%%%%%";

/// A parsed layout: walls, food, capsules and agent start cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Wall grid.
    pub maze: Maze,
    /// Initial food cells.
    pub food: BTreeSet<Coord>,
    /// Initial capsule cells.
    pub capsules: BTreeSet<Coord>,
    /// Start cell per agent index.
    pub agent_starts: Vec<Coord>,
    /// Source text, normalised to trimmed lines.
    text: String,
}

impl Layout {
    /// Parse a layout from text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty, not rectangular, contains an
    /// unknown character, or the agent digits are not `1..=n` for an even
    /// `n >= 2`.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(LayoutError::Empty);
        };

        let width = first.chars().count();
        let height = lines.len();
        let too_big = |n: usize| i32::try_from(n).map_err(|_| LayoutError::TooLarge(n));
        let (w, h) = (too_big(width)?, too_big(height)?);
        let mut maze = Maze::new(w, h).ok_or(LayoutError::Empty)?;

        let mut food = BTreeSet::new();
        let mut capsules = BTreeSet::new();
        let mut starts: Vec<Option<Coord>> = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            // Row 0 is the top of the maze.
            let y = h - 1 - too_big(row)?;
            for (col, ch) in line.chars().enumerate() {
                let coord = Coord::new(too_big(col)?, y);
                match ch {
                    '%' => {
                        maze.set_wall(coord, true);
                    }
                    '.' => {
                        food.insert(coord);
                    }
                    'o' => {
                        capsules.insert(coord);
                    }
                    ' ' => {}
                    '1'..='9' => {
                        let index = ch as usize - '1' as usize;
                        if starts.len() <= index {
                            starts.resize(index + 1, None);
                        }
                        if starts[index].replace(coord).is_some() {
                            return Err(LayoutError::DuplicateAgent(index + 1));
                        }
                    }
                    other => {
                        return Err(LayoutError::UnknownTile { ch: other, row, col });
                    }
                }
            }
        }

        let agent_starts = starts
            .iter()
            .enumerate()
            .map(|(i, start)| start.ok_or(LayoutError::MissingAgent(i + 1)))
            .collect::<Result<Vec<_>, _>>()?;
        if agent_starts.len() < 2 || agent_starts.len() % 2 != 0 {
            return Err(LayoutError::AgentCount(agent_starts.len()));
        }

        Ok(Self {
            maze,
            food,
            capsules,
            agent_starts,
            text: lines.join("\n"),
        })
    }

    /// The built-in default layout.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the default text is covered by tests.
    pub fn default_capture() -> Result<Self, LayoutError> {
        Self::parse(DEFAULT_LAYOUT)
    }

    /// Normalised layout text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of agents placed by the layout.
    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.agent_starts.len()
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_parses() {
        let layout = Layout::default_capture().unwrap();
        assert_eq!(layout.maze.width(), 24);
        assert_eq!(layout.maze.height(), 11);
        assert_eq!(layout.num_agents(), 4);
        assert!(!layout.food.is_empty());
        assert_eq!(layout.capsules.len(), 2);
    }

    #[test]
    fn test_default_layout_is_point_symmetric() {
        let layout = Layout::default_capture().unwrap();
        let (w, h) = (layout.maze.width(), layout.maze.height());
        let mirror = |c: Coord| Coord::new(w - 1 - c.x, h - 1 - c.y);
        for cell in layout.maze.open_cells() {
            assert!(!layout.maze.is_wall(mirror(cell)), "{cell:?}");
        }
        for food in &layout.food {
            assert!(layout.food.contains(&mirror(*food)), "{food:?}");
        }
        for capsule in &layout.capsules {
            assert!(layout.capsules.contains(&mirror(*capsule)));
        }
        assert_eq!(mirror(layout.agent_starts[0]), layout.agent_starts[1]);
        assert_eq!(mirror(layout.agent_starts[2]), layout.agent_starts[3]);
    }

    #[test]
    fn test_red_starts_on_west_half() {
        let layout = Layout::default_capture().unwrap();
        let mid = layout.maze.midline();
        assert!(layout.agent_starts[0].x < mid);
        assert!(layout.agent_starts[2].x < mid);
        assert!(layout.agent_starts[1].x >= mid);
        assert!(layout.agent_starts[3].x >= mid);
    }

    #[test]
    fn test_first_line_is_north() {
        let layout = Layout::parse("%%%%\n%12%\n%..%\n%%%%").unwrap();
        assert_eq!(layout.agent_starts[0], Coord::new(1, 2));
        assert!(layout.food.contains(&Coord::new(1, 1)));
        assert!(layout.maze.is_wall(Coord::new(0, 3)));
    }

    #[test]
    fn test_rejects_ragged() {
        let err = Layout::parse("%%%%\n%12\n%%%%").unwrap_err();
        assert_eq!(
            err,
            LayoutError::Ragged {
                row: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_rejects_unknown_tile() {
        let err = Layout::parse("%%%%\n%1G2\n%%%%").unwrap_err();
        assert_eq!(err, LayoutError::UnknownTile { ch: 'G', row: 1, col: 2 });
    }

    #[test]
    fn test_rejects_bad_agents() {
        assert_eq!(Layout::parse("").unwrap_err(), LayoutError::Empty);
        assert_eq!(
            Layout::parse("%%%\n%1%\n%%%").unwrap_err(),
            LayoutError::AgentCount(1)
        );
        assert_eq!(
            Layout::parse("%%%%\n%13%\n%%%%").unwrap_err(),
            LayoutError::MissingAgent(2)
        );
        assert_eq!(
            Layout::parse("%%%%\n%11%\n%%%%").unwrap_err(),
            LayoutError::DuplicateAgent(1)
        );
    }
}
