//! Maze geometry: grid coordinates, continuous positions and walls.

// Grid indices are validated non-negative before any cast to usize
#![allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]

use serde::{Deserialize, Serialize};

use crate::game::Action;

/// A cell on the maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column, grows eastward).
    pub x: i32,
    /// Y coordinate (row, grows northward).
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell reached by `action`.
    #[must_use]
    pub const fn step(self, action: Action) -> Self {
        let (dx, dy) = action.vector();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance to another cell.
    #[must_use]
    pub const fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<Coord> for Position {
    fn from(coord: Coord) -> Self {
        Self::new(f64::from(coord.x), f64::from(coord.y))
    }
}

/// A continuous agent position.
///
/// Agents normally sit on cell centres; half-speed movement leaves them
/// between two cells until the next step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The closest grid cell.
    #[must_use]
    pub fn nearest(self) -> Coord {
        Coord::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Whether the position lies exactly on a cell centre.
    #[must_use]
    pub fn is_aligned(self) -> bool {
        self.x.fract() == 0.0 && self.y.fract() == 0.0
    }

    /// Move `speed` cells in the direction of `action`.
    #[must_use]
    pub fn advance(self, action: Action, speed: f64) -> Self {
        let (dx, dy) = action.vector();
        Self::new(
            self.x + f64::from(dx) * speed,
            self.y + f64::from(dy) * speed,
        )
    }

    /// Manhattan distance between two continuous positions.
    #[must_use]
    pub fn manhattan(self, other: Position) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Wall layout of a maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    /// Width in cells.
    width: i32,
    /// Height in cells.
    height: i32,
    /// Wall flags stored in row-major order, row 0 is `y = 0`.
    walls: Vec<bool>,
}

impl Maze {
    /// Create an open maze with no walls.
    ///
    /// Returns `None` if width or height is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let size = width as usize * height as usize;
        Some(Self {
            width,
            height,
            walls: vec![false; size],
        })
    }

    /// Width of the maze in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the maze in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// First column of the eastern half. Red owns `x < midline`.
    #[must_use]
    pub const fn midline(&self) -> i32 {
        self.width / 2
    }

    /// Check if a coordinate is within the maze bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    /// Whether a cell is a wall. Out-of-bounds cells count as walls.
    #[must_use]
    pub fn is_wall(&self, coord: Coord) -> bool {
        self.index(coord).is_none_or(|idx| self.walls[idx])
    }

    /// Set or clear a wall.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set_wall(&mut self, coord: Coord, wall: bool) -> bool {
        if let Some(idx) = self.index(coord) {
            self.walls[idx] = wall;
            true
        } else {
            false
        }
    }

    /// Iterate over every open (non-wall) cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let width = self.width;
        self.walls
            .iter()
            .enumerate()
            .filter(|(_, wall)| !**wall)
            .map(move |(idx, _)| Coord::new(idx as i32 % width, idx as i32 / width))
    }

    /// Open cells orthogonally adjacent to `coord`.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        [Action::North, Action::South, Action::East, Action::West]
            .into_iter()
            .map(move |action| coord.step(action))
            .filter(|next| !self.is_wall(*next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maze_zero_size() {
        assert!(Maze::new(0, 10).is_none());
        assert!(Maze::new(10, -1).is_none());
    }

    #[test]
    fn test_maze_bounds_are_walls() {
        let maze = Maze::new(4, 3).unwrap();
        assert!(!maze.is_wall(Coord::new(0, 0)));
        assert!(!maze.is_wall(Coord::new(3, 2)));
        assert!(maze.is_wall(Coord::new(4, 0)));
        assert!(maze.is_wall(Coord::new(0, -1)));
    }

    #[test]
    fn test_neighbors_skip_walls() {
        let mut maze = Maze::new(3, 3).unwrap();
        maze.set_wall(Coord::new(1, 2), true);
        let around: Vec<_> = maze.neighbors(Coord::new(1, 1)).collect();
        assert_eq!(around.len(), 3);
        assert!(!around.contains(&Coord::new(1, 2)));
    }

    #[test]
    fn test_corner_neighbors() {
        let maze = Maze::new(10, 10).unwrap();
        let around: Vec<_> = maze.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(around, vec![Coord::new(0, 1), Coord::new(1, 0)]);
    }

    #[test]
    fn test_open_cells_row_major() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.set_wall(Coord::new(1, 0), true);
        let open: Vec<_> = maze.open_cells().collect();
        assert_eq!(
            open,
            vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 1)]
        );
    }

    #[test]
    fn test_position_alignment() {
        let pos = Position::from(Coord::new(3, 4));
        assert!(pos.is_aligned());
        let half = pos.advance(Action::East, 0.5);
        assert!(!half.is_aligned());
        assert_eq!(half.advance(Action::East, 0.5).nearest(), Coord::new(4, 4));
    }

    #[test]
    fn test_coord_step_and_manhattan() {
        let c = Coord::new(2, 2);
        assert_eq!(c.step(Action::North), Coord::new(2, 3));
        assert_eq!(c.step(Action::Stop), c);
        assert_eq!(c.manhattan(Coord::new(5, 0)), 5);
    }
}
