//! All-pairs maze distances.
//!
//! Distances are computed once per layout with one breadth-first search per
//! open cell (in parallel) and then answered by table lookup.

#![allow(clippy::cast_sign_loss)]

use std::collections::VecDeque;

use rayon::prelude::*;

use crate::game::{Coord, Maze};

/// Distance reported between cells that cannot reach each other.
pub const UNREACHABLE: u32 = 100_000;

/// Precomputed shortest-path distances between every pair of open cells.
#[derive(Debug, Clone)]
pub struct Distancer {
    /// Maze width, for cell indexing.
    width: i32,
    /// Maze height, for cell indexing.
    height: i32,
    /// Dense index of each grid cell among open cells.
    slots: Vec<Option<usize>>,
    /// Row-major `n * n` distance table, `u16::MAX` for unreachable.
    table: Vec<u16>,
    /// Number of open cells.
    open: usize,
}

impl Distancer {
    /// Compute the distance table for a maze.
    #[must_use]
    pub fn new(maze: &Maze) -> Self {
        let cells: Vec<Coord> = maze.open_cells().collect();
        let open = cells.len();
        let mut slots = vec![None; maze.width() as usize * maze.height() as usize];
        for (slot, cell) in cells.iter().enumerate() {
            slots[cell.y as usize * maze.width() as usize + cell.x as usize] = Some(slot);
        }

        let mut distancer = Self {
            width: maze.width(),
            height: maze.height(),
            slots,
            table: Vec::new(),
            open,
        };

        let rows: Vec<Vec<u16>> = cells
            .par_iter()
            .map(|&source| distancer.bfs(maze, source))
            .collect();
        distancer.table = rows.into_iter().flatten().collect();
        distancer
    }

    fn slot(&self, coord: Coord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 || coord.x >= self.width || coord.y >= self.height {
            return None;
        }
        self.slots[coord.y as usize * self.width as usize + coord.x as usize]
    }

    /// Breadth-first search from `source`, one table row.
    fn bfs(&self, maze: &Maze, source: Coord) -> Vec<u16> {
        let mut row = vec![u16::MAX; self.open];
        let Some(start) = self.slot(source) else {
            return row;
        };
        row[start] = 0;
        let mut queue = VecDeque::from([(source, 0u16)]);
        while let Some((cell, dist)) = queue.pop_front() {
            for next in maze.neighbors(cell) {
                if let Some(slot) = self.slot(next) {
                    if row[slot] == u16::MAX {
                        row[slot] = dist.saturating_add(1);
                        queue.push_back((next, dist.saturating_add(1)));
                    }
                }
            }
        }
        row
    }

    /// Shortest-path distance, or `None` if either cell is a wall or the
    /// cells are disconnected.
    #[must_use]
    pub fn get(&self, a: Coord, b: Coord) -> Option<u32> {
        let (sa, sb) = (self.slot(a)?, self.slot(b)?);
        match self.table[sa * self.open + sb] {
            u16::MAX => None,
            d => Some(u32::from(d)),
        }
    }

    /// Shortest-path distance, [`UNREACHABLE`] when there is no path.
    #[must_use]
    pub fn distance(&self, a: Coord, b: Coord) -> u32 {
        self.get(a, b).unwrap_or(UNREACHABLE)
    }

    /// Number of open cells covered by the table.
    #[must_use]
    pub const fn open_cells(&self) -> usize {
        self.open
    }
}
