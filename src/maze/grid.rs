use std::collections::VecDeque;

use super::cell::Cell;
use super::{Coord, Direction};

/// A single observable change to the maze, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeEvent {
    /// The cell joined the maze.
    VisitedCell(Coord),
    /// The wall between `from` and `to` was removed. `direction` points from `from` to `to`.
    OpenedWall {
        from: Coord,
        to: Coord,
        direction: Direction,
    },
    /// The cell is being considered (highlighted) by the generator.
    Flashed(Coord),
    /// The highlight on the cell was removed.
    Covered(Coord),
}

/// Row-major cell storage plus the queue of events not yet handed to an observer.
pub struct Grid {
    data: Box<[Cell]>,
    rows: u16,
    cols: u16,
    pending: VecDeque<MazeEvent>,
}

impl Grid {
    pub fn new(rows: u16, cols: u16, mut make_cell: impl FnMut(Coord) -> Cell) -> Self {
        let data = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(&mut make_cell)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Grid {
            data,
            rows,
            cols,
            pending: VecDeque::new(),
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    pub fn ravel_index(&self, coord: Coord) -> usize {
        // Overflow-safe since rows and cols are u16 (assuming usize is at least 32 bits)
        coord.0 as usize * self.cols as usize + coord.1 as usize
    }

    pub fn unravel_index(&self, index: usize) -> Coord {
        let cols = self.cols as usize;
        ((index / cols) as u16, (index % cols) as u16)
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, cell)| (self.unravel_index(i), cell))
    }

    pub fn emit(&mut self, event: MazeEvent) {
        self.pending.push_back(event);
    }

    pub fn next_event(&mut self) -> Option<MazeEvent> {
        self.pending.pop_front()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl std::ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let idx = self.ravel_index(index);
        &mut self.data[idx]
    }
}
