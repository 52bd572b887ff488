use rand::{RngCore, seq::IndexedRandom};

use crate::{
    error::MazeError,
    generators::{Carver, Traversal},
    maze::{Coord, Maze},
};

/// Row-major scan position used to find where the next walk starts.
///
/// The cursor only ever moves forward. Once it has passed the last cell it is exhausted
/// and stays that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuntCursor {
    row: u16,
    col: u16,
    exhausted: bool,
}

impl HuntCursor {
    pub fn new() -> Self {
        HuntCursor {
            row: 0,
            col: 0,
            exhausted: false,
        }
    }

    /// Current position, `None` once the scan is over.
    pub fn position(&self) -> Option<Coord> {
        (!self.exhausted).then_some((self.row, self.col))
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Moves one cell to the right, wrapping to the start of the next row.
    pub fn advance(&mut self, rows: u16, cols: u16) {
        if self.exhausted {
            return;
        }
        if self.col + 1 < cols {
            self.col += 1;
        } else if self.row + 1 < rows {
            self.row += 1;
            self.col = 0;
        } else {
            self.exhausted = true;
        }
    }
}

impl Default for HuntCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Hunt-and-kill: random walks, restarted from the first cell in row-major order that
/// still borders an unvisited cell.
#[derive(Default)]
pub struct HuntAndKill {
    cursor: HuntCursor,
}

impl HuntAndKill {
    pub fn new() -> Self {
        HuntAndKill {
            cursor: HuntCursor::new(),
        }
    }
}

impl Carver for HuntAndKill {
    fn advance(
        &mut self,
        maze: &mut Maze,
        walk: &mut Traversal,
        rng: &mut dyn RngCore,
    ) -> Result<bool, MazeError> {
        let Some(hunt) = self.cursor.position() else {
            return Ok(false);
        };

        let neighbors = maze.unvisited_neighbors(walk.current);
        if let Some(&next) = neighbors.choose(rng) {
            walk.walk_to(maze, next)?;
            return Ok(true);
        }

        // Every cell before the cursor is surrounded by visited cells, so the cell under
        // the cursor is itself visited and a new walk may start from it
        maze.blink(walk.current);
        walk.current = hunt;
        if maze.unvisited_neighbors(hunt).is_empty() {
            self.cursor.advance(maze.rows(), maze.cols());
        }
        Ok(!self.cursor.is_exhausted())
    }
}
