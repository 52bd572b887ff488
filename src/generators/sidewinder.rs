use rand::{Rng, RngCore, seq::IndexedRandom};

use crate::{
    error::MazeError,
    generators::{Carver, Traversal},
    maze::{Coord, Direction, Maze},
};

/// Sidewinder: rows are carved as horizontal runs, each of which opens exactly once to
/// the row above.
#[derive(Default)]
pub struct Sidewinder {
    /// Row-major index of the next cell to process.
    next: usize,
    /// Cells of the current run, west to east, not yet connected northward.
    run: Vec<Coord>,
}

impl Sidewinder {
    /// Odds of extending the run east instead of closing it, as `numerator / denominator`.
    const EAST_ODDS: (u32, u32) = (2, 3);

    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a random run member upward and links every other member along the run
    /// toward it, so the whole run drains through the one opening. Clears the run.
    fn carve_north(
        &mut self,
        maze: &mut Maze,
        walk: &mut Traversal,
        rng: &mut dyn RngCore,
    ) -> Result<(), MazeError> {
        let Some(&chosen) = self.run.choose(rng) else {
            return Ok(());
        };
        maze.blink(chosen);
        let above = (chosen.0 - 1, chosen.1);
        maze.open_wall(chosen, above, Direction::Up)?;
        walk.record_edge(chosen, above)?;

        for &cell in self.run.iter().filter(|&&c| c != chosen) {
            let toward = if cell.1 < chosen.1 {
                (cell.0, cell.1 + 1)
            } else {
                (cell.0, cell.1 - 1)
            };
            walk.record_edge(cell, toward)?;
        }
        self.run.clear();
        Ok(())
    }
}

impl Carver for Sidewinder {
    fn advance(
        &mut self,
        maze: &mut Maze,
        walk: &mut Traversal,
        rng: &mut dyn RngCore,
    ) -> Result<bool, MazeError> {
        if self.next >= maze.cell_count() {
            return Ok(false);
        }
        let cell = maze.coord_of(self.next);
        self.next += 1;
        walk.current = cell;
        let is_last_in_row = cell.1 + 1 == maze.cols();

        if cell.0 == 0 {
            // Top row: one straight corridor heading east
            maze.blink(cell);
            if !is_last_in_row {
                walk.carve(maze, cell, (0, cell.1 + 1))?;
            }
            return Ok(self.next < maze.cell_count());
        }

        maze.blink(cell);
        maze.visit(cell);
        self.run.push(cell);
        let (num, den) = Self::EAST_ODDS;
        if !is_last_in_row && rng.random_ratio(num, den) {
            maze.open_wall(cell, (cell.0, cell.1 + 1), Direction::Right)?;
        } else {
            self.carve_north(maze, walk, rng)?;
        }
        Ok(self.next < maze.cell_count())
    }
}
