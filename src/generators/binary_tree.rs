use rand::{Rng, RngCore};

use crate::{
    error::MazeError,
    generators::{Carver, Traversal},
    maze::{Direction, Maze},
};

/// Binary tree sweep: every cell links either up or to the left.
pub struct BinaryTree {
    /// Row-major index of the next cell to link. The entry (index 0) needs no link.
    next: usize,
}

impl BinaryTree {
    pub fn new(maze: &mut Maze) -> Self {
        maze.blink(maze.entry());
        BinaryTree { next: 1 }
    }
}

impl Carver for BinaryTree {
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

        let direction = match cell {
            (0, _) => Direction::Left,
            (_, 0) => Direction::Up,
            _ if rng.random_bool(0.5) => Direction::Up,
            _ => Direction::Left,
        };
        let parent = maze
            .neighbor(cell, direction)
            .ok_or(MazeError::InvalidAdjacency {
                from: cell,
                to: cell,
                direction,
            })?;

        walk.current = cell;
        maze.flash(cell);
        walk.carve(maze, parent, cell)?;
        Ok(self.next < maze.cell_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Generator, testing};

    #[test]
    fn test_binary_tree_links_up_or_left() {
        let (maze, solution) = testing::run(Generator::BinaryTree, 6, 8, 11);
        testing::assert_perfect(&maze, &solution);
        for (coord, _) in maze.cells().skip(1) {
            let parent = solution.parent(coord).unwrap();
            assert!(parent == (coord.0.wrapping_sub(1), coord.1) || parent == (coord.0, coord.1 - 1));
        }
        // The top row and the left column have no choice
        assert!((1..8).all(|c| solution.parent((0, c)) == Some((0, c - 1))));
        assert!((1..6).all(|r| solution.parent((r, 0)) == Some((r - 1, 0))));
    }
}
