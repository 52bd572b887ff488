use rand::{RngCore, seq::IndexedRandom};

use crate::{
    error::MazeError,
    generators::{Carver, Traversal},
    maze::{Coord, Maze},
};

/// Randomized depth-first search (recursive backtracker).
pub struct DepthFirst {
    /// Path from the entry to the current cell. Only holds visited cells.
    stack: Vec<Coord>,
}

impl DepthFirst {
    pub fn new(entry: Coord) -> Self {
        DepthFirst { stack: vec![entry] }
    }
}

impl Carver for DepthFirst {
    fn advance(
        &mut self,
        maze: &mut Maze,
        walk: &mut Traversal,
        rng: &mut dyn RngCore,
    ) -> Result<bool, MazeError> {
        if self.stack.is_empty() {
            return Ok(false);
        }

        let neighbors = maze.unvisited_neighbors(walk.current);
        match neighbors.choose(rng) {
            Some(&next) => {
                walk.walk_to(maze, next)?;
                self.stack.push(next);
            }
            None => {
                // Dead end: drop it and go back to the cell we came from
                if let Some(dead_end) = self.stack.pop() {
                    maze.blink(dead_end);
                }
                if let Some(&top) = self.stack.last() {
                    walk.current = top;
                }
            }
        }
        Ok(!self.stack.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Generator, testing};
    use crate::maze::MazeEvent;

    #[test]
    fn test_randomized_dfs() {
        let (maze, solution) = testing::run(Generator::DepthFirst, 5, 5, 42);
        testing::assert_perfect(&maze, &solution);
        assert_eq!(solution.len(), 24);
    }

    #[test]
    fn test_backtrack_blinks_dead_end() {
        let mut maze = Maze::new(1, 2).unwrap();
        let mut walk = Traversal::new(&mut maze);
        let mut dfs = DepthFirst::new(walk.current);
        let mut rng = crate::generators::get_rng(Some(0));
        maze.next_event(); // entry visit

        assert!(dfs.advance(&mut maze, &mut walk, &mut rng).unwrap());
        assert_eq!(walk.current, (0, 1));
        // (0, 1) is a dead end, it is popped and we are back at the entry
        assert!(dfs.advance(&mut maze, &mut walk, &mut rng).unwrap());
        assert_eq!(walk.current, (0, 0));
        assert!(!dfs.advance(&mut maze, &mut walk, &mut rng).unwrap());
        assert!(!dfs.advance(&mut maze, &mut walk, &mut rng).unwrap());

        let events = std::iter::from_fn(|| maze.next_event()).collect::<Vec<_>>();
        assert_eq!(
            events[2..],
            [
                MazeEvent::Flashed((0, 1)),
                MazeEvent::Covered((0, 1)),
                MazeEvent::Flashed((0, 0)),
                MazeEvent::Covered((0, 0)),
            ]
        );
    }
}
