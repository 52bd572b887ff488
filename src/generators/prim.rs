use std::collections::HashMap;

use rand::{Rng, RngCore, seq::IndexedRandom};

use crate::{
    error::MazeError,
    generators::{Carver, Traversal},
    maze::{Coord, Maze},
};

/// Set of frontier cells supporting uniform random picks.
///
/// Items live in a vector so a pick is a single index draw from the injected rng; the map
/// only serves membership and removal lookups and is never iterated.
#[derive(Default, Debug)]
pub struct Frontier {
    items: Vec<Coord>,
    positions: HashMap<Coord, usize>,
}

impl Frontier {
    /// Returns `false` if the cell was already in the frontier.
    pub fn insert(&mut self, coord: Coord) -> bool {
        if self.positions.contains_key(&coord) {
            return false;
        }
        self.positions.insert(coord, self.items.len());
        self.items.push(coord);
        true
    }

    pub fn remove(&mut self, coord: &Coord) -> bool {
        let Some(idx) = self.positions.remove(coord) else {
            return false;
        };
        self.items.swap_remove(idx);
        if let Some(&moved) = self.items.get(idx) {
            self.positions.insert(moved, idx);
        }
        true
    }

    #[cfg(test)]
    fn contains(&self, coord: &Coord) -> bool {
        self.positions.contains_key(coord)
    }

    pub fn get_rand<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        self.items.choose(rng).copied()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Randomized Prim's algorithm over cells.
pub struct Prim {
    considering: Frontier,
}

impl Prim {
    pub fn new(maze: &mut Maze, entry: Coord) -> Self {
        let mut considering = Frontier::default();
        maze.flash(entry);
        for coord in maze.unvisited_neighbors(entry) {
            considering.insert(coord);
            maze.flash(coord);
        }
        Prim { considering }
    }
}

impl Carver for Prim {
    fn advance(
        &mut self,
        maze: &mut Maze,
        walk: &mut Traversal,
        rng: &mut dyn RngCore,
    ) -> Result<bool, MazeError> {
        let Some(frontier) = self.considering.get_rand(rng) else {
            return Ok(false);
        };
        walk.current = frontier;
        maze.visit(frontier);

        // A frontier cell always touches the maze, that is how it got into the frontier
        let anchor = maze
            .visited_neighbors(frontier)
            .choose(rng)
            .copied()
            .ok_or(MazeError::Unanchored { at: frontier })?;
        maze.open_wall_between(frontier, anchor)?;
        walk.record_edge(frontier, anchor)?;

        for coord in maze.unvisited_neighbors(frontier) {
            if self.considering.insert(coord) {
                maze.flash(coord);
            }
        }
        self.considering.remove(&frontier);
        Ok(!self.considering.is_empty())
    }
}
