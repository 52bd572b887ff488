use rand::{RngCore, SeedableRng, rngs::StdRng};

mod binary_tree;
mod dfs;
mod eller;
mod hunt_kill;
mod prim;
mod sidewinder;

pub use binary_tree::BinaryTree;
pub use dfs::DepthFirst;
pub use eller::{Eller, Partition};
pub use hunt_kill::{HuntAndKill, HuntCursor};
pub use prim::{Frontier, Prim};
pub use sidewinder::Sidewinder;

use crate::{
    error::MazeError,
    maze::{Coord, Maze},
    solution::SolutionMap,
};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    DepthFirst,
    Prims,
    BinaryTree,
    HuntAndKill,
    Sidewinder,
    Ellers,
}

impl Generator {
    pub const ALL: [Generator; 6] = [
        Generator::DepthFirst,
        Generator::Prims,
        Generator::BinaryTree,
        Generator::HuntAndKill,
        Generator::Sidewinder,
        Generator::Ellers,
    ];

    /// Sets up the algorithm's own state on a freshly built maze.
    pub(crate) fn carver(self, maze: &mut Maze, walk: &Traversal) -> Box<dyn Carver> {
        match self {
            Generator::DepthFirst => Box::new(DepthFirst::new(walk.current)),
            Generator::Prims => Box::new(Prim::new(maze, walk.current)),
            Generator::BinaryTree => Box::new(BinaryTree::new(maze)),
            Generator::HuntAndKill => Box::new(HuntAndKill::new()),
            Generator::Sidewinder => Box::new(Sidewinder::new()),
            Generator::Ellers => Box::new(Eller::new()),
        }
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::DepthFirst => write!(f, "Randomized Depth-First Search"),
            Generator::Prims => write!(f, "Prim's Algorithm"),
            Generator::BinaryTree => write!(f, "Binary Tree"),
            Generator::HuntAndKill => write!(f, "Hunt and Kill"),
            Generator::Sidewinder => write!(f, "Sidewinder"),
            Generator::Ellers => write!(f, "Eller's Algorithm"),
        }
    }
}

/// State shared by every generator: the cell being worked on and the tree built so far.
pub struct Traversal {
    pub current: Coord,
    pub solution: SolutionMap,
}

impl Traversal {
    /// Starts at the maze entry, which is visited right away.
    pub fn new(maze: &mut Maze) -> Self {
        let entry = maze.entry();
        maze.visit(entry);
        Traversal {
            current: entry,
            solution: SolutionMap::new(maze.rows(), maze.cols()),
        }
    }

    pub fn record_edge(&mut self, child: Coord, parent: Coord) -> Result<(), MazeError> {
        self.solution.record_edge(child, parent)
    }

    /// Connects `parent` to the unvisited `child`: opens the wall, links the child into the
    /// tree and marks it visited.
    pub fn carve(&mut self, maze: &mut Maze, parent: Coord, child: Coord) -> Result<(), MazeError> {
        maze.open_wall_between(parent, child)?;
        self.record_edge(child, parent)?;
        maze.visit(child);
        Ok(())
    }

    /// Carves from `current` into `next` and moves there.
    pub fn walk_to(&mut self, maze: &mut Maze, next: Coord) -> Result<(), MazeError> {
        self.carve(maze, self.current, next)?;
        self.current = next;
        Ok(())
    }
}

/// A maze generation algorithm, driven one atomic unit at a time.
pub trait Carver {
    /// Performs the next unit of work, emitting its events through `maze`.
    ///
    /// Returns `Ok(false)` once the algorithm has nothing left to do; from then on every
    /// call must keep returning `Ok(false)` without touching the maze.
    fn advance(
        &mut self,
        maze: &mut Maze,
        walk: &mut Traversal,
        rng: &mut dyn RngCore,
    ) -> Result<bool, MazeError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Runs `generator` to the end on a fresh maze.
    pub fn run(generator: Generator, rows: u16, cols: u16, seed: u64) -> (Maze, SolutionMap) {
        let mut maze = Maze::new(rows, cols).unwrap();
        let mut walk = Traversal::new(&mut maze);
        let mut carver = generator.carver(&mut maze, &walk);
        let mut rng = get_rng(Some(seed));
        while carver.advance(&mut maze, &mut walk, &mut rng).unwrap() {}
        (maze, walk.solution)
    }

    /// Checks the spanning tree properties every generator must satisfy.
    pub fn assert_perfect(maze: &Maze, solution: &SolutionMap) {
        assert_eq!(solution.len(), maze.cell_count() - 1);
        assert!(solution.parent(maze.entry()).is_none());
        let open_walls: usize = maze.cells().map(|(_, cell)| cell.open_walls().len()).sum();
        assert_eq!(open_walls, 2 * (maze.cell_count() - 1), "walls opened must match tree edges");
        for (coord, cell) in maze.cells() {
            assert!(cell.is_visited(), "{:?} was never visited", coord);
            assert!(solution.depth(coord).is_ok());
            if let Some(parent) = solution.parent(coord) {
                assert!(
                    maze.passages(coord).any(|c| c == parent),
                    "{:?} is linked to {:?} through a closed wall",
                    coord,
                    parent
                );
            }
        }
    }
}
