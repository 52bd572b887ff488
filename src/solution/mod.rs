pub mod path;

use std::collections::VecDeque;

use crate::error::MazeError;
use crate::maze::{Coord, Maze};

pub use path::{Gradient, PathStep, Rgb, reconstruct_path};

/// Parent pointers of the spanning tree, oriented toward the entry cell.
///
/// Storage is indexed by the maze's row-major cell index, so the map never owns cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionMap {
    rows: u16,
    cols: u16,
    parents: Box<[Option<Coord>]>,
    edges: usize,
}

impl SolutionMap {
    pub fn new(rows: u16, cols: u16) -> Self {
        SolutionMap {
            rows,
            cols,
            parents: vec![None; rows as usize * cols as usize].into_boxed_slice(),
            edges: 0,
        }
    }

    fn index(&self, coord: Coord) -> usize {
        coord.0 as usize * self.cols as usize + coord.1 as usize
    }

    /// Links `child` to `parent`.
    ///
    /// # Errors
    /// [`MazeError::DuplicateEdge`] if `child` already has a parent: every cell joins the
    /// tree exactly once.
    pub fn record_edge(&mut self, child: Coord, parent: Coord) -> Result<(), MazeError> {
        let idx = self.index(child);
        if let Some(existing) = self.parents[idx] {
            return Err(MazeError::DuplicateEdge {
                child,
                existing,
                parent,
            });
        }
        self.parents[idx] = Some(parent);
        self.edges += 1;
        Ok(())
    }

    pub fn parent(&self, child: Coord) -> Option<Coord> {
        if child.0 >= self.rows || child.1 >= self.cols {
            return None;
        }
        self.parents[self.index(child)]
    }

    /// Number of recorded edges.
    pub fn len(&self) -> usize {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges == 0
    }

    /// All `(child, parent)` pairs in row-major order of the child.
    pub fn edges(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        let cols = self.cols as usize;
        self.parents.iter().enumerate().filter_map(move |(i, p)| {
            p.map(|parent| (((i / cols) as u16, (i % cols) as u16), parent))
        })
    }

    /// Number of parent hops from `from` to the cell that has no parent.
    ///
    /// # Errors
    /// [`MazeError::BrokenPath`] if the chain is longer than the number of cells, which can
    /// only happen when it loops.
    pub fn depth(&self, from: Coord) -> Result<usize, MazeError> {
        let limit = self.parents.len();
        let mut hops = 0;
        let mut at = from;
        while let Some(parent) = self.parent(at) {
            hops += 1;
            if hops >= limit {
                return Err(MazeError::BrokenPath { at });
            }
            at = parent;
        }
        Ok(hops)
    }

    /// Builds the parent map of an already carved maze by walking its open walls outward
    /// from `root`. Used by generators whose carving order does not follow the tree.
    pub fn span(maze: &Maze, root: Coord) -> Result<Self, MazeError> {
        let mut solution = SolutionMap::new(maze.rows(), maze.cols());
        let mut seen = vec![false; maze.cell_count()];
        seen[maze.index_of(root)] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(at) = queue.pop_front() {
            for next in maze.passages(at) {
                let idx = maze.index_of(next);
                if seen[idx] {
                    continue;
                }
                seen[idx] = true;
                solution.record_edge(next, at)?;
                queue.push_back(next);
            }
        }
        Ok(solution)
    }
}
