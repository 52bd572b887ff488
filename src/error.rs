use thiserror::Error;

use crate::maze::{Coord, Direction};

/// Errors raised by the maze model and the generation engine.
///
/// None of these are recoverable inside a run: they signal either bad dimensions handed in
/// by the caller or a bug in one of the generators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze must be at least 1x1, got {rows}x{cols}")]
    EmptyGrid { rows: u16, cols: u16 },

    #[error("cell {to:?} is not the {direction} neighbor of {from:?}")]
    InvalidAdjacency {
        from: Coord,
        to: Coord,
        direction: Direction,
    },

    #[error("cell {child:?} is already linked to {existing:?}, refusing to link it to {parent:?}")]
    DuplicateEdge {
        child: Coord,
        existing: Coord,
        parent: Coord,
    },

    #[error("maze generation has not finished yet")]
    Unfinished,

    #[error("cell {at:?} joined the frontier but touches no visited cell")]
    Unanchored { at: Coord },

    #[error("cell {at:?} was read before being assigned a partition")]
    Unpartitioned { at: Coord },

    #[error("a {rows}x{cols} maze is too large to draw, at most {max} cells per side")]
    TooLargeToDraw { rows: u16, cols: u16, max: u16 },

    #[error("path from the exit breaks off at {at:?} before reaching the entry")]
    BrokenPath { at: Coord },
}
