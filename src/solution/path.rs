use crate::error::MazeError;
use crate::maze::{Coord, Direction};
use crate::solution::SolutionMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// How the green channel climbs along a path of a given length, taking the line from
/// deep red at the exit toward yellow at the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gradient {
    /// Short paths (255 steps or fewer): green grows by `per_step` on every step.
    Spread { per_step: u8 },
    /// Long paths: green grows by one every `every` steps.
    Stepped { every: usize },
}

impl Gradient {
    pub fn for_length(length: usize) -> Self {
        if length <= 255 {
            Gradient::Spread {
                per_step: (255 / length.max(1)) as u8,
            }
        } else {
            Gradient::Stepped {
                every: length / 255 + 1,
            }
        }
    }

    /// Green channel of the 0-based `step`, counted from the exit.
    pub fn green_at(&self, step: usize) -> u8 {
        let green = match *self {
            Gradient::Spread { per_step } => step.saturating_mul(per_step as usize),
            Gradient::Stepped { every } => step / every,
        };
        green.min(u8::MAX as usize) as u8
    }

    pub fn color_at(&self, step: usize) -> Rgb {
        Rgb::new(255, self.green_at(step), 0)
    }
}

/// One segment of the highlighted route: leave `cell` in `direction`, drawn in `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub cell: Coord,
    pub direction: Direction,
    pub color: Rgb,
}

/// Number of parent hops from `exit` to `entry`.
pub fn path_length(solution: &SolutionMap, entry: Coord, exit: Coord) -> Result<usize, MazeError> {
    let limit = solution.rows as usize * solution.cols as usize;
    let mut length = 0;
    let mut at = exit;
    while at != entry {
        at = match solution.parent(at) {
            Some(parent) if length < limit => parent,
            _ => return Err(MazeError::BrokenPath { at }),
        };
        length += 1;
    }
    Ok(length)
}

/// Walks the solution map from `exit` back to `entry` and colours every step.
///
/// The walk is done twice: once to measure the path so the gradient spans all of it, and
/// once to emit the steps. A 1x1 maze, where exit and entry coincide, yields no steps.
pub fn reconstruct_path(
    solution: &SolutionMap,
    entry: Coord,
    exit: Coord,
) -> Result<Vec<PathStep>, MazeError> {
    let length = path_length(solution, entry, exit)?;
    let gradient = Gradient::for_length(length);

    let mut steps = Vec::with_capacity(length);
    let mut at = exit;
    while at != entry {
        let parent = solution
            .parent(at)
            .ok_or(MazeError::BrokenPath { at })?;
        let direction = Direction::between(at, parent).ok_or(MazeError::BrokenPath { at })?;
        steps.push(PathStep {
            cell: at,
            direction,
            color: gradient.color_at(steps.len()),
        });
        at = parent;
    }
    tracing::debug!("[path] reconstructed {} steps, gradient {:?}", length, gradient);
    Ok(steps)
}
