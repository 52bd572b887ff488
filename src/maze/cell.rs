use std::fmt;

use crate::maze::{Coord, Direction};

/// Identifier of an Eller's partition. Ids are handed out in increasing order, so a smaller
/// id always belongs to the older partition.
pub type PartitionId = u32;

/// Set of walls that have been knocked down around a cell.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenWalls(u8);

impl OpenWalls {
    pub const NONE: OpenWalls = OpenWalls(0);

    fn bit(direction: Direction) -> u8 {
        match direction {
            Direction::Up => 0b0001,
            Direction::Down => 0b0010,
            Direction::Left => 0b0100,
            Direction::Right => 0b1000,
        }
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= Self::bit(direction);
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|&d| self.contains(d))
    }
}

impl fmt::Display for OpenWalls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = [
            (Direction::Up, 'U'),
            (Direction::Down, 'D'),
            (Direction::Left, 'L'),
            (Direction::Right, 'R'),
        ];
        for (direction, symbol) in symbols {
            let c = if self.contains(direction) { symbol } else { '-' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// A single cell of the maze.
///
/// The neighbor list only describes grid adjacency and never changes after construction.
/// Whether two neighbors are actually connected is recorded in the open walls.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(super) visited: bool,
    pub(super) walls: OpenWalls,
    pub(super) partition: Option<PartitionId>,
    pub(super) neighbors: Vec<Coord>,
}

impl Cell {
    pub(super) fn new(neighbors: Vec<Coord>) -> Self {
        Cell {
            visited: false,
            walls: OpenWalls::NONE,
            partition: None,
            neighbors,
        }
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn open_walls(&self) -> OpenWalls {
        self.walls
    }

    pub fn partition(&self) -> Option<PartitionId> {
        self.partition
    }

    /// Grid-adjacent coordinates, ordered down, up, right, left.
    pub fn neighbors(&self) -> &[Coord] {
        &self.neighbors
    }
}
