pub mod cell;
mod grid;

use std::fmt;

pub use cell::{Cell, OpenWalls, PartitionId};
pub use grid::MazeEvent;
use grid::Grid;

use crate::error::MazeError;

/// Cell coordinate as `(row, col)`, both 0-indexed from the top-left corner.
pub type Coord = (u16, u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Coordinate one step away from `from`. Only underflow is caught here, the upper
    /// bound is the maze's business.
    pub fn step(self, from: Coord) -> Option<Coord> {
        let (row, col) = from;
        match self {
            Direction::Up => row.checked_sub(1).map(|r| (r, col)),
            Direction::Down => row.checked_add(1).map(|r| (r, col)),
            Direction::Left => col.checked_sub(1).map(|c| (row, c)),
            Direction::Right => col.checked_add(1).map(|c| (row, c)),
        }
    }

    /// Direction leading from `from` to `to`, if the two are orthogonally adjacent.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| d.step(from) == Some(to))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// The rectangular maze: owns every cell and records every change as a [`MazeEvent`].
pub struct Maze {
    grid: Grid,
}

impl Maze {
    /// Builds a `rows` x `cols` maze with every wall standing and the neighbor lists wired.
    pub fn new(rows: u16, cols: u16) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::EmptyGrid { rows, cols });
        }
        let in_bounds = |c: &Coord| c.0 < rows && c.1 < cols;
        let grid = Grid::new(rows, cols, |coord| {
            let neighbors = [
                Direction::Down,
                Direction::Up,
                Direction::Right,
                Direction::Left,
            ]
            .into_iter()
            .filter_map(|d| d.step(coord))
            .filter(in_bounds)
            .collect();
            Cell::new(neighbors)
        });
        Ok(Maze { grid })
    }

    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    /// Total number of cells, never zero.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Top-left cell, where every solution path ends.
    pub fn entry(&self) -> Coord {
        (0, 0)
    }

    /// Bottom-right cell, where the solution path starts.
    pub fn exit(&self) -> Coord {
        (self.rows() - 1, self.cols() - 1)
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        self.grid.is_in_bounds(coord)
    }

    pub fn index_of(&self, coord: Coord) -> usize {
        self.grid.ravel_index(coord)
    }

    pub fn coord_of(&self, index: usize) -> Coord {
        self.grid.unravel_index(index)
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.grid.cells()
    }

    /// Neighbor of `coord` in `direction`, if it exists inside the maze.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        direction.step(coord).filter(|&c| self.is_in_bounds(c))
    }

    pub fn unvisited_neighbors(&self, coord: Coord) -> Vec<Coord> {
        self.grid[coord]
            .neighbors()
            .iter()
            .copied()
            .filter(|&c| !self.grid[c].visited)
            .collect()
    }

    pub fn visited_neighbors(&self, coord: Coord) -> Vec<Coord> {
        self.grid[coord]
            .neighbors()
            .iter()
            .copied()
            .filter(|&c| self.grid[c].visited)
            .collect()
    }

    /// Neighbors reachable from `coord` through an open wall.
    pub fn passages(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.grid[coord]
            .walls
            .iter()
            .filter_map(move |d| self.neighbor(coord, d))
    }

    /// Marks the cell as part of the maze. Visiting an already visited cell is a no-op.
    pub fn visit(&mut self, coord: Coord) {
        let cell = &mut self.grid[coord];
        if !cell.visited {
            cell.visited = true;
            self.grid.emit(MazeEvent::VisitedCell(coord));
        }
    }

    /// Removes the wall between `from` and its neighbor `to`, on both sides.
    ///
    /// # Errors
    /// [`MazeError::InvalidAdjacency`] if `to` is not the neighbor of `from` in `direction`.
    pub fn open_wall(
        &mut self,
        from: Coord,
        to: Coord,
        direction: Direction,
    ) -> Result<(), MazeError> {
        if !self.is_in_bounds(from) || self.neighbor(from, direction) != Some(to) {
            return Err(MazeError::InvalidAdjacency {
                from,
                to,
                direction,
            });
        }
        self.grid[from].walls.insert(direction);
        self.grid[to].walls.insert(direction.opposite());
        self.grid.emit(MazeEvent::OpenedWall {
            from,
            to,
            direction,
        });
        Ok(())
    }

    /// Same as [`Maze::open_wall`], working out the direction from the two coordinates.
    pub fn open_wall_between(&mut self, from: Coord, to: Coord) -> Result<(), MazeError> {
        match Direction::between(from, to) {
            Some(direction) => self.open_wall(from, to, direction),
            // Any direction will do for the report, none of them lead to `to`
            None => Err(MazeError::InvalidAdjacency {
                from,
                to,
                direction: Direction::Right,
            }),
        }
    }

    pub fn flash(&mut self, coord: Coord) {
        self.grid.emit(MazeEvent::Flashed(coord));
    }

    pub fn cover(&mut self, coord: Coord) {
        self.grid.emit(MazeEvent::Covered(coord));
    }

    /// Flash immediately followed by cover, the backtracking blink.
    pub fn blink(&mut self, coord: Coord) {
        self.flash(coord);
        self.cover(coord);
    }

    pub(crate) fn set_partition(&mut self, coord: Coord, partition: PartitionId) {
        self.grid[coord].partition = Some(partition);
    }

    pub(crate) fn next_event(&mut self) -> Option<MazeEvent> {
        self.grid.next_event()
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        self.grid.has_pending_events()
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dimensions_rejected() {
        assert_eq!(
            Maze::new(0, 5).err(),
            Some(MazeError::EmptyGrid { rows: 0, cols: 5 })
        );
        assert!(Maze::new(3, 0).is_err());
        assert!(Maze::new(1, 1).is_ok());
    }

    #[test]
    fn test_neighbors_wired_in_bounds() {
        let maze = Maze::new(3, 3).unwrap();
        assert_eq!(maze[(1, 1)].neighbors(), &[(2, 1), (0, 1), (1, 2), (1, 0)]);
        assert_eq!(maze[(0, 0)].neighbors(), &[(1, 0), (0, 1)]);
        assert_eq!(maze[(2, 2)].neighbors(), &[(1, 2), (2, 1)]);
        let single = Maze::new(1, 1).unwrap();
        assert!(single[(0, 0)].neighbors().is_empty());
    }

    #[test]
    fn test_visited_filters() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.visit((0, 1));
        assert_eq!(maze.visited_neighbors((0, 0)), vec![(0, 1)]);
        assert_eq!(maze.unvisited_neighbors((0, 0)), vec![(1, 0)]);
        assert_eq!(maze.next_event(), Some(MazeEvent::VisitedCell((0, 1))));
        // A second visit stays silent
        maze.visit((0, 1));
        assert_eq!(maze.next_event(), None);
    }

    #[test]
    fn test_open_wall_is_symmetric() {
        let mut maze = Maze::new(3, 3).unwrap();
        maze.open_wall((1, 1), (2, 1), Direction::Down).unwrap();
        assert!(maze[(1, 1)].open_walls().contains(Direction::Down));
        assert!(maze[(2, 1)].open_walls().contains(Direction::Up));
        assert_eq!(maze.passages((2, 1)).collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(
            maze.next_event(),
            Some(MazeEvent::OpenedWall {
                from: (1, 1),
                to: (2, 1),
                direction: Direction::Down
            })
        );
    }

    #[test]
    fn test_open_wall_rejects_non_neighbors() {
        let mut maze = Maze::new(3, 3).unwrap();
        assert!(matches!(
            maze.open_wall((1, 1), (1, 2), Direction::Down),
            Err(MazeError::InvalidAdjacency { .. })
        ));
        assert!(maze.open_wall((0, 0), (0, 0), Direction::Up).is_err());
        assert!(maze.open_wall((2, 2), (2, 3), Direction::Right).is_err());
        assert!(maze.open_wall_between((0, 0), (1, 1)).is_err());
        assert!(maze[(1, 1)].open_walls().is_empty());
        assert!(!maze.has_pending_events());
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between((1, 1), (0, 1)), Some(Direction::Up));
        assert_eq!(Direction::between((1, 1), (1, 0)), Some(Direction::Left));
        assert_eq!(Direction::between((1, 1), (2, 2)), None);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.step((0, 4)), None);
    }
}
