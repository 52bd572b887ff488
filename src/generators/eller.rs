use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rand::{Rng, RngCore};

use crate::{
    error::MazeError,
    generators::{Carver, Traversal},
    maze::{Coord, Direction, Maze, PartitionId},
    solution::SolutionMap,
};

/// Disjoint sets of cells known to be connected, keyed by partition id.
///
/// Membership is enumerated on every merge to relink the absorbed cells, so this is a
/// plain id -> members map with no path compression.
#[derive(Default, Debug)]
pub struct Partition {
    members: BTreeMap<PartitionId, BTreeSet<Coord>>,
    next_id: PartitionId,
}

impl Partition {
    /// Puts `cell` in a partition of its own and returns the new id.
    pub fn create(&mut self, maze: &mut Maze, cell: Coord) -> PartitionId {
        let id = self.next_id;
        self.next_id += 1;
        self.members.insert(id, BTreeSet::from([cell]));
        maze.set_partition(cell, id);
        id
    }

    /// Adds `cell` to the existing partition `id`.
    pub fn join(&mut self, maze: &mut Maze, cell: Coord, id: PartitionId) {
        self.members.entry(id).or_default().insert(cell);
        maze.set_partition(cell, id);
    }

    /// Merges the two partitions and returns the id that survives. The newer (larger) id is
    /// absorbed into the older one: its members are relinked and its entry deleted.
    pub fn merge(&mut self, maze: &mut Maze, a: PartitionId, b: PartitionId) -> PartitionId {
        let (survivor, absorbed) = if a <= b { (a, b) } else { (b, a) };
        if survivor == absorbed {
            return survivor;
        }
        let moved = self.members.remove(&absorbed).unwrap_or_default();
        for &cell in &moved {
            maze.set_partition(cell, survivor);
        }
        self.members.entry(survivor).or_default().extend(moved);
        survivor
    }

    pub fn members(&self, id: PartitionId) -> Option<&BTreeSet<Coord>> {
        self.members.get(&id)
    }

    /// Number of partitions still alive.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Assigning partitions and merging left to right along the row.
    Merge,
    /// Carving down into the next row.
    ExtendDown,
    Done,
}

/// Eller's algorithm: builds the maze one row at a time, tracking which cells are already
/// connected with a [`Partition`].
pub struct Eller {
    partition: Partition,
    row: u16,
    col: u16,
    phase: Phase,
    /// Cells of each partition in the current row not yet looked at by `extend_down`.
    remaining: HashMap<PartitionId, usize>,
    /// Partitions that already carved down from the current row.
    extended: HashSet<PartitionId>,
}

impl Eller {
    pub fn new() -> Self {
        Eller {
            partition: Partition::default(),
            row: 0,
            col: 0,
            phase: Phase::Merge,
            remaining: HashMap::new(),
            extended: HashSet::new(),
        }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    fn partition_of(maze: &Maze, cell: Coord) -> Result<PartitionId, MazeError> {
        maze[cell]
            .partition()
            .ok_or(MazeError::Unpartitioned { at: cell })
    }

    fn merge_step(&mut self, maze: &mut Maze, rng: &mut dyn RngCore) -> Result<(), MazeError> {
        let cell = (self.row, self.col);
        let is_last_row = self.row + 1 == maze.rows();
        maze.flash(cell);

        // Cells reached by a downward carve keep the partition they inherited
        if self.row == 0 || !maze[cell].is_visited() {
            self.partition.create(maze, cell);
            maze.visit(cell);
        }

        if self.col > 0 {
            let previous = (self.row, self.col - 1);
            let (a, b) = (
                Self::partition_of(maze, cell)?,
                Self::partition_of(maze, previous)?,
            );
            // Same-partition neighbors are already connected, joining them would close a loop.
            // On the last row every remaining split must be joined.
            if a != b && (is_last_row || rng.random_bool(0.5)) {
                maze.open_wall(cell, previous, Direction::Left)?;
                self.partition.merge(maze, a, b);
            }
        }
        maze.cover(cell);

        self.col += 1;
        if self.col == maze.cols() {
            self.col = 0;
            if is_last_row {
                self.phase = Phase::Done;
            } else {
                self.start_extend_down(maze)?;
            }
        }
        Ok(())
    }

    fn start_extend_down(&mut self, maze: &Maze) -> Result<(), MazeError> {
        self.remaining.clear();
        self.extended.clear();
        for col in 0..maze.cols() {
            let id = Self::partition_of(maze, (self.row, col))?;
            *self.remaining.entry(id).or_insert(0) += 1;
        }
        self.phase = Phase::ExtendDown;
        Ok(())
    }

    fn extend_down_step(&mut self, maze: &mut Maze, rng: &mut dyn RngCore) -> Result<(), MazeError> {
        let cell = (self.row, self.col);
        let id = Self::partition_of(maze, cell)?;
        maze.flash(cell);

        let remaining = self.remaining.entry(id).or_insert(1);
        let is_last_of_partition = *remaining == 1;
        *remaining -= 1;

        let coin = rng.random_bool(0.5);
        if coin || (is_last_of_partition && !self.extended.contains(&id)) {
            let below = (self.row + 1, self.col);
            maze.open_wall(cell, below, Direction::Down)?;
            maze.visit(below);
            self.partition.join(maze, below, id);
            self.extended.insert(id);
        }
        maze.cover(cell);

        self.col += 1;
        if self.col == maze.cols() {
            self.col = 0;
            self.row += 1;
            self.phase = Phase::Merge;
        }
        Ok(())
    }
}

impl Default for Eller {
    fn default() -> Self {
        Self::new()
    }
}

impl Carver for Eller {
    fn advance(
        &mut self,
        maze: &mut Maze,
        walk: &mut Traversal,
        rng: &mut dyn RngCore,
    ) -> Result<bool, MazeError> {
        match self.phase {
            Phase::Done => return Ok(false),
            Phase::Merge => self.merge_step(maze, rng)?,
            Phase::ExtendDown => self.extend_down_step(maze, rng)?,
        }
        walk.current = (self.row, self.col);

        if self.phase == Phase::Done {
            tracing::debug!(
                "[generator] Eller's finished with {} partition(s)",
                self.partition.len()
            );
            // Rows were joined in no particular direction, so the tree is oriented toward
            // the entry only now that it is complete
            walk.solution = SolutionMap::span(maze, maze.entry())?;
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Generator, get_rng, testing};

    fn run_eller(rows: u16, cols: u16, seed: u64) -> (Maze, Eller, Traversal) {
        let mut maze = Maze::new(rows, cols).unwrap();
        let mut walk = Traversal::new(&mut maze);
        let mut eller = Eller::new();
        let mut rng = get_rng(Some(seed));
        while eller.advance(&mut maze, &mut walk, &mut rng).unwrap() {}
        (maze, eller, walk)
    }

    #[test]
    fn test_merge_absorbs_newer_partition() {
        let mut maze = Maze::new(1, 3).unwrap();
        let mut partition = Partition::default();
        let a = partition.create(&mut maze, (0, 0));
        let b = partition.create(&mut maze, (0, 1));
        let c = partition.create(&mut maze, (0, 2));
        assert_eq!(partition.len(), 3);

        assert_eq!(partition.merge(&mut maze, c, b), b);
        assert_eq!(maze[(0, 2)].partition(), Some(b));
        assert!(partition.members(c).is_none());

        assert_eq!(partition.merge(&mut maze, a, b), a);
        assert_eq!(partition.len(), 1);
        assert_eq!(partition.members(a).unwrap().len(), 3);
        assert!(maze.cells().all(|(_, cell)| cell.partition() == Some(a)));
    }

    #[test]
    fn test_single_partition_remains() {
        for seed in 0..20 {
            let (maze, eller, walk) = run_eller(7, 9, seed);
            assert_eq!(eller.partition().len(), 1);
            let ids = maze
                .cells()
                .map(|(_, cell)| cell.partition())
                .collect::<HashSet<_>>();
            assert_eq!(ids.len(), 1);
            testing::assert_perfect(&maze, &walk.solution);
        }
    }

    #[test]
    fn test_partitions_cover_visited_cells() {
        let (maze, eller, _) = run_eller(4, 4, 2);
        let id = maze[(0, 0)].partition().unwrap();
        let members = eller.partition().members(id).unwrap();
        assert_eq!(members.len(), maze.cell_count());
        assert!(maze.cells().all(|(coord, cell)| cell.is_visited() && members.contains(&coord)));
    }

    #[test]
    fn test_unassigned_cell_is_an_error() {
        let mut maze = Maze::new(3, 3).unwrap();
        let mut walk = Traversal::new(&mut maze);
        let mut eller = Eller::new();
        eller.phase = Phase::ExtendDown;
        let result = eller.advance(&mut maze, &mut walk, &mut get_rng(Some(0)));
        assert_eq!(result, Err(MazeError::Unpartitioned { at: (0, 0) }));
        assert_eq!(maze[(1, 0)].partition(), None);
    }

    #[test]
    fn test_coin_is_fair() {
        // Row 0 is never the last row here, so every merge is a coin toss, and every cell
        // that is not the last of its run extends down on a coin toss too
        let (mut merges, mut merge_tosses) = (0, 0);
        let (mut downs, mut down_tosses) = (0, 0);
        for seed in 0..20 {
            let (maze, _) = testing::run(Generator::Ellers, 3, 200, seed);
            for col in 0..199 {
                let walls = maze[(0, col)].open_walls();
                merge_tosses += 1;
                if walls.contains(Direction::Right) {
                    merges += 1;
                    down_tosses += 1;
                    if walls.contains(Direction::Down) {
                        downs += 1;
                    }
                }
            }
        }
        let merge_ratio = merges as f64 / merge_tosses as f64;
        let down_ratio = downs as f64 / down_tosses as f64;
        assert!((merge_ratio - 0.5).abs() < 0.05, "merge ratio {}", merge_ratio);
        assert!((down_ratio - 0.5).abs() < 0.05, "down ratio {}", down_ratio);
    }

    #[test]
    fn test_single_row_forced_merges() {
        let (maze, solution) = testing::run(Generator::Ellers, 1, 6, 13);
        testing::assert_perfect(&maze, &solution);
        assert!((1..6).all(|c| solution.parent((0, c)) == Some((0, c - 1))));
    }
}
