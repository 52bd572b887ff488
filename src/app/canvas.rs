use std::fmt;

use crossterm::style::{Color, Stylize};

use crate::{
    error::MazeError,
    maze::{Coord, MazeEvent},
    solution::{PathStep, Rgb},
};

/// What one terminal tile shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    /// A cell that has not joined the maze yet.
    Unvisited,
    /// A visited cell or an opened wall.
    Open,
    /// A cell the generator is looking at.
    Flash,
    /// Part of the solution route.
    Path(Rgb),
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Wall => "  ".on(Color::DarkGrey),
            Tile::Unvisited => "  ".on(Color::Black),
            Tile::Open => "  ".on(Color::Rgb {
                r: 64,
                g: 130,
                b: 255,
            }),
            Tile::Flash => "  ".on(Color::Rgb {
                r: 255,
                g: 30,
                b: 30,
            }),
            Tile::Path(rgb) => "  ".on(Color::Rgb {
                r: rgb.r,
                g: rgb.g,
                b: rgb.b,
            }),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Tile picture of a maze: `2n + 1` tiles per dimension, cells on odd positions and the
/// walls between them on even ones.
pub struct Canvas {
    tiles: Box<[Tile]>,
    visited: Box<[bool]>,
    width: u16,
    height: u16,
    cols: u16,
}

impl Canvas {
    /// Largest number of cells per side that can be drawn.
    pub const MAX_DIMENSION: u16 = u8::MAX as u16;

    pub fn new(rows: u16, cols: u16) -> Result<Self, MazeError> {
        if rows > Canvas::MAX_DIMENSION || cols > Canvas::MAX_DIMENSION {
            return Err(MazeError::TooLargeToDraw {
                rows,
                cols,
                max: Canvas::MAX_DIMENSION,
            });
        }
        // n cells in each dimension -> n + 1 walls -> 2n + 1 total
        let width = cols * 2 + 1;
        let height = rows * 2 + 1;
        let mut canvas = Canvas {
            tiles: vec![Tile::Wall; width as usize * height as usize].into_boxed_slice(),
            visited: vec![false; rows as usize * cols as usize].into_boxed_slice(),
            width,
            height,
            cols,
        };
        (0..rows).for_each(|row| {
            (0..cols).for_each(|col| {
                let at = Canvas::cell_position((row, col));
                canvas.set(at, Tile::Unvisited);
            })
        });
        Ok(canvas)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Tile position `(x, y)` of a cell.
    fn cell_position(coord: Coord) -> (u16, u16) {
        (coord.1 * 2 + 1, coord.0 * 2 + 1)
    }

    /// Tile position of the wall between two adjacent cells.
    fn wall_position(a: Coord, b: Coord) -> (u16, u16) {
        (a.1 + b.1 + 1, a.0 + b.0 + 1)
    }

    pub fn get(&self, at: (u16, u16)) -> Tile {
        self.tiles[at.1 as usize * self.width as usize + at.0 as usize]
    }

    fn set(&mut self, at: (u16, u16), tile: Tile) {
        self.tiles[at.1 as usize * self.width as usize + at.0 as usize] = tile;
    }

    fn is_visited(&self, coord: Coord) -> bool {
        self.visited[coord.0 as usize * self.cols as usize + coord.1 as usize]
    }

    fn resting_tile(&self, coord: Coord) -> Tile {
        if self.is_visited(coord) {
            Tile::Open
        } else {
            Tile::Unvisited
        }
    }

    /// Applies an engine event and returns the tile positions that changed.
    pub fn apply(&mut self, event: &MazeEvent) -> Vec<(u16, u16)> {
        match *event {
            MazeEvent::VisitedCell(coord) => {
                self.visited[coord.0 as usize * self.cols as usize + coord.1 as usize] = true;
                let at = Canvas::cell_position(coord);
                self.set(at, Tile::Open);
                vec![at]
            }
            MazeEvent::OpenedWall { from, to, .. } => {
                let at = Canvas::wall_position(from, to);
                self.set(at, Tile::Open);
                vec![at]
            }
            MazeEvent::Flashed(coord) => {
                let at = Canvas::cell_position(coord);
                self.set(at, Tile::Flash);
                vec![at]
            }
            MazeEvent::Covered(coord) => {
                let at = Canvas::cell_position(coord);
                self.set(at, self.resting_tile(coord));
                vec![at]
            }
        }
    }

    /// Paints one step of the solution route: the cell and the wall gap it leaves through.
    pub fn apply_path_step(&mut self, step: &PathStep) -> Vec<(u16, u16)> {
        let tile = Tile::Path(step.color);
        let mut changed = vec![Canvas::cell_position(step.cell)];
        if let Some(next) = step.direction.step(step.cell) {
            changed.push(Canvas::wall_position(step.cell, next));
            changed.push(Canvas::cell_position(next));
        }
        changed.iter().for_each(|&at| self.set(at, tile));
        changed
    }

    /// Rows of rendered tiles, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|tile| tile.to_string()).collect())
    }
}
