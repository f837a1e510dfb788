//! Cell kinds and the fixed-size grid they live in

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// What occupies a station cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Uncarved rock / vacuum
    #[default]
    Empty,
    Wall,
    /// Room interior
    Floor,
    /// Corridor floor
    Corridor,
    Door,
    Dock,
    Bridge,
    Engine,
    Storage,
}

impl Cell {
    /// Cells the walker and NPCs may stand on
    pub fn is_walkable(self) -> bool {
        match self {
            Cell::Floor
            | Cell::Corridor
            | Cell::Door
            | Cell::Dock
            | Cell::Bridge
            | Cell::Engine
            | Cell::Storage => true,
            Cell::Empty | Cell::Wall => false,
        }
    }

    /// Room interior, including the marked special cells
    pub fn is_room(self) -> bool {
        match self {
            Cell::Floor | Cell::Dock | Cell::Bridge | Cell::Engine | Cell::Storage => true,
            Cell::Empty | Cell::Wall | Cell::Corridor | Cell::Door => false,
        }
    }

    pub fn is_special(self) -> bool {
        matches!(self, Cell::Bridge | Cell::Engine | Cell::Storage)
    }

    /// Cells NPCs may be placed on
    pub fn is_npc_ground(self) -> bool {
        matches!(self, Cell::Floor | Cell::Door)
    }

    /// One-character glyph for debug dumps
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Floor => '.',
            Cell::Corridor => ',',
            Cell::Door => '+',
            Cell::Dock => 'D',
            Cell::Bridge => 'B',
            Cell::Engine => 'E',
            Cell::Storage => 'S',
        }
    }
}

/// Orthogonal neighbour offsets in repair priority order: east, west, south, north
pub const NEIGHBORS: [IVec2; 4] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
];

/// Row-major grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    fn index(&self, p: IVec2) -> Option<usize> {
        self.in_bounds(p)
            .then(|| p.y as usize * self.width + p.x as usize)
    }

    /// Cell at `p`, or None outside the grid
    pub fn get(&self, p: IVec2) -> Option<T> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Write a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, p: IVec2, value: T) {
        if let Some(i) = self.index(p) {
            self.cells[i] = value;
        }
    }

    /// All coordinates, row by row
    pub fn coords(&self) -> impl Iterator<Item = IVec2> + use<T> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| IVec2::new(x, y)))
    }

    /// In-bounds orthogonal neighbours in priority order
    pub fn neighbors(&self, p: IVec2) -> impl Iterator<Item = (IVec2, T)> + '_ {
        NEIGHBORS
            .iter()
            .filter_map(move |d| self.get(p + *d).map(|c| (p + *d, c)))
    }

    pub fn count(&self, mut pred: impl FnMut(T) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(**c)).count()
    }
}

impl Grid<Cell> {
    /// Debug dump, one line per row
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.cells[y * self.width + x].glyph());
            }
            out.push('\n');
        }
        out
    }
}
