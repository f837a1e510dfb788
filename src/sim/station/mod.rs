//! Procedural station interiors
//!
//! `generate_layout` wraps a possibly-degenerate `RoomCarver` with bounded
//! retries, door detection, a local dock repair and finally an open-room
//! fallback, so the dock cell is always reachable. Generation runs to
//! completion inside the call that triggers docking.

pub mod carve;
pub mod grid;
pub mod npc;

pub use carve::{Carving, RoomCarver, RoomDigger, RoomRect};
pub use grid::{Cell, Grid};
pub use npc::{Npc, NpcKind};

use glam::IVec2;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Carvings with fewer rooms than this are rejected
pub const MIN_ROOMS: usize = 4;

/// A generated station interior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLayout {
    pub grid: Grid<Cell>,
    pub dock: IVec2,
    pub rooms: Vec<RoomRect>,
    /// Special room markers (Bridge/Engine/Storage) and where they sit
    pub specials: Vec<(Cell, IVec2)>,
    pub npcs: Vec<Npc>,
    /// Carving attempts consumed (0 when the fallback was used)
    pub attempt: u32,
    pub fallback: bool,
}

impl StationLayout {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn cell(&self, p: IVec2) -> Option<Cell> {
        self.grid.get(p)
    }

    pub fn npc_at(&self, p: IVec2) -> Option<usize> {
        self.npcs.iter().position(|n| n.pos == p)
    }

    pub fn is_npc_at(&self, p: IVec2) -> bool {
        self.npc_at(p).is_some()
    }

    /// Whether the walker may step onto `p`
    pub fn is_passable(&self, p: IVec2) -> bool {
        self.cell(p).is_some_and(Cell::is_walkable) && !self.is_npc_at(p)
    }

    pub fn dock_is_accessible(&self) -> bool {
        dock_accessible(&self.grid, self.dock)
    }

    /// Every walkable cell reachable from the dock
    pub fn is_fully_connected(&self) -> bool {
        let reached = flood_walkable(&self.grid, self.dock);
        reached == self.grid.count(Cell::is_walkable)
    }
}

/// Dock has at least one walkable orthogonal neighbour
pub fn dock_accessible(grid: &Grid<Cell>, dock: IVec2) -> bool {
    grid.neighbors(dock).any(|(_, c)| c.is_walkable())
}

/// Number of walkable cells reachable from `start`
fn flood_walkable(grid: &Grid<Cell>, start: IVec2) -> usize {
    let mut seen = Grid::new(grid.width(), grid.height(), false);
    if !grid.get(start).is_some_and(Cell::is_walkable) {
        return 0;
    }
    let mut stack = vec![start];
    seen.set(start, true);
    let mut count = 0;
    while let Some(p) = stack.pop() {
        count += 1;
        for (n, cell) in grid.neighbors(p) {
            if cell.is_walkable() && seen.get(n) == Some(false) {
                seen.set(n, true);
                stack.push(n);
            }
        }
    }
    count
}

/// Wall cells that sit between room interior and a corridor become doors
pub fn mark_doors(grid: &mut Grid<Cell>) -> usize {
    let doors: Vec<IVec2> = grid
        .coords()
        .filter(|p| grid.get(*p) == Some(Cell::Wall))
        .filter(|p| {
            let mut room = false;
            let mut corridor = false;
            for (_, c) in grid.neighbors(*p) {
                room |= c.is_room();
                corridor |= c == Cell::Corridor;
            }
            room && corridor
        })
        .collect();
    for p in &doors {
        grid.set(*p, Cell::Door);
    }
    doors.len()
}

/// Open a path next to the dock: first wall neighbour becomes a door, else the
/// first empty neighbour becomes floor. Order: east, west, south, north.
pub fn repair_dock(grid: &mut Grid<Cell>, dock: IVec2) -> bool {
    let neighbors: Vec<(IVec2, Cell)> = grid.neighbors(dock).collect();
    if let Some((p, _)) = neighbors.iter().find(|(_, c)| *c == Cell::Wall) {
        grid.set(*p, Cell::Door);
        return true;
    }
    if let Some((p, _)) = neighbors.iter().find(|(_, c)| *c == Cell::Empty) {
        grid.set(*p, Cell::Floor);
        return true;
    }
    false
}

/// Single open room with the dock at the exact grid centre. Always valid.
pub fn fallback_layout(width: usize, height: usize, rng: &mut Pcg32) -> StationLayout {
    let (width, height) = (width.max(3), height.max(3));
    let mut grid = Grid::new(width, height, Cell::Wall);
    let room = RoomRect::new(1, 1, width as i32 - 2, height as i32 - 2);
    for y in room.y..room.y + room.h {
        for x in room.x..room.x + room.w {
            grid.set(IVec2::new(x, y), Cell::Floor);
        }
    }
    let dock = IVec2::new(width as i32 / 2, height as i32 / 2);
    grid.set(dock, Cell::Dock);

    let npcs = npc::place_npcs(&grid, &[], rng);
    StationLayout {
        grid,
        dock,
        rooms: vec![room],
        specials: Vec::new(),
        npcs,
        attempt: 0,
        fallback: true,
    }
}

/// Turn one carving into a layout, or None if it can't be made valid
fn build_from_carving(carving: Carving, rng: &mut Pcg32) -> Option<StationLayout> {
    let Carving { mut grid, rooms } = carving;
    if rooms.len() < MIN_ROOMS {
        log::debug!("carving rejected: {} rooms", rooms.len());
        return None;
    }

    // Dock goes in the southern-most room (first wins on ties)
    let mut dock_index = 0;
    for (i, room) in rooms.iter().enumerate() {
        if room.center().y > rooms[dock_index].center().y {
            dock_index = i;
        }
    }
    let dock = rooms[dock_index].center();
    grid.set(dock, Cell::Dock);

    // Overlapping rooms can share a centre; each centre holds one marker
    let mut others: Vec<RoomRect> = Vec::new();
    for (i, room) in rooms.iter().enumerate() {
        let center = room.center();
        if i != dock_index && center != dock && others.iter().all(|o| o.center() != center) {
            others.push(*room);
        }
    }
    others.shuffle(rng);

    let mut specials = Vec::new();
    if others.len() >= 3 {
        for (cell, room) in [Cell::Bridge, Cell::Engine, Cell::Storage]
            .into_iter()
            .zip(&others)
        {
            grid.set(room.center(), cell);
            specials.push((cell, room.center()));
        }
    }

    mark_doors(&mut grid);

    if !dock_accessible(&grid, dock) {
        log::debug!("dock at {} sealed, repairing", dock);
        repair_dock(&mut grid, dock);
        if !dock_accessible(&grid, dock) {
            return None;
        }
    }

    let npcs = npc::place_npcs(&grid, &specials, rng);
    Some(StationLayout {
        grid,
        dock,
        rooms,
        specials,
        npcs,
        attempt: 0,
        fallback: false,
    })
}

/// Generate a station interior with a guaranteed-accessible dock
pub fn generate_layout(carver: &dyn RoomCarver, tuning: &Tuning, rng: &mut Pcg32) -> StationLayout {
    let (w, h) = (tuning.station_width, tuning.station_height);
    for attempt in 1..=tuning.carve_attempts {
        let carving = carver.carve(w, h, &tuning.carve, rng);
        if let Some(mut layout) = build_from_carving(carving, rng) {
            layout.attempt = attempt;
            log::info!(
                "Station generated: {} rooms, {} npcs (attempt {})",
                layout.rooms.len(),
                layout.npcs.len(),
                attempt
            );
            if !layout.is_fully_connected() {
                log::debug!("station has rooms unreachable from the dock");
            }
            return layout;
        }
    }

    log::warn!(
        "Station generation failed {} times, using open-room fallback",
        tuning.carve_attempts
    );
    fallback_layout(w, h, rng)
}
