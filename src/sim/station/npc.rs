//! Station crew: placement and wandering

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid, NEIGHBORS};

/// Attempts per role NPC near a special room
pub const ROLE_ATTEMPTS: u32 = 20;
/// Attempt budget shared by all generic crew
pub const CREW_ATTEMPTS: u32 = 50;
/// How far from a special room's centre its crew may stand
pub const ROLE_RADIUS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcKind {
    Captain,
    Engineer,
    Quartermaster,
    Crew,
}

impl NpcKind {
    /// Who staffs a given special room
    pub fn for_room(cell: Cell) -> Option<Self> {
        match cell {
            Cell::Bridge => Some(NpcKind::Captain),
            Cell::Engine => Some(NpcKind::Engineer),
            Cell::Storage => Some(NpcKind::Quartermaster),
            _ => None,
        }
    }

    pub fn dialog(self) -> &'static [&'static str] {
        match self {
            NpcKind::Captain => &[
                "Welcome aboard, pilot.",
                "The belt's been restless. Watch your warp reserves.",
                "Dock whenever you need a breather.",
            ],
            NpcKind::Engineer => &[
                "Magwave coils are tuned to pull dust, not debris.",
                "Don't redline the warp drive. It cuts out when it runs dry.",
            ],
            NpcKind::Quartermaster => &[
                "Stores are thin this cycle.",
                "Bring me dust and I'll see what I can do.",
            ],
            NpcKind::Crew => &[
                "Long shift.",
                "Heard there's another station further out.",
                "Mind the airlock.",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub pos: IVec2,
    pub kind: NpcKind,
    pub lines: Vec<String>,
    pub line: usize,
    /// Ticks until the next wander step
    pub move_cooldown: u32,
    /// Dialog box open; talking NPCs stand still
    pub talking: bool,
}

impl Npc {
    pub fn new(pos: IVec2, kind: NpcKind, move_cooldown: u32) -> Self {
        Self {
            pos,
            kind,
            lines: kind.dialog().iter().map(|s| s.to_string()).collect(),
            line: 0,
            move_cooldown,
            talking: false,
        }
    }

    /// Line currently shown (if talking)
    pub fn current_line(&self) -> Option<&str> {
        if self.talking {
            self.lines.get(self.line).map(String::as_str)
        } else {
            None
        }
    }

    /// Open the dialog, advance to the next line, or close after the last one
    pub fn interact(&mut self) {
        if !self.talking {
            self.talking = true;
            self.line = 0;
        } else if self.line + 1 < self.lines.len() {
            self.line += 1;
        } else {
            self.talking = false;
        }
    }
}

fn wander_cooldown(rng: &mut Pcg32) -> u32 {
    rng.random_range(30..=90)
}

fn is_free_ground(grid: &Grid<Cell>, npcs: &[Npc], p: IVec2) -> bool {
    grid.get(p).is_some_and(Cell::is_npc_ground) && !npcs.iter().any(|n| n.pos == p)
}

/// Populate a layout. Special rooms get 1-2 role NPCs each; 3-7 generic crew
/// are scattered anywhere. Placements that run out of attempts are skipped.
pub fn place_npcs(grid: &Grid<Cell>, specials: &[(Cell, IVec2)], rng: &mut Pcg32) -> Vec<Npc> {
    let mut npcs = Vec::new();

    for &(cell, center) in specials {
        let Some(kind) = NpcKind::for_room(cell) else {
            continue;
        };
        let count = rng.random_range(1..=2);
        for _ in 0..count {
            let placed = (0..ROLE_ATTEMPTS).find_map(|_| {
                let offset = IVec2::new(
                    rng.random_range(-ROLE_RADIUS..=ROLE_RADIUS),
                    rng.random_range(-ROLE_RADIUS..=ROLE_RADIUS),
                );
                let p = center + offset;
                is_free_ground(grid, &npcs, p).then_some(p)
            });
            match placed {
                Some(p) => {
                    let cooldown = wander_cooldown(rng);
                    npcs.push(Npc::new(p, kind, cooldown));
                }
                None => log::debug!("no room for {:?} near {}", kind, center),
            }
        }
    }

    let wanted = rng.random_range(3..=7);
    let mut placed = 0;
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    for _ in 0..CREW_ATTEMPTS {
        if placed == wanted || w == 0 || h == 0 {
            break;
        }
        let p = IVec2::new(rng.random_range(0..w), rng.random_range(0..h));
        if is_free_ground(grid, &npcs, p) {
            let cooldown = wander_cooldown(rng);
            npcs.push(Npc::new(p, NpcKind::Crew, cooldown));
            placed += 1;
        }
    }
    if placed < wanted {
        log::debug!("placed {}/{} crew", placed, wanted);
    }

    npcs
}

/// One tick of wandering for every NPC.
///
/// An NPC whose cooldown has run out tries one random orthogonal step onto
/// floor or door that nobody (including the walker) occupies.
pub fn wander(grid: &Grid<Cell>, npcs: &mut [Npc], walker: IVec2, rng: &mut Pcg32) {
    for i in 0..npcs.len() {
        if npcs[i].talking {
            continue;
        }
        if npcs[i].move_cooldown > 0 {
            npcs[i].move_cooldown -= 1;
            continue;
        }

        let target = npcs[i].pos + NEIGHBORS[rng.random_range(0..NEIGHBORS.len())];
        if target != walker && is_free_ground(grid, npcs, target) {
            npcs[i].pos = target;
        }
        npcs[i].move_cooldown = wander_cooldown(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn open_grid(w: usize, h: usize) -> Grid<Cell> {
        let mut grid = Grid::new(w, h, Cell::Wall);
        for y in 1..h as i32 - 1 {
            for x in 1..w as i32 - 1 {
                grid.set(IVec2::new(x, y), Cell::Floor);
            }
        }
        grid
    }

    #[test]
    fn test_role_npcs_near_room() {
        let grid = open_grid(20, 20);
        let mut rng = Pcg32::seed_from_u64(5);
        let specials = [(Cell::Bridge, IVec2::new(5, 5))];
        let npcs = place_npcs(&grid, &specials, &mut rng);

        let captains: Vec<_> = npcs.iter().filter(|n| n.kind == NpcKind::Captain).collect();
        assert!(!captains.is_empty() && captains.len() <= 2);
        for c in captains {
            let d = (c.pos - IVec2::new(5, 5)).abs();
            assert!(d.x <= ROLE_RADIUS && d.y <= ROLE_RADIUS);
        }
        let crew = npcs.iter().filter(|n| n.kind == NpcKind::Crew).count();
        assert!((3..=7).contains(&crew));
    }

    #[test]
    fn test_no_two_npcs_share_a_cell() {
        let grid = open_grid(6, 6);
        let mut rng = Pcg32::seed_from_u64(9);
        let npcs = place_npcs(&grid, &[(Cell::Engine, IVec2::new(2, 2))], &mut rng);
        for (i, a) in npcs.iter().enumerate() {
            assert!(grid.get(a.pos).is_some_and(Cell::is_npc_ground));
            for b in &npcs[i + 1..] {
                assert_ne!(a.pos, b.pos);
            }
        }
    }

    #[test]
    fn test_placement_failure_is_omission() {
        // Nothing to stand on
        let grid = Grid::new(8, 8, Cell::Wall);
        let mut rng = Pcg32::seed_from_u64(1);
        let npcs = place_npcs(&grid, &[(Cell::Storage, IVec2::new(4, 4))], &mut rng);
        assert!(npcs.is_empty());
    }

    #[test]
    fn test_wander_stays_on_ground() {
        let grid = open_grid(10, 10);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut npcs = vec![Npc::new(IVec2::new(1, 1), NpcKind::Crew, 0)];
        let walker = IVec2::new(8, 8);
        for _ in 0..500 {
            wander(&grid, &mut npcs, walker, &mut rng);
            assert!(grid.get(npcs[0].pos).is_some_and(Cell::is_npc_ground));
            assert_ne!(npcs[0].pos, walker);
        }
    }

    #[test]
    fn test_talking_npc_stays_put() {
        let grid = open_grid(10, 10);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut npcs = vec![Npc::new(IVec2::new(4, 4), NpcKind::Crew, 0)];
        npcs[0].interact();
        for _ in 0..200 {
            wander(&grid, &mut npcs, IVec2::ZERO, &mut rng);
        }
        assert_eq!(npcs[0].pos, IVec2::new(4, 4));
        assert_eq!(npcs[0].current_line(), Some("Long shift."));
    }

    #[test]
    fn test_dialog_cycles_then_closes() {
        let mut npc = Npc::new(IVec2::ZERO, NpcKind::Quartermaster, 0);
        npc.interact();
        npc.interact();
        assert_eq!(npc.line, 1);
        npc.interact();
        assert!(!npc.talking);
    }
}
