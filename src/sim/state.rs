//! Game state and core simulation types
//!
//! `Game` is the composition root: every subsystem receives it (or the part
//! of it it owns) by reference from the tick function.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::pool::PooledList;
use super::progression::{EnergyMeter, Progression};
use super::station::{RoomCarver, RoomDigger, StationLayout};
use crate::audio::CueQueue;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    #[default]
    StartScreen,
    /// Flying in space
    Playing,
    /// Logic frozen; rendering continues
    Paused,
    /// Walking around a station interior
    Docked,
    /// Hero destroyed
    GameOver,
}

/// Per-run data owned by the state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Logic ticks executed this run
    pub time_ticks: u64,
    pub progress: Progression,
    pub magwave: EnergyMeter,
    pub warp: EnergyMeter,
    pub hero_dead: bool,
    /// A Revive power-up is banked; the next death is absorbed
    pub undead: bool,
    /// Number of stations visited
    pub docks: u32,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::StartScreen,
            time_ticks: 0,
            progress: Progression::default(),
            magwave: EnergyMeter::new(
                tuning.magwave_max,
                tuning.magwave_recharge_per_sec,
                tuning.magwave_drain_per_sec,
            ),
            warp: EnergyMeter::new(
                tuning.warp_max,
                tuning.warp_recharge_per_sec,
                tuning.warp_drain_per_sec,
            ),
            hero_dead: false,
            undead: false,
            docks: 0,
        }
    }
}

/// Position, previous position (for render interpolation), velocity and size.
/// `pos` is the centre.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Position blended between the last two ticks
    pub fn interpolated(&self, alpha: f32) -> Vec2 {
        crate::lerp_vec(self.prev_pos, self.pos, alpha)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Hero,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub owner: Owner,
    pub age: u32,
    pub lifetime: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DustMote {
    pub body: Body,
    pub age: u32,
    pub lifetime: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Refill magwave
    #[default]
    Energy,
    /// Refill warp
    Warp,
    /// Flat score bonus
    Score,
    /// Absorb the next death
    Revive,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Energy,
        PowerUpKind::Warp,
        PowerUpKind::Score,
        PowerUpKind::Revive,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
    pub age: u32,
    pub lifetime: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub age: u32,
    pub lifetime: u32,
    /// Palette index for the renderer
    pub tint: u8,
}

impl Particle {
    /// Remaining life in 0..=1
    pub fn life(&self) -> f32 {
        if self.lifetime == 0 {
            0.0
        } else {
            1.0 - self.age as f32 / self.lifetime as f32
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Nose toward the top of the screen (hero)
    #[default]
    Up,
    /// Nose toward the bottom (enemies)
    Down,
}

/// Triangular ship. The tip is stored; the base corners are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub tip: Vec2,
    pub prev_tip: Vec2,
    pub facing: Facing,
    pub width: f32,
    pub height: f32,
}

impl Ship {
    pub fn new(tip: Vec2, facing: Facing) -> Self {
        Self {
            tip,
            prev_tip: tip,
            facing,
            width: SHIP_WIDTH,
            height: SHIP_HEIGHT,
        }
    }

    fn base_y(&self, tip: Vec2) -> f32 {
        match self.facing {
            Facing::Up => tip.y + self.height,
            Facing::Down => tip.y - self.height,
        }
    }

    pub fn left(&self) -> Vec2 {
        Vec2::new(self.tip.x - self.width / 2.0, self.base_y(self.tip))
    }

    pub fn right(&self) -> Vec2 {
        Vec2::new(self.tip.x + self.width / 2.0, self.base_y(self.tip))
    }

    /// Tip, left, right at a blended position
    pub fn points_interpolated(&self, alpha: f32) -> [Vec2; 3] {
        let tip = crate::lerp_vec(self.prev_tip, self.tip, alpha);
        let base_y = self.base_y(tip);
        [
            tip,
            Vec2::new(tip.x - self.width / 2.0, base_y),
            Vec2::new(tip.x + self.width / 2.0, base_y),
        ]
    }

    /// Bounding box of the triangle hitbox
    pub fn bounds(&self) -> Rect {
        Rect::bounding(&[self.tip, self.left(), self.right()])
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Muzzle position for projectiles
    pub fn nose(&self) -> Vec2 {
        self.tip
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.tip += delta;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPattern {
    /// Straight down
    Straight,
    /// Sways around its spawn column
    Sine,
    /// Bounces between the canvas edges
    Zigzag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub ship: Ship,
    pub vel: Vec2,
    pub pattern: EnemyPattern,
    /// Column the Sine pattern sways around
    pub origin_x: f32,
    pub age: u32,
    /// Ticks until it may fire again
    pub shoot_cooldown: u32,
}

/// Background star; `speed` doubles as its parallax layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub speed: f32,
    pub size: f32,
}

/// A dockable station drifting through space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceStation {
    pub id: u32,
    pub body: Body,
    /// Already boarded this pass; can't be docked again
    pub visited: bool,
}

/// Everything in the space scene
#[derive(Debug, Clone)]
pub struct World {
    pub bounds: Rect,
    pub hero: Ship,
    pub enemies: Vec<Enemy>,
    pub stars: Vec<Star>,
    pub motes: PooledList<DustMote>,
    pub projectiles: PooledList<Projectile>,
    pub pickups: PooledList<PowerUp>,
    pub particles: PooledList<Particle>,
    pub stations: Vec<SpaceStation>,
    pub fire_cooldown: u32,
    pub enemy_timer: u32,
    pub mote_timer: u32,
    pub station_timer: u32,
    next_station_id: u32,
}

impl World {
    pub fn new(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let bounds = Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);
        let hero = Ship::new(
            Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT - SHIP_HEIGHT - 40.0),
            Facing::Up,
        );
        let stars = (0..tuning.star_count)
            .map(|i| {
                let pos = Vec2::new(
                    rng.random_range(0.0..CANVAS_WIDTH),
                    rng.random_range(0.0..CANVAS_HEIGHT),
                );
                let layer = (i % 3) as f32;
                Star {
                    pos,
                    prev_pos: pos,
                    speed: 0.5 + layer * 0.75,
                    size: 1.0 + layer * 0.5,
                }
            })
            .collect();

        Self {
            bounds,
            hero,
            enemies: Vec::new(),
            stars,
            motes: PooledList::new(tuning.pools.motes),
            projectiles: PooledList::new(tuning.pools.projectiles),
            pickups: PooledList::new(tuning.pools.pickups),
            particles: PooledList::new(tuning.pools.particles),
            stations: Vec::new(),
            fire_cooldown: 0,
            enemy_timer: tuning.enemy_spawn_interval_ticks,
            mote_timer: 0,
            // First station shows up sooner than the rest
            station_timer: tuning.station_spawn_interval_ticks / 3,
            next_station_id: 1,
        }
    }

    pub fn next_station_id(&mut self) -> u32 {
        let id = self.next_station_id;
        self.next_station_id += 1;
        id
    }

    /// Release every transient pooled entity
    pub fn clear_transients(&mut self) {
        self.projectiles.clear();
        self.particles.clear();
        self.pickups.clear();
    }
}

/// The player on foot inside a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walker {
    pub pos: IVec2,
    pub prev_pos: IVec2,
    pub move_cooldown: u32,
    /// Has stepped off the dock since boarding
    pub left_dock: bool,
}

impl Walker {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            move_cooldown: 0,
            left_dock: false,
        }
    }
}

/// A station being visited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interior {
    pub station_id: u32,
    pub layout: StationLayout,
    pub walker: Walker,
}

/// Complete game: configuration, session and both scenes
pub struct Game {
    pub seed: u64,
    pub tuning: Tuning,
    pub settings: Settings,
    pub session: Session,
    pub world: World,
    pub interior: Option<Interior>,
    pub cues: CueQueue,
    pub rng: Pcg32,
    pub carver: Box<dyn RoomCarver>,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        Self::with_carver(seed, tuning, settings, Box::new(RoomDigger::default()))
    }

    /// Use a custom room carver for station interiors
    pub fn with_carver(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        carver: Box<dyn RoomCarver>,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::new(&tuning, &mut rng);
        Self {
            seed,
            session: Session::new(&tuning),
            world,
            interior: None,
            cues: CueQueue::default(),
            rng,
            carver,
            tuning,
            settings,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// Hand queued cues to the host's sink at the configured volume
    pub fn drain_cues(&mut self, sink: &mut dyn crate::audio::AudioSink) {
        let volume = self.settings.effective_volume();
        self.cues.drain_into(sink, volume);
    }

    /// Fresh run: new session and world, reseeded RNG. Phase is untouched.
    pub fn reset_run(&mut self) {
        let phase = self.session.phase;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.session = Session::new(&self.tuning);
        self.session.phase = phase;
        self.world = World::new(&self.tuning, &mut self.rng);
        self.interior = None;
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("seed", &self.seed)
            .field("session", &self.session)
            .field("docked", &self.interior.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_triangle_up() {
        let ship = Ship::new(Vec2::new(100.0, 100.0), Facing::Up);
        assert_eq!(ship.left(), Vec2::new(100.0 - SHIP_WIDTH / 2.0, 100.0 + SHIP_HEIGHT));
        assert_eq!(ship.right(), Vec2::new(100.0 + SHIP_WIDTH / 2.0, 100.0 + SHIP_HEIGHT));
        let b = ship.bounds();
        assert_eq!(b.y, 100.0);
        assert_eq!(b.h, SHIP_HEIGHT);
        assert_eq!(b.w, SHIP_WIDTH);
    }

    #[test]
    fn test_ship_triangle_down() {
        let ship = Ship::new(Vec2::new(50.0, 80.0), Facing::Down);
        assert_eq!(ship.left().y, 80.0 - SHIP_HEIGHT);
        assert_eq!(ship.bounds().y, 80.0 - SHIP_HEIGHT);
    }

    #[test]
    fn test_reset_run_keeps_phase_and_reseeds() {
        let mut game = Game::new(42, Tuning::default(), Settings::default());
        let stars_before: Vec<Vec2> = game.world.stars.iter().map(|s| s.pos).collect();
        game.session.phase = GamePhase::Playing;
        game.session.progress.add_score(500);
        game.reset_run();

        assert_eq!(game.session.phase, GamePhase::Playing);
        assert_eq!(game.session.progress.score, 0);
        let stars_after: Vec<Vec2> = game.world.stars.iter().map(|s| s.pos).collect();
        assert_eq!(stars_before, stars_after);
    }

    #[test]
    fn test_particle_life() {
        let p = Particle {
            age: 5,
            lifetime: 20,
            ..Default::default()
        };
        assert!((p.life() - 0.75).abs() < 1e-6);
    }
}
