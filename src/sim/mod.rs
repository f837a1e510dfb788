//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (live order for pooled entities)
//! - No rendering or platform dependencies

pub mod collision;
pub mod docking;
pub mod movement;
pub mod pool;
pub mod progression;
pub mod scheduler;
pub mod state;
pub mod station;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use pool::{EntityPool, PoolHandle, PoolStats, PooledList};
pub use progression::{EnergyMeter, Progression, xp_threshold};
pub use scheduler::{FixedStepScheduler, FrameStats};
pub use state::{
    Body, DustMote, Enemy, EnemyPattern, Facing, Game, GamePhase, Interior, Owner, Particle,
    PowerUp, PowerUpKind, Projectile, Session, Ship, SpaceStation, Star, Walker, World,
};
pub use station::{Cell, Grid, RoomCarver, RoomDigger, StationLayout, generate_layout};
pub use tick::{TickInput, apply_power_up, tick, transition};
