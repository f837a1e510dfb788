//! Station Drift - A fixed-timestep space arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, state machine, pools, stations)
//! - `renderer`: Drawing-surface abstraction and frame composition
//! - `runner`: Host frame driver (scheduler + input + audio + render)
//! - `platform`: Input abstraction (boolean control queries)
//! - `audio`: Named sound cues emitted by the simulation
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use runner::Runner;
pub use settings::{ControlMode, QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Velocity constants are authored against this tick rate
    pub const BASELINE_FPS: f32 = 60.0;
    /// Largest real-time delta fed to the accumulator in one frame (seconds)
    pub const MAX_FRAME_DELTA: f64 = 0.25;

    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 640.0;
    /// Entities further than this outside the canvas are released
    pub const BOUNDS_MARGIN: f32 = 48.0;

    /// Hero ship defaults
    pub const SHIP_WIDTH: f32 = 24.0;
    pub const SHIP_HEIGHT: f32 = 28.0;
    pub const HERO_SPEED: f32 = 4.0;

    /// Warp boosts all motion by this factor while active
    pub const WARP_MULTIPLIER: f32 = 8.0;

    /// Station interior grid
    pub const STATION_WIDTH: usize = 40;
    pub const STATION_HEIGHT: usize = 30;
    pub const STATION_SIZE: f32 = 64.0;
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Convert an angle (radians, 0 = up the screen) into a unit direction
#[inline]
pub fn heading_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}
