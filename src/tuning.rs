//! Data-driven game balance
//!
//! Every number a designer may want to tweak without touching logic.
//! Loaded from JSON; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Parameters handed to the room-carving primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveParams {
    /// Inclusive room width range (cells)
    pub room_width: (usize, usize),
    /// Inclusive room height range (cells)
    pub room_height: (usize, usize),
    /// Inclusive corridor length range (cells)
    pub corridor_length: (usize, usize),
    /// Stop carving once this share of the grid is floor (0-100)
    pub fill_percentage: u32,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            room_width: (4, 8),
            room_height: (3, 6),
            corridor_length: (3, 7),
            fill_percentage: 35,
        }
    }
}

/// Per-type pool capacities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolCapacities {
    pub projectiles: usize,
    pub motes: usize,
    pub pickups: usize,
    pub particles: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            projectiles: 60,
            motes: 100,
            pickups: 20,
            particles: 100,
        }
    }
}

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Logic step in seconds
    pub step_secs: f32,
    /// Largest real delta accepted per frame
    pub max_frame_delta: f64,

    pub pools: PoolCapacities,

    // === Energy ===
    pub magwave_max: f32,
    pub magwave_recharge_per_sec: f32,
    pub magwave_drain_per_sec: f32,
    pub magwave_radius: f32,
    pub magwave_pull: f32,
    pub warp_max: f32,
    pub warp_recharge_per_sec: f32,
    pub warp_drain_per_sec: f32,

    // === Combat ===
    pub fire_cooldown_ticks: u32,
    pub projectile_speed: f32,
    pub enemy_projectile_speed: f32,
    pub enemy_fire_cooldown: (u32, u32),
    pub enemy_spawn_interval_ticks: u32,
    pub pickup_drop_chance: f64,

    // === Scenery ===
    pub star_count: usize,
    pub mote_spawn_interval_ticks: u32,
    pub station_spawn_interval_ticks: u32,
    pub station_drift_speed: f32,
    pub dock_distance: f32,

    // === Scoring ===
    pub score_enemy: u64,
    pub score_mote_shot: u64,
    pub score_mote_collected: u64,
    pub score_pickup: u64,

    // === Station interior ===
    pub station_width: usize,
    pub station_height: usize,
    pub carve_attempts: u32,
    pub carve: CarveParams,
    pub walk_cooldown_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            step_secs: SIM_DT,
            max_frame_delta: MAX_FRAME_DELTA,

            pools: PoolCapacities::default(),

            magwave_max: 100.0,
            magwave_recharge_per_sec: 15.0,
            magwave_drain_per_sec: 40.0,
            magwave_radius: 140.0,
            magwave_pull: 0.35,
            warp_max: 100.0,
            warp_recharge_per_sec: 10.0,
            warp_drain_per_sec: 100.0,

            fire_cooldown_ticks: 10,
            projectile_speed: 9.0,
            enemy_projectile_speed: 4.5,
            enemy_fire_cooldown: (60, 150),
            enemy_spawn_interval_ticks: 90,
            pickup_drop_chance: 0.25,

            star_count: 60,
            mote_spawn_interval_ticks: 20,
            station_spawn_interval_ticks: 1800,
            station_drift_speed: 0.6,
            dock_distance: 36.0,

            score_enemy: 50,
            score_mote_shot: 5,
            score_mote_collected: 10,
            score_pickup: 250,

            station_width: STATION_WIDTH,
            station_height: STATION_HEIGHT,
            carve_attempts: 10,
            carve: CarveParams::default(),
            walk_cooldown_ticks: 6,
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Velocity scale that maps 60 Hz-authored speeds onto the logic step
    pub fn time_scale(&self) -> f32 {
        self.step_secs * BASELINE_FPS
    }

    /// Warp shuts off once energy drops below ten ticks' worth
    pub fn warp_low_water(&self) -> f32 {
        10.0 * self.step_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "warp_max": 50.0, "pools": { "motes": 8 } }"#).unwrap();
        assert_eq!(tuning.warp_max, 50.0);
        assert_eq!(tuning.pools.motes, 8);
        assert_eq!(tuning.pools.projectiles, 60);
        assert_eq!(tuning.carve_attempts, 10);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_time_scale_at_baseline() {
        let tuning = Tuning::default();
        assert!((tuning.time_scale() - 1.0).abs() < 1e-6);
    }
}
