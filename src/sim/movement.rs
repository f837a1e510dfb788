//! Per-tick movement integration
//!
//! Velocities are authored in pixels per 60 Hz tick. Each tick every moving
//! entity advances by `vel * time_scale * warp_factor`, where `time_scale`
//! rescales to the actual logic step and `warp_factor` is the warp boost.

use glam::Vec2;

use super::state::{Body, World};
use crate::consts::*;
use crate::settings::ControlMode;
use crate::tuning::Tuning;

/// Motion scale for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub time_scale: f32,
    pub warp_factor: f32,
}

impl Motion {
    pub fn for_tick(tuning: &Tuning, warp_active: bool) -> Self {
        Self {
            time_scale: tuning.time_scale(),
            warp_factor: if warp_active { WARP_MULTIPLIER } else { 1.0 },
        }
    }

    /// Scale applied to world velocities
    #[inline]
    pub fn scale(&self) -> f32 {
        self.time_scale * self.warp_factor
    }
}

/// Advance a body one tick
#[inline]
pub fn advance(body: &mut Body, scale: f32) {
    body.pos += body.vel * scale;
}

/// Remember every position at the start of a tick so the renderer can blend
/// between this tick and the next, whatever moved things in between.
pub fn snapshot_positions(world: &mut World) {
    world.hero.prev_tip = world.hero.tip;
    for star in &mut world.stars {
        star.prev_pos = star.pos;
    }
    for mote in world.motes.iter_mut() {
        mote.body.prev_pos = mote.body.pos;
    }
    for projectile in world.projectiles.iter_mut() {
        projectile.body.prev_pos = projectile.body.pos;
    }
    for pickup in world.pickups.iter_mut() {
        pickup.body.prev_pos = pickup.body.pos;
    }
    for particle in world.particles.iter_mut() {
        particle.body.prev_pos = particle.body.pos;
    }
    for station in &mut world.stations {
        station.body.prev_pos = station.body.pos;
    }
    for enemy in &mut world.enemies {
        enemy.ship.prev_tip = enemy.ship.tip;
    }
}

/// Move every world entity except the hero
pub fn integrate_world(world: &mut World, motion: Motion) {
    let scale = motion.scale();

    for star in &mut world.stars {
        star.pos.y += star.speed * scale;
        // Wrap without interpolating across the screen. Horizontal wrap keeps
        // the field full after scenery shifts.
        let wrapped = Vec2::new(
            star.pos.x.rem_euclid(world.bounds.w),
            if star.pos.y > world.bounds.h {
                star.pos.y - world.bounds.h
            } else {
                star.pos.y
            },
        );
        if wrapped != star.pos {
            star.pos = wrapped;
            star.prev_pos = wrapped;
        }
    }
    for mote in world.motes.iter_mut() {
        advance(&mut mote.body, scale);
    }
    for projectile in world.projectiles.iter_mut() {
        advance(&mut projectile.body, scale);
    }
    for pickup in world.pickups.iter_mut() {
        advance(&mut pickup.body, scale);
    }
    for particle in world.particles.iter_mut() {
        advance(&mut particle.body, scale);
        particle.body.vel *= 0.96;
    }
    for station in &mut world.stations {
        advance(&mut station.body, scale);
    }
    for enemy in &mut world.enemies {
        enemy.ship.translate(enemy.vel * scale);
    }
}

/// Shift every tracked collection by `dx`, leaving the hero where it is.
///
/// Moving the scenery one way looks exactly like moving the hero the other.
pub fn shift_world_x(world: &mut World, dx: f32) {
    let shift = Vec2::new(dx, 0.0);
    for star in &mut world.stars {
        star.pos += shift;
    }
    for mote in world.motes.iter_mut() {
        mote.body.pos += shift;
    }
    for projectile in world.projectiles.iter_mut() {
        projectile.body.pos += shift;
    }
    for pickup in world.pickups.iter_mut() {
        pickup.body.pos += shift;
    }
    for particle in world.particles.iter_mut() {
        particle.body.pos += shift;
    }
    for station in &mut world.stations {
        station.body.pos += shift;
    }
    for enemy in &mut world.enemies {
        enemy.ship.tip += shift;
        enemy.origin_x += dx;
    }
}

/// Apply horizontal/vertical steering to the hero for one tick.
///
/// In `SceneryShift` mode horizontal input moves the world instead.
pub fn steer_hero(world: &mut World, dx: f32, dy: f32, mode: ControlMode, time_scale: f32) {
    let step_x = dx * HERO_SPEED * time_scale;
    let step_y = dy * HERO_SPEED * time_scale;

    match mode {
        ControlMode::Direct => world.hero.tip.x += step_x,
        ControlMode::SceneryShift => {
            if step_x != 0.0 {
                shift_world_x(world, -step_x);
            }
        }
    }
    world.hero.tip.y += step_y;

    // Keep the whole triangle on screen
    let half_w = world.hero.width / 2.0;
    let max_y = world.bounds.h - world.hero.height;
    world.hero.tip.x = world.hero.tip.x.clamp(half_w, world.bounds.w - half_w);
    world.hero.tip.y = world.hero.tip.y.clamp(world.bounds.h * 0.4, max_y);
}

/// Magwave: steer motes and pickups within `radius` toward `center`
pub fn apply_magwave(world: &mut World, center: Vec2, radius: f32, pull: f32, time_scale: f32) {
    let radius_sq = radius * radius;
    let attract = |body: &mut Body| {
        let to_center = center - body.pos;
        let dist_sq = to_center.length_squared();
        if dist_sq < radius_sq && dist_sq > 1.0 {
            let strength = pull * (1.0 - dist_sq.sqrt() / radius);
            body.vel += to_center.normalize() * strength * time_scale;
        }
    };
    for mote in world.motes.iter_mut() {
        attract(&mut mote.body);
    }
    for pickup in world.pickups.iter_mut() {
        attract(&mut pickup.body);
    }
}
