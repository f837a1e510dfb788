//! Frame composition: turns game state into `Surface` calls

use glam::Vec2;
use std::f32::consts::TAU;

use super::{Color, Surface, fade, palette};
use crate::consts::*;
use crate::sim::station::Cell;
use crate::sim::{Game, GamePhase, Interior, Owner, Ship};

const HUD_TEXT: f32 = 14.0;
const TITLE_TEXT: f32 = 32.0;
const BAR_SIZE: Vec2 = Vec2::new(80.0, 6.0);

/// Draw one frame. `alpha` blends positions between the last two ticks.
pub fn render_frame(game: &Game, alpha: f32, surface: &mut impl Surface) {
    let alpha = alpha.clamp(0.0, 1.0);
    surface.clear(palette::SPACE);

    match game.phase() {
        GamePhase::StartScreen => {
            draw_stars(game, alpha, surface);
            let center = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
            surface.text(center - Vec2::new(110.0, 40.0), TITLE_TEXT, "STATION DRIFT", palette::TEXT);
            surface.text(center + Vec2::new(-60.0, 10.0), HUD_TEXT, "Press Start", palette::TEXT);
        }
        GamePhase::Playing => {
            draw_space(game, alpha, surface);
            draw_hud(game, surface);
        }
        GamePhase::Paused => {
            // Frozen: draw the latest tick, no blending
            draw_space(game, 1.0, surface);
            draw_hud(game, surface);
            draw_banner(surface, "PAUSED", None);
        }
        GamePhase::GameOver => {
            draw_space(game, 1.0, surface);
            draw_hud(game, surface);
            let score = format!("Score {}", game.session.progress.score);
            draw_banner(surface, "GAME OVER", Some(&score));
        }
        GamePhase::Docked => match &game.interior {
            Some(interior) => draw_interior(interior, alpha, surface),
            None => draw_space(game, alpha, surface),
        },
    }
}

/// Optional frame-rate readout
pub fn draw_fps(surface: &mut impl Surface, fps: f32) {
    surface.text(
        Vec2::new(CANVAS_WIDTH - 70.0, CANVAS_HEIGHT - 16.0),
        HUD_TEXT,
        &format!("{:.0} fps", fps),
        palette::TEXT,
    );
}

fn draw_stars(game: &Game, alpha: f32, surface: &mut impl Surface) {
    if !game.settings.quality.starfield_enabled() {
        return;
    }
    for star in &game.world.stars {
        let pos = crate::lerp_vec(star.prev_pos, star.pos, alpha);
        surface.fill_rect(pos, Vec2::splat(star.size), palette::STAR);
    }
}

fn draw_ship(ship: &Ship, alpha: f32, color: Color, surface: &mut impl Surface) {
    let points = ship.points_interpolated(alpha);
    surface.stroke_path(&points, true, 2.0, color);
}

fn draw_space(game: &Game, alpha: f32, surface: &mut impl Surface) {
    let world = &game.world;
    draw_stars(game, alpha, surface);

    for station in &world.stations {
        let center = station.body.interpolated(alpha);
        let half = station.body.size / 2.0;
        let color = if station.visited {
            palette::STATION_VISITED
        } else {
            palette::STATION
        };
        let corners = [
            center - half,
            center + Vec2::new(half.x, -half.y),
            center + half,
            center + Vec2::new(-half.x, half.y),
        ];
        surface.stroke_path(&corners, true, 2.0, color);
        surface.fill_arc(center, half.x * 0.3, 0.0, TAU, color);
    }

    for mote in world.motes.iter() {
        let pos = mote.body.interpolated(alpha);
        surface.fill_arc(pos, mote.body.size.x / 2.0, 0.0, TAU, palette::MOTE);
    }
    for pickup in world.pickups.iter() {
        let pos = pickup.body.interpolated(alpha);
        let half = pickup.body.size / 2.0;
        surface.fill_rect(pos - half, pickup.body.size, palette::XP_BAR);
    }
    for shot in world.projectiles.iter() {
        let pos = shot.body.interpolated(alpha);
        let color = match shot.owner {
            Owner::Hero => palette::HERO_SHOT,
            Owner::Enemy => palette::ENEMY_SHOT,
        };
        surface.fill_rect(pos - shot.body.size / 2.0, shot.body.size, color);
    }
    for enemy in &world.enemies {
        draw_ship(&enemy.ship, alpha, palette::ENEMY, surface);
    }
    if game.settings.particles {
        for particle in world.particles.iter() {
            let pos = particle.body.interpolated(alpha);
            let tint = palette::PARTICLES[particle.tint as usize % palette::PARTICLES.len()];
            surface.fill_rect(pos, particle.body.size, fade(tint, particle.life()));
        }
    }

    if game.phase() != GamePhase::GameOver {
        if game.session.magwave.active {
            let center = world.hero.center();
            surface.fill_arc(center, game.tuning.magwave_radius, 0.0, TAU, palette::MAGWAVE);
        }
        draw_ship(&world.hero, alpha, palette::HERO, surface);
    }
}

fn draw_bar(surface: &mut impl Surface, pos: Vec2, fraction: f32, color: Color) {
    surface.fill_rect(pos, BAR_SIZE, palette::DIM);
    surface.fill_rect(
        pos,
        Vec2::new(BAR_SIZE.x * fraction.clamp(0.0, 1.0), BAR_SIZE.y),
        color,
    );
}

fn draw_hud(game: &Game, surface: &mut impl Surface) {
    let progress = &game.session.progress;
    surface.text(
        Vec2::new(8.0, 8.0),
        HUD_TEXT,
        &format!("SCORE {}", progress.score),
        palette::TEXT,
    );
    surface.text(
        Vec2::new(8.0, 26.0),
        HUD_TEXT,
        &format!("LV {}", progress.level),
        palette::TEXT,
    );
    draw_bar(surface, Vec2::new(60.0, 30.0), progress.level_fraction(), palette::XP_BAR);

    let right = CANVAS_WIDTH - BAR_SIZE.x - 8.0;
    draw_bar(surface, Vec2::new(right, 10.0), game.session.warp.fraction(), palette::WARP_BAR);
    draw_bar(
        surface,
        Vec2::new(right, 22.0),
        game.session.magwave.fraction(),
        palette::MAGWAVE_BAR,
    );
    if game.session.undead {
        surface.text(Vec2::new(right, 34.0), HUD_TEXT, "REVIVE", palette::TEXT);
    }
}

fn draw_banner(surface: &mut impl Surface, title: &str, subtitle: Option<&str>) {
    surface.fill_rect(Vec2::ZERO, Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT), palette::DIM);
    let center = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    surface.text(center - Vec2::new(80.0, 20.0), TITLE_TEXT, title, palette::TEXT);
    if let Some(subtitle) = subtitle {
        surface.text(center + Vec2::new(-50.0, 24.0), HUD_TEXT, subtitle, palette::TEXT);
    }
}

fn cell_color(cell: Cell) -> Option<Color> {
    match cell {
        Cell::Empty => None,
        Cell::Wall => Some(palette::WALL),
        Cell::Floor => Some(palette::FLOOR),
        Cell::Corridor => Some(palette::CORRIDOR),
        Cell::Door => Some(palette::DOOR),
        Cell::Dock => Some(palette::DOCK),
        Cell::Bridge => Some(palette::BRIDGE),
        Cell::Engine => Some(palette::ENGINE),
        Cell::Storage => Some(palette::STORAGE),
    }
}

fn draw_interior(interior: &Interior, alpha: f32, surface: &mut impl Surface) {
    let layout = &interior.layout;
    let (w, h) = (layout.width().max(1) as f32, layout.height().max(1) as f32);
    // Fit the grid in the canvas, leaving room for the dialog line
    let cell = (CANVAS_WIDTH / w).min((CANVAS_HEIGHT - 80.0) / h).floor().max(1.0);
    let origin = Vec2::new((CANVAS_WIDTH - cell * w) / 2.0, 40.0);
    let to_screen = |p: Vec2| origin + p * cell;

    for p in layout.grid.coords() {
        if let Some(color) = layout.cell(p).and_then(cell_color) {
            surface.fill_rect(to_screen(p.as_vec2()), Vec2::splat(cell), color);
        }
    }

    let half = Vec2::splat(cell / 2.0);
    for npc in &layout.npcs {
        surface.fill_arc(to_screen(npc.pos.as_vec2()) + half, cell * 0.4, 0.0, TAU, palette::NPC);
    }

    let walker = &interior.walker;
    let pos = crate::lerp_vec(walker.prev_pos.as_vec2(), walker.pos.as_vec2(), alpha);
    surface.fill_arc(to_screen(pos) + half, cell * 0.45, 0.0, TAU, palette::WALKER);

    surface.text(
        Vec2::new(8.0, 8.0),
        HUD_TEXT,
        &format!("Station {}", interior.station_id),
        palette::TEXT,
    );
    if let Some(line) = layout.npcs.iter().find_map(|n| n.current_line()) {
        surface.fill_rect(
            Vec2::new(0.0, CANVAS_HEIGHT - 40.0),
            Vec2::new(CANVAS_WIDTH, 40.0),
            palette::DIM,
        );
        surface.text(Vec2::new(12.0, CANVAS_HEIGHT - 28.0), HUD_TEXT, line, palette::TEXT);
    }
    if walker.pos == layout.dock && walker.left_dock {
        surface.text(Vec2::new(8.0, 24.0), HUD_TEXT, "Returning to ship", palette::TEXT);
    }
}
