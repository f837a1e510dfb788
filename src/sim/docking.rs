//! Docking with stations and leaving them again

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{Game, GamePhase, Interior, Walker, World};
use super::station::generate_layout;
use super::station::grid::NEIGHBORS;
use super::tick::transition;

/// Odd multiplier spreading station ids across the seed space
const STATION_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Index of the first unvisited station whose centre is within
/// `dock_distance` of the hero's centre
pub fn docking_target(world: &World, dock_distance: f32) -> Option<usize> {
    let hero = world.hero.center();
    world
        .stations
        .iter()
        .position(|s| !s.visited && s.body.pos.distance(hero) < dock_distance)
}

/// Generate the interior for station `index` and switch to the docked scene.
///
/// Each station's layout depends only on the run seed and the station id, so
/// revisiting a seed reproduces the same interiors.
pub fn begin_docking(game: &mut Game, index: usize) {
    let Some(station) = game.world.stations.get(index) else {
        return;
    };
    let station_id = station.id;
    let mut rng =
        Pcg32::seed_from_u64(game.seed ^ u64::from(station_id).wrapping_mul(STATION_SEED_STRIDE));
    let layout = generate_layout(&*game.carver, &game.tuning, &mut rng);
    let walker = Walker::new(layout.dock);
    game.interior = Some(Interior {
        station_id,
        layout,
        walker,
    });
    transition(game, GamePhase::Docked);
}

/// The walker goes back to the ship: either stepping back onto the dock after
/// leaving it, or pressing Action while standing on it.
pub fn should_undock(interior: &Interior, action: bool) -> bool {
    let walker = &interior.walker;
    walker.pos == interior.layout.dock && (action || (walker.left_dock && walker.prev_pos != walker.pos))
}

/// NPC orthogonally adjacent to `pos`, first in neighbour order
pub fn adjacent_npc(interior: &Interior, pos: IVec2) -> Option<usize> {
    NEIGHBORS
        .iter()
        .find_map(|d| interior.layout.npc_at(pos + *d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Body, SpaceStation};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn game_with_station(offset: Vec2) -> Game {
        let mut game = Game::new(3, Tuning::default(), Settings::default());
        let center = game.world.hero.center() + offset;
        let id = game.world.next_station_id();
        game.world.stations.push(SpaceStation {
            id,
            body: Body::new(center, Vec2::ZERO, Vec2::splat(64.0)),
            visited: false,
        });
        game
    }

    #[test]
    fn test_target_within_distance() {
        let game = game_with_station(Vec2::new(10.0, 0.0));
        assert_eq!(docking_target(&game.world, game.tuning.dock_distance), Some(0));

        let far = game_with_station(Vec2::new(200.0, 0.0));
        assert_eq!(docking_target(&far.world, far.tuning.dock_distance), None);
    }

    #[test]
    fn test_visited_station_ignored() {
        let mut game = game_with_station(Vec2::ZERO);
        game.world.stations[0].visited = true;
        assert_eq!(docking_target(&game.world, game.tuning.dock_distance), None);
    }

    #[test]
    fn test_begin_docking_places_walker_on_dock() {
        let mut game = game_with_station(Vec2::ZERO);
        game.session.phase = GamePhase::Playing;
        begin_docking(&mut game, 0);

        assert_eq!(game.phase(), GamePhase::Docked);
        let interior = game.interior.as_ref().unwrap();
        assert_eq!(interior.walker.pos, interior.layout.dock);
        assert!(interior.layout.dock_is_accessible());
        assert!(!should_undock(interior, false));
        assert!(should_undock(interior, true));
    }

    #[test]
    fn test_same_station_same_interior() {
        let mut a = game_with_station(Vec2::ZERO);
        let mut b = game_with_station(Vec2::ZERO);
        a.session.phase = GamePhase::Playing;
        b.session.phase = GamePhase::Playing;
        begin_docking(&mut a, 0);
        begin_docking(&mut b, 0);
        assert_eq!(
            a.interior.unwrap().layout.grid,
            b.interior.unwrap().layout.grid
        );
    }
}
