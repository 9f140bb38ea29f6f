//! Per-tick movement and recycling
//!
//! The player never travels in z. Instead everything else drifts toward
//! negative z by `drive_speed` each tick, and anything that falls behind
//! the recycle boundary (`-road_length / 2`) is teleported back ahead.
//! Nothing is created or destroyed here.

use rand::Rng;

use super::layout;
use super::pool::{EntityHandle, EntityKind};
use super::state::{CarGeometry, World};
use crate::config::GameConfig;

/// Advance every entity by one tick
///
/// Scenery and pickups scroll first (handle order), then the enemies, then
/// the player steers. The order is fixed so a seeded RNG reproduces the
/// same respawns.
pub fn step<R: Rng>(world: &mut World, config: &GameConfig, car: &CarGeometry, rng: &mut R) {
    scroll(world, config, rng);
    drive_enemies(world, config, rng);
    steer_player(world, config, car);
}

/// Scroll scenery and pickups toward the player, wrapping what falls behind
pub fn scroll<R: Rng>(world: &mut World, config: &GameConfig, rng: &mut R) {
    let d = config.drive_speed;
    let limit = -config.recycle_distance();
    let span = config.scroll_span();

    for (handle, entity) in world.pool.iter_mut() {
        match entity.kind {
            EntityKind::Enemy | EntityKind::Player => continue,
            _ => entity.pos.z -= d,
        }
        if entity.pos.z >= limit {
            continue;
        }

        match entity.kind {
            EntityKind::RoadLine | EntityKind::Kerb => {
                entity.pos.z += span;
            }
            EntityKind::Building => {
                entity.pos.z += span + rng.random::<f64>() * config.building_respawn_jitter;
                entity.pos.x = layout::respawn_building_x(config, entity.pos.x, rng);
            }
            EntityKind::StreetLight => {
                entity.pos.z += span + rng.random::<f64>() * config.light_spacing;
                entity.pos.x = layout::respawn_street_light_x(config, entity.pos.x, rng);
            }
            EntityKind::TrafficLight => {
                entity.pos.z = layout::respawn_traffic_light_z(config, rng);
            }
            EntityKind::Pickup => {
                // Collected (hidden) pickups come back through here too
                entity.pos = layout::respawn_pickup_position(config, rng);
                entity.visible = true;
            }
            EntityKind::Enemy | EntityKind::Player => unreachable!(),
        }
        log::trace!("Recycled {:?} #{}", entity.kind, handle.raw());
    }
}

/// Move both enemies at their closing speed, respawning any that passed
pub fn drive_enemies<R: Rng>(world: &mut World, config: &GameConfig, rng: &mut R) {
    let limit = -config.recycle_distance();
    let closing = config.enemy_car_speed + config.drive_speed;

    for (i, enemy) in world.enemies.iter().enumerate() {
        let entity = world.pool.get_mut(enemy.handle);
        entity.pos.z -= closing;
        if entity.pos.z < limit {
            let (x, z) = layout::respawn_enemy(config, enemy, rng);
            entity.pos.x = x;
            entity.pos.z = z;
            log::debug!("Enemy {} respawned at x={:.2} z={:.1}", i, x, z);
        }
    }
}

/// Apply held steering intents and clamp into the lane
///
/// Left is applied before right and each move is clamped on its own, so
/// holding both nets out to zero unless the left move hits the bound.
pub fn steer_player(world: &mut World, config: &GameConfig, car: &CarGeometry) {
    let bound = config.lane_bound(car.half_width());
    let speed = config.car_move_speed;
    let (left, right) = (world.player.steer_left, world.player.steer_right);

    let player = world.pool.get_mut(world.player.handle);
    let mut x = player.pos.x.clamp(-bound, bound);
    if left {
        x = (x - speed).max(-bound);
    }
    if right {
        x = (x + speed).min(bound);
    }
    player.pos.x = x;
}

/// Hide pickups whose collection was credited this tick
pub fn hide_collected(world: &mut World, collected: &[EntityHandle]) {
    for &handle in collected {
        world.pool.get_mut(handle).visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(seed: u64) -> (GameConfig, World, Pcg32) {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = layout::populate(&config, &CarGeometry::fallback(), &mut rng);
        (config, world, rng)
    }

    #[test]
    fn test_scenery_scrolls_by_drive_speed() {
        let (config, mut world, mut rng) = setup(1);
        let line = world.pool.handles_of(EntityKind::RoadLine)[0];
        let before = world.pool.get(line).pos.z;
        scroll(&mut world, &config, &mut rng);
        assert!((world.pool.get(line).pos.z - (before - 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_road_line_wraps_by_span() {
        let (config, mut world, mut rng) = setup(1);
        let line = world.pool.handles_of(EntityKind::RoadLine)[0];
        world.pool.get_mut(line).pos.z = -149.8;
        scroll(&mut world, &config, &mut rng);
        // -149.8 - 0.5 = -150.3, then + 450
        assert!((world.pool.get(line).pos.z - 299.7).abs() < 1e-9);
    }

    #[test]
    fn test_building_keeps_side_on_wrap() {
        let (config, mut world, mut rng) = setup(2);
        let building = world.pool.handles_of(EntityKind::Building)[0];
        let before_x = world.pool.get(building).pos.x;
        assert!(before_x < 0.0);
        world.pool.get_mut(building).pos.z = -150.0;
        scroll(&mut world, &config, &mut rng);

        let b = world.pool.get(building).pos;
        assert!(b.x < 0.0);
        assert!(b.z >= -150.5 + 450.0 && b.z < -150.5 + 470.0);
    }

    #[test]
    fn test_enemy_closing_speed() {
        let (config, mut world, mut rng) = setup(3);
        let enemy = world.enemies[0].handle;
        world.pool.get_mut(enemy).pos.z = 2.0;
        drive_enemies(&mut world, &config, &mut rng);
        assert!((world.pool.get(enemy).pos.z - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_enemy_respawns_near_base() {
        let (config, mut world, mut rng) = setup(4);
        let state = world.enemies[1];
        world.pool.get_mut(state.handle).pos = DVec3::new(2.5, 0.61, -149.5);
        drive_enemies(&mut world, &config, &mut rng);

        let pos = world.pool.get(state.handle).pos;
        assert!(pos.z >= state.base_z && pos.z < state.base_z + config.enemy_respawn_jitter);
        assert!((pos.x - state.lane_x).abs() <= 1.0);
    }

    #[test]
    fn test_hidden_pickup_still_scrolls_and_respawns() {
        let (config, mut world, mut rng) = setup(5);
        let pickup = world.pickups[0];
        world.pool.get_mut(pickup).pos.z = -149.9;
        hide_collected(&mut world, &[pickup]);
        assert!(!world.pool.get(pickup).visible);

        scroll(&mut world, &config, &mut rng);
        let p = world.pool.get(pickup);
        assert!(p.visible);
        assert!(p.pos.z >= config.road_length / 2.0);
    }

    #[test]
    fn test_steering_left_then_right() {
        let (config, mut world, _) = setup(6);
        let car = CarGeometry::fallback();

        world.player.steer_left = true;
        steer_player(&mut world, &config, &car);
        assert!((world.player_pos().x + 0.15).abs() < 1e-9);

        world.player.steer_right = true;
        steer_player(&mut world, &config, &car);
        assert!((world.player_pos().x + 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_steering_stops_at_bound() {
        let (config, mut world, _) = setup(7);
        let car = CarGeometry::fallback();
        world.player.steer_right = true;
        for _ in 0..100 {
            steer_player(&mut world, &config, &car);
        }
        let bound = config.lane_bound(car.half_width());
        assert_eq!(world.player_pos().x, bound);

        // Both held at the bound: left moves inward, then right moves back out
        world.player.steer_left = true;
        steer_player(&mut world, &config, &car);
        assert!((world.player_pos().x - bound).abs() < 1e-9);
    }

    #[test]
    fn test_both_intents_near_bounds() {
        let (config, mut world, _) = setup(8);
        let car = CarGeometry::fallback();
        let bound = config.lane_bound(car.half_width());
        world.player.steer_left = true;
        world.player.steer_right = true;

        // (start, expected): left clamps at -bound before right moves back in
        let cases = [
            (-bound, -bound + 0.15),
            (-bound + 0.05, -bound + 0.15),
            (bound, bound),
            (bound - 0.05, bound - 0.05),
            (0.0, 0.0),
        ];
        for (start, expected) in cases {
            world.pool.get_mut(world.player.handle).pos.x = start;
            steer_player(&mut world, &config, &car);
            let x = world.player_pos().x;
            assert!((x - expected).abs() < 1e-9, "start {start}: got {x}, want {expected}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_player_stays_in_lane(
            seed in any::<u64>(),
            intents in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..400),
        ) {
            let (config, mut world, mut rng) = setup(seed);
            let car = CarGeometry::fallback();
            let bound = config.lane_bound(car.half_width());
            for (left, right) in intents {
                world.player.steer_left = left;
                world.player.steer_right = right;
                step(&mut world, &config, &car, &mut rng);
                let x = world.player_pos().x;
                prop_assert!(x >= -bound && x <= bound);
            }
        }

        #[test]
        fn prop_pool_counts_conserved(seed in any::<u64>(), ticks in 1usize..1200) {
            let (config, mut world, mut rng) = setup(seed);
            let car = CarGeometry::fallback();
            let kinds = [
                EntityKind::RoadLine,
                EntityKind::Kerb,
                EntityKind::Building,
                EntityKind::StreetLight,
                EntityKind::TrafficLight,
                EntityKind::Pickup,
                EntityKind::Enemy,
                EntityKind::Player,
            ];
            let before: Vec<usize> = kinds.iter().map(|&k| world.pool.count(k)).collect();
            let total = world.pool.len();
            for _ in 0..ticks {
                step(&mut world, &config, &car, &mut rng);
            }
            let after: Vec<usize> = kinds.iter().map(|&k| world.pool.count(k)).collect();
            prop_assert_eq!(before, after);
            prop_assert_eq!(total, world.pool.len());
            let limit = -config.recycle_distance();
            for (_, e) in world.pool.iter() {
                prop_assert!(e.pos.z >= limit);
            }
        }
    }
}
