//! World layout and respawn placement rules
//!
//! `populate` fills the arena once; `realign` puts every existing entity
//! back on its initial layout (used by restart). The `respawn_*` helpers
//! are the per-category rules applied when an entity wraps around.

use glam::DVec3;
use rand::Rng;

use super::pool::{EntityKind, EntityPool};
use super::state::{CarGeometry, EnemyState, PlayerState, World};
use crate::config::GameConfig;
use crate::{side_of, signed_unit};

/// Height of painted road lines above the asphalt
const ROAD_LINE_Y: f64 = 0.005;
/// Building setback band from the kerb (min offset, random extra)
const BUILDING_SETBACK: f64 = 3.0;
const BUILDING_SETBACK_BAND: f64 = 5.0;
/// Street light setback band from the kerb
const LIGHT_SETBACK: f64 = 0.8;
const LIGHT_SETBACK_BAND: f64 = 0.4;
const TRAFFIC_LIGHT_SETBACK: f64 = 0.5;
/// Pickups float just above the road
const PICKUP_CLEARANCE: f64 = 0.01;
/// Enemy lateral respawn jitter (+/- this many units around the lane)
const ENEMY_LANE_JITTER: f64 = 1.0;

/// Number of dashed center lines covering the scroll window
pub fn road_line_count(config: &GameConfig) -> usize {
    (config.scroll_span() / (config.line_length + config.line_gap)).floor() as usize
}

/// Number of building pairs covering the scroll window
pub fn building_pair_count(config: &GameConfig) -> usize {
    (config.scroll_span() / config.building_spacing).floor() as usize
}

/// Number of street light pairs covering the scroll window
pub fn street_light_pair_count(config: &GameConfig) -> usize {
    (config.scroll_span() / config.light_spacing).floor() as usize
}

/// Total entities `populate` spawns, or `None` if the count overflows
pub fn pool_size(config: &GameConfig) -> Option<usize> {
    let buildings = building_pair_count(config).checked_mul(2)?;
    let lights = street_light_pair_count(config).checked_mul(2)?;
    [buildings, lights, config.num_points, 2 + 2 + 3]
        .into_iter()
        .try_fold(road_line_count(config), usize::checked_add)
}

/// Spawn every entity, then place them on the initial layout
///
/// Expects a validated config (see [`GameConfig::validate`]), which bounds
/// the entity counts.
pub fn populate<R: Rng>(config: &GameConfig, car: &CarGeometry, rng: &mut R) -> World {
    let lines = road_line_count(config);
    let buildings = building_pair_count(config) * 2;
    let lights = street_light_pair_count(config) * 2;

    let mut pool = EntityPool::with_capacity(pool_size(config).unwrap_or_default());
    for _ in 0..lines {
        pool.spawn(EntityKind::RoadLine, DVec3::ZERO);
    }
    for _ in 0..2 {
        pool.spawn(EntityKind::Kerb, DVec3::ZERO);
    }
    for _ in 0..buildings {
        pool.spawn(EntityKind::Building, DVec3::ZERO);
    }
    for _ in 0..lights {
        pool.spawn(EntityKind::StreetLight, DVec3::ZERO);
    }
    for _ in 0..2 {
        pool.spawn(EntityKind::TrafficLight, DVec3::ZERO);
    }
    let pickups = (0..config.num_points)
        .map(|_| pool.spawn(EntityKind::Pickup, DVec3::ZERO))
        .collect();

    let enemy_left = pool.spawn(EntityKind::Enemy, DVec3::ZERO);
    let enemy_right = pool.spawn(EntityKind::Enemy, DVec3::ZERO);
    let player = pool.spawn(EntityKind::Player, DVec3::ZERO);

    let mut world = World {
        pool,
        player: PlayerState {
            handle: player,
            steer_left: false,
            steer_right: false,
        },
        enemies: [
            EnemyState {
                handle: enemy_left,
                lane_x: -config.road_width / 4.0,
                base_z: config.road_length * 0.8,
            },
            EnemyState {
                handle: enemy_right,
                lane_x: config.road_width / 4.0,
                base_z: config.road_length * 1.2,
            },
        ],
        pickups,
    };
    realign(&mut world, config, car, rng);
    world
}

/// Put every entity back on its initial layout
///
/// Scenery pairs alternate left/right in handle order. Pickups are spread
/// over the whole visible track rather than only ahead of the player.
pub fn realign<R: Rng>(world: &mut World, config: &GameConfig, car: &CarGeometry, rng: &mut R) {
    let top = config.scroll_span() / 2.0;
    let base_y = car.base_y();

    let mut line_i = 0usize;
    let mut kerb_i = 0usize;
    let mut building_i = 0usize;
    let mut light_i = 0usize;
    let mut traffic_i = 0usize;

    for (_, entity) in world.pool.iter_mut() {
        entity.visible = true;
        match entity.kind {
            EntityKind::RoadLine => {
                let z = top
                    - config.line_length / 2.0
                    - line_i as f64 * (config.line_length + config.line_gap);
                entity.pos = DVec3::new(0.0, ROAD_LINE_Y, z);
                line_i += 1;
            }
            EntityKind::Kerb => {
                let side = alternating_side(kerb_i);
                let x = side * (config.road_width / 2.0 + config.kerb_width / 2.0);
                entity.pos = DVec3::new(x, config.kerb_height / 2.0, 0.0);
                kerb_i += 1;
            }
            EntityKind::Building => {
                let side = alternating_side(building_i);
                let z = top - (building_i / 2) as f64 * config.building_spacing;
                entity.pos = DVec3::new(side * building_offset(config, rng), 0.0, z);
                building_i += 1;
            }
            EntityKind::StreetLight => {
                let side = alternating_side(light_i);
                let z = top - (light_i / 2) as f64 * config.light_spacing;
                let x = side * (config.road_width / 2.0 + config.kerb_width + LIGHT_SETBACK);
                entity.pos = DVec3::new(x, 0.0, z);
                light_i += 1;
            }
            EntityKind::TrafficLight => {
                let side = alternating_side(traffic_i);
                entity.pos = DVec3::new(
                    side * traffic_light_offset(config),
                    0.0,
                    config.road_length * 0.4,
                );
                traffic_i += 1;
            }
            EntityKind::Pickup => {
                entity.pos = initial_pickup_position(config, rng);
            }
            EntityKind::Enemy | EntityKind::Player => {}
        }
    }

    for enemy in world.enemies {
        world.pool.get_mut(enemy.handle).pos = DVec3::new(enemy.lane_x, base_y, enemy.base_z);
    }

    let player = &mut world.player;
    player.steer_left = false;
    player.steer_right = false;
    world.pool.get_mut(player.handle).pos = DVec3::new(0.0, base_y, 0.0);
}

/// Pickup placement at load/restart: anywhere across the visible track
pub fn initial_pickup_position<R: Rng>(config: &GameConfig, rng: &mut R) -> DVec3 {
    let x = pickup_x(config, rng);
    let z = rng.random::<f64>() * config.road_length * 0.8 - config.road_length * 0.4;
    DVec3::new(x, pickup_y(config), z)
}

/// Pickup placement after wrapping: somewhere ahead of the player
pub fn respawn_pickup_position<R: Rng>(config: &GameConfig, rng: &mut R) -> DVec3 {
    let x = pickup_x(config, rng);
    let z = config.road_length / 2.0 + rng.random::<f64>() * config.road_length * 0.5;
    DVec3::new(x, pickup_y(config), z)
}

/// New (x, z) for an enemy that drove past the recycle boundary
pub fn respawn_enemy<R: Rng>(config: &GameConfig, enemy: &EnemyState, rng: &mut R) -> (f64, f64) {
    let z = enemy.base_z + rng.random::<f64>() * config.enemy_respawn_jitter;
    let x = enemy.lane_x + (rng.random::<f64>() - 0.5) * 2.0 * ENEMY_LANE_JITTER;
    (x, z)
}

/// Building x after wrapping, keeping its side of the road
pub fn respawn_building_x<R: Rng>(config: &GameConfig, x: f64, rng: &mut R) -> f64 {
    side_of(x) * building_offset(config, rng)
}

/// Street light x after wrapping, keeping its side of the road
pub fn respawn_street_light_x<R: Rng>(config: &GameConfig, x: f64, rng: &mut R) -> f64 {
    let setback = LIGHT_SETBACK + rng.random::<f64>() * LIGHT_SETBACK_BAND;
    side_of(x) * (config.road_width / 2.0 + config.kerb_width + setback)
}

/// Traffic light depth after wrapping
pub fn respawn_traffic_light_z<R: Rng>(config: &GameConfig, rng: &mut R) -> f64 {
    config.scroll_span() / 2.0 + rng.random::<f64>() * config.road_length * 0.5
}

fn traffic_light_offset(config: &GameConfig) -> f64 {
    config.road_width / 2.0 + config.kerb_width + TRAFFIC_LIGHT_SETBACK
}

fn building_offset<R: Rng>(config: &GameConfig, rng: &mut R) -> f64 {
    config.road_width / 2.0
        + config.kerb_width
        + BUILDING_SETBACK
        + rng.random::<f64>() * BUILDING_SETBACK_BAND
}

fn pickup_x<R: Rng>(config: &GameConfig, rng: &mut R) -> f64 {
    signed_unit(rng.random::<f64>()) * config.pickup_lane_half_width()
}

#[inline]
fn pickup_y(config: &GameConfig) -> f64 {
    config.point_radius + PICKUP_CLEARANCE
}

#[inline]
fn alternating_side(i: usize) -> f64 {
    if i % 2 == 0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world(seed: u64) -> (GameConfig, World) {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = populate(&config, &CarGeometry::fallback(), &mut rng);
        (config, world)
    }

    #[test]
    fn test_pool_size_matches_spawned() {
        let (config, world) = world(1);
        assert_eq!(pool_size(&config), Some(world.pool.len()));
    }

    #[test]
    fn test_pool_size_overflow_is_none() {
        let config = GameConfig {
            num_points: usize::MAX,
            ..Default::default()
        };
        assert_eq!(pool_size(&config), None);
    }

    #[test]
    fn test_category_counts() {
        let (config, world) = world(1);
        assert_eq!(road_line_count(&config), 56);
        assert_eq!(world.pool.count(EntityKind::RoadLine), 56);
        assert_eq!(world.pool.count(EntityKind::Kerb), 2);
        assert_eq!(world.pool.count(EntityKind::Building), 60);
        assert_eq!(world.pool.count(EntityKind::StreetLight), 30);
        assert_eq!(world.pool.count(EntityKind::TrafficLight), 2);
        assert_eq!(world.pool.count(EntityKind::Pickup), config.num_points);
    }

    #[test]
    fn test_initial_pickups_span_visible_track() {
        let (config, world) = world(7);
        let lane = config.pickup_lane_half_width();
        for &handle in &world.pickups {
            let p = world.pool.get(handle);
            assert!(p.visible);
            assert!(p.pos.z >= -0.4 * config.road_length && p.pos.z <= 0.4 * config.road_length);
            assert!(p.pos.x.abs() <= lane);
            assert!((p.pos.y - 0.31).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cars_start_on_canonical_spots() {
        let (config, world) = world(3);
        let player = world.player_pos();
        assert_eq!(player.x, 0.0);
        assert_eq!(player.z, 0.0);

        let left = world.pool.get(world.enemies[0].handle).pos;
        let right = world.pool.get(world.enemies[1].handle).pos;
        assert_eq!(left.x, -2.5);
        assert_eq!(left.z, config.road_length * 0.8);
        assert_eq!(right.x, 2.5);
        assert_eq!(right.z, config.road_length * 1.2);
    }

    #[test]
    fn test_scenery_pairs_alternate_sides() {
        let (config, world) = world(5);
        let buildings = world.pool.handles_of(EntityKind::Building);
        let curb = config.road_width / 2.0 + config.kerb_width;
        for (i, &h) in buildings.iter().enumerate() {
            let b = world.pool.get(h);
            assert_eq!(b.pos.x < 0.0, i % 2 == 0);
            let offset = b.pos.x.abs() - curb;
            assert!((3.0..8.0).contains(&offset));
        }
        let first = world.pool.get(buildings[0]).pos.z;
        let second = world.pool.get(buildings[1]).pos.z;
        assert_eq!(first, second);
        assert_eq!(first, config.scroll_span() / 2.0);
    }

    #[test]
    fn test_respawn_rules() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let enemy = world(1).1.enemies[0];
        for _ in 0..100 {
            let p = respawn_pickup_position(&config, &mut rng);
            assert!(p.z >= config.road_length / 2.0 && p.z < config.road_length);
            assert!(p.x.abs() <= config.pickup_lane_half_width());

            let (x, z) = respawn_enemy(&config, &enemy, &mut rng);
            assert!((-3.5..=-1.5).contains(&x));
            assert!((240.0..290.0).contains(&z));

            assert!(respawn_building_x(&config, -7.0, &mut rng) < 0.0);
            assert!(respawn_street_light_x(&config, 6.0, &mut rng) > 0.0);
        }
    }
}
