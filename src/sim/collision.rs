//! Collision detection between the player, pickups and enemy cars
//!
//! A pure function of post-move positions. Boxes are rebuilt every tick
//! from each entity's position and its kind's fixed half extents.
//!
//! Forgiveness policy: before testing against enemies the player's box is
//! shrunk by `enemy_hitbox_inset` on every face, so grazing contact does not
//! end the run. Pickups are tested against the unmodified player box.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::pool::{EntityHandle, EntityKind};
use super::state::{CarGeometry, World};
use crate::config::GameConfig;

/// Something the player touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// A visible pickup overlaps the player (`index` is its spawn order)
    PickupCollected { index: usize, handle: EntityHandle },
    /// At least one enemy overlaps the (inset) player box
    EnemyCollision { enemy: usize },
}

/// Box around a car centered at `pos`
#[inline]
pub fn car_box(pos: DVec3, car: &CarGeometry) -> Aabb {
    Aabb::from_center_half_extents(pos, car.half_extents)
}

/// Box around a pickup sphere
#[inline]
pub fn pickup_box(pos: DVec3, radius: f64) -> Aabb {
    Aabb::from_center_half_extents(pos, DVec3::splat(radius))
}

/// Test the player against every visible pickup and both enemies
///
/// Events are appended to `events` (cleared first): pickups in spawn order,
/// then at most one enemy collision however many enemies overlap.
pub fn check(world: &World, config: &GameConfig, car: &CarGeometry, events: &mut Vec<CollisionEvent>) {
    events.clear();

    let player = car_box(world.player_pos(), car);

    for (index, &handle) in world.pickups.iter().enumerate() {
        let pickup = world.pool.get(handle);
        debug_assert_eq!(pickup.kind, EntityKind::Pickup);
        if !pickup.visible {
            continue;
        }
        if player.intersects(&pickup_box(pickup.pos, config.point_radius)) {
            events.push(CollisionEvent::PickupCollected { index, handle });
        }
    }

    let hitbox = player.expand_by_scalar(-config.enemy_hitbox_inset);
    let crashed = world.enemies.iter().position(|enemy| {
        let pos = world.pool.get(enemy.handle).pos;
        hitbox.intersects(&car_box(pos, car))
    });
    if let Some(enemy) = crashed {
        events.push(CollisionEvent::EnemyCollision { enemy });
    }
}
