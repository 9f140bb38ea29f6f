//! Idle/demo driver
//!
//! Plays the game from a snapshot the same way a human would: only through
//! the two steering intents. Dodges the nearest threatening enemy first,
//! otherwise lines up with the closest pickup ahead.

use crate::config::GameConfig;
use crate::sim::{EntityKind, Snapshot, TickInput};

/// How far ahead an enemy is considered a threat
const THREAT_RANGE: f64 = 40.0;
/// How far ahead pickups are chased
const PICKUP_RANGE: f64 = 60.0;
/// Lateral overlap (center distance) below which an enemy blocks our lane
const BLOCKING_WIDTH: f64 = 2.6;
/// Dead zone so the car doesn't twitch around a target
const AIM_TOLERANCE: f64 = 0.2;

/// Steering intents for the next tick
pub fn steer(snapshot: &Snapshot, config: &GameConfig) -> TickInput {
    let Some(player) = snapshot.player() else {
        return TickInput::default();
    };
    let px = player.position.x;
    let pz = player.position.z;

    // Nearest enemy ahead that shares our lane
    let threat = snapshot
        .of_kind(EntityKind::Enemy)
        .filter(|e| {
            let ahead = e.position.z - pz;
            ahead > -2.0 && ahead < THREAT_RANGE && (e.position.x - px).abs() < BLOCKING_WIDTH
        })
        .min_by(|a, b| a.position.z.total_cmp(&b.position.z));

    let target_x = if let Some(enemy) = threat {
        // Swerve to whichever side has more room
        let dodge_right = enemy.position.x <= px;
        let edge = snapshot.lane_bound;
        if dodge_right && px < edge - 0.01 || px <= -edge + 0.01 {
            edge
        } else {
            -edge
        }
    } else if let Some(pickup) = snapshot
        .of_kind(EntityKind::Pickup)
        .filter(|p| p.visible && p.position.z > pz && p.position.z - pz < PICKUP_RANGE)
        .min_by(|a, b| a.position.z.total_cmp(&b.position.z))
    {
        pickup.position.x
    } else {
        0.0
    };

    let dx = target_x - px;
    let tolerance = AIM_TOLERANCE.max(config.car_move_speed / 2.0);
    TickInput {
        steer_left: dx < -tolerance,
        steer_right: dx > tolerance,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use glam::DVec3;

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 21).unwrap();
        for enemy in state.world.enemies {
            state.world.pool.get_mut(enemy.handle).pos.z = 1.0e6;
        }
        for &h in &state.world.pickups {
            state.world.pool.get_mut(h).pos.z = 1.0e6;
        }
        state
    }

    #[test]
    fn test_idles_toward_center() {
        let mut state = state();
        let player = state.world.player.handle;
        state.world.pool.get_mut(player).pos.x = 2.0;
        let input = steer(&Snapshot::capture(&state), &state.config);
        assert!(input.steer_left);
        assert!(!input.steer_right);
    }

    #[test]
    fn test_chases_pickup() {
        let mut state = state();
        let target = state.world.pickups[0];
        state.world.pool.get_mut(target).pos = DVec3::new(3.0, 0.31, 20.0);
        let input = steer(&Snapshot::capture(&state), &state.config);
        assert!(input.steer_right);
    }

    #[test]
    fn test_dodges_enemy_over_pickup() {
        let mut state = state();
        let target = state.world.pickups[0];
        state.world.pool.get_mut(target).pos = DVec3::new(-3.0, 0.31, 10.0);
        let enemy = state.world.enemies[0].handle;
        state.world.pool.get_mut(enemy).pos = DVec3::new(-0.5, 0.61, 15.0);

        let input = steer(&Snapshot::capture(&state), &state.config);
        assert!(input.steer_right);
        assert!(!input.steer_left);
    }
}
