//! Game state and core simulation types
//!
//! `GameState` is the single explicitly-owned simulation context: the
//! entity arena, the per-car side tables, the RNG and the state machine.

use glam::DVec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::layout;
use super::machine::{GameStateMachine, GameStatus};
use super::pool::{EntityHandle, EntityPool};
use crate::assets::{AssetStatus, AssetTracker};
use crate::config::GameConfig;
use crate::consts::*;
use crate::error::{ConfigError, SimError};

/// Bounding extents of the car model (shared by player and enemies)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarGeometry {
    pub half_extents: DVec3,
}

impl CarGeometry {
    /// Validate extents reported by the model loader
    pub fn new(half_extents: DVec3) -> Result<Self, SimError> {
        if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
            return Err(SimError::InvalidGeometry {
                x: half_extents.x,
                y: half_extents.y,
                z: half_extents.z,
            });
        }
        Ok(Self { half_extents })
    }

    /// Stand-in extents used before (or instead of) the real model
    pub fn fallback() -> Self {
        Self {
            half_extents: DVec3::new(
                FALLBACK_CAR_HALF_WIDTH,
                FALLBACK_CAR_HALF_HEIGHT,
                FALLBACK_CAR_HALF_LENGTH,
            ),
        }
    }

    #[inline]
    pub fn half_width(&self) -> f64 {
        self.half_extents.x
    }

    /// Height of the car's center so its wheels sit just above the road
    #[inline]
    pub fn base_y(&self) -> f64 {
        self.half_extents.y + 0.01
    }
}

/// The player's car: arena handle plus held steering intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub handle: EntityHandle,
    pub steer_left: bool,
    pub steer_right: bool,
}

/// Per-enemy lane data (position lives in the arena)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyState {
    pub handle: EntityHandle,
    /// Lateral center of this enemy's lane
    pub lane_x: f64,
    /// Depth this enemy respawns at before jitter
    pub base_z: f64,
}

/// Everything that moves: the arena plus handles into it
#[derive(Debug, Clone)]
pub struct World {
    pub pool: EntityPool,
    pub player: PlayerState,
    pub enemies: [EnemyState; 2],
    /// Pickups in spawn order (index is the pickup id in events)
    pub pickups: Vec<EntityHandle>,
}

impl World {
    #[inline]
    pub fn player_pos(&self) -> DVec3 {
        self.pool.get(self.player.handle).pos
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Injected random source for every respawn and restart
    pub rng: Pcg32,
    pub world: World,
    pub machine: GameStateMachine,
    /// Car extents from the asset loader (`None` until it reports)
    pub car: Option<CarGeometry>,
    /// Asset loading progress 0..=100, monotonic while loading
    pub loading_progress: u8,
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Collision events from the most recent tick (reused scratch)
    pub(crate) events: Vec<CollisionEvent>,
}

impl GameState {
    /// Build a fresh game seeded from `seed`
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }

    /// Build a fresh game drawing from an already-constructed generator
    pub fn with_rng(config: GameConfig, mut rng: Pcg32) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = layout::populate(&config, &CarGeometry::fallback(), &mut rng);
        let machine = GameStateMachine::new(config.points_per_pickup());
        log::info!(
            "World laid out: {} entities, {} pickups",
            world.pool.len(),
            world.pickups.len()
        );

        Ok(Self {
            config,
            rng,
            world,
            machine,
            car: None,
            loading_progress: 0,
            paused: false,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.machine.status()
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.machine.score()
    }

    /// Collision events produced by the most recent tick
    #[inline]
    pub fn last_events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Car extents in effect (fallback until the loader reports)
    #[inline]
    pub fn car_geometry(&self) -> CarGeometry {
        self.car.unwrap_or_else(CarGeometry::fallback)
    }

    /// Current lateral limit of the player's car
    #[inline]
    pub fn lane_bound(&self) -> f64 {
        self.config.lane_bound(self.car_geometry().half_width())
    }

    /// Install the real car extents and re-seat both cars on the road
    pub fn apply_car_geometry(&mut self, car: CarGeometry) -> Result<(), SimError> {
        let bound = self.config.lane_bound(car.half_width());
        if bound < 0.0 {
            return Err(SimError::CarTooWide {
                half_width: car.half_width(),
                lane: self.config.road_width / 2.0 - self.config.kerb_width,
            });
        }

        self.car = Some(car);
        let base_y = car.base_y();
        let player = self.world.pool.get_mut(self.world.player.handle);
        player.pos.y = base_y;
        player.pos.x = player.pos.x.clamp(-bound, bound);
        for enemy in self.world.enemies {
            self.world.pool.get_mut(enemy.handle).pos.y = base_y;
        }
        Ok(())
    }

    /// Drain loader messages and start play once loading is terminal
    ///
    /// A failed load, or car extents that don't fit the lane, proceed with
    /// fallback geometry. Errors only if the fallback itself can't be seated.
    pub fn poll_assets(&mut self, tracker: &mut AssetTracker) -> Result<GameStatus, SimError> {
        let status = tracker.poll();
        self.loading_progress = self.loading_progress.max(tracker.progress_percent());

        if self.status() != GameStatus::Loading {
            return Ok(self.status());
        }

        match status {
            AssetStatus::Pending => {}
            AssetStatus::Ready => {
                match tracker.car_geometry() {
                    Some(car) => {
                        if let Err(e) = self.apply_car_geometry(car) {
                            log::warn!("{}, using fallback extents", e);
                            self.apply_car_geometry(CarGeometry::fallback())?;
                        }
                    }
                    None => {
                        log::warn!("Loader reported no car geometry, using fallback extents");
                        self.apply_car_geometry(CarGeometry::fallback())?;
                    }
                }
                self.loading_progress = 100;
                self.machine.on_assets_ready();
            }
            AssetStatus::Failed => {
                log::warn!("Asset loading failed, continuing with fallback car geometry");
                self.apply_car_geometry(CarGeometry::fallback())?;
                self.loading_progress = 100;
                self.machine.on_assets_ready();
            }
        }
        Ok(self.status())
    }

    /// Reset score, cars, pickups and scenery
    ///
    /// Honoured only from `GameOver` unless `force` is set. Returns whether
    /// the reset happened.
    pub fn restart(&mut self, force: bool) -> bool {
        if !self.machine.restart(force) {
            return false;
        }
        let car = self.car_geometry();
        layout::realign(&mut self.world, &self.config, &car, &mut self.rng);
        self.events.clear();
        self.paused = false;
        log::info!("Restarted (status {:?})", self.status());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pool::EntityKind;

    #[test]
    fn test_new_state_starts_loading() {
        let state = GameState::new(GameConfig::default(), 12345).unwrap();
        assert_eq!(state.status(), GameStatus::Loading);
        assert_eq!(state.score(), 0);
        assert_eq!(state.loading_progress, 0);
        assert_eq!(state.world.pickups.len(), NUM_POINTS);
        assert_eq!(state.world.pool.count(EntityKind::Player), 1);
        assert_eq!(state.world.pool.count(EntityKind::Enemy), 2);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = GameConfig {
            road_width: 0.0,
            ..Default::default()
        };
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_fallback_bound_before_assets() {
        let state = GameState::new(GameConfig::default(), 1).unwrap();
        assert!(state.car.is_none());
        assert!((state.lane_bound() - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_car_geometry_validation() {
        assert!(CarGeometry::new(DVec3::new(0.9, 0.5, 2.0)).is_ok());
        assert!(matches!(
            CarGeometry::new(DVec3::new(0.0, 0.5, 2.0)),
            Err(SimError::InvalidGeometry { .. })
        ));
        assert!(CarGeometry::new(DVec3::new(f64::NAN, 0.5, 2.0)).is_err());
    }

    #[test]
    fn test_apply_geometry_reseats_cars() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        let car = CarGeometry::new(DVec3::new(0.8, 0.5, 2.0)).unwrap();
        state.apply_car_geometry(car).unwrap();

        assert!((state.lane_bound() - 3.8).abs() < 1e-9);
        assert!((state.world.player_pos().y - 0.51).abs() < 1e-9);
        for enemy in state.world.enemies {
            assert!((state.world.pool.get(enemy.handle).pos.y - 0.51).abs() < 1e-9);
        }
    }

    #[test]
    fn test_car_wider_than_lane_is_rejected() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        let car = CarGeometry::new(DVec3::new(6.0, 0.5, 2.0)).unwrap();
        assert!(matches!(
            state.apply_car_geometry(car),
            Err(SimError::CarTooWide { .. })
        ));
        assert!(state.car.is_none());
    }

    #[test]
    fn test_restart_clears_pause() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.machine.on_assets_ready();
        state.paused = true;
        assert!(!state.restart(false));
        assert!(state.paused);

        assert!(state.restart(true));
        assert!(!state.paused);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn test_restart_ignored_while_loading_unless_forced() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        assert!(!state.restart(false));
        assert!(state.restart(true));
        assert_eq!(state.status(), GameStatus::Loading);
    }
}
