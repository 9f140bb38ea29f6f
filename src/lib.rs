//! Lane Racer - An endless lane-dodging arcade racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scrolling, recycling, collisions, game state)
//! - `config`: Data-driven game tuning with startup validation
//! - `assets`: Asset-loading status polled by the simulation
//! - `autopilot`: Demo driver that produces steering intents

pub mod assets;
pub mod autopilot;
pub mod config;
pub mod error;
pub mod sim;

pub use assets::{AssetEvent, AssetStatus, AssetTracker};
pub use config::GameConfig;
pub use error::{ConfigError, SimError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (displacements are per tick, paced at 60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta the fixed-step clock will accept (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Road dimensions
    pub const ROAD_WIDTH: f64 = 10.0;
    pub const ROAD_LENGTH: f64 = 300.0;
    pub const KERB_WIDTH: f64 = 0.3;
    pub const KERB_HEIGHT: f64 = 0.2;

    /// Per-tick forward travel of the player (world units)
    pub const DRIVE_SPEED: f64 = 0.5;
    /// Extra per-tick closing speed of enemy cars
    pub const ENEMY_CAR_SPEED: f64 = 0.6;
    /// Lateral steering speed per tick
    pub const CAR_MOVE_SPEED: f64 = 0.15;

    /// Pickups
    pub const NUM_POINTS: usize = 15;
    pub const POINT_VALUE: i64 = 10;
    pub const POINT_RADIUS: f64 = 0.3;

    /// Scenery spacing
    pub const BUILDING_SPACING: f64 = 15.0;
    pub const LIGHT_SPACING: f64 = 30.0;
    pub const LINE_LENGTH: f64 = 4.0;
    pub const LINE_GAP: f64 = 4.0;

    /// Gap kept between the car flank and the kerb
    pub const LANE_MARGIN: f64 = 0.1;
    /// Player box shrink applied before enemy overlap tests
    pub const ENEMY_HITBOX_INSET: f64 = 0.1;
    /// Random depth added to an enemy's base respawn depth
    pub const ENEMY_RESPAWN_JITTER: f64 = 50.0;
    /// Random depth added when a building wraps around
    pub const BUILDING_RESPAWN_JITTER: f64 = 20.0;

    /// Car half extents used until the car model reports its real size
    pub const FALLBACK_CAR_HALF_WIDTH: f64 = 1.0;
    pub const FALLBACK_CAR_HALF_HEIGHT: f64 = 0.6;
    pub const FALLBACK_CAR_HALF_LENGTH: f64 = 2.2;

    /// Upper limit on arena size a config may ask for
    pub const MAX_POOL_ENTITIES: usize = 100_000;
}

/// Map a unit random sample in [0, 1) onto [-1, 1)
#[inline]
pub fn signed_unit(r: f64) -> f64 {
    r * 2.0 - 1.0
}

/// Sign of a lateral offset, treating 0 as the right-hand side
#[inline]
pub fn side_of(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}
