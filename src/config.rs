//! Game tuning
//!
//! Loaded once at startup (JSON) and validated before the simulation is
//! built. Every field defaults to the stock tuning in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::layout;

/// Game tuning values (world units, per-tick speeds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Road ===
    pub road_width: f64,
    pub road_length: f64,
    pub kerb_width: f64,
    pub kerb_height: f64,

    // === Speeds (per tick) ===
    pub drive_speed: f64,
    pub enemy_car_speed: f64,
    pub car_move_speed: f64,

    // === Pickups ===
    pub num_points: usize,
    pub point_value: i64,
    pub point_radius: f64,

    // === Scenery ===
    pub building_spacing: f64,
    pub light_spacing: f64,
    pub line_length: f64,
    pub line_gap: f64,
    pub building_respawn_jitter: f64,

    // === Difficulty ===
    /// Gap between the car flank and the kerb at full lock
    pub lane_margin: f64,
    /// Amount the player's box shrinks before testing against enemies
    pub enemy_hitbox_inset: f64,
    pub enemy_respawn_jitter: f64,

    /// Run seed (0 lets the host pick one)
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            road_width: ROAD_WIDTH,
            road_length: ROAD_LENGTH,
            kerb_width: KERB_WIDTH,
            kerb_height: KERB_HEIGHT,

            drive_speed: DRIVE_SPEED,
            enemy_car_speed: ENEMY_CAR_SPEED,
            car_move_speed: CAR_MOVE_SPEED,

            num_points: NUM_POINTS,
            point_value: POINT_VALUE,
            point_radius: POINT_RADIUS,

            building_spacing: BUILDING_SPACING,
            light_spacing: LIGHT_SPACING,
            line_length: LINE_LENGTH,
            line_gap: LINE_GAP,
            building_respawn_jitter: BUILDING_RESPAWN_JITTER,

            lane_margin: LANE_MARGIN,
            enemy_hitbox_inset: ENEMY_HITBOX_INSET,
            enemy_respawn_jitter: ENEMY_RESPAWN_JITTER,

            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would yield undefined geometry or scoring
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("road_width", self.road_width),
            ("road_length", self.road_length),
            ("kerb_width", self.kerb_width),
            ("kerb_height", self.kerb_height),
            ("drive_speed", self.drive_speed),
            ("enemy_car_speed", self.enemy_car_speed),
            ("car_move_speed", self.car_move_speed),
            ("point_radius", self.point_radius),
            ("building_spacing", self.building_spacing),
            ("light_spacing", self.light_spacing),
            ("line_length", self.line_length),
            ("line_gap", self.line_gap),
            ("building_respawn_jitter", self.building_respawn_jitter),
            ("lane_margin", self.lane_margin),
            ("enemy_hitbox_inset", self.enemy_hitbox_inset),
            ("enemy_respawn_jitter", self.enemy_respawn_jitter),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, format!("{value} is not finite")));
            }
        }

        let positive = [
            ("road_width", self.road_width),
            ("road_length", self.road_length),
            ("drive_speed", self.drive_speed),
            ("car_move_speed", self.car_move_speed),
            ("point_radius", self.point_radius),
            ("building_spacing", self.building_spacing),
            ("light_spacing", self.light_spacing),
            ("line_length", self.line_length),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("kerb_width", self.kerb_width),
            ("kerb_height", self.kerb_height),
            ("enemy_car_speed", self.enemy_car_speed),
            ("line_gap", self.line_gap),
            ("building_respawn_jitter", self.building_respawn_jitter),
            ("lane_margin", self.lane_margin),
            ("enemy_hitbox_inset", self.enemy_hitbox_inset),
            ("enemy_respawn_jitter", self.enemy_respawn_jitter),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        if self.point_value < 0 {
            return Err(ConfigError::invalid(
                "point_value",
                format!("must be >= 0, got {}", self.point_value),
            ));
        }
        if self.num_points == 0 {
            return Err(ConfigError::invalid("num_points", "at least one pickup is required"));
        }
        if self.pickup_lane_half_width() <= 0.0 {
            return Err(ConfigError::invalid(
                "road_width",
                format!(
                    "lane of half width {} cannot fit pickups of radius {}",
                    self.road_width / 2.0 - self.kerb_width,
                    self.point_radius
                ),
            ));
        }
        if self.num_points > MAX_POOL_ENTITIES {
            return Err(ConfigError::invalid(
                "num_points",
                format!("{} exceeds the limit of {MAX_POOL_ENTITIES}", self.num_points),
            ));
        }
        match layout::pool_size(self) {
            Some(total) if total <= MAX_POOL_ENTITIES => {}
            _ => {
                return Err(ConfigError::invalid(
                    "road_length",
                    format!(
                        "{} with the configured spacings needs more than {MAX_POOL_ENTITIES} entities",
                        self.road_length
                    ),
                ));
            }
        }
        if self.lane_bound(FALLBACK_CAR_HALF_WIDTH) < 0.0 {
            return Err(ConfigError::invalid(
                "road_width",
                "road is narrower than the fallback car",
            ));
        }

        Ok(())
    }

    /// Depth behind the player past which scrolling entities recycle
    #[inline]
    pub fn recycle_distance(&self) -> f64 {
        self.road_length / 2.0
    }

    /// Total depth of the scrolling window (lines, kerbs, lights, buildings)
    #[inline]
    pub fn scroll_span(&self) -> f64 {
        self.road_length * 1.5
    }

    /// Half width of the strip pickups may spawn in
    #[inline]
    pub fn pickup_lane_half_width(&self) -> f64 {
        self.road_width / 2.0 - self.kerb_width - self.point_radius * 2.0
    }

    /// Maximum lateral offset of a car of the given half width
    #[inline]
    pub fn lane_bound(&self, half_car_width: f64) -> f64 {
        self.road_width / 2.0 - self.kerb_width - half_car_width - self.lane_margin
    }

    /// Points awarded per pickup
    #[inline]
    pub fn points_per_pickup(&self) -> u64 {
        self.point_value.max(0) as u64
    }
}
