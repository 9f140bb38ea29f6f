//! Error types
//!
//! Configuration problems are reported once at startup. `SimError` covers
//! inconsistencies that would otherwise corrupt collision fairness.

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error while reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config document
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value that would produce undefined geometry or scoring
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Fatal simulation errors (programming or collaborator contract violations)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Handle that was never issued by this arena
    #[error("entity handle {0} is not part of the arena")]
    UnknownHandle(u32),

    /// Car extents reported by the loader are unusable for collision boxes
    #[error("invalid car geometry: half extents ({x}, {y}, {z}) must be finite and positive")]
    InvalidGeometry { x: f64, y: f64, z: f64 },

    /// Car is wider than the drivable lane
    #[error("car half width {half_width} leaves no room in a lane of half width {lane}")]
    CarTooWide { half_width: f64, lane: f64 },
}
