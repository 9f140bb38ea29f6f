//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick displacements only
//! - Injected, seeded RNG only
//! - Stable iteration order (by entity handle)
//! - No rendering, input-device or asset-loading dependencies

pub mod aabb;
pub mod collision;
pub mod layout;
pub mod machine;
pub mod motion;
pub mod pool;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::CollisionEvent;
pub use machine::{GameStateMachine, GameStatus};
pub use pool::{Entity, EntityHandle, EntityKind, EntityPool};
pub use snapshot::{EntitySnapshot, Snapshot};
pub use state::{CarGeometry, EnemyState, GameState, PlayerState, World};
pub use tick::{FixedStepClock, TickInput, run_frame, tick};
