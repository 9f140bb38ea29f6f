//! Read-only view handed to rendering and UI each frame

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::machine::GameStatus;
use super::pool::{EntityHandle, EntityKind};
use super::state::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub handle: EntityHandle,
    pub kind: EntityKind,
    pub position: DVec3,
    pub visible: bool,
}

/// Everything a presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub status: GameStatus,
    pub score: u64,
    pub loading_progress: u8,
    pub paused: bool,
    /// Current lateral limit of the player (for HUD/camera framing)
    pub lane_bound: f64,
    /// Arena contents in handle order
    pub entities: Vec<EntitySnapshot>,
    /// What the player touched during the last tick
    pub events: Vec<CollisionEvent>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let entities = state
            .world
            .pool
            .iter()
            .map(|(handle, e)| EntitySnapshot {
                handle,
                kind: e.kind,
                position: e.pos,
                visible: e.visible,
            })
            .collect();

        Self {
            tick: state.time_ticks,
            status: state.status(),
            score: state.score(),
            loading_progress: state.loading_progress,
            paused: state.paused,
            lane_bound: state.lane_bound(),
            entities,
            events: state.last_events().to_vec(),
        }
    }

    /// Entities of one kind, in handle order
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn player(&self) -> Option<&EntitySnapshot> {
        self.of_kind(EntityKind::Player).next()
    }
}
