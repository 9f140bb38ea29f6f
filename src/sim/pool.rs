//! Entity arena
//!
//! Every simulated object lives in one flat arena and is addressed by a
//! stable [`EntityHandle`]. The arena is filled once when the world is laid
//! out; after that entities are only moved or hidden, never added or removed.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// What an entity represents (drives its recycle rule and collision box)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    RoadLine,
    Kerb,
    Building,
    StreetLight,
    TrafficLight,
    Pickup,
    Enemy,
    Player,
}

impl EntityKind {
    /// Scenery categories that scroll and wrap around
    pub const SCENERY: [EntityKind; 5] = [
        EntityKind::RoadLine,
        EntityKind::Kerb,
        EntityKind::Building,
        EntityKind::StreetLight,
        EntityKind::TrafficLight,
    ];

    /// True for kinds that take part in collision checks
    pub fn collides(&self) -> bool {
        matches!(self, EntityKind::Pickup | EntityKind::Enemy | EntityKind::Player)
    }
}

/// Stable index into the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(u32);

impl EntityHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A single arena record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: DVec3,
    pub visible: bool,
}

/// Fixed-size collection of every entity in the world
#[derive(Debug, Clone, Default)]
pub struct EntityPool {
    entities: Vec<Entity>,
}

impl EntityPool {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
        }
    }

    /// Add a visible entity (layout time only)
    pub(crate) fn spawn(&mut self, kind: EntityKind, pos: DVec3) -> EntityHandle {
        let handle = EntityHandle(self.entities.len() as u32);
        self.entities.push(Entity {
            kind,
            pos,
            visible: true,
        });
        handle
    }

    /// Look up a handle, failing for handles this arena never issued
    pub fn try_get(&self, handle: EntityHandle) -> Result<&Entity, SimError> {
        self.entities
            .get(handle.index())
            .ok_or(SimError::UnknownHandle(handle.raw()))
    }

    /// Look up a handle issued by this arena
    ///
    /// Panics on a foreign handle: that is a wiring bug, and silently
    /// skipping the entity would skip its collision checks.
    #[inline]
    pub fn get(&self, handle: EntityHandle) -> &Entity {
        &self.entities[handle.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, handle: EntityHandle) -> &mut Entity {
        &mut self.entities[handle.index()]
    }

    /// All entities in handle order
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityHandle(i as u32), e))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut Entity)> {
        self.entities
            .iter_mut()
            .enumerate()
            .map(|(i, e)| (EntityHandle(i as u32), e))
    }

    /// Handles of every entity of `kind`, in handle order
    pub fn handles_of(&self, kind: EntityKind) -> Vec<EntityHandle> {
        self.iter()
            .filter(|(_, e)| e.kind == kind)
            .map(|(h, _)| h)
            .collect()
    }

    /// Number of entities of `kind`
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
