//! Game status and scoring
//!
//! The state machine is the only owner of the score and the status.
//! `Loading → Playing` on asset readiness, `Playing → GameOver` on the
//! first enemy collision, `GameOver → Playing` only through restart.

use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::pool::EntityHandle;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the asset loader
    Loading,
    /// Active gameplay
    Playing,
    /// Run ended; frozen until restart
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameStateMachine {
    status: GameStatus,
    score: u64,
    point_value: u64,
}

impl GameStateMachine {
    pub fn new(point_value: u64) -> Self {
        Self {
            status: GameStatus::Loading,
            score: 0,
            point_value,
        }
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Asset loader finished (successfully or not)
    ///
    /// Returns true if this caused the `Loading → Playing` transition.
    pub fn on_assets_ready(&mut self) -> bool {
        if self.status == GameStatus::Loading {
            self.status = GameStatus::Playing;
            log::info!("Assets ready, starting run");
            true
        } else {
            false
        }
    }

    /// Consume this tick's collision events in order
    ///
    /// Returns the pickups whose collection was credited; the caller hides
    /// them. Events outside `Playing`, and any event after the crash in the
    /// same batch, are ignored.
    pub fn apply(&mut self, events: &[CollisionEvent]) -> Vec<EntityHandle> {
        let mut collected = Vec::new();
        for event in events {
            if self.status != GameStatus::Playing {
                break;
            }
            match *event {
                CollisionEvent::PickupCollected { handle, .. } => {
                    self.score = self.score.saturating_add(self.point_value);
                    collected.push(handle);
                }
                CollisionEvent::EnemyCollision { enemy } => {
                    self.status = GameStatus::GameOver;
                    log::info!("Crashed into enemy {} - game over, score {}", enemy, self.score);
                }
            }
        }
        collected
    }

    /// Reset score and status
    ///
    /// Only honoured from `GameOver` unless forced. A forced restart while
    /// still loading stays in `Loading`.
    pub fn restart(&mut self, force: bool) -> bool {
        if self.status != GameStatus::GameOver && !force {
            return false;
        }
        self.score = 0;
        if self.status != GameStatus::Loading {
            self.status = GameStatus::Playing;
        }
        true
    }
}
