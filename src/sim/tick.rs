//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Each tick
//! runs motion, then collision against the post-move positions, then
//! applies the resulting events to the state machine.

use super::collision;
use super::machine::GameStatus;
use super::motion;
use super::state::GameState;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steer left held
    pub steer_left: bool,
    /// Steer right held
    pub steer_right: bool,
    /// Restart after game over (ignored otherwise)
    pub restart: bool,
    /// Hard reset from any status
    pub force_restart: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Drop one-shot commands after they have been consumed
    pub fn clear_one_shots(&mut self) {
        self.restart = false;
        self.force_restart = false;
        self.pause = false;
    }
}

/// Advance the game state by one fixed step
pub fn tick(state: &mut GameState, input: &TickInput) {
    // A restart tick only resets; the fresh layout is what gets shown
    if (input.restart || input.force_restart) && state.restart(input.force_restart) {
        return;
    }

    // Handle pause toggle
    if input.pause && state.status() != GameStatus::GameOver {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }

    // Frozen: the last frame stays on screen, nothing moves or scores
    if state.paused || state.status() == GameStatus::GameOver {
        return;
    }

    state.time_ticks += 1;
    state.world.player.steer_left = input.steer_left;
    state.world.player.steer_right = input.steer_right;

    let car = state.car_geometry();
    motion::step(&mut state.world, &state.config, &car, &mut state.rng);
    collision::check(&state.world, &state.config, &car, &mut state.events);
    let collected = state.machine.apply(&state.events);
    motion::hide_collected(&mut state.world, &collected);
}

/// Turns variable frame time into a bounded number of fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    accumulator: f64,
    step: f64,
    max_substeps: u32,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStepClock {
    /// A non-positive or non-finite `step` falls back to [`SIM_DT`]
    pub fn new(step: f64, max_substeps: u32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("Invalid fixed step {}, using {}", step, SIM_DT);
            SIM_DT
        };
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Add a frame's elapsed time and return how many ticks to run
    ///
    /// Backlog beyond `max_substeps` is dropped so a stalled frame cannot
    /// snowball into ever longer catch-up frames.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator %= self.step;
        }
        substeps
    }

    /// Fraction of a step left in the accumulator (for render interpolation)
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }
}

/// Run all ticks owed for one frame, consuming one-shot inputs once
pub fn run_frame(
    state: &mut GameState,
    input: &mut TickInput,
    clock: &mut FixedStepClock,
    frame_dt: f64,
) -> u32 {
    let substeps = clock.advance(frame_dt);
    for _ in 0..substeps {
        tick(state, input);
        input.clear_one_shots();
    }
    substeps
}
