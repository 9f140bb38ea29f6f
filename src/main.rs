//! Lane Racer entry point
//!
//! Headless native driver: loads the config, starts a background asset
//! loader, and lets the autopilot play one run at a fixed frame rate.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::thread::{self, JoinHandle};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use crossbeam_channel::Sender;
    use glam::DVec3;

    use lane_racer::autopilot;
    use lane_racer::sim::{
        CarGeometry, CollisionEvent, FixedStepClock, GameState, GameStatus, Snapshot, TickInput,
        run_frame,
    };
    use lane_racer::{AssetEvent, AssetTracker, GameConfig};

    /// Frame time the headless loop pretends to render at
    const FRAME_DT: f64 = 1.0 / 60.0;
    /// Give up after this many frames (ten minutes of play)
    const MAX_FRAMES: u64 = 36_000;
    /// Simulated asset list
    const ASSETS: [&str; 3] = ["car.glb", "enemy.glb", "skybox.hdr"];

    /// Why a session could not be started
    #[derive(Debug, thiserror::Error)]
    enum StartError {
        #[error(transparent)]
        Config(#[from] lane_racer::ConfigError),
        #[error("failed to spawn asset loader thread: {0}")]
        Loader(std::io::Error),
    }

    /// A running game plus the loader feeding it
    struct Session {
        state: GameState,
        tracker: AssetTracker,
        loader: Option<JoinHandle<()>>,
    }

    impl Session {
        fn start(config: GameConfig) -> Result<Self, StartError> {
            let seed = if config.seed == 0 {
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(1)
            } else {
                config.seed
            };
            log::info!("Seed {}", seed);

            let state = GameState::new(config, seed)?;
            let (tx, tracker) = AssetTracker::channel();
            let loader = thread::Builder::new()
                .name("asset-loader".into())
                .spawn(move || load_assets(tx))
                .map_err(StartError::Loader)?;

            Ok(Self {
                state,
                tracker,
                loader: Some(loader),
            })
        }

        /// Play until the car crashes or the frame cap runs out
        fn run(&mut self) -> Result<(), lane_racer::SimError> {
            let mut clock = FixedStepClock::default();
            let mut input = TickInput::default();

            for frame in 0..MAX_FRAMES {
                if self.state.status() == GameStatus::Loading {
                    self.state.poll_assets(&mut self.tracker)?;
                    if self.state.status() == GameStatus::Loading {
                        // Nothing to drive yet
                        thread::sleep(Duration::from_millis(1));
                        continue;
                    }
                }

                let snapshot = Snapshot::capture(&self.state);
                let steering = autopilot::steer(&snapshot, &self.state.config);
                input.steer_left = steering.steer_left;
                input.steer_right = steering.steer_right;

                run_frame(&mut self.state, &mut input, &mut clock, FRAME_DT);
                for event in self.state.last_events() {
                    if let CollisionEvent::PickupCollected { index, .. } = event {
                        log::trace!("Pickup {} collected, score {}", index, self.state.score());
                    }
                }

                if self.state.status() == GameStatus::GameOver {
                    log::info!("Crashed after {} frames", frame);
                    break;
                }
            }
            Ok(())
        }
    }

    impl Drop for Session {
        fn drop(&mut self) {
            if let Some(handle) = self.loader.take() {
                if handle.join().is_err() {
                    log::warn!("Asset loader thread panicked");
                }
            }
        }
    }

    fn load_assets(tx: Sender<AssetEvent>) {
        let total = ASSETS.len() as u32;
        for (i, asset) in ASSETS.iter().enumerate() {
            thread::sleep(Duration::from_millis(5));
            log::debug!("Loaded {}", asset);
            let sent = tx.send(AssetEvent::Progress {
                loaded: i as u32 + 1,
                total,
            });
            if sent.is_err() {
                // Session went away mid-load
                return;
            }
        }

        let car = CarGeometry::new(DVec3::new(0.9, 0.55, 2.0)).ok();
        let _ = tx.send(AssetEvent::Ready { car });
    }

    pub fn main() {
        env_logger::init();
        log::info!("Lane Racer (headless) starting...");

        let config = match std::env::args().nth(1) {
            Some(path) => match GameConfig::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Failed to load config {}: {}", path, e);
                    std::process::exit(1);
                }
            },
            None => GameConfig::default(),
        };

        let mut session = match Session::start(config) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Failed to start: {}", e);
                std::process::exit(1);
            }
        };

        if let Err(e) = session.run() {
            log::error!("Simulation error: {}", e);
            drop(session);
            std::process::exit(1);
        }

        let snapshot = Snapshot::capture(&session.state);
        println!("Final score: {}", snapshot.score);
        match serde_json::to_string_pretty(&Summary::from(&snapshot)) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Failed to serialize summary: {}", e),
        }
    }

    #[derive(serde::Serialize)]
    struct Summary {
        status: GameStatus,
        score: u64,
        ticks: u64,
        player_x: f64,
    }

    impl From<&Snapshot> for Summary {
        fn from(snapshot: &Snapshot) -> Self {
            Self {
                status: snapshot.status,
                score: snapshot.score,
                ticks: snapshot.tick,
                player_x: snapshot.player().map_or(0.0, |p| p.position.x),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the host page
}
