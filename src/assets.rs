//! Asset loading status
//!
//! The loader runs elsewhere (another thread, the browser, a test) and
//! reports through a channel. The simulation owns the receiving
//! [`AssetTracker`] and polls it once per frame, so control flow in the
//! core stays linear.

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::sim::CarGeometry;

/// Message from the asset loader
#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    /// `loaded` of `total` items finished
    Progress { loaded: u32, total: u32 },
    /// Everything loaded; car extents if the model reported them
    Ready { car: Option<CarGeometry> },
    /// Loading gave up on an asset; terminal
    Failed { asset: String, reason: String },
}

/// Loading state as seen by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed,
}

/// Receiving end of the loader channel plus the last known status
#[derive(Debug)]
pub struct AssetTracker {
    rx: Receiver<AssetEvent>,
    status: AssetStatus,
    progress: u8,
    car: Option<CarGeometry>,
}

impl AssetTracker {
    /// Create a loader sender and the tracker that observes it
    pub fn channel() -> (Sender<AssetEvent>, Self) {
        let (tx, rx) = unbounded();
        (tx, Self::new(rx))
    }

    pub fn new(rx: Receiver<AssetEvent>) -> Self {
        Self {
            rx,
            status: AssetStatus::Pending,
            progress: 0,
            car: None,
        }
    }

    /// Drain pending loader messages and return the resulting status
    ///
    /// Messages after a terminal event are ignored. A loader that hangs up
    /// without a terminal event counts as failed.
    pub fn poll(&mut self) -> AssetStatus {
        while self.status == AssetStatus::Pending {
            match self.rx.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Asset loader disconnected before finishing");
                    self.status = AssetStatus::Failed;
                }
            }
        }
        self.status
    }

    fn apply(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::Progress { loaded, total } => {
                let percent = if total == 0 {
                    0
                } else {
                    ((loaded.min(total) as f64 / total as f64) * 100.0).round() as u8
                };
                self.progress = self.progress.max(percent);
                log::debug!("Loading {}/{} ({}%)", loaded, total, self.progress);
            }
            AssetEvent::Ready { car } => {
                self.car = car;
                self.progress = 100;
                self.status = AssetStatus::Ready;
                log::info!("Assets loaded");
            }
            AssetEvent::Failed { asset, reason } => {
                self.progress = 100;
                self.status = AssetStatus::Failed;
                log::warn!("Failed to load {}: {}", asset, reason);
            }
        }
    }

    #[inline]
    pub fn status(&self) -> AssetStatus {
        self.status
    }

    /// Loading progress 0..=100, never decreasing
    #[inline]
    pub fn progress_percent(&self) -> u8 {
        self.progress
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status != AssetStatus::Pending
    }

    /// Car extents reported with `Ready`, if any
    #[inline]
    pub fn car_geometry(&self) -> Option<CarGeometry> {
        self.car
    }
}
