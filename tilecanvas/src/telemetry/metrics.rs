//! Atomic counters for precache pipeline activity.

use std::sync::atomic::{AtomicU64, Ordering};

use super::TelemetrySnapshot;

/// Counters recorded by the precache pipeline.
///
/// All counters are monotonic over the life of the process. Cycle stages
/// record into these with relaxed ordering; exact cross-counter consistency
/// in a snapshot is not guaranteed and not needed.
#[derive(Debug, Default)]
pub struct PrecacheMetrics {
    cycles_started: AtomicU64,
    cycles_completed: AtomicU64,
    tiles_rebuilt: AtomicU64,
    tile_failures: AtomicU64,
    pixels_rendered: AtomicU64,
}

impl PrecacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A precache cycle began.
    pub fn cycle_started(&self) {
        self.cycles_started.fetch_add(1, Ordering::Relaxed);
    }

    /// A precache cycle ran to the end (even with per-tile failures).
    pub fn cycle_completed(&self) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// A tile was rendered and cached, with the number of drawn pixels it
    /// contained.
    pub fn tile_rebuilt(&self, pixels: u64) {
        self.tiles_rebuilt.fetch_add(1, Ordering::Relaxed);
        self.pixels_rendered.fetch_add(pixels, Ordering::Relaxed);
    }

    /// A tile rebuild failed and was left dirty for the next cycle.
    pub fn tile_failed(&self) {
        self.tile_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A point-in-time copy of all counters.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            cycles_started: self.cycles_started.load(Ordering::Relaxed),
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            tiles_rebuilt: self.tiles_rebuilt.load(Ordering::Relaxed),
            tile_failures: self.tile_failures.load(Ordering::Relaxed),
            pixels_rendered: self.pixels_rendered.load(Ordering::Relaxed),
        }
    }
}
