//! Point-in-time telemetry snapshots.

/// A copy of all precache counters at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// Cycles that began.
    pub cycles_started: u64,
    /// Cycles that ran to the end.
    pub cycles_completed: u64,
    /// Tiles rendered and cached.
    pub tiles_rebuilt: u64,
    /// Tile rebuilds that failed.
    pub tile_failures: u64,
    /// Drawn pixels placed into rebuilt tiles.
    pub pixels_rendered: u64,
}

impl TelemetrySnapshot {
    /// Fraction of attempted rebuilds that succeeded, `None` before any
    /// attempt.
    pub fn success_rate(&self) -> Option<f64> {
        let attempts = self.tiles_rebuilt + self.tile_failures;
        if attempts == 0 {
            return None;
        }
        Some(self.tiles_rebuilt as f64 / attempts as f64)
    }
}
