//! Telemetry for the precache pipeline.
//!
//! Lock-free atomic counters recorded by pipeline stages, copied into a
//! point-in-time snapshot for display or logging. Recording is wait-free and
//! cheap enough to leave enabled in production.
//!
//! ```text
//! Precache cycle ─────► PrecacheMetrics ─────► TelemetrySnapshot
//!                       (atomic counters)     (point-in-time copy)
//! ```

mod metrics;
mod snapshot;

pub use metrics::PrecacheMetrics;
pub use snapshot::TelemetrySnapshot;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Reads the filter from `RUST_LOG`, defaulting to `info` for this crate.
/// Calling it twice is a no-op; the second call reports failure via the
/// return value rather than panicking, so tests can call it freely.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tilecanvas=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
