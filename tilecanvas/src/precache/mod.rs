//! The tile precache pipeline.
//!
//! Each cycle takes the current minute bucket, asks the change tracker which
//! tiles were drawn on inside it, re-renders those tiles from the
//! authoritative pixel store, pushes the images into the tile cache, and
//! drains the successfully rebuilt records from the tracker.
//!
//! ```text
//! ChangeTracker ──► dirty areas ──► PixelStore ──► Tile::to_image ──► TileCache
//!       ▲                                                                │
//!       └────────────── delete_changed (successes only) ◄───────────────┘
//! ```
//!
//! A failed tile stays recorded and is retried on the next cycle; one bad
//! tile never blocks the rest of the pass. Since tracker records upsert by
//! tile, re-running a cycle over the same minute is idempotent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{TileCache, TileCacheError};
use crate::changes::{minute_range, ChangeTracker, ChangeTrackerError};
use crate::geom::Area;
use crate::store::{PixelStore, PixelStoreError};
use crate::telemetry::PrecacheMetrics;
use crate::tiling::Tile;

/// Errors from the precache pipeline.
#[derive(Debug, Error)]
pub enum PrecacheError {
    /// The change tracker failed; the whole cycle is abandoned.
    #[error(transparent)]
    Tracker(#[from] ChangeTrackerError),

    /// Pixels for one tile could not be loaded.
    #[error("failed to load pixels for tile {area}: {source}")]
    Pixels {
        area: Area,
        source: PixelStoreError,
    },

    /// One tile could not be encoded or cached.
    #[error("failed to cache tile {area}: {source}")]
    Cache {
        area: Area,
        source: TileCacheError,
    },

    /// The cycle was cancelled before finishing.
    #[error("precache cycle cancelled")]
    Cancelled,
}

/// A tile that failed to rebuild during a cycle.
#[derive(Debug)]
pub struct TileFailure {
    pub canvas_id: i64,
    pub area: Area,
    pub error: PrecacheError,
}

/// Outcome of one precache cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// Start of the minute bucket the cycle covered.
    pub from: DateTime<Utc>,
    /// End of the minute bucket (exclusive).
    pub to: DateTime<Utc>,
    /// Tiles rendered and cached.
    pub rebuilt: usize,
    /// Tiles left dirty for the next cycle, with their causes.
    pub failures: Vec<TileFailure>,
}

/// Rebuilds changed tiles and keeps the tile cache warm.
pub struct Precacher {
    pixels: Arc<dyn PixelStore>,
    tracker: Arc<dyn ChangeTracker>,
    cache: Arc<TileCache>,
    metrics: Option<Arc<PrecacheMetrics>>,
}

impl Precacher {
    pub fn new(
        pixels: Arc<dyn PixelStore>,
        tracker: Arc<dyn ChangeTracker>,
        cache: Arc<TileCache>,
    ) -> Self {
        Self {
            pixels,
            tracker,
            cache,
            metrics: None,
        }
    }

    /// Attach telemetry counters.
    pub fn with_metrics(mut self, metrics: Arc<PrecacheMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run one cycle for the minute bucket containing the current instant.
    pub async fn run_now(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CycleReport, PrecacheError> {
        self.run_cycle(Utc::now(), cancel).await
    }

    /// Run one cycle for the minute bucket containing `at`.
    ///
    /// Tracker failures and cancellation abort the cycle; per-tile failures
    /// are collected in the report and their records left in the tracker.
    pub async fn run_cycle(
        &self,
        at: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<CycleReport, PrecacheError> {
        if cancel.is_cancelled() {
            return Err(PrecacheError::Cancelled);
        }
        if let Some(metrics) = &self.metrics {
            metrics.cycle_started();
        }

        let (from, to) = minute_range(at);
        let changed = self.tracker.find_changed_between(None, from, to).await?;
        debug!(
            %from,
            %to,
            canvases = changed.len(),
            "starting precache cycle"
        );

        let mut rebuilt = 0usize;
        let mut failures = Vec::new();

        for (canvas_id, areas) in changed {
            if cancel.is_cancelled() {
                return Err(PrecacheError::Cancelled);
            }

            let outcomes = join_all(
                areas
                    .iter()
                    .map(|&area| async move { (area, self.rebuild_tile(canvas_id, area).await) }),
            )
            .await;

            // Drain only the tiles that made it into the cache. Records are
            // keyed per side, so group the successes accordingly.
            let mut succeeded: std::collections::BTreeMap<i64, Vec<Area>> =
                std::collections::BTreeMap::new();
            for (area, outcome) in outcomes {
                match outcome {
                    Ok(pixel_count) => {
                        rebuilt += 1;
                        if let Some(metrics) = &self.metrics {
                            metrics.tile_rebuilt(pixel_count as u64);
                        }
                        succeeded.entry(area.width()).or_default().push(area);
                    }
                    Err(error) => {
                        warn!(canvas_id, %area, %error, "tile rebuild failed, left dirty");
                        if let Some(metrics) = &self.metrics {
                            metrics.tile_failed();
                        }
                        failures.push(TileFailure {
                            canvas_id,
                            area,
                            error,
                        });
                    }
                }
            }

            for (side, areas) in &succeeded {
                self.tracker.delete_changed(canvas_id, *side, areas).await?;
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.cycle_completed();
        }
        info!(rebuilt, failures = failures.len(), "precache cycle finished");
        Ok(CycleReport {
            from,
            to,
            rebuilt,
            failures,
        })
    }

    /// Run cycles at a fixed interval until cancelled.
    ///
    /// Cycle errors other than cancellation are logged and the loop keeps
    /// going; a transient backend failure should not kill the pipeline.
    pub async fn run_every(&self, interval: std::time::Duration, cancel: &CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            match self.run_now(cancel).await {
                Ok(_) => {}
                Err(PrecacheError::Cancelled) => break,
                Err(error) => {
                    tracing::error!(%error, "precache cycle failed");
                }
            }
        }
        debug!("precache loop stopped");
    }

    /// Render one tile from the pixel store and push it into the cache.
    ///
    /// Returns the number of drawn pixels the tile contained.
    async fn rebuild_tile(&self, canvas_id: i64, area: Area) -> Result<usize, PrecacheError> {
        let pixels = self
            .pixels
            .pixels_in_area(canvas_id, area)
            .await
            .map_err(|source| PrecacheError::Pixels { area, source })?;

        let mut tile = Tile::new(area);
        tile.extend(pixels);
        let count = tile.pixels().len();

        let image = tile.to_image();
        self.cache
            .put_tile(canvas_id, area, &image)
            .await
            .map_err(|source| PrecacheError::Cache { area, source })?;

        Ok(count)
    }
}
