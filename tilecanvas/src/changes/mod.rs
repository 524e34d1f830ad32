//! Dirty-tile tracking bucketed by minute.
//!
//! When pixels are drawn, the tiles they fall in are recorded as changed so
//! the precache pipeline knows what to re-render. Records are keyed by
//! `(canvas, tile origin, side)` and carry only the most recent change
//! timestamp; the tracker-and-precache flow runs once per minute bucket,
//! with [`minute_range`] defining the canonical bucket bounds.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::{Area, Point};
use crate::tiling::tiles_of;
use crate::BoxFuture;

/// The canonical minute bucket containing the given instant.
///
/// Returns `[floor(at, 1m), floor(at, 1m) + 1m)`. Two calls within the same
/// minute select the identical bucket, so repeated precache runs in one
/// minute see the same window.
pub fn minute_range(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let sub_minute = Duration::seconds(at.timestamp().rem_euclid(60))
        + Duration::nanoseconds(i64::from(at.timestamp_subsec_nanos()));
    let from = at - sub_minute;
    (from, from + Duration::minutes(1))
}

/// A record that a tile-aligned region needs re-rendering.
///
/// Uniquely keyed by `(canvas_id, origin, side)`; upserts bump
/// `last_changed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileChange {
    pub canvas_id: i64,
    pub origin: Point,
    pub side: i64,
    pub last_changed_at: DateTime<Utc>,
}

impl TileChange {
    /// The tile-aligned area this record refers to.
    pub fn area(&self) -> Area {
        Area::square(self.origin, self.side)
    }
}

/// Errors from a change tracker backend.
#[derive(Debug, Error)]
pub enum ChangeTrackerError {
    /// The backing store failed while executing the named operation.
    #[error("change tracker failed during {op}: {message}")]
    Backend { op: &'static str, message: String },
}

impl ChangeTrackerError {
    /// Wrap a backend failure with operation context.
    pub fn backend(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            op,
            message: err.to_string(),
        }
    }
}

/// Tracks which tiles changed in a given time window.
///
/// Implementations must be `Send + Sync`. Query results are deduplicated and
/// sorted by the canonical [`Area`] order so output is stable across runs.
pub trait ChangeTracker: Send + Sync {
    /// Record that the tiles containing the given points changed at `at`.
    ///
    /// Each point is quantized to its tile; one record per distinct tile is
    /// upserted with `last_changed_at = at`.
    fn mark_changed<'a>(
        &'a self,
        canvas_id: i64,
        side: i64,
        points: &'a [Point],
        at: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<(), ChangeTrackerError>>;

    /// Tiles changed within `[from, to)`, grouped by canvas.
    ///
    /// Pass `None` to query all canvases. Areas are reconstructed from the
    /// stored origin and side.
    fn find_changed_between(
        &self,
        canvas_id: Option<i64>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<BTreeMap<i64, Vec<Area>>, ChangeTrackerError>>;

    /// Remove the records whose tile origins match the given areas exactly.
    ///
    /// Called once a precache pass has rebuilt those tiles, so repeated runs
    /// over the same minute do not reprocess them.
    fn delete_changed<'a>(
        &'a self,
        canvas_id: i64,
        side: i64,
        areas: &'a [Area],
    ) -> BoxFuture<'a, Result<(), ChangeTrackerError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ChangeKey {
    canvas_id: i64,
    x: i64,
    y: i64,
    side: i64,
}

impl ChangeKey {
    fn for_area(canvas_id: i64, side: i64, area: &Area) -> Self {
        Self {
            canvas_id,
            x: area.min().x,
            y: area.min().y,
            side,
        }
    }
}

/// In-memory change tracker over a concurrent map.
///
/// The test double and single-process implementation; a SQL-backed tracker
/// plugs in behind the same trait.
#[derive(Debug, Default)]
pub struct MemoryChangeTracker {
    entries: DashMap<ChangeKey, DateTime<Utc>>,
}

impl MemoryChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked dirty tiles across all canvases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ChangeTracker for MemoryChangeTracker {
    fn mark_changed<'a>(
        &'a self,
        canvas_id: i64,
        side: i64,
        points: &'a [Point],
        at: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<(), ChangeTrackerError>> {
        Box::pin(async move {
            for tile in tiles_of(points, side) {
                self.entries
                    .insert(ChangeKey::for_area(canvas_id, side, &tile), at);
            }
            Ok(())
        })
    }

    fn find_changed_between(
        &self,
        canvas_id: Option<i64>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<BTreeMap<i64, Vec<Area>>, ChangeTrackerError>> {
        // Tolerate reversed bounds the way the range is usually built.
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        Box::pin(async move {
            let mut grouped: BTreeMap<i64, BTreeSet<Area>> = BTreeMap::new();
            for entry in self.entries.iter() {
                let key = entry.key();
                let changed_at = *entry.value();
                if canvas_id.is_some_and(|id| id != key.canvas_id) {
                    continue;
                }
                if changed_at < from || changed_at >= to {
                    continue;
                }
                grouped
                    .entry(key.canvas_id)
                    .or_default()
                    .insert(Area::square(Point::new(key.x, key.y), key.side));
            }
            Ok(grouped
                .into_iter()
                .map(|(canvas, areas)| (canvas, areas.into_iter().collect()))
                .collect())
        })
    }

    fn delete_changed<'a>(
        &'a self,
        canvas_id: i64,
        side: i64,
        areas: &'a [Area],
    ) -> BoxFuture<'a, Result<(), ChangeTrackerError>> {
        Box::pin(async move {
            for area in areas {
                self.entries.remove(&ChangeKey::for_area(canvas_id, side, area));
            }
            Ok(())
        })
    }
}
