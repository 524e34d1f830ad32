//! Tile addressing: quantizing canvas points to fixed-side square tiles.
//!
//! The canvas is carved into square tiles of a configurable side length.
//! A tile is addressed by its origin, the multiple of `side` at or below the
//! point on each axis. Quantization uses floor division, not truncation, so
//! negative coordinates map to the tile below/left of zero instead of
//! wrapping toward it: with `side = 1024`, `x = -50` belongs to the tile with
//! origin `-1024`.

mod tile;

pub use tile::Tile;

use std::collections::BTreeSet;

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::geom::{Area, Point};

/// Point counts at or above this are quantized in parallel.
///
/// Below it the rayon fan-out costs more than the division it saves.
const PARALLEL_THRESHOLD: usize = 4096;

/// The square tile containing the given point.
///
/// The returned area spans `[origin, origin + side)` on both axes, with the
/// origin quantized by floor division so every point, negative coordinates
/// included, falls inside exactly one tile.
///
/// # Panics
///
/// Panics if `side` is not positive.
pub fn tile_of(point: Point, side: i64) -> Area {
    assert!(side > 0, "tile side must be positive, got {side}");
    let origin = Point::new(
        point.x.div_euclid(side) * side,
        point.y.div_euclid(side) * side,
    );
    Area::square(origin, side)
}

/// The deduplicated, sorted set of tiles covering the given points.
///
/// Output is sorted by the canonical [`Area`] order and contains no
/// duplicates, and is identical regardless of input order or whether the
/// internal parallel path was taken.
///
/// # Panics
///
/// Panics if `side` is not positive.
pub fn tiles_of(points: &[Point], side: i64) -> Vec<Area> {
    assert!(side > 0, "tile side must be positive, got {side}");
    if points.len() >= PARALLEL_THRESHOLD {
        tiles_of_parallel(points, side)
    } else {
        let tiles: BTreeSet<Area> = points.iter().map(|p| tile_of(*p, side)).collect();
        tiles.into_iter().collect()
    }
}

/// Parallel quantization feeding a shared ordered set.
///
/// The mutex-guarded `BTreeSet` absorbs the nondeterministic arrival order,
/// so the visible result matches the serial algorithm exactly.
fn tiles_of_parallel(points: &[Point], side: i64) -> Vec<Area> {
    let tiles = Mutex::new(BTreeSet::new());
    points.par_iter().for_each(|p| {
        let tile = tile_of(*p, side);
        tiles.lock().insert(tile);
    });
    tiles.into_inner().into_iter().collect()
}
