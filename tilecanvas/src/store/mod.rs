//! Pixel persistence: the collaborator interface to the authoritative store.
//!
//! The pixel store is the source of truth for the canvas; cached tile images
//! are always a pure function of its contents. The real backend is a
//! relational database reached through this trait; [`MemoryPixelStore`]
//! backs tests and single-process deployments.

use dashmap::DashMap;
use thiserror::Error;

use crate::geom::{Area, Point};
use crate::pixel::{Pixel, Rgba};
use crate::BoxFuture;

/// Errors from a pixel store backend.
#[derive(Debug, Error)]
pub enum PixelStoreError {
    /// The backing store failed while executing the named operation.
    #[error("pixel store failed during {op}: {message}")]
    Backend { op: &'static str, message: String },
}

impl PixelStoreError {
    /// Wrap a backend failure with operation context.
    pub fn backend(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            op,
            message: err.to_string(),
        }
    }
}

/// The authoritative pixel store.
///
/// An area with no drawn pixels yields an empty result, not an error; the
/// precache pipeline renders it as an empty tile.
pub trait PixelStore: Send + Sync {
    /// The drawn pixels inside the given area, in deterministic point order.
    fn pixels_in_area(
        &self,
        canvas_id: i64,
        area: Area,
    ) -> BoxFuture<'_, Result<Vec<Pixel>, PixelStoreError>>;

    /// Upsert a batch of pixels; redrawing a coordinate replaces its color.
    fn draw_pixels<'a>(
        &'a self,
        canvas_id: i64,
        pixels: &'a [Pixel],
    ) -> BoxFuture<'a, Result<(), PixelStoreError>>;

    /// Remove a drawn pixel. Erasing an absent pixel is not an error.
    fn erase_pixel(
        &self,
        canvas_id: i64,
        point: Point,
    ) -> BoxFuture<'_, Result<(), PixelStoreError>>;
}

/// In-memory pixel store over a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryPixelStore {
    pixels: DashMap<(i64, Point), Rgba>,
}

impl MemoryPixelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drawn pixels across all canvases.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl PixelStore for MemoryPixelStore {
    fn pixels_in_area(
        &self,
        canvas_id: i64,
        area: Area,
    ) -> BoxFuture<'_, Result<Vec<Pixel>, PixelStoreError>> {
        Box::pin(async move {
            let mut found: Vec<Pixel> = self
                .pixels
                .iter()
                .filter(|entry| {
                    let (canvas, point) = *entry.key();
                    canvas == canvas_id && area.contains_point(point)
                })
                .map(|entry| Pixel::at(entry.key().1, *entry.value()))
                .collect();
            found.sort_by_key(|pixel| pixel.point);
            Ok(found)
        })
    }

    fn draw_pixels<'a>(
        &'a self,
        canvas_id: i64,
        pixels: &'a [Pixel],
    ) -> BoxFuture<'a, Result<(), PixelStoreError>> {
        Box::pin(async move {
            for pixel in pixels {
                self.pixels.insert((canvas_id, pixel.point), pixel.color);
            }
            Ok(())
        })
    }

    fn erase_pixel(
        &self,
        canvas_id: i64,
        point: Point,
    ) -> BoxFuture<'_, Result<(), PixelStoreError>> {
        Box::pin(async move {
            self.pixels.remove(&(canvas_id, point));
            Ok(())
        })
    }
}
