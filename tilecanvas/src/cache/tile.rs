//! Tile cache client.
//!
//! This client wraps a generic [`ObjectStore`] with:
//! - Key translation: `(canvas_id, area)` → `"{canvas}/{min_x}_{min_y}_{side}.png"`
//! - Tile validation: only square tiles whose image matches the area extent
//! - PNG encoding/decoding of the tile image
//!
//! # Key Format
//!
//! Keys use the tile's minimum corner and side length for debuggability.
//! Example: `1/-1024_0_1024.png` is the side-1024 tile of canvas 1 whose
//! minimum corner is (-1024, 0).

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::traits::{ObjectStore, ObjectStoreError};
use crate::geom::Area;

/// Errors from tile cache operations.
#[derive(Debug, Error)]
pub enum TileCacheError {
    /// Only square tile areas are cacheable.
    #[error("tile area {area} is not square")]
    NotSquare { area: Area },

    /// The image dimensions do not match the tile area.
    #[error("image is {width}x{height} but tile area {area} is {side}x{side}")]
    ExtentMismatch {
        area: Area,
        side: i64,
        width: u32,
        height: u32,
    },

    /// PNG encoding failed.
    #[error("failed to encode tile {area} as PNG: {source}")]
    Encode {
        area: Area,
        source: image::ImageError,
    },

    /// The cached bytes are not a decodable PNG.
    #[error("failed to decode cached tile {area}: {source}")]
    Decode {
        area: Area,
        source: image::ImageError,
    },

    /// The underlying object store failed.
    #[error(transparent)]
    Store(#[from] ObjectStoreError),
}

/// Cache client for rendered tile images.
///
/// Translates tile areas to object keys and round-trips images through PNG.
/// The cache is strictly derived state: a miss means the caller renders from
/// the pixel store, and corruption is at worst a stale or rebuilt tile.
pub struct TileCache {
    store: Arc<dyn ObjectStore>,
}

impl TileCache {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// The object key for a tile.
    ///
    /// Equal areas on the same canvas always yield the same key, so repeated
    /// renders of a tile overwrite each other rather than accumulating.
    pub fn object_key(canvas_id: i64, area: &Area) -> String {
        format!(
            "{}/{}_{}_{}.png",
            canvas_id,
            area.min().x,
            area.min().y,
            area.width()
        )
    }

    /// Encode and store a rendered tile.
    ///
    /// Rejects non-square areas and images whose dimensions do not match the
    /// area, before anything reaches the store.
    pub async fn put_tile(
        &self,
        canvas_id: i64,
        area: Area,
        image: &RgbaImage,
    ) -> Result<(), TileCacheError> {
        if !area.is_square() {
            return Err(TileCacheError::NotSquare { area });
        }
        let side = area.width();
        if i64::from(image.width()) != side || i64::from(image.height()) != side {
            return Err(TileCacheError::ExtentMismatch {
                area,
                side,
                width: image.width(),
                height: image.height(),
            });
        }

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|source| TileCacheError::Encode { area, source })?;

        let key = Self::object_key(canvas_id, &area);
        debug!(canvas_id, %area, key, bytes = bytes.len(), "caching tile");
        self.store.put(&key, bytes).await?;
        Ok(())
    }

    /// Fetch and decode a cached tile, `Ok(None)` on a miss.
    pub async fn get_tile(
        &self,
        canvas_id: i64,
        area: Area,
    ) -> Result<Option<RgbaImage>, TileCacheError> {
        let key = Self::object_key(canvas_id, &area);
        let Some(bytes) = self.store.get(&key).await? else {
            return Ok(None);
        };

        let image = image::load_from_memory(&bytes)
            .map_err(|source| TileCacheError::Decode { area, source })?
            .into_rgba8();
        Ok(Some(image))
    }

    /// Drop a cached tile. Returns whether it was present.
    pub async fn delete_tile(&self, canvas_id: i64, area: Area) -> Result<bool, TileCacheError> {
        let key = Self::object_key(canvas_id, &area);
        let existed = self.store.delete(&key).await?;
        if !existed {
            warn!(canvas_id, %area, key, "deleted tile was not cached");
        }
        Ok(existed)
    }

    /// Whether a tile is cached, without fetching it.
    pub async fn contains_tile(&self, canvas_id: i64, area: Area) -> Result<bool, TileCacheError> {
        let key = Self::object_key(canvas_id, &area);
        Ok(self.store.contains(&key).await?)
    }
}
