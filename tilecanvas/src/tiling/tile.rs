//! In-memory tile construction and rasterization.

use image::RgbaImage;

use crate::geom::Area;
use crate::pixel::Pixel;

/// A tile-aligned region of the canvas and the pixels drawn inside it.
///
/// A `Tile` is the in-memory staging form used when rebuilding a cached tile
/// image: pixels are accumulated in canvas coordinates and rasterized to
/// local offsets by [`Tile::to_image`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    area: Area,
    pixels: Vec<Pixel>,
}

impl Tile {
    /// Create an empty tile covering the given area.
    pub fn new(area: Area) -> Self {
        Self {
            area,
            pixels: Vec::new(),
        }
    }

    /// The area this tile covers.
    pub fn area(&self) -> Area {
        self.area
    }

    /// The pixels accumulated so far, in insertion order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Whether the tile covers a square area.
    pub fn is_square(&self) -> bool {
        self.area.is_square()
    }

    /// Add a single pixel.
    pub fn push(&mut self, pixel: Pixel) {
        self.pixels.push(pixel);
    }

    /// Add a batch of pixels.
    pub fn extend(&mut self, pixels: impl IntoIterator<Item = Pixel>) {
        self.pixels.extend(pixels);
    }

    /// Rasterize the tile to an RGBA image.
    ///
    /// Each pixel lands at its local offset (`point - area.min()`); pixels
    /// outside the tile's extent are skipped. Untouched positions keep the
    /// transparent-black background. When the same coordinate was drawn more
    /// than once, the later pixel wins.
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.area.width() as u32, self.area.height() as u32);
        for pixel in &self.pixels {
            if !self.area.contains_point(pixel.point) {
                continue;
            }
            let local = pixel.point - Area::min(&self.area);
            img.put_pixel(local.x as u32, local.y as u32, pixel.color.into());
        }
        img
    }
}
