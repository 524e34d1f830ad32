//! Pixels and RGBA colors.
//!
//! The canvas stores one [`Rgba`] color per drawn coordinate. Conversions to
//! and from [`image::Rgba`] keep the rasterization path lossless.

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, the background of rendered tiles.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<Rgba> for image::Rgba<u8> {
    fn from(c: Rgba) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

impl From<image::Rgba<u8>> for Rgba {
    fn from(c: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = c.0;
        Rgba::new(r, g, b, a)
    }
}

/// A drawn pixel: a canvas coordinate and its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub point: Point,
    pub color: Rgba,
}

impl Pixel {
    /// Create a pixel at the given coordinates.
    pub const fn new(x: i64, y: i64, color: Rgba) -> Self {
        Self {
            point: Point::new(x, y),
            color,
        }
    }

    /// Create a pixel at the given point.
    pub const fn at(point: Point, color: Rgba) -> Self {
        Self { point, color }
    }
}
