//! Coordinate algebra for the canvas plane.
//!
//! Provides [`Point`], an unbounded integer coordinate pair, and [`Area`],
//! a canonical axis-aligned rectangle with an exclusive upper bound. All tile
//! addressing, lease queries, and cache keys are expressed in these types.

mod area;
mod point;

pub use area::Area;
pub use point::{pt, Point};
