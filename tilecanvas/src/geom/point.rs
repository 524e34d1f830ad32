//! Integer points on the canvas plane.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point on the canvas plane.
///
/// Coordinates are unbounded signed integers; the canvas has no edges, so
/// negative coordinates are as valid as positive ones. `Point` is an
/// immutable value type: all arithmetic returns a new point.
///
/// The derived ordering (x, then y) gives points a deterministic total order
/// used wherever point lists must be stable across runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// Shorthand for [`Point::new`].
pub const fn pt(x: i64, y: i64) -> Point {
    Point::new(x, y)
}

impl Point {
    /// The canvas origin, `(0, 0)`.
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    /// Create a new point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Move the point by the given deltas.
    pub fn translate(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether this point is the canvas origin.
    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<i64> for Point {
    type Output = Point;

    /// Scale both coordinates by a scalar.
    fn mul(self, scalar: i64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let p = pt(10, -20).translate(-5, 25);
        assert_eq!(p, pt(5, 5));
    }

    #[test]
    fn test_add_and_sub() {
        assert_eq!(pt(1, 2) + pt(3, 4), pt(4, 6));
        assert_eq!(pt(1, 2) - pt(3, 4), pt(-2, -2));
    }

    #[test]
    fn test_scale() {
        assert_eq!(pt(3, -4) * 2, pt(6, -8));
        assert_eq!(pt(3, -4) * 0, Point::ORIGIN);
    }

    #[test]
    fn test_distance_to() {
        assert_eq!(pt(0, 0).distance_to(pt(3, 4)), 5.0);
        assert_eq!(pt(-3, -4).distance_to(pt(0, 0)), 5.0);
        assert_eq!(pt(7, 7).distance_to(pt(7, 7)), 0.0);
    }

    #[test]
    fn test_is_origin() {
        assert!(pt(0, 0).is_origin());
        assert!(!pt(0, 1).is_origin());
    }

    #[test]
    fn test_display() {
        assert_eq!(pt(-50, 1024).to_string(), "(-50,1024)");
    }

    #[test]
    fn test_ordering_is_x_then_y() {
        let mut points = vec![pt(1, 0), pt(0, 5), pt(0, -5), pt(-1, 100)];
        points.sort();
        assert_eq!(points, vec![pt(-1, 100), pt(0, -5), pt(0, 5), pt(1, 0)]);
    }
}
