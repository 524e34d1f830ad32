//! Canonical axis-aligned rectangles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Point;

/// An axis-aligned rectangle on the canvas plane.
///
/// An `Area` is always canonical: `min.x <= max.x` and `min.y <= max.y`.
/// Constructors restore the invariant by swapping out-of-order coordinates
/// per axis, so the corner fields are private and read through [`Area::min`]
/// and [`Area::max`].
///
/// The upper bound is **exclusive**: an area spans `[min.x, max.x)` by
/// `[min.y, max.y)`, so `width == max.x - min.x` and a tile of side `s`
/// starting at the origin covers pixels `0..s` per axis. This matches the
/// half-open tiling scheme in [`crate::tiling`].
///
/// The derived ordering (`min.x`, `min.y`, `max.x`, `max.y`) gives areas a
/// deterministic total order used for stable output in list-returning
/// queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Area {
    min: Point,
    max: Point,
}

impl Area {
    /// Create an area from two corner points, canonicalizing per axis.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create an area from a corner and a width/height.
    ///
    /// Negative sizes are canonicalized the same way as out-of-order corners.
    pub fn with_size(min: Point, width: i64, height: i64) -> Self {
        Self::new(min, min.translate(width, height))
    }

    /// Create a square area from a corner and a side length.
    pub fn square(min: Point, side: i64) -> Self {
        Self::with_size(min, side, side)
    }

    /// The lower-left corner (inclusive).
    pub fn min(&self) -> Point {
        self.min
    }

    /// The upper-right corner (exclusive).
    pub fn max(&self) -> Point {
        self.max
    }

    /// Width in pixels.
    pub fn width(&self) -> i64 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    /// Total pixel count.
    pub fn surface(&self) -> i64 {
        self.width() * self.height()
    }

    /// Strictly wider than tall. A square is neither landscape nor portrait.
    pub fn is_landscape(&self) -> bool {
        self.width() > self.height()
    }

    /// Strictly taller than wide. A square is neither landscape nor portrait.
    pub fn is_portrait(&self) -> bool {
        self.height() > self.width()
    }

    /// Whether both sides have the same length.
    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// Whether the point lies inside the area (`min <= p < max` per axis).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Whether the other area lies entirely inside this one.
    pub fn contains_area(&self, other: &Area) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Exact rectangle-overlap test.
    ///
    /// True iff the two areas share at least one pixel. Unlike a
    /// corner-containment check, this handles the case where one area fully
    /// contains the other without either corner falling inside the
    /// counterpart.
    pub fn intersects(&self, other: &Area) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// The largest rectangle contained by both areas.
    ///
    /// Returns `None` when the areas are disjoint (the clamped rectangle is
    /// degenerate). This is the source of truth for overlap magnitude;
    /// [`Area::intersects`] is the cheap yes/no form of the same test.
    pub fn intersect(&self, other: &Area) -> Option<Area> {
        let min = Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));
        if min.x < max.x && min.y < max.y {
            Some(Area { min, max })
        } else {
            None
        }
    }

    /// Pixel count of the true intersection, 0 when disjoint.
    pub fn overlapping_pixels(&self, other: &Area) -> i64 {
        self.intersect(other).map_or(0, |overlap| overlap.surface())
    }

    /// Iterate over every point inside the area, column-major, in the
    /// deterministic (x, then y) order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let area = *self;
        (area.min.x..area.max.x)
            .flat_map(move |x| (area.min.y..area.max.y).map(move |y| Point::new(x, y)))
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area[min={}, max={}, {}x{}]",
            self.min,
            self.max,
            self.width(),
            self.height()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::pt;
    use super::*;

    #[test]
    fn test_new_canonicalizes_swapped_corners() {
        let area = Area::new(pt(10, -5), pt(-10, 5));
        assert_eq!(Area::min(&area), pt(-10, -5));
        assert_eq!(Area::max(&area), pt(10, 5));
        assert_eq!(area, Area::new(pt(-10, -5), pt(10, 5)));
    }

    #[test]
    fn test_new_canonicalizes_per_axis() {
        // Only the x coordinates are out of order.
        let area = Area::new(pt(10, 0), pt(0, 10));
        assert_eq!(Area::min(&area), pt(0, 0));
        assert_eq!(Area::max(&area), pt(10, 10));
    }

    #[test]
    fn test_with_size_and_square() {
        assert_eq!(
            Area::with_size(pt(10, 20), 30, 40),
            Area::new(pt(10, 20), pt(40, 60))
        );
        assert_eq!(
            Area::square(pt(-1024, -1024), 1024),
            Area::new(pt(-1024, -1024), pt(0, 0))
        );
        // Negative sizes canonicalize.
        assert_eq!(
            Area::with_size(pt(0, 0), -10, 10),
            Area::new(pt(-10, 0), pt(0, 10))
        );
    }

    #[test]
    fn test_width_height_surface() {
        let area = Area::new(pt(-5, -5), pt(5, 5));
        assert_eq!(area.width(), 10);
        assert_eq!(area.height(), 10);
        assert_eq!(area.surface(), 100);
    }

    #[test]
    fn test_landscape_portrait_square() {
        let landscape = Area::with_size(pt(0, 0), 20, 10);
        let portrait = Area::with_size(pt(0, 0), 10, 20);
        let square = Area::square(pt(0, 0), 10);

        assert!(landscape.is_landscape());
        assert!(!landscape.is_portrait());
        assert!(portrait.is_portrait());
        assert!(!portrait.is_landscape());
        // A square is neither.
        assert!(!square.is_landscape());
        assert!(!square.is_portrait());
        assert!(square.is_square());
    }

    #[test]
    fn test_contains_point_exclusive_upper_bound() {
        let area = Area::new(pt(0, 0), pt(10, 10));
        assert!(area.contains_point(pt(0, 0)));
        assert!(area.contains_point(pt(9, 9)));
        assert!(!area.contains_point(pt(10, 10)));
        assert!(!area.contains_point(pt(10, 0)));
        assert!(!area.contains_point(pt(0, 10)));
        assert!(!area.contains_point(pt(-1, 5)));
    }

    #[test]
    fn test_contains_area() {
        let outer = Area::new(pt(0, 0), pt(100, 100));
        let inner = Area::new(pt(25, 25), pt(75, 75));
        assert!(outer.contains_area(&inner));
        assert!(!inner.contains_area(&outer));
        assert!(outer.contains_area(&outer));
    }

    #[test]
    fn test_intersects_partial_overlap() {
        let a = Area::new(pt(0, 0), pt(10, 10));
        let b = Area::new(pt(5, 5), pt(15, 15));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_intersects_disjoint_and_touching() {
        let a = Area::new(pt(0, 0), pt(10, 10));
        let disjoint = Area::new(pt(20, 20), pt(30, 30));
        assert!(!a.intersects(&disjoint));

        // Sharing only an edge means no shared pixel with exclusive bounds.
        let touching = Area::new(pt(10, 0), pt(20, 10));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_intersects_full_containment() {
        // Neither corner of the outer area falls inside the inner one; the
        // exact test still reports overlap.
        let outer = Area::new(pt(0, 0), pt(100, 100));
        let inner = Area::new(pt(40, 40), pt(60, 60));
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_intersects_cross_configuration() {
        // A wide bar crossing a tall bar: no corner of either is inside the
        // other, yet they overlap in the middle.
        let horizontal = Area::new(pt(-100, -10), pt(100, 10));
        let vertical = Area::new(pt(-10, -100), pt(10, 100));
        assert!(horizontal.intersects(&vertical));
        assert!(vertical.intersects(&horizontal));
    }

    #[test]
    fn test_intersect_disjoint_returns_none() {
        let a = Area::new(pt(0, 0), pt(10, 10));
        let b = Area::new(pt(20, 20), pt(30, 30));
        assert_eq!(a.intersect(&b), None);
        assert_eq!(a.overlapping_pixels(&b), 0);
    }

    #[test]
    fn test_intersect_partial_overlap() {
        let a = Area::new(pt(0, 0), pt(10, 10));
        let b = Area::new(pt(5, 5), pt(15, 15));
        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap, Area::new(pt(5, 5), pt(10, 10)));
        assert_eq!(a.overlapping_pixels(&b), 25);
    }

    #[test]
    fn test_points_count_and_order() {
        let area = Area::new(pt(0, 0), pt(2, 3));
        let points: Vec<_> = area.points().collect();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], pt(0, 0));
        assert_eq!(points[5], pt(1, 2));
        assert!(points.iter().all(|p| area.contains_point(*p)));
    }

    #[test]
    fn test_ordering_is_min_then_max() {
        let mut areas = vec![
            Area::new(pt(0, 0), pt(20, 20)),
            Area::new(pt(-10, 0), pt(0, 10)),
            Area::new(pt(0, 0), pt(10, 10)),
        ];
        areas.sort();
        assert_eq!(
            areas,
            vec![
                Area::new(pt(-10, 0), pt(0, 10)),
                Area::new(pt(0, 0), pt(10, 10)),
                Area::new(pt(0, 0), pt(20, 20)),
            ]
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_new_is_always_canonical(
                ax in -10_000i64..10_000,
                ay in -10_000i64..10_000,
                bx in -10_000i64..10_000,
                by in -10_000i64..10_000,
            ) {
                let area = Area::new(pt(ax, ay), pt(bx, by));
                prop_assert!(Area::min(&area).x <= Area::max(&area).x);
                prop_assert!(Area::min(&area).y <= Area::max(&area).y);
                prop_assert!(area.width() >= 0);
                prop_assert!(area.height() >= 0);
            }

            #[test]
            fn test_intersect_agrees_with_intersects(
                ax in -1_000i64..1_000,
                ay in -1_000i64..1_000,
                aw in 1i64..100,
                ah in 1i64..100,
                bx in -1_000i64..1_000,
                by in -1_000i64..1_000,
                bw in 1i64..100,
                bh in 1i64..100,
            ) {
                let a = Area::with_size(pt(ax, ay), aw, ah);
                let b = Area::with_size(pt(bx, by), bw, bh);

                prop_assert_eq!(a.intersects(&b), a.intersect(&b).is_some());
                prop_assert_eq!(a.intersects(&b), b.intersects(&a));
                prop_assert_eq!(a.overlapping_pixels(&b), b.overlapping_pixels(&a));
            }

            #[test]
            fn test_intersection_contained_in_both(
                ax in -1_000i64..1_000,
                ay in -1_000i64..1_000,
                aw in 1i64..100,
                ah in 1i64..100,
                bx in -1_000i64..1_000,
                by in -1_000i64..1_000,
                bw in 1i64..100,
                bh in 1i64..100,
            ) {
                let a = Area::with_size(pt(ax, ay), aw, ah);
                let b = Area::with_size(pt(bx, by), bw, bh);

                if let Some(overlap) = a.intersect(&b) {
                    prop_assert!(a.contains_area(&overlap));
                    prop_assert!(b.contains_area(&overlap));
                    prop_assert!(overlap.surface() > 0);
                }
            }
        }
    }
}
