//! Thin adapter over the `geo` kernel.
//!
//! All kernel geometry is planar in `(x = longitude, y = latitude)` degrees.
//! `geo` algorithms are pure functions over owned values, so every task gets
//! an independent kernel context simply by owning its inputs.

use geo::{
    Area, BooleanOps, BoundingRect, Contains, Coord, Distance, Euclidean, Intersects, MapCoords,
    MultiPolygon, Point, Polygon, Rect,
};
use travel_regions_types::geometry::RegionGeometry;

/// Grid spacing (degrees) that tessellation output is snapped to.
pub const SNAP_GRID: f64 = 1e-9;

/// Boundaries closer than this (degrees) are in contact.
///
/// Boolean operations quantize to a per-call grid, so borders computed by
/// separate calls can drift apart by a few multiples of [`SNAP_GRID`].
pub const BOUNDARY_TOLERANCE: f64 = 1e-6;

/// Interior overlap below this fraction of the smaller shape's area does
/// not count as overlap.
pub const OVERLAP_TOLERANCE: f64 = 1e-6;

/// Union of many multipolygons by pairwise reduction.
///
/// Returns `None` for an empty input. That is the "nothing to merge"
/// sentinel, distinct from any geometry.
pub fn union_all(mut parts: Vec<MultiPolygon<f64>>) -> Option<MultiPolygon<f64>> {
    while parts.len() > 1 {
        let mut next = Vec::with_capacity(parts.len() / 2 + 1);
        let mut iter = parts.into_iter();
        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(left.union(&right)),
                None => next.push(left),
            }
        }
        parts = next;
    }
    parts.pop()
}

/// Round every vertex to [`SNAP_GRID`] so edges computed independently by
/// neighbouring cells coincide exactly.
pub fn snap_to_grid(multi_polygon: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    multi_polygon.map_coords(|Coord { x, y }| Coord {
        x: snap(x),
        y: snap(y),
    })
}

#[inline]
fn snap(value: f64) -> f64 {
    (value / SNAP_GRID).round() * SNAP_GRID
}

/// A kernel multipolygon with its bounding rectangle, used to prune
/// predicate evaluation.
#[derive(Debug, Clone)]
pub struct Shape {
    polygons: MultiPolygon<f64>,
    bounds: Option<Rect<f64>>,
}

impl Shape {
    pub fn new(polygons: MultiPolygon<f64>) -> Self {
        let bounds = polygons.bounding_rect();
        Self { polygons, bounds }
    }

    pub fn from_geometry(geometry: &RegionGeometry) -> Self {
        Self::new(geometry.to_multi_polygon())
    }

    pub fn from_polygon(polygon: Polygon<f64>) -> Self {
        Self::new(MultiPolygon::new(vec![polygon]))
    }

    #[inline]
    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    #[inline]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    pub fn area(&self) -> f64 {
        self.polygons.unsigned_area()
    }

    fn bounds_intersect(&self, other: &Shape) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => a.intersects(&b),
            _ => false,
        }
    }

    fn bounds_within(&self, other: &Shape, tolerance: f64) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => rects_within(a, b, tolerance),
            _ => false,
        }
    }

    /// Strict containment: points on the boundary are outside.
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        match self.bounds {
            Some(bounds) if bounds.intersects(&point.0) => self.polygons.contains(point),
            _ => false,
        }
    }

    pub fn intersection_area(&self, other: &Shape) -> f64 {
        if !self.bounds_intersect(other) {
            return 0.0;
        }
        self.polygons.intersection(&other.polygons).unsigned_area()
    }

    /// True when some constituent polygon of `self` comes within
    /// [`BOUNDARY_TOLERANCE`] of some constituent polygon of `other` while
    /// the shared interior stays below [`OVERLAP_TOLERANCE`] of the smaller
    /// shape.
    pub fn touches(&self, other: &Shape) -> bool {
        if !self.bounds_within(other, BOUNDARY_TOLERANCE) {
            return false;
        }
        let noise = OVERLAP_TOLERANCE * self.area().min(other.area());
        if self.intersection_area(other) > noise {
            return false;
        }
        self.polygons.iter().any(|ours| {
            other
                .polygons
                .iter()
                .any(|theirs| polygons_touch(ours, theirs))
        })
    }
}

/// Boundary contact within [`BOUNDARY_TOLERANCE`]. Interiors are not
/// checked; overlapping polygons also qualify.
pub fn polygons_touch(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    match (a.bounding_rect(), b.bounding_rect()) {
        (Some(ra), Some(rb)) if rects_within(ra, rb, BOUNDARY_TOLERANCE) => {
            Euclidean.distance(a, b) <= BOUNDARY_TOLERANCE
        }
        _ => false,
    }
}

#[inline]
fn rects_within(a: Rect<f64>, b: Rect<f64>, tolerance: f64) -> bool {
    a.min().x <= b.max().x + tolerance
        && b.min().x <= a.max().x + tolerance
        && a.min().y <= b.max().y + tolerance
        && b.min().y <= a.max().y + tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]
    }

    fn multi(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
        MultiPolygon::new(polygons)
    }

    #[test]
    fn test_union_all_empty_is_none() {
        assert!(union_all(vec![]).is_none());
    }

    #[test]
    fn test_union_all_adjacent_squares_merge() {
        let parts = vec![
            multi(vec![square(0.0, 0.0, 1.0)]),
            multi(vec![square(1.0, 0.0, 1.0)]),
            multi(vec![square(2.0, 0.0, 1.0)]),
        ];
        let merged = union_all(parts).unwrap();
        assert_eq!(merged.0.len(), 1);
        assert!((merged.unsigned_area() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_all_disjoint_squares_stay_apart() {
        let parts = vec![
            multi(vec![square(0.0, 0.0, 1.0)]),
            multi(vec![square(5.0, 5.0, 1.0)]),
        ];
        let merged = union_all(parts).unwrap();
        assert_eq!(merged.0.len(), 2);
    }

    #[test]
    fn test_snap_to_grid() {
        let noisy = multi(vec![square(0.1 + 1e-13, 0.0, 1.0)]);
        let snapped = snap_to_grid(&noisy);
        let first = snapped.0[0].exterior().0[0];
        assert!((first.x - 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_shape_touches() {
        let a = Shape::from_polygon(square(0.0, 0.0, 1.0));
        let b = Shape::from_polygon(square(1.0, 0.0, 1.0));
        let overlapping = Shape::from_polygon(square(0.5, 0.0, 1.0));
        let far = Shape::from_polygon(square(3.0, 0.0, 1.0));

        assert!(a.touches(&b));
        assert!(b.touches(&a));
        assert!(!a.touches(&overlapping));
        assert!(!a.touches(&far));
    }

    #[test]
    fn test_shape_touches_across_numerical_gap() {
        let a = Shape::from_polygon(square(0.0, 0.0, 1.0));
        let gap = Shape::from_polygon(square(1.0 + 1e-9, 0.0, 1.0));
        let sliver = Shape::from_polygon(square(1.0 - 1e-9, 0.0, 1.0));
        let apart = Shape::from_polygon(square(1.001, 0.0, 1.0));

        assert!(a.touches(&gap));
        assert!(a.touches(&sliver));
        assert!(sliver.touches(&a));
        assert!(!a.touches(&apart));
    }

    #[test]
    fn test_shape_touches_corner_and_containment() {
        let a = Shape::from_polygon(square(0.0, 0.0, 1.0));
        let corner = Shape::from_polygon(square(1.0, 1.0, 1.0));
        let inner = Shape::from_polygon(square(0.25, 0.25, 0.5));

        assert!(a.touches(&corner));
        assert!(!a.touches(&inner));
        assert!(!inner.touches(&a));
    }

    #[test]
    fn test_shape_touches_any_constituent() {
        let a = Shape::new(multi(vec![square(0.0, 0.0, 1.0), square(10.0, 0.0, 1.0)]));
        let b = Shape::from_polygon(square(11.0, 0.0, 1.0));
        assert!(a.touches(&b));
        assert!(b.touches(&a));
    }

    #[test]
    fn test_shape_contains_point_excludes_boundary() {
        let shape = Shape::from_polygon(square(0.0, 0.0, 2.0));
        assert!(shape.contains_point(&Point::new(1.0, 1.0)));
        assert!(!shape.contains_point(&Point::new(0.0, 1.0)));
        assert!(!shape.contains_point(&Point::new(3.0, 1.0)));
    }

    #[test]
    fn test_intersection_area() {
        let a = Shape::from_polygon(square(0.0, 0.0, 2.0));
        let b = Shape::from_polygon(square(1.0, 1.0, 2.0));
        assert!((a.intersection_area(&b) - 1.0).abs() < 1e-9);
        assert!((a.intersection_area(&a) - 4.0).abs() < 1e-9);

        let far = Shape::from_polygon(square(10.0, 10.0, 1.0));
        assert_eq!(a.intersection_area(&far), 0.0);
    }
}
