//! Swept parallelogram probes.
//!
//! A side of a box (a horizontal or vertical base segment) swept along a
//! diagonal displacement covers a parallelogram:
//!
//! ```text
//!            p3 +--------+ p2
//!              /        /
//!             /        /
//!         p0 +--------+ p1        p1 = p0 + base, p3 = p0 + direction
//! ```
//!
//! It is the wrapping box minus the two right triangles cut off by the
//! slanted sides, which is how `as_geometry_set` expresses it.

use serde::{Deserialize, Serialize};

use crate::core::fixed::{FixedDouble, FixedSingle};
use crate::core::vector::Vector;

use super::aabb::{Aabb, BoxSide};
use super::segment::LineSegment;
use super::set::{Geometry, GeometrySet, SetOperation};
use super::triangle::RightTriangle;

/// Convex quadrilateral with two sides parallel to an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parallelogram {
    origin: Vector,
    direction: Vector,
    base: Vector,
    vertices: [Vector; 4],
    wrapping_box: Aabb,
    triangle1: RightTriangle,
    triangle2: RightTriangle,
}

/// Right triangle between the slanted side `a -> b` and the wrapping box
/// corner on the far side from `inside`.
fn cut_triangle(a: Vector, b: Vector, inside: Vector) -> RightTriangle {
    if a.x == b.x || a.y == b.y {
        return RightTriangle::EMPTY;
    }

    let side = LineSegment::new(a, b);
    let reference = side.compare(inside);
    if reference == 0 {
        return RightTriangle::EMPTY;
    }

    let corner = Vector::new(a.x, b.y);
    if side.compare(corner) != reference {
        RightTriangle::new(corner, b.x - a.x, a.y - b.y)
    } else {
        RightTriangle::new(Vector::new(b.x, a.y), a.x - b.x, b.y - a.y)
    }
}

impl Parallelogram {
    fn setup(origin: Vector, direction: Vector, base: Vector) -> Self {
        let p0 = origin;
        let p1 = origin + base;
        let p2 = p1 + direction;
        let p3 = origin + direction;
        let vertices = [p0, p1, p2, p3];

        let left = vertices.iter().map(|v| v.x).min().unwrap_or(origin.x);
        let right = vertices.iter().map(|v| v.x).max().unwrap_or(origin.x);
        let top = vertices.iter().map(|v| v.y).min().unwrap_or(origin.y);
        let bottom = vertices.iter().map(|v| v.y).max().unwrap_or(origin.y);
        let wrapping_box = Aabb::from_size(Vector::new(left, top), right - left, bottom - top);

        let center = origin + (base + direction) * FixedSingle::HALF;

        Self {
            origin,
            direction,
            base,
            vertices,
            wrapping_box,
            triangle1: cut_triangle(p3, p0, center),
            triangle2: cut_triangle(p1, p2, center),
        }
    }

    /// Horizontal base of length `small_width` at `origin`, swept by `direction`.
    pub fn setup_horizontal(origin: Vector, direction: Vector, small_width: FixedSingle) -> Self {
        Self::setup(origin, direction, Vector::new(small_width, FixedSingle::ZERO))
    }

    /// Vertical base of length `small_height` at `origin`, swept by `direction`.
    pub fn setup_vertical(origin: Vector, direction: Vector, small_height: FixedSingle) -> Self {
        Self::setup(origin, direction, Vector::new(FixedSingle::ZERO, small_height))
    }

    /// Same sweep moved by `delta`.
    pub fn translate(&self, delta: Vector) -> Self {
        Self::setup(self.origin + delta, self.direction, self.base)
    }

    /// Start of the swept base.
    #[inline]
    pub fn origin(&self) -> Vector {
        self.origin
    }

    /// Sweep displacement.
    #[inline]
    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Length of the axis-parallel sides.
    #[inline]
    pub fn small_size(&self) -> FixedSingle {
        self.base.x.abs().max(self.base.y.abs())
    }

    /// `p0, p1, p2, p3` in boundary order.
    #[inline]
    pub fn vertices(&self) -> [Vector; 4] {
        self.vertices
    }

    /// `p0p1, p1p2, p2p3, p3p0`
    pub fn sides(&self) -> [LineSegment; 4] {
        let [p0, p1, p2, p3] = self.vertices;
        [
            LineSegment::new(p0, p1),
            LineSegment::new(p1, p2),
            LineSegment::new(p2, p3),
            LineSegment::new(p3, p0),
        ]
    }

    /// Smallest box holding all four vertices.
    #[inline]
    pub fn wrapping_box(&self) -> Aabb {
        self.wrapping_box
    }

    /// The two corners removed from the wrapping box.
    #[inline]
    pub fn cut_triangles(&self) -> (RightTriangle, RightTriangle) {
        (self.triangle1, self.triangle2)
    }

    /// Enclosed area.
    pub fn area(&self) -> FixedDouble {
        self.wrapping_box.area() - self.triangle1.area() - self.triangle2.area()
    }

    /// `wrapping_box ∩ ¬triangle1 ∩ ¬triangle2`
    pub fn as_geometry_set(&self) -> GeometrySet {
        GeometrySet::new(
            SetOperation::Intersection,
            vec![
                (Geometry::Box(self.wrapping_box), false),
                (Geometry::Triangle(self.triangle1), true),
                (Geometry::Triangle(self.triangle2), true),
            ],
        )
    }

    /// Closed containment.
    pub fn contains(&self, point: Vector) -> bool {
        let mut positive = false;
        let mut negative = false;
        for side in self.sides() {
            match side.compare(point) {
                1 => positive = true,
                -1 => negative = true,
                _ => {}
            }
        }

        if positive && negative {
            return false;
        }
        if positive || negative {
            return true;
        }
        // every side collinear with the point: degenerate sweep
        self.sides().iter().any(|side| side.contains(point))
    }

    fn wraps_touch(&self, other: &Aabb) -> bool {
        let closed = BoxSide::BORDERS | BoxSide::INNER;
        self.wrapping_box.is_overlapping_with(other, closed, closed)
    }

    /// Closed intersection with a box.
    pub fn has_intersection_with_box(&self, other: &Aabb) -> bool {
        if !self.wraps_touch(other) {
            return false;
        }

        other.corners().iter().any(|corner| self.contains(*corner))
            || self.vertices.iter().any(|vertex| other.contains_closed(*vertex))
            || self.sides().iter().any(|side| other.has_intersection_with_segment(side))
    }

    /// Closed intersection with a triangle.
    pub fn has_intersection_with_triangle(&self, other: &RightTriangle) -> bool {
        if other.is_empty() || !self.wraps_touch(&other.wrapping_box()) {
            return false;
        }

        other.vertices().iter().any(|vertex| self.contains(*vertex))
            || self.vertices.iter().any(|vertex| other.contains_point(*vertex))
            || self.sides().iter().any(|side| {
                other
                    .sides()
                    .iter()
                    .any(|triangle_side| side.has_intersection_with(triangle_side))
            })
    }

    /// Closed intersection with a segment.
    pub fn has_intersection_with_segment(&self, other: &LineSegment) -> bool {
        self.sides().iter().any(|side| side.has_intersection_with(other))
            || self.contains(other.start)
            || self.contains(other.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(value: i32) -> FixedSingle {
        FixedSingle::from_int(value)
    }

    #[test]
    fn test_horizontal_sweep_down_right() {
        let p = Parallelogram::setup_horizontal(Vector::NULL, Vector::from_ints(4, 8), fx(10));
        assert_eq!(
            p.vertices(),
            [
                Vector::from_ints(0, 0),
                Vector::from_ints(10, 0),
                Vector::from_ints(14, 8),
                Vector::from_ints(4, 8),
            ]
        );
        assert_eq!(p.wrapping_box(), Aabb::from_size(Vector::NULL, fx(14), fx(8)));

        let (t1, t2) = p.cut_triangles();
        assert_eq!(t1, RightTriangle::new(Vector::from_ints(0, 8), fx(4), fx(-8)));
        assert_eq!(t2, RightTriangle::new(Vector::from_ints(14, 0), fx(-4), fx(8)));
        assert_eq!(p.area(), FixedDouble::from_int(80));
    }

    #[test]
    fn test_contains_matches_geometry_set_inside() {
        let p = Parallelogram::setup_vertical(Vector::from_ints(5, 5), Vector::from_ints(-6, -3), fx(12));
        let set = p.as_geometry_set();
        for x in -2..8 {
            for y in 0..20 {
                let point = Vector::from_ints(x, y);
                let on_border = p.sides().iter().any(|side| side.contains(point));
                if !on_border {
                    assert_eq!(p.contains(point), set.contains(point), "at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_box_intersections() {
        let p = Parallelogram::setup_horizontal(Vector::NULL, Vector::from_ints(8, 8), fx(4));
        // inside the band
        assert!(p.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(5, 4), fx(1), fx(1))));
        // in the cut-off bottom-left corner
        assert!(!p.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(0, 6), fx(1), fx(1))));
        // in the cut-off top-right corner
        assert!(!p.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(10, 0), fx(1), fx(1))));
        // straddling a slanted side
        assert!(p.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(2, 3), fx(2), fx(2))));
        // far away
        assert!(!p.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(30, 30), fx(2), fx(2))));
    }

    #[test]
    fn test_triangle_and_segment_intersections() {
        let p = Parallelogram::setup_horizontal(Vector::NULL, Vector::from_ints(8, 8), fx(4));
        let wedge = RightTriangle::new(Vector::from_ints(16, 8), fx(-4), fx(-4));
        assert!(p.has_intersection_with_triangle(&wedge));
        let far = RightTriangle::new(Vector::from_ints(40, 40), fx(-4), fx(-4));
        assert!(!p.has_intersection_with_triangle(&far));

        let crossing = LineSegment::new(Vector::from_ints(0, 4), Vector::from_ints(20, 4));
        assert!(p.has_intersection_with_segment(&crossing));
        let outside = LineSegment::new(Vector::from_ints(0, 6), Vector::from_ints(1, 7));
        assert!(!p.has_intersection_with_segment(&outside));
    }
}
