//! Right triangles (slope wedges).
//!
//! ```text
//!   h_cathetus_opposite
//!        *
//!        | \
//!        |   \  hypotenuse
//!        |     \
//!        *-------*
//!     origin    v_cathetus_opposite
//! ```
//!
//! `origin` is the right-angle vertex. The signs of the two catheti encode
//! the orientation; `(0, 0, 0)` is the empty triangle.

use std::ops::Add;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::fixed::{FixedDouble, FixedSingle};
use crate::core::vector::Vector;

use super::aabb::Aabb;
use super::segment::LineSegment;

bitflags! {
    /// Triangle sides (and interior) used as inclusion masks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RightTriangleSide: u8 {
        /// Horizontal leg
        const HCATHETUS = 1;
        /// Vertical leg
        const VCATHETUS = 2;
        /// Slanted side
        const HYPOTENUSE = 4;
        /// Interior
        const INNER = 8;
        /// Everything
        const ALL = Self::HCATHETUS.bits() | Self::VCATHETUS.bits() | Self::HYPOTENUSE.bits() | Self::INNER.bits();
    }
}

/// Right triangle given by its right-angle vertex and signed catheti.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RightTriangle {
    /// Right-angle vertex
    pub origin: Vector,
    /// Signed horizontal leg length
    pub h_cathetus: FixedSingle,
    /// Signed vertical leg length
    pub v_cathetus: FixedSingle,
}

impl RightTriangle {
    /// No slope.
    pub const EMPTY: Self = Self::new(Vector::NULL, FixedSingle::ZERO, FixedSingle::ZERO);

    /// Triangle with its right angle at `origin`.
    #[inline]
    pub const fn new(origin: Vector, h_cathetus: FixedSingle, v_cathetus: FixedSingle) -> Self {
        Self { origin, h_cathetus, v_cathetus }
    }

    /// Whether both catheti are zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.h_cathetus.is_zero() && self.v_cathetus.is_zero()
    }

    /// The right-angle vertex.
    #[inline]
    pub fn hypotenuse_opposite_vertex(&self) -> Vector {
        self.origin
    }

    /// Far end of the vertical cathetus.
    #[inline]
    pub fn h_cathetus_opposite_vertex(&self) -> Vector {
        self.origin + Vector::new(FixedSingle::ZERO, self.v_cathetus)
    }

    /// Far end of the horizontal cathetus.
    #[inline]
    pub fn v_cathetus_opposite_vertex(&self) -> Vector {
        self.origin + Vector::new(self.h_cathetus, FixedSingle::ZERO)
    }

    /// The three vertices: right angle first.
    pub fn vertices(&self) -> [Vector; 3] {
        [
            self.hypotenuse_opposite_vertex(),
            self.h_cathetus_opposite_vertex(),
            self.v_cathetus_opposite_vertex(),
        ]
    }

    /// Horizontal cathetus.
    pub fn h_cathetus_line(&self) -> LineSegment {
        LineSegment::new(self.origin, self.v_cathetus_opposite_vertex())
    }

    /// Vertical cathetus.
    pub fn v_cathetus_line(&self) -> LineSegment {
        LineSegment::new(self.origin, self.h_cathetus_opposite_vertex())
    }

    /// Hypotenuse (the walkable surface of a slope).
    pub fn hypotenuse_line(&self) -> LineSegment {
        LineSegment::new(self.h_cathetus_opposite_vertex(), self.v_cathetus_opposite_vertex())
    }

    /// Horizontal leg, vertical leg, hypotenuse.
    pub fn sides(&self) -> [LineSegment; 3] {
        [self.h_cathetus_line(), self.v_cathetus_line(), self.hypotenuse_line()]
    }

    /// Bounding box.
    pub fn wrapping_box(&self) -> Aabb {
        Aabb::from_corners(self.origin, self.origin + Vector::new(self.h_cathetus, self.v_cathetus))
    }

    /// Leftmost x.
    #[inline]
    pub fn left(&self) -> FixedSingle {
        self.origin.x.min(self.origin.x + self.h_cathetus)
    }

    /// Rightmost x.
    #[inline]
    pub fn right(&self) -> FixedSingle {
        self.origin.x.max(self.origin.x + self.h_cathetus)
    }

    /// Topmost y.
    #[inline]
    pub fn top(&self) -> FixedSingle {
        self.origin.y.min(self.origin.y + self.v_cathetus)
    }

    /// Bottommost y.
    #[inline]
    pub fn bottom(&self) -> FixedSingle {
        self.origin.y.max(self.origin.y + self.v_cathetus)
    }

    /// Sign of the horizontal cathetus: positive when it extends right.
    #[inline]
    pub fn h_cathetus_sign(&self) -> i32 {
        self.h_cathetus.signum()
    }

    /// Sign of the vertical cathetus: positive when it extends down.
    #[inline]
    pub fn v_cathetus_sign(&self) -> i32 {
        self.v_cathetus.signum()
    }

    /// Area in double precision.
    pub fn area(&self) -> FixedDouble {
        (self.h_cathetus.to_double() * self.v_cathetus.to_double()).abs() * FixedDouble::from(FixedSingle::HALF)
    }

    /// Same triangle moved by `delta`.
    #[inline]
    pub fn translate(&self, delta: Vector) -> Self {
        Self::new(self.origin + delta, self.h_cathetus, self.v_cathetus)
    }

    /// Height of the hypotenuse at `x`, with `x` clamped to the triangle's span.
    pub fn hypotenuse_y_at(&self, x: FixedSingle) -> FixedSingle {
        if self.h_cathetus.is_zero() {
            return self.origin.y.min(self.origin.y + self.v_cathetus);
        }
        let x = x.max(self.left()).min(self.right());
        let dx = (x - self.origin.x).to_double();
        let drop = self.v_cathetus.to_double() * dx / self.h_cathetus.to_double();
        self.origin.y + self.v_cathetus - drop.to_single()
    }

    /// Point containment with an inclusion mask.
    ///
    /// Exact: the same-side test runs on raw values widened to `i128`.
    pub fn contains(&self, point: Vector, include: RightTriangleSide) -> bool {
        if self.is_empty() {
            return false;
        }

        if !include.contains(RightTriangleSide::INNER) {
            return include.contains(RightTriangleSide::HCATHETUS) && self.h_cathetus_line().contains(point)
                || include.contains(RightTriangleSide::VCATHETUS) && self.v_cathetus_line().contains(point)
                || include.contains(RightTriangleSide::HYPOTENUSE) && self.hypotenuse_line().contains(point);
        }

        if self.h_cathetus.is_zero() || self.v_cathetus.is_zero() {
            return LineSegment::new(self.origin, self.origin + Vector::new(self.h_cathetus, self.v_cathetus))
                .contains(point);
        }

        let h = self.h_cathetus.raw() as i128;
        let v = self.v_cathetus.raw() as i128;
        let a = (point.x.raw() as i128 - self.origin.x.raw() as i128) * h.signum();
        let b = (point.y.raw() as i128 - self.origin.y.raw() as i128) * v.signum();
        let (h, v) = (h.abs(), v.abs());

        if a < 0 || b < 0 {
            return false;
        }
        if a == 0 && !include.contains(RightTriangleSide::VCATHETUS) {
            return false;
        }
        if b == 0 && !include.contains(RightTriangleSide::HCATHETUS) {
            return false;
        }

        let s = a * v + b * h - h * v;
        if s > 0 {
            return false;
        }
        s < 0 || include.contains(RightTriangleSide::HYPOTENUSE)
    }

    /// Closed containment.
    #[inline]
    pub fn contains_point(&self, point: Vector) -> bool {
        self.contains(point, RightTriangleSide::ALL)
    }

    /// Whether `segment` touches the triangle parts named in `include`.
    pub fn has_intersection_with_segment(&self, segment: &LineSegment, include: RightTriangleSide) -> bool {
        let hypotenuse = self.hypotenuse_line().has_intersection_with(segment);
        let h_cathetus = self.h_cathetus_line().has_intersection_with(segment);
        let v_cathetus = self.v_cathetus_line().has_intersection_with(segment);

        include.contains(RightTriangleSide::HYPOTENUSE) && hypotenuse
            || include.contains(RightTriangleSide::HCATHETUS) && h_cathetus
            || include.contains(RightTriangleSide::VCATHETUS) && v_cathetus
            || include.contains(RightTriangleSide::INNER)
                && (hypotenuse
                    || h_cathetus
                    || v_cathetus
                    || self.contains(segment.start, RightTriangleSide::INNER)
                    || self.contains(segment.end, RightTriangleSide::INNER))
    }

    /// Whether `other` touches the triangle parts named in `include`.
    ///
    /// The box is first cut to the wrapping box; the cut must have positive
    /// area. Then it intersects if the cut covers the whole wrapping box, a
    /// corner of the cut lies in the triangle, or a triangle side crosses it.
    pub fn has_intersection_with_box(&self, other: &Aabb, include: RightTriangleSide) -> bool {
        let wrapping = self.wrapping_box();
        let cut = other.intersection(&wrapping);
        if !cut.is_valid() {
            return false;
        }

        if cut.left_top() == wrapping.left_top() && cut.right_bottom() == wrapping.right_bottom() {
            return true;
        }

        include.contains(RightTriangleSide::INNER)
            && cut.corners().iter().any(|corner| self.contains_point(*corner))
            || include.contains(RightTriangleSide::HYPOTENUSE)
                && cut.has_intersection_with_segment(&self.hypotenuse_line())
            || include.contains(RightTriangleSide::HCATHETUS)
                && cut.has_intersection_with_segment(&self.h_cathetus_line())
            || include.contains(RightTriangleSide::VCATHETUS)
                && cut.has_intersection_with_segment(&self.v_cathetus_line())
    }

    /// Closed triangle-triangle intersection.
    pub fn has_intersection_with_triangle(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.vertices().iter().any(|v| other.contains_point(*v))
            || other.vertices().iter().any(|v| self.contains_point(*v))
            || self
                .sides()
                .iter()
                .any(|side| other.sides().iter().any(|o| side.has_intersection_with(o)))
    }
}

impl Add<Vector> for RightTriangle {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Vector) -> Self {
        self.translate(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(value: i32) -> FixedSingle {
        FixedSingle::from_int(value)
    }

    /// Rising left to right: hypotenuse from (0,8) to (16,0).
    fn wedge() -> RightTriangle {
        RightTriangle::new(Vector::from_ints(16, 8), fx(-16), fx(-8))
    }

    #[test]
    fn test_vertices_and_bounds() {
        let t = wedge();
        assert_eq!(t.h_cathetus_opposite_vertex(), Vector::from_ints(16, 0));
        assert_eq!(t.v_cathetus_opposite_vertex(), Vector::from_ints(0, 8));
        assert_eq!(t.left(), fx(0));
        assert_eq!(t.right(), fx(16));
        assert_eq!(t.top(), fx(0));
        assert_eq!(t.bottom(), fx(8));
        assert_eq!(t.h_cathetus_sign(), -1);
        assert_eq!(t.area(), FixedDouble::from_int(64));
    }

    #[test]
    fn test_contains_inside_outside_and_borders() {
        let t = wedge();
        assert!(t.contains_point(Vector::from_ints(12, 6)));
        assert!(!t.contains_point(Vector::from_ints(2, 2)));
        // on the hypotenuse
        assert!(t.contains_point(Vector::from_ints(8, 4)));
        assert!(!t.contains(Vector::from_ints(8, 4), RightTriangleSide::INNER));
        // on the horizontal leg
        assert!(t.contains_point(Vector::from_ints(10, 8)));
        assert!(!t.contains(Vector::from_ints(10, 8), RightTriangleSide::INNER | RightTriangleSide::HYPOTENUSE));
        assert!(t.contains(Vector::from_ints(10, 8), RightTriangleSide::HCATHETUS));
        assert!(!RightTriangle::EMPTY.contains_point(Vector::NULL));
    }

    #[test]
    fn test_hypotenuse_height() {
        let t = wedge();
        assert_eq!(t.hypotenuse_y_at(fx(0)), fx(8));
        assert_eq!(t.hypotenuse_y_at(fx(8)), fx(4));
        assert_eq!(t.hypotenuse_y_at(fx(16)), fx(0));
        assert_eq!(t.hypotenuse_y_at(fx(40)), fx(0));
    }

    #[test]
    fn test_box_intersection() {
        let t = wedge();
        // fully inside the solid corner
        assert!(t.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(13, 6), fx(2), fx(2)), RightTriangleSide::ALL));
        // above the slope
        assert!(!t.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(1, 1), fx(2), fx(2)), RightTriangleSide::ALL));
        // bottom-middle touching the hypotenuse
        assert!(t.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(6, 0), fx(4), fx(4)), RightTriangleSide::ALL));
        // covering the whole wedge
        assert!(t.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(-4, -4), fx(32), fx(32)), RightTriangleSide::ALL));
        // touching only the wrapping box edge
        assert!(!t.has_intersection_with_box(&Aabb::from_size(Vector::from_ints(16, 0), fx(4), fx(4)), RightTriangleSide::ALL));
    }

    #[test]
    fn test_segment_and_triangle_intersection() {
        let t = wedge();
        let through = LineSegment::new(Vector::from_ints(0, 0), Vector::from_ints(16, 8));
        assert!(t.has_intersection_with_segment(&through, RightTriangleSide::ALL));
        let above = LineSegment::new(Vector::from_ints(0, 0), Vector::from_ints(4, 0));
        assert!(!t.has_intersection_with_segment(&above, RightTriangleSide::ALL));

        let mirrored = RightTriangle::new(Vector::from_ints(0, 8), fx(16), fx(-8));
        assert!(t.has_intersection_with_triangle(&mirrored));
        let far = wedge().translate(Vector::from_ints(100, 0));
        assert!(!t.has_intersection_with_triangle(&far));
    }
}
