//! Line segments and exact segment intersection.
//!
//! All sidedness and intersection tests run on raw fixed-point integers
//! widened to `i128`, so they never round.

use serde::{Deserialize, Serialize};

use crate::core::fixed::FixedSingle;
use crate::core::vector::Vector;

use super::aabb::Aabb;

/// Result of intersecting two segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentIntersection {
    /// No common point
    Empty,
    /// Exactly one common point
    Point(Vector),
    /// Collinear overlap of positive length
    Segment(LineSegment),
}

impl SegmentIntersection {
    /// Whether the segments share at least one point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Closed segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LineSegment {
    /// First endpoint
    pub start: Vector,
    /// Second endpoint
    pub end: Vector,
}

#[inline]
fn raw_delta(a: Vector, b: Vector) -> (i128, i128) {
    (
        b.x.raw() as i128 - a.x.raw() as i128,
        b.y.raw() as i128 - a.y.raw() as i128,
    )
}

#[inline]
fn raw_cross(a: (i128, i128), b: (i128, i128)) -> i128 {
    a.0 * b.1 - a.1 * b.0
}

impl LineSegment {
    /// Create a segment.
    #[inline]
    pub const fn new(start: Vector, end: Vector) -> Self {
        Self { start, end }
    }

    /// `end - start`
    #[inline]
    pub fn vector(&self) -> Vector {
        self.end - self.start
    }

    /// Euclidean length.
    pub fn length(&self) -> FixedSingle {
        self.vector().length()
    }

    /// Whether both endpoints coincide.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Same segment with endpoints swapped.
    #[inline]
    pub fn negate(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Translate by `delta`.
    #[inline]
    pub fn translate(&self, delta: Vector) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }

    /// Smallest x of the endpoints.
    #[inline]
    pub fn left(&self) -> FixedSingle {
        self.start.x.min(self.end.x)
    }

    /// Largest x of the endpoints.
    #[inline]
    pub fn right(&self) -> FixedSingle {
        self.start.x.max(self.end.x)
    }

    /// Smallest y of the endpoints.
    #[inline]
    pub fn top(&self) -> FixedSingle {
        self.start.y.min(self.end.y)
    }

    /// Largest y of the endpoints.
    #[inline]
    pub fn bottom(&self) -> FixedSingle {
        self.start.y.max(self.end.y)
    }

    /// Bounding box of the segment.
    pub fn wrapping_box(&self) -> Aabb {
        Aabb::from_corners(self.start, self.end)
    }

    /// Side of the supporting line `point` lies on: -1, 0 (on the line) or 1.
    pub fn compare(&self, point: Vector) -> i32 {
        let direction = raw_delta(self.start, self.end);
        let offset = raw_delta(self.start, point);
        raw_cross(direction, offset).signum() as i32
    }

    /// Whether `point` lies on the segment (endpoints included).
    pub fn contains(&self, point: Vector) -> bool {
        self.compare(point) == 0
            && point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Whether the supporting lines are parallel (or either segment is a point).
    pub fn is_parallel(&self, other: &Self) -> bool {
        raw_cross(raw_delta(self.start, self.end), raw_delta(other.start, other.end)) == 0
    }

    /// Whether the two segments share at least one point.
    #[inline]
    pub fn has_intersection_with(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Exact intersection of two closed segments.
    ///
    /// Collinear overlapping segments yield the overlapping sub-segment; a
    /// segment intersected with itself yields itself.
    pub fn intersection(&self, other: &Self) -> SegmentIntersection {
        if self == other || *self == other.negate() {
            return if self.is_point() {
                SegmentIntersection::Point(self.start)
            } else {
                SegmentIntersection::Segment(*self)
            };
        }

        if self.is_point() {
            return if other.contains(self.start) {
                SegmentIntersection::Point(self.start)
            } else {
                SegmentIntersection::Empty
            };
        }

        if other.is_point() {
            return if self.contains(other.start) {
                SegmentIntersection::Point(other.start)
            } else {
                SegmentIntersection::Empty
            };
        }

        let d1 = raw_delta(self.start, self.end);
        let d2 = raw_delta(other.start, other.end);
        let r = raw_delta(self.start, other.start);
        let mut denom = raw_cross(d1, d2);

        if denom == 0 {
            if raw_cross(r, d1) != 0 {
                return SegmentIntersection::Empty;
            }
            return self.collinear_overlap(other);
        }

        let mut t_num = raw_cross(r, d2);
        let mut u_num = raw_cross(r, d1);
        if denom < 0 {
            denom = -denom;
            t_num = -t_num;
            u_num = -u_num;
        }

        if t_num < 0 || t_num > denom || u_num < 0 || u_num > denom {
            return SegmentIntersection::Empty;
        }

        let x = self.start.x.raw() as i128 + (d1.0 * t_num).div_euclid(denom);
        let y = self.start.y.raw() as i128 + (d1.1 * t_num).div_euclid(denom);
        SegmentIntersection::Point(Vector::new(
            FixedSingle::from_raw(x as i32),
            FixedSingle::from_raw(y as i32),
        ))
    }

    fn collinear_overlap(&self, other: &Self) -> SegmentIntersection {
        let d = raw_delta(self.start, self.end);
        let key = |v: Vector| if d.0.abs() >= d.1.abs() { v.x } else { v.y };

        let (a0, a1) = if key(self.start) <= key(self.end) {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        let (b0, b1) = if key(other.start) <= key(other.end) {
            (other.start, other.end)
        } else {
            (other.end, other.start)
        };

        let lo = if key(a0) >= key(b0) { a0 } else { b0 };
        let hi = if key(a1) <= key(b1) { a1 } else { b1 };

        match key(lo).cmp(&key(hi)) {
            std::cmp::Ordering::Greater => SegmentIntersection::Empty,
            std::cmp::Ordering::Equal => SegmentIntersection::Point(lo),
            std::cmp::Ordering::Less => SegmentIntersection::Segment(Self::new(lo, hi)),
        }
    }
}
