//! Axis-Aligned Box
//!
//! A box is an anchor point plus two signed relative corners:
//!
//! ```text
//!   origin + mins
//!        +-----------+
//!        |           |
//!        |   origin  |
//!        |     *     |
//!        +-----------+
//!                origin + maxs
//! ```
//!
//! `left/top/right/bottom` always go through min/max, so `mins` and `maxs`
//! need not be ordered. Width and height are never negative.
//!
//! Containment and overlap take a `BoxSide` mask naming which borders
//! count as inside. The default, `LEFT_TOP | INNER`, makes boxes half-open
//! so that tiles sharing an edge never overlap.

use std::ops::{Add, BitAnd, BitOr, Sub};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::fixed::{FixedDouble, FixedSingle};
use crate::core::interval::Interval;
use crate::core::vector::Vector;
use crate::error::GeometryError;

use super::segment::{LineSegment, SegmentIntersection};

bitflags! {
    /// Box borders (and interior) used as inclusion masks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BoxSide: u8 {
        /// Left border
        const LEFT = 1;
        /// Top border
        const TOP = 2;
        /// Right border
        const RIGHT = 4;
        /// Bottom border
        const BOTTOM = 8;
        /// Interior
        const INNER = 16;
        /// Exterior
        const OUTER = 32;
        /// Left and top borders
        const LEFT_TOP = Self::LEFT.bits() | Self::TOP.bits();
        /// Right and bottom borders
        const RIGHT_BOTTOM = Self::RIGHT.bits() | Self::BOTTOM.bits();
        /// All four borders
        const BORDERS = Self::LEFT_TOP.bits() | Self::RIGHT_BOTTOM.bits();
    }
}

/// Where the origin sits relative to the box, for `with_origin_position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OriginPosition {
    /// Left-top corner
    LeftTop = 0,
    /// Middle of the left side
    LeftMiddle = 1,
    /// Left-bottom corner
    LeftBottom = 2,
    /// Middle of the top side
    MiddleTop = 3,
    /// Center
    Center = 4,
    /// Middle of the bottom side
    MiddleBottom = 5,
    /// Right-top corner
    RightTop = 6,
    /// Middle of the right side
    RightMiddle = 7,
    /// Right-bottom corner
    RightBottom = 8,
}

impl TryFrom<u8> for OriginPosition {
    type Error = GeometryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::LeftTop,
            1 => Self::LeftMiddle,
            2 => Self::LeftBottom,
            3 => Self::MiddleTop,
            4 => Self::Center,
            5 => Self::MiddleBottom,
            6 => Self::RightTop,
            7 => Self::RightMiddle,
            8 => Self::RightBottom,
            other => return Err(GeometryError::UnknownOriginPosition(other)),
        })
    }
}

/// Axis-aligned box `(origin, mins, maxs)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Anchor point
    pub origin: Vector,
    /// First corner, relative to origin
    pub mins: Vector,
    /// Second corner, relative to origin
    pub maxs: Vector,
}

impl Aabb {
    /// Zero-sized box at the world origin.
    pub const EMPTY: Self = Self::new(Vector::NULL, Vector::NULL, Vector::NULL);

    /// Create a box from origin and relative corners.
    #[inline]
    pub const fn new(origin: Vector, mins: Vector, maxs: Vector) -> Self {
        Self { origin, mins, maxs }
    }

    /// Box with its origin at the left-top corner.
    #[inline]
    pub fn from_size(origin: Vector, width: FixedSingle, height: FixedSingle) -> Self {
        Self::new(origin, Vector::NULL, Vector::new(width, height))
    }

    /// Box spanning two opposite corners (any order).
    #[inline]
    pub fn from_corners(v1: Vector, v2: Vector) -> Self {
        Self::new(v1, Vector::NULL, v2 - v1)
    }

    /// Box given by its left-top corner and size, with the origin anchored
    /// at `position`.
    pub fn with_origin_position(
        left: FixedSingle,
        top: FixedSingle,
        width: FixedSingle,
        height: FixedSingle,
        position: OriginPosition,
    ) -> Self {
        let half_width = width * FixedSingle::HALF;
        let half_height = height * FixedSingle::HALF;
        let offset = match position {
            OriginPosition::LeftTop => Vector::NULL,
            OriginPosition::LeftMiddle => Vector::new(FixedSingle::ZERO, half_height),
            OriginPosition::LeftBottom => Vector::new(FixedSingle::ZERO, height),
            OriginPosition::MiddleTop => Vector::new(half_width, FixedSingle::ZERO),
            OriginPosition::Center => Vector::new(half_width, half_height),
            OriginPosition::MiddleBottom => Vector::new(half_width, height),
            OriginPosition::RightTop => Vector::new(width, FixedSingle::ZERO),
            OriginPosition::RightMiddle => Vector::new(width, half_height),
            OriginPosition::RightBottom => Vector::new(width, height),
        };
        let origin = Vector::new(left, top) + offset;
        Self::new(origin, -offset, Vector::new(width, height) - offset)
    }

    // =========================================================================
    // BOUNDS
    // =========================================================================

    /// Smallest x.
    #[inline]
    pub fn left(&self) -> FixedSingle {
        (self.origin.x + self.mins.x).min(self.origin.x + self.maxs.x)
    }

    /// Smallest y.
    #[inline]
    pub fn top(&self) -> FixedSingle {
        (self.origin.y + self.mins.y).min(self.origin.y + self.maxs.y)
    }

    /// Largest x.
    #[inline]
    pub fn right(&self) -> FixedSingle {
        (self.origin.x + self.mins.x).max(self.origin.x + self.maxs.x)
    }

    /// Largest y.
    #[inline]
    pub fn bottom(&self) -> FixedSingle {
        (self.origin.y + self.mins.y).max(self.origin.y + self.maxs.y)
    }

    /// Non-negative width.
    #[inline]
    pub fn width(&self) -> FixedSingle {
        (self.maxs.x - self.mins.x).abs()
    }

    /// Non-negative height.
    #[inline]
    pub fn height(&self) -> FixedSingle {
        (self.maxs.y - self.mins.y).abs()
    }

    /// `(width, height)`
    #[inline]
    pub fn diagonal_vector(&self) -> Vector {
        Vector::new(self.width(), self.height())
    }

    /// Area in double precision.
    #[inline]
    pub fn area(&self) -> FixedDouble {
        self.width().to_double() * self.height().to_double()
    }

    /// Positive width and height.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width() > FixedSingle::ZERO && self.height() > FixedSingle::ZERO
    }

    /// Top-left corner.
    #[inline]
    pub fn left_top(&self) -> Vector {
        Vector::new(self.left(), self.top())
    }

    /// Top-right corner.
    #[inline]
    pub fn right_top(&self) -> Vector {
        Vector::new(self.right(), self.top())
    }

    /// Bottom-left corner.
    #[inline]
    pub fn left_bottom(&self) -> Vector {
        Vector::new(self.left(), self.bottom())
    }

    /// Bottom-right corner.
    #[inline]
    pub fn right_bottom(&self) -> Vector {
        Vector::new(self.right(), self.bottom())
    }

    /// Middle of the left side.
    #[inline]
    pub fn left_middle(&self) -> Vector {
        Vector::new(self.left(), (self.top() + self.bottom()) * FixedSingle::HALF)
    }

    /// Middle of the right side.
    #[inline]
    pub fn right_middle(&self) -> Vector {
        Vector::new(self.right(), (self.top() + self.bottom()) * FixedSingle::HALF)
    }

    /// Middle of the top side.
    #[inline]
    pub fn middle_top(&self) -> Vector {
        Vector::new((self.left() + self.right()) * FixedSingle::HALF, self.top())
    }

    /// Middle of the bottom side (the feet).
    #[inline]
    pub fn middle_bottom(&self) -> Vector {
        Vector::new((self.left() + self.right()) * FixedSingle::HALF, self.bottom())
    }

    /// Midpoint of the two corners.
    #[inline]
    pub fn center(&self) -> Vector {
        self.origin + (self.mins + self.maxs) * FixedSingle::HALF
    }

    /// Corners in clockwise order starting at left-top.
    pub fn corners(&self) -> [Vector; 4] {
        [self.left_top(), self.right_top(), self.right_bottom(), self.left_bottom()]
    }

    /// Left side, top to bottom.
    pub fn left_segment(&self) -> LineSegment {
        LineSegment::new(self.left_top(), self.left_bottom())
    }

    /// Top side, left to right.
    pub fn top_segment(&self) -> LineSegment {
        LineSegment::new(self.left_top(), self.right_top())
    }

    /// Right side, top to bottom.
    pub fn right_segment(&self) -> LineSegment {
        LineSegment::new(self.right_top(), self.right_bottom())
    }

    /// Bottom side, left to right.
    pub fn bottom_segment(&self) -> LineSegment {
        LineSegment::new(self.left_bottom(), self.right_bottom())
    }

    /// Left, top, right and bottom side segments.
    pub fn sides(&self) -> [LineSegment; 4] {
        [self.left_segment(), self.top_segment(), self.right_segment(), self.bottom_segment()]
    }

    // =========================================================================
    // DERIVED BOXES
    // =========================================================================

    /// Translate by `delta`.
    #[inline]
    pub fn translate(&self, delta: Vector) -> Self {
        Self::new(self.origin + delta, self.mins, self.maxs)
    }

    /// Same box re-anchored at its left-top corner.
    pub fn left_top_origin(&self) -> Self {
        Self::new(self.left_top(), Vector::NULL, self.diagonal_vector())
    }

    /// Same box re-anchored at its center.
    pub fn center_origin(&self) -> Self {
        let half = self.diagonal_vector() * FixedSingle::HALF;
        Self::new(self.center(), -half, half)
    }

    /// Floor the origin to whole pixels.
    #[inline]
    pub fn round_origin_to_floor(&self) -> Self {
        Self::new(self.origin.round_to_floor(), self.mins, self.maxs)
    }

    /// Truncate the origin toward zero.
    #[inline]
    pub fn truncate_origin(&self) -> Self {
        Self::new(self.origin.truncate(), self.mins, self.maxs)
    }

    /// Scale around `center`.
    pub fn scale(&self, center: Vector, scale_x: FixedSingle, scale_y: FixedSingle) -> Self {
        Self::new(
            (self.origin - center).scale_xy(scale_x, scale_y) + center,
            self.mins.scale_xy(scale_x, scale_y),
            self.maxs.scale_xy(scale_x, scale_y),
        )
    }

    /// Left half (origin kept).
    pub fn half_left(&self) -> Self {
        let middle = (self.mins.x + self.maxs.x) * FixedSingle::HALF;
        Self::new(self.origin, self.mins, Vector::new(middle, self.maxs.y))
    }

    /// Right half (origin kept).
    pub fn half_right(&self) -> Self {
        let middle = (self.mins.x + self.maxs.x) * FixedSingle::HALF;
        Self::new(self.origin, Vector::new(middle, self.mins.y), self.maxs)
    }

    /// Top half (origin kept).
    pub fn half_top(&self) -> Self {
        let middle = (self.mins.y + self.maxs.y) * FixedSingle::HALF;
        Self::new(self.origin, self.mins, Vector::new(self.maxs.x, middle))
    }

    /// Bottom half (origin kept).
    pub fn half_bottom(&self) -> Self {
        let middle = (self.mins.y + self.maxs.y) * FixedSingle::HALF;
        Self::new(self.origin, Vector::new(self.mins.x, middle), self.maxs)
    }

    /// Remove `clip` from the left side; negative values extend it.
    pub fn clip_left(&self, clip: FixedSingle) -> Self {
        Self::new(self.origin, Vector::new(self.mins.x + clip, self.mins.y), self.maxs)
    }

    /// Remove `clip` from the right side; negative values extend it.
    pub fn clip_right(&self, clip: FixedSingle) -> Self {
        Self::new(self.origin, self.mins, Vector::new(self.maxs.x - clip, self.maxs.y))
    }

    /// Remove `clip` from the top side; negative values extend it.
    pub fn clip_top(&self, clip: FixedSingle) -> Self {
        Self::new(self.origin, Vector::new(self.mins.x, self.mins.y + clip), self.maxs)
    }

    /// Remove `clip` from the bottom side; negative values extend it.
    pub fn clip_bottom(&self, clip: FixedSingle) -> Self {
        Self::new(self.origin, self.mins, Vector::new(self.maxs.x, self.maxs.y - clip))
    }

    /// Mirror around the vertical line at `x`.
    pub fn mirror(&self, x: FixedSingle) -> Self {
        let origin_x = x * 2 - self.origin.x;
        Self::new(
            Vector::new(origin_x, self.origin.y),
            Vector::new(-self.maxs.x, self.mins.y),
            Vector::new(-self.mins.x, self.maxs.y),
        )
    }

    /// Flip around the horizontal line at `y`.
    pub fn flip(&self, y: FixedSingle) -> Self {
        let origin_y = y * 2 - self.origin.y;
        Self::new(
            Vector::new(self.origin.x, origin_y),
            Vector::new(self.mins.x, -self.maxs.y),
            Vector::new(self.maxs.x, -self.mins.y),
        )
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::from_size(Vector::new(left, top), right - left, bottom - top)
    }

    /// Common part of both boxes, `EMPTY` when disjoint.
    pub fn intersection(&self, other: &Self) -> Self {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return Self::EMPTY;
        }
        Self::from_size(Vector::new(left, top), right - left, bottom - top)
    }

    /// Move `other` the least amount so it fits inside `self`.
    pub fn restrict_in(&self, other: &Self) -> Self {
        let mut x = other.origin.x;
        let mut y = other.origin.y;

        if other.left() < self.left() {
            x = self.left() - other.mins.x.min(other.maxs.x);
        }
        if other.top() < self.top() {
            y = self.top() - other.mins.y.min(other.maxs.y);
        }
        if other.right() > self.right() {
            x = self.right() - other.mins.x.max(other.maxs.x);
        }
        if other.bottom() > self.bottom() {
            y = self.bottom() - other.mins.y.max(other.maxs.y);
        }

        Self::new(Vector::new(x, y), other.mins, other.maxs)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    fn x_interval(&self, include: BoxSide) -> Interval {
        Interval::new(
            self.left(),
            self.right(),
            include.contains(BoxSide::LEFT),
            include.contains(BoxSide::RIGHT),
        )
    }

    fn y_interval(&self, include: BoxSide) -> Interval {
        Interval::new(
            self.top(),
            self.bottom(),
            include.contains(BoxSide::TOP),
            include.contains(BoxSide::BOTTOM),
        )
    }

    /// Whether `point` is inside, counting only the borders named in `include`.
    ///
    /// Without `INNER` only the included border segments count.
    pub fn contains(&self, point: Vector, include: BoxSide) -> bool {
        if !include.contains(BoxSide::INNER) {
            return include.contains(BoxSide::LEFT) && self.left_segment().contains(point)
                || include.contains(BoxSide::TOP) && self.top_segment().contains(point)
                || include.contains(BoxSide::RIGHT) && self.right_segment().contains(point)
                || include.contains(BoxSide::BOTTOM) && self.bottom_segment().contains(point);
        }

        self.x_interval(include).contains(point.x) && self.y_interval(include).contains(point.y)
    }

    /// Half-open containment (`LEFT_TOP | INNER`).
    #[inline]
    pub fn contains_point(&self, point: Vector) -> bool {
        self.contains(point, BoxSide::LEFT_TOP | BoxSide::INNER)
    }

    /// Closed containment (all borders included).
    #[inline]
    pub fn contains_closed(&self, point: Vector) -> bool {
        self.contains(point, BoxSide::BORDERS | BoxSide::INNER)
    }

    /// Overlap test with independent inclusion masks for each box.
    pub fn is_overlapping_with(&self, other: &Self, include_self: BoxSide, include_other: BoxSide) -> bool {
        self.x_interval(include_self).is_overlapping(&other.x_interval(include_other))
            && self.y_interval(include_self).is_overlapping(&other.y_interval(include_other))
    }

    /// Half-open overlap (both masks `LEFT_TOP | INNER`).
    #[inline]
    pub fn is_overlapping(&self, other: &Self) -> bool {
        let mask = BoxSide::LEFT_TOP | BoxSide::INNER;
        self.is_overlapping_with(other, mask, mask)
    }

    /// Part of `segment` inside the closed box.
    ///
    /// Endpoints are tested first; the four sides are only walked when an
    /// endpoint lies outside.
    pub fn intersection_with_segment(&self, segment: &LineSegment) -> SegmentIntersection {
        let start_inside = self.contains_closed(segment.start);
        let end_inside = self.contains_closed(segment.end);

        if start_inside && end_inside {
            return if segment.is_point() {
                SegmentIntersection::Point(segment.start)
            } else {
                SegmentIntersection::Segment(*segment)
            };
        }

        let mut points: Vec<Vector> = Vec::with_capacity(4);
        if start_inside {
            points.push(segment.start);
        }
        if end_inside {
            points.push(segment.end);
        }

        for side in self.sides() {
            match segment.intersection(&side) {
                SegmentIntersection::Empty => {}
                SegmentIntersection::Point(point) => {
                    if !points.contains(&point) {
                        points.push(point);
                    }
                }
                SegmentIntersection::Segment(overlap) => return SegmentIntersection::Segment(overlap),
            }
        }

        match points.len() {
            0 => SegmentIntersection::Empty,
            1 => SegmentIntersection::Point(points[0]),
            _ => {
                let direction = segment.vector();
                let along = |p: &Vector| (*p - segment.start).dot(direction);
                let first = points.iter().copied().min_by_key(along).unwrap_or(segment.start);
                let last = points.iter().copied().max_by_key(along).unwrap_or(segment.end);
                SegmentIntersection::Segment(LineSegment::new(first, last))
            }
        }
    }

    /// Whether `segment` touches the closed box.
    #[inline]
    pub fn has_intersection_with_segment(&self, segment: &LineSegment) -> bool {
        !self.intersection_with_segment(segment).is_empty()
    }
}

impl Add<Vector> for Aabb {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Vector) -> Self {
        self.translate(rhs)
    }
}

impl Sub<Vector> for Aabb {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Vector) -> Self {
        self.translate(-rhs)
    }
}

impl BitOr for Aabb {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(&rhs)
    }
}

impl BitAnd for Aabb {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(&rhs)
    }
}

// =============================================================================
// TESTS
// =============================================================================
