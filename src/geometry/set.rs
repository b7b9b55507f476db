//! Boolean combinations of shapes.
//!
//! `Geometry` is the closed set of shapes the engine probes with. A
//! `GeometrySet` is a union or intersection of shapes, each optionally
//! negated. Membership and intersection queries are exact for any mix of
//! convex parts, which covers swept parallelograms (wrapping box minus two
//! cut triangles).

use crate::core::fixed::FixedSingle;
use crate::core::vector::Vector;

use super::aabb::{Aabb, BoxSide};
use super::parallelogram::Parallelogram;
use super::segment::{LineSegment, SegmentIntersection};
use super::triangle::RightTriangle;

/// Any primitive shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    /// Single point
    Point(Vector),
    /// Closed segment
    Segment(LineSegment),
    /// Axis-aligned box
    Box(Aabb),
    /// Right triangle
    Triangle(RightTriangle),
    /// Swept parallelogram
    Parallelogram(Parallelogram),
}

impl Geometry {
    /// Closed containment.
    pub fn contains(&self, point: Vector) -> bool {
        match self {
            Self::Point(p) => *p == point,
            Self::Segment(segment) => segment.contains(point),
            Self::Box(aabb) => aabb.contains_closed(point),
            Self::Triangle(triangle) => triangle.contains_point(point),
            Self::Parallelogram(parallelogram) => parallelogram.contains(point),
        }
    }

    /// Corner points (all shapes here are convex).
    pub fn vertices(&self) -> Vec<Vector> {
        match self {
            Self::Point(p) => vec![*p],
            Self::Segment(segment) => vec![segment.start, segment.end],
            Self::Box(aabb) => aabb.corners().to_vec(),
            Self::Triangle(triangle) => {
                if triangle.is_empty() {
                    Vec::new()
                } else {
                    triangle.vertices().to_vec()
                }
            }
            Self::Parallelogram(parallelogram) => parallelogram.vertices().to_vec(),
        }
    }

    /// Boundary segments.
    pub fn edges(&self) -> Vec<LineSegment> {
        match self {
            Self::Point(_) => Vec::new(),
            Self::Segment(segment) => vec![*segment],
            Self::Box(aabb) => aabb.sides().to_vec(),
            Self::Triangle(triangle) => {
                if triangle.is_empty() {
                    Vec::new()
                } else {
                    triangle.sides().to_vec()
                }
            }
            Self::Parallelogram(parallelogram) => parallelogram.sides().to_vec(),
        }
    }

    /// Bounding box.
    pub fn wrapping_box(&self) -> Aabb {
        match self {
            Self::Point(p) => Aabb::new(*p, Vector::NULL, Vector::NULL),
            Self::Segment(segment) => segment.wrapping_box(),
            Self::Box(aabb) => *aabb,
            Self::Triangle(triangle) => triangle.wrapping_box(),
            Self::Parallelogram(parallelogram) => parallelogram.wrapping_box(),
        }
    }

    /// Closed convex-convex intersection.
    ///
    /// Two closed convex shapes meet iff a vertex of one lies in the other
    /// or two boundary segments cross.
    pub fn has_intersection_with(&self, other: &Geometry) -> bool {
        if matches!(self, Self::Triangle(t) if t.is_empty())
            || matches!(other, Self::Triangle(t) if t.is_empty())
        {
            return false;
        }

        let closed = BoxSide::BORDERS | BoxSide::INNER;
        if !self.wrapping_box().is_overlapping_with(&other.wrapping_box(), closed, closed) {
            return false;
        }

        if self.vertices().iter().any(|v| other.contains(*v))
            || other.vertices().iter().any(|v| self.contains(*v))
        {
            return true;
        }

        let other_edges = other.edges();
        self.edges()
            .iter()
            .any(|edge| other_edges.iter().any(|o| edge.has_intersection_with(o)))
    }

    /// Whether every point of `other` lies in this shape.
    pub fn covers(&self, other: &Geometry) -> bool {
        let vertices = other.vertices();
        !vertices.is_empty() && vertices.iter().all(|v| self.contains(*v))
    }
}

/// How the parts of a set combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetOperation {
    /// Point belongs to at least one part
    Union,
    /// Point belongs to every part
    Intersection,
}

/// Union or intersection of optionally negated shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeometrySet {
    operation: SetOperation,
    parts: Vec<(Geometry, bool)>,
}

impl GeometrySet {
    /// Build a set from `(shape, negate)` parts.
    pub fn new(operation: SetOperation, parts: Vec<(Geometry, bool)>) -> Self {
        Self { operation, parts }
    }

    /// Union of plain shapes.
    pub fn union(parts: impl IntoIterator<Item = Geometry>) -> Self {
        Self::new(SetOperation::Union, parts.into_iter().map(|g| (g, false)).collect())
    }

    /// Intersection of plain shapes.
    pub fn intersection(parts: impl IntoIterator<Item = Geometry>) -> Self {
        Self::new(SetOperation::Intersection, parts.into_iter().map(|g| (g, false)).collect())
    }

    /// Everything outside `geometry`.
    pub fn complementary(geometry: Geometry) -> Self {
        Self::new(SetOperation::Union, vec![(geometry, true)])
    }

    /// `minuend` minus `subtrahend`.
    pub fn difference(minuend: Geometry, subtrahend: Geometry) -> Self {
        Self::new(SetOperation::Intersection, vec![(minuend, false), (subtrahend, true)])
    }

    /// How the parts combine.
    #[inline]
    pub fn operation(&self) -> SetOperation {
        self.operation
    }

    /// `(shape, negate)` parts in insertion order.
    #[inline]
    pub fn parts(&self) -> &[(Geometry, bool)] {
        &self.parts
    }

    /// Point membership.
    pub fn contains(&self, point: Vector) -> bool {
        let member = |(geometry, negate): &(Geometry, bool)| geometry.contains(point) != *negate;
        match self.operation {
            SetOperation::Union => self.parts.iter().any(member),
            SetOperation::Intersection => !self.parts.is_empty() && self.parts.iter().all(member),
        }
    }

    /// Whether `other` meets the set.
    ///
    /// Unions test part by part (a negated part meets `other` unless it
    /// covers it). Intersections are searched for a common point: every
    /// region of the set clipped to `other` has its corners among the
    /// vertices and boundary crossings of the shapes involved, and its
    /// inside reaches the midpoint of two such corners.
    pub fn has_intersection_with(&self, other: &Geometry) -> bool {
        match self.operation {
            SetOperation::Union => self.parts.iter().any(|(geometry, negate)| {
                if *negate {
                    !geometry.covers(other)
                } else {
                    geometry.has_intersection_with(other)
                }
            }),
            SetOperation::Intersection => self.intersection_meets(other),
        }
    }

    fn intersection_meets(&self, other: &Geometry) -> bool {
        if self.parts.is_empty() || matches!(other, Geometry::Triangle(t) if t.is_empty()) {
            return false;
        }
        if self.parts.iter().any(|(geometry, negate)| !negate && !geometry.has_intersection_with(other)) {
            return false;
        }

        let member = |point: Vector| other.contains(point) && self.contains(point);
        let candidates = self.candidate_points(other);
        if candidates.iter().any(|p| member(*p)) {
            return true;
        }

        candidates
            .iter()
            .enumerate()
            .any(|(i, a)| candidates[i + 1..].iter().any(|b| member((*a + *b) * FixedSingle::HALF)))
    }

    /// Vertices of `other` and of every part, plus all boundary crossings.
    fn candidate_points(&self, other: &Geometry) -> Vec<Vector> {
        let shapes: Vec<&Geometry> = std::iter::once(other).chain(self.parts.iter().map(|(g, _)| g)).collect();

        let mut points: Vec<Vector> = shapes.iter().flat_map(|g| g.vertices()).collect();
        let edges: Vec<LineSegment> = shapes.iter().flat_map(|g| g.edges()).collect();
        for (i, a) in edges.iter().enumerate() {
            for b in &edges[i + 1..] {
                match a.intersection(b) {
                    SegmentIntersection::Empty => {}
                    SegmentIntersection::Point(p) => points.push(p),
                    SegmentIntersection::Segment(s) => points.extend([s.start, s.end]),
                }
            }
        }

        points.sort_by_key(|p| (p.x, p.y));
        points.dedup();
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: i32, top: i32, width: i32, height: i32) -> Geometry {
        Geometry::Box(Aabb::from_size(
            Vector::from_ints(left, top),
            FixedSingle::from_int(width),
            FixedSingle::from_int(height),
        ))
    }

    #[test]
    fn test_contains_union_and_intersection() {
        let a = rect(0, 0, 10, 10);
        let b = rect(5, 5, 10, 10);
        let union = GeometrySet::union([a, b]);
        let inter = GeometrySet::intersection([a, b]);
        let diff = GeometrySet::difference(a, b);

        let p = Vector::from_ints(2, 2);
        let q = Vector::from_ints(7, 7);
        assert!(union.contains(p) && union.contains(q));
        assert!(!inter.contains(p) && inter.contains(q));
        assert!(diff.contains(p) && !diff.contains(q));
        assert!(GeometrySet::complementary(a).contains(Vector::from_ints(20, 20)));
    }

    #[test]
    fn test_union_intersection_query() {
        let set = GeometrySet::union([rect(0, 0, 4, 4), rect(20, 20, 4, 4)]);
        assert!(set.has_intersection_with(&rect(21, 21, 1, 1)));
        assert!(!set.has_intersection_with(&rect(10, 10, 1, 1)));

        let outside = GeometrySet::complementary(rect(0, 0, 10, 10));
        assert!(!outside.has_intersection_with(&rect(2, 2, 2, 2)));
        assert!(outside.has_intersection_with(&rect(8, 8, 4, 4)));
    }

    #[test]
    fn test_box_intersection_query() {
        let set = GeometrySet::intersection([rect(0, 0, 10, 10), rect(5, 5, 10, 10)]);
        assert!(set.has_intersection_with(&rect(6, 6, 1, 1)));
        assert!(!set.has_intersection_with(&rect(0, 0, 2, 2)));

        let disjoint = GeometrySet::intersection([rect(0, 0, 2, 2), rect(5, 5, 2, 2)]);
        assert!(!disjoint.has_intersection_with(&rect(0, 0, 10, 10)));
    }

    #[test]
    fn test_difference_query() {
        let ring = GeometrySet::difference(rect(0, 0, 10, 10), rect(2, 2, 2, 2));
        assert!(ring.has_intersection_with(&rect(0, 0, 1, 1)));
        assert!(ring.has_intersection_with(&rect(3, 3, 4, 4)));
        // entirely inside the hole
        assert!(!ring.has_intersection_with(&rect(2, 2, 2, 2)));
        assert!(!ring.has_intersection_with(&Geometry::Point(Vector::from_ints(3, 3))));
        assert!(!ring.has_intersection_with(&rect(20, 20, 2, 2)));
    }

    #[test]
    fn test_swept_parallelogram_set_query() {
        // p0 (0, 0), p1 (8, 0), p2 (16, 16), p3 (8, 16)
        let sweep = Parallelogram::setup_horizontal(Vector::NULL, Vector::from_ints(8, 16), FixedSingle::from_int(8));
        let set = sweep.as_geometry_set();
        assert_eq!(set.parts().len(), 3);

        let cases = [
            (rect(6, 6, 4, 4), true),
            (rect(0, 4, 4, 2), true),
            (rect(0, 12, 2, 2), false),
            (rect(14, 0, 4, 4), false),
            (rect(20, 0, 4, 4), false),
        ];
        for (probe, expected) in cases {
            assert_eq!(set.has_intersection_with(&probe), expected, "{probe:?}");
            let Geometry::Box(aabb) = probe else { unreachable!() };
            assert_eq!(sweep.has_intersection_with_box(&aabb), expected, "{probe:?}");
        }
    }

    #[test]
    fn test_convex_intersection_mixed_shapes() {
        let triangle = Geometry::Triangle(RightTriangle::new(
            Vector::from_ints(16, 8),
            FixedSingle::from_int(-16),
            FixedSingle::from_int(-8),
        ));
        let segment = Geometry::Segment(LineSegment::new(Vector::from_ints(0, 0), Vector::from_ints(16, 8)));
        assert!(triangle.has_intersection_with(&segment));
        assert!(segment.has_intersection_with(&triangle));
        assert!(!triangle.has_intersection_with(&Geometry::Point(Vector::from_ints(1, 1))));
        assert!(!Geometry::Triangle(RightTriangle::EMPTY).has_intersection_with(&rect(-1, -1, 2, 2)));
    }
}
