//! Fixed-point 2D geometry.
//!
//! Points, segments, boxes, right triangles, swept parallelograms and
//! boolean sets of them. Every predicate is exact on the raw fixed-point
//! values.

pub mod aabb;
pub mod parallelogram;
pub mod segment;
pub mod set;
pub mod triangle;

pub use aabb::{Aabb, BoxSide, OriginPosition};
pub use parallelogram::Parallelogram;
pub use segment::{LineSegment, SegmentIntersection};
pub use set::{Geometry, GeometrySet, SetOperation};
pub use triangle::{RightTriangle, RightTriangleSide};
