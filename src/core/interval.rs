//! One-dimensional intervals with independently open or closed endpoints.
//!
//! Boxes use a pair of intervals (one per axis) for containment and
//! overlap, so that half-open boxes (`[left, right) x [top, bottom)`) never
//! register contact with a neighbour that merely shares an edge.

use serde::{Deserialize, Serialize};

use super::fixed::FixedSingle;

/// 1D range `start..end` with per-endpoint closedness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Lower endpoint
    pub start: FixedSingle,
    /// Upper endpoint
    pub end: FixedSingle,
    /// Whether `start` belongs to the interval
    pub closed_start: bool,
    /// Whether `end` belongs to the interval
    pub closed_end: bool,
}

impl Interval {
    /// Create an interval, swapping endpoints (and their closedness) if needed.
    pub fn new(start: FixedSingle, end: FixedSingle, closed_start: bool, closed_end: bool) -> Self {
        if start <= end {
            Self { start, end, closed_start, closed_end }
        } else {
            Self {
                start: end,
                end: start,
                closed_start: closed_end,
                closed_end: closed_start,
            }
        }
    }

    /// `[start, end]`
    pub fn closed(start: FixedSingle, end: FixedSingle) -> Self {
        Self::new(start, end, true, true)
    }

    /// `(start, end)`
    pub fn open(start: FixedSingle, end: FixedSingle) -> Self {
        Self::new(start, end, false, false)
    }

    /// `[start, end)`
    pub fn closed_open(start: FixedSingle, end: FixedSingle) -> Self {
        Self::new(start, end, true, false)
    }

    /// Length of the range (ignores closedness).
    #[inline]
    pub fn length(&self) -> FixedSingle {
        self.end - self.start
    }

    /// True when no value belongs to the interval.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end && !(self.closed_start && self.closed_end)
    }

    /// Whether `value` lies in the interval.
    pub fn contains(&self, value: FixedSingle) -> bool {
        let above_start = if self.closed_start {
            value >= self.start
        } else {
            value > self.start
        };
        let below_end = if self.closed_end {
            value <= self.end
        } else {
            value < self.end
        };
        above_start && below_end
    }

    /// Common part of two intervals, `None` when disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let (start, closed_start) = match self.start.cmp(&other.start) {
            std::cmp::Ordering::Greater => (self.start, self.closed_start),
            std::cmp::Ordering::Less => (other.start, other.closed_start),
            std::cmp::Ordering::Equal => (self.start, self.closed_start && other.closed_start),
        };
        let (end, closed_end) = match self.end.cmp(&other.end) {
            std::cmp::Ordering::Less => (self.end, self.closed_end),
            std::cmp::Ordering::Greater => (other.end, other.closed_end),
            std::cmp::Ordering::Equal => (self.end, self.closed_end && other.closed_end),
        };

        if start < end || (start == end && closed_start && closed_end) {
            Some(Self { start, end, closed_start, closed_end })
        } else {
            None
        }
    }

    /// Whether the two intervals share at least one value.
    #[inline]
    pub fn is_overlapping(&self, other: &Self) -> bool {
        self.intersection(other).is_some()
    }
}
