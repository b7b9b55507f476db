//! Obstacle placements recorded by checkers.

use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, RightTriangle};
use crate::world::CollisionData;

/// Shape of the obstacle that contributed a flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Cell or actor hitbox
    Box(Aabb),
    /// Slope wedge in world coordinates
    Slope(RightTriangle),
}

/// One obstacle touched by a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPlacement {
    /// Tag of the obstacle
    pub collision_data: CollisionData,
    /// Where it is
    pub obstacle: Obstacle,
}

impl CollisionPlacement {
    /// Placement of a box obstacle (a full cell or an actor).
    #[inline]
    pub fn with_box(collision_data: CollisionData, obstacle: Aabb) -> Self {
        Self { collision_data, obstacle: Obstacle::Box(obstacle) }
    }

    /// Placement of a slope wedge in world coordinates.
    #[inline]
    pub fn with_slope(collision_data: CollisionData, obstacle: RightTriangle) -> Self {
        Self { collision_data, obstacle: Obstacle::Slope(obstacle) }
    }

    /// Obstacle box, `EMPTY` for slopes.
    pub fn obstacle_box(&self) -> Aabb {
        match self.obstacle {
            Obstacle::Box(b) => b,
            Obstacle::Slope(_) => Aabb::EMPTY,
        }
    }

    /// Obstacle wedge, `EMPTY` for boxes.
    pub fn obstacle_slope(&self) -> RightTriangle {
        match self.obstacle {
            Obstacle::Box(_) => RightTriangle::EMPTY,
            Obstacle::Slope(t) => t,
        }
    }
}

/// Any placement tagged `data`.
pub fn has_placement(placements: &[CollisionPlacement], data: CollisionData) -> bool {
    placements.iter().any(|p| p.collision_data == data)
}

/// Any placement tagged with one of `data`.
pub fn has_placements(placements: &[CollisionPlacement], data: &[CollisionData]) -> bool {
    placements.iter().any(|p| data.contains(&p.collision_data))
}

/// A placement tagged `data` and none tagged with anything in `exclude`.
pub fn has_placement_and_not_other_placements(
    placements: &[CollisionPlacement],
    data: CollisionData,
    exclude: &[CollisionData],
) -> bool {
    let mut found = false;
    for placement in placements {
        if placement.collision_data == data {
            found = true;
        } else if exclude.contains(&placement.collision_data) {
            return false;
        }
    }
    found
}

/// At least one placement, all tagged `data`.
pub fn has_only_placement(placements: &[CollisionPlacement], data: CollisionData) -> bool {
    !placements.is_empty() && placements.iter().all(|p| p.collision_data == data)
}

/// At least one placement, all tagged with something in `data`.
pub fn has_only_placements(placements: &[CollisionPlacement], data: &[CollisionData]) -> bool {
    !placements.is_empty() && placements.iter().all(|p| data.contains(&p.collision_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::FixedSingle;
    use crate::core::vector::Vector;

    fn cell(data: CollisionData) -> CollisionPlacement {
        let size = FixedSingle::from_int(16);
        CollisionPlacement::with_box(data, Aabb::from_size(Vector::NULL, size, size))
    }

    #[test]
    fn test_obstacle_accessors() {
        let b = cell(CollisionData::SOLID);
        assert_eq!(b.obstacle_slope(), RightTriangle::EMPTY);
        assert!(b.obstacle_box().is_valid());

        let t = RightTriangle::new(Vector::from_ints(16, 8), FixedSingle::from_int(-16), FixedSingle::from_int(-8));
        let s = CollisionPlacement::with_slope(CollisionData::SLOPE_8_0, t);
        assert_eq!(s.obstacle_slope(), t);
        assert_eq!(s.obstacle_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_placement_queries() {
        let placements = [cell(CollisionData::SOLID), cell(CollisionData::LADDER)];

        assert!(has_placement(&placements, CollisionData::LADDER));
        assert!(!has_placement(&placements, CollisionData::WATER));
        assert!(has_placements(&placements, &[CollisionData::WATER, CollisionData::SOLID]));
        assert!(!has_placements(&placements, &[CollisionData::WATER]));

        assert!(has_placement_and_not_other_placements(&placements, CollisionData::SOLID, &[CollisionData::WATER]));
        assert!(!has_placement_and_not_other_placements(&placements, CollisionData::SOLID, &[CollisionData::LADDER]));

        assert!(!has_only_placement(&placements, CollisionData::SOLID));
        assert!(has_only_placement(&placements[..1], CollisionData::SOLID));
        assert!(has_only_placements(&placements, &[CollisionData::LADDER, CollisionData::SOLID]));
    }

    #[test]
    fn test_empty_placements() {
        assert!(!has_only_placement(&[], CollisionData::SOLID));
        assert!(!has_only_placements(&[], &[CollisionData::SOLID]));
        assert!(!has_placement_and_not_other_placements(&[], CollisionData::SOLID, &[]));
    }
}
