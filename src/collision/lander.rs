//! Landing Checker
//!
//! Decides whether a box rests on something it can stand on. The bottom
//! row of the box is split into a left and a right half, each probed one
//! step below its resting position:
//!
//! ```text
//!        +-----------+
//!        |    box    |
//!        +-----+-----+  <- bottom row (undisplaced halves)
//!        |  L  |  R  |  <- halves displaced one step down
//!        +-----+-----+
//! ```
//!
//! The two results merge into one of `BLOCK`, `SLOPE`, `TOP_LADDER` or
//! `NONE`. A non-slope floor under one half wins over a slope under the
//! other; when both halves stand on slopes the left triangle is reported.

use tracing::debug;

use crate::config::PhysicsConfig;
use crate::core::fixed::FixedSingle;
use crate::core::vector::{Direction, Vector};
use crate::geometry::RightTriangle;
use crate::world::CollisionWorld;

use super::checker::{CheckerState, CollisionChecker, PixelCollisionChecker, Probe};
use super::flags::CollisionFlags;

/// Flags of the empty half carried into a one-sided slope result.
const SLOPE_MODIFIERS: CollisionFlags = CollisionFlags::WATER.union(CollisionFlags::WATER_SURFACE);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Half {
    Left,
    Right,
}

/// Checker answering "is this box landed, and on what".
#[derive(Clone, Debug)]
pub struct LanderCollisionChecker {
    state: CheckerState,
    left: PixelCollisionChecker,
    right: PixelCollisionChecker,
    left_resting: PixelCollisionChecker,
    right_resting: PixelCollisionChecker,
}

impl Default for LanderCollisionChecker {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl CollisionChecker for LanderCollisionChecker {
    #[inline]
    fn state(&self) -> &CheckerState {
        &self.state
    }

    #[inline]
    fn state_mut(&mut self) -> &mut CheckerState {
        &mut self.state
    }
}

impl LanderCollisionChecker {
    /// Lander with an empty probe.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            state: CheckerState::new(config),
            left: PixelCollisionChecker::new(config),
            right: PixelCollisionChecker::new(config),
            left_resting: PixelCollisionChecker::new(config),
            right_resting: PixelCollisionChecker::new(config),
        }
    }

    /// Landed state of the probe's bounds.
    ///
    /// Placements and the slope triangle of the chosen half (or halves)
    /// become this checker's placements and slope.
    pub fn compute_landed_state<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        self.state.placements.clear();
        self.state.slope_triangle = RightTriangle::EMPTY;

        let config = self.state.config;
        let test_box = self.state.probe.bounding_box().round_origin_to_floor();
        let bottom = test_box.clip_top(test_box.height() - config.mask_size);
        let displaced = bottom + Vector::DOWN * config.step_size;

        self.left.state_mut().setup_like(&self.state, Probe::Box(displaced.half_left()));
        self.right.state_mut().setup_like(&self.state, Probe::Box(displaced.half_right()));

        let left = self.left.get_collision_flags(world);
        let right = self.right.get_collision_flags(world);
        let left_blocks = left.can_block_the_move(Direction::DOWN);
        let right_blocks = right.can_block_the_move(Direction::DOWN);

        if !left_blocks && !right_blocks {
            return CollisionFlags::NONE;
        }

        let result = match (left.is_slope(), right.is_slope()) {
            (false, false) => {
                if !left_blocks {
                    self.accept(Half::Right, false);
                    right
                } else if !right_blocks {
                    self.accept(Half::Left, false);
                    left
                } else {
                    self.accept(Half::Left, false);
                    self.accept(Half::Right, false);
                    left | right
                }
            }
            (false, true) => {
                if left_blocks {
                    self.accept(Half::Left, false);
                    left
                } else {
                    let resting = self.rest_on_slope(world, Half::Right, bottom.half_right());
                    self.accept_slope(Half::Right, resting, left, |slope| slope.h_cathetus_sign() > 0)
                }
            }
            (true, false) => {
                if right_blocks {
                    self.accept(Half::Right, false);
                    right
                } else {
                    let resting = self.rest_on_slope(world, Half::Left, bottom.half_left());
                    self.accept_slope(Half::Left, resting, right, |slope| slope.h_cathetus_sign() < 0)
                }
            }
            (true, true) => {
                let left_resting = self.rest_on_slope(world, Half::Left, bottom.half_left());
                let right_resting = self.rest_on_slope(world, Half::Right, bottom.half_right());
                let slope = self.accept(Half::Left, left_resting);
                self.accept(Half::Right, right_resting);
                self.state.slope_triangle = slope;
                left | right
            }
        };

        debug!(?left, ?right, ?result, "landed state");
        result
    }

    /// Probe the undisplaced half; true when it already touches a slope.
    fn rest_on_slope<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        half: Half,
        resting_box: crate::geometry::Aabb,
    ) -> bool {
        let checker = match half {
            Half::Left => &mut self.left_resting,
            Half::Right => &mut self.right_resting,
        };
        checker.state_mut().setup_like(&self.state, Probe::Box(resting_box));
        checker.get_collision_flags(world).is_slope()
    }

    /// Take the placements of one half; returns its slope triangle.
    fn accept(&mut self, half: Half, resting: bool) -> RightTriangle {
        let source = match (half, resting) {
            (Half::Left, false) => &self.left,
            (Half::Left, true) => &self.left_resting,
            (Half::Right, false) => &self.right,
            (Half::Right, true) => &self.right_resting,
        };
        self.state.placements.extend_from_slice(source.placements());
        source.slope_triangle()
    }

    /// Take a lone slope under `half` if it rises toward the other half.
    fn accept_slope(
        &mut self,
        half: Half,
        resting: bool,
        other: CollisionFlags,
        faces_probe: fn(&RightTriangle) -> bool,
    ) -> CollisionFlags {
        let source = match (half, resting) {
            (Half::Left, false) => &self.left,
            (Half::Left, true) => &self.left_resting,
            (Half::Right, false) => &self.right,
            (Half::Right, true) => &self.right_resting,
        };
        if !faces_probe(&source.slope_triangle()) {
            return CollisionFlags::NONE;
        }
        self.state.slope_triangle = self.accept(half, resting);
        (other & SLOPE_MODIFIERS) | CollisionFlags::SLOPE
    }

    fn descend_until<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        max_distance: FixedSingle,
        landed: fn(CollisionFlags) -> bool,
    ) -> bool {
        let step = self.state.config.step_size;
        let mut distance = FixedSingle::ZERO;
        loop {
            if landed(self.compute_landed_state(world)) {
                return true;
            }
            if distance + step > max_distance {
                return false;
            }
            self.state.probe = self.state.probe.translate(Vector::DOWN * step);
            distance += step;
        }
    }

    /// Move the probe down until landed, at most `max_distance`. The probe
    /// stays where the descent stopped.
    pub fn move_contact_floor<W: CollisionWorld + ?Sized>(&mut self, world: &W, max_distance: FixedSingle) -> bool {
        self.descend_until(world, max_distance, |flags| flags.can_block_the_move(Direction::DOWN))
    }

    /// Like [`move_contact_floor`](Self::move_contact_floor), but the probe
    /// goes back to its start when no floor is found.
    pub fn try_move_contact_floor<W: CollisionWorld + ?Sized>(&mut self, world: &W, max_distance: FixedSingle) -> bool {
        let start = self.state.probe;
        let found = self.move_contact_floor(world, max_distance);
        if !found {
            self.state.probe = start;
        }
        found
    }

    /// Move the probe down until it lands on a slope; restores it otherwise.
    pub fn try_move_contact_slope<W: CollisionWorld + ?Sized>(&mut self, world: &W, max_distance: FixedSingle) -> bool {
        let start = self.state.probe;
        let found = self.descend_until(world, max_distance, CollisionFlags::is_slope);
        if !found {
            self.state.probe = start;
        }
        found
    }

    /// Lift a landed probe step by step while it stays landed, then settle
    /// on the last landed position. Returns false (probe unchanged) when the
    /// probe is not landed or is still landed after `max_distance`.
    pub fn adjust_on_the_floor<W: CollisionWorld + ?Sized>(&mut self, world: &W, max_distance: FixedSingle) -> bool {
        if !self.compute_landed_state(world).can_block_the_move(Direction::DOWN) {
            return false;
        }

        let step = self.state.config.step_size;
        let start = self.state.probe;
        let mut distance = FixedSingle::ZERO;
        while distance <= max_distance {
            self.state.probe = self.state.probe.translate(Vector::UP * step);
            if !self.compute_landed_state(world).can_block_the_move(Direction::DOWN) {
                self.state.probe = self.state.probe.translate(Vector::DOWN * step);
                return true;
            }
            distance += step;
        }

        self.state.probe = start;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::world::{make_slope_triangle, Cell, CollisionData, TileMap};

    fn fx(value: i32) -> FixedSingle {
        FixedSingle::from_int(value)
    }

    fn square(left: i32, top: i32, size: i32) -> Aabb {
        Aabb::from_size(Vector::from_ints(left, top), fx(size), fx(size))
    }

    fn lander(map: &TileMap, test_box: Aabb) -> (LanderCollisionChecker, CollisionFlags) {
        let mut lander = LanderCollisionChecker::default();
        lander.setup_box(test_box, CollisionFlags::NONE, true, false, true);
        let flags = lander.compute_landed_state(map);
        (lander, flags)
    }

    /// 4x4 cells with a solid floor on the last row.
    fn floor_map() -> TileMap {
        let mut map = TileMap::new(4, 4).unwrap();
        for col in 0..4 {
            map.set_collision_data(Cell::new(3, col), CollisionData::SOLID);
        }
        map
    }

    #[test]
    fn test_flat_floor_records_both_halves() {
        let (lander, flags) = lander(&floor_map(), square(4, 40, 8));
        assert_eq!(flags, CollisionFlags::BLOCK);
        assert_eq!(lander.placements().len(), 2);
    }

    #[test]
    fn test_airborne_is_none() {
        let (lander, flags) = lander(&floor_map(), square(4, 20, 8));
        assert_eq!(flags, CollisionFlags::NONE);
        assert!(lander.placements().is_empty());
    }

    #[test]
    fn test_ledge_under_right_half_only() {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(3, 1), CollisionData::SOLID);

        let (lander, flags) = lander(&map, square(10, 40, 8));
        assert_eq!(flags, CollisionFlags::BLOCK);
        assert_eq!(lander.placements().len(), 1);
        assert_eq!(lander.placements()[0].obstacle_box(), square(16, 48, 16));
    }

    #[test]
    fn test_top_ladder_counts_as_floor() {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(3, 0), CollisionData::TOP_LADDER);

        let (_, flags) = lander(&map, square(4, 40, 8));
        assert_eq!(flags, CollisionFlags::TOP_LADDER);
    }

    /// 32px wide box whose bottom row lies at y 44.
    fn wide_box() -> Aabb {
        Aabb::from_size(Vector::from_ints(8, 37), fx(32), fx(8))
    }

    #[test]
    fn test_two_slopes_report_left_triangle() {
        // pinned tie-break: with a slope under each half the left one wins
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 0), CollisionData::SLOPE_16_12);
        map.set_collision_data(Cell::new(2, 2), CollisionData::SLOPE_12_16);

        let (lander, flags) = lander(&map, wide_box());
        assert_eq!(flags, CollisionFlags::SLOPE);
        assert_eq!(lander.slope_triangle().origin, Vector::from_ints(16, 48));
        assert_eq!(lander.placements().len(), 2);
        assert_eq!(lander.placements()[0].collision_data, CollisionData::SLOPE_16_12);
        assert_eq!(lander.placements()[1].collision_data, CollisionData::SLOPE_12_16);
    }

    #[test]
    fn test_block_beats_slope() {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 0), CollisionData::SOLID);
        map.set_collision_data(Cell::new(2, 2), CollisionData::SLOPE_12_16);

        let (lander, flags) = lander(&map, wide_box());
        assert_eq!(flags, CollisionFlags::BLOCK);
        assert_eq!(lander.slope_triangle(), RightTriangle::EMPTY);
        assert!(lander.has_only_placement(CollisionData::SOLID));
    }

    #[test]
    fn test_slope_facing_away_is_ignored() {
        // left half only grazes the top corner of a wedge falling to the right
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 0), CollisionData::SLOPE_12_16);

        let (lander, flags) = lander(&map, Aabb::from_size(Vector::from_ints(-8, 37), fx(32), fx(8)));
        assert_eq!(flags, CollisionFlags::NONE);
        assert!(lander.placements().is_empty());
    }

    #[test]
    fn test_lone_slope_under_right_half_rising_left() {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 2), CollisionData::SLOPE_12_16);

        let (lander, flags) = lander(&map, wide_box());
        assert_eq!(flags, CollisionFlags::SLOPE);
        assert_eq!(lander.slope_triangle(), make_slope_triangle(12, 16) + Vector::from_ints(32, 32));
        assert_eq!(lander.slope_triangle().origin, Vector::from_ints(32, 48));
        assert!(lander.has_only_placement(CollisionData::SLOPE_12_16));
        assert_eq!(lander.placements().len(), 1);
    }

    #[test]
    fn test_lone_slope_under_left_half_rising_right() {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 0), CollisionData::SLOPE_16_12);

        let (lander, flags) = lander(&map, wide_box());
        assert_eq!(flags, CollisionFlags::SLOPE);
        assert_eq!(lander.slope_triangle(), make_slope_triangle(16, 12) + Vector::from_ints(0, 32));
        assert!(lander.has_only_placement(CollisionData::SLOPE_16_12));
        assert_eq!(lander.placements().len(), 1);
    }

    #[test]
    fn test_lone_slope_keeps_water_of_other_half() {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 0), CollisionData::WATER);
        map.set_collision_data(Cell::new(2, 2), CollisionData::SLOPE_12_16);

        let (lander, flags) = lander(&map, wide_box());
        assert_eq!(flags, CollisionFlags::SLOPE | CollisionFlags::WATER);
        assert!(lander.has_only_placement(CollisionData::SLOPE_12_16));
    }

    #[test]
    fn test_move_contact_floor() {
        let map = floor_map();
        let mut lander = LanderCollisionChecker::default();

        lander.setup_box(square(4, 20, 8), CollisionFlags::NONE, true, false, false);
        assert!(lander.move_contact_floor(&map, fx(30)));
        assert_eq!(lander.test_box(), square(4, 40, 8));

        lander.setup_box(square(4, 20, 8), CollisionFlags::NONE, true, false, false);
        assert!(!lander.try_move_contact_floor(&map, fx(10)));
        assert_eq!(lander.test_box(), square(4, 20, 8));

        assert!(!lander.move_contact_floor(&map, fx(10)));
        assert_eq!(lander.test_box(), square(4, 30, 8));

        assert!(!lander.try_move_contact_slope(&map, fx(30)));
        assert_eq!(lander.test_box(), square(4, 30, 8));
    }

    #[test]
    fn test_adjust_on_the_floor_lifts_embedded_box() {
        let map = floor_map();
        let mut lander = LanderCollisionChecker::default();

        lander.setup_box(square(4, 43, 8), CollisionFlags::NONE, true, false, false);
        assert!(lander.adjust_on_the_floor(&map, fx(8)));
        assert_eq!(lander.test_box(), square(4, 40, 8));

        lander.setup_box(square(4, 20, 8), CollisionFlags::NONE, true, false, false);
        assert!(!lander.adjust_on_the_floor(&map, fx(8)));
        assert_eq!(lander.test_box(), square(4, 20, 8));
    }
}
