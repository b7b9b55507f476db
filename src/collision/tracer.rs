//! Sweeping Checker
//!
//! Moves a probe along a displacement until it would touch something that
//! blocks the move.
//!
//! The sweep advances in sub-steps (one map cell along the dominant axis in
//! coarse mode, one step in fine mode). Each sub-step tests the whole region
//! the probe covers while travelling it:
//!
//! ```text
//!   axis move:      +-----+.....+        union of start and end boxes
//!                   |     |     |
//!                   +-----+.....+
//!
//!   diagonal move:  +-----+              start box, end box and the two
//!                   |     |\             parallelograms swept by the
//!                   +-----+ \+-----+     leading sides
//!                    \       |     |
//!                     \......+-----+
//! ```
//!
//! Regions are slightly larger than the exact sweep, so a region hit is only
//! a hint: the sub-step is then walked step by step, once for box obstacles
//! and once for slopes, and the nearest blocking position wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PhysicsConfig;
use crate::core::fixed::FixedSingle;
use crate::core::vector::{Direction, Vector};
use crate::geometry::{Aabb, Parallelogram, RightTriangle};
use crate::world::CollisionWorld;

use super::checker::{bounded_delta, scale_vector, CheckerState, CollisionChecker, Probe};
use super::flags::CollisionFlags;

/// Sub-step granularity of a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SweepMode {
    /// One `coarse_sweep_step` per region test
    #[default]
    Coarse,
    /// One `step_size` per region test
    Fine,
}

/// Checker that sweeps its probe to the nearest contact.
#[derive(Clone, Debug)]
pub struct TracerCollisionChecker {
    state: CheckerState,
}

impl Default for TracerCollisionChecker {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl CollisionChecker for TracerCollisionChecker {
    #[inline]
    fn state(&self) -> &CheckerState {
        &self.state
    }

    #[inline]
    fn state_mut(&mut self) -> &mut CheckerState {
        &mut self.state
    }
}

/// Position along a bounded sweep, parameterised by distance along the
/// dominant axis.
struct SweepPath {
    delta: Vector,
    bound: FixedSingle,
    bits: u32,
}

impl SweepPath {
    fn offset_at(&self, distance: FixedSingle) -> Vector {
        if distance >= self.bound {
            return self.delta;
        }
        if distance <= FixedSingle::ZERO {
            return Vector::NULL;
        }
        scale_vector(self.delta, distance, self.bound).trunc_frac_part(self.bits)
    }
}

impl TracerCollisionChecker {
    /// Tracer with an empty probe.
    pub fn new(config: PhysicsConfig) -> Self {
        Self { state: CheckerState::new(config) }
    }

    /// Sweep the probe by `delta`, travelling at most `max_distance` along
    /// the dominant axis.
    ///
    /// On contact the probe ends at the last free position and the flags of
    /// the first blocking position are returned. Without contact the probe
    /// moves by the whole bounded delta and the result is `NONE`.
    pub fn move_contact_solid<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        delta: Vector,
        max_distance: FixedSingle,
        mode: SweepMode,
    ) -> CollisionFlags {
        let direction = delta.direction();
        if direction.is_empty() {
            return CollisionFlags::NONE;
        }

        let config = self.state.config;
        let length = delta.x.abs().max(delta.y.abs());
        let bound = length.min(max_distance);
        if bound <= FixedSingle::ZERO {
            return CollisionFlags::NONE;
        }

        let path = SweepPath {
            delta: bounded_delta(delta, max_distance),
            bound,
            bits: config.trunc_frac_bits,
        };
        let sub_step = match mode {
            SweepMode::Coarse => config.coarse_sweep_step,
            SweepMode::Fine => config.step_size,
        };

        let start = self.state.probe;
        let mut travelled = FixedSingle::ZERO;
        while travelled < bound {
            let next = (travelled + sub_step).min(bound);

            if self.region_blocks(world, &start, path.offset_at(travelled), path.offset_at(next), direction) {
                if let Some(contact) = self.refine(world, &start, &path, travelled, next, direction) {
                    let hit = start.translate(path.offset_at(contact.hit));
                    let flags = self.state.evaluate_at(world, hit);
                    self.state.probe = start.translate(path.offset_at(contact.free));

                    debug!(?direction, distance = %contact.free, ?flags, "sweep contact");
                    return flags;
                }
            }

            travelled = next;
        }

        self.state.probe = start.translate(path.delta);
        self.state.placements.clear();
        self.state.slope_triangle = RightTriangle::EMPTY;
        CollisionFlags::NONE
    }

    /// Horizontal sweep bounded by `|dx|`.
    pub fn move_contact_solid_horizontal<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        dx: FixedSingle,
    ) -> CollisionFlags {
        self.move_contact_solid(world, Vector::new(dx, FixedSingle::ZERO), dx.abs(), SweepMode::Coarse)
    }

    /// Vertical sweep bounded by `|dy|`.
    pub fn move_contact_solid_vertical<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        dy: FixedSingle,
    ) -> CollisionFlags {
        self.move_contact_solid(world, Vector::new(FixedSingle::ZERO, dy), dy.abs(), SweepMode::Coarse)
    }

    /// Whether anything in the region covered between `from` and `to` can
    /// block the move. Probes other than boxes always report a hit.
    fn region_blocks<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        start: &Probe,
        from: Vector,
        to: Vector,
        direction: Direction,
    ) -> bool {
        let Probe::Box(start_box) = start else {
            return true;
        };

        // floored probe origins sit up to one pixel left/up of the exact path
        let first = (*start_box + from).clip_left(-FixedSingle::ONE).clip_top(-FixedSingle::ONE);
        let travel = to - from;
        let last = first + travel;

        if travel.x.is_zero() || travel.y.is_zero() {
            return self
                .state
                .evaluate_at(world, Probe::Area(first | last))
                .can_block_the_move(direction);
        }

        let regions = [
            Probe::Area(first),
            Probe::Area(last),
            Probe::Parallelogram(leading_vertical_side(&first, travel)),
            Probe::Parallelogram(leading_horizontal_side(&first, travel)),
        ];

        regions
            .into_iter()
            .any(|region| self.state.evaluate_at(world, region).can_block_the_move(direction))
    }

    /// Step through `(travelled, next]` and find the first blocking sample,
    /// walking box obstacles and slopes separately.
    fn refine<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        start: &Probe,
        path: &SweepPath,
        travelled: FixedSingle,
        next: FixedSingle,
        direction: Direction,
    ) -> Option<Contact> {
        let step = self.state.config.step_size;
        let sample = |k: i32| -> FixedSingle {
            if k == 0 {
                travelled
            } else {
                (travelled + step * k).min(next)
            }
        };

        let mut nearest: Option<i32> = None;
        for ignore in [CollisionFlags::SLOPE, CollisionFlags::NON_SLOPE] {
            let mut k = 1;
            loop {
                if nearest.is_some_and(|n| k >= n) {
                    break;
                }
                let distance = sample(k);
                let probe = start.translate(path.offset_at(distance));
                if self
                    .state
                    .evaluate_ignoring(world, probe, ignore)
                    .can_block_the_move(direction)
                {
                    nearest = Some(k);
                    break;
                }
                if distance >= next {
                    break;
                }
                k += 1;
            }
        }

        nearest.map(|k| Contact { hit: sample(k), free: sample(k - 1) })
    }
}

struct Contact {
    hit: FixedSingle,
    free: FixedSingle,
}

/// Sweep of the side facing the horizontal part of `travel`.
fn leading_vertical_side(b: &Aabb, travel: Vector) -> Parallelogram {
    let x = if travel.x > FixedSingle::ZERO { b.right() } else { b.left() };
    Parallelogram::setup_vertical(Vector::new(x, b.top()), travel, b.height())
}

/// Sweep of the side facing the vertical part of `travel`.
fn leading_horizontal_side(b: &Aabb, travel: Vector) -> Parallelogram {
    let y = if travel.y > FixedSingle::ZERO { b.bottom() } else { b.top() };
    Parallelogram::setup_horizontal(Vector::new(b.left(), y), travel, b.width())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Cell, CollisionData, TileMap};

    fn fx(value: i32) -> FixedSingle {
        FixedSingle::from_int(value)
    }

    fn square(left: i32, top: i32, size: i32) -> Aabb {
        Aabb::from_size(Vector::from_ints(left, top), fx(size), fx(size))
    }

    /// 8x8 cells, solid column at col 4 and solid floor at row 6.
    fn walled_map() -> TileMap {
        let mut map = TileMap::new(8, 8).unwrap();
        for row in 0..8 {
            map.set_collision_data(Cell::new(row, 4), CollisionData::SOLID);
        }
        for col in 0..8 {
            map.set_collision_data(Cell::new(6, col), CollisionData::SOLID);
        }
        map
    }

    fn tracer(test_box: Aabb) -> TracerCollisionChecker {
        let mut tracer = TracerCollisionChecker::default();
        tracer.setup_box(test_box, CollisionFlags::NONE, true, false, true);
        tracer
    }

    #[test]
    fn test_horizontal_sweep_stops_at_wall() {
        let map = walled_map();
        let mut checker = tracer(square(10, 20, 8));

        let flags = checker.move_contact_solid_horizontal(&map, fx(100));
        assert_eq!(flags, CollisionFlags::BLOCK);
        assert_eq!(checker.test_box(), square(56, 20, 8));
        assert!(checker.has_only_placement(CollisionData::SOLID));
    }

    #[test]
    fn test_fine_and_coarse_agree() {
        let map = walled_map();
        for mode in [SweepMode::Coarse, SweepMode::Fine] {
            let mut checker = tracer(square(10, 20, 8));
            checker.move_contact_solid(&map, Vector::from_ints(60, 0), fx(60), mode);
            assert_eq!(checker.test_box(), square(56, 20, 8), "{mode:?}");
        }
    }

    #[test]
    fn test_free_sweep_moves_full_bounded_delta() {
        let map = walled_map();
        let mut checker = tracer(square(10, 20, 8));

        let flags = checker.move_contact_solid(&map, Vector::from_ints(30, 0), fx(12), SweepMode::Coarse);
        assert_eq!(flags, CollisionFlags::NONE);
        assert_eq!(checker.test_box(), square(22, 20, 8));
    }

    #[test]
    fn test_vertical_sweep_lands_on_floor() {
        let map = walled_map();
        let mut checker = tracer(square(10, 20, 8));

        let flags = checker.move_contact_solid_vertical(&map, fx(200));
        assert_eq!(flags, CollisionFlags::BLOCK);
        assert_eq!(checker.test_box(), square(10, 88, 8));

        let flags = checker.move_contact_solid_vertical(&map, fx(-10));
        assert_eq!(flags, CollisionFlags::NONE);
        assert_eq!(checker.test_box(), square(10, 78, 8));
    }

    #[test]
    fn test_diagonal_sweep_hits_corner() {
        let map = walled_map();
        let mut checker = tracer(square(50, 80, 8));

        let flags = checker.move_contact_solid(&map, Vector::from_ints(16, 16), fx(16), SweepMode::Coarse);
        assert_eq!(flags, CollisionFlags::BLOCK);
        assert_eq!(checker.test_box(), square(56, 86, 8));
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let map = walled_map();
        let mut checker = tracer(square(10, 20, 8));

        assert_eq!(checker.move_contact_solid(&map, Vector::NULL, fx(10), SweepMode::Fine), CollisionFlags::NONE);
        assert_eq!(
            checker.move_contact_solid(&map, Vector::from_ints(5, 0), FixedSingle::ZERO, SweepMode::Fine),
            CollisionFlags::NONE
        );
        assert_eq!(checker.test_box(), square(10, 20, 8));
    }

    #[test]
    fn test_slope_stops_downward_sweep() {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 1), CollisionData::SLOPE_8_0);
        let mut checker = tracer(Aabb::from_size(Vector::from_ints(20, 0), fx(4), fx(1)));

        let flags = checker.move_contact_solid_vertical(&map, fx(64));
        assert_eq!(flags, CollisionFlags::SLOPE);
        // hypotenuse from (16, 40) to (32, 32) passes (24, 36)
        assert_eq!(checker.test_box().bottom(), fx(35));
        assert_eq!(checker.slope_triangle().hypotenuse_y_at(fx(24)), fx(36));
    }
}
