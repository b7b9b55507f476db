//! Collision Checkers
//!
//! A checker holds one probe shape plus the query switches, and answers
//! "what does this probe touch" against a [`CollisionWorld`].
//!
//! ```text
//!   probe bounds ──► covered map cells (clamped) ──► per-cell test
//!        │                                              │
//!        └──────► actor index query ──► per-actor test ─┴──► OR of flags
//! ```
//!
//! Checkers are reused between queries; the placement list and the actor
//! scratch buffer live in the checker so a query does not allocate once
//! they have grown.
//!
//! # Determinism
//!
//! Cells are visited row-major and actors in id order, so placements come
//! out in the same order on every run.

use std::collections::BTreeSet;
use std::mem;

use serde::{Deserialize, Serialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::PhysicsConfig;
use crate::core::fixed::{FixedDouble, FixedSingle};
use crate::core::vector::{Direction, Vector};
use crate::geometry::{Aabb, Parallelogram, RightTriangle, RightTriangleSide};
use crate::world::{ActorId, Cell, CollisionData, CollisionWorld, Granularity, SolidActor};

use super::flags::CollisionFlags;
use super::placement::{self, CollisionPlacement};

// =============================================================================
// STEP VECTORS
// =============================================================================

/// Step of `step_size` along x in the direction of `dir`, with y scaled to
/// keep the slope.
pub fn get_step_vector_horizontal(dir: Vector, step_size: FixedSingle) -> Vector {
    let (dx, dy) = (dir.x, dir.y);

    if dx.is_zero() {
        return match dy.signum() {
            1 => Vector::DOWN * step_size,
            -1 => Vector::UP * step_size,
            _ => Vector::NULL,
        };
    }
    if dy.is_zero() {
        return if dx > FixedSingle::ZERO { Vector::RIGHT * step_size } else { Vector::LEFT * step_size };
    }

    let y = dy.to_double() * step_size.to_double() / dx.abs().to_double();
    Vector::new(step_size * dx.signum(), y.to_single())
}

/// Step of `step_size` along y in the direction of `dir`, with x scaled to
/// keep the slope.
pub fn get_step_vector_vertical(dir: Vector, step_size: FixedSingle) -> Vector {
    let (dx, dy) = (dir.x, dir.y);

    if dx.is_zero() {
        return match dy.signum() {
            1 => Vector::DOWN * step_size,
            -1 => Vector::UP * step_size,
            _ => Vector::NULL,
        };
    }
    if dy.is_zero() {
        return if dx > FixedSingle::ZERO { Vector::RIGHT * step_size } else { Vector::LEFT * step_size };
    }

    let x = dx.to_double() / dy.abs().to_double() * step_size.to_double();
    Vector::new(x.to_single(), step_size * dy.signum())
}

/// Step along the dominant axis of `dir`.
pub fn get_step_vector(dir: Vector, step_size: FixedSingle) -> Vector {
    if dir.x.abs() > dir.y.abs() {
        get_step_vector_horizontal(dir, step_size)
    } else {
        get_step_vector_vertical(dir, step_size)
    }
}

// =============================================================================
// PROBES
// =============================================================================

/// Shape tested against the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probe {
    /// Single point, half-open cell containment
    Point(Vector),
    /// Box, origin floored before testing, half-open overlap
    Box(Aabb),
    /// Box tested exactly as given (sweep regions)
    Area(Aabb),
    /// Swept side of a box, closed tests
    Parallelogram(Parallelogram),
}

impl Default for Probe {
    fn default() -> Self {
        Self::Box(Aabb::EMPTY)
    }
}

impl Probe {
    /// Same probe moved by `delta`.
    pub fn translate(&self, delta: Vector) -> Self {
        match self {
            Self::Point(p) => Self::Point(*p + delta),
            Self::Box(b) => Self::Box(*b + delta),
            Self::Area(b) => Self::Area(*b + delta),
            Self::Parallelogram(p) => Self::Parallelogram(p.translate(delta)),
        }
    }

    /// Axis-aligned bounds (zero-sized for points).
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Self::Point(p) => Aabb::from_size(*p, FixedSingle::ZERO, FixedSingle::ZERO),
            Self::Box(b) | Self::Area(b) => *b,
            Self::Parallelogram(p) => p.wrapping_box(),
        }
    }

    fn normalized(&self) -> Self {
        match self {
            Self::Box(b) => Self::Box(b.round_origin_to_floor()),
            other => *other,
        }
    }

    fn touches_box(&self, obstacle: &Aabb) -> bool {
        match self {
            Self::Point(p) => obstacle.contains_point(*p),
            Self::Box(b) | Self::Area(b) => b.is_overlapping(obstacle),
            Self::Parallelogram(p) => p.has_intersection_with_box(obstacle),
        }
    }

    fn touches_slope(&self, slope: &RightTriangle) -> bool {
        match self {
            Self::Point(p) => slope.contains_point(*p),
            Self::Box(b) | Self::Area(b) => slope.has_intersection_with_box(b, RightTriangleSide::ALL),
            Self::Parallelogram(p) => p.has_intersection_with_triangle(slope),
        }
    }

    /// Region handed to the actor index.
    fn actor_query_region(&self) -> Aabb {
        match self {
            Self::Point(p) => Aabb::from_size(*p, FixedSingle::MIN_POSITIVE, FixedSingle::MIN_POSITIVE),
            other => other.bounding_box(),
        }
    }
}

// =============================================================================
// SHARED STATE
// =============================================================================

/// Probe, switches and result buffers shared by every checker kind.
#[derive(Clone, Debug)]
pub struct CheckerState {
    pub(crate) config: PhysicsConfig,
    pub(crate) probe: Probe,
    pub(crate) ignore_flags: CollisionFlags,
    pub(crate) check_world: bool,
    pub(crate) check_actors: bool,
    pub(crate) compute_placements: bool,
    pub(crate) ignore_actors: BTreeSet<ActorId>,
    pub(crate) placements: Vec<CollisionPlacement>,
    pub(crate) slope_triangle: RightTriangle,
    actor_scratch: Vec<SolidActor>,
}

impl CheckerState {
    /// Empty state: no probe, nothing ignored, world checks on.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            probe: Probe::default(),
            ignore_flags: CollisionFlags::NONE,
            check_world: true,
            check_actors: true,
            compute_placements: false,
            ignore_actors: BTreeSet::new(),
            placements: Vec::new(),
            slope_triangle: RightTriangle::EMPTY,
            actor_scratch: Vec::new(),
        }
    }

    pub(crate) fn setup(
        &mut self,
        probe: Probe,
        ignore_flags: CollisionFlags,
        check_world: bool,
        check_actors: bool,
        compute_placements: bool,
    ) {
        self.probe = probe;
        self.ignore_flags = ignore_flags;
        self.check_world = check_world;
        self.check_actors = check_actors;
        self.compute_placements = compute_placements;
        self.placements.clear();
    }

    /// Copy every switch of `other` and probe `probe`.
    pub(crate) fn setup_like(&mut self, other: &CheckerState, probe: Probe) {
        self.config = other.config;
        self.setup(probe, other.ignore_flags, other.check_world, other.check_actors, other.compute_placements);
        self.ignore_actors.clone_from(&other.ignore_actors);
    }

    /// Run the current probe. Placements and the slope are rebuilt.
    pub fn evaluate<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        self.placements.clear();
        self.slope_triangle = RightTriangle::EMPTY;

        let probe = self.probe.normalized();
        let mut result = CollisionFlags::NONE;

        if self.check_world {
            result |= self.evaluate_world(world, &probe);
        }
        if self.check_actors {
            result |= self.evaluate_actors(world, &probe);
        }

        result
    }

    /// Run `probe` instead of the current one, leaving the current probe set.
    pub(crate) fn evaluate_at<W: CollisionWorld + ?Sized>(&mut self, world: &W, probe: Probe) -> CollisionFlags {
        let saved = mem::replace(&mut self.probe, probe);
        let flags = self.evaluate(world);
        self.probe = saved;
        flags
    }

    /// Run `probe` with `extra` added to the ignore mask.
    pub(crate) fn evaluate_ignoring<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        probe: Probe,
        extra: CollisionFlags,
    ) -> CollisionFlags {
        let saved = self.ignore_flags;
        self.ignore_flags |= extra;
        let flags = self.evaluate_at(world, probe);
        self.ignore_flags = saved;
        flags
    }

    fn evaluate_world<W: CollisionWorld + ?Sized>(&mut self, world: &W, probe: &Probe) -> CollisionFlags {
        let rows = world.map_row_count();
        let cols = world.map_col_count();
        if rows == 0 || cols == 0 {
            return CollisionFlags::NONE;
        }
        let last_row = i32::try_from(rows - 1).unwrap_or(i32::MAX);
        let last_col = i32::try_from(cols - 1).unwrap_or(i32::MAX);

        let bounds = probe.bounding_box();
        let start = Granularity::Map.cell_from_position(bounds.left_top());
        let end = Granularity::Map.cell_from_position(bounds.right_bottom());

        let mut result = CollisionFlags::NONE;
        for row in start.row.clamp(0, last_row)..=end.row.clamp(0, last_row) {
            for col in start.col.clamp(0, last_col)..=end.col.clamp(0, last_col) {
                let cell = Cell::new(row, col);
                let data = world.collision_data_at(cell);
                if data == CollisionData::NONE {
                    continue;
                }

                let flags = self.test_obstacle(probe, &Granularity::Map.bounding_box_of(cell), data);

                #[cfg(feature = "debug-tracing")]
                if !flags.is_empty() {
                    trace!(row, col, data = data.value(), ?flags, "cell hit");
                }

                result |= flags;
            }
        }
        result
    }

    fn evaluate_actors<W: CollisionWorld + ?Sized>(&mut self, world: &W, probe: &Probe) -> CollisionFlags {
        let mut actors = mem::take(&mut self.actor_scratch);
        world.query_actors(&probe.actor_query_region(), &mut actors);

        let mut result = CollisionFlags::NONE;
        for actor in &actors {
            if !actor.is_solid() || self.ignore_actors.contains(&actor.id) {
                continue;
            }
            result |= self.test_obstacle(probe, &actor.hitbox, actor.collision_data);
        }

        self.actor_scratch = actors;
        result
    }

    fn is_ignored(&self, flags: CollisionFlags) -> bool {
        if flags.contains(CollisionFlags::UNCLIMBABLE) {
            self.ignore_flags.contains(CollisionFlags::UNCLIMBABLE)
        } else {
            self.ignore_flags.intersects(flags)
        }
    }

    /// Classify one obstacle against the probe.
    fn test_obstacle(&mut self, probe: &Probe, obstacle: &Aabb, data: CollisionData) -> CollisionFlags {
        if data == CollisionData::NONE || !probe.touches_box(obstacle) {
            return CollisionFlags::NONE;
        }

        if data.is_slope() {
            if self.ignore_flags.contains(CollisionFlags::SLOPE) {
                return CollisionFlags::NONE;
            }
            let slope = data.slope_triangle() + obstacle.left_top();
            if !probe.touches_slope(&slope) {
                return CollisionFlags::NONE;
            }
            if self.compute_placements {
                self.placements.push(CollisionPlacement::with_slope(data, slope));
            }
            self.slope_triangle = slope;
            return CollisionFlags::SLOPE;
        }

        let flags = data.to_collision_flags();
        if flags.is_empty() || self.is_ignored(flags) {
            return CollisionFlags::NONE;
        }
        if self.compute_placements {
            self.placements.push(CollisionPlacement::with_box(data, *obstacle));
        }
        flags
    }
}

// =============================================================================
// CHECKER TRAIT
// =============================================================================

/// Common checker interface.
///
/// Implementors only expose their [`CheckerState`]; setup, evaluation and
/// placement queries are shared.
pub trait CollisionChecker {
    /// Shared query state.
    fn state(&self) -> &CheckerState;

    /// Shared query state, mutably.
    fn state_mut(&mut self) -> &mut CheckerState;

    /// Probe a single point.
    fn setup_point(
        &mut self,
        point: Vector,
        ignore_flags: CollisionFlags,
        check_world: bool,
        check_actors: bool,
        compute_placements: bool,
    ) {
        self.state_mut()
            .setup(Probe::Point(point), ignore_flags, check_world, check_actors, compute_placements);
    }

    /// Probe a box.
    fn setup_box(
        &mut self,
        test_box: Aabb,
        ignore_flags: CollisionFlags,
        check_world: bool,
        check_actors: bool,
        compute_placements: bool,
    ) {
        self.state_mut()
            .setup(Probe::Box(test_box), ignore_flags, check_world, check_actors, compute_placements);
    }

    /// Probe a swept parallelogram.
    fn setup_parallelogram(
        &mut self,
        parallelogram: Parallelogram,
        ignore_flags: CollisionFlags,
        check_world: bool,
        check_actors: bool,
        compute_placements: bool,
    ) {
        self.state_mut().setup(
            Probe::Parallelogram(parallelogram),
            ignore_flags,
            check_world,
            check_actors,
            compute_placements,
        );
    }

    /// Replace the set of actors skipped by queries.
    fn set_ignore_actors(&mut self, actors: &BTreeSet<ActorId>) {
        self.state_mut().ignore_actors.clone_from(actors);
    }

    /// Replace the ignored flags without touching the probe.
    fn set_ignore_flags(&mut self, ignore_flags: CollisionFlags) {
        self.state_mut().ignore_flags = ignore_flags;
    }

    /// Current probe.
    #[inline]
    fn probe(&self) -> Probe {
        self.state().probe
    }

    /// Bounds of the current probe.
    #[inline]
    fn test_box(&self) -> Aabb {
        self.state().probe.bounding_box()
    }

    /// Flags touched by the current probe. Repeated calls on an unchanged
    /// checker return the same flags and placements.
    fn get_collision_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        self.state_mut().evaluate(world)
    }

    /// Flags touched after moving the probe one step toward `direction`.
    /// The probe itself is left where it was.
    fn get_touching_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W, direction: Direction) -> CollisionFlags {
        let state = self.state_mut();
        let step = state.config.step_size;

        let mut offset = Vector::NULL;
        if direction.contains(Direction::LEFT) {
            offset += Vector::LEFT * step;
        } else if direction.contains(Direction::RIGHT) {
            offset += Vector::RIGHT * step;
        }
        if direction.contains(Direction::UP) {
            offset += Vector::UP * step;
        } else if direction.contains(Direction::DOWN) {
            offset += Vector::DOWN * step;
        }

        let probe = state.probe.translate(offset);
        state.evaluate_at(world, probe)
    }

    /// Obstacles recorded by the last query (empty unless placements are on).
    #[inline]
    fn placements(&self) -> &[CollisionPlacement] {
        &self.state().placements
    }

    /// Last slope touched by the last query, `EMPTY` if none.
    #[inline]
    fn slope_triangle(&self) -> RightTriangle {
        self.state().slope_triangle
    }

    /// Some placement carries `data`.
    fn has_placement(&self, data: CollisionData) -> bool {
        placement::has_placement(self.placements(), data)
    }

    /// Some placement carries one of `data`.
    fn has_placements(&self, data: &[CollisionData]) -> bool {
        placement::has_placements(self.placements(), data)
    }

    /// `data` is present and none of `exclude` is.
    fn has_placement_and_not_other_placements(&self, data: CollisionData, exclude: &[CollisionData]) -> bool {
        placement::has_placement_and_not_other_placements(self.placements(), data, exclude)
    }

    /// Every placement carries `data`.
    fn has_only_placement(&self, data: CollisionData) -> bool {
        placement::has_only_placement(self.placements(), data)
    }

    /// Every placement carries one of `data`.
    fn has_only_placements(&self, data: &[CollisionData]) -> bool {
        placement::has_only_placements(self.placements(), data)
    }
}

// =============================================================================
// PIXEL CHECKER
// =============================================================================

/// Plain point/box/parallelogram checker with a pixel-walk sweep.
#[derive(Clone, Debug)]
pub struct PixelCollisionChecker {
    state: CheckerState,
}

impl Default for PixelCollisionChecker {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl CollisionChecker for PixelCollisionChecker {
    #[inline]
    fn state(&self) -> &CheckerState {
        &self.state
    }

    #[inline]
    fn state_mut(&mut self) -> &mut CheckerState {
        &mut self.state
    }
}

impl PixelCollisionChecker {
    /// Checker with an empty probe.
    pub fn new(config: PhysicsConfig) -> Self {
        Self { state: CheckerState::new(config) }
    }

    /// Walk the probe one step at a time along `dir` until the next step
    /// would be blocked or `max_distance` is exceeded. Returns the bounds of
    /// the last free position, which also becomes the probe.
    ///
    /// Cost is linear in `max_distance / step_size`.
    pub fn move_contact_solid<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        dir: Vector,
        max_distance: FixedSingle,
    ) -> Aabb {
        let direction = dir.direction();
        if direction.is_empty() {
            return self.test_box();
        }

        let step = self.state.config.step_size;
        let bits = self.state.config.trunc_frac_bits;
        let delta_dir = get_step_vector(dir, step);
        let start = self.state.probe;

        let mut i = 1;
        let mut distance = step;
        while distance <= max_distance {
            let probe = start.translate((delta_dir * i).trunc_frac_part(bits));
            if self.state.evaluate_at(world, probe).can_block_the_move(direction) {
                break;
            }
            i += 1;
            distance += step;
        }

        self.state.probe = start.translate((delta_dir * (i - 1)).trunc_frac_part(bits));
        self.test_box()
    }
}

/// Scale `v` by `numerator / denominator` in double precision.
pub(crate) fn scale_vector(v: Vector, numerator: FixedSingle, denominator: FixedSingle) -> Vector {
    let n: FixedDouble = numerator.into();
    let d: FixedDouble = denominator.into();
    Vector::new(
        (FixedDouble::from(v.x) * n / d).to_single(),
        (FixedDouble::from(v.y) * n / d).to_single(),
    )
}

/// `delta` shortened so its dominant axis covers at most `max_distance`.
/// `NULL` when nothing may move.
pub(crate) fn bounded_delta(delta: Vector, max_distance: FixedSingle) -> Vector {
    let length = delta.x.abs().max(delta.y.abs());
    let bound = length.min(max_distance);
    if bound <= FixedSingle::ZERO {
        Vector::NULL
    } else if bound == length {
        delta
    } else {
        scale_vector(delta, bound, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ActorPartition, TileMap, World};

    fn fx(value: i32) -> FixedSingle {
        FixedSingle::from_int(value)
    }

    fn square(left: i32, top: i32, size: i32) -> Aabb {
        Aabb::from_size(Vector::from_ints(left, top), fx(size), fx(size))
    }

    /// 4x4 map cells with a solid at (2, 1) and a ladder at (1, 3).
    fn world() -> World {
        let mut map = TileMap::new(4, 4).unwrap();
        map.set_collision_data(Cell::new(2, 1), CollisionData::SOLID);
        map.set_collision_data(Cell::new(1, 3), CollisionData::LADDER);
        World::new(map)
    }

    #[test]
    fn test_step_vectors() {
        let one = FixedSingle::ONE;
        assert_eq!(get_step_vector(Vector::from_ints(10, 0), one), Vector::RIGHT);
        assert_eq!(get_step_vector(Vector::from_ints(0, -3), one), Vector::UP);
        assert_eq!(get_step_vector(Vector::NULL, one), Vector::NULL);
        assert_eq!(get_step_vector(Vector::from_ints(-4, 2), one), Vector::new(-one, FixedSingle::HALF));
        assert_eq!(get_step_vector(Vector::from_ints(2, 4), one), Vector::new(FixedSingle::HALF, one));
        assert_eq!(get_step_vector_vertical(Vector::from_ints(4, -2), one), Vector::new(fx(2), -one));
        assert_eq!(get_step_vector_horizontal(Vector::from_ints(4, -2), fx(2)), Vector::new(fx(2), -one));
    }

    #[test]
    fn test_box_probe_classification() {
        let world = world();
        let mut checker = PixelCollisionChecker::default();

        checker.setup_box(square(20, 36, 4), CollisionFlags::NONE, true, false, true);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::BLOCK);
        assert!(checker.has_only_placement(CollisionData::SOLID));

        checker.setup_box(square(50, 20, 4), CollisionFlags::NONE, true, false, true);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::LADDER);

        checker.setup_box(square(50, 20, 4), CollisionFlags::LADDER, true, false, true);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::NONE);
        assert!(checker.placements().is_empty());
    }

    #[test]
    fn test_touching_edge_is_not_a_hit() {
        let world = world();
        let mut checker = PixelCollisionChecker::default();

        // right edge exactly on the solid's left edge
        checker.setup_box(square(12, 36, 4), CollisionFlags::NONE, true, false, false);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::NONE);
        assert_eq!(checker.get_touching_flags(&world, Direction::RIGHT), CollisionFlags::BLOCK);
        assert_eq!(checker.test_box(), square(12, 36, 4));
    }

    #[test]
    fn test_point_probe() {
        let world = world();
        let mut checker = PixelCollisionChecker::default();

        checker.setup_point(Vector::from_ints(16, 32), CollisionFlags::NONE, true, false, false);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::BLOCK);

        checker.setup_point(Vector::from_ints(32, 32), CollisionFlags::NONE, true, false, false);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::NONE);

        checker.setup_point(Vector::from_ints(-5, -5), CollisionFlags::NONE, true, false, false);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::NONE);
    }

    #[test]
    fn test_parallelogram_probe() {
        let world = world();
        let mut checker = PixelCollisionChecker::default();

        let sweep = Parallelogram::setup_vertical(Vector::from_ints(4, 20), Vector::from_ints(14, 14), fx(4));
        checker.setup_parallelogram(sweep, CollisionFlags::NONE, true, false, false);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::BLOCK);

        let miss = Parallelogram::setup_vertical(Vector::from_ints(4, 4), Vector::from_ints(6, 6), fx(4));
        checker.setup_parallelogram(miss, CollisionFlags::NONE, true, false, false);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::NONE);
    }

    #[test]
    fn test_actor_filtering() {
        let mut world = world();
        let mut actors = ActorPartition::default();
        actors.insert(SolidActor::new(ActorId(1), square(0, 0, 8), CollisionData::SOLID));
        actors.insert(SolidActor::new(ActorId(2), square(8, 0, 8), CollisionData::LADDER));
        world.actors = actors;

        let mut checker = PixelCollisionChecker::default();
        checker.setup_box(square(4, 2, 8), CollisionFlags::NONE, false, true, true);
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::BLOCK);
        assert_eq!(checker.placements().len(), 1);

        checker.set_ignore_actors(&BTreeSet::from([ActorId(1)]));
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::NONE);

        checker.setup_box(square(4, 2, 8), CollisionFlags::NONE, false, false, true);
        checker.set_ignore_actors(&BTreeSet::new());
        assert_eq!(checker.get_collision_flags(&world), CollisionFlags::NONE);
    }

    #[test]
    fn test_unclimbable_ignore_rules() {
        let map = TileMap::from_bytes(1, 1, &[CollisionData::UNCLIMBABLE_SOLID.value()]).unwrap();
        let mut checker = PixelCollisionChecker::default();

        checker.setup_box(square(2, 2, 4), CollisionFlags::NONE, true, false, false);
        assert_eq!(checker.get_collision_flags(&map), CollisionFlags::BLOCK | CollisionFlags::UNCLIMBABLE);

        checker.setup_box(square(2, 2, 4), CollisionFlags::BLOCK, true, false, false);
        assert_eq!(checker.get_collision_flags(&map), CollisionFlags::BLOCK | CollisionFlags::UNCLIMBABLE);

        checker.setup_box(square(2, 2, 4), CollisionFlags::UNCLIMBABLE, true, false, false);
        assert_eq!(checker.get_collision_flags(&map), CollisionFlags::NONE);
    }

    #[test]
    fn test_pixel_move_contact_solid() {
        let world = world();
        let mut checker = PixelCollisionChecker::default();

        checker.setup_box(square(0, 36, 4), CollisionFlags::NONE, true, false, false);
        let stopped = checker.move_contact_solid(&world, Vector::RIGHT, fx(20));
        assert_eq!(stopped, square(12, 36, 4));

        checker.setup_box(square(0, 4, 4), CollisionFlags::NONE, true, false, false);
        let free = checker.move_contact_solid(&world, Vector::RIGHT, fx(5));
        assert_eq!(free, square(5, 4, 4));
    }

    #[test]
    fn test_bounded_delta() {
        assert_eq!(bounded_delta(Vector::from_ints(20, -10), fx(5)), Vector::new(fx(5), FixedSingle::from_f64(-2.5)));
        assert_eq!(bounded_delta(Vector::from_ints(3, 1), fx(5)), Vector::from_ints(3, 1));
        assert_eq!(bounded_delta(Vector::from_ints(3, 1), FixedSingle::ZERO), Vector::NULL);
    }

    #[test]
    fn test_scale_vector() {
        let v = scale_vector(Vector::from_ints(8, -4), fx(3), fx(4));
        assert_eq!(v, Vector::from_ints(6, -3));
    }
}
