//! Entity Collider
//!
//! Wraps one hitbox and the checkers that answer movement questions for
//! it. Five probes are derived from the hitbox every time it changes:
//!
//! ```text
//!          up (top row)
//!        +-------------+
//!   left |             | right
//!  column|    inner    | column
//!        |             |
//!        +-------------+
//!          down (bottom row)
//! ```
//!
//! Side columns skip `head_height` rows at the top and `legs_height` rows
//! at the bottom. Flags for each probe are computed on first access and
//! kept until the hitbox, the configuration or the ignore set changes.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::config::{ColliderConfig, PhysicsConfig};
use crate::core::fixed::{FixedDouble, FixedSingle};
use crate::core::hash::{StateHash, StateHasher};
use crate::core::vector::{Direction, Vector};
use crate::geometry::{Aabb, RightTriangle};
use crate::world::{ActorId, CollisionData, CollisionWorld, MAP_SIZE};

use super::checker::{bounded_delta, CollisionChecker, PixelCollisionChecker};
use super::flags::CollisionFlags;
use super::lander::LanderCollisionChecker;
use super::tracer::{SweepMode, TracerCollisionChecker};

/// Flags never stopping a horizontal or upward move.
const PASS_THROUGH: CollisionFlags = CollisionFlags::LADDER
    .union(CollisionFlags::TOP_LADDER)
    .union(CollisionFlags::WATER)
    .union(CollisionFlags::WATER_SURFACE);

/// Flags never stopping a fall (ladder tops do).
const FALL_THROUGH: CollisionFlags = CollisionFlags::LADDER
    .union(CollisionFlags::WATER)
    .union(CollisionFlags::WATER_SURFACE);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Up,
    Right,
    Down,
}

impl Side {
    fn direction(self) -> Direction {
        match self {
            Self::Left => Direction::LEFT,
            Self::Up => Direction::UP,
            Self::Right => Direction::RIGHT,
            Self::Down => Direction::DOWN,
        }
    }

    fn implicit_ignore(self) -> CollisionFlags {
        match self {
            Self::Down => FALL_THROUGH,
            _ => PASS_THROUGH,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Probes {
    left: Aabb,
    up: Aabb,
    right: Aabb,
    down: Aabb,
    inner: Aabb,
}

impl Probes {
    fn derive(hitbox: &Aabb, config: &ColliderConfig, step: FixedSingle) -> Self {
        let zero = FixedSingle::ZERO;
        let b = hitbox.truncate_origin();
        let o = b.origin;

        let left = b.left() - o.x;
        let right = b.right() - o.x;
        let top = b.top() - o.y;
        let bottom = b.bottom() - o.y;
        let column_top = top + config.head_height;
        let column_bottom = (bottom - config.legs_height).max(column_top);

        Self {
            left: Aabb::new(Vector::new(b.left(), o.y), Vector::new(zero, column_top), Vector::new(step, column_bottom)),
            up: Aabb::new(Vector::new(o.x, b.top()), Vector::new(left, zero), Vector::new(right, step)),
            right: Aabb::new(Vector::new(b.right(), o.y), Vector::new(-step, column_top), Vector::new(zero, column_bottom)),
            down: Aabb::new(Vector::new(o.x, b.bottom()), Vector::new(left, -step), Vector::new(right, zero)),
            inner: b,
        }
    }

    fn get(&self, side: Side) -> Aabb {
        match side {
            Side::Left => self.left,
            Side::Up => self.up,
            Side::Right => self.right,
            Side::Down => self.down,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FlagCache {
    left: Option<CollisionFlags>,
    up: Option<CollisionFlags>,
    right: Option<CollisionFlags>,
    down: Option<CollisionFlags>,
    inner: Option<CollisionFlags>,
}

fn prepare<C: CollisionChecker>(
    checker: &mut C,
    probe: Aabb,
    ignore: CollisionFlags,
    config: &ColliderConfig,
    ignore_actors: &BTreeSet<ActorId>,
) {
    checker.setup_box(probe, ignore, config.check_world, config.check_actors, config.use_placements);
    checker.set_ignore_actors(ignore_actors);
}

/// Collision state and movement of one entity.
#[derive(Clone, Debug)]
pub struct Collider {
    owner: ActorId,
    hitbox: Aabb,
    config: ColliderConfig,
    physics: PhysicsConfig,
    ignore_actors: BTreeSet<ActorId>,
    probes: Probes,
    cache: FlagCache,
    landed_slope: RightTriangle,
    left_tracer: TracerCollisionChecker,
    up_tracer: TracerCollisionChecker,
    right_tracer: TracerCollisionChecker,
    down_tracer: TracerCollisionChecker,
    lander: LanderCollisionChecker,
    inner: PixelCollisionChecker,
}

impl Collider {
    /// Collider for `owner`. The owner is always in the ignore set.
    pub fn new(owner: ActorId, hitbox: Aabb, config: ColliderConfig, physics: PhysicsConfig) -> Self {
        let mut collider = Self {
            owner,
            hitbox,
            config,
            physics,
            ignore_actors: BTreeSet::from([owner]),
            probes: Probes::default(),
            cache: FlagCache::default(),
            landed_slope: RightTriangle::EMPTY,
            left_tracer: TracerCollisionChecker::new(physics),
            up_tracer: TracerCollisionChecker::new(physics),
            right_tracer: TracerCollisionChecker::new(physics),
            down_tracer: TracerCollisionChecker::new(physics),
            lander: LanderCollisionChecker::new(physics),
            inner: PixelCollisionChecker::new(physics),
        };
        collider.invalidate_flags();
        collider
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Actor owning this collider.
    #[inline]
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Current hitbox.
    #[inline]
    pub fn hitbox(&self) -> Aabb {
        self.hitbox
    }

    /// Probe layout and query options.
    #[inline]
    pub fn config(&self) -> &ColliderConfig {
        &self.config
    }

    /// Step sizes and sweep tuning.
    #[inline]
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Actors never collided with (always holds the owner).
    #[inline]
    pub fn ignored_actors(&self) -> &BTreeSet<ActorId> {
        &self.ignore_actors
    }

    /// Left side column (bottom clipped while standing on an uphill slope).
    pub fn left_probe(&self) -> Aabb {
        self.probes.left
    }

    /// Top row.
    pub fn up_probe(&self) -> Aabb {
        self.probes.up
    }

    /// Right side column (bottom clipped while standing on an uphill slope).
    pub fn right_probe(&self) -> Aabb {
        self.probes.right
    }

    /// Bottom row.
    pub fn down_probe(&self) -> Aabb {
        self.probes.down
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Replace the hitbox; cached flags are dropped.
    pub fn set_hitbox(&mut self, hitbox: Aabb) {
        self.hitbox = hitbox;
        self.invalidate_flags();
    }

    /// Replace the probe layout; cached flags are dropped.
    pub fn set_config(&mut self, config: ColliderConfig) {
        self.config = config;
        self.invalidate_flags();
    }

    /// Move the hitbox without any collision test.
    pub fn translate(&mut self, delta: Vector) {
        self.hitbox = self.hitbox + delta;
        self.invalidate_flags();
    }

    /// Re-derive the probes and drop every cached flag. Call after the
    /// world changed under the collider.
    pub fn invalidate_flags(&mut self) {
        self.cache = FlagCache::default();
        self.landed_slope = RightTriangle::EMPTY;
        self.probes = Probes::derive(&self.hitbox, &self.config, self.physics.step_size);
    }

    /// Reset the ignore set to the owner alone.
    pub fn clear_ignored_actors(&mut self) {
        self.ignore_actors.clear();
        self.ignore_actors.insert(self.owner);
        self.invalidate_flags();
    }

    /// Stop colliding with `actor`.
    pub fn add_ignored_actor(&mut self, actor: ActorId) {
        if self.ignore_actors.insert(actor) {
            self.invalidate_flags();
        }
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Landed state of the bottom row.
    pub fn down_mask_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        if let Some(flags) = self.cache.down {
            return flags;
        }

        prepare(&mut self.lander, self.probes.down, CollisionFlags::NONE, &self.config, &self.ignore_actors);
        let flags = self.lander.compute_landed_state(world);
        if flags.is_slope() {
            self.landed_slope = self.lander.slope_triangle();
            self.clip_from_slope();
        } else {
            self.landed_slope = RightTriangle::EMPTY;
        }

        self.cache.down = Some(flags);
        flags
    }

    /// Flags one step left of the left column.
    pub fn left_mask_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        self.touching_flags(world, Side::Left)
    }

    /// Flags one step above the top row.
    pub fn up_mask_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        self.touching_flags(world, Side::Up)
    }

    /// Flags one step right of the right column.
    pub fn right_mask_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        self.touching_flags(world, Side::Right)
    }

    /// Flags overlapping the hitbox itself.
    pub fn inner_mask_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> CollisionFlags {
        if let Some(flags) = self.cache.inner {
            return flags;
        }
        prepare(&mut self.inner, self.probes.inner, CollisionFlags::NONE, &self.config, &self.ignore_actors);
        let flags = self.inner.get_collision_flags(world);
        self.cache.inner = Some(flags);
        flags
    }

    fn touching_flags<W: CollisionWorld + ?Sized>(&mut self, world: &W, side: Side) -> CollisionFlags {
        // slope clipping of the side columns depends on the landed state
        self.down_mask_flags(world);

        let (slot, tracer) = match side {
            Side::Left => (&mut self.cache.left, &mut self.left_tracer),
            Side::Up => (&mut self.cache.up, &mut self.up_tracer),
            Side::Right => (&mut self.cache.right, &mut self.right_tracer),
            Side::Down => return self.cache.down.unwrap_or_default(),
        };
        if let Some(flags) = *slot {
            return flags;
        }

        prepare(tracer, self.probes.get(side), CollisionFlags::NONE, &self.config, &self.ignore_actors);
        let flags = tracer.get_touching_flags(world, side.direction());
        *slot = Some(flags);
        flags
    }

    /// Clip the uphill side column so the slope surface does not read as a
    /// wall.
    fn clip_from_slope(&mut self) {
        let slope = self.landed_slope;
        if slope.h_cathetus.is_zero() {
            return;
        }

        let span = FixedDouble::from(self.hitbox.width() + self.physics.mask_size);
        let clip = (FixedDouble::from(slope.v_cathetus) * span / FixedDouble::from(slope.h_cathetus))
            .to_single()
            .abs();

        let column = if slope.h_cathetus > FixedSingle::ZERO { &mut self.probes.left } else { &mut self.probes.right };
        *column = column.clip_bottom(clip.min(column.height()));
    }

    /// A wall is directly to the left.
    pub fn blocked_left<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        self.left_mask_flags(world).can_block_the_move(Direction::LEFT)
    }

    /// A ceiling is directly above.
    pub fn blocked_up<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        self.up_mask_flags(world).can_block_the_move(Direction::UP)
    }

    /// A wall is directly to the right.
    pub fn blocked_right<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        self.right_mask_flags(world).can_block_the_move(Direction::RIGHT)
    }

    /// Standing on a solid block.
    pub fn landed_on_block<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        self.down_mask_flags(world).contains(CollisionFlags::BLOCK)
    }

    /// Standing on a slope and on no block.
    pub fn landed_on_slope<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        let flags = self.down_mask_flags(world);
        flags.is_slope() && !flags.contains(CollisionFlags::BLOCK)
    }

    /// Standing on a ladder top only.
    pub fn landed_on_top_ladder<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        let flags = self.down_mask_flags(world);
        flags.contains(CollisionFlags::TOP_LADDER) && !flags.intersects(CollisionFlags::BLOCK | CollisionFlags::SLOPE)
    }

    /// Standing on anything.
    pub fn landed<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        self.landed_on_block(world) || self.landed_on_slope(world) || self.landed_on_top_ladder(world)
    }

    /// Slope under the feet, `EMPTY` unless landed on a slope.
    pub fn landed_slope<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> RightTriangle {
        self.down_mask_flags(world);
        self.landed_slope
    }

    /// The hitbox overlaps water.
    pub fn underwater<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        self.inner_mask_flags(world).contains(CollisionFlags::WATER)
    }

    /// The hitbox overlaps a water surface.
    pub fn touching_water_surface<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        self.inner_mask_flags(world).contains(CollisionFlags::WATER_SURFACE)
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Sweep the probe of `side` by `delta`. Returns the flags at contact
    /// and the accepted displacement, never longer than `max_distance`
    /// along the dominant axis even when the side is masked out.
    fn sweep<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        side: Side,
        delta: Vector,
        max_distance: FixedSingle,
        masks: Direction,
        ignore: CollisionFlags,
    ) -> (CollisionFlags, Vector) {
        if !masks.contains(side.direction()) {
            return (CollisionFlags::NONE, bounded_delta(delta, max_distance));
        }

        let probe = self.probes.get(side);
        let tracer = match side {
            Side::Left => &mut self.left_tracer,
            Side::Up => &mut self.up_tracer,
            Side::Right => &mut self.right_tracer,
            Side::Down => &mut self.down_tracer,
        };
        prepare(tracer, probe, ignore | side.implicit_ignore(), &self.config, &self.ignore_actors);
        let flags = tracer.move_contact_solid(world, delta, max_distance, SweepMode::Coarse);
        (flags, tracer.test_box().origin - probe.origin)
    }

    /// Move horizontally by `dx`, stopping at the first wall. Ladders and
    /// water never stop the move. A side missing from `masks` moves freely.
    pub fn move_contact_solid_horizontal<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        dx: FixedSingle,
        masks: Direction,
        ignore: CollisionFlags,
    ) -> CollisionFlags {
        if dx.is_zero() {
            return CollisionFlags::NONE;
        }

        self.down_mask_flags(world);
        let side = if dx > FixedSingle::ZERO { Side::Right } else { Side::Left };
        let (flags, delta) = self.sweep(world, side, Vector::new(dx, FixedSingle::ZERO), dx.abs(), masks, ignore);

        trace!(?side, ?flags, "horizontal move");
        self.translate(delta.trunc_frac_part(self.physics.trunc_frac_bits));
        flags
    }

    /// Move vertically by `dy`. Falls stop on ladder tops, rises do not.
    pub fn move_contact_solid_vertical<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        dy: FixedSingle,
        masks: Direction,
        ignore: CollisionFlags,
    ) -> CollisionFlags {
        if dy.is_zero() {
            return CollisionFlags::NONE;
        }

        let side = if dy > FixedSingle::ZERO { Side::Down } else { Side::Up };
        let (flags, delta) = self.sweep(world, side, Vector::new(FixedSingle::ZERO, dy), dy.abs(), masks, ignore);

        trace!(?side, ?flags, "vertical move");
        self.translate(delta.trunc_frac_part(self.physics.trunc_frac_bits));
        flags
    }

    /// Diagonal move: the horizontal and the vertical side are swept
    /// separately along `delta` and the shorter accepted displacement wins
    /// (the vertical one on ties).
    pub fn move_contact_solid<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        delta: Vector,
        max_distance: FixedSingle,
        masks: Direction,
        ignore: CollisionFlags,
    ) -> CollisionFlags {
        if delta.is_null() {
            return CollisionFlags::NONE;
        }

        self.down_mask_flags(world);

        let horizontal = match delta.x.signum() {
            1 => self.sweep(world, Side::Right, delta, max_distance, masks, ignore),
            -1 => self.sweep(world, Side::Left, delta, max_distance, masks, ignore),
            _ => (CollisionFlags::NONE, bounded_delta(delta, max_distance)),
        };
        let vertical = match delta.y.signum() {
            1 => self.sweep(world, Side::Down, delta, max_distance, masks, ignore),
            -1 => self.sweep(world, Side::Up, delta, max_distance, masks, ignore),
            _ => horizontal,
        };

        let (flags, accepted) = if horizontal.1.length_squared() < vertical.1.length_squared() {
            horizontal
        } else {
            vertical
        };

        trace!(?flags, ?accepted, "diagonal move");
        let accepted = accepted.trunc_frac_part(self.physics.trunc_frac_bits);
        if !accepted.is_null() {
            self.translate(accepted);
        }
        flags
    }

    /// Run a lander operation on the bottom row and apply its displacement.
    fn with_lander<W, F>(&mut self, world: &W, ignore: CollisionFlags, op: F) -> bool
    where
        W: CollisionWorld + ?Sized,
        F: FnOnce(&mut LanderCollisionChecker, &W) -> bool,
    {
        let probe = self.probes.down;
        prepare(&mut self.lander, probe, ignore, &self.config, &self.ignore_actors);
        let result = op(&mut self.lander, world);

        let delta = self.lander.test_box().origin - probe.origin;
        if !delta.is_null() {
            self.translate(delta);
        }
        result
    }

    /// Fall step by step until landed, at most `max_distance`.
    pub fn move_contact_floor<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        max_distance: FixedSingle,
        ignore: CollisionFlags,
    ) -> bool {
        self.with_lander(world, ignore, |lander, world| lander.move_contact_floor(world, max_distance))
    }

    /// Like [`move_contact_floor`](Self::move_contact_floor), but stays put
    /// when no floor is within reach.
    pub fn try_move_contact_floor<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        max_distance: FixedSingle,
        ignore: CollisionFlags,
    ) -> bool {
        self.with_lander(world, ignore, |lander, world| lander.try_move_contact_floor(world, max_distance))
    }

    /// Fall until landed on a slope; stays put when none is within reach.
    pub fn try_move_contact_slope<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        max_distance: FixedSingle,
        ignore: CollisionFlags,
    ) -> bool {
        self.with_lander(world, ignore, |lander, world| lander.try_move_contact_slope(world, max_distance))
    }

    /// Put a landed hitbox exactly on its floor.
    ///
    /// On a slope the bottom-middle point is projected onto the hypotenuse
    /// in one move. On blocks and ladder tops the hitbox is lifted while it
    /// stays landed. Nothing moves farther than `max_distance`; returns
    /// whether an adjustment was made.
    pub fn adjust_on_the_floor<W: CollisionWorld + ?Sized>(
        &mut self,
        world: &W,
        max_distance: FixedSingle,
        ignore: CollisionFlags,
    ) -> bool {
        prepare(&mut self.lander, self.probes.down, ignore, &self.config, &self.ignore_actors);
        let flags = self.lander.compute_landed_state(world);
        if !flags.can_block_the_move(Direction::DOWN) {
            return false;
        }

        if flags.is_slope() {
            let slope = self.lander.slope_triangle();
            let foot = self.hitbox.middle_bottom();
            let dy = slope.hypotenuse_y_at(foot.x) - foot.y;
            if dy.abs() > max_distance {
                return false;
            }

            debug!(%dy, "projected onto slope");
            let delta = Vector::new(FixedSingle::ZERO, dy).trunc_frac_part(self.physics.trunc_frac_bits);
            if !delta.is_null() {
                self.translate(delta);
            }
            return true;
        }

        let adjusted = self.with_lander(world, ignore, |lander, world| lander.adjust_on_the_floor(world, max_distance));
        debug!(adjusted, "adjusted on the floor");
        adjusted
    }

    /// Center the hitbox horizontally on the ladder it stands on (ladder
    /// top under the feet) or climbs (ladder above the head). Needs
    /// placements; returns whether a ladder was found.
    pub fn adjust_on_the_ladder<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> bool {
        if !self.config.use_placements {
            return false;
        }

        prepare(&mut self.lander, self.probes.down, CollisionFlags::NONE, &self.config, &self.ignore_actors);
        let down = self.lander.compute_landed_state(world);
        let on_top_ladder =
            down.contains(CollisionFlags::TOP_LADDER) && !down.intersects(CollisionFlags::BLOCK | CollisionFlags::SLOPE);

        let ladder = if on_top_ladder {
            self.lander
                .placements()
                .iter()
                .find(|p| p.collision_data == CollisionData::TOP_LADDER)
                .map(|p| p.obstacle_box())
        } else {
            prepare(&mut self.up_tracer, self.probes.up, CollisionFlags::NONE, &self.config, &self.ignore_actors);
            self.up_tracer.get_touching_flags(world, Direction::UP);
            self.up_tracer
                .placements()
                .iter()
                .find(|p| p.collision_data == CollisionData::LADDER)
                .map(|p| p.obstacle_box())
        };

        let Some(ladder) = ladder else {
            return false;
        };

        let dx = ladder.left() - self.hitbox.left() + (FixedSingle::from_int(MAP_SIZE) - self.hitbox.width()) / 2;
        let delta = Vector::new(dx, FixedSingle::ZERO).trunc_frac_part(self.physics.trunc_frac_bits);
        debug!(%dx, on_top_ladder, "centered on ladder");
        if !delta.is_null() {
            self.translate(delta);
        }
        true
    }

    // =========================================================================
    // Contact with other boxes
    // =========================================================================

    /// `other` is within one step of the left column.
    pub fn is_touching_left(&self, other: &Aabb) -> bool {
        self.probes.left.clip_left(-self.physics.step_size).is_overlapping(other)
    }

    /// `other` is within one step of the right column.
    pub fn is_touching_right(&self, other: &Aabb) -> bool {
        self.probes.right.clip_right(-self.physics.step_size).is_overlapping(other)
    }

    /// `other` is within one step of the top row.
    pub fn is_touching_up(&self, other: &Aabb) -> bool {
        self.probes.up.clip_top(-self.physics.step_size).is_overlapping(other)
    }

    /// `other` is within one step of the bottom row.
    pub fn is_touching_down(&self, other: &Aabb) -> bool {
        self.probes.down.clip_bottom(-self.physics.step_size).is_overlapping(other)
    }

    /// Hash of the hitbox and every probe's flags.
    pub fn state_hash<W: CollisionWorld + ?Sized>(&mut self, world: &W) -> StateHash {
        let down = self.down_mask_flags(world);
        let left = self.left_mask_flags(world);
        let up = self.up_mask_flags(world);
        let right = self.right_mask_flags(world);
        let inner = self.inner_mask_flags(world);

        let mut hasher = StateHasher::for_collider_state();
        hasher.update_u32(self.owner.0);
        hasher.update_box(&self.hitbox);
        for flags in [left, up, right, down, inner] {
            hasher.update_flags(flags);
        }
        hasher.update_triangle(&self.landed_slope);
        hasher.finalize()
    }
}
