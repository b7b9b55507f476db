//! Replay Hashing
//!
//! SHA-256 digests of collider state. Two runs of the same script against
//! the same world must produce the same digest; any divergence in a box,
//! a flag or a slope shows up as a different hash.

use sha2::{Digest, Sha256};

use super::fixed::FixedSingle;
use super::vector::Vector;
use crate::collision::CollisionFlags;
use crate::geometry::{Aabb, RightTriangle};

/// 256-bit digest.
pub type StateHash = [u8; 32];

/// What a digest covers. Each domain prefixes its own tag so a collider
/// digest can never collide with a replay digest over the same bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashDomain {
    /// One collider at one instant.
    Collider,
    /// A whole scripted run (a chain of collider digests).
    Replay,
}

impl HashDomain {
    fn tag(self) -> &'static [u8] {
        match self {
            Self::Collider => b"TILE_PHYSICS_COLLIDER_V1",
            Self::Replay => b"TILE_PHYSICS_REPLAY_V1",
        }
    }
}

/// Incremental hasher over physics values. Update order is part of the
/// digest.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Hasher seeded with the tag of `domain`.
    pub fn new(domain: HashDomain) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain.tag());
        Self { hasher }
    }

    /// Hasher for one collider snapshot.
    #[inline]
    pub fn for_collider_state() -> Self {
        Self::new(HashDomain::Collider)
    }

    /// Hasher for a whole scripted run.
    #[inline]
    pub fn for_replay() -> Self {
        Self::new(HashDomain::Replay)
    }

    /// Raw bytes, as given.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Little-endian.
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Raw Q16.16 bits, little-endian.
    #[inline]
    pub fn update_fixed(&mut self, value: FixedSingle) {
        self.hasher.update(value.raw().to_le_bytes());
    }

    /// `x` then `y`.
    pub fn update_vector(&mut self, value: Vector) {
        self.update_fixed(value.x);
        self.update_fixed(value.y);
    }

    /// Origin, mins and maxs as stored (not the absolute bounds).
    pub fn update_box(&mut self, value: &Aabb) {
        self.update_vector(value.origin);
        self.update_vector(value.mins);
        self.update_vector(value.maxs);
    }

    /// Origin, then both catheti.
    pub fn update_triangle(&mut self, value: &RightTriangle) {
        self.update_vector(value.origin);
        self.update_fixed(value.h_cathetus);
        self.update_fixed(value.v_cathetus);
    }

    /// Flag bits as one byte.
    #[inline]
    pub fn update_flags(&mut self, value: CollisionFlags) {
        self.hasher.update([value.bits()]);
    }

    /// Consume the hasher.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hasher: &mut StateHasher) {
        hasher.update_u32(100);
        hasher.update_fixed(FixedSingle::from_f64(5.5));
        hasher.update_box(&Aabb::from_size(Vector::from_ints(4, 4), FixedSingle::ONE, FixedSingle::TWO));
        hasher.update_flags(CollisionFlags::BLOCK | CollisionFlags::SLOPE);
    }

    #[test]
    fn test_same_updates_same_hash() {
        let run = || {
            let mut hasher = StateHasher::for_collider_state();
            sample(&mut hasher);
            hasher.finalize()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_update_order_matters() {
        let mut a = StateHasher::for_collider_state();
        a.update_u32(1);
        a.update_u32(2);

        let mut b = StateHasher::for_collider_state();
        b.update_u32(2);
        b.update_u32(1);

        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_domains_are_separated() {
        let mut collider = StateHasher::for_collider_state();
        let mut replay = StateHasher::for_replay();
        sample(&mut collider);
        sample(&mut replay);
        assert_ne!(collider.finalize(), replay.finalize());
    }

    #[test]
    fn test_box_layout_is_hashed() {
        // same absolute bounds, different origin
        let a = Aabb::from_size(Vector::from_ints(4, 4), FixedSingle::ONE, FixedSingle::ONE);
        let b = Aabb::new(Vector::from_ints(5, 5), Vector::from_ints(-1, -1), Vector::NULL);

        let mut ha = StateHasher::for_collider_state();
        ha.update_box(&a);
        let mut hb = StateHasher::for_collider_state();
        hb.update_box(&b);
        assert_ne!(ha.finalize(), hb.finalize());
    }
}
