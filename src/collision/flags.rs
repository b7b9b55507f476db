//! Collision Flags
//!
//! The result type of every collision query.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use crate::core::vector::Direction;

bitflags! {
    /// What a probe touched, OR-ed over every contributing obstacle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
    pub struct CollisionFlags: u8 {
        /// Nothing
        const NONE = 0;
        /// Solid block
        const BLOCK = 1;
        /// Slope wedge
        const SLOPE = 2;
        /// Ladder body
        const LADDER = 4;
        /// Ladder top (walkable from above)
        const TOP_LADDER = 8;
        /// Wall that cannot be climbed
        const UNCLIMBABLE = 16;
        /// Water volume
        const WATER = 32;
        /// Water surface
        const WATER_SURFACE = 64;
    }
}

impl CollisionFlags {
    /// Flags of every kind except slopes.
    pub const NON_SLOPE: Self = Self::BLOCK
        .union(Self::LADDER)
        .union(Self::TOP_LADDER)
        .union(Self::UNCLIMBABLE)
        .union(Self::WATER)
        .union(Self::WATER_SURFACE);

    /// Whether these flags stop a move toward `direction`.
    ///
    /// Blocks stop everything. Unclimbable walls stop horizontal moves.
    /// Ladder tops and slopes stop downward moves.
    pub fn can_block_the_move(self, direction: Direction) -> bool {
        if self.is_empty() {
            return false;
        }

        self.contains(Self::BLOCK)
            || direction.intersects(Direction::LEFTRIGHT) && self.contains(Self::UNCLIMBABLE)
            || direction.contains(Direction::DOWN) && self.intersects(Self::TOP_LADDER | Self::SLOPE)
    }

    /// Contains `SLOPE`.
    #[inline]
    pub fn is_slope(self) -> bool {
        self.contains(Self::SLOPE)
    }
}
