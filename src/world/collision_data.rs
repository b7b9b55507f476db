//! Per-cell collision tags.
//!
//! Level data stores one byte per map cell. Known tags have named
//! constants; unknown bytes are kept as-is and collide with nothing.

use serde::{Deserialize, Serialize};

use crate::collision::CollisionFlags;
use crate::core::fixed::FixedSingle;
use crate::core::vector::Vector;
use crate::geometry::RightTriangle;

use super::MAP_SIZE;

/// Collision tag of a map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionData(pub u8);

/// Slope heights `(left, right)` for the twelve plain slope shapes, in tag order.
const SLOPE_HEIGHTS: [(i32, i32); 12] = [
    (16, 8),
    (8, 0),
    (8, 16),
    (0, 8),
    (16, 12),
    (12, 8),
    (8, 4),
    (4, 0),
    (12, 16),
    (8, 12),
    (4, 8),
    (0, 4),
];

#[allow(missing_docs)]
impl CollisionData {
    pub const NONE: Self = Self(0x00);
    pub const SLOPE_16_8: Self = Self(0x01);
    pub const SLOPE_8_0: Self = Self(0x02);
    pub const SLOPE_8_16: Self = Self(0x03);
    pub const SLOPE_0_8: Self = Self(0x04);
    pub const SLOPE_16_12: Self = Self(0x05);
    pub const SLOPE_12_8: Self = Self(0x06);
    pub const SLOPE_8_4: Self = Self(0x07);
    pub const SLOPE_4_0: Self = Self(0x08);
    pub const SLOPE_12_16: Self = Self(0x09);
    pub const SLOPE_8_12: Self = Self(0x0A);
    pub const SLOPE_4_8: Self = Self(0x0B);
    pub const SLOPE_0_4: Self = Self(0x0C);
    pub const WATER: Self = Self(0x0D);
    pub const WATER_SURFACE: Self = Self(0x0E);
    pub const MUD: Self = Self(0x11);
    pub const LADDER: Self = Self(0x12);
    pub const TOP_LADDER: Self = Self(0x13);
    pub const TOP_MUD: Self = Self(0x1C);
    pub const LAVA: Self = Self(0x33);
    pub const SOLID2: Self = Self(0x34);
    pub const SOLID3: Self = Self(0x35);
    pub const UNCLIMBABLE_SOLID: Self = Self(0x36);
    pub const LEFT_CONVEYOR: Self = Self(0x37);
    pub const RIGHT_CONVEYOR: Self = Self(0x38);
    pub const UP_SLOPE_BASE: Self = Self(0x39);
    pub const DOWN_SLOPE_BASE: Self = Self(0x3A);
    pub const SOLID: Self = Self(0x3B);
    pub const BREAKABLE: Self = Self(0x3C);
    pub const DOOR: Self = Self(0x3D);
    pub const NON_LETHAL_SPIKE: Self = Self(0x3E);
    pub const LETHAL_SPIKE: Self = Self(0x3F);
    pub const LEFT_CONVEYOR_SLOPE_16_12: Self = Self(0x45);
    pub const LEFT_CONVEYOR_SLOPE_12_8: Self = Self(0x46);
    pub const LEFT_CONVEYOR_SLOPE_8_4: Self = Self(0x47);
    pub const LEFT_CONVEYOR_SLOPE_4_0: Self = Self(0x48);
    pub const RIGHT_CONVEYOR_SLOPE_12_16: Self = Self(0x49);
    pub const RIGHT_CONVEYOR_SLOPE_8_12: Self = Self(0x4A);
    pub const RIGHT_CONVEYOR_SLOPE_4_8: Self = Self(0x4B);
    pub const RIGHT_CONVEYOR_SLOPE_0_4: Self = Self(0x4C);
    pub const SEMI_SOLID: Self = Self(0x53);
    pub const SLIPPERY_SLOPE_16_8: Self = Self(0x81);
    pub const SLIPPERY_SLOPE_8_0: Self = Self(0x82);
    pub const SLIPPERY_SLOPE_8_16: Self = Self(0x83);
    pub const SLIPPERY_SLOPE_0_8: Self = Self(0x84);
    pub const SLIPPERY_SLOPE_16_12: Self = Self(0x85);
    pub const SLIPPERY_SLOPE_12_8: Self = Self(0x86);
    pub const SLIPPERY_SLOPE_8_4: Self = Self(0x87);
    pub const SLIPPERY_SLOPE_4_0: Self = Self(0x88);
    pub const SLIPPERY_SLOPE_12_16: Self = Self(0x89);
    pub const SLIPPERY_SLOPE_8_12: Self = Self(0x8A);
    pub const SLIPPERY_SLOPE_4_8: Self = Self(0x8B);
    pub const SLIPPERY_SLOPE_0_4: Self = Self(0x8C);
    pub const SLIPPERY_SLOPE_BASE: Self = Self(0xBA);
    pub const SLIPPERY_BORDER_FLOOR: Self = Self(0xBB);
    pub const SLIPPERY_FLOOR: Self = Self(0xBE);
}

impl CollisionData {
    /// Raw tag byte.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Solid cell of any kind.
    pub fn is_solid_block(self) -> bool {
        matches!(
            self,
            Self::MUD
                | Self::TOP_MUD
                | Self::LAVA
                | Self::SOLID2
                | Self::SOLID3
                | Self::UNCLIMBABLE_SOLID
                | Self::LEFT_CONVEYOR
                | Self::RIGHT_CONVEYOR
                | Self::UP_SLOPE_BASE
                | Self::DOWN_SLOPE_BASE
                | Self::SOLID
                | Self::BREAKABLE
                | Self::NON_LETHAL_SPIKE
                | Self::LETHAL_SPIKE
                | Self::SLIPPERY_SLOPE_BASE
                | Self::SLIPPERY_BORDER_FLOOR
                | Self::SLIPPERY_FLOOR
                | Self::DOOR
        )
    }

    /// Mud floor, plain or topped.
    pub fn is_mud(self) -> bool {
        matches!(self, Self::MUD | Self::TOP_MUD)
    }

    /// Flat slippery floor.
    pub fn is_slippery_floor(self) -> bool {
        matches!(self, Self::SLIPPERY_SLOPE_BASE | Self::SLIPPERY_BORDER_FLOOR | Self::SLIPPERY_FLOOR)
    }

    /// Plain, conveyor or slippery slope.
    pub fn is_slope(self) -> bool {
        matches!(self.0, 0x01..=0x0C) || self.is_conveyor_slope() || self.is_slippery_slope()
    }

    /// Slippery slope wedge.
    pub fn is_slippery_slope(self) -> bool {
        matches!(self.0, 0x81..=0x8C)
    }

    /// Conveyor slope wedge.
    pub fn is_conveyor_slope(self) -> bool {
        matches!(self.0, 0x45..=0x4C)
    }

    /// Water body or surface.
    pub fn is_water(self) -> bool {
        matches!(self, Self::WATER | Self::WATER_SURFACE)
    }

    /// Flag a cell of this kind contributes when hit.
    pub fn to_collision_flags(self) -> CollisionFlags {
        if self.is_solid_block() {
            if self == Self::UNCLIMBABLE_SOLID {
                CollisionFlags::BLOCK | CollisionFlags::UNCLIMBABLE
            } else {
                CollisionFlags::BLOCK
            }
        } else if self.is_slope() {
            CollisionFlags::SLOPE
        } else {
            match self {
                Self::WATER => CollisionFlags::WATER,
                Self::WATER_SURFACE => CollisionFlags::WATER_SURFACE,
                Self::LADDER => CollisionFlags::LADDER,
                Self::TOP_LADDER => CollisionFlags::TOP_LADDER,
                _ => CollisionFlags::NONE,
            }
        }
    }

    /// `(left, right)` surface heights of a slope tag, measured from the cell top.
    pub fn slope_heights(self) -> Option<(i32, i32)> {
        let index = match self.0 {
            0x01..=0x0C => self.0 - 0x01,
            0x45..=0x4C => self.0 - 0x45 + 4,
            0x81..=0x8C => self.0 - 0x81,
            _ => return None,
        };
        Some(SLOPE_HEIGHTS[index as usize])
    }

    /// Slope wedge in cell-local coordinates, `EMPTY` for non-slopes.
    pub fn slope_triangle(self) -> RightTriangle {
        match self.slope_heights() {
            Some((left, right)) => make_slope_triangle(left, right),
            None => RightTriangle::EMPTY,
        }
    }
}

impl From<u8> for CollisionData {
    #[inline]
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Wedge of a map cell whose surface goes from `left` to `right` (pixels
/// from the cell top). The right angle sits under the higher end.
pub fn make_slope_triangle(left: i32, right: i32) -> RightTriangle {
    let size = FixedSingle::from_int(MAP_SIZE);
    if left < right {
        RightTriangle::new(Vector::from_ints(0, right), size, FixedSingle::from_int(left - right))
    } else {
        RightTriangle::new(Vector::from_ints(MAP_SIZE, left), -size, FixedSingle::from_int(right - left))
    }
}
