//! Fixed-Point 2D Vector
//!
//! Immutable (x, y) pair used both as a point and as a displacement.
//! Screen coordinates: +x points right, +y points down.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::fixed::{FixedDouble, FixedSingle, RoundMode};

bitflags! {
    /// Movement directions, combinable.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Direction: u8 {
        /// -x
        const LEFT = 1;
        /// -y
        const UP = 2;
        /// +x
        const RIGHT = 4;
        /// +y
        const DOWN = 8;
        /// Both horizontal directions
        const LEFTRIGHT = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Both vertical directions
        const UPDOWN = Self::UP.bits() | Self::DOWN.bits();
        /// Every direction
        const ALL = Self::LEFTRIGHT.bits() | Self::UPDOWN.bits();
    }
}

/// 2D vector with fixed-point components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    /// X component
    pub x: FixedSingle,
    /// Y component
    pub y: FixedSingle,
}

impl Vector {
    /// Null vector
    pub const NULL: Self = Self::new(FixedSingle::ZERO, FixedSingle::ZERO);

    /// Unit vector pointing left (-X)
    pub const LEFT: Self = Self::new(FixedSingle::MINUS_ONE, FixedSingle::ZERO);

    /// Unit vector pointing right (+X)
    pub const RIGHT: Self = Self::new(FixedSingle::ONE, FixedSingle::ZERO);

    /// Unit vector pointing up (-Y, screen space)
    pub const UP: Self = Self::new(FixedSingle::ZERO, FixedSingle::MINUS_ONE);

    /// Unit vector pointing down (+Y, screen space)
    pub const DOWN: Self = Self::new(FixedSingle::ZERO, FixedSingle::ONE);

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: FixedSingle, y: FixedSingle) -> Self {
        Self { x, y }
    }

    /// Create a vector from integer components.
    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self::new(FixedSingle::from_int(x), FixedSingle::from_int(y))
    }

    /// Whether both components are zero.
    #[inline]
    pub fn is_null(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Horizontal component as a vector.
    #[inline]
    pub fn x_vector(self) -> Self {
        Self::new(self.x, FixedSingle::ZERO)
    }

    /// Vertical component as a vector.
    #[inline]
    pub fn y_vector(self) -> Self {
        Self::new(FixedSingle::ZERO, self.y)
    }

    /// Scale each axis independently.
    #[inline]
    pub fn scale_xy(self, sx: FixedSingle, sy: FixedSingle) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    /// Dot product, computed in double precision.
    #[inline]
    pub fn dot(self, other: Self) -> FixedDouble {
        self.x.to_double() * other.x.to_double() + self.y.to_double() * other.y.to_double()
    }

    /// 2D cross product (z component), computed in double precision.
    #[inline]
    pub fn cross(self, other: Self) -> FixedDouble {
        self.x.to_double() * other.y.to_double() - self.y.to_double() * other.x.to_double()
    }

    /// Squared length in double precision.
    #[inline]
    pub fn length_squared(self) -> FixedDouble {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(self) -> FixedSingle {
        FixedSingle::from_f64(self.length_squared().to_f64().sqrt())
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Self) -> FixedSingle {
        (other - self).length()
    }

    /// Unit vector with the same direction. The null vector maps to itself.
    pub fn versor(self) -> Self {
        if self.is_null() {
            return Self::NULL;
        }
        let length = self.length();
        if length.is_zero() {
            return Self::NULL;
        }
        Self::new(self.x / length, self.y / length)
    }

    /// Rotate around the origin by an angle in radians.
    pub fn rotate(self, angle: FixedSingle) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Rotate around `center` by an angle in radians.
    pub fn rotate_around(self, center: Self, angle: FixedSingle) -> Self {
        (self - center).rotate(angle) + center
    }

    /// Exact quarter turn.
    #[inline]
    pub fn rotate90(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Exact half turn.
    #[inline]
    pub fn rotate180(self) -> Self {
        -self
    }

    /// Exact three-quarter turn.
    #[inline]
    pub fn rotate270(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Round each axis with its own mode.
    #[inline]
    pub fn round(self, mode_x: RoundMode, mode_y: RoundMode) -> Self {
        Self::new(self.x.round_mode(mode_x), self.y.round_mode(mode_y))
    }

    /// Floor both axes.
    #[inline]
    pub fn round_to_floor(self) -> Self {
        self.round(RoundMode::Floor, RoundMode::Floor)
    }

    /// Ceil both axes.
    #[inline]
    pub fn round_to_ceil(self) -> Self {
        self.round(RoundMode::Ceil, RoundMode::Ceil)
    }

    /// Round both axes to the nearest integer.
    #[inline]
    pub fn round_to_nearest(self) -> Self {
        self.round(RoundMode::Nearest, RoundMode::Nearest)
    }

    /// Floor the x axis only.
    #[inline]
    pub fn round_x_to_floor(self) -> Self {
        Self::new(self.x.round_mode(RoundMode::Floor), self.y)
    }

    /// Floor the y axis only.
    #[inline]
    pub fn round_y_to_floor(self) -> Self {
        Self::new(self.x, self.y.round_mode(RoundMode::Floor))
    }

    /// Ceil the x axis only.
    #[inline]
    pub fn round_x_to_ceil(self) -> Self {
        Self::new(self.x.round_mode(RoundMode::Ceil), self.y)
    }

    /// Ceil the y axis only.
    #[inline]
    pub fn round_y_to_ceil(self) -> Self {
        Self::new(self.x, self.y.round_mode(RoundMode::Ceil))
    }

    /// Truncate both axes toward zero.
    #[inline]
    pub fn truncate(self) -> Self {
        self.round(RoundMode::Truncate, RoundMode::Truncate)
    }

    /// Keep `bits` fractional bits on both axes.
    #[inline]
    pub fn trunc_frac_part(self, bits: u32) -> Self {
        Self::new(self.x.trunc_frac_part(bits), self.y.trunc_frac_part(bits))
    }

    /// Directions this displacement points to.
    pub fn direction(self) -> Direction {
        let mut direction = Direction::empty();
        match self.x.signum() {
            -1 => direction |= Direction::LEFT,
            1 => direction |= Direction::RIGHT,
            _ => {}
        }
        match self.y.signum() {
            -1 => direction |= Direction::UP,
            1 => direction |= Direction::DOWN,
            _ => {}
        }
        direction
    }
}

impl From<(i32, i32)> for Vector {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::from_ints(x, y)
    }
}

impl From<(FixedSingle, FixedSingle)> for Vector {
    #[inline]
    fn from((x, y): (FixedSingle, FixedSingle)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<FixedSingle> for Vector {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: FixedSingle) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector> for FixedSingle {
    type Output = Vector;
    #[inline]
    fn mul(self, rhs: Vector) -> Vector {
        rhs * self
    }
}

impl Mul<i32> for Vector {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<FixedSingle> for Vector {
    type Output = Self;
    #[inline]
    fn div(self, rhs: FixedSingle) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector({:.3}, {:.3})", self.x.to_f64(), self.y.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(value: f64) -> FixedSingle {
        FixedSingle::from_f64(value)
    }

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector::from_ints(3, 4);
        let b = Vector::from_ints(1, 2);
        assert_eq!(a + b, Vector::from_ints(4, 6));
        assert_eq!(a - b, Vector::from_ints(2, 2));
        assert_eq!(-a, Vector::from_ints(-3, -4));
        assert_eq!(a * fx(0.5), Vector::new(fx(1.5), fx(2.0)));
        assert_eq!(a / fx(2.0), Vector::new(fx(1.5), fx(2.0)));
        assert_eq!(a * 2, Vector::from_ints(6, 8));
    }

    #[test]
    fn test_vector_dot_cross_length() {
        let a = Vector::from_ints(3, 4);
        let b = Vector::from_ints(4, -3);
        assert_eq!(a.dot(b), FixedDouble::ZERO);
        assert_eq!(a.cross(b).floor(), -25);
        assert_eq!(a.length(), fx(5.0));
        assert_eq!(Vector::NULL.distance_to(a), fx(5.0));
    }

    #[test]
    fn test_versor_of_null_is_null() {
        assert_eq!(Vector::NULL.versor(), Vector::NULL);
        assert_eq!(Vector::from_ints(0, 7).versor(), Vector::DOWN);
        assert_eq!(Vector::from_ints(-2, 0).versor(), Vector::LEFT);
    }

    #[test]
    fn test_quarter_rotations() {
        let v = Vector::from_ints(2, 1);
        assert_eq!(v.rotate90(), Vector::from_ints(-1, 2));
        assert_eq!(v.rotate180(), Vector::from_ints(-2, -1));
        assert_eq!(v.rotate270(), Vector::from_ints(1, -2));
        assert_eq!(v.rotate90().rotate270(), v);
        assert_eq!(v.rotate(FixedSingle::ZERO), v);
    }

    #[test]
    fn test_rounding_variants() {
        let v = Vector::new(fx(1.5), fx(-1.5));
        assert_eq!(v.round_to_floor(), Vector::from_ints(1, -2));
        assert_eq!(v.round_to_ceil(), Vector::from_ints(2, -1));
        assert_eq!(v.round_to_nearest(), Vector::from_ints(2, -1));
        assert_eq!(v.truncate(), Vector::from_ints(1, -1));
        assert_eq!(v.round_x_to_floor(), Vector::new(fx(1.0), fx(-1.5)));
        assert_eq!(v.round_y_to_ceil(), Vector::new(fx(1.5), fx(-1.0)));
    }

    #[test]
    fn test_direction() {
        assert_eq!(Vector::from_ints(-3, 0).direction(), Direction::LEFT);
        assert_eq!(Vector::from_ints(2, 5).direction(), Direction::RIGHT | Direction::DOWN);
        assert_eq!(Vector::NULL.direction(), Direction::empty());
        assert!(Direction::ALL.contains(Direction::UPDOWN));
    }
}
