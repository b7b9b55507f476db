//! Core deterministic primitives.
//!
//! Everything above this module computes with these types only, so that a
//! given sequence of queries produces bit-identical results on every
//! platform.

pub mod fixed;
pub mod hash;
pub mod interval;
pub mod vector;

// Re-export core types
pub use fixed::{FixedDouble, FixedSingle, RoundMode, DEFAULT_TRUNC_BITS, FIXED_HALF, FIXED_ONE, FIXED_SCALE};
pub use hash::{HashDomain, StateHash, StateHasher};
pub use interval::Interval;
pub use vector::{Direction, Vector};
