//! Collision Queries
//!
//! Checkers that test probes against a [`CollisionWorld`](crate::world::CollisionWorld)
//! and the per-entity [`Collider`] built on top of them.
//!
//! - `flags`: the [`CollisionFlags`] result type
//! - `placement`: which obstacles produced a result
//! - `checker`: shared probe evaluation and the pixel-walk checker
//! - `tracer`: swept moves with coarse region tests
//! - `lander`: landed state and floor snapping
//! - `collider`: five-probe entity collider

pub mod checker;
pub mod collider;
pub mod flags;
pub mod lander;
pub mod placement;
pub mod tracer;

pub use checker::{
    get_step_vector, get_step_vector_horizontal, get_step_vector_vertical, CheckerState, CollisionChecker,
    PixelCollisionChecker, Probe,
};
pub use collider::Collider;
pub use flags::{CollisionFlags, Direction};
pub use lander::LanderCollisionChecker;
pub use placement::{CollisionPlacement, Obstacle};
pub use tracer::{SweepMode, TracerCollisionChecker};
