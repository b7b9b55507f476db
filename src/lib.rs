//! # Tile Physics
//!
//! Deterministic fixed-point collision core for 2D tile platformers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TILE PHYSICS                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 / Q32.32 fixed-point arithmetic    │
//! │  ├── vector.rs   - 2D vector and direction flags             │
//! │  ├── interval.rs - 1D intervals with closed/open ends        │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  geometry/       - Shapes (closed-set tests)                 │
//! │  ├── aabb.rs     - Origin-relative boxes                     │
//! │  ├── segment.rs  - Line segments                             │
//! │  ├── triangle.rs - Slope wedges                              │
//! │  ├── parallelogram.rs - Swept box sides                      │
//! │  └── set.rs      - Shape unions/intersections                │
//! │                                                              │
//! │  world/          - What the probes run against               │
//! │  ├── collision_data.rs - Cell tags and slope table           │
//! │  ├── grid.rs     - Tile map, granularities, world trait      │
//! │  └── actors.rs   - Solid actor index                         │
//! │                                                              │
//! │  collision/      - Queries                                   │
//! │  ├── checker.rs  - Probe evaluation, pixel walk              │
//! │  ├── tracer.rs   - Swept moves                               │
//! │  ├── lander.rs   - Landed state                              │
//! │  └── collider.rs - Per-entity collider                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Every query is a pure function of the world and the probe:
//! - No floating-point arithmetic on the query path
//! - No HashMap (BTreeMap/BTreeSet for ordered iteration)
//! - Cells visited row-major, actors in id order
//!
//! Given the same world and the same calls, results are bit-identical on
//! any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod collision;
pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod world;

// Re-export commonly used types
pub use collision::{
    Collider, CollisionChecker, CollisionFlags, CollisionPlacement, LanderCollisionChecker, PixelCollisionChecker,
    SweepMode, TracerCollisionChecker,
};
pub use config::{ColliderConfig, PhysicsConfig};
pub use core::fixed::{FixedDouble, FixedSingle};
pub use core::vector::{Direction, Vector};
pub use error::{ConfigError, GeometryError, WorldError};
pub use geometry::{Aabb, Parallelogram, RightTriangle};
pub use world::{ActorId, CollisionData, CollisionWorld, SolidActor, TileMap, World};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
