//! World collision data: the tile grid and the dynamic actor index.

pub mod actors;
pub mod collision_data;
pub mod grid;

pub use actors::{ActorId, ActorPartition, SolidActor};
pub use collision_data::{make_slope_triangle, CollisionData};
pub use grid::{Cell, CollisionWorld, Granularity, TileMap, World};

/// Tile edge in pixels.
pub const TILE_SIZE: i32 = 8;

/// Map cell edge in pixels (collision resolution).
pub const MAP_SIZE: i32 = 2 * TILE_SIZE;

/// Block edge in pixels.
pub const BLOCK_SIZE: i32 = 2 * MAP_SIZE;

/// Scene edge in pixels.
pub const SCENE_SIZE: i32 = 8 * BLOCK_SIZE;
