//! Tile grid and world access.
//!
//! ```text
//!   col:   0    1    2
//!        +----+----+----+
//!  row 0 |    |    |    |     each map cell is MAP_SIZE x MAP_SIZE px
//!        +----+----+----+     and stores one CollisionData byte
//!  row 1 |    | ## |    |
//!        +----+----+----+
//! ```
//!
//! Checkers never touch the grid directly; they go through the
//! `CollisionWorld` trait so the host engine can plug in its own storage.

use serde::{Deserialize, Serialize};

use crate::core::fixed::FixedSingle;
use crate::core::vector::Vector;
use crate::error::WorldError;
use crate::geometry::Aabb;

use super::actors::{ActorPartition, SolidActor};
use super::collision_data::CollisionData;
use super::{BLOCK_SIZE, MAP_SIZE, SCENE_SIZE, TILE_SIZE};

/// Grid levels of the level layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// 8 px tiles
    Tile,
    /// 16 px map cells (collision resolution)
    Map,
    /// 32 px blocks
    Block,
    /// 256 px scenes
    Scene,
}

impl Granularity {
    /// Cell edge length in pixels.
    #[inline]
    pub const fn size(self) -> i32 {
        match self {
            Self::Tile => TILE_SIZE,
            Self::Map => MAP_SIZE,
            Self::Block => BLOCK_SIZE,
            Self::Scene => SCENE_SIZE,
        }
    }

    /// Cell containing `position` (floor division on both axes).
    pub fn cell_from_position(self, position: Vector) -> Cell {
        let size = self.size();
        Cell::new(position.y.floor().div_euclid(size), position.x.floor().div_euclid(size))
    }

    /// Left-top corner of `cell` in pixels.
    pub fn cell_left_top(self, cell: Cell) -> Vector {
        let size = self.size();
        Vector::from_ints(cell.col * size, cell.row * size)
    }

    /// Bounding box of `cell`.
    pub fn bounding_box_of(self, cell: Cell) -> Aabb {
        let size = FixedSingle::from_int(self.size());
        Aabb::from_size(self.cell_left_top(cell), size, size)
    }
}

/// Row/column address of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Row index (y)
    pub row: i32,
    /// Column index (x)
    pub col: i32,
}

impl Cell {
    /// Cell at `row`, `col`.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Read access the collision checkers need from the host world.
pub trait CollisionWorld {
    /// Number of map-cell rows.
    fn map_row_count(&self) -> usize;

    /// Number of map-cell columns.
    fn map_col_count(&self) -> usize;

    /// Collision tag of a map cell; `NONE` outside the grid.
    fn collision_data_at(&self, cell: Cell) -> CollisionData;

    /// Append every actor whose hitbox overlaps `region` to `out`.
    ///
    /// `out` is cleared first. Order must be deterministic.
    fn query_actors(&self, region: &Aabb, out: &mut Vec<SolidActor>);
}

/// Row-major grid of map-cell collision tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    rows: usize,
    cols: usize,
    cells: Vec<CollisionData>,
}

impl TileMap {
    /// Empty (all `NONE`) grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self, WorldError> {
        if rows == 0 || cols == 0 {
            return Err(WorldError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols, cells: vec![CollisionData::NONE; rows * cols] })
    }

    /// Grid from row-major tags.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<CollisionData>) -> Result<Self, WorldError> {
        if rows == 0 || cols == 0 {
            return Err(WorldError::InvalidDimensions { rows, cols });
        }
        if cells.len() != rows * cols {
            return Err(WorldError::DimensionMismatch { rows, cols, actual: cells.len() });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Grid from row-major raw bytes.
    pub fn from_bytes(rows: usize, cols: usize, bytes: &[u8]) -> Result<Self, WorldError> {
        Self::from_cells(rows, cols, bytes.iter().copied().map(CollisionData).collect())
    }

    /// Rows in the map.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Columns in the map.
    #[inline]
    pub fn col_count(&self) -> usize {
        self.cols
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        let row = usize::try_from(cell.row).ok()?;
        let col = usize::try_from(cell.col).ok()?;
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    /// Tag at `cell`, `NONE` outside the grid.
    pub fn collision_data_at(&self, cell: Cell) -> CollisionData {
        self.index_of(cell)
            .map_or(CollisionData::NONE, |index| self.cells[index])
    }

    /// Replace the tag at `cell`. Returns `false` outside the grid.
    pub fn set_collision_data(&mut self, cell: Cell, data: CollisionData) -> bool {
        match self.index_of(cell) {
            Some(index) => {
                self.cells[index] = data;
                true
            }
            None => false,
        }
    }

    /// Pixel bounds of the whole grid.
    pub fn bounding_box(&self) -> Aabb {
        let size = MAP_SIZE as i64;
        Aabb::from_size(
            Vector::NULL,
            FixedSingle::from_int((self.cols as i64 * size) as i32),
            FixedSingle::from_int((self.rows as i64 * size) as i32),
        )
    }
}

/// Static grid plus dynamic solid actors.
#[derive(Clone, Debug)]
pub struct World {
    /// Tile collision grid
    pub map: TileMap,
    /// Spatial index of solid actors
    pub actors: ActorPartition,
}

impl World {
    /// World with no actors.
    pub fn new(map: TileMap) -> Self {
        Self { map, actors: ActorPartition::default() }
    }
}

impl CollisionWorld for World {
    fn map_row_count(&self) -> usize {
        self.map.row_count()
    }

    fn map_col_count(&self) -> usize {
        self.map.col_count()
    }

    fn collision_data_at(&self, cell: Cell) -> CollisionData {
        self.map.collision_data_at(cell)
    }

    fn query_actors(&self, region: &Aabb, out: &mut Vec<SolidActor>) {
        self.actors.query(region, out);
    }
}

impl CollisionWorld for TileMap {
    fn map_row_count(&self) -> usize {
        self.rows
    }

    fn map_col_count(&self) -> usize {
        self.cols
    }

    fn collision_data_at(&self, cell: Cell) -> CollisionData {
        TileMap::collision_data_at(self, cell)
    }

    fn query_actors(&self, _region: &Aabb, out: &mut Vec<SolidActor>) {
        out.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_position_floors() {
        let map = Granularity::Map;
        assert_eq!(map.cell_from_position(Vector::from_ints(0, 0)), Cell::new(0, 0));
        assert_eq!(map.cell_from_position(Vector::from_ints(15, 31)), Cell::new(1, 0));
        assert_eq!(map.cell_from_position(Vector::from_ints(16, 32)), Cell::new(2, 1));
        assert_eq!(map.cell_from_position(Vector::new(FixedSingle::from_f64(-0.5), FixedSingle::ZERO)), Cell::new(0, -1));
        assert_eq!(Granularity::Scene.cell_from_position(Vector::from_ints(300, 10)), Cell::new(0, 1));
    }

    #[test]
    fn test_cell_geometry() {
        let cell = Cell::new(2, 3);
        assert_eq!(Granularity::Map.cell_left_top(cell), Vector::from_ints(48, 32));
        let b = Granularity::Tile.bounding_box_of(cell);
        assert_eq!(b.left_top(), Vector::from_ints(24, 16));
        assert_eq!(b.right_bottom(), Vector::from_ints(32, 24));
    }

    #[test]
    fn test_tile_map_lookup_and_edit() {
        let mut map = TileMap::new(2, 3).unwrap();
        assert!(map.set_collision_data(Cell::new(1, 2), CollisionData::SOLID));
        assert_eq!(map.collision_data_at(Cell::new(1, 2)), CollisionData::SOLID);
        assert_eq!(map.collision_data_at(Cell::new(-1, 0)), CollisionData::NONE);
        assert_eq!(map.collision_data_at(Cell::new(0, 3)), CollisionData::NONE);
        assert!(!map.set_collision_data(Cell::new(5, 5), CollisionData::SOLID));
        assert_eq!(map.bounding_box().right_bottom(), Vector::from_ints(48, 32));
    }

    #[test]
    fn test_tile_map_dimension_errors() {
        assert_eq!(TileMap::new(0, 4), Err(WorldError::InvalidDimensions { rows: 0, cols: 4 }));
        assert_eq!(
            TileMap::from_bytes(2, 2, &[0, 0, 0]),
            Err(WorldError::DimensionMismatch { rows: 2, cols: 2, actual: 3 })
        );
        let map = TileMap::from_bytes(1, 2, &[0x3B, 0x02]).unwrap();
        assert_eq!(map.collision_data_at(Cell::new(0, 1)), CollisionData::SLOPE_8_0);
    }
}
