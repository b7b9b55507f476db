//! Dynamic solid actors and their spatial index.
//!
//! Actors are bucketed into a uniform grid by hitbox. Queries walk the
//! buckets covering the region, dedupe, filter by exact overlap and
//! return results in id order, so the outcome never depends on insertion
//! history.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::vector::Vector;
use crate::geometry::Aabb;

use super::collision_data::CollisionData;
use super::grid::Cell;
use super::BLOCK_SIZE;

/// Stable actor identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Collision-relevant view of an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidActor {
    /// Identifier
    pub id: ActorId,
    /// Hitbox in world pixels
    pub hitbox: Aabb,
    /// Tag the actor's hitbox behaves as
    pub collision_data: CollisionData,
}

impl SolidActor {
    /// Actor `id` occupying `hitbox`.
    pub fn new(id: ActorId, hitbox: Aabb, collision_data: CollisionData) -> Self {
        Self { id, hitbox, collision_data }
    }

    /// Only solid-block actors take part in collision queries.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.collision_data.is_solid_block()
    }
}

/// Uniform-grid spatial hash of actors.
#[derive(Clone, Debug)]
pub struct ActorPartition {
    bucket_size: i32,
    actors: BTreeMap<ActorId, SolidActor>,
    buckets: BTreeMap<Cell, Vec<ActorId>>,
}

impl Default for ActorPartition {
    fn default() -> Self {
        Self::new(BLOCK_SIZE)
    }
}

impl ActorPartition {
    /// Index with `bucket_size` px buckets (clamped to at least 1).
    pub fn new(bucket_size: i32) -> Self {
        Self {
            bucket_size: bucket_size.max(1),
            actors: BTreeMap::new(),
            buckets: BTreeMap::new(),
        }
    }

    /// Number of indexed actors.
    #[inline]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// No actor is indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Look up an actor by id.
    pub fn get(&self, id: ActorId) -> Option<&SolidActor> {
        self.actors.get(&id)
    }

    fn bucket_of(&self, point: Vector) -> Cell {
        Cell::new(
            point.y.floor().div_euclid(self.bucket_size),
            point.x.floor().div_euclid(self.bucket_size),
        )
    }

    fn covered_buckets(&self, region: &Aabb) -> impl Iterator<Item = Cell> {
        let start = self.bucket_of(region.left_top());
        let end = self.bucket_of(region.right_bottom());
        (start.row..=end.row).flat_map(move |row| (start.col..=end.col).map(move |col| Cell::new(row, col)))
    }

    /// Insert or replace an actor.
    pub fn insert(&mut self, actor: SolidActor) {
        self.remove(actor.id);
        let cells: Vec<Cell> = self.covered_buckets(&actor.hitbox).collect();
        for cell in cells {
            self.buckets.entry(cell).or_default().push(actor.id);
        }
        self.actors.insert(actor.id, actor);
    }

    /// Remove an actor; returns it if present.
    pub fn remove(&mut self, id: ActorId) -> Option<SolidActor> {
        let actor = self.actors.remove(&id)?;
        let cells: Vec<Cell> = self.covered_buckets(&actor.hitbox).collect();
        for cell in cells {
            if let Some(bucket) = self.buckets.get_mut(&cell) {
                bucket.retain(|other| *other != id);
                if bucket.is_empty() {
                    self.buckets.remove(&cell);
                }
            }
        }
        Some(actor)
    }

    /// Move an actor to a new hitbox.
    pub fn update_hitbox(&mut self, id: ActorId, hitbox: Aabb) -> bool {
        match self.remove(id) {
            Some(mut actor) => {
                actor.hitbox = hitbox;
                self.insert(actor);
                true
            }
            None => false,
        }
    }

    /// Actors whose hitbox overlaps `region`, in id order.
    ///
    /// Populates `out` instead of allocating; clears it first.
    pub fn query(&self, region: &Aabb, out: &mut Vec<SolidActor>) {
        out.clear();

        let mut seen = BTreeSet::new();
        for cell in self.covered_buckets(region) {
            if let Some(bucket) = self.buckets.get(&cell) {
                seen.extend(bucket.iter().copied());
            }
        }

        out.extend(
            seen.into_iter()
                .filter_map(|id| self.actors.get(&id))
                .filter(|actor| actor.hitbox.is_overlapping(region))
                .copied(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::FixedSingle;

    fn actor(id: u32, left: i32, top: i32, size: i32) -> SolidActor {
        let size = FixedSingle::from_int(size);
        SolidActor::new(ActorId(id), Aabb::from_size(Vector::from_ints(left, top), size, size), CollisionData::SOLID)
    }

    fn query(partition: &ActorPartition, left: i32, top: i32, size: i32) -> Vec<u32> {
        let size = FixedSingle::from_int(size);
        let mut out = Vec::new();
        partition.query(&Aabb::from_size(Vector::from_ints(left, top), size, size), &mut out);
        out.iter().map(|a| a.id.0).collect()
    }

    #[test]
    fn test_query_returns_overlapping_in_id_order() {
        let mut partition = ActorPartition::default();
        partition.insert(actor(7, 0, 0, 16));
        partition.insert(actor(3, 10, 10, 40));
        partition.insert(actor(5, 200, 200, 16));

        assert_eq!(query(&partition, 5, 5, 10), vec![3, 7]);
        assert_eq!(query(&partition, 100, 100, 4), Vec::<u32>::new());
        assert_eq!(query(&partition, 190, 190, 20), vec![5]);
    }

    #[test]
    fn test_touching_is_not_overlapping() {
        let mut partition = ActorPartition::default();
        partition.insert(actor(1, 0, 0, 16));
        assert!(query(&partition, 16, 0, 16).is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let mut partition = ActorPartition::new(16);
        partition.insert(actor(1, 0, 0, 8));
        assert!(partition.update_hitbox(ActorId(1), actor(1, 64, 64, 8).hitbox));
        assert!(query(&partition, 0, 0, 8).is_empty());
        assert_eq!(query(&partition, 60, 60, 8), vec![1]);

        assert!(partition.remove(ActorId(1)).is_some());
        assert!(partition.is_empty());
        assert!(!partition.update_hitbox(ActorId(1), Aabb::EMPTY));
        assert!(query(&partition, 60, 60, 8).is_empty());
    }

    #[test]
    fn test_negative_coordinates() {
        let mut partition = ActorPartition::default();
        partition.insert(actor(2, -40, -40, 10));
        assert_eq!(query(&partition, -35, -35, 2), vec![2]);
    }
}
