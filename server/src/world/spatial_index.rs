use std::collections::HashMap;

use outbreak_shared::{EntityId, EntityTypeId, Neighbor, NeighborQuery, Vec2};

/// Uniform grid bucketing entities by `floor(position / cell_size)`.
///
/// The manager rebuilds the index from live positions at the start of every
/// tick rather than updating buckets incrementally: rebuild cost is bounded
/// by entity count and cannot drift, where incremental updates are cheaper
/// per entity but go stale the moment something moves without calling
/// [`SpatialIndex::relocate`]. Entries are therefore only as fresh as the
/// last rebuild and are never read as authoritative positions.
pub struct SpatialIndex {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<Neighbor>>,
    len: usize,
}

impl SpatialIndex {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn cell_coords(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, neighbor: Neighbor) {
        let coords = self.cell_coords(neighbor.position);
        self.cells.entry(coords).or_default().push(neighbor);
        self.len += 1;
    }

    pub fn remove(&mut self, id: EntityId, last_position: Vec2) {
        let coords = self.cell_coords(last_position);
        if let Some(bucket) = self.cells.get_mut(&coords) {
            if let Some(index) = bucket.iter().position(|n| n.id == id) {
                bucket.swap_remove(index);
                self.len -= 1;
            }
        }
    }

    /// Moves an entity between buckets. Unused under the rebuild-per-tick
    /// policy, but kept so an incremental policy can be swapped in without
    /// changing the interface.
    pub fn relocate(&mut self, id: EntityId, type_id: EntityTypeId, from: Vec2, to: Vec2) {
        self.remove(id, from);
        self.insert(Neighbor {
            id,
            type_id,
            position: to,
        });
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }
}

impl NeighborQuery for SpatialIndex {
    /// Candidates from the cell containing `position` plus its 8 neighbors.
    /// Assumes `radius <= cell_size`; within that bound the result has no
    /// false negatives, but it may include entities out to one cell beyond
    /// the radius. Result order is unspecified.
    fn nearby(
        &self,
        position: Vec2,
        _radius: f32,
        type_filter: Option<&[EntityTypeId]>,
    ) -> Vec<Neighbor> {
        let (cx, cy) = self.cell_coords(position);
        let mut result = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for neighbor in bucket {
                    if let Some(filter) = type_filter {
                        if !filter.contains(&neighbor.type_id) {
                            continue;
                        }
                    }
                    result.push(*neighbor);
                }
            }
        }
        result
    }
}
