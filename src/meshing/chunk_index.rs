//! Coordinate index for cross-chunk neighbor lookups during meshing.
//!
//! Meshing a chunk's boundary voxels needs to read the voxel grids of
//! adjacent chunks. Rather than chunks holding references to each other, the
//! streaming manager builds a flat coordinate-to-grid index once per load
//! transaction and shares it read-only with every meshing task in the batch.
//! Chunks can then be destroyed independently without reference bookkeeping.

use std::{collections::HashMap, sync::Arc};

use crate::voxels::{grid::VoxelGrid, ChunkCoord};

/// Maps chunk coordinates to their frozen voxel grids.
///
/// An index is populated exactly once, before a batch's meshing stage starts,
/// and is only read afterwards. For boundary face culling to be correct it
/// must contain at least every chunk that is generated and not being
/// unloaded; a coordinate missing from the index is treated as "no occluder
/// known" by the mesher.
pub struct ChunkCoordinateIndex {
    grids: HashMap<ChunkCoord, Arc<VoxelGrid>>,
}

impl ChunkCoordinateIndex {
    /// Creates an empty index with room for `capacity` chunks.
    ///
    /// # Arguments
    /// * `capacity` - Expected number of chunks in the index
    ///
    /// # Returns
    /// A new, empty `ChunkCoordinateIndex`.
    pub fn with_capacity(capacity: usize) -> Self {
        ChunkCoordinateIndex {
            grids: HashMap::with_capacity(capacity),
        }
    }

    /// Adds a chunk's grid to the index.
    ///
    /// # Arguments
    /// * `coord` - The chunk's coordinate
    /// * `grid` - The chunk's frozen voxel grid
    pub fn insert(&mut self, coord: ChunkCoord, grid: Arc<VoxelGrid>) {
        self.grids.insert(coord, grid);
    }

    /// Looks up the grid of the chunk at the given coordinate.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinate to look up
    ///
    /// # Returns
    /// The chunk's grid, or `None` if the chunk is not ready or not loaded.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&Arc<VoxelGrid>> {
        self.grids.get(coord)
    }

    /// Returns the number of chunks in the index.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Returns `true` if the index contains no chunks.
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    #[test]
    fn test_insert_then_get() {
        let mut index = ChunkCoordinateIndex::with_capacity(4);
        assert!(index.is_empty());

        let grid = Arc::new(VoxelGrid::new(4, 8));
        index.insert(Point2::new(16, -16), grid.clone());

        assert_eq!(index.len(), 1);
        assert!(index.get(&Point2::new(16, -16)).is_some());
        assert!(index.get(&Point2::new(0, 0)).is_none());
        assert!(Arc::ptr_eq(index.get(&Point2::new(16, -16)).unwrap(), &grid));
    }
}
