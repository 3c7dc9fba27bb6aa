//! # Voxel Grid Module
//!
//! This module provides the `VoxelGrid` struct: the dense per-chunk voxel
//! buffer together with the flatten/unflatten addressing math shared by the
//! terrain generator and the mesher.
//!
//! ## Layout
//!
//! Voxels are stored in a flat buffer of length `size² × height`, addressed by
//! `(x, y, z) → x·size·height + z·height + y`, so Y is the fastest-varying
//! local axis. A whole column of voxels is therefore contiguous in memory,
//! which matches the column-at-a-time access pattern of terrain generation.

use super::{voxel_type::VoxelType, VoxelValue};

/// A dense grid of voxel values for a single chunk.
///
/// The grid owns a flat `VoxelValue` buffer and knows its own dimensions, so
/// all addressing goes through the one flattening scheme. A grid is written
/// exactly once, by the generation task that creates it, and is read-only
/// afterwards (including by neighboring chunks' meshing tasks).
pub struct VoxelGrid {
    /// Flat voxel buffer of length `size * size * height`.
    voxels: Vec<VoxelValue>,
    /// Voxels per horizontal axis.
    size: usize,
    /// Voxels along the vertical axis.
    height: usize,
}

impl VoxelGrid {
    /// Creates a new grid of the given dimensions, filled with `Air`.
    ///
    /// # Arguments
    /// * `size` - Voxels per horizontal axis
    /// * `height` - Voxels along the vertical axis
    ///
    /// # Returns
    /// A new `VoxelGrid` with every voxel set to `VoxelType::Air`.
    pub fn new(size: usize, height: usize) -> Self {
        VoxelGrid {
            voxels: vec![VoxelType::Air as VoxelValue; size * size * height],
            size,
            height,
        }
    }

    /// Returns the number of voxels per horizontal axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of voxels along the vertical axis.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the total number of voxels in the grid.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` if the grid holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Returns the raw voxel buffer.
    ///
    /// Useful for byte-level comparisons between grids; the buffer layout is
    /// the flattening scheme documented on this module.
    pub fn as_values(&self) -> &[VoxelValue] {
        &self.voxels
    }

    /// Flattens local 3D coordinates into a buffer index.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Local voxel coordinates within the grid
    ///
    /// # Returns
    /// The buffer index of the voxel.
    pub fn flatten(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.size && y < self.height && z < self.size);
        x * self.size * self.height + z * self.height + y
    }

    /// Converts a buffer index back into local 3D coordinates.
    ///
    /// # Arguments
    /// * `index` - A buffer index previously produced by `flatten`
    ///
    /// # Returns
    /// The `(x, y, z)` local coordinates of the voxel.
    pub fn unflatten(&self, index: usize) -> (usize, usize, usize) {
        debug_assert!(index < self.voxels.len());
        (
            index / (self.size * self.height),
            index % self.height,
            (index / self.height) % self.size,
        )
    }

    /// Returns the voxel type at the given local coordinates.
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelType {
        VoxelType::from_voxel_value(self.voxels[self.flatten(x, y, z)])
    }

    /// Returns the voxel type at the given buffer index.
    pub fn get_index(&self, index: usize) -> VoxelType {
        VoxelType::from_voxel_value(self.voxels[index])
    }

    /// Sets the voxel type at the given local coordinates.
    pub fn set(&mut self, x: usize, y: usize, z: usize, vtype: VoxelType) {
        let index = self.flatten(x, y, z);
        self.voxels[index] = vtype as VoxelValue;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_unflatten_round_trip() {
        let grid = VoxelGrid::new(16, 255);
        for x in 0..16 {
            for y in 0..255 {
                for z in 0..16 {
                    let index = grid.flatten(x, y, z);
                    assert_eq!(grid.unflatten(index), (x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_flatten_covers_buffer_exactly_once() {
        let grid = VoxelGrid::new(4, 8);
        let mut seen = vec![false; grid.len()];
        for x in 0..4 {
            for y in 0..8 {
                for z in 0..4 {
                    let index = grid.flatten(x, y, z);
                    assert!(!seen[index]);
                    seen[index] = true;
                }
            }
        }
        assert!(seen.into_iter().all(|hit| hit));
    }

    #[test]
    fn test_new_grid_is_all_air() {
        let grid = VoxelGrid::new(8, 16);
        assert_eq!(grid.len(), 8 * 8 * 16);
        assert!((0..grid.len()).all(|i| grid.get_index(i) == VoxelType::Air));
    }

    #[test]
    fn test_set_then_get() {
        let mut grid = VoxelGrid::new(8, 16);
        grid.set(3, 10, 5, VoxelType::Stone);
        assert_eq!(grid.get(3, 10, 5), VoxelType::Stone);
        assert_eq!(grid.get(5, 10, 3), VoxelType::Air);
    }
}
