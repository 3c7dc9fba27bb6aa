//! # Terrain Generation Module
//!
//! This module turns a chunk coordinate into a fully populated voxel grid.
//! Generation is a pure function of the world configuration and the chunk
//! coordinate: the same inputs always produce byte-identical voxel buffers,
//! which is what makes a never-persisted world possible: every chunk can be
//! regenerated from `(seed, coordinate)` at any time.
//!
//! ## Algorithm
//!
//! Each local column `(x, z)` samples 2D simplex noise at its world position,
//! scaled by the configured frequency and perturbed by a seed-derived domain
//! offset. The sample is remapped from `[-1, 1]` to `[0, 1]` and scaled by the
//! amplitude to yield an integer surface height. Voxel types are then assigned
//! in bands below that height: three layers of grass, two of dirt, two of
//! stone, air everywhere else. Columns are fully independent of each other,
//! which makes generation embarrassingly parallel across chunks.

use std::sync::Arc;

use noise::{NoiseFn, Simplex};

use crate::{
    config::{seed, WorldConfig},
    voxels::{grid::VoxelGrid, voxel_type::VoxelType, ChunkCoord},
};

pub mod tasks;

/// Fills chunk voxel grids deterministically from seeded simplex noise.
///
/// The generator derives its noise domain offset once from the configured
/// seed; all per-seed variability enters through that offset, so the noise
/// function itself is constructed with a fixed seed.
pub struct TerrainGenerator {
    config: Arc<WorldConfig>,
    noise: Simplex,
    offset_x: f32,
    offset_z: f32,
}

impl TerrainGenerator {
    /// Creates a generator for the given world configuration.
    ///
    /// # Arguments
    /// * `config` - The validated world configuration
    ///
    /// # Returns
    /// A new `TerrainGenerator` ready to fill chunks.
    pub fn new(config: Arc<WorldConfig>) -> Self {
        let (offset_x, offset_z) = seed::noise_offsets(config.seed_hash());
        TerrainGenerator {
            config,
            noise: Simplex::new(0),
            offset_x,
            offset_z,
        }
    }

    /// Generates the voxel grid for the chunk at the given coordinate.
    ///
    /// # Arguments
    /// * `coord` - The chunk's world-space coordinate
    ///
    /// # Returns
    /// A fully populated `VoxelGrid`. Generation is total: there is no error
    /// condition for any in-range configuration.
    pub fn generate(&self, coord: ChunkCoord) -> VoxelGrid {
        let size = self.config.chunk_size as i32;
        let height = self.config.chunk_height as i32;
        let mut grid = VoxelGrid::new(size as usize, height as usize);

        for x in 0..size {
            for z in 0..size {
                let sample = self.noise.get([
                    ((coord.x + x) as f32 * self.config.frequency + self.offset_x) as f64,
                    ((coord.y + z) as f32 * self.config.frequency + self.offset_z) as f64,
                ]);

                // Remap from [-1, 1] to [0, 1] before scaling to a height.
                let normalized = (sample as f32 + 1.0) * 0.5;
                let column_height = (normalized * self.config.amplitude).round() as i32;

                for y in 0..height {
                    // Bands overlap at their boundaries; first match wins,
                    // so grass takes precedence at equal boundary values.
                    let vtype = if y >= column_height - 2 && y <= column_height {
                        VoxelType::Grass
                    } else if y >= column_height - 4 && y <= column_height - 2 {
                        VoxelType::Dirt
                    } else if y >= column_height - 6 && y <= column_height - 4 {
                        VoxelType::Stone
                    } else {
                        VoxelType::Air
                    };

                    grid.set(x as usize, y as usize, z as usize, vtype);
                }
            }
        }

        grid
    }
}
