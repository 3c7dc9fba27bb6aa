//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which fills a chunk's voxel
//! grid on a worker thread. One task is scheduled per newly required chunk
//! coordinate when a load transaction begins.

use std::sync::Arc;

use crate::{
    generation::TerrainGenerator,
    task_management::task::{Task, TaskResult},
    voxels::ChunkCoord,
};

/// A task that generates one chunk's voxel data asynchronously.
///
/// The task owns everything it needs: the shared generator and the coordinate
/// to fill. The produced grid is frozen behind an `Arc` before it leaves the
/// worker thread, so no later stage can mutate it.
pub struct ChunkGenerationTask {
    /// The shared terrain generator for this world.
    generator: Arc<TerrainGenerator>,
    /// The chunk coordinate to generate.
    coord: ChunkCoord,
    /// The load transaction this task belongs to.
    batch_id: u64,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The shared terrain generator
    /// * `coord` - The chunk coordinate to generate
    /// * `batch_id` - The load transaction this task belongs to
    ///
    /// # Returns
    /// A new `ChunkGenerationTask` instance
    pub fn new(generator: Arc<TerrainGenerator>, coord: ChunkCoord, batch_id: u64) -> Self {
        ChunkGenerationTask {
            generator,
            coord,
            batch_id,
        }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the voxel grid for this task's coordinate.
    ///
    /// # Returns
    /// A `TaskResult::ChunkGenerated` carrying the frozen grid.
    fn process(&self) -> TaskResult {
        TaskResult::ChunkGenerated {
            batch_id: self.batch_id,
            coord: self.coord,
            grid: Arc::new(self.generator.generate(self.coord)),
        }
    }
}
