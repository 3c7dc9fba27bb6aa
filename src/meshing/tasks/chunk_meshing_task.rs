//! # Chunk Meshing Task
//!
//! This module defines the `ChunkMeshingTask` which extracts one chunk's
//! surface mesh on a worker thread. Meshing tasks for a load transaction are
//! only scheduled after the whole batch has finished generating and the
//! shared coordinate index has been populated; starting earlier would
//! miscompute cross-chunk boundary faces.

use std::sync::Arc;

use crate::{
    meshing::{ChunkCoordinateIndex, ChunkMesher},
    task_management::task::{Task, TaskResult},
    voxels::{grid::VoxelGrid, ChunkCoord},
};

/// A task that meshes one chunk in a background thread.
///
/// The task shares the frozen voxel grid of its chunk and the batch's
/// read-only neighbor index; its output buffers are owned exclusively by the
/// task until the result is handed back to the streaming manager.
pub struct ChunkMeshingTask {
    /// The shared chunk mesher for this world.
    mesher: Arc<ChunkMesher>,
    /// The frozen voxel grid of the chunk to mesh.
    grid: Arc<VoxelGrid>,
    /// The read-only neighbor index for the whole batch.
    index: Arc<ChunkCoordinateIndex>,
    /// The chunk coordinate being meshed.
    coord: ChunkCoord,
    /// The load transaction this task belongs to.
    batch_id: u64,
}

impl ChunkMeshingTask {
    /// Creates a new chunk meshing task.
    ///
    /// # Arguments
    /// * `mesher` - The shared chunk mesher
    /// * `grid` - The chunk's frozen voxel grid
    /// * `index` - The batch's populated neighbor index
    /// * `coord` - The chunk coordinate being meshed
    /// * `batch_id` - The load transaction this task belongs to
    ///
    /// # Returns
    /// A new `ChunkMeshingTask` instance
    pub fn new(
        mesher: Arc<ChunkMesher>,
        grid: Arc<VoxelGrid>,
        index: Arc<ChunkCoordinateIndex>,
        coord: ChunkCoord,
        batch_id: u64,
    ) -> Self {
        ChunkMeshingTask {
            mesher,
            grid,
            index,
            coord,
            batch_id,
        }
    }
}

impl Task for ChunkMeshingTask {
    /// Extracts the surface mesh for this task's chunk.
    ///
    /// # Returns
    /// A `TaskResult::ChunkMeshed` carrying the finished mesh and bounds.
    fn process(&self) -> TaskResult {
        TaskResult::ChunkMeshed {
            batch_id: self.batch_id,
            coord: self.coord,
            mesh: self.mesher.mesh_chunk(&self.grid, self.coord, &self.index),
        }
    }
}
