//! # Task System Core Types
//!
//! This module defines the unit of work executed by the worker pool and the
//! typed results it produces.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The returned `TaskResult` travels back over the worker's channel
//! 4. The streaming manager drains results on the coordinator thread via
//!    `TaskManager::process_completed_tasks()` and applies them to chunk state
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker thread
//! - Results carry only owned or frozen (`Arc`) data back to the coordinator

use std::sync::Arc;

use crate::{
    meshing::ChunkMesh,
    voxels::{grid::VoxelGrid, ChunkCoord},
};

/// A unit of work that can be executed on a worker thread.
///
/// Tasks own all the data they need: shared pipeline inputs travel as `Arc`s
/// and results are returned by value, so no task ever holds a reference into
/// coordinator-owned state.
pub trait Task: Send {
    /// Processes the task and returns its result.
    ///
    /// This method contains the actual work performed on a worker thread. It
    /// must not block on other tasks; every task in a batch is independent of
    /// its peers within the same pipeline stage.
    ///
    /// # Returns
    /// The typed result delivered back to the coordinator thread.
    fn process(&self) -> TaskResult;
}

/// The result of a completed pipeline task.
///
/// Results are tagged with the load transaction (`batch_id`) they belong to,
/// which is how the streaming manager recognizes superseded work: a result
/// whose batch no longer matches its chunk's slot is discarded rather than
/// applied.
pub enum TaskResult {
    /// A chunk's voxel grid has been generated and frozen.
    ChunkGenerated {
        /// The load transaction the generation task belonged to.
        batch_id: u64,
        /// The generated chunk's coordinate.
        coord: ChunkCoord,
        /// The frozen voxel grid.
        grid: Arc<VoxelGrid>,
    },

    /// A chunk's surface mesh has been extracted.
    ChunkMeshed {
        /// The load transaction the meshing task belonged to.
        batch_id: u64,
        /// The meshed chunk's coordinate.
        coord: ChunkCoord,
        /// The finished mesh with bounds; may be empty.
        mesh: ChunkMesh,
    },
}
