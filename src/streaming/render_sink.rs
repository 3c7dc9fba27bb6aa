//! # Render Sink Module
//!
//! This module defines the boundary contract between the streaming pipeline
//! and the rendering collaborator. The pipeline hands finished meshes over
//! through a `RenderSink` and notifies it when a chunk's representation
//! should be disposed; everything on the far side of the trait (materials,
//! GPU upload, draw scheduling) is outside this crate.

use crate::{meshing::ChunkMesh, voxels::ChunkCoord};

/// Receives finished chunk meshes and release notifications.
///
/// The streaming manager calls `upload` exactly once per chunk generation
/// cycle, transferring ownership of the mesh, and `release` when a previously
/// uploaded chunk leaves the required set. Empty meshes are never uploaded;
/// a chunk with no visible face becomes active without a renderable
/// representation and produces no sink call at all.
pub trait RenderSink {
    /// Accepts ownership of a newly meshed chunk's geometry and bounds.
    ///
    /// # Arguments
    /// * `coord` - The chunk's world-space coordinate
    /// * `mesh` - The finished mesh; never empty
    fn upload(&mut self, coord: ChunkCoord, mesh: ChunkMesh);

    /// Notifies that a previously uploaded chunk is gone.
    ///
    /// # Arguments
    /// * `coord` - The unloaded chunk's world-space coordinate
    fn release(&mut self, coord: ChunkCoord);
}

/// A render sink that logs hand-offs instead of rendering them.
///
/// Used by the headless demo driver to make the pipeline observable without
/// a GPU surface. Keeps running totals so the driver can report end-of-run
/// statistics.
#[derive(Default)]
pub struct LogSink {
    uploads: usize,
    releases: usize,
}

impl LogSink {
    /// Creates a new sink with zeroed counters.
    pub fn new() -> Self {
        LogSink::default()
    }

    /// Returns the number of meshes uploaded so far.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Returns the number of release notifications so far.
    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl RenderSink for LogSink {
    fn upload(&mut self, coord: ChunkCoord, mesh: ChunkMesh) {
        self.uploads += 1;
        log::debug!(
            "Uploaded chunk ({}, {}): {} faces, bounds {:?}",
            coord.x,
            coord.y,
            mesh.face_count(),
            mesh.bounds
        );
    }

    fn release(&mut self, coord: ChunkCoord) {
        self.releases += 1;
        log::debug!("Released chunk ({}, {})", coord.x, coord.y);
    }
}
