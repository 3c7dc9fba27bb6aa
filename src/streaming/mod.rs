//! # Chunk Streaming Module
//!
//! This module provides the `ChunkStreamingManager`, the lifecycle coordinator
//! that keeps the loaded chunk set in sync with a moving viewer.
//!
//! ## State Machine
//!
//! Each tracked coordinate moves through `Loading → Active`, with a side
//! transition `Loading → ToUnload` for chunks whose coordinate leaves the
//! required set while their batch is still in flight. An `Active` chunk that
//! becomes unneeded is released immediately; a `ToUnload` chunk lingers only
//! until its in-flight result arrives, at which point the result is discarded
//! and the slot dropped.
//!
//! ## Load Transactions
//!
//! Newly required coordinates are generated and meshed together as one batch:
//! generation tasks fan out first, and only after the whole batch has
//! generated is the coordinate index populated and the meshing stage started.
//! That stage barrier is a hard ordering dependency: meshing against a
//! partially populated index would miscompute cross-chunk boundary faces.
//!
//! ## Stale Results
//!
//! There is no job cancellation. Work for a chunk that becomes unneeded runs
//! to completion and its output is dropped, recognized either by the slot's
//! `ToUnload` tag or by a batch id that no longer matches (the coordinate was
//! unloaded and re-required while the old batch was still in flight). A
//! discarded result is the expected outcome of a viewer outrunning a batch,
//! not an error.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use cgmath::Point3;

use crate::{
    config::{ConfigError, WorldConfig},
    generation::{tasks::chunk_generation_task::ChunkGenerationTask, TerrainGenerator},
    meshing::{
        tasks::chunk_meshing_task::ChunkMeshingTask, ChunkCoordinateIndex, ChunkMesh, ChunkMesher,
    },
    task_management::{task::TaskResult, TaskManager},
    voxels::{grid::VoxelGrid, ChunkCoord},
};

pub mod render_sink;

pub use render_sink::{LogSink, RenderSink};

/// The lifecycle state of a tracked chunk coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// The chunk is part of an in-flight load transaction.
    Loading,

    /// The chunk is generated and, unless its mesh was empty, rendered.
    Active,

    /// The chunk left the required set while still loading; its in-flight
    /// result will be discarded on arrival.
    ToUnload,
}

/// Bookkeeping for one tracked chunk coordinate.
struct ChunkSlot {
    state: ChunkState,
    /// The load transaction that owns this slot. Results tagged with any
    /// other batch id are stale and must not be applied to this slot.
    batch_id: u64,
    /// The frozen voxel grid, present once generation has completed.
    grid: Option<Arc<VoxelGrid>>,
    /// Whether a mesh for this chunk was handed to the render sink.
    renderable: bool,
}

/// The pipeline stage a load transaction is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionStage {
    /// Generation tasks are fanned out; grids are still arriving.
    Generating,

    /// The coordinate index is populated and meshing tasks are fanned out.
    Meshing,
}

/// One batch of newly required chunk coordinates moving through the pipeline.
struct LoadTransaction {
    /// The batch members, fixed at transaction start.
    coords: Vec<ChunkCoord>,
    /// Grids generated so far, keyed by coordinate. Drained into meshing
    /// tasks when the generation stage completes.
    generated: HashMap<ChunkCoord, Arc<VoxelGrid>>,
    stage: TransactionStage,
    /// Results still missing from the current stage.
    outstanding: usize,
    uploaded: usize,
    empty: usize,
    discarded: usize,
}

/// What happened to a meshing result when it was reconciled against the
/// current chunk state.
enum MeshOutcome {
    Discarded,
    Empty,
    Uploaded,
}

/// Drives chunk loading and unloading around a moving viewer.
///
/// The manager polls the viewer position, recomputes the required chunk disc
/// whenever the viewer crosses a chunk boundary, and reconciles tracked
/// chunks against it: missing coordinates join a new load transaction,
/// superfluous ones are unload-tagged or released. Completed batch results
/// are applied by `pump`, which never blocks; work proceeds across as many
/// ticks as it needs.
pub struct ChunkStreamingManager<S: RenderSink> {
    config: Arc<WorldConfig>,
    generator: Arc<TerrainGenerator>,
    mesher: Arc<ChunkMesher>,
    tasks: TaskManager,
    sink: S,
    chunks: HashMap<ChunkCoord, ChunkSlot>,
    transactions: HashMap<u64, LoadTransaction>,
    next_batch_id: u64,
    last_viewer_chunk: Option<ChunkCoord>,
}

impl<S: RenderSink> ChunkStreamingManager<S> {
    /// Creates a streaming manager with one worker per available CPU core.
    ///
    /// # Arguments
    /// * `config` - The world configuration; validated before any chunk work
    /// * `sink` - The rendering collaborator receiving finished meshes
    ///
    /// # Returns
    /// The ready manager, or a `ConfigError` if the configuration is invalid.
    pub fn new(config: WorldConfig, sink: S) -> Result<Self, ConfigError> {
        let num_workers = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4);
        Self::with_workers(config, sink, num_workers)
    }

    /// Creates a streaming manager with an explicit worker count.
    ///
    /// # Arguments
    /// * `config` - The world configuration; validated before any chunk work
    /// * `sink` - The rendering collaborator receiving finished meshes
    /// * `num_workers` - Worker threads for the generation/meshing pool
    ///
    /// # Returns
    /// The ready manager, or a `ConfigError` if the configuration is invalid.
    pub fn with_workers(
        mut config: WorldConfig,
        sink: S,
        num_workers: usize,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.resolve_seed();
        let config = Arc::new(config);

        Ok(ChunkStreamingManager {
            generator: Arc::new(TerrainGenerator::new(config.clone())),
            mesher: Arc::new(ChunkMesher::new(config.clone())),
            tasks: TaskManager::new(num_workers),
            sink,
            chunks: HashMap::new(),
            transactions: HashMap::new(),
            next_batch_id: 0,
            last_viewer_chunk: None,
            config,
        })
    }

    /// Polls the viewer position and reconciles the chunk set if it moved.
    ///
    /// The position is quantized to the chunk grid by floor-division on the
    /// horizontal axes; nothing happens unless the quantized coordinate
    /// changed since the previous call.
    ///
    /// # Arguments
    /// * `position` - The viewer's world-space position
    pub fn update_viewer(&mut self, position: Point3<f32>) {
        let size = self.config.chunk_size as f32;
        let viewer_chunk = ChunkCoord::new(
            (position.x / size).floor() as i32 * self.config.chunk_size as i32,
            (position.z / size).floor() as i32 * self.config.chunk_size as i32,
        );

        if self.last_viewer_chunk == Some(viewer_chunk) {
            return;
        }

        log::debug!(
            "Viewer crossed into chunk ({}, {})",
            viewer_chunk.x,
            viewer_chunk.y
        );
        self.last_viewer_chunk = Some(viewer_chunk);
        self.reconcile(viewer_chunk);
    }

    /// Applies whatever batch results have arrived and dispatches queued work.
    ///
    /// Never blocks: results still in flight are simply picked up by a later
    /// call. Intended to be called once per tick alongside `update_viewer`.
    pub fn pump(&mut self) {
        self.tasks.process_queued_tasks();

        for result in self.tasks.process_completed_tasks() {
            match result {
                TaskResult::ChunkGenerated {
                    batch_id,
                    coord,
                    grid,
                } => self.on_chunk_generated(batch_id, coord, grid),
                TaskResult::ChunkMeshed {
                    batch_id,
                    coord,
                    mesh,
                } => self.on_chunk_meshed(batch_id, coord, mesh),
            }
        }

        // Meshing tasks scheduled while applying results above should not
        // have to wait for the next tick.
        self.tasks.process_queued_tasks();
    }

    /// Returns `true` when no load transaction is in flight.
    pub fn is_idle(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Returns the state of the chunk at the given coordinate, if tracked.
    pub fn chunk_state(&self, coord: &ChunkCoord) -> Option<ChunkState> {
        self.chunks.get(coord).map(|slot| slot.state)
    }

    /// Returns the coordinates of all chunks currently in the `Active` state.
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        self.chunks
            .iter()
            .filter(|(_, slot)| slot.state == ChunkState::Active)
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Returns the number of tracked chunk coordinates in any state.
    pub fn tracked_len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the render sink for inspection.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the validated world configuration the manager runs on.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Computes the disc of required chunk coordinates around the viewer.
    ///
    /// The disc contains every coordinate within `render_distance` chunks of
    /// the viewer's chunk, measured by squared grid distance, scaled to
    /// world-space chunk coordinates.
    fn required_set(&self, viewer_chunk: ChunkCoord) -> HashSet<ChunkCoord> {
        let size = self.config.chunk_size as i32;
        let radius = self.config.render_distance as i32;
        let mut required = HashSet::new();

        for dx in -radius..=radius {
            for dz in -radius..=radius {
                if dx * dx + dz * dz > radius * radius {
                    continue;
                }
                required.insert(ChunkCoord::new(
                    viewer_chunk.x + dx * size,
                    viewer_chunk.y + dz * size,
                ));
            }
        }

        required
    }

    /// Diffs tracked chunks against the required set and acts on the result.
    ///
    /// Tracked-but-unrequired chunks are unload-tagged (`Loading`) or released
    /// immediately (`Active`); required-but-untracked coordinates join a fresh
    /// load transaction.
    fn reconcile(&mut self, viewer_chunk: ChunkCoord) {
        let required = self.required_set(viewer_chunk);

        let tracked: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        for coord in tracked {
            if required.contains(&coord) {
                continue;
            }
            let Some(slot) = self.chunks.get_mut(&coord) else {
                continue;
            };

            let mut release = None;
            match slot.state {
                ChunkState::Loading => slot.state = ChunkState::ToUnload,
                ChunkState::Active => release = Some(slot.renderable),
                ChunkState::ToUnload => {}
            }
            if let Some(renderable) = release {
                self.chunks.remove(&coord);
                if renderable {
                    self.sink.release(coord);
                }
            }
        }

        let mut new_coords = Vec::new();
        for coord in required {
            match self.chunks.get(&coord) {
                None => new_coords.push(coord),
                // A chunk tagged for unload that is required again restarts
                // from scratch under a new batch id; the dying slot's result
                // is discarded by id mismatch when it arrives.
                Some(slot) if slot.state == ChunkState::ToUnload => new_coords.push(coord),
                _ => {}
            }
        }

        if !new_coords.is_empty() {
            self.begin_transaction(new_coords);
        }
    }

    /// Starts a load transaction over the given coordinates.
    ///
    /// Every coordinate gets a fresh `Loading` slot tied to the new batch id
    /// and a generation task on the worker pool.
    fn begin_transaction(&mut self, coords: Vec<ChunkCoord>) {
        let batch_id = self.next_batch_id;
        self.next_batch_id += 1;

        log::info!(
            "Load transaction {}: generating {} chunks",
            batch_id,
            coords.len()
        );

        for coord in &coords {
            self.chunks.insert(
                *coord,
                ChunkSlot {
                    state: ChunkState::Loading,
                    batch_id,
                    grid: None,
                    renderable: false,
                },
            );
            self.tasks.publish_task(Box::new(ChunkGenerationTask::new(
                self.generator.clone(),
                *coord,
                batch_id,
            )));
        }

        let outstanding = coords.len();
        self.transactions.insert(
            batch_id,
            LoadTransaction {
                coords,
                generated: HashMap::new(),
                stage: TransactionStage::Generating,
                outstanding,
                uploaded: 0,
                empty: 0,
                discarded: 0,
            },
        );
    }

    /// Applies one generation result to its transaction and slot.
    fn on_chunk_generated(&mut self, batch_id: u64, coord: ChunkCoord, grid: Arc<VoxelGrid>) {
        if let Some(slot) = self.chunks.get_mut(&coord) {
            if slot.batch_id == batch_id {
                slot.grid = Some(grid.clone());
            }
        }

        let Some(txn) = self.transactions.get_mut(&batch_id) else {
            return;
        };
        if txn.stage != TransactionStage::Generating {
            return;
        }
        txn.generated.insert(coord, grid);
        txn.outstanding -= 1;

        if txn.outstanding == 0 {
            self.start_meshing(batch_id);
        }
    }

    /// Moves a fully generated transaction into its meshing stage.
    ///
    /// The coordinate index is populated exactly once here (the batch's
    /// grids merged with every already-active chunk) and then shared
    /// read-only by all of the batch's meshing tasks.
    fn start_meshing(&mut self, batch_id: u64) {
        let generated: Vec<(ChunkCoord, Arc<VoxelGrid>)> =
            match self.transactions.get_mut(&batch_id) {
                Some(txn) => {
                    txn.stage = TransactionStage::Meshing;
                    txn.outstanding = txn.generated.len();
                    txn.generated.drain().collect()
                }
                None => return,
            };

        let mut index = ChunkCoordinateIndex::with_capacity(self.chunks.len());
        for (coord, slot) in &self.chunks {
            if slot.state == ChunkState::Active {
                if let Some(grid) = &slot.grid {
                    index.insert(*coord, grid.clone());
                }
            }
        }
        for (coord, grid) in &generated {
            match self.chunks.get(coord) {
                Some(slot) if slot.batch_id == batch_id && slot.state == ChunkState::Loading => {
                    index.insert(*coord, grid.clone());
                }
                _ => {}
            }
        }

        log::debug!(
            "Load transaction {}: meshing {} chunks against an index of {}",
            batch_id,
            generated.len(),
            index.len()
        );

        let index = Arc::new(index);
        for (coord, grid) in generated {
            self.tasks.publish_task(Box::new(ChunkMeshingTask::new(
                self.mesher.clone(),
                grid,
                index.clone(),
                coord,
                batch_id,
            )));
        }
    }

    /// Reconciles one meshing result against the current chunk state.
    ///
    /// The result is applied only if its chunk's slot still belongs to the
    /// same batch and has not been unload-tagged; otherwise the mesh is
    /// dropped, releasing its buffers.
    fn on_chunk_meshed(&mut self, batch_id: u64, coord: ChunkCoord, mesh: ChunkMesh) {
        let mut remove_slot = false;
        let mut upload = None;

        let outcome = match self.chunks.get_mut(&coord) {
            None => MeshOutcome::Discarded,
            Some(slot) => {
                if slot.batch_id != batch_id {
                    // The coordinate was re-required under a newer batch;
                    // this result belongs to the dead one.
                    MeshOutcome::Discarded
                } else if slot.state == ChunkState::ToUnload {
                    remove_slot = true;
                    MeshOutcome::Discarded
                } else {
                    slot.state = ChunkState::Active;
                    if mesh.is_empty() {
                        slot.renderable = false;
                        MeshOutcome::Empty
                    } else {
                        slot.renderable = true;
                        upload = Some(mesh);
                        MeshOutcome::Uploaded
                    }
                }
            }
        };

        if remove_slot {
            self.chunks.remove(&coord);
        }
        if let Some(mesh) = upload {
            self.sink.upload(coord, mesh);
        }

        let Some(txn) = self.transactions.get_mut(&batch_id) else {
            return;
        };
        txn.outstanding -= 1;
        match outcome {
            MeshOutcome::Discarded => txn.discarded += 1,
            MeshOutcome::Empty => txn.empty += 1,
            MeshOutcome::Uploaded => txn.uploaded += 1,
        }

        if txn.outstanding == 0 {
            log::info!(
                "Load transaction {} complete: {} of {} uploaded, {} empty, {} discarded",
                batch_id,
                txn.uploaded,
                txn.coords.len(),
                txn.empty,
                txn.discarded
            );
            self.transactions.remove(&batch_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    /// A sink that remembers every hand-off for later assertions.
    #[derive(Default)]
    struct RecordingSink {
        uploads: Vec<ChunkCoord>,
        releases: Vec<ChunkCoord>,
    }

    impl RenderSink for RecordingSink {
        fn upload(&mut self, coord: ChunkCoord, _mesh: ChunkMesh) {
            self.uploads.push(coord);
        }

        fn release(&mut self, coord: ChunkCoord) {
            self.releases.push(coord);
        }
    }

    fn test_config() -> WorldConfig {
        WorldConfig {
            chunk_size: 16,
            chunk_height: 32,
            render_distance: 2,
            frequency: 0.01,
            amplitude: 8.0,
            seed: Some("test".to_string()),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected_before_any_work() {
        let mut config = test_config();
        config.chunk_size = 0;
        let result = ChunkStreamingManager::with_workers(config, RecordingSink::default(), 1);
        assert!(matches!(result, Err(ConfigError::ChunkSize(0))));
    }

    #[test]
    fn test_viewer_quantization_floors_toward_negative() {
        let mut manager =
            ChunkStreamingManager::with_workers(test_config(), RecordingSink::default(), 1)
                .unwrap();

        manager.update_viewer(Point3::new(-0.5, 64.0, -0.5));
        assert_eq!(manager.last_viewer_chunk, Some(Point2::new(-16, -16)));

        manager.update_viewer(Point3::new(17.2, 64.0, 0.1));
        assert_eq!(manager.last_viewer_chunk, Some(Point2::new(16, 0)));
    }

    #[test]
    fn test_unmoved_viewer_triggers_no_new_transaction() {
        let mut manager =
            ChunkStreamingManager::with_workers(test_config(), RecordingSink::default(), 1)
                .unwrap();

        manager.update_viewer(Point3::new(8.0, 64.0, 8.0));
        let first_batch = manager.next_batch_id;
        assert_eq!(first_batch, 1);

        // Moving within the same chunk changes nothing.
        manager.update_viewer(Point3::new(12.0, 64.0, 3.0));
        assert_eq!(manager.next_batch_id, first_batch);
    }

    #[test]
    fn test_required_set_is_a_disc() {
        let manager =
            ChunkStreamingManager::with_workers(test_config(), RecordingSink::default(), 1)
                .unwrap();

        let required = manager.required_set(Point2::new(0, 0));

        // r=2: 13 coordinates satisfy dx² + dz² <= 4.
        assert_eq!(required.len(), 13);
        assert!(required.contains(&Point2::new(0, 0)));
        assert!(required.contains(&Point2::new(32, 0)));
        assert!(required.contains(&Point2::new(16, 16)));
        // The square's corners fall outside the disc.
        assert!(!required.contains(&Point2::new(32, 32)));
    }

    #[test]
    fn test_new_coordinates_start_loading() {
        let mut manager =
            ChunkStreamingManager::with_workers(test_config(), RecordingSink::default(), 1)
                .unwrap();

        manager.update_viewer(Point3::new(8.0, 64.0, 8.0));

        // Before any pump, every required coordinate is tracked as Loading.
        assert_eq!(manager.tracked_len(), 13);
        assert_eq!(
            manager.chunk_state(&Point2::new(0, 0)),
            Some(ChunkState::Loading)
        );
        assert!(!manager.is_idle());
    }
}
