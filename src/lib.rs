#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Stream
//!
//! An infinite, procedurally generated voxel terrain streamed as fixed-size
//! chunks around a moving viewer.
//!
//! This crate implements the chunk streaming and meshing pipeline: it decides
//! which chunks must exist near the viewer, generates their voxel data from
//! seeded noise, extracts face-culled surface meshes with correct
//! chunk-boundary handling, and hands the finished geometry to a rendering
//! collaborator.
//!
//! ## Key Modules
//!
//! * `config` - World generation configuration, validation, and seed hashing
//! * `voxels` - Voxel types, face tables, and the dense per-chunk grid
//! * `generation` - Deterministic noise-based terrain generation
//! * `meshing` - Two-pass face-culled surface extraction and the neighbor index
//! * `streaming` - The chunk lifecycle manager and the render sink contract
//! * `task_management` - The worker pool that fans batches out across threads
//!
//! ## Architecture
//!
//! The pipeline is a sequence of data-parallel batch stages driven by a
//! single coordinator:
//!
//! 1. The viewer's position is quantized to the chunk grid; on change, the
//!    required chunk disc is recomputed and diffed against tracked chunks
//! 2. Newly required coordinates are generated in parallel as one load
//!    transaction
//! 3. Once the whole batch has generated, a coordinate index over the batch
//!    and all ready chunks is populated, and meshing fans out against it
//! 4. Completed meshes are reconciled against current chunk state; stale
//!    results (the viewer moved on) are discarded, the rest are handed to
//!    the render sink
//!
//! ## Determinism
//!
//! The world is never persisted. Identical `(seed, frequency, amplitude,
//! chunk size, chunk height)` regenerate byte-identical chunks at any
//! coordinate, so unloading a chunk is always safe.
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_stream::config::WorldConfig;
//! use voxel_stream::streaming::{ChunkStreamingManager, LogSink};
//!
//! let mut manager =
//!     ChunkStreamingManager::new(WorldConfig::default(), LogSink::new()).unwrap();
//!
//! // Each simulation tick:
//! manager.update_viewer(Point3::new(8.0, 64.0, 8.0));
//! manager.pump();
//! ```

use std::path::Path;
use std::time::Duration;

use cgmath::Point3;
use log::info;

use crate::{
    config::{ConfigError, WorldConfig},
    streaming::{ChunkStreamingManager, LogSink},
};

pub mod config;
pub mod generation;
pub mod meshing;
pub mod streaming;
pub mod task_management;
pub mod voxels;

/// Number of simulation ticks the headless demo walks the viewer for.
const DEMO_TICKS: u32 = 64;

/// Wall-clock length of one demo tick.
const DEMO_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Runs the headless streaming demo.
///
/// Initializes logging, loads the world configuration (from the JSON file
/// named by the first command-line argument, or defaults), and walks a
/// scripted viewer through the world while pumping the streaming manager.
/// All chunk hand-offs go to a logging sink; run with `RUST_LOG=info` (or
/// `debug` for per-chunk detail) to watch the pipeline work.
///
/// # Returns
/// `Ok(())` after the walk completes and all in-flight work has drained, or
/// a `ConfigError` if the configuration is unreadable or invalid.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_file(Path::new(&path))?,
        None => WorldConfig::default(),
    };

    let mut manager = ChunkStreamingManager::new(config, LogSink::new())?;

    let chunk_size = manager.config().chunk_size as f32;
    let mut position = Point3::new(chunk_size * 0.5, 64.0, chunk_size * 0.5);
    let step = chunk_size / 4.0;

    for _ in 0..DEMO_TICKS {
        manager.update_viewer(position);
        manager.pump();
        position.x += step;
        std::thread::sleep(DEMO_TICK_INTERVAL);
    }

    // Let the trailing batches finish so the run ends in a settled state.
    while !manager.is_idle() {
        manager.pump();
        std::thread::sleep(Duration::from_millis(1));
    }

    info!(
        "Walked {} ticks: {} chunks active, {} meshes uploaded, {} released",
        DEMO_TICKS,
        manager.active_coords().len(),
        manager.sink().uploads(),
        manager.sink().releases()
    );

    Ok(())
}
