//! # Voxel Data Module
//!
//! This module contains the foundational voxel data types used by every stage
//! of the streaming pipeline:
//!
//! * **VoxelType**: the small set of terrain materials a voxel can hold
//! * **VoxelFace**: the six faces of a unit cube with their normals and corner tables
//! * **VoxelGrid**: the dense per-chunk voxel buffer with flatten/unflatten addressing
//!
//! ## Addressing
//!
//! A chunk is identified by its world-space coordinate on the horizontal plane
//! (always a multiple of the chunk size), while voxels inside a chunk are
//! addressed by local `(x, y, z)` coordinates flattened into a single buffer
//! index. The same flattening scheme is shared by the terrain generator and
//! the mesher; mixing schemes would silently corrupt neighbor lookups.
//!
//! ## Thread Safety
//!
//! A `VoxelGrid` is written exactly once by the generation task that owns it
//! and is frozen afterwards. Frozen grids are shared between meshing tasks as
//! plain `Arc<VoxelGrid>` without further synchronization.

use cgmath::Point2;

pub mod grid;
pub mod voxel_face;
pub mod voxel_type;

/// The storage representation of a voxel inside a chunk buffer.
pub type VoxelValue = u8;

/// Identifies a chunk by its world-space position on the horizontal plane.
///
/// Both components are multiples of the chunk size; `x` is the world X of the
/// chunk's origin column and `y` holds the world Z. Neighboring chunks differ
/// by exactly one chunk size along one component.
pub type ChunkCoord = Point2<i32>;
