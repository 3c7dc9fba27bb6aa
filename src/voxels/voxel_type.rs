//! # Voxel Type Module
//!
//! This module defines the different types of voxels in the generated world.
//! It provides functionality for voxel type identification, conversion from the
//! compact buffer representation, and flat-color lookup for mesh emission.

use num_derive::FromPrimitive;

use super::VoxelValue;

/// Enumerates all possible voxel types in the generated world.
///
/// Each variant represents a distinct terrain material. `Air` is the empty
/// sentinel used by every visibility and occupancy check. The `FromPrimitive`
/// derive allows conversion from the compact `u8` buffer representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum VoxelType {
    /// Empty space. Never emitted as geometry and never occludes a face.
    Air = 0,

    /// The topmost terrain band.
    Grass,

    /// The band directly below grass.
    Dirt,

    /// The deepest solid band.
    Stone,
}

impl VoxelType {
    /// Converts a `VoxelValue` to a `VoxelType`.
    ///
    /// This is used when reading voxels back out of a chunk's compact buffer.
    ///
    /// # Arguments
    /// * `value` - The voxel type as a `VoxelValue`
    ///
    /// # Returns
    /// The corresponding `VoxelType`
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid `VoxelType`.
    pub fn from_voxel_value(value: VoxelValue) -> Self {
        let vtype_option = num::FromPrimitive::from_u8(value);
        vtype_option.unwrap()
    }

    /// Returns `true` if this voxel occupies space and can occlude a face.
    pub fn is_solid(&self) -> bool {
        *self != VoxelType::Air
    }

    /// Returns the flat RGBA color used for every vertex of this voxel's faces.
    ///
    /// `Air` voxels are filtered out before emission, so their color is never
    /// sampled; the transparent black returned for them is a placeholder.
    pub fn color(&self) -> [u8; 4] {
        match self {
            VoxelType::Grass => [120, 200, 100, 255],
            VoxelType::Dirt => [139, 69, 19, 255],
            VoxelType::Stone => [150, 150, 150, 255],
            VoxelType::Air => [0, 0, 0, 0],
        }
    }
}
