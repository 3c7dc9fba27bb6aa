//! # Voxel Face Module
//!
//! This module defines the six faces of a unit voxel cube together with the
//! lookup tables the mesher needs to turn a visible face into geometry: the
//! eight cube corners, the outward unit normal per face, and the four corner
//! indices per face in emission order.

use cgmath::Vector3;

/// The number of faces on a voxel cube.
pub const FACE_COUNT: usize = 6;

/// The number of corners emitted per face quad.
pub const FACE_CORNERS: usize = 4;

/// The eight corners of a unit cube centered on the voxel position.
pub const CUBE_CORNERS: [Vector3<f32>; 8] = [
    Vector3::new(-0.5, -0.5, 0.5),  // Back bottom-left
    Vector3::new(0.5, -0.5, 0.5),   // Back bottom-right
    Vector3::new(0.5, -0.5, -0.5),  // Front bottom-right
    Vector3::new(-0.5, -0.5, -0.5), // Front bottom-left
    Vector3::new(-0.5, 0.5, 0.5),   // Back top-left
    Vector3::new(0.5, 0.5, 0.5),    // Back top-right
    Vector3::new(0.5, 0.5, -0.5),   // Front top-right
    Vector3::new(-0.5, 0.5, -0.5),  // Front top-left
];

/// Represents the six possible faces of a voxel cube.
///
/// Each variant corresponds to a specific face and is assigned a unique integer
/// value used to index the normal and corner tables. The order is:
/// [Front, Back, Left, Right, Bottom, Top].
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelFace {
    /// The front face (facing negative Z)
    Front = 0,

    /// The back face (facing positive Z)
    Back = 1,

    /// The left face (facing negative X)
    Left = 2,

    /// The right face (facing positive X)
    Right = 3,

    /// The bottom face (facing negative Y)
    Bottom = 4,

    /// The top face (facing positive Y)
    Top = 5,
}

/// The outward unit normal for each face, indexed by `VoxelFace` value.
pub const FACE_NORMALS: [Vector3<i32>; FACE_COUNT] = [
    Vector3::new(0, 0, -1), // Front
    Vector3::new(0, 0, 1),  // Back
    Vector3::new(-1, 0, 0), // Left
    Vector3::new(1, 0, 0),  // Right
    Vector3::new(0, -1, 0), // Bottom
    Vector3::new(0, 1, 0),  // Top
];

/// Indices into `CUBE_CORNERS` for the four corners of each face, in the
/// winding order expected by the triangle pattern `(v, v+3, v+2), (v, v+2, v+1)`.
pub const FACE_CORNER_INDICES: [usize; FACE_COUNT * FACE_CORNERS] = [
    3, 2, 6, 7, // Front (Z-)
    1, 0, 4, 5, // Back (Z+)
    3, 7, 4, 0, // Left (X-)
    1, 5, 6, 2, // Right (X+)
    3, 0, 1, 2, // Bottom (Y-)
    4, 7, 6, 5, // Top (Y+)
];

impl VoxelFace {
    /// Returns an array containing all six voxel faces in a consistent order.
    ///
    /// This is useful for iterating over all possible faces of a voxel.
    /// The order is: [Front, Back, Left, Right, Bottom, Top]
    ///
    /// # Returns
    /// An array containing all `VoxelFace` variants.
    pub fn all() -> [VoxelFace; FACE_COUNT] {
        [
            VoxelFace::Front,
            VoxelFace::Back,
            VoxelFace::Left,
            VoxelFace::Right,
            VoxelFace::Bottom,
            VoxelFace::Top,
        ]
    }

    /// Returns the outward unit normal of this face in voxel-grid units.
    pub fn normal(&self) -> Vector3<i32> {
        FACE_NORMALS[*self as usize]
    }

    /// Returns the four `CUBE_CORNERS` indices of this face in emission order.
    pub fn corner_indices(&self) -> [usize; FACE_CORNERS] {
        let base = *self as usize * FACE_CORNERS;
        [
            FACE_CORNER_INDICES[base],
            FACE_CORNER_INDICES[base + 1],
            FACE_CORNER_INDICES[base + 2],
            FACE_CORNER_INDICES[base + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_are_unit_axes() {
        for face in VoxelFace::all() {
            let normal = face.normal();
            let length_squared = normal.x * normal.x + normal.y * normal.y + normal.z * normal.z;
            assert_eq!(length_squared, 1);
        }
    }

    #[test]
    fn test_face_corners_lie_on_face_plane() {
        // Every corner of a face must sit on the cube side the normal points at.
        for face in VoxelFace::all() {
            let normal = face.normal();
            for corner_index in face.corner_indices() {
                let corner = CUBE_CORNERS[corner_index];
                let along_normal =
                    corner.x * normal.x as f32 + corner.y * normal.y as f32 + corner.z * normal.z as f32;
                assert_eq!(along_normal, 0.5, "face {:?} corner {}", face, corner_index);
            }
        }
    }
}
