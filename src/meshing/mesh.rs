//! Mesh data structures produced by chunk meshing.
//!
//! This module defines the buffers a finished chunk surface is handed off in:
//! flat position/normal/color arrays, a triangle index list, and the bounds
//! over all emitted vertices. The layouts are plain-old-data so a rendering
//! collaborator can upload them byte-wise without copying.

use cgmath::Point3;

/// Axis-aligned bounds over a mesh's emitted vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// The minimum corner of the box.
    pub min: Point3<f32>,
    /// The maximum corner of the box.
    pub max: Point3<f32>,
}

/// The surface mesh of a single chunk.
///
/// Every visible voxel face contributes one quad: four vertices (with the face
/// normal and the voxel's flat color replicated across them) and six indices
/// forming two triangles in a fixed winding order. Buffer lengths are
/// therefore always `faces × 4` for the vertex-rate arrays and `faces × 6`
/// for the indices.
///
/// A chunk whose voxels expose no faces produces an empty mesh with
/// `bounds: None`; callers must special-case empty meshes rather than
/// rendering them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMesh {
    /// World-space vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals, each one of the six unit face axes.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex RGBA colors, flat per face.
    pub colors: Vec<[u8; 4]>,
    /// Triangle index list, two triangles per face.
    pub indices: Vec<u32>,
    /// Tight bounds over all emitted vertices, or `None` for an empty mesh.
    pub bounds: Option<Aabb>,
}

impl ChunkMesh {
    /// Creates an empty mesh with buffers sized for exactly `face_count` faces.
    ///
    /// Used by the second meshing pass after the first pass has counted the
    /// visible faces, so emission never reallocates.
    ///
    /// # Arguments
    /// * `face_count` - The exact number of faces that will be emitted
    ///
    /// # Returns
    /// A `ChunkMesh` with empty, exactly-capacitied buffers.
    pub fn with_face_capacity(face_count: usize) -> Self {
        ChunkMesh {
            positions: Vec::with_capacity(face_count * 4),
            normals: Vec::with_capacity(face_count * 4),
            colors: Vec::with_capacity(face_count * 4),
            indices: Vec::with_capacity(face_count * 6),
            bounds: None,
        }
    }

    /// Returns `true` if no face was emitted into this mesh.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of faces in this mesh.
    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    /// Returns the position buffer as raw bytes for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Returns the normal buffer as raw bytes for GPU upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Returns the color buffer as raw bytes for GPU upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Returns the index buffer as raw bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = ChunkMesh::with_face_capacity(0);
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.bounds, None);
    }

    #[test]
    fn test_byte_views_match_buffer_sizes() {
        let mut mesh = ChunkMesh::with_face_capacity(1);
        mesh.positions.push([0.0, 1.0, 2.0]);
        mesh.normals.push([0.0, 1.0, 0.0]);
        mesh.colors.push([120, 200, 100, 255]);
        mesh.indices.extend_from_slice(&[0, 3, 2]);

        assert_eq!(mesh.position_bytes().len(), 12);
        assert_eq!(mesh.normal_bytes().len(), 12);
        assert_eq!(mesh.color_bytes().len(), 4);
        assert_eq!(mesh.index_bytes().len(), 12);
    }
}
