//! # Chunk Meshing Module
//!
//! This module converts a chunk's dense voxel grid into a face-culled surface
//! mesh. Only faces that border empty space are emitted: one quad (two
//! triangles) per visible voxel face, with the face normal and the voxel's
//! flat color replicated across the quad's four vertices.
//!
//! ## Visibility
//!
//! A face is visible when the voxel on the other side of it is `Air`. The
//! neighbor may live in an adjacent chunk, in which case it is resolved
//! through a read-only [`ChunkCoordinateIndex`] shared by the whole meshing
//! batch. A neighbor chunk missing from the index means no occluder is known,
//! and the face is rendered conservatively; the same policy applies at the
//! render-distance edge, which avoids visible seams there. The world is
//! vertically open: faces at the top and bottom of the grid are always
//! visible.
//!
//! ## Two-Pass Emission
//!
//! Meshing runs in two passes over the same visibility predicate: the first
//! pass only counts visible faces, the second allocates exactly-sized buffers
//! and emits the geometry. Under heavy concurrent chunk generation this keeps
//! peak memory predictable, since no meshing task ever grows a buffer inside
//! the hot loop.

use std::sync::Arc;

use cgmath::{Point3, Vector3};

use crate::{
    config::WorldConfig,
    voxels::{
        grid::VoxelGrid,
        voxel_face::{VoxelFace, CUBE_CORNERS},
        voxel_type::VoxelType,
        ChunkCoord,
    },
};

pub mod chunk_index;
pub mod mesh;
pub mod tasks;

pub use chunk_index::ChunkCoordinateIndex;
pub use mesh::{Aabb, ChunkMesh};

/// Extracts face-culled surface meshes from chunk voxel grids.
pub struct ChunkMesher {
    config: Arc<WorldConfig>,
}

impl ChunkMesher {
    /// Creates a mesher for the given world configuration.
    pub fn new(config: Arc<WorldConfig>) -> Self {
        ChunkMesher { config }
    }

    /// Produces the surface mesh for one chunk.
    ///
    /// # Arguments
    /// * `grid` - The chunk's voxel grid
    /// * `coord` - The chunk's world-space coordinate
    /// * `index` - Read-only neighbor index covering the chunk's batch and
    ///   all already-ready chunks
    ///
    /// # Returns
    /// The chunk's `ChunkMesh`. If no face is visible the mesh is empty and
    /// carries no bounds; a missing neighbor chunk is not an error.
    pub fn mesh_chunk(
        &self,
        grid: &VoxelGrid,
        coord: ChunkCoord,
        index: &ChunkCoordinateIndex,
    ) -> ChunkMesh {
        let face_count = self.count_visible_faces(grid, coord, index);
        let mut mesh = ChunkMesh::with_face_capacity(face_count);
        if face_count == 0 {
            return mesh;
        }

        let mut bounds_min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut bounds_max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        for voxel_index in 0..grid.len() {
            let vtype = grid.get_index(voxel_index);
            if vtype == VoxelType::Air {
                continue;
            }

            let (x, y, z) = grid.unflatten(voxel_index);
            let local = Point3::new(x as i32, y as i32, z as i32);
            let voxel_world = Vector3::new(
                (coord.x + local.x) as f32,
                local.y as f32,
                (coord.y + local.z) as f32,
            );
            let color = vtype.color();

            for face in VoxelFace::all() {
                if !self.face_visible(grid, local, face, coord, index) {
                    continue;
                }

                let normal = face.normal();
                let normal_f32 = [normal.x as f32, normal.y as f32, normal.z as f32];
                let vertex_base = mesh.positions.len() as u32;

                for corner_index in face.corner_indices() {
                    let corner = CUBE_CORNERS[corner_index];
                    let vertex = [
                        voxel_world.x + corner.x,
                        voxel_world.y + corner.y,
                        voxel_world.z + corner.z,
                    ];
                    mesh.positions.push(vertex);
                    mesh.normals.push(normal_f32);
                    mesh.colors.push(color);

                    bounds_min.x = bounds_min.x.min(vertex[0]);
                    bounds_min.y = bounds_min.y.min(vertex[1]);
                    bounds_min.z = bounds_min.z.min(vertex[2]);
                    bounds_max.x = bounds_max.x.max(vertex[0]);
                    bounds_max.y = bounds_max.y.max(vertex[1]);
                    bounds_max.z = bounds_max.z.max(vertex[2]);
                }

                mesh.indices.extend_from_slice(&[
                    vertex_base,
                    vertex_base + 3,
                    vertex_base + 2,
                    vertex_base,
                    vertex_base + 2,
                    vertex_base + 1,
                ]);
            }
        }

        mesh.bounds = Some(Aabb {
            min: bounds_min,
            max: bounds_max,
        });
        mesh
    }

    /// Counts the visible faces of a chunk without allocating vertex storage.
    ///
    /// This is the first meshing pass; the second pass re-runs the same
    /// predicate while emitting into exactly-sized buffers.
    fn count_visible_faces(
        &self,
        grid: &VoxelGrid,
        coord: ChunkCoord,
        index: &ChunkCoordinateIndex,
    ) -> usize {
        let mut face_count = 0;

        for voxel_index in 0..grid.len() {
            if grid.get_index(voxel_index) == VoxelType::Air {
                continue;
            }

            let (x, y, z) = grid.unflatten(voxel_index);
            let local = Point3::new(x as i32, y as i32, z as i32);

            for face in VoxelFace::all() {
                if self.face_visible(grid, local, face, coord, index) {
                    face_count += 1;
                }
            }
        }

        face_count
    }

    /// Decides whether one face of the voxel at `local` is visible.
    ///
    /// # Arguments
    /// * `grid` - The voxel grid of the chunk being meshed
    /// * `local` - The voxel's local coordinates within the chunk
    /// * `face` - The face to test
    /// * `coord` - The chunk's world-space coordinate
    /// * `index` - The read-only neighbor index
    ///
    /// # Returns
    /// `true` if the neighbor along the face normal is `Air`, outside the
    /// world's vertical bounds, or inside a chunk the index does not know.
    fn face_visible(
        &self,
        grid: &VoxelGrid,
        local: Point3<i32>,
        face: VoxelFace,
        coord: ChunkCoord,
        index: &ChunkCoordinateIndex,
    ) -> bool {
        let size = self.config.chunk_size as i32;
        let height = self.config.chunk_height as i32;
        let neighbor = local + face.normal();

        // The world's vertical bounds are always open.
        if neighbor.y < 0 || neighbor.y >= height {
            return true;
        }

        if neighbor.x >= 0 && neighbor.x < size && neighbor.z >= 0 && neighbor.z < size {
            return grid.get(
                neighbor.x as usize,
                neighbor.y as usize,
                neighbor.z as usize,
            ) == VoxelType::Air;
        }

        // The neighbor crosses into an adjacent chunk.
        let normal = face.normal();
        let neighbor_coord = ChunkCoord::new(coord.x + normal.x * size, coord.y + normal.z * size);

        match index.get(&neighbor_coord) {
            // No occluder known, render conservatively.
            None => true,
            Some(neighbor_grid) => {
                let neighbor_x = neighbor.x.rem_euclid(size) as usize;
                let neighbor_z = neighbor.z.rem_euclid(size) as usize;
                neighbor_grid.get(neighbor_x, neighbor.y as usize, neighbor_z) == VoxelType::Air
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    fn test_config(chunk_size: u8, chunk_height: u8) -> Arc<WorldConfig> {
        Arc::new(WorldConfig {
            chunk_size,
            chunk_height,
            render_distance: 2,
            frequency: 0.01,
            amplitude: 32.0,
            seed: Some("test".to_string()),
        })
    }

    fn empty_index() -> ChunkCoordinateIndex {
        ChunkCoordinateIndex::with_capacity(0)
    }

    #[test]
    fn test_all_air_chunk_produces_empty_mesh() {
        let config = test_config(8, 16);
        let mesher = ChunkMesher::new(config);
        let grid = VoxelGrid::new(8, 16);

        let mesh = mesher.mesh_chunk(&grid, Point2::new(0, 0), &empty_index());
        assert!(mesh.is_empty());
        assert!(mesh.indices.is_empty());
        assert_eq!(mesh.bounds, None);
    }

    #[test]
    fn test_single_voxel_emits_six_faces() {
        let config = test_config(8, 16);
        let mesher = ChunkMesher::new(config);
        let mut grid = VoxelGrid::new(8, 16);
        grid.set(3, 5, 4, VoxelType::Stone);

        let mesh = mesher.mesh_chunk(&grid, Point2::new(0, 0), &empty_index());

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.normals.len(), 24);
        assert_eq!(mesh.colors.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.colors.iter().all(|c| *c == VoxelType::Stone.color()));

        let bounds = mesh.bounds.unwrap();
        assert_eq!(bounds.min, Point3::new(2.5, 4.5, 3.5));
        assert_eq!(bounds.max, Point3::new(3.5, 5.5, 4.5));
    }

    #[test]
    fn test_enclosed_voxel_emits_no_faces() {
        let config = test_config(8, 16);
        let mesher = ChunkMesher::new(config);
        let mut grid = VoxelGrid::new(8, 16);

        // A 3x3x3 solid cube away from every boundary: only its 54 surface
        // faces survive culling, none from the enclosed center voxel.
        for x in 2..5 {
            for y in 6..9 {
                for z in 2..5 {
                    grid.set(x, y, z, VoxelType::Dirt);
                }
            }
        }

        let mesh = mesher.mesh_chunk(&grid, Point2::new(0, 0), &empty_index());
        assert_eq!(mesh.face_count(), 6 * 9);

        // No emitted vertex touches the center voxel's interior faces: every
        // quad lies on the surface of the cube spanning [1.5, 4.5] x [5.5, 8.5].
        let bounds = mesh.bounds.unwrap();
        assert_eq!(bounds.min, Point3::new(1.5, 5.5, 1.5));
        assert_eq!(bounds.max, Point3::new(4.5, 8.5, 4.5));
    }

    #[test]
    fn test_vertical_world_bounds_are_open() {
        let config = test_config(4, 4);
        let mesher = ChunkMesher::new(config);
        let mut grid = VoxelGrid::new(4, 4);

        // A full column: the bottom face at y=0 and the top face at the grid
        // ceiling are both visible because the world is vertically open.
        for y in 0..4 {
            grid.set(1, y, 1, VoxelType::Stone);
        }

        let mesh = mesher.mesh_chunk(&grid, Point2::new(0, 0), &empty_index());
        // 4 side faces per voxel plus the open top and bottom.
        assert_eq!(mesh.face_count(), 4 * 4 + 2);
    }

    #[test]
    fn test_face_toward_missing_neighbor_is_visible() {
        let config = test_config(4, 8);
        let mesher = ChunkMesher::new(config);
        let mut grid = VoxelGrid::new(4, 8);
        grid.set(3, 2, 1, VoxelType::Grass);

        // No neighbor chunk in the index: the +X boundary face renders
        // conservatively.
        let mesh = mesher.mesh_chunk(&grid, Point2::new(0, 0), &empty_index());
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_solid_neighbor_chunk_culls_boundary_face() {
        let config = test_config(4, 8);
        let mesher = ChunkMesher::new(config.clone());

        let mut grid = VoxelGrid::new(4, 8);
        grid.set(3, 2, 1, VoxelType::Grass);

        // The adjacent chunk holds a solid voxel right across the boundary.
        let mut neighbor_grid = VoxelGrid::new(4, 8);
        neighbor_grid.set(0, 2, 1, VoxelType::Stone);

        let mut index = ChunkCoordinateIndex::with_capacity(1);
        index.insert(Point2::new(4, 0), Arc::new(neighbor_grid));

        let mesh = mesher.mesh_chunk(&grid, Point2::new(0, 0), &index);
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn test_seam_face_is_emitted_exactly_once() {
        let config = test_config(4, 8);
        let mesher = ChunkMesher::new(config);

        // Chunk A holds a solid voxel at its +X boundary, chunk B is air.
        let mut grid_a = VoxelGrid::new(4, 8);
        grid_a.set(3, 2, 1, VoxelType::Grass);
        let grid_b = VoxelGrid::new(4, 8);

        let grid_a = Arc::new(grid_a);
        let grid_b = Arc::new(grid_b);
        let mut index = ChunkCoordinateIndex::with_capacity(2);
        index.insert(Point2::new(0, 0), grid_a.clone());
        index.insert(Point2::new(4, 0), grid_b.clone());

        let mesh_a = mesher.mesh_chunk(&grid_a, Point2::new(0, 0), &index);
        let mesh_b = mesher.mesh_chunk(&grid_b, Point2::new(4, 0), &index);

        // The shared quad appears once, from the solid side; the air chunk
        // contributes nothing.
        assert_eq!(mesh_a.face_count(), 6);
        assert!(mesh_b.is_empty());

        // Exactly one emitted quad lies in the shared boundary plane x=3.5
        // with an outward +X normal.
        let boundary_quads = mesh_a
            .positions
            .chunks(4)
            .zip(mesh_a.normals.chunks(4))
            .filter(|(quad, normals)| {
                quad.iter().all(|v| v[0] == 3.5) && normals.iter().all(|n| *n == [1.0, 0.0, 0.0])
            })
            .count();
        assert_eq!(boundary_quads, 1);
    }

    #[test]
    fn test_negative_coordinate_neighbor_wraps_correctly() {
        let config = test_config(4, 8);
        let mesher = ChunkMesher::new(config);

        // Chunk at (-4, 0) with a voxel on its -X boundary; the neighbor
        // chunk at (-8, 0) occludes it through positive-modulo wrapping.
        let mut grid = VoxelGrid::new(4, 8);
        grid.set(0, 2, 1, VoxelType::Dirt);

        let mut neighbor_grid = VoxelGrid::new(4, 8);
        neighbor_grid.set(3, 2, 1, VoxelType::Stone);

        let mut index = ChunkCoordinateIndex::with_capacity(1);
        index.insert(Point2::new(-8, 0), Arc::new(neighbor_grid));

        let mesh = mesher.mesh_chunk(&grid, Point2::new(-4, 0), &index);
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn test_index_and_vertex_counts_scale_with_faces() {
        let config = test_config(8, 16);
        let mesher = ChunkMesher::new(config);
        let mut grid = VoxelGrid::new(8, 16);
        for x in 0..8 {
            for z in 0..8 {
                grid.set(x, 3, z, VoxelType::Grass);
            }
        }

        let mesh = mesher.mesh_chunk(&grid, Point2::new(0, 0), &empty_index());
        let faces = mesh.face_count();
        assert_eq!(mesh.positions.len(), faces * 4);
        assert_eq!(mesh.normals.len(), faces * 4);
        assert_eq!(mesh.colors.len(), faces * 4);
        assert_eq!(mesh.indices.len(), faces * 6);

        // Every index points at an emitted vertex.
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.positions.len()));
    }
}
