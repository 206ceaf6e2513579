//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
///
/// Meshes are treated as immutable once loaded; processing stages clone and
/// derive rather than mutate in place, so a cached asset never drifts across
/// repeated parameter changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    /// Per-vertex RGB in [0, 1]
    pub colors: Option<Vec<[f32; 3]>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
            colors: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
            colors: None,
        }
    }

    /// Build a mesh from flat GPU-style buffers.
    ///
    /// `positions` holds 3 scalars per vertex. When `indices` is `None` an
    /// implicit identity indexing is assumed: each consecutive triple of
    /// positions forms one triangle. Optional `colors` is a parallel buffer
    /// of RGB triples.
    ///
    /// # Errors
    /// Returns `Error::InvalidData` when buffer lengths are not multiples of
    /// 3, when a color buffer does not match the vertex count, or when any
    /// index is out of range.
    pub fn from_buffers(
        positions: &[f32],
        indices: Option<&[u32]>,
        colors: Option<&[f32]>,
    ) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "position buffer length {} is not a multiple of 3",
                positions.len()
            )));
        }
        let vertex_count = positions.len() / 3;
        let vertices: Vec<Point3f> = positions
            .chunks_exact(3)
            .map(|p| Point3f::new(p[0], p[1], p[2]))
            .collect();

        let faces: Vec<[usize; 3]> = match indices {
            Some(idx) => {
                if idx.len() % 3 != 0 {
                    return Err(Error::InvalidData(format!(
                        "index buffer length {} is not a multiple of 3",
                        idx.len()
                    )));
                }
                for &i in idx {
                    if i as usize >= vertex_count {
                        return Err(Error::InvalidData(format!(
                            "index {} out of range for {} vertices",
                            i, vertex_count
                        )));
                    }
                }
                idx.chunks_exact(3)
                    .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                    .collect()
            }
            None => {
                if vertex_count % 3 != 0 {
                    return Err(Error::InvalidData(format!(
                        "implicit indexing requires a vertex count divisible by 3, got {}",
                        vertex_count
                    )));
                }
                (0..vertex_count)
                    .step_by(3)
                    .map(|i| [i, i + 1, i + 2])
                    .collect()
            }
        };

        let colors = match colors {
            Some(c) => {
                if c.len() != vertex_count * 3 {
                    return Err(Error::InvalidData(format!(
                        "color buffer length {} does not match {} vertices",
                        c.len(),
                        vertex_count
                    )));
                }
                Some(c.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
            }
            None => None,
        };

        Ok(Self {
            vertices,
            faces,
            normals: None,
            colors,
        })
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Build the vertex adjacency map from the face list.
    ///
    /// Each triangle contributes its three undirected edges to each endpoint's
    /// neighbor set. Neighbor lists are sorted and deduplicated, so the map is
    /// independent of face ordering.
    pub fn vertex_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.vertices.len()];
        for face in &self.faces {
            for (a, b) in [
                (face[0], face[1]),
                (face[1], face[2]),
                (face[2], face[0]),
            ] {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }
        adjacency
    }

    /// Calculate face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                let edge1 = v1 - v0;
                let edge2 = v2 - v0;

                edge1.cross(&edge2).normalize()
            })
            .collect()
    }

    /// Recompute area-weighted vertex normals from the face list and store
    /// them on the mesh.
    pub fn recompute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];
        for face in &self.faces {
            let v0 = self.vertices[face[0]];
            let v1 = self.vertices[face[1]];
            let v2 = self.vertices[face[2]];
            // Unnormalized cross product weights by triangle area.
            let n = (v1 - v0).cross(&(v2 - v0));
            for &i in face {
                normals[i] += n;
            }
        }
        for n in &mut normals {
            let len = n.norm();
            if len > f32::EPSILON {
                *n /= len;
            }
        }
        self.normals = Some(normals);
    }

    /// Set vertex colors
    pub fn set_colors(&mut self, colors: Vec<[f32; 3]>) {
        if colors.len() == self.vertices.len() {
            self.colors = Some(colors);
        }
    }

    /// Convert per-vertex colors to 8-bit RGB triples
    pub fn colors_as_u8(&self) -> Option<Vec<[u8; 3]>> {
        self.colors.as_ref().map(|colors| {
            colors
                .iter()
                .map(|c| {
                    [
                        (c[0].clamp(0.0, 1.0) * 255.0).round() as u8,
                        (c[1].clamp(0.0, 1.0) * 255.0).round() as u8,
                        (c[2].clamp(0.0, 1.0) * 255.0).round() as u8,
                    ]
                })
                .collect()
        })
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_buffers_explicit_indices() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
        let indices = [0u32, 1, 2, 2, 1, 3];
        let mesh = TriangleMesh::from_buffers(&positions, Some(&indices), None).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[1], [2, 1, 3]);
    }

    #[test]
    fn test_from_buffers_implicit_indices() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mesh = TriangleMesh::from_buffers(&positions, None, None).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
    }

    #[test]
    fn test_from_buffers_rejects_out_of_range_index() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = [0u32, 1, 3];
        let result = TriangleMesh::from_buffers(&positions, Some(&indices), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_buffers_rejects_ragged_positions() {
        let positions = [0.0, 0.0, 0.0, 1.0];
        assert!(TriangleMesh::from_buffers(&positions, None, None).is_err());
    }

    #[test]
    fn test_from_buffers_rejects_mismatched_colors() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let colors = [1.0, 0.0];
        let result = TriangleMesh::from_buffers(&positions, None, Some(&colors));
        assert!(result.is_err());
    }

    #[test]
    fn test_vertex_adjacency_from_shared_edge() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
        let indices = [0u32, 1, 2, 2, 1, 3];
        let mesh = TriangleMesh::from_buffers(&positions, Some(&indices), None).unwrap();
        let adjacency = mesh.vertex_adjacency();
        assert_eq!(adjacency[0], vec![1, 2]);
        assert_eq!(adjacency[1], vec![0, 2, 3]);
        assert_eq!(adjacency[2], vec![0, 1, 3]);
        assert_eq!(adjacency[3], vec![1, 2]);
    }

    #[test]
    fn test_recompute_vertex_normals_flat_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mut mesh = TriangleMesh::from_buffers(&positions, None, None).unwrap();
        mesh.recompute_vertex_normals();
        let normals = mesh.normals.as_ref().unwrap();
        for n in normals {
            assert!((n.z - 1.0).abs() < 1e-6);
        }
    }
}
