//! Laplacian mesh smoothing

use osteoview_core::{Error, Point3f, Result, TriangleMesh, Vector3f};
use rayon::prelude::*;

/// Parameters for one smoothing run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    /// Per-iteration blend factor toward the neighbor mean, in [0, 1]
    pub amount: f32,
    /// Number of smoothing passes
    pub iterations: usize,
}

impl SmoothingParams {
    /// Map a UI smoothing level in [0, 1] to concrete parameters.
    ///
    /// Higher level means both a more aggressive blend and more passes:
    /// `amount = level * 0.33`, `iterations = max(1, round(level * 8))`.
    pub fn from_level(level: f32) -> Self {
        let level = level.clamp(0.0, 1.0);
        Self {
            amount: level * 0.33,
            iterations: (level * 8.0).round().max(1.0) as usize,
        }
    }
}

/// Laplacian smoothing over an indexed triangle mesh.
///
/// Builds the vertex adjacency once, then for each iteration moves every
/// vertex toward the arithmetic mean of its neighbors:
/// `p' = p + amount * (mean - p)`. All vertices in one iteration read from a
/// single snapshot of the previous iteration (Gauss–Jacobi, double buffered),
/// so the result is independent of vertex visitation order and of the face
/// ordering that produced the adjacency. Vertices with no neighbors are left
/// unchanged. Vertex normals are recomputed on the result.
///
/// # Arguments
/// * `mesh` - Input mesh; never mutated
/// * `params` - Blend amount and iteration count
///
/// # Returns
/// * `Result<TriangleMesh>` - A new mesh with smoothed vertex positions
pub fn laplacian_smooth(mesh: &TriangleMesh, params: &SmoothingParams) -> Result<TriangleMesh> {
    if !(0.0..=1.0).contains(&params.amount) {
        return Err(Error::InvalidData(format!(
            "smoothing amount {} outside [0, 1]",
            params.amount
        )));
    }

    let mut result = mesh.clone();
    if mesh.vertices.is_empty() {
        return Ok(result);
    }
    if params.amount == 0.0 || params.iterations == 0 {
        return Ok(result);
    }

    let adjacency = mesh.vertex_adjacency();
    let mut current: Vec<Point3f> = mesh.vertices.clone();
    let mut next: Vec<Point3f> = vec![Point3f::origin(); current.len()];

    for _ in 0..params.iterations {
        next.par_iter_mut().enumerate().for_each(|(i, out)| {
            let neighbors = &adjacency[i];
            if neighbors.is_empty() {
                *out = current[i];
                return;
            }
            let mut sum = Vector3f::zeros();
            for &n in neighbors {
                sum += current[n].coords;
            }
            let mean = sum / neighbors.len() as f32;
            *out = current[i] + params.amount * (mean - current[i].coords);
        });
        std::mem::swap(&mut current, &mut next);
    }

    result.vertices = current;
    result.recompute_vertex_normals();
    Ok(result)
}
