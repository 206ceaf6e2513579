//! Surface, volume, and bounding metrics for triangle meshes

use osteoview_core::{Drawable, TriangleMesh, Vector3f};

/// Whole-mesh geometric metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMetrics {
    /// Total unsigned triangle area
    pub area: f64,
    /// Enclosed volume by the divergence theorem (absolute value)
    pub volume: f64,
    /// Axis-aligned bounding box extents (width, height, depth)
    pub dimensions: Vector3f,
}

/// Compute surface area, volume, and bounding dimensions of a mesh.
///
/// Area sums half the cross-product magnitude per triangle. Volume sums the
/// signed origin tetrahedra `a · (b × c) / 6` and takes the absolute value of
/// the total; this is exact only for a closed, consistently wound manifold.
/// Open or inconsistently wound meshes yield an approximation, which is an
/// accepted limitation of the method rather than something to correct here.
/// Dimensions are the bounding-box extents in the mesh's local frame.
///
/// Metrics must be recomputed whenever the displayed geometry changes; they
/// are never assumed stable across smoothing or reloads.
pub fn mesh_metrics(mesh: &TriangleMesh) -> MeshMetrics {
    let mut area = 0.0f64;
    let mut signed_volume = 0.0f64;

    for face in &mesh.faces {
        let a = mesh.vertices[face[0]].coords;
        let b = mesh.vertices[face[1]].coords;
        let c = mesh.vertices[face[2]].coords;

        area += 0.5 * (b - a).cross(&(c - a)).norm() as f64;
        signed_volume += a.dot(&b.cross(&c)) as f64 / 6.0;
    }

    let (min, max) = mesh.bounding_box();
    MeshMetrics {
        area,
        volume: signed_volume.abs(),
        dimensions: max - min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osteoview_core::Point3f;

    /// Unit cube as 12 triangles with outward-consistent winding
    fn unit_cube() -> TriangleMesh {
        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
            Point3f::new(1.0, 0.0, 1.0),
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![
            // bottom (z = 0)
            [0, 2, 1],
            [0, 3, 2],
            // top (z = 1)
            [4, 5, 6],
            [4, 6, 7],
            // front (y = 0)
            [0, 1, 5],
            [0, 5, 4],
            // back (y = 1)
            [3, 7, 6],
            [3, 6, 2],
            // left (x = 0)
            [0, 4, 7],
            [0, 7, 3],
            // right (x = 1)
            [1, 2, 6],
            [1, 6, 5],
        ];
        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }

    #[test]
    fn test_unit_cube_metrics() {
        let metrics = mesh_metrics(&unit_cube());
        assert!((metrics.area - 6.0).abs() < 1e-5);
        assert!((metrics.volume - 1.0).abs() < 1e-5);
        assert!((metrics.dimensions.x - 1.0).abs() < 1e-6);
        assert!((metrics.dimensions.y - 1.0).abs() < 1e-6);
        assert!((metrics.dimensions.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reversed_winding_gives_same_volume_magnitude() {
        let mut cube = unit_cube();
        for face in &mut cube.faces {
            face.swap(1, 2);
        }
        let metrics = mesh_metrics(&cube);
        assert!((metrics.volume - 1.0).abs() < 1e-5);
        assert!((metrics.area - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_mesh_metrics_are_zero() {
        let metrics = mesh_metrics(&TriangleMesh::new());
        assert_eq!(metrics.area, 0.0);
        assert_eq!(metrics.volume, 0.0);
        assert_eq!(metrics.dimensions, Vector3f::zeros());
    }

    #[test]
    fn test_single_triangle_area() {
        let positions = [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0];
        let mesh = TriangleMesh::from_buffers(&positions, None, None).unwrap();
        let metrics = mesh_metrics(&mesh);
        assert!((metrics.area - 2.0).abs() < 1e-6);
    }
}
