//! Per-vertex displacement heatmap between two meshes

use osteoview_core::TriangleMesh;
use rayon::prelude::*;

/// Displacements below this are treated as numerical noise
pub const NOISE_THRESHOLD: f32 = 1e-6;

/// Three anchor colors forming a low/mid/high severity ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    pub low: [f32; 3],
    pub mid: [f32; 3],
    pub high: [f32; 3],
}

impl Default for ColorRamp {
    /// Green through yellow to red
    fn default() -> Self {
        Self {
            low: [0.18, 0.69, 0.33],
            mid: [0.95, 0.83, 0.20],
            high: [0.86, 0.16, 0.16],
        }
    }
}

impl ColorRamp {
    /// Map a normalized displacement in [0, 1] through the two-segment
    /// gradient: [0, 0.5) interpolates low→mid, [0.5, 1] interpolates
    /// mid→high.
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let t = t.clamp(0.0, 1.0);
        let (from, to, s) = if t < 0.5 {
            (self.low, self.mid, t * 2.0)
        } else {
            (self.mid, self.high, (t - 0.5) * 2.0)
        };
        [
            from[0] + (to[0] - from[0]) * s,
            from[1] + (to[1] - from[1]) * s,
            from[2] + (to[2] - from[2]) * s,
        ]
    }
}

/// Color the target mesh's vertices by displacement from the reference.
///
/// Assumes index-for-index vertex correspondence between the two meshes and
/// compares up to the shorter vertex count; this is a visualization aid, not
/// a registration solver. Displacements are normalized by the maximum
/// observed value. When that maximum is below [`NOISE_THRESHOLD`] the meshes
/// are treated as equivalent and no color buffer is produced, rather than a
/// degenerate map.
///
/// # Returns
/// * `Some(colors)` - one RGB triple per target vertex
/// * `None` - meshes are equivalent within noise, or either is empty
pub fn displacement_heatmap(
    reference: &TriangleMesh,
    target: &TriangleMesh,
    ramp: &ColorRamp,
) -> Option<Vec<[f32; 3]>> {
    let shared = reference.vertex_count().min(target.vertex_count());
    if shared == 0 {
        return None;
    }

    let displacements: Vec<f32> = (0..shared)
        .into_par_iter()
        .map(|i| (target.vertices[i] - reference.vertices[i]).norm())
        .collect();

    let max = displacements.iter().cloned().fold(0.0f32, f32::max);
    if max < NOISE_THRESHOLD {
        return None;
    }

    let colors = target
        .vertices
        .par_iter()
        .enumerate()
        .map(|(i, _)| {
            // Vertices beyond the shared range carry no displacement signal.
            let t = if i < shared { displacements[i] / max } else { 0.0 };
            ramp.sample(t)
        })
        .collect();
    Some(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osteoview_core::Point3f;

    fn triangle(offset: f32) -> TriangleMesh {
        let vertices = vec![
            Point3f::new(0.0, 0.0, offset),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ];
        TriangleMesh::from_vertices_and_faces(vertices, vec![[0, 1, 2]])
    }

    #[test]
    fn test_identical_meshes_produce_no_colors() {
        let mesh = triangle(0.0);
        assert!(displacement_heatmap(&mesh, &mesh.clone(), &ColorRamp::default()).is_none());
    }

    #[test]
    fn test_empty_input_produces_no_colors() {
        let mesh = triangle(0.0);
        let empty = TriangleMesh::new();
        assert!(displacement_heatmap(&empty, &mesh, &ColorRamp::default()).is_none());
        assert!(displacement_heatmap(&mesh, &empty, &ColorRamp::default()).is_none());
    }

    fn assert_color_close(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_displaced_vertex_gets_high_color() {
        let reference = triangle(0.0);
        let target = triangle(2.0);
        let ramp = ColorRamp::default();
        let colors = displacement_heatmap(&reference, &target, &ramp).unwrap();
        assert_eq!(colors.len(), 3);
        // Vertex 0 moved the most, so it lands on the high anchor.
        assert_color_close(colors[0], ramp.high);
        // Vertices 1 and 2 did not move at all.
        assert_color_close(colors[1], ramp.low);
        assert_color_close(colors[2], ramp.low);
    }

    #[test]
    fn test_comparison_uses_shorter_vertex_count() {
        let reference = triangle(0.0);
        let mut target = triangle(1.0);
        target.vertices.push(Point3f::new(5.0, 5.0, 5.0));
        let colors =
            displacement_heatmap(&reference, &target, &ColorRamp::default()).unwrap();
        // One color per target vertex, extras treated as undisplaced.
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[3], ColorRamp::default().low);
    }

    #[test]
    fn test_ramp_anchors() {
        let ramp = ColorRamp::default();
        assert_color_close(ramp.sample(0.0), ramp.low);
        assert_color_close(ramp.sample(0.5), ramp.mid);
        assert_color_close(ramp.sample(1.0), ramp.high);
        // Out-of-range inputs clamp to the anchors.
        assert_color_close(ramp.sample(-1.0), ramp.low);
        assert_color_close(ramp.sample(2.0), ramp.high);
    }
}
