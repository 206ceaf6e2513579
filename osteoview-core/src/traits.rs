//! Core traits for osteoview

use crate::mesh::TriangleMesh;
use crate::point::*;

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }

    /// Get the bounding sphere as (center, radius).
    ///
    /// Radius is zero for empty or single-point objects; callers that frame a
    /// camera on the sphere must apply their own minimum-radius fallback.
    fn bounding_sphere(&self) -> (Point3f, f32);
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        if self.vertices.is_empty() {
            return (Point3f::origin(), Point3f::origin());
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for vertex in &self.vertices {
            min.x = min.x.min(vertex.x);
            min.y = min.y.min(vertex.y);
            min.z = min.z.min(vertex.z);

            max.x = max.x.max(vertex.x);
            max.y = max.y.max(vertex.y);
            max.z = max.z.max(vertex.z);
        }

        (min, max)
    }

    fn bounding_sphere(&self) -> (Point3f, f32) {
        let center = self.center();
        let radius = self
            .vertices
            .iter()
            .map(|v| (v - center).norm())
            .fold(0.0f32, f32::max);
        (center, radius)
    }
}
