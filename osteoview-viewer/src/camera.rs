//! Camera utilities for the model viewer

use nalgebra::{Matrix4, Perspective3};
use osteoview_core::{Point3f, Vector3f};

/// Fallback framing radius when the bounding sphere is degenerate
pub const MIN_FRAMING_RADIUS: f32 = 1.0;

/// Distance multiplier from the bounding-sphere radius to the camera orbit
const FRAMING_DISTANCE_FACTOR: f32 = 2.5;

/// Named camera framing targets.
///
/// Presets are computed from the current orbit target and the mesh's bounding
/// sphere, not from fixed absolute coordinates, so they stay correct across
/// differently sized meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraPreset {
    Top,
    Side,
    Oblique,
    Reset,
    FocusLastPick,
}

/// A 3D camera for viewing reconstructed meshes
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Apply a named preset against the given bounding sphere.
    ///
    /// `sphere` is the displayed mesh's `(center, radius)`; a radius at or
    /// below zero falls back to [`MIN_FRAMING_RADIUS`]. `last_pick` feeds the
    /// focus preset and is ignored by the others; focusing with no pick
    /// recorded leaves the camera unchanged.
    pub fn apply_preset(
        &mut self,
        preset: CameraPreset,
        sphere: (Point3f, f32),
        last_pick: Option<Point3f>,
    ) {
        let (center, radius) = sphere;
        let radius = if radius > 0.0 { radius } else { MIN_FRAMING_RADIUS };
        let distance = radius * FRAMING_DISTANCE_FACTOR;

        match preset {
            CameraPreset::Top => {
                self.target = center;
                self.position = center + Vector3f::new(0.0, distance, 0.0);
                self.up = Vector3f::new(0.0, 0.0, -1.0);
            }
            CameraPreset::Side => {
                self.target = center;
                self.position = center + Vector3f::new(distance, 0.0, 0.0);
                self.up = Vector3f::y();
            }
            CameraPreset::Oblique => {
                self.target = center;
                let direction = Vector3f::new(1.0, 0.7, 1.0).normalize();
                self.position = center + direction * distance;
                self.up = Vector3f::y();
            }
            CameraPreset::Reset => {
                self.target = center;
                self.position = center + Vector3f::new(0.0, 0.0, distance);
                self.up = Vector3f::y();
            }
            CameraPreset::FocusLastPick => {
                if let Some(pick) = last_pick {
                    let direction = Vector3f::new(1.0, 0.7, 1.0).normalize();
                    self.target = pick;
                    // Closer orbit around the pick than a whole-mesh framing.
                    self.position = pick + direction * (distance * 0.3).max(MIN_FRAMING_RADIUS);
                    self.up = Vector3f::y();
                }
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3f::new(0.0, 0.0, 5.0),
            target: Point3f::origin(),
            up: Vector3f::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
