//! Viewer orchestration: processing parameters, derived state, and tool modes
//!
//! The orchestrator owns which meshes are loaded and every active processing
//! parameter. Derived state (processed geometry, metrics, heatmap colors,
//! comparison summary) is recomputed synchronously on each relevant change,
//! so the latest parameter set always wins and stale derived state never
//! overwrites fresher state.

use crate::annotations::AnnotationCache;
use crate::camera::{Camera, CameraPreset};
use crate::input::{InputMap, InputTrigger, ViewerAction};
use crate::measure::{MeasurementToolkit, PickOutcome, ToolMode};
use osteoview_algorithms::{
    displacement_heatmap, laplacian_smooth, mesh_metrics, ColorRamp, MeshMetrics, SmoothingParams,
};
use osteoview_core::{
    ComparisonSummary, ConfidenceReport, Drawable, Point3f, Result, TriangleMesh, Vector3f,
};
use tracing::{debug, warn};

/// Fixed lateral offset between the two models in comparison mode, in mesh
/// units (millimeters for reconstructed bone models)
pub const COMPARISON_LATERAL_OFFSET: f32 = 120.0;

/// Axis of automatic model rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

/// Which loaded mesh a completed fetch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRole {
    /// The displayed (post) model
    Primary,
    /// The comparison baseline (pre) model
    Reference,
}

/// Active processing parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingParams {
    pub smoothing_enabled: bool,
    /// UI smoothing level in [0, 1]
    pub smoothing_level: f32,
    /// 0 is opaque, 1 fully transparent
    pub transparency: f32,
    pub confidence_overlay: bool,
    pub heatmap_enabled: bool,
    pub rotation_axis: Option<RotationAxis>,
    /// Radians per second
    pub rotation_speed: f32,
    pub comparison: bool,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            smoothing_enabled: false,
            smoothing_level: 0.5,
            transparency: 0.0,
            confidence_overlay: false,
            heatmap_enabled: false,
            rotation_axis: None,
            rotation_speed: 0.5,
            comparison: false,
        }
    }
}

/// Everything derived from the sources and the current parameters.
///
/// The loaded sources are immutable; processing always operates on fresh
/// copies here, so repeated parameter changes never accumulate drift.
#[derive(Debug, Default)]
struct DerivedState {
    primary: Option<TriangleMesh>,
    reference: Option<TriangleMesh>,
    metrics: Option<MeshMetrics>,
    reference_metrics: Option<MeshMetrics>,
    comparison: Option<ComparisonSummary>,
}

/// Composes the processing pipeline, camera, tools, and annotation cache
/// behind a single state machine driven by UI events and the frame clock.
#[derive(Debug)]
pub struct ViewerOrchestrator {
    primary_source: Option<TriangleMesh>,
    reference_source: Option<TriangleMesh>,
    params: ProcessingParams,
    derived: DerivedState,
    pub camera: Camera,
    pub toolkit: MeasurementToolkit,
    pub annotations: AnnotationCache,
    pub input_map: InputMap,
    ramp: ColorRamp,
    rotation: Vector3f,
    last_pick: Option<Point3f>,
    load_generation: u64,
    confidence: Option<ConfidenceReport>,
    status: Option<String>,
}

impl Default for ViewerOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerOrchestrator {
    pub fn new() -> Self {
        Self {
            primary_source: None,
            reference_source: None,
            params: ProcessingParams::default(),
            derived: DerivedState::default(),
            camera: Camera::default(),
            toolkit: MeasurementToolkit::new(),
            annotations: AnnotationCache::new(),
            input_map: InputMap::default(),
            ramp: ColorRamp::default(),
            rotation: Vector3f::zeros(),
            last_pick: None,
            load_generation: 0,
            confidence: None,
            status: None,
        }
    }

    // ---- loading -----------------------------------------------------

    /// Start a load, superseding any load still in flight.
    ///
    /// Returns the generation token the eventual completion must present;
    /// completions carrying an older token are discarded (last-load-wins).
    pub fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.load_generation
    }

    /// Complete a load. Returns false when the result arrived late and was
    /// discarded.
    pub fn complete_load(&mut self, generation: u64, role: MeshRole, mesh: TriangleMesh) -> Result<bool> {
        if generation != self.load_generation {
            warn!(
                generation,
                current = self.load_generation,
                "discarding late-arriving mesh load"
            );
            return Ok(false);
        }
        debug!(?role, vertices = mesh.vertex_count(), "mesh loaded");
        match role {
            MeshRole::Primary => self.primary_source = Some(mesh),
            MeshRole::Reference => self.reference_source = Some(mesh),
        }
        self.reprocess()?;
        Ok(true)
    }

    /// Drop both loaded meshes and their derived state
    pub fn unload(&mut self) {
        self.primary_source = None;
        self.reference_source = None;
        self.derived = DerivedState::default();
        self.toolkit.refresh_derived(None);
    }

    // ---- parameters ---------------------------------------------------

    pub fn params(&self) -> &ProcessingParams {
        &self.params
    }

    pub fn set_smoothing(&mut self, enabled: bool, level: f32) -> Result<()> {
        self.params.smoothing_enabled = enabled;
        self.params.smoothing_level = level.clamp(0.0, 1.0);
        self.reprocess()
    }

    pub fn set_transparency(&mut self, transparency: f32) {
        // Presentation-only; no geometry reprocessing needed.
        self.params.transparency = transparency.clamp(0.0, 1.0);
    }

    pub fn set_heatmap(&mut self, enabled: bool) -> Result<()> {
        self.params.heatmap_enabled = enabled;
        self.reprocess()
    }

    pub fn set_confidence_overlay(&mut self, enabled: bool) {
        self.params.confidence_overlay = enabled;
    }

    pub fn set_rotation(&mut self, axis: Option<RotationAxis>, speed: f32) {
        self.params.rotation_axis = axis;
        self.params.rotation_speed = speed;
    }

    pub fn set_comparison(&mut self, enabled: bool) -> Result<()> {
        self.params.comparison = enabled;
        self.reprocess()
    }

    // ---- derived state ------------------------------------------------

    /// The processed mesh currently displayed, if any
    pub fn displayed_mesh(&self) -> Option<&TriangleMesh> {
        self.derived.primary.as_ref()
    }

    /// The processed comparison baseline, present in comparison mode
    pub fn reference_mesh(&self) -> Option<&TriangleMesh> {
        self.derived.reference.as_ref()
    }

    pub fn metrics(&self) -> Option<&MeshMetrics> {
        self.derived.metrics.as_ref()
    }

    pub fn comparison_summary(&self) -> Option<&ComparisonSummary> {
        self.derived.comparison.as_ref()
    }

    /// Lateral placement of (reference, primary) in comparison mode
    pub fn comparison_offsets(&self) -> (Vector3f, Vector3f) {
        let half = COMPARISON_LATERAL_OFFSET / 2.0;
        (
            Vector3f::new(-half, 0.0, 0.0),
            Vector3f::new(half, 0.0, 0.0),
        )
    }

    /// Recompute all derived state from the sources and current parameters.
    ///
    /// Runs synchronously on every relevant change; there is never an
    /// overlapping recomputation to race with.
    fn reprocess(&mut self) -> Result<()> {
        let processed_reference = match (&self.reference_source, self.params.comparison) {
            (Some(source), true) => Some(self.process_copy(source)?),
            _ => None,
        };

        let processed_primary = match &self.primary_source {
            Some(source) => {
                let mut mesh = self.process_copy(source)?;
                if self.params.comparison && self.params.heatmap_enabled {
                    if let Some(reference) = &processed_reference {
                        match displacement_heatmap(reference, &mesh, &self.ramp) {
                            Some(colors) => mesh.set_colors(colors),
                            // Below the noise floor the meshes are equivalent;
                            // keep the source coloring.
                            None => debug!("meshes equivalent; heatmap skipped"),
                        }
                    }
                }
                Some(mesh)
            }
            None => None,
        };

        self.derived.metrics = processed_primary.as_ref().map(mesh_metrics);
        self.derived.reference_metrics = processed_reference.as_ref().map(mesh_metrics);
        self.derived.comparison = match (&self.derived.reference_metrics, &self.derived.metrics) {
            (Some(pre), Some(post)) if self.params.comparison => {
                Some(comparison_summary(pre, post))
            }
            _ => None,
        };
        self.toolkit.refresh_derived(self.derived.metrics.as_ref());

        self.derived.primary = processed_primary;
        self.derived.reference = processed_reference;
        Ok(())
    }

    fn process_copy(&self, source: &TriangleMesh) -> Result<TriangleMesh> {
        if self.params.smoothing_enabled && self.params.smoothing_level > 0.0 {
            let params = SmoothingParams::from_level(self.params.smoothing_level);
            laplacian_smooth(source, &params)
        } else {
            Ok(source.clone())
        }
    }

    // ---- frame clock --------------------------------------------------

    /// Current accumulated model rotation in radians per axis
    pub fn rotation(&self) -> Vector3f {
        self.rotation
    }

    /// Integrate automatic rotation over `dt_seconds` of elapsed wall time.
    ///
    /// Elapsed time is an explicit parameter rather than an implicit clock,
    /// so playback speed is render-frame-rate independent and the function is
    /// testable without a render loop.
    pub fn advance(&mut self, dt_seconds: f32) {
        let Some(axis) = self.params.rotation_axis else {
            return;
        };
        let step = self.params.rotation_speed * dt_seconds;
        match axis {
            RotationAxis::X => self.rotation.x += step,
            RotationAxis::Y => self.rotation.y += step,
            RotationAxis::Z => self.rotation.z += step,
        }
    }

    // ---- input and picking -------------------------------------------

    /// Resolve and apply one discrete input trigger. Returns the action that
    /// ran, if the trigger was bound.
    pub fn handle_trigger(&mut self, trigger: InputTrigger) -> Result<Option<ViewerAction>> {
        let Some(action) = self.input_map.resolve(trigger) else {
            return Ok(None);
        };
        self.apply_action(action)?;
        Ok(Some(action))
    }

    /// Apply one viewer action
    pub fn apply_action(&mut self, action: ViewerAction) -> Result<()> {
        match action {
            ViewerAction::SwitchPreset(preset) => self.apply_camera_preset(preset),
            ViewerAction::SelectTool(mode) => self.toolkit.set_mode(mode),
            ViewerAction::CancelTool => self.toolkit.cancel(),
            ViewerAction::ToggleSmoothing => {
                let enabled = !self.params.smoothing_enabled;
                let level = self.params.smoothing_level;
                self.set_smoothing(enabled, level)?;
            }
            ViewerAction::ToggleHeatmap => {
                self.set_heatmap(!self.params.heatmap_enabled)?;
            }
            ViewerAction::ToggleConfidenceOverlay => {
                self.set_confidence_overlay(!self.params.confidence_overlay);
            }
            ViewerAction::ToggleComparison => {
                self.set_comparison(!self.params.comparison)?;
            }
        }
        Ok(())
    }

    /// Frame the camera on the displayed mesh with the given preset
    pub fn apply_camera_preset(&mut self, preset: CameraPreset) {
        let sphere = self
            .displayed_mesh()
            .map(|m| m.bounding_sphere())
            .unwrap_or((Point3f::origin(), 0.0));
        self.camera.apply_preset(preset, sphere, self.last_pick);
    }

    /// Feed one pointer pick on the rendered mesh to the active tool
    pub fn pick(&mut self, point: Point3f) -> PickOutcome {
        self.last_pick = Some(point);
        self.toolkit.record_pick(point)
    }

    pub fn active_tool(&self) -> ToolMode {
        self.toolkit.mode()
    }

    // ---- overlays and status ------------------------------------------

    /// Record the confidence report, or its absence when the fetch failed.
    /// A missing report degrades the overlay; it never blocks model display.
    pub fn set_confidence_report(&mut self, report: Option<ConfidenceReport>) {
        if report.is_none() {
            self.status = Some("confidence overlay unavailable".to_string());
        }
        self.confidence = report;
    }

    pub fn confidence_report(&self) -> Option<&ConfidenceReport> {
        self.confidence.as_ref()
    }

    /// Set the user-facing status line
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Percentage change of each post-model metric relative to the pre-model
fn comparison_summary(pre: &MeshMetrics, post: &MeshMetrics) -> ComparisonSummary {
    ComparisonSummary {
        area_delta_pct: delta_pct(pre.area, post.area),
        volume_delta_pct: delta_pct(pre.volume, post.volume),
        width_delta_pct: delta_pct(pre.dimensions.x as f64, post.dimensions.x as f64),
        height_delta_pct: delta_pct(pre.dimensions.y as f64, post.dimensions.y as f64),
        depth_delta_pct: delta_pct(pre.dimensions.z as f64, post.dimensions.z as f64),
    }
}

fn delta_pct(pre: f64, post: f64) -> f32 {
    if pre.abs() < f64::EPSILON {
        return 0.0;
    }
    (((post - pre) / pre) * 100.0) as f32
}
