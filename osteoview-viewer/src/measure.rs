//! Measurement toolkit: a small state machine over pointer picks

use osteoview_algorithms::MeshMetrics;
use osteoview_core::{Error, Measurement, MeasurementKind, Point3f, Result};
use tracing::debug;

/// Active measurement tool mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolMode {
    #[default]
    Idle,
    CollectingDistance,
    CollectingAngle,
    CollectingAnnotation,
}

/// What a pointer pick produced
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// Pick was buffered; more points are needed
    Pending,
    /// A measurement was emitted and the point buffer reset
    Emitted(Measurement),
    /// Annotation mode captured its anchor point
    AnnotationAnchor(Point3f),
    /// No tool is active; the pick was ignored
    Ignored,
}

/// Collects pointer picks into measurements.
///
/// Distance and angle modes are repeatable: emitting a measurement resets the
/// point buffer but keeps the tool active for the next pair or triple.
/// Switching tools or cancelling discards uncommitted points without
/// emitting.
#[derive(Debug, Default)]
pub struct MeasurementToolkit {
    mode: ToolMode,
    pending: Vec<Point3f>,
    measurements: Vec<Measurement>,
}

impl MeasurementToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn pending_points(&self) -> &[Point3f] {
        &self.pending
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Select a tool mode, discarding any in-progress points
    pub fn set_mode(&mut self, mode: ToolMode) {
        if !self.pending.is_empty() {
            debug!(count = self.pending.len(), "discarding uncommitted pick points");
        }
        self.pending.clear();
        self.mode = mode;
    }

    /// Explicit stop: back to idle, uncommitted points discarded
    pub fn cancel(&mut self) {
        self.set_mode(ToolMode::Idle);
    }

    /// Feed one pointer pick on the rendered mesh into the state machine
    pub fn record_pick(&mut self, point: Point3f) -> PickOutcome {
        match self.mode {
            ToolMode::Idle => PickOutcome::Ignored,
            ToolMode::CollectingDistance => {
                self.pending.push(point);
                if self.pending.len() < 2 {
                    return PickOutcome::Pending;
                }
                let points = std::mem::take(&mut self.pending);
                let value = (points[1] - points[0]).norm() as f64;
                let label = format!("Distance {}", self.count_of(MeasurementKind::Distance) + 1);
                let measurement =
                    Measurement::recorded(MeasurementKind::Distance, value, "mm", label, points);
                self.measurements.push(measurement.clone());
                PickOutcome::Emitted(measurement)
            }
            ToolMode::CollectingAngle => {
                self.pending.push(point);
                if self.pending.len() < 3 {
                    return PickOutcome::Pending;
                }
                let points = std::mem::take(&mut self.pending);
                let value = angle_degrees(&points[0], &points[1], &points[2]);
                let label = format!("Angle {}", self.count_of(MeasurementKind::Angle) + 1);
                let measurement =
                    Measurement::recorded(MeasurementKind::Angle, value, "deg", label, points);
                self.measurements.push(measurement.clone());
                PickOutcome::Emitted(measurement)
            }
            ToolMode::CollectingAnnotation => {
                // Exactly one point; the annotation subsystem takes over.
                self.pending.clear();
                PickOutcome::AnnotationAnchor(point)
            }
        }
    }

    /// Remove a user-recorded measurement by id
    pub fn remove(&mut self, id: &str) {
        self.measurements.retain(|m| m.id != id);
    }

    /// Refresh the derived surface/volume entries from the displayed mesh's
    /// metrics, replacing any prior entry by identity. `None` drops them,
    /// for when no mesh is displayed.
    pub fn refresh_derived(&mut self, metrics: Option<&MeshMetrics>) {
        self.measurements.retain(|m| !m.is_derived());
        if let Some(metrics) = metrics {
            self.measurements.push(Measurement::surface(metrics.area, "mm²"));
            self.measurements.push(Measurement::volume(metrics.volume, "mm³"));
        }
    }

    /// Serialize user-recorded measurements as CSV with the stable column
    /// order id, kind, label, value, unit, created_at. Derived surface and
    /// volume entries are viewer state, not recorded events, and are
    /// excluded.
    pub fn export_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["id", "kind", "label", "value", "unit", "created_at"])
            .map_err(|e| Error::Algorithm(e.to_string()))?;
        for m in self.measurements.iter().filter(|m| !m.is_derived()) {
            let value = m.value.to_string();
            let created_at = m.created_at.to_rfc3339();
            writer
                .write_record([
                    m.id.as_str(),
                    m.kind.as_str(),
                    m.label.as_str(),
                    value.as_str(),
                    m.unit.as_str(),
                    created_at.as_str(),
                ])
                .map_err(|e| Error::Algorithm(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Algorithm(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| Error::Algorithm(e.to_string()))
    }

    fn count_of(&self, kind: MeasurementKind) -> usize {
        self.measurements.iter().filter(|m| m.kind == kind).count()
    }
}

/// Angle at `apex` between the directions to `first` and `third`, in degrees
fn angle_degrees(first: &Point3f, apex: &Point3f, third: &Point3f) -> f64 {
    let u = first - apex;
    let v = third - apex;
    let denom = u.norm() * v.norm();
    if denom < f32::EPSILON {
        return 0.0;
    }
    let cos = (u.dot(&v) / denom).clamp(-1.0, 1.0);
    (cos as f64).acos().to_degrees()
}
