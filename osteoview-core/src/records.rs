//! Domain records shared by the viewer and the backend client
//!
//! These mirror the backend wire schemas (annotations, jobs, confidence
//! reports) and the viewer-local record types (measurements, quality reports,
//! comparison summaries).

use crate::point::Point3f;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity for the derived surface-area measurement entry
pub const SURFACE_MEASUREMENT_ID: &str = "derived-surface";
/// Stable identity for the derived volume measurement entry
pub const VOLUME_MEASUREMENT_ID: &str = "derived-volume";

/// The kind of a measurement record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Distance,
    Angle,
    Surface,
    Volume,
}

impl MeasurementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::Distance => "distance",
            MeasurementKind::Angle => "angle",
            MeasurementKind::Surface => "surface",
            MeasurementKind::Volume => "volume",
        }
    }
}

/// A measurement taken on the displayed mesh.
///
/// Distance measurements carry exactly 2 points and angle measurements
/// exactly 3 (apex at `points[1]`). Surface and volume entries carry no
/// points; they are derived from the whole mesh and keep a constant id per
/// kind so refreshing them replaces rather than accumulates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: String,
    pub kind: MeasurementKind,
    pub value: f64,
    pub unit: String,
    pub label: String,
    pub points: Vec<Point3f>,
    pub created_at: DateTime<Utc>,
}

impl Measurement {
    /// Create a user-recorded measurement with a fresh id
    pub fn recorded(
        kind: MeasurementKind,
        value: f64,
        unit: impl Into<String>,
        label: impl Into<String>,
        points: Vec<Point3f>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            value,
            unit: unit.into(),
            label: label.into(),
            points,
            created_at: Utc::now(),
        }
    }

    /// Create the derived surface-area entry with its fixed id
    pub fn surface(value: f64, unit: impl Into<String>) -> Self {
        Self::derived_entry(
            SURFACE_MEASUREMENT_ID,
            MeasurementKind::Surface,
            "Surface area",
            value,
            unit,
        )
    }

    /// Create the derived volume entry with its fixed id
    pub fn volume(value: f64, unit: impl Into<String>) -> Self {
        Self::derived_entry(
            VOLUME_MEASUREMENT_ID,
            MeasurementKind::Volume,
            "Volume",
            value,
            unit,
        )
    }

    fn derived_entry(
        id: &str,
        kind: MeasurementKind,
        label: &str,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            value,
            unit: unit.into(),
            label: label.to_string(),
            points: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this entry is derived state rather than a user-recorded event
    pub fn is_derived(&self) -> bool {
        matches!(self.kind, MeasurementKind::Surface | MeasurementKind::Volume)
    }
}

/// Clinical severity of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Review status of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStatus {
    Open,
    InReview,
    Resolved,
}

/// One entry in an annotation's comment thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationComment {
    pub id: i64,
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A clinician-authored note pinned to a 3D point on the mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i64,
    pub title: String,
    pub severity: Severity,
    pub status: AnnotationStatus,
    pub anchor: Point3f,
    #[serde(default)]
    pub comments: Vec<AnnotationComment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pre-upload quality assessment of one image file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Derived from file name + size + modification time
    pub fingerprint: String,
    pub blur_score: f32,
    pub contrast_score: f32,
    pub duplicate: bool,
}

/// Percentage deltas of post-model metrics relative to the pre-model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub area_delta_pct: f32,
    pub volume_delta_pct: f32,
    pub width_delta_pct: f32,
    pub height_delta_pct: f32,
    pub depth_delta_pct: f32,
}

/// Backend-supplied confidence breakdown for a reconstructed mesh.
///
/// Display only; no internal computation consumes these ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceReport {
    #[serde(alias = "confidence")]
    pub overall_confidence: f32,
    pub observed_ratio: f32,
    pub adjusted_ratio: f32,
    pub inferred_ratio: f32,
    #[serde(default)]
    pub mode: String,
}

/// Lifecycle state of an asynchronous backend job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Dead,
}

impl JobState {
    /// Terminal states stop the polling loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed | JobState::Dead)
    }
}

/// Snapshot of an asynchronous backend job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: String,
    pub job_type: String,
    pub status: JobState,
    pub stage: String,
    pub progress: u8,
    #[serde(default)]
    pub eta_seconds: Option<u64>,
    pub attempts: u32,
    pub max_attempts: u32,
    #[serde(default)]
    pub dead_letter: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result_json: Option<serde_json::Value>,
}

/// Response to enqueueing a backend job.
///
/// The job id is a structured field of this response; it is never recovered
/// from free-text notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueResponse {
    pub job_id: String,
    pub status: JobState,
    #[serde(default)]
    pub resource_id: Option<i64>,
}
