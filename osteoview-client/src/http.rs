//! HTTP backend client
//!
//! Thin typed wrapper over the backend's REST surface. Each call validates
//! its inputs synchronously, performs one request, and maps every failure
//! into the [`ClientError`](crate::error::ClientError) taxonomy. The caller
//! (the viewer) converts those into status messages; nothing here panics or
//! bubbles an unhandled rejection.

use crate::error::{ClientError, ClientResult};
use crate::jobs::{wait_for_job, PollConfig};
use osteoview_core::{Annotation, AnnotationComment, ConfidenceReport, EnqueueResponse, JobStatus};
use serde::Serialize;
use tracing::{debug, warn};

/// Request body for creating an annotation
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationCreate {
    pub title: String,
    pub severity: String,
    pub status: String,
    pub anchor: [f32; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentCreate>,
}

/// Request body for updating an annotation
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnotationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request body for adding a comment to an annotation thread
#[derive(Debug, Clone, Serialize)]
pub struct CommentCreate {
    pub author: String,
    pub message: String,
}

/// Typed client for the reconstruction backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against `base_url` (scheme + host + optional prefix,
    /// no trailing slash required)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn validate_model_id(model_id: i64) -> ClientResult<()> {
        if model_id <= 0 {
            return Err(ClientError::InvalidInput(format!(
                "model id must be positive, got {model_id}"
            )));
        }
        Ok(())
    }

    /// The backend answers 404 for a model whose reconstruction has not
    /// produced the requested asset yet. That is a distinct user-facing
    /// class from a transport failure: the caller can show "not ready"
    /// and retry later instead of surfacing a network error.
    fn unavailable_from_status(status: reqwest::StatusCode, what: &str) -> Option<ClientError> {
        (status == reqwest::StatusCode::NOT_FOUND)
            .then(|| ClientError::ResourceUnavailable(format!("{what} is not ready")))
    }

    /// Fetch the reconstructed mesh binary as an opaque blob.
    ///
    /// Decoding the asset (a GLTF-class format) is the scene loader's job,
    /// not the client's.
    pub async fn fetch_mesh(&self, model_id: i64) -> ClientResult<Vec<u8>> {
        Self::validate_model_id(model_id)?;
        let response = self
            .http
            .get(self.url(&format!("models/{model_id}/mesh-file")))
            .send()
            .await?;
        if let Some(err) = Self::unavailable_from_status(response.status(), "model mesh") {
            return Err(err);
        }
        let response = response.error_for_status()?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ClientError::Decode("mesh payload was empty".to_string()));
        }
        debug!(model_id, bytes = bytes.len(), "mesh fetched");
        Ok(bytes.to_vec())
    }

    /// Fetch the confidence report for display.
    ///
    /// Callers should treat failure as non-fatal: the overlay degrades to
    /// "no data" while the mesh stays usable.
    pub async fn fetch_confidence_report(&self, model_id: i64) -> ClientResult<ConfidenceReport> {
        Self::validate_model_id(model_id)?;
        let response = self
            .http
            .get(self.url(&format!("models/{model_id}/confidence-report")))
            .send()
            .await?;
        if let Some(err) = Self::unavailable_from_status(response.status(), "confidence report") {
            return Err(err);
        }
        let report = response.error_for_status()?.json::<ConfidenceReport>().await?;
        Ok(report)
    }

    /// List all annotations on a model
    pub async fn list_annotations(&self, model_id: i64) -> ClientResult<Vec<Annotation>> {
        Self::validate_model_id(model_id)?;
        let annotations = self
            .http
            .get(self.url(&format!("models/{model_id}/annotations")))
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Annotation>>()
            .await?;
        Ok(annotations)
    }

    /// Create an annotation anchored to a picked point
    pub async fn create_annotation(
        &self,
        model_id: i64,
        request: &AnnotationCreate,
    ) -> ClientResult<Annotation> {
        Self::validate_model_id(model_id)?;
        if request.title.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "annotation title must not be empty".to_string(),
            ));
        }
        let annotation = self
            .http
            .post(self.url(&format!("models/{model_id}/annotations")))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<Annotation>()
            .await?;
        Ok(annotation)
    }

    /// Patch an annotation's title/severity/status
    pub async fn update_annotation(
        &self,
        annotation_id: i64,
        request: &AnnotationUpdate,
    ) -> ClientResult<Annotation> {
        let annotation = self
            .http
            .patch(self.url(&format!("annotations/{annotation_id}")))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<Annotation>()
            .await?;
        Ok(annotation)
    }

    /// Delete an annotation
    pub async fn delete_annotation(&self, annotation_id: i64) -> ClientResult<()> {
        self.http
            .delete(self.url(&format!("annotations/{annotation_id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Append a comment to an annotation's thread
    pub async fn add_comment(
        &self,
        annotation_id: i64,
        request: &CommentCreate,
    ) -> ClientResult<AnnotationComment> {
        if request.message.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "comment message must not be empty".to_string(),
            ));
        }
        let comment = self
            .http
            .post(self.url(&format!("annotations/{annotation_id}/comments")))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<AnnotationComment>()
            .await?;
        Ok(comment)
    }

    /// One job status probe
    pub async fn job_status(&self, job_id: &str) -> ClientResult<JobStatus> {
        if job_id.trim().is_empty() {
            return Err(ClientError::InvalidInput("job id must not be empty".to_string()));
        }
        let status = self
            .http
            .get(self.url(&format!("jobs/{job_id}")))
            .send()
            .await?
            .error_for_status()?
            .json::<JobStatus>()
            .await?;
        Ok(status)
    }

    /// Poll a job to completion under the configured bound
    pub async fn wait_for_job(&self, job_id: &str, config: &PollConfig) -> ClientResult<JobStatus> {
        if job_id.trim().is_empty() {
            return Err(ClientError::InvalidInput("job id must not be empty".to_string()));
        }
        let client = self.clone();
        let job_id = job_id.to_string();
        wait_for_job(
            move || {
                let client = client.clone();
                let job_id = job_id.clone();
                async move { client.job_status(&job_id).await }
            },
            config,
        )
        .await
    }

    /// Ask the backend to retry a failed job. The new job id arrives as a
    /// structured field of the response.
    pub async fn retry_job(&self, job_id: &str) -> ClientResult<EnqueueResponse> {
        if job_id.trim().is_empty() {
            return Err(ClientError::InvalidInput("job id must not be empty".to_string()));
        }
        let response = self
            .http
            .post(self.url(&format!("jobs/{job_id}/retry")))
            .send()
            .await?
            .error_for_status()?
            .json::<EnqueueResponse>()
            .await?;
        warn!(old = job_id, new = %response.job_id, "job retried");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_tolerates_slashes() {
        let a = ApiClient::new("http://localhost:8000/api/");
        let b = ApiClient::new("http://localhost:8000/api");
        assert_eq!(a.url("/jobs/1"), "http://localhost:8000/api/jobs/1");
        assert_eq!(b.url("jobs/1"), "http://localhost:8000/api/jobs/1");
    }

    #[tokio::test]
    async fn test_invalid_model_id_fails_synchronously() {
        let client = ApiClient::new("http://localhost:0");
        let result = client.fetch_mesh(0).await;
        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
        let result = client.fetch_confidence_report(-3).await;
        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_empty_title_and_message_are_rejected() {
        let client = ApiClient::new("http://localhost:0");
        let create = AnnotationCreate {
            title: "   ".to_string(),
            severity: "medium".to_string(),
            status: "open".to_string(),
            anchor: [0.0, 0.0, 0.0],
            comment: None,
        };
        assert!(matches!(
            client.create_annotation(1, &create).await,
            Err(ClientError::InvalidInput(_))
        ));

        let comment = CommentCreate {
            author: "clinician".to_string(),
            message: "".to_string(),
        };
        assert!(matches!(
            client.add_comment(1, &comment).await,
            Err(ClientError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_job_id_is_rejected() {
        let client = ApiClient::new("http://localhost:0");
        assert!(matches!(
            client.job_status("").await,
            Err(ClientError::InvalidInput(_))
        ));
        assert!(matches!(
            client.retry_job(" ").await,
            Err(ClientError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_asset_maps_to_resource_unavailable() {
        let err = ApiClient::unavailable_from_status(reqwest::StatusCode::NOT_FOUND, "model mesh")
            .expect("404 must map to ResourceUnavailable");
        assert!(matches!(err, ClientError::ResourceUnavailable(_)));
        assert!(err.status_message().contains("model mesh is not ready"));

        // Success and server-error statuses take the ordinary paths.
        assert!(ApiClient::unavailable_from_status(reqwest::StatusCode::OK, "model mesh").is_none());
        assert!(ApiClient::unavailable_from_status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "model mesh"
        )
        .is_none());
    }

    #[test]
    fn test_annotation_update_skips_unset_fields() {
        let update = AnnotationUpdate {
            severity: Some("high".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"severity":"high"}"#);
    }
}
