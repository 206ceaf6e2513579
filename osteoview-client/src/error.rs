//! Client error taxonomy
//!
//! Mirrors the viewer's user-facing failure classes: input validation,
//! network/backend failures, long-running job failures, bounded-wait
//! timeouts, refused environment resources, and malformed share payloads.

use thiserror::Error;

/// Errors surfaced by backend interactions
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("job failed: {}", reason.as_deref().unwrap_or("no reason reported"))]
    JobFailed { reason: Option<String> },

    #[error("timed out waiting for job completion; retry manually")]
    Timeout,

    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("could not decode share payload: {0}")]
    MalformedShare(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// The status line shown to the user for this failure
    pub fn status_message(&self) -> String {
        match self {
            ClientError::Timeout => {
                "the operation timed out; please retry manually".to_string()
            }
            ClientError::JobFailed { reason: Some(reason) } => {
                format!("processing failed: {reason}")
            }
            ClientError::JobFailed { reason: None } => {
                "processing failed; please retry".to_string()
            }
            ClientError::MalformedShare(_) => "could not decode share link".to_string(),
            other => other.to_string(),
        }
    }
}
