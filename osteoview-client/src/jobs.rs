//! Asynchronous job polling
//!
//! The viewer polls a backend job until it reaches a terminal status, under a
//! bounded wall-clock timeout. Timeout is a distinct outcome from a
//! server-reported failure so the UI can tell "retry manually" apart from
//! "the backend gave up". The probe is injected, so the loop is testable
//! without a live server.

use crate::error::{ClientError, ClientResult};
use osteoview_core::{JobState, JobStatus};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Polling cadence and bound
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Poll `probe` until the job reaches a terminal status.
///
/// # Returns
/// * `Ok(status)` - the job succeeded
/// * `Err(ClientError::JobFailed)` - the backend reported `failed` or `dead`,
///   carrying the backend's reason string when present
/// * `Err(ClientError::Timeout)` - the bound elapsed without a terminal
///   status; polling stops
pub async fn wait_for_job<F, Fut>(mut probe: F, config: &PollConfig) -> ClientResult<JobStatus>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<JobStatus>>,
{
    let deadline = Instant::now() + config.timeout;
    loop {
        let status = probe().await?;
        debug!(
            job = %status.id,
            state = ?status.status,
            stage = %status.stage,
            progress = status.progress,
            "job polled"
        );
        match status.status {
            JobState::Succeeded => return Ok(status),
            JobState::Failed | JobState::Dead => {
                return Err(ClientError::JobFailed {
                    reason: status.error,
                })
            }
            JobState::Queued | JobState::Running => {}
        }
        if Instant::now() + config.interval > deadline {
            return Err(ClientError::Timeout);
        }
        tokio::time::sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn status(state: JobState, error: Option<&str>) -> JobStatus {
        JobStatus {
            id: "job-1".to_string(),
            job_type: "reconstruct".to_string(),
            status: state,
            stage: "inference".to_string(),
            progress: 50,
            eta_seconds: None,
            attempts: 1,
            max_attempts: 3,
            dead_letter: false,
            error: error.map(str::to_string),
            result_json: None,
        }
    }

    fn config() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(100),
            timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let result = wait_for_job(
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(if n < 3 {
                        status(JobState::Running, None)
                    } else {
                        status(JobState::Succeeded, None)
                    })
                }
            },
            &config(),
        )
        .await
        .unwrap();
        assert_eq!(result.status, JobState::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_carries_backend_reason() {
        let result = wait_for_job(
            || async { Ok(status(JobState::Failed, Some("reconstruction diverged"))) },
            &config(),
        )
        .await;
        match result {
            Err(ClientError::JobFailed { reason }) => {
                assert_eq!(reason.as_deref(), Some("reconstruction diverged"));
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dead_job_is_a_failure() {
        let result = wait_for_job(
            || async { Ok(status(JobState::Dead, None)) },
            &config(),
        )
        .await;
        assert!(matches!(result, Err(ClientError::JobFailed { reason: None })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_terminal_job_times_out_and_stops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let result = wait_for_job(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(status(JobState::Queued, None)) }
            },
            &config(),
        )
        .await;
        assert!(matches!(result, Err(ClientError::Timeout)));
        // interval 100ms under a 2s bound: polling stopped at the deadline.
        let polls = calls.load(Ordering::SeqCst);
        assert!(polls <= 21, "polling did not stop at the bound: {polls}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_errors_propagate() {
        let result = wait_for_job(
            || async { Err(ClientError::Decode("bad payload".to_string())) },
            &config(),
        )
        .await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }
}
