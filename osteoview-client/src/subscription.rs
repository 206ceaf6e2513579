//! Live update subscription ownership
//!
//! The viewer may hold at most one open job/annotation stream at a time.
//! Opening a new subscription (for example on retry) first tears down the
//! prior one. Teardown happens through ownership: dropping the guard closes
//! the stream exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Handle to one open live stream. Dropping it closes the stream.
#[derive(Debug)]
pub struct SubscriptionGuard {
    topic: String,
    closed: Arc<AtomicBool>,
}

impl SubscriptionGuard {
    /// Whether the stream has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Shared view of the closed flag, for transports to observe
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!(topic = %self.topic, "live subscription closed");
    }
}

/// Owns the viewer's single live subscription slot
#[derive(Debug, Default)]
pub struct LiveFeed {
    current: Option<SubscriptionGuard>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a subscription for `topic`, tearing down any prior one first.
    /// Returns a shared closed-flag the transport polls to stop delivery.
    pub fn open(&mut self, topic: impl Into<String>) -> Arc<AtomicBool> {
        // Replacing the slot drops (and thereby closes) the previous guard.
        let guard = SubscriptionGuard {
            topic: topic.into(),
            closed: Arc::new(AtomicBool::new(false)),
        };
        let flag = guard.closed_flag();
        self.current = Some(guard);
        flag
    }

    /// Close the current subscription, if any
    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn active_topic(&self) -> Option<&str> {
        self.current.as_ref().map(|g| g.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_a_new_stream_tears_down_the_prior() {
        let mut feed = LiveFeed::new();
        let first = feed.open("job/abc");
        assert!(!first.load(Ordering::SeqCst));

        let second = feed.open("job/def");
        assert!(first.load(Ordering::SeqCst), "prior stream must be closed");
        assert!(!second.load(Ordering::SeqCst));
        assert_eq!(feed.active_topic(), Some("job/def"));
    }

    #[test]
    fn test_explicit_close_releases_the_slot() {
        let mut feed = LiveFeed::new();
        let flag = feed.open("annotations/7");
        feed.close();
        assert!(flag.load(Ordering::SeqCst));
        assert!(feed.active_topic().is_none());
    }
}
