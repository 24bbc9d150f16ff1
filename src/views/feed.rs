//! Delivery of conversation updates while a thread is open.
//!
//! Views depend on [`MessageFeed`] only. [`PollingFeed`] re-fetches on a
//! fixed interval; a push-based feed can replace it without touching the
//! consuming view.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config;
use crate::error::ClientError;
use crate::models::RequestMessage;
use crate::views::generation::Ticket;
use crate::views::inbox::RequestsBackend;

/// Receives message snapshots from a feed.
///
/// A feed takes a ticket from [`begin`](Self::begin) before each fetch and
/// hands it back with the outcome; the listener drops outcomes whose ticket
/// is no longer current.
pub trait MessageListener: Send + Sync {
    fn begin(&self) -> Ticket;

    /// The complete, ordered message list of `request_id`.
    fn on_messages(&self, request_id: i64, ticket: Ticket, messages: Vec<RequestMessage>);

    fn on_refresh_failed(&self, request_id: i64, ticket: Ticket, error: &ClientError);
}

/// Source of live updates for one conversation.
pub trait MessageFeed: Send + Sync {
    /// Start delivering updates for `request_id` to `listener`. Delivery
    /// stops when the returned handle is stopped or dropped.
    fn watch(&self, request_id: i64, listener: Arc<dyn MessageListener>) -> FeedHandle;
}

// ---------------------------------------------------------------------------
// FeedHandle
// ---------------------------------------------------------------------------

/// Owns the background delivery task of a feed.
pub struct FeedHandle {
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// A handle with nothing behind it.
    pub fn detached() -> Self {
        Self { task: None }
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// PollingFeed
// ---------------------------------------------------------------------------

/// Re-fetches the whole message list on a fixed interval, whether or not
/// anything changed and regardless of page visibility.
pub struct PollingFeed {
    backend: Arc<dyn RequestsBackend>,
    period: Duration,
}

impl PollingFeed {
    pub fn new(backend: Arc<dyn RequestsBackend>) -> Self {
        Self::with_period(backend, config::MESSAGE_POLL_INTERVAL)
    }

    pub fn with_period(backend: Arc<dyn RequestsBackend>, period: Duration) -> Self {
        Self { backend, period }
    }
}

impl MessageFeed for PollingFeed {
    fn watch(&self, request_id: i64, listener: Arc<dyn MessageListener>) -> FeedHandle {
        let backend = Arc::clone(&self.backend);
        let period = self.period;
        let task = tokio::spawn(async move {
            // The caller already loaded the thread; first refresh is one
            // period out.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!(request_id, "polling conversation");
                let ticket = listener.begin();
                match backend.messages(request_id).await {
                    Ok(messages) => listener.on_messages(request_id, ticket, messages),
                    Err(e) => {
                        warn!(request_id, error = %e, "conversation refresh failed");
                        listener.on_refresh_failed(request_id, ticket, &e);
                    }
                }
            }
        });
        FeedHandle::new(task)
    }
}
