//! Single-shot, restartable timer for search-as-you-type.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Action<T> = Arc<dyn Fn(T) -> BoxFuture + Send + Sync>;

/// Buffers rapid inputs behind a fixed delay.
///
/// Every [`call`](Self::call) cancels the pending timer and arms a new one; the
/// action only runs once input has been quiet for the whole delay, with the
/// last value. Once a timer fires its action runs detached, so a later call
/// never cancels a request already in flight.
///
/// Dropping the debouncer cancels the pending timer.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            action: Arc::new(move |value: T| -> BoxFuture { Box::pin(action(value)) }),
            pending: Mutex::new(None),
        }
    }

    /// Restart the timer with `value`. Must be called inside a tokio runtime.
    pub fn call(&self, value: T) {
        let delay = self.delay;
        let action = Arc::clone(&self.action);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action(value));
        });
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.replace(timer) {
                trace!("debounce timer restarted");
                previous.abort();
            }
        }
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(timer) = pending.take() {
                timer.abort();
            }
        }
    }

    /// True while a timer is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .ok()
            .and_then(|p| p.as_ref().map(|t| !t.is_finished()))
            .unwrap_or(false)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(timer) = pending.take() {
                timer.abort();
            }
        }
    }
}
