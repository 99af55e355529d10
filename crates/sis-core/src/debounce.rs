//! Trailing-edge debounce on the tokio timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// Quiet period before a search keystroke becomes a query.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delays a callback until calls stop arriving for `window`.
///
/// Each [`Debouncer::call`] cancels the pending invocation and schedules a new
/// one with the latest value. Dropping the debouncer cancels anything pending.
/// Must be used inside a tokio runtime.
pub struct Debouncer<T> {
    window: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Debounce `callback` over `window`.
    pub fn new(window: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            window,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    /// Schedule `value`, replacing any pending value.
    pub fn call(&mut self, value: T) {
        self.cancel();
        let deadline = Instant::now() + self.window;
        let callback = Arc::clone(&self.callback);
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            callback(value);
        }));
    }

    /// Drop the pending invocation, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether an invocation is scheduled and has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// The debounce window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}
