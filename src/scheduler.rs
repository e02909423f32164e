//! One-shot expiry scheduling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked when a scheduled delay elapses.
pub type ExpiryCallback = Box<dyn FnOnce() + Send + 'static>;

/// Schedules a single delayed callback that can be cancelled before it fires.
pub trait Scheduler: Send + Sync {
    /// Arms `callback` to run once after `delay`.
    ///
    /// The callback must be invoked from the scheduler's own context, never synchronously
    /// from inside this call; callers may hold locks across `schedule`.
    fn schedule(&self, delay: Duration, callback: ExpiryCallback) -> ScheduleHandle;
}

/// Cancellation handle for a scheduled callback.
///
/// Cancelling is an idempotent no-op once the callback has fired or the handle was already
/// cancelled. Cancellation is best-effort: a callback already in flight may still run, so the
/// callback itself must tolerate running after a cancel (the scan session re-checks its state
/// under its own lock for exactly this reason).
#[derive(Debug, Clone, Default)]
pub struct ScheduleHandle {
    cancelled: Arc<AtomicBool>,
}

impl ScheduleHandle {
    /// Creates a live (not yet cancelled) handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the pending callback not run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`][Self::cancel] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// [`Scheduler`] backed by a Tokio runtime.
///
/// Each scheduled callback runs on a spawned task after a [`tokio::time::sleep`]; a cancelled
/// handle makes the task exit without invoking the callback.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Creates a scheduler on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called from outside a Tokio runtime context.
    pub fn new() -> Self {
        Self::with_handle(tokio::runtime::Handle::current())
    }

    /// Creates a scheduler on the given runtime handle.
    pub fn with_handle(runtime: tokio::runtime::Handle) -> Self {
        TokioScheduler { runtime }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: ExpiryCallback) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        let armed = handle.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if !armed.is_cancelled() {
                callback();
            }
        });
        handle
    }
}
