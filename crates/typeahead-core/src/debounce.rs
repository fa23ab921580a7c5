//! Debouncing for Typeahead.
//!
//! A [`Debouncer`] collapses a burst of requests, each carrying one argument,
//! into at most one callback invocation. The callback fires only after a
//! fixed quiet interval has elapsed with no newer request; every new request
//! restarts the countdown and replaces the pending argument.
//!
//! Countdowns are Tokio tasks sleeping on the runtime's timer, so the
//! debouncer honours a paused clock in tests (`tokio::time::pause`).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use typeahead_core::Debouncer;
//!
//! # async fn demo() -> typeahead_core::Result<()> {
//! let debouncer = Debouncer::new(Duration::from_secs(1), |term: String| {
//!     println!("lookup: {term}");
//! })?;
//!
//! debouncer.schedule("ab".to_string());
//! debouncer.schedule("abc".to_string()); // "ab" is discarded
//!
//! // On teardown: the callback will never fire after this.
//! debouncer.dispose();
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, ReentrantMutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::async_runtime::current_handle;
use crate::error::{Result, TypeaheadError};
use crate::logging::{span_names, targets};

/// The quiet interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// A countdown that has been started but has not fired yet.
struct Pending<T> {
    /// Generation this countdown was started for.
    generation: u64,
    /// The argument the callback will receive.
    arg: T,
    /// The sleeping task; aborted when superseded.
    task: JoinHandle<()>,
}

/// Mutable debouncer state, guarded by one lock.
struct DebounceState<T> {
    /// Bumped on every `schedule`; a waking countdown only fires if it still
    /// owns the current generation.
    generation: u64,
    pending: Option<Pending<T>>,
    disposed: bool,
}

struct DebouncerInner<T> {
    interval: Duration,
    callback: Box<dyn Fn(T) + Send + Sync>,
    handle: Handle,
    state: Mutex<DebounceState<T>>,
    /// Held for the whole callback invocation; `dispose` waits on it.
    firing: ReentrantMutex<()>,
}

/// A time-delay gate that fires at most one callback per quiet period.
///
/// `schedule` never blocks and never invokes the callback synchronously.
/// Dropping the debouncer disposes it.
pub struct Debouncer<T: Send + 'static> {
    inner: Arc<DebouncerInner<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer that spawns its countdowns on the current runtime
    /// (or the global one when called outside a runtime).
    pub fn new<F>(interval: Duration, callback: F) -> Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let handle = current_handle().map_err(TypeaheadError::from)?;
        Ok(Self::with_handle(handle, interval, callback))
    }

    /// Create a debouncer that spawns its countdowns on `handle`.
    pub fn with_handle<F>(handle: Handle, interval: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(DebouncerInner {
                interval,
                callback: Box::new(callback),
                handle,
                state: Mutex::new(DebounceState {
                    generation: 0,
                    pending: None,
                    disposed: false,
                }),
                firing: ReentrantMutex::new(()),
            }),
        }
    }

    /// The quiet interval.
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Record `arg` and (re)start the countdown.
    ///
    /// Any previously pending countdown is cancelled and its argument
    /// discarded, even if it equals `arg`. Ignored after [`dispose`](Self::dispose).
    pub fn schedule(&self, arg: T) {
        // A disposed debouncer silently drops the request.
        let _ = self.try_schedule(arg);
    }

    /// Like [`schedule`](Self::schedule), but reports a disposed debouncer.
    pub fn try_schedule(&self, arg: T) -> Result<()> {
        let mut state = self.inner.state.lock();
        if state.disposed {
            tracing::trace!(target: targets::DEBOUNCE, "schedule after dispose ignored");
            return Err(TypeaheadError::Disposed);
        }

        state.generation += 1;
        let generation = state.generation;

        if let Some(previous) = state.pending.take() {
            previous.task.abort();
            tracing::trace!(
                target: targets::DEBOUNCE,
                superseded = previous.generation,
                "countdown restarted"
            );
        }

        let weak = Arc::downgrade(&self.inner);
        let interval = self.inner.interval;
        let task = self.inner.handle.spawn(async move {
            tokio::time::sleep(interval).await;
            DebouncerInner::fire(weak, generation);
        });

        state.pending = Some(Pending {
            generation,
            arg,
            task,
        });
        tracing::trace!(target: targets::DEBOUNCE, generation, ?interval, "countdown started");
        Ok(())
    }

    /// Cancel the pending countdown, if any. The pending argument is dropped.
    ///
    /// Returns `true` if a countdown was pending.
    pub fn cancel(&self) -> bool {
        let pending = self.inner.state.lock().pending.take();
        match pending {
            Some(pending) => {
                pending.task.abort();
                tracing::trace!(target: targets::DEBOUNCE, generation = pending.generation, "countdown cancelled");
                true
            }
            None => false,
        }
    }

    /// Fire the pending argument now instead of waiting out the interval.
    ///
    /// Returns `true` if there was a pending argument. The callback runs on
    /// the calling thread.
    pub fn flush(&self) -> bool {
        let _firing = self.inner.firing.lock();
        let pending = {
            let mut state = self.inner.state.lock();
            if state.disposed {
                return false;
            }
            state.pending.take()
        };
        match pending {
            Some(pending) => {
                pending.task.abort();
                (self.inner.callback)(pending.arg);
                true
            }
            None => false,
        }
    }

    /// Check whether a countdown is running.
    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// Cancel any pending countdown and refuse all further requests.
    ///
    /// If the callback is running on another thread, this waits for it to
    /// return. After `dispose` returns the callback does not start again.
    /// Called from inside the callback itself, it returns at once.
    pub fn dispose(&self) {
        let pending = {
            let mut state = self.inner.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.pending.take()
        };
        if let Some(pending) = pending {
            pending.task.abort();
        }
        drop(self.inner.firing.lock());
        tracing::debug!(target: targets::DEBOUNCE, "debouncer disposed");
    }

    /// Check whether the debouncer has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.state.lock().disposed
    }
}

impl<T: Send + 'static> DebouncerInner<T> {
    /// Called by a countdown task once its sleep has elapsed.
    fn fire(weak: Weak<Self>, generation: u64) {
        let Some(inner) = weak.upgrade() else {
            return;
        };

        // The ownership check and the take happen under one lock, so a
        // concurrent `schedule` either supersedes us or comes strictly after.
        // `disposed` is read with `firing` held, so `dispose` either stops us
        // here or waits for the callback below.
        let _firing = inner.firing.lock();
        let arg = {
            let mut state = inner.state.lock();
            if state.disposed {
                return;
            }
            match state.pending.take() {
                Some(pending) if pending.generation == generation => pending.arg,
                other => {
                    state.pending = other;
                    return;
                }
            }
        };

        let _span =
            tracing::trace_span!(target: targets::DEBOUNCE, span_names::DEBOUNCE_FIRE, generation)
                .entered();
        (inner.callback)(arg);
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: Send + 'static> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Debouncer")
            .field("interval", &self.inner.interval)
            .field("pending", &state.pending.is_some())
            .field("disposed", &state.disposed)
            .finish()
    }
}
