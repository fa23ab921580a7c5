//! The debounced query controller.
//!
//! A [`QueryController`] owns the visible [`SearchState`] of one search input
//! and decides when lookups reach the [`SearchProvider`]:
//!
//! 1. Every keystroke updates the text synchronously and (re)starts the
//!    debounce countdown with the new text.
//! 2. A blank keystroke also clears results, error, and loading at once, and
//!    supersedes any lookup still in flight.
//! 3. When the countdown elapses the controller issues a fresh
//!    [`QueryToken`]. A non-blank term turns loading on and starts the lookup.
//! 4. A lookup may only touch the state if its token is still the latest one
//!    when it completes. Older completions are dropped silently, however many
//!    of them arrive and in whatever order.
//!
//! # Signals
//!
//! - `state_changed`: the new [`SearchState`], emitted only when it differs
//!   from the previous one
//! - `query_dispatched`: the term of every lookup handed to the provider
//!
//! Signals are emitted with no internal lock held, so slots may call back into
//! the controller.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::Instrument;
use typeahead_core::async_runtime::current_handle;
use typeahead_core::logging::{span_names, targets};
use typeahead_core::{
    AsyncCancellationToken, Debouncer, Result, SearchProvider, SearchResult, Signal,
    TypeaheadError,
};

use crate::view::{QueryPhase, SearchState};

/// Identifies one dispatch. Later dispatches carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

impl QueryToken {
    /// The raw generation number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The most recent debounced dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestQuery {
    /// Token issued for the dispatch.
    pub token: QueryToken,
    /// The term, as typed.
    pub term: String,
}

struct ControllerState {
    view: SearchState,
    /// Bumped by every dispatch and every blank keystroke. A completion is
    /// current only while this still equals its token.
    generation: u64,
    /// Bumped by every text change. A debounce firing carries the epoch it
    /// was scheduled under and is dropped once a newer text change exists.
    epoch: u64,
    latest: Option<LatestQuery>,
}

impl ControllerState {
    fn is_current(&self, token: QueryToken) -> bool {
        self.generation == token.0
    }
}

struct ControllerInner {
    provider: Arc<dyn SearchProvider>,
    handle: Handle,
    state: Mutex<ControllerState>,
    alive: AsyncCancellationToken,
    state_changed: Signal<SearchState>,
    query_dispatched: Signal<String>,
}

/// Drives lookups for one search input.
///
/// Dropping the controller disposes it.
pub struct QueryController {
    inner: Arc<ControllerInner>,
    debouncer: Debouncer<(u64, String)>,
}

impl QueryController {
    /// Create a controller that runs its timers and lookups on the current
    /// runtime (or the global one when called outside a runtime).
    pub fn new<P: SearchProvider>(provider: P, interval: Duration) -> Result<Self> {
        let handle = current_handle().map_err(TypeaheadError::from)?;
        Ok(Self::with_handle(handle, provider, interval))
    }

    /// Create a controller that runs its timers and lookups on `handle`.
    pub fn with_handle<P: SearchProvider>(handle: Handle, provider: P, interval: Duration) -> Self {
        let inner = Arc::new(ControllerInner {
            provider: Arc::new(provider),
            handle: handle.clone(),
            state: Mutex::new(ControllerState {
                view: SearchState::default(),
                generation: 0,
                epoch: 0,
                latest: None,
            }),
            alive: AsyncCancellationToken::new(),
            state_changed: Signal::new(),
            query_dispatched: Signal::new(),
        });

        let weak = Arc::downgrade(&inner);
        let debouncer =
            Debouncer::with_handle(handle, interval, move |(epoch, term): (u64, String)| {
                if let Some(inner) = weak.upgrade() {
                    ControllerInner::dispatch(&inner, epoch, term);
                }
            });

        Self { inner, debouncer }
    }

    /// The debounce interval.
    pub fn interval(&self) -> Duration {
        self.debouncer.interval()
    }

    /// Handle a change of the input text.
    ///
    /// The text is stored immediately. A blank text (empty or whitespace
    /// only) also clears results, error, and loading, and retires any lookup
    /// still in flight. Either way the text is forwarded to the debouncer,
    /// replacing whatever was pending. A countdown for an earlier text that is
    /// already firing is discarded. Ignored after [`dispose`](Self::dispose).
    pub fn on_text_changed(&self, text: impl Into<String>) {
        if self.is_disposed() {
            tracing::trace!(target: targets::QUERY, "text change after dispose ignored");
            return;
        }
        let text = text.into();

        let changed = {
            let mut state = self.inner.state.lock();
            let before = state.view.clone();
            state.epoch += 1;
            state.view.text.clone_from(&text);
            if text.trim().is_empty() {
                state.view.results.clear();
                state.view.error = None;
                state.view.loading = false;
                state.generation += 1;
                tracing::trace!(target: targets::QUERY, generation = state.generation, "input cleared");
            }
            // Countdowns are restarted in epoch order.
            self.debouncer.schedule((state.epoch, text));
            (state.view != before).then(|| state.view.clone())
        };

        if let Some(view) = changed {
            self.inner.state_changed.emit(view);
        }
    }

    /// Clear the input. Same as `on_text_changed("")`.
    pub fn clear(&self) {
        self.on_text_changed(String::new());
    }

    /// Dispatch the pending text now instead of waiting out the interval.
    ///
    /// Returns `true` if a countdown was pending.
    pub fn flush(&self) -> bool {
        self.debouncer.flush()
    }

    /// A snapshot of the visible state.
    pub fn state(&self) -> SearchState {
        self.inner.state.lock().view.clone()
    }

    /// The current input text.
    pub fn text(&self) -> String {
        self.inner.state.lock().view.text.clone()
    }

    /// The current phase.
    pub fn phase(&self) -> QueryPhase {
        self.inner.state.lock().view.phase()
    }

    /// The most recent dispatch, if any.
    pub fn latest_query(&self) -> Option<LatestQuery> {
        self.inner.state.lock().latest.clone()
    }

    /// Check whether a debounce countdown is running.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Signal emitted with the new state whenever the visible state changes.
    pub fn state_changed(&self) -> &Signal<SearchState> {
        &self.inner.state_changed
    }

    /// Signal emitted with the term of every lookup handed to the provider.
    pub fn query_dispatched(&self) -> &Signal<String> {
        &self.inner.query_dispatched
    }

    /// Stop the controller.
    ///
    /// The pending countdown is cancelled and every lookup still in flight
    /// becomes a no-op when it completes. Further text changes are ignored.
    pub fn dispose(&self) {
        if !self.inner.alive.cancel() {
            return;
        }
        self.debouncer.dispose();
        tracing::debug!(target: targets::QUERY, "query controller disposed");
    }

    /// Check whether the controller has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.alive.is_cancelled()
    }
}

impl ControllerInner {
    /// Debounced entry point: issue a token for `term` and start its lookup.
    ///
    /// `epoch` is the text change the countdown was started for; a firing
    /// that lost the race against a newer text change does nothing.
    fn dispatch(self: &Arc<Self>, epoch: u64, term: String) {
        if self.alive.is_cancelled() {
            return;
        }

        let (token, changed) = {
            let mut state = self.state.lock();
            if state.epoch != epoch {
                tracing::trace!(
                    target: targets::QUERY,
                    epoch,
                    latest = state.epoch,
                    "superseded countdown dropped"
                );
                return;
            }
            state.generation += 1;
            let token = QueryToken(state.generation);
            state.latest = Some(LatestQuery {
                token,
                term: term.clone(),
            });

            if term.trim().is_empty() {
                tracing::trace!(target: targets::QUERY, token = token.0, "blank query, no lookup");
                return;
            }

            let before = state.view.clone();
            state.view.loading = true;
            state.view.error = None;
            (token, (state.view != before).then(|| state.view.clone()))
        };

        tracing::debug!(target: targets::QUERY, token = token.0, term = %term, "dispatching lookup");
        if let Some(view) = changed {
            self.state_changed.emit(view);
        }
        self.query_dispatched.emit(term.clone());

        let span = tracing::debug_span!(
            target: targets::QUERY,
            span_names::LOOKUP,
            token = token.0,
            term = %term
        );
        let lookup = self.provider.search(&term);
        let weak = Arc::downgrade(self);
        self.handle.spawn(
            async move {
                let outcome = lookup.await;
                Self::complete(weak, token, outcome);
            }
            .instrument(span),
        );
    }

    /// Apply a lookup outcome if `token` is still the latest dispatch.
    fn complete(weak: Weak<Self>, token: QueryToken, outcome: SearchResult) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if inner.alive.is_cancelled() {
            tracing::trace!(target: targets::QUERY, token = token.0, "completion after dispose ignored");
            return;
        }

        let changed = {
            let mut state = inner.state.lock();
            if !state.is_current(token) {
                tracing::trace!(
                    target: targets::QUERY,
                    token = token.0,
                    latest = state.generation,
                    ok = outcome.is_ok(),
                    "stale lookup discarded"
                );
                return;
            }

            let before = state.view.clone();
            match outcome {
                Ok(items) => {
                    tracing::debug!(target: targets::QUERY, token = token.0, count = items.len(), "lookup succeeded");
                    state.view.results = items;
                }
                Err(err) => {
                    tracing::debug!(target: targets::QUERY, token = token.0, error = %err, "lookup failed");
                    state.view.error = Some(err.to_string());
                    state.view.results.clear();
                }
            }
            state.view.loading = false;
            (state.view != before).then(|| state.view.clone())
        };

        if let Some(view) = changed {
            inner.state_changed.emit(view);
        }
    }
}

impl Drop for QueryController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for QueryController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("QueryController")
            .field("interval", &self.debouncer.interval())
            .field("state", &state.view)
            .field("generation", &state.generation)
            .field("epoch", &state.epoch)
            .field("disposed", &self.inner.alive.is_cancelled())
            .finish()
    }
}
