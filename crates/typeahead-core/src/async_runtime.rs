//! Async runtime integration for Typeahead.
//!
//! Debounce countdowns and search lookups run as Tokio tasks. Components
//! capture a [`Handle`] when they are created: the ambient runtime if they are
//! built inside one, or the lazily created global runtime otherwise (see
//! [`current_handle`]).
//!
//! Applications that are not async themselves can tune the global runtime
//! once at startup:
//!
//! ```no_run
//! use typeahead_core::async_runtime::{AsyncRuntime, AsyncRuntimeConfig};
//!
//! AsyncRuntime::init_global(
//!     AsyncRuntimeConfig::default()
//!         .with_worker_threads(2)
//!         .with_thread_name("search-io"),
//! )?;
//! # Ok::<(), typeahead_core::AsyncRuntimeError>(())
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::logging::targets;

static GLOBAL_RUNTIME: OnceLock<AsyncRuntime> = OnceLock::new();

/// Configuration for the runtime lookups run on.
#[derive(Debug, Clone)]
pub struct AsyncRuntimeConfig {
    /// Number of worker threads. Defaults to the number of CPU cores.
    pub worker_threads: Option<usize>,
    /// Name prefix for runtime threads.
    pub thread_name: String,
}

impl Default for AsyncRuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "typeahead-async".to_string(),
        }
    }
}

impl AsyncRuntimeConfig {
    /// Set the number of worker threads.
    pub fn with_worker_threads(mut self, count: usize) -> Self {
        self.worker_threads = Some(count);
        self
    }

    /// Set the thread name prefix.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// A cancellation token for async work.
///
/// The search controller uses one as its liveness flag: disposing the
/// controller cancels the token, and every pending completion checks it
/// before touching state.
#[derive(Debug, Clone)]
pub struct AsyncCancellationToken {
    inner: Arc<AsyncCancellationState>,
}

#[derive(Debug)]
struct AsyncCancellationState {
    cancelled: AtomicBool,
    notify: tokio::sync::Notify,
}

impl AsyncCancellationToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AsyncCancellationState {
                cancelled: AtomicBool::new(false),
                notify: tokio::sync::Notify::new(),
            }),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    ///
    /// Returns `true` if this call performed the cancellation, `false` if the
    /// token was already cancelled.
    pub fn cancel(&self) -> bool {
        let first = !self.inner.cancelled.swap(true, Ordering::AcqRel);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    /// Wait until cancellation is requested. Returns at once if it already was.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for AsyncCancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// An owned multi-threaded Tokio runtime.
pub struct AsyncRuntime {
    runtime: Runtime,
}

impl AsyncRuntime {
    /// Get the global async runtime.
    ///
    /// The global runtime is lazily initialized with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the runtime cannot be created. Use [`AsyncRuntime::try_global`]
    /// to handle that case.
    pub fn global() -> &'static AsyncRuntime {
        Self::try_global().expect("Failed to create global async runtime")
    }

    /// Get the global async runtime, creating it if needed.
    pub fn try_global() -> Result<&'static AsyncRuntime, AsyncRuntimeError> {
        if let Some(runtime) = GLOBAL_RUNTIME.get() {
            return Ok(runtime);
        }
        let runtime = AsyncRuntime::new(AsyncRuntimeConfig::default())?;
        // Losing a concurrent race drops our runtime and keeps the winner's.
        let _ = GLOBAL_RUNTIME.set(runtime);
        GLOBAL_RUNTIME.get().ok_or(AsyncRuntimeError::AlreadyInitialized)
    }

    /// Initialize the global runtime with `config`.
    ///
    /// Fails if the global runtime already exists, including when it was
    /// created implicitly by an earlier [`current_handle`] call.
    pub fn init_global(config: AsyncRuntimeConfig) -> Result<&'static AsyncRuntime, AsyncRuntimeError> {
        if GLOBAL_RUNTIME.get().is_some() {
            return Err(AsyncRuntimeError::AlreadyInitialized);
        }
        GLOBAL_RUNTIME
            .set(AsyncRuntime::new(config)?)
            .map_err(|_| AsyncRuntimeError::AlreadyInitialized)?;
        GLOBAL_RUNTIME.get().ok_or(AsyncRuntimeError::AlreadyInitialized)
    }

    /// Create a runtime with the given configuration.
    pub fn new(config: AsyncRuntimeConfig) -> Result<Self, AsyncRuntimeError> {
        tracing::debug!(
            target: targets::RUNTIME,
            worker_threads = ?config.worker_threads,
            thread_name = %config.thread_name,
            "creating async runtime"
        );

        let mut builder = Builder::new_multi_thread();
        builder.thread_name(&config.thread_name).enable_all();
        if let Some(workers) = config.worker_threads {
            builder.worker_threads(workers);
        }

        let runtime = builder
            .build()
            .map_err(|e| AsyncRuntimeError::CreationFailed(e.to_string()))?;
        Ok(Self { runtime })
    }

    /// Get a handle to the Tokio runtime.
    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    /// Run a future to completion on the current thread.
    ///
    /// Must not be called from within an async context.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl std::fmt::Debug for AsyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRuntime").finish_non_exhaustive()
    }
}

/// Get a handle to spawn on: the ambient Tokio runtime if called from inside
/// one, otherwise the global runtime.
pub fn current_handle() -> Result<Handle, AsyncRuntimeError> {
    match Handle::try_current() {
        Ok(handle) => Ok(handle),
        Err(_) => Ok(AsyncRuntime::try_global()?.handle().clone()),
    }
}

/// Errors that can occur with the async runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsyncRuntimeError {
    /// The global runtime has already been initialized.
    #[error("Async runtime already initialized")]
    AlreadyInitialized,
    /// Failed to create the runtime.
    #[error("Failed to create async runtime: {0}")]
    CreationFailed(String),
}
