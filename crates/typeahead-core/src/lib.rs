//! Core systems for Typeahead.
//!
//! This crate provides the building blocks the search widget is assembled from:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Debouncer**: Collapses bursts of requests into one call per quiet period
//! - **Async Runtime**: Tokio runtime management and cancellation tokens
//! - **Search Provider**: The seam through which lookups reach a backend
//!
//! # Debounce Example
//!
//! ```no_run
//! use std::time::Duration;
//! use typeahead_core::Debouncer;
//!
//! # async fn demo() -> typeahead_core::Result<()> {
//! let debouncer = Debouncer::new(Duration::from_millis(300), |term: String| {
//!     println!("searching for {term}");
//! })?;
//!
//! // Only "rust" is delivered, 300 ms after the last call.
//! debouncer.schedule("r".to_string());
//! debouncer.schedule("ru".to_string());
//! debouncer.schedule("rust".to_string());
//! # Ok(())
//! # }
//! ```
//!
//! # Signal Example
//!
//! ```
//! use typeahead_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello".to_string());
//! text_changed.disconnect(conn_id);
//! ```
//!
//! # Search Provider Example
//!
//! ```
//! use typeahead_core::search::{provider_fn, SearchProvider};
//!
//! let provider = provider_fn(|term: String| async move {
//!     Ok::<_, std::io::Error>(vec![format!("{term}!")])
//! });
//! let _lookup = provider.search("hello");
//! ```

pub mod async_runtime;
pub mod debounce;
mod error;
pub mod logging;
pub mod search;
pub mod signal;

pub use async_runtime::{AsyncCancellationToken, AsyncRuntime, AsyncRuntimeConfig, AsyncRuntimeError};
pub use debounce::Debouncer;
pub use error::{Result, TypeaheadError};
pub use search::{provider_fn, FnProvider, LookupError, SearchProvider, SearchResult};
pub use signal::{ConnectionId, Signal};
