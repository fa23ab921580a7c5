//! Logging facilities for Typeahead.
//!
//! Typeahead uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("typeahead=debug,typeahead_core=trace"))
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Stale lookups are never surfaced to the user; they are only visible here,
//! at `trace` level under [`targets::QUERY`].

/// Span names used throughout Typeahead for tracing.
pub mod span_names {
    /// A debounced lookup, from dispatch until it settles.
    pub const LOOKUP: &str = "typeahead::lookup";
    /// A debounced callback firing after its quiet interval.
    pub const DEBOUNCE_FIRE: &str = "typeahead::debounce_fire";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Debouncer target.
    pub const DEBOUNCE: &str = "typeahead_core::debounce";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "typeahead_core::signal";
    /// Async runtime target.
    pub const RUNTIME: &str = "typeahead_core::async_runtime";
    /// Query controller target.
    pub const QUERY: &str = "typeahead::controller";
    /// Widget target.
    pub const WIDGET: &str = "typeahead::widget";
    /// HTTP transport target.
    pub const NET: &str = "typeahead_net";
}
