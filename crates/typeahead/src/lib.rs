//! Typeahead - a debounced asynchronous search input.
//!
//! This is the main crate. It re-exports the core building blocks and adds:
//!
//! - **[`QueryController`]**: debounces keystrokes into lookups and keeps only
//!   the answer to the latest query
//! - **[`SearchInput`]**: the widget facade with configuration and a
//!   selection signal
//! - **[`SearchView`]**: the render model derived from the visible state
//! - **[`StaticSearchProvider`]**: an in-memory provider for demos and tests
//!
//! With the `networking` feature, the HTTP provider from `typeahead-net` is
//! available under [`net`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use typeahead::{SearchInput, SearchInputConfig, StaticSearchProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input = SearchInput::new(
//!         SearchInputConfig::new().with_debounce(Duration::from_millis(300)),
//!         StaticSearchProvider::new(["rust", "ruby", "go"]),
//!     )?;
//!
//!     input.controller().state_changed().connect(|state| println!("{}", state.view()));
//!     input.set_text("ru")?;
//!
//!     tokio::time::sleep(Duration::from_millis(400)).await;
//!     Ok(())
//! }
//! ```

pub use typeahead_core::*;

mod config;
pub mod controller;
mod error;
pub mod prelude;
mod provider;
pub mod view;
mod widget;

pub use config::SearchInputConfig;
pub use controller::{LatestQuery, QueryController, QueryToken};
pub use error::{ConfigError, ConfigResult};
pub use provider::{CaseSensitivity, MatchMode, StaticSearchProvider};
pub use view::{QueryPhase, SearchState, SearchView};
pub use widget::SearchInput;

/// HTTP search provider.
#[cfg(feature = "networking")]
pub mod net {
    pub use typeahead_net::*;
}
