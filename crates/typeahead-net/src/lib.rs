//! HTTP transport for Typeahead.
//!
//! This crate provides two layers:
//!
//! - **HTTP client** ([`http`]): a small `reqwest` wrapper for GET requests with
//!   query parameters, timeouts, and JSON bodies
//! - **Search provider** ([`HttpSearchProvider`]): a
//!   [`SearchProvider`](typeahead_core::SearchProvider) that turns each lookup
//!   into a request against a suggestion endpoint
//!
//! # Search Provider
//!
//! ```ignore
//! use typeahead_net::{HttpSearchConfig, HttpSearchProvider};
//!
//! let provider = HttpSearchProvider::new(
//!     HttpSearchConfig::new("https://api.example.com/suggest").with_query_param("term"),
//! )?;
//!
//! // GET https://api.example.com/suggest?term=ru
//! let suggestions = provider.fetch("ru").await?;
//! ```
//!
//! The endpoint may answer with a JSON array of strings or with an object
//! holding a `results` array. Non-2xx statuses are reported with the trimmed
//! response body as the message.

mod error;
pub mod http;
mod provider;

pub use error::{NetworkError, Result};
pub use provider::{HttpSearchConfig, HttpSearchProvider};
