//! HTTP client for Typeahead.
//!
//! A thin layer over `reqwest` covering what a suggestion endpoint needs:
//! GET requests with query parameters, per-request timeouts, and JSON bodies.
//!
//! # Example
//!
//! ```ignore
//! use typeahead_net::http::HttpClient;
//!
//! let client = HttpClient::new()?;
//! let response = client.get("https://api.example.com/suggest").query("q", "ru").send().await?;
//! println!("Status: {}", response.status());
//! let items: Vec<String> = response.json().await?;
//! ```

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::HttpResponse;
