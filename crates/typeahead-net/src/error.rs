//! Error types for the HTTP transport.

use thiserror::Error;
use typeahead_core::LookupError;

/// Everything that can go wrong between sending a lookup and decoding its
/// suggestions.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// The endpoint URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// The request did not finish within its timeout.
    #[error("Request timed out")]
    Timeout,
    /// The endpoint could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The endpoint kept redirecting.
    #[error("Too many redirects")]
    TooManyRedirects,
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}{}", detail(.message))]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The trimmed response body, if any.
        message: Option<String>,
    },
    /// The body was not the JSON shape a suggestion list needs.
    #[error("JSON error: {0}")]
    Json(String),
    /// Any other transport failure.
    #[error("HTTP request error: {0}")]
    Request(String),
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(msg) if !msg.is_empty() => format!(": {msg}"),
        _ => String::new(),
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_decode() {
            Self::Json(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

/// Lookups surface a network failure as its display string.
impl From<NetworkError> for LookupError {
    fn from(err: NetworkError) -> Self {
        LookupError::new(err)
    }
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
