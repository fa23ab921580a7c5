//! Error types for Typeahead.

use std::fmt;

use crate::async_runtime::AsyncRuntimeError;

/// The main error type for Typeahead core operations.
#[derive(Debug)]
pub enum TypeaheadError {
    /// No Tokio runtime was available and the global one could not be created.
    Runtime(AsyncRuntimeError),
    /// The component has been disposed and no longer accepts work.
    Disposed,
}

impl fmt::Display for TypeaheadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime(err) => write!(f, "Async runtime error: {err}"),
            Self::Disposed => write!(f, "Component has already been disposed"),
        }
    }
}

impl std::error::Error for TypeaheadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Runtime(err) => Some(err),
            Self::Disposed => None,
        }
    }
}

impl From<AsyncRuntimeError> for TypeaheadError {
    fn from(err: AsyncRuntimeError) -> Self {
        Self::Runtime(err)
    }
}

/// A specialized Result type for Typeahead operations.
pub type Result<T> = std::result::Result<T, TypeaheadError>;
