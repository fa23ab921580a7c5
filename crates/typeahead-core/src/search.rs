//! The seam between the search widget and whatever answers its lookups.
//!
//! A [`SearchProvider`] turns a query term into a future resolving to an
//! ordered list of suggestions. The widget treats it as opaque: it never
//! retries, never times out, and never cancels the returned future. Every
//! failure, whatever its origin, collapses into a [`LookupError`] whose
//! display string is what the user sees.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

/// A failed lookup, carrying the provider's error coerced to a display string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LookupError {
    message: String,
}

impl LookupError {
    /// Create a lookup error from anything displayable.
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
        }
    }

    /// The message shown in place of the results.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The outcome of a single lookup.
pub type SearchResult = std::result::Result<Vec<String>, LookupError>;

/// Something that can answer search queries asynchronously.
///
/// Implementations must return without blocking; the work happens when the
/// returned future is polled on the runtime.
pub trait SearchProvider: Send + Sync + 'static {
    /// Start a lookup for `term`.
    fn search(&self, term: &str) -> BoxFuture<'static, SearchResult>;
}

impl<P: SearchProvider + ?Sized> SearchProvider for Arc<P> {
    fn search(&self, term: &str) -> BoxFuture<'static, SearchResult> {
        (**self).search(term)
    }
}

impl<P: SearchProvider + ?Sized> SearchProvider for Box<P> {
    fn search(&self, term: &str) -> BoxFuture<'static, SearchResult> {
        (**self).search(term)
    }
}

/// A [`SearchProvider`] backed by an async closure. Created by [`provider_fn`].
#[derive(Clone)]
pub struct FnProvider<F> {
    f: F,
}

/// Wrap an async closure as a [`SearchProvider`].
///
/// The closure's error type only needs to be displayable; it is converted to
/// a [`LookupError`].
///
/// # Example
///
/// ```
/// use typeahead_core::search::provider_fn;
///
/// let provider = provider_fn(|term: String| async move {
///     if term == "boom" {
///         Err("network error")
///     } else {
///         Ok(vec![format!("{term}d"), format!("{term}de")])
///     }
/// });
/// # let _ = provider;
/// ```
pub fn provider_fn<F, Fut, E>(f: F) -> FnProvider<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<Vec<String>, E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    FnProvider { f }
}

impl<F, Fut, E> SearchProvider for FnProvider<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<Vec<String>, E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    fn search(&self, term: &str) -> BoxFuture<'static, SearchResult> {
        let lookup = (self.f)(term.to_string());
        async move { lookup.await.map_err(LookupError::new) }.boxed()
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_provider_success() {
        let provider = provider_fn(|term: String| async move {
            Ok::<_, LookupError>(vec![format!("{term}d"), format!("{term}de")])
        });

        let results = provider.search("abc").await.unwrap();
        assert_eq!(results, vec!["abcd".to_string(), "abcde".to_string()]);
    }

    #[tokio::test]
    async fn test_fn_provider_error_is_stringified() {
        let provider =
            provider_fn(|_term: String| async move { Err::<Vec<String>, _>("network error") });

        let err = provider.search("abc").await.unwrap_err();
        assert_eq!(err.message(), "network error");
        assert_eq!(err.to_string(), "network error");
    }

    #[tokio::test]
    async fn test_arc_provider_delegates() {
        let provider: Arc<dyn SearchProvider> =
            Arc::new(provider_fn(|term: String| async move { Ok::<_, LookupError>(vec![term]) }));

        let results = provider.search("x").await.unwrap();
        assert_eq!(results, vec!["x".to_string()]);
    }
}
