//! In-memory search provider.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use typeahead_core::{SearchProvider, SearchResult};

/// Case sensitivity for matching operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// Case-sensitive matching (e.g., "Ru" won't match "rust").
    CaseSensitive,
    /// Case-insensitive matching (e.g., "Ru" will match "rust").
    #[default]
    CaseInsensitive,
}

/// How a term is compared against each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The item starts with the term.
    #[default]
    Prefix,
    /// The term appears anywhere in the item.
    Contains,
}

/// A [`SearchProvider`] over a fixed list of strings.
///
/// Matching items are returned in list order. An optional latency delays
/// every answer on the runtime's timer, which makes out-of-order completion
/// easy to reproduce.
///
/// # Example
///
/// ```ignore
/// use typeahead::{MatchMode, StaticSearchProvider};
///
/// let provider = StaticSearchProvider::new(["rust", "ruby", "go"])
///     .with_match_mode(MatchMode::Contains);
/// assert_eq!(provider.matches("u"), vec!["rust", "ruby"]);
/// ```
#[derive(Debug, Clone)]
pub struct StaticSearchProvider {
    items: Arc<[String]>,
    match_mode: MatchMode,
    case_sensitivity: CaseSensitivity,
    latency: Option<Duration>,
}

impl StaticSearchProvider {
    /// Create a provider over `items` with prefix, case-insensitive matching.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::<String>::into).collect(),
            match_mode: MatchMode::default(),
            case_sensitivity: CaseSensitivity::default(),
            latency: None,
        }
    }

    /// Set the match mode using builder pattern.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Set case sensitivity using builder pattern.
    pub fn with_case_sensitivity(mut self, sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = sensitivity;
        self
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The full item list.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Items matching `term`, computed synchronously. An empty term matches
    /// everything.
    pub fn matches(&self, term: &str) -> Vec<String> {
        if term.is_empty() {
            return self.items.to_vec();
        }

        let mode = self.match_mode;
        let hit = |item: &str, needle: &str| match mode {
            MatchMode::Prefix => item.starts_with(needle),
            MatchMode::Contains => item.contains(needle),
        };

        match self.case_sensitivity {
            CaseSensitivity::CaseSensitive => self
                .items
                .iter()
                .filter(|item| hit(item.as_str(), term))
                .cloned()
                .collect(),
            CaseSensitivity::CaseInsensitive => {
                let needle = term.to_lowercase();
                self.items
                    .iter()
                    .filter(|item| hit(&item.to_lowercase(), &needle))
                    .cloned()
                    .collect()
            }
        }
    }
}

impl SearchProvider for StaticSearchProvider {
    fn search(&self, term: &str) -> BoxFuture<'static, SearchResult> {
        let found = self.matches(term);
        let latency = self.latency;
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            Ok(found)
        }
        .boxed()
    }
}
