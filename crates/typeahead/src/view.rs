//! Visible search state and the render model derived from it.

use std::fmt;

/// Everything a search input shows, as one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// The raw input text, exactly as typed.
    pub text: String,
    /// A lookup for the latest query is outstanding.
    pub loading: bool,
    /// Message of the latest failed lookup.
    pub error: Option<String>,
    /// Suggestions from the latest successful lookup, in provider order.
    pub results: Vec<String>,
}

/// Coarse lifecycle phase of a search input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Nothing to show.
    Idle,
    /// Waiting for the latest lookup.
    Loading,
    /// The latest lookup returned suggestions.
    Success,
    /// The latest lookup failed.
    Error,
}

impl SearchState {
    /// The phase this state is in.
    pub fn phase(&self) -> QueryPhase {
        if self.loading {
            QueryPhase::Loading
        } else if self.error.is_some() {
            QueryPhase::Error
        } else if !self.results.is_empty() {
            QueryPhase::Success
        } else {
            QueryPhase::Idle
        }
    }

    /// Derive what should be drawn below the input.
    ///
    /// Loading hides everything else. Otherwise an error wins over results,
    /// and a non-empty input with no results reads "No results".
    pub fn view(&self) -> SearchView {
        if self.loading {
            SearchView::Loading
        } else if let Some(message) = &self.error {
            SearchView::Error(message.clone())
        } else if !self.results.is_empty() {
            SearchView::Results(self.results.clone())
        } else if !self.text.is_empty() {
            SearchView::NoResults
        } else {
            SearchView::Empty
        }
    }
}

/// The render model for the area below the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    /// A loading indicator, nothing else.
    Loading,
    /// An error message.
    Error(String),
    /// A list of selectable suggestions.
    Results(Vec<String>),
    /// The "No results" notice.
    NoResults,
    /// Nothing at all.
    Empty,
}

impl SearchView {
    /// The selectable items, if a result list is shown.
    pub fn items(&self) -> &[String] {
        match self {
            Self::Results(items) => items,
            _ => &[],
        }
    }
}

impl fmt::Display for SearchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading..."),
            Self::Error(message) => write!(f, "Error: {message}"),
            Self::Results(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{index}: {item}")?;
                }
                Ok(())
            }
            Self::NoResults => write!(f, "No results"),
            Self::Empty => Ok(()),
        }
    }
}
