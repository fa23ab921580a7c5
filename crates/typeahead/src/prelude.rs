//! Prelude module for Typeahead.
//!
//! ```ignore
//! use typeahead::prelude::*;
//! ```

// ============================================================================
// Widget
// ============================================================================

pub use crate::config::SearchInputConfig;
pub use crate::view::{QueryPhase, SearchState, SearchView};
pub use crate::widget::SearchInput;

// ============================================================================
// Controller
// ============================================================================

pub use crate::controller::{QueryController, QueryToken};

// ============================================================================
// Providers
// ============================================================================

pub use crate::provider::{CaseSensitivity, MatchMode, StaticSearchProvider};
pub use typeahead_core::search::{provider_fn, LookupError, SearchProvider};

#[cfg(feature = "networking")]
pub use typeahead_net::{HttpSearchConfig, HttpSearchProvider};

// ============================================================================
// Signals
// ============================================================================

pub use typeahead_core::signal::{ConnectionId, Signal};
