//! The search input widget.
//!
//! [`SearchInput`] bundles a [`QueryController`] with its configuration and
//! the selection callback. It does not draw anything itself: callers render
//! [`SearchInput::view`] and forward keystrokes and clicks back to it.
//!
//! # Example
//!
//! ```ignore
//! use typeahead::{SearchInput, SearchInputConfig, StaticSearchProvider};
//!
//! let input = SearchInput::with_on_select(
//!     SearchInputConfig::new().with_placeholder("Search languages"),
//!     StaticSearchProvider::new(["rust", "ruby", "go"]),
//!     |item| println!("picked {item}"),
//! )?;
//!
//! input.controller().state_changed().connect(|state| {
//!     println!("{}", state.view());
//! });
//!
//! input.set_text("ru")?;
//! ```

use std::fmt;

use tokio::runtime::Handle;
use typeahead_core::logging::targets;
use typeahead_core::{Result, SearchProvider, Signal, TypeaheadError};

use crate::config::SearchInputConfig;
use crate::controller::QueryController;
use crate::view::{SearchState, SearchView};

/// A debounced search input with a selectable result list.
pub struct SearchInput {
    config: SearchInputConfig,
    controller: QueryController,
    item_selected: Signal<String>,
}

impl SearchInput {
    /// Create a search input on the current runtime (or the global one when
    /// called outside a runtime).
    pub fn new<P: SearchProvider>(config: SearchInputConfig, provider: P) -> Result<Self> {
        let controller = QueryController::new(provider, config.debounce)?;
        Ok(Self::from_parts(config, controller))
    }

    /// Create a search input whose timers and lookups run on `handle`.
    pub fn with_handle<P: SearchProvider>(
        handle: Handle,
        config: SearchInputConfig,
        provider: P,
    ) -> Self {
        let controller = QueryController::with_handle(handle, provider, config.debounce);
        Self::from_parts(config, controller)
    }

    /// Create a search input and connect `on_select` to [`item_selected`](Self::item_selected).
    pub fn with_on_select<P, F>(config: SearchInputConfig, provider: P, on_select: F) -> Result<Self>
    where
        P: SearchProvider,
        F: Fn(&String) + Send + Sync + 'static,
    {
        let input = Self::new(config, provider)?;
        input.item_selected.connect(on_select);
        Ok(input)
    }

    fn from_parts(config: SearchInputConfig, controller: QueryController) -> Self {
        tracing::debug!(
            target: targets::WIDGET,
            debounce = ?config.debounce,
            placeholder = config.placeholder.as_deref(),
            "search input created"
        );
        Self {
            config,
            controller,
            item_selected: Signal::new(),
        }
    }

    /// The configuration this input was built with.
    pub fn config(&self) -> &SearchInputConfig {
        &self.config
    }

    /// The placeholder text, if configured.
    pub fn placeholder(&self) -> Option<&str> {
        self.config.placeholder.as_deref()
    }

    /// Check whether the placeholder should be shown (the text is empty).
    pub fn shows_placeholder(&self) -> bool {
        self.config.placeholder.is_some() && self.controller.text().is_empty()
    }

    /// The controller driving this input.
    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    /// The current text.
    pub fn text(&self) -> String {
        self.controller.text()
    }

    /// Replace the text, as if the user had typed it.
    pub fn set_text(&self, text: impl Into<String>) -> Result<()> {
        if self.controller.is_disposed() {
            return Err(TypeaheadError::Disposed);
        }
        self.controller.on_text_changed(text);
        Ok(())
    }

    /// Clear the text.
    pub fn clear(&self) -> Result<()> {
        self.set_text(String::new())
    }

    /// Run the lookup for the current text without waiting for the debounce
    /// interval. Returns `true` if a lookup was pending.
    pub fn submit(&self) -> bool {
        self.controller.flush()
    }

    /// A snapshot of the visible state.
    pub fn state(&self) -> SearchState {
        self.controller.state()
    }

    /// The render model for the area below the input.
    pub fn view(&self) -> SearchView {
        self.controller.state().view()
    }

    /// Signal emitted with the item the user picked.
    pub fn item_selected(&self) -> &Signal<String> {
        &self.item_selected
    }

    /// Select the result at `index` of the shown list.
    ///
    /// Returns the item, or `None` if no result list is shown or `index` is
    /// out of range. Selecting does not change the input's state.
    pub fn select_item(&self, index: usize) -> Option<String> {
        let item = self.view().items().get(index).cloned()?;
        self.select(item.clone());
        Some(item)
    }

    /// Report `item` as selected.
    pub fn select(&self, item: impl Into<String>) {
        let item = item.into();
        tracing::debug!(target: targets::WIDGET, item = %item, "item selected");
        self.item_selected.emit(item);
    }

    /// Stop the input: pending and in-flight lookups are abandoned and all
    /// selection slots are disconnected.
    pub fn dispose(&self) {
        self.controller.dispose();
        self.item_selected.disconnect_all();
    }

    /// Check whether the input has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.controller.is_disposed()
    }
}

impl fmt::Debug for SearchInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchInput")
            .field("config", &self.config)
            .field("controller", &self.controller)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::provider::StaticSearchProvider;

    fn config() -> SearchInputConfig {
        SearchInputConfig::new()
            .with_placeholder("Search")
            .with_debounce(Duration::from_millis(300))
    }

    fn languages() -> StaticSearchProvider {
        StaticSearchProvider::new(["rust", "ruby", "go"])
    }

    async fn wait_for_lookup() {
        tokio::time::sleep(Duration::from_millis(301)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_placeholder() {
        let input = SearchInput::new(config(), languages()).unwrap();
        assert_eq!(input.placeholder(), Some("Search"));
        assert!(input.shows_placeholder());

        input.set_text("r").unwrap();
        assert!(!input.shows_placeholder());
        assert_eq!(input.controller().interval(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_item_emits_without_mutation() {
        let picked = Arc::new(Mutex::new(Vec::new()));
        let sink = picked.clone();
        let input = SearchInput::with_on_select(config(), languages(), move |item| {
            sink.lock().push(item.clone());
        })
        .unwrap();

        input.set_text("ru").unwrap();
        assert_eq!(input.select_item(0), None);

        wait_for_lookup().await;
        let before = input.state();
        assert_eq!(input.view().items(), ["rust", "ruby"]);

        assert_eq!(input.select_item(1), Some("ruby".to_string()));
        assert_eq!(input.select_item(5), None);
        assert_eq!(*picked.lock(), vec!["ruby".to_string()]);
        assert_eq!(input.state(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_skips_interval() {
        let input = SearchInput::new(config(), languages()).unwrap();
        input.set_text("g").unwrap();
        assert!(input.submit());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(input.view(), SearchView::Results(vec!["go".to_string()]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_text_after_dispose() {
        let input = SearchInput::new(config(), languages()).unwrap();
        input.item_selected().connect(|_| {});
        input.dispose();

        assert!(input.is_disposed());
        assert_eq!(input.item_selected().connection_count(), 0);
        assert!(matches!(input.set_text("x"), Err(TypeaheadError::Disposed)));
    }
}
