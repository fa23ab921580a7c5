//! Tests for the debounced query controller.
//!
//! Lookups go to a scripted provider whose calls stay pending until the test
//! resolves them, so completion order is fully under test control. Time is
//! virtual (`start_paused`).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use typeahead::{
    LookupError, QueryController, QueryPhase, SearchInput, SearchInputConfig, SearchProvider,
    SearchResult, SearchState, SearchView,
};

const INTERVAL: Duration = Duration::from_millis(1000);

// ============================================================================
// Scripted provider
// ============================================================================

struct Call {
    term: String,
    reply: Option<oneshot::Sender<SearchResult>>,
}

#[derive(Clone, Default)]
struct ScriptedProvider {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedProvider {
    fn terms(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.term.clone()).collect()
    }

    fn resolve(&self, index: usize, outcome: SearchResult) {
        let reply = self.calls.lock()[index]
            .reply
            .take()
            .expect("call already resolved");
        let _ = reply.send(outcome);
    }

    fn succeed(&self, index: usize, items: &[&str]) {
        self.resolve(index, Ok(items.iter().map(|s| s.to_string()).collect()));
    }

    fn fail(&self, index: usize, message: &str) {
        self.resolve(index, Err(LookupError::new(message)));
    }
}

impl SearchProvider for ScriptedProvider {
    fn search(&self, term: &str) -> BoxFuture<'static, SearchResult> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(Call {
            term: term.to_string(),
            reply: Some(tx),
        });
        async move {
            rx.await
                .unwrap_or_else(|_| Err(LookupError::new("call abandoned")))
        }
        .boxed()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn controller() -> (QueryController, ScriptedProvider) {
    let provider = ScriptedProvider::default();
    let controller = QueryController::new(provider.clone(), INTERVAL).unwrap();
    (controller, provider)
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Let spawned completions run.
async fn settle() {
    advance(1).await;
}

/// Type `text` and wait until its debounced dispatch has happened.
async fn type_and_fire(controller: &QueryController, text: &str) {
    controller.on_text_changed(text);
    tokio::time::sleep(INTERVAL).await;
    settle().await;
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn cleared(text: &str) -> SearchState {
    SearchState {
        text: text.to_string(),
        ..SearchState::default()
    }
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_burst_dispatches_only_last_term() {
    let (controller, provider) = controller();

    controller.on_text_changed("ab");
    advance(200).await;
    controller.on_text_changed("abc");

    advance(800).await;
    assert!(provider.terms().is_empty(), "countdown must restart on each keystroke");

    advance(200).await;
    settle().await;
    assert_eq!(provider.terms(), vec!["abc"]);
}

#[tokio::test(start_paused = true)]
async fn test_success_populates_results() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "abc").await;
    assert!(controller.state().loading);
    assert_eq!(controller.phase(), QueryPhase::Loading);
    assert_eq!(controller.state().view(), SearchView::Loading);

    provider.succeed(0, &["abcd", "abcde"]);
    settle().await;

    let state = controller.state();
    assert_eq!(state.results, strings(&["abcd", "abcde"]));
    assert_eq!(state.error, None);
    assert!(!state.loading);
    assert_eq!(controller.phase(), QueryPhase::Success);
}

#[tokio::test(start_paused = true)]
async fn test_failure_sets_error_and_clears_results() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "ab").await;
    provider.succeed(0, &["abc"]);
    settle().await;
    assert_eq!(controller.state().results, strings(&["abc"]));

    type_and_fire(&controller, "abc").await;
    provider.fail(1, "network error");
    settle().await;

    let state = controller.state();
    assert_eq!(state.error.as_deref(), Some("network error"));
    assert!(state.results.is_empty());
    assert!(!state.loading);
    assert_eq!(state.view(), SearchView::Error("network error".to_string()));
    assert_eq!(controller.phase(), QueryPhase::Error);
}

#[tokio::test(start_paused = true)]
async fn test_clear_discards_in_flight_lookup() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "abc").await;
    assert!(controller.state().loading);

    controller.on_text_changed("");
    assert_eq!(controller.state(), cleared(""));

    provider.succeed(0, &["abcd"]);
    settle().await;
    assert_eq!(controller.state(), cleared(""));

    advance(1000).await;
    settle().await;
    assert_eq!(provider.terms(), vec!["abc"]);
    assert_eq!(controller.state().view(), SearchView::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_selecting_item_reports_exact_string() {
    let provider = ScriptedProvider::default();
    let picked = Arc::new(Mutex::new(Vec::new()));
    let sink = picked.clone();
    let input = SearchInput::with_on_select(
        SearchInputConfig::new().with_debounce(INTERVAL),
        provider.clone(),
        move |item| sink.lock().push(item.clone()),
    )
    .unwrap();

    input.set_text("abc").unwrap();
    advance(1001).await;
    provider.succeed(0, &["abcd", "abc de"]);
    settle().await;

    let before = input.state();
    assert_eq!(input.select_item(1).as_deref(), Some("abc de"));
    assert_eq!(*picked.lock(), strings(&["abc de"]));
    assert_eq!(input.state(), before);
    assert_eq!(provider.terms(), vec!["abc"]);
}

// ============================================================================
// Staleness
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_late_response_to_older_query_is_ignored() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "a").await;
    type_and_fire(&controller, "ab").await;
    assert_eq!(provider.terms(), vec!["a", "ab"]);

    provider.succeed(1, &["abc"]);
    settle().await;
    provider.succeed(0, &["apple"]);
    settle().await;

    assert_eq!(controller.state().results, strings(&["abc"]));
    assert!(!controller.state().loading);
}

#[tokio::test(start_paused = true)]
async fn test_older_failure_is_ignored() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "a").await;
    type_and_fire(&controller, "ab").await;

    provider.succeed(1, &["abc"]);
    provider.fail(0, "timeout");
    settle().await;

    let state = controller.state();
    assert_eq!(state.error, None);
    assert_eq!(state.results, strings(&["abc"]));
}

#[tokio::test(start_paused = true)]
async fn test_older_completion_keeps_loading() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "a").await;
    type_and_fire(&controller, "ab").await;

    provider.succeed(0, &["apple"]);
    settle().await;
    let state = controller.state();
    assert!(state.loading, "only the latest lookup may end loading");
    assert!(state.results.is_empty());

    provider.succeed(1, &["abc"]);
    settle().await;
    assert!(!controller.state().loading);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_completions_three_deep() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "r").await;
    type_and_fire(&controller, "ru").await;
    type_and_fire(&controller, "rus").await;

    provider.succeed(1, &["ruby"]);
    provider.succeed(2, &["rust"]);
    provider.succeed(0, &["r"]);
    settle().await;

    assert_eq!(controller.state().results, strings(&["rust"]));
    assert_eq!(controller.latest_query().unwrap().term, "rus");
}

#[tokio::test(start_paused = true)]
async fn test_retyped_identical_query_ignores_earlier_response() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "abc").await;
    let first = controller.latest_query().unwrap().token;
    type_and_fire(&controller, "abc").await;
    let second = controller.latest_query().unwrap().token;
    assert!(second > first);
    assert_eq!(provider.terms(), vec!["abc", "abc"]);

    provider.succeed(0, &["old"]);
    settle().await;
    assert!(controller.state().loading);
    assert!(controller.state().results.is_empty());

    provider.succeed(1, &["new"]);
    settle().await;
    assert_eq!(controller.state().results, strings(&["new"]));
}

// ============================================================================
// Blank input and clearing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_whitespace_input_never_searches() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "ab").await;
    provider.succeed(0, &["abc"]);
    settle().await;

    controller.on_text_changed("   ");
    assert_eq!(controller.state(), cleared("   "));
    assert_eq!(controller.state().view(), SearchView::NoResults);

    advance(1001).await;
    assert_eq!(provider.terms(), vec!["ab"]);
    assert_eq!(controller.latest_query().unwrap().term, "   ");
    assert_eq!(controller.state(), cleared("   "));
}

#[tokio::test(start_paused = true)]
async fn test_clear_replaces_pending_countdown() {
    let (controller, provider) = controller();

    controller.on_text_changed("abc");
    advance(500).await;
    controller.clear();
    advance(2000).await;

    assert!(provider.terms().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clear_twice_is_a_no_op() {
    let (controller, provider) = controller();
    let emitted = Arc::new(AtomicUsize::new(0));
    let counter = emitted.clone();
    controller.state_changed().connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    type_and_fire(&controller, "ab").await;
    provider.fail(0, "boom");
    settle().await;

    controller.clear();
    let once = controller.state();
    let emitted_once = emitted.load(Ordering::SeqCst);

    controller.clear();
    assert_eq!(controller.state(), once);
    assert_eq!(emitted.load(Ordering::SeqCst), emitted_once);

    advance(1001).await;
    assert_eq!(controller.state(), once);
}

#[tokio::test(start_paused = true)]
async fn test_next_dispatch_clears_error() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "ab").await;
    provider.fail(0, "boom");
    settle().await;
    assert!(controller.state().error.is_some());

    controller.on_text_changed("abc");
    assert!(controller.state().error.is_some(), "error stays until the next dispatch");

    advance(1001).await;
    let state = controller.state();
    assert_eq!(state.error, None);
    assert!(state.loading);
}

// ============================================================================
// Signals and lifetime
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_query_dispatched_reports_non_blank_terms() {
    let (controller, _provider) = controller();
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let sink = dispatched.clone();
    controller.query_dispatched().connect(move |term| sink.lock().push(term.clone()));

    type_and_fire(&controller, "go").await;
    type_and_fire(&controller, " ").await;
    type_and_fire(&controller, "gleam").await;

    assert_eq!(*dispatched.lock(), strings(&["go", "gleam"]));
}

#[tokio::test(start_paused = true)]
async fn test_state_changed_reports_each_transition() {
    let (controller, provider) = controller();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    controller.state_changed().connect(move |state: &SearchState| sink.lock().push(state.clone()));

    type_and_fire(&controller, "ab").await;
    provider.succeed(0, &["abc"]);
    settle().await;

    let seen = seen.lock();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].text, "ab");
    assert!(!seen[0].loading);
    assert!(seen[1].loading);
    assert_eq!(seen[2].results, strings(&["abc"]));
}

#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_pending_and_in_flight_work() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "ab").await;
    controller.on_text_changed("abc");
    controller.dispose();

    provider.succeed(0, &["abc"]);
    advance(2000).await;

    assert_eq!(provider.terms(), vec!["ab"]);
    let state = controller.state();
    assert!(state.results.is_empty());
    assert!(state.loading, "state is frozen at dispose");
}

#[tokio::test(start_paused = true)]
async fn test_drop_abandons_lookups() {
    let (controller, provider) = controller();

    type_and_fire(&controller, "ab").await;
    drop(controller);

    provider.succeed(0, &["abc"]);
    settle().await;
    assert_eq!(provider.terms(), vec!["ab"]);
}

// ============================================================================
// Multi-threaded runtime
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clear_wins_over_countdown_on_worker_threads() {
    let provider = typeahead::provider_fn(|term: String| async move {
        Ok::<_, LookupError>(vec![format!("{term}-hit")])
    });
    let controller = QueryController::new(provider, Duration::from_millis(10)).unwrap();

    // Rendering the cleared input is slow, which leaves the previous
    // countdown plenty of time to elapse on a worker.
    controller.state_changed().connect(|state| {
        if state.text.is_empty() {
            std::thread::sleep(Duration::from_millis(30));
        }
    });

    controller.on_text_changed("abc");
    tokio::time::sleep(Duration::from_millis(5)).await;
    controller.on_text_changed("");
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(controller.state(), cleared(""));
    assert_eq!(controller.state().view(), SearchView::Empty);
}
