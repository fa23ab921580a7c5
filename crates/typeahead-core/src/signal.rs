//! Signal/slot system for Typeahead.
//!
//! Signals are how the search widget reports what happened to whoever
//! embeds it: a state change after a keystroke or a settled lookup, a query
//! being dispatched, an item being selected. Connected slots (callbacks) are
//! invoked in connection order on the thread that emits.
//!
//! # Re-entrancy
//!
//! Slots are collected before any of them runs, so a slot may connect to,
//! disconnect from, or emit the same signal without deadlocking. A slot
//! connected during an emission first runs on the next emission.
//!
//! # Example
//!
//! ```
//! use typeahead_core::Signal;
//!
//! let item_selected = Signal::<String>::new();
//!
//! let conn_id = item_selected.connect(|item| {
//!     println!("Selected: {}", item);
//! });
//!
//! item_selected.emit("apple".to_string());
//! item_selected.disconnect(conn_id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies one connected slot; pass it to [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification with any number of connected slots.
///
/// `Signal<Args>` is `Send + Sync` and can be emitted from any thread,
/// including Tokio worker threads completing a lookup.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// Create a signal with no slots.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect `slot`; it runs on every later emission until disconnected.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Remove one slot. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Remove every slot.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Invoke every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "typeahead_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<String>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let log = log.clone();
            signal.connect(move |term| log.lock().push(format!("{name}:{term}")));
        }

        signal.emit("ru".to_string());
        assert_eq!(*log.lock(), vec!["first:ru", "second:ru"]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<String>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let id = signal.connect(move |item| sink.lock().push(item.clone()));

        signal.emit("rust".to_string());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit("ruby".to_string());

        assert_eq!(*seen.lock(), vec!["rust".to_string()]);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
        signal.emit(());
    }

    #[test]
    fn test_slot_can_disconnect_itself_during_emit() {
        let signal = Arc::new(Signal::<u64>::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let own_id: Arc<Mutex<Option<ConnectionId>>> = Arc::new(Mutex::new(None));

        let id = signal.connect({
            let signal = signal.clone();
            let hits = hits.clone();
            let own_id = own_id.clone();
            move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *own_id.lock() {
                    signal.disconnect(id);
                }
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(1);
        signal.emit(2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_emit_from_worker_threads() {
        let signal = Arc::new(Signal::<usize>::new());
        let total = Arc::new(AtomicUsize::new(0));

        let sum = total.clone();
        signal.connect(move |&n| {
            sum.fetch_add(n, Ordering::SeqCst);
        });

        let workers: Vec<_> = (1..=4)
            .map(|n| {
                let signal = signal.clone();
                std::thread::spawn(move || signal.emit(n))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(total.load(Ordering::SeqCst), 10);
    }
}
