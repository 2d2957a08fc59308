//! Session-scoped store for the live document metrics
//!
//! One store lives per editor session and is handed to the components
//! that need it. Writers are the document observer (grouped updates) and
//! anyone calling the per-field setters; readers subscribe for change
//! notifications.

use std::cell::Cell;
use std::fmt;

use crate::subscription::{Registry, Subscription};
use crate::text_metrics::Metrics;

/// Handler invoked with the metrics after every store update
pub type MetricsHandler = dyn FnMut(Metrics);

/// Live word, character and paragraph counts of the current document
///
/// Values start at zero. Setters accept any value without validation.
pub struct MetricsStore {
    word_count: Cell<usize>,
    character_count: Cell<usize>,
    paragraph_count: Cell<usize>,
    handlers: Registry<MetricsHandler>,
    /// A notification is being delivered
    delivering: Cell<bool>,
    /// The store changed again during the current delivery
    stale: Cell<bool>,
}

impl MetricsStore {
    /// Create a store with all counts at zero
    pub fn new() -> Self {
        Self {
            word_count: Cell::new(0),
            character_count: Cell::new(0),
            paragraph_count: Cell::new(0),
            handlers: Registry::new(),
            delivering: Cell::new(false),
            stale: Cell::new(false),
        }
    }

    /// Current counts
    pub fn metrics(&self) -> Metrics {
        Metrics {
            word_count: self.word_count.get(),
            character_count: self.character_count.get(),
            paragraph_count: self.paragraph_count.get(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count.get()
    }

    pub fn character_count(&self) -> usize {
        self.character_count.get()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_count.get()
    }

    pub fn set_word_count(&self, count: usize) {
        self.word_count.set(count);
        self.notify();
    }

    pub fn set_character_count(&self, count: usize) {
        self.character_count.set(count);
        self.notify();
    }

    pub fn set_paragraph_count(&self, count: usize) {
        self.paragraph_count.set(count);
        self.notify();
    }

    /// Replace all three counts, notifying subscribers once
    ///
    /// Subscribers never see a mix of old and new values.
    pub fn set_metrics(&self, metrics: Metrics) {
        self.word_count.set(metrics.word_count);
        self.character_count.set(metrics.character_count);
        self.paragraph_count.set(metrics.paragraph_count);
        self.notify();
    }

    /// Put every count back to zero
    pub fn reset(&self) {
        self.set_metrics(Metrics::default());
    }

    /// Register a handler run after every update
    pub fn subscribe(&self, handler: Box<MetricsHandler>) -> Subscription {
        self.handlers.register(handler)
    }

    /// Deliver the current counts to every subscriber
    ///
    /// Updates made by a subscriber during delivery are delivered once the
    /// current round ends, so the last values every subscriber sees are the
    /// store's final values.
    fn notify(&self) {
        if self.delivering.get() {
            self.stale.set(true);
            return;
        }

        self.delivering.set(true);
        loop {
            self.stale.set(false);
            let metrics = self.metrics();
            log::debug!(
                "Metrics updated: {} words, {} characters, {} paragraphs",
                metrics.word_count,
                metrics.character_count,
                metrics.paragraph_count
            );
            self.handlers.for_each(|handler| handler(metrics));

            if !self.stale.get() {
                break;
            }
        }
        self.delivering.set(false);
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetricsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsStore")
            .field("metrics", &self.metrics())
            .field("handlers", &self.handlers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(MetricsStore::new().metrics(), Metrics::default());
    }

    #[test]
    fn test_setters_are_independent() {
        let store = MetricsStore::new();
        store.set_word_count(12);
        store.set_paragraph_count(3);

        assert_eq!(store.word_count(), 12);
        assert_eq!(store.character_count(), 0);
        assert_eq!(store.paragraph_count(), 3);
    }

    #[test]
    fn test_grouped_update_notifies_once() {
        let store = MetricsStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription =
            store.subscribe(Box::new(move |metrics| sink.borrow_mut().push(metrics)));

        let metrics = Metrics {
            word_count: 5,
            character_count: 30,
            paragraph_count: 2,
        };
        store.set_metrics(metrics);

        assert_eq!(*seen.borrow(), vec![metrics]);
    }

    #[test]
    fn test_update_from_subscriber_reaches_everyone() {
        let store = Rc::new(MetricsStore::new());

        let clamped = Rc::downgrade(&store);
        let _clamp = store.subscribe(Box::new(move |metrics| {
            if metrics.word_count > 100 {
                if let Some(store) = clamped.upgrade() {
                    store.set_word_count(100);
                }
            }
        }));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _reader =
            store.subscribe(Box::new(move |metrics| sink.borrow_mut().push(metrics.word_count)));

        store.set_word_count(500);

        assert_eq!(store.word_count(), 100);
        assert_eq!(*seen.borrow(), vec![500, 100]);
    }

    #[test]
    fn test_unsubscribed_during_update_is_not_called_again() {
        let store = Rc::new(MetricsStore::new());
        let calls = Rc::new(Cell::new(0));
        let other: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let nested = Rc::downgrade(&store);
        let held = Rc::clone(&other);
        let _first = store.subscribe(Box::new(move |metrics| {
            if metrics.word_count == 1 && metrics.paragraph_count == 0 {
                held.borrow_mut().take();
                if let Some(store) = nested.upgrade() {
                    store.set_paragraph_count(1);
                }
            }
        }));
        let counter = Rc::clone(&calls);
        let counted = store.subscribe(Box::new(move |_| counter.set(counter.get() + 1)));
        *other.borrow_mut() = Some(counted);

        store.set_word_count(1);
        store.set_word_count(2);

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_reset_and_unsubscribe() {
        let store = MetricsStore::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let subscription = store.subscribe(Box::new(move |_| counter.set(counter.get() + 1)));

        store.set_character_count(99);
        store.reset();
        assert_eq!(store.metrics(), Metrics::default());
        assert_eq!(calls.get(), 2);

        subscription.unsubscribe();
        store.set_word_count(1);
        assert_eq!(calls.get(), 2);
    }
}
