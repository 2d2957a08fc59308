//! Keeps the metrics store in step with the document
//!
//! The observer subscribes to content changes. Each notification is
//! measured from scratch: the flattened text gives words and characters,
//! the number of top-level blocks gives paragraphs. The three values go
//! into the store as one update, then the optional change callback gets
//! a fresh snapshot.

use std::rc::Rc;

use crate::document::{DocumentModel, DocumentState, SerializedDocument};
use crate::metrics_store::MetricsStore;
use crate::subscription::Subscription;
use crate::text_metrics::Metrics;

/// Callback receiving a snapshot after every content change
pub type ChangeHandler = dyn FnMut(&SerializedDocument);

/// Content-change listener feeding a [`MetricsStore`]
///
/// Dropping the observer unsubscribes it from the document.
#[derive(Debug)]
pub struct WordCountObserver {
    subscription: Subscription,
}

impl WordCountObserver {
    /// Start observing a document
    ///
    /// # Parameters
    /// * `model` - Document to observe
    /// * `store` - Store receiving the metrics
    /// * `on_change` - Optional consumer of a snapshot after each change
    pub fn attach<M>(
        model: &M,
        store: Rc<MetricsStore>,
        mut on_change: Option<Box<ChangeHandler>>,
    ) -> Self
    where
        M: DocumentModel + ?Sized,
    {
        let subscription = model.subscribe_content(Box::new(move |state| {
            store.set_metrics(Self::measure(state));

            if let Some(callback) = on_change.as_mut() {
                callback(&state.serialize());
            }
        }));
        log::debug!("Word count observer attached (subscription {})", subscription.id());

        Self { subscription }
    }

    /// Metrics of a document state
    ///
    /// Paragraphs are the top-level blocks, not blank-line separated
    /// segments; a list counts as one paragraph however many items it has.
    pub fn measure(state: &DocumentState) -> Metrics {
        Metrics::from_text(&state.text_content(), state.top_level_count())
    }

    /// Stop observing
    pub fn detach(self) {
        log::debug!("Word count observer detached (subscription {})", self.subscription.id());
        self.subscription.unsubscribe();
    }
}
