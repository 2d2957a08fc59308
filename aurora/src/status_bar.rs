//! Status bar projection of the metrics store
//!
//! Renders the live counts as a single line:
//!
//! ```text
//! Words: 1,204 | Characters: 6,870 | Paragraphs: 31 | Reading time: 6 mins
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use num_format::{Locale, ToFormattedString};

use crate::metrics_store::MetricsStore;
use crate::subscription::Subscription;
use crate::text_metrics::Metrics;

/// Separator between status bar sections
const SECTION_SEPARATOR: &str = " | ";

/// One labelled value of the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSection {
    pub label: &'static str,
    pub value: String,
}

/// Sections displayed for a set of metrics, in display order
///
/// # Parameters
/// * `metrics` - Counts to display
/// * `locale` - Locale used for thousands separators
pub fn sections(metrics: &Metrics, locale: &Locale) -> Vec<StatusSection> {
    vec![
        StatusSection {
            label: "Words",
            value: metrics.word_count.to_formatted_string(locale),
        },
        StatusSection {
            label: "Characters",
            value: metrics.character_count.to_formatted_string(locale),
        },
        StatusSection {
            label: "Paragraphs",
            value: metrics.paragraph_count.to_formatted_string(locale),
        },
        StatusSection {
            label: "Reading time",
            value: metrics.reading_time(),
        },
    ]
}

/// Render metrics as a status line
pub fn render(metrics: &Metrics, locale: &Locale) -> String {
    sections(metrics, locale)
        .iter()
        .map(|section| format!("{}: {}", section.label, section.value))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Status bar bound to a metrics store
///
/// Re-renders on every store update and keeps the last rendered line.
#[derive(Debug)]
pub struct StatusBar {
    line: Rc<RefCell<String>>,
    _subscription: Subscription,
}

impl StatusBar {
    /// Bind to a store, rendering its current state immediately
    pub fn attach(store: &MetricsStore, locale: Locale) -> Self {
        let line = Rc::new(RefCell::new(render(&store.metrics(), &locale)));

        let target = Rc::clone(&line);
        let subscription = store.subscribe(Box::new(move |metrics| {
            *target.borrow_mut() = render(&metrics, &locale);
        }));

        Self {
            line,
            _subscription: subscription,
        }
    }

    /// Last rendered status line
    pub fn line(&self) -> String {
        self.line.borrow().clone()
    }
}
