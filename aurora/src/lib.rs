//! aurora - rich-text editing core for novel writing
//!
//! A document model with a selection and named commands, live text
//! metrics (words, characters, paragraphs, reading time) kept in a
//! session store, a status bar projection of that store, and a toolbar
//! that mirrors the selection and issues formatting commands.
//!
//! ```text
//! document ──content──▶ observer ──▶ metrics store ──▶ status bar
//!          ──selection─▶ toolbar ──command──▶ document
//! ```

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod document;
pub mod editor;
pub mod editor_config;
pub mod error;
pub mod markdown_import;
pub mod metrics_store;
pub mod observer;
pub mod status_bar;
pub mod subscription;
pub mod text_metrics;
pub mod toolbar;

pub use editor::{Editor, EditorBuilder};
pub use editor_config::EditorConfig;
pub use error::EditorError;
