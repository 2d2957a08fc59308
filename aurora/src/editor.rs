//! Editor session
//!
//! An [`Editor`] wires the pieces of a session together around one
//! document:
//!
//! ```text
//! command / key ─▶ RichTextDocument ─┬─▶ WordCountObserver ─▶ MetricsStore
//!                                    │          │                  └─▶ StatusBar
//!                                    │          └─▶ on_change(snapshot)
//!                                    └─▶ Toolbar (selection)
//! ```
//!
//! Each session owns its own [`MetricsStore`]; nothing is shared between
//! sessions unless a store is passed in explicitly.

use std::rc::Rc;

use crate::document::{
    Block, Command, DocumentModel, DocumentState, ErrorHandler, KeyEvent, RichTextDocument,
    SerializedDocument,
};
use crate::editor_config::EditorConfig;
use crate::error::EditorError;
use crate::metrics_store::MetricsStore;
use crate::observer::{ChangeHandler, WordCountObserver};
use crate::status_bar::StatusBar;
use crate::text_metrics::Metrics;
use crate::toolbar::{Toolbar, ToolbarAction, ToolbarState};

/// Where the initial document comes from
enum InitialContent {
    Snapshot(SerializedDocument),
    Blocks(Vec<Block>),
}

/// Builder for an [`Editor`]
pub struct EditorBuilder {
    config: EditorConfig,
    initial_content: Option<InitialContent>,
    store: Option<Rc<MetricsStore>>,
    on_change: Option<Box<ChangeHandler>>,
    on_error: Option<ErrorHandler>,
}

impl EditorBuilder {
    /// Start the document from a snapshot
    ///
    /// Takes precedence over the configuration's `initial_content`.
    pub fn initial_content(mut self, snapshot: SerializedDocument) -> Self {
        self.initial_content = Some(InitialContent::Snapshot(snapshot));
        self
    }

    /// Start the document from blocks, e.g. an imported manuscript
    pub fn blocks(mut self, blocks: Vec<Block>) -> Self {
        self.initial_content = Some(InitialContent::Blocks(blocks));
        self
    }

    /// Use an existing metrics store instead of a fresh one
    pub fn store(mut self, store: Rc<MetricsStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Receive a snapshot after every content change
    pub fn on_change(mut self, handler: Box<ChangeHandler>) -> Self {
        self.on_change = Some(handler);
        self
    }

    /// Receive document errors instead of logging them
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    /// Create the session
    ///
    /// The store is reset, every component is attached, and the initial
    /// document is delivered once so metrics and the change callback
    /// reflect it straight away.
    ///
    /// # Returns
    /// * `Ok(Editor)` - The running session
    /// * `Err(EditorError)` - The locale or initial content is invalid
    pub fn build(self) -> Result<Editor, EditorError> {
        let locale = self.config.number_locale()?;

        let mut document = match self.initial_content {
            Some(InitialContent::Snapshot(snapshot)) => RichTextDocument::from_snapshot(&snapshot)?,
            Some(InitialContent::Blocks(blocks)) => RichTextDocument::from_blocks(blocks),
            None => match self.config.initial_snapshot()? {
                Some(snapshot) => RichTextDocument::from_snapshot(&snapshot)?,
                None => RichTextDocument::new(),
            },
        };
        if let Some(handler) = self.on_error {
            document.set_error_handler(handler);
        }

        let store = self.store.unwrap_or_default();
        store.reset();

        let observer = WordCountObserver::attach(&document, Rc::clone(&store), self.on_change);
        let toolbar = Toolbar::attach(&document);
        let status_bar = StatusBar::attach(&store, locale);

        document.refresh();
        log::info!(
            "Editor session '{}' started with {} blocks",
            self.config.namespace,
            document.state().top_level_count()
        );

        Ok(Editor {
            config: self.config,
            document,
            store,
            observer: Some(observer),
            toolbar,
            status_bar,
        })
    }
}

/// A running editor session
pub struct Editor {
    config: EditorConfig,
    document: RichTextDocument,
    store: Rc<MetricsStore>,
    observer: Option<WordCountObserver>,
    toolbar: Toolbar,
    status_bar: StatusBar,
}

impl Editor {
    /// Start building a session with a configuration
    pub fn builder(config: EditorConfig) -> EditorBuilder {
        EditorBuilder {
            config,
            initial_content: None,
            store: None,
            on_change: None,
            on_error: None,
        }
    }

    /// A session on an empty document with the default configuration
    pub fn new() -> Result<Self, EditorError> {
        Self::builder(EditorConfig::default()).build()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &RichTextDocument {
        &self.document
    }

    /// Current content and selection
    pub fn state(&self) -> &DocumentState {
        self.document.state()
    }

    /// Metrics store of this session
    pub fn store(&self) -> &Rc<MetricsStore> {
        &self.store
    }

    /// Live metrics
    pub fn metrics(&self) -> Metrics {
        self.store.metrics()
    }

    /// What the toolbar currently shows
    pub fn toolbar_state(&self) -> ToolbarState {
        self.toolbar.state()
    }

    /// Placeholder text, shown only while the document is blank
    pub fn placeholder(&self) -> Option<&str> {
        self.document
            .state()
            .is_blank()
            .then_some(self.config.placeholder.as_str())
    }

    /// Last rendered status bar line
    pub fn status_line(&self) -> String {
        self.status_bar.line()
    }

    /// Serialize the current document
    pub fn snapshot(&self) -> SerializedDocument {
        self.document.snapshot()
    }

    /// Send a command to the document
    pub fn dispatch(&mut self, command: Command) {
        self.document.dispatch(command);
    }

    /// Press a toolbar button or pick a dropdown entry
    ///
    /// # Returns
    /// * `true` if the action issued a command
    pub fn apply(&mut self, action: ToolbarAction) -> bool {
        self.toolbar.apply(&mut self.document, action)
    }

    /// Offer a key press to the session's key handlers
    pub fn handle_key(&mut self, event: &mut KeyEvent) -> bool {
        self.document.handle_key(event)
    }

    /// Stop feeding the metrics store
    ///
    /// The document stays editable; the store keeps its last values.
    pub fn detach_observer(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.detach();
        }
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        log::info!("Editor session '{}' closed", self.config.namespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Point, Selection};
    use crate::toolbar::BlockType;
    use std::cell::RefCell;

    fn type_text(editor: &mut Editor, text: &str) {
        editor.dispatch(Command::InsertText(text.to_string()));
    }

    #[test]
    fn test_new_session_is_empty() {
        let editor = Editor::new().unwrap();
        assert_eq!(
            editor.metrics(),
            Metrics {
                word_count: 0,
                character_count: 0,
                paragraph_count: 1,
            }
        );
        assert_eq!(editor.placeholder(), Some("Start writing your story..."));
        assert_eq!(editor.toolbar_state().block_type, BlockType::Paragraph);
    }

    #[test]
    fn test_typing_updates_everything() {
        let snapshots = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&snapshots);
        let mut editor = Editor::builder(EditorConfig::default())
            .on_change(Box::new(move |_| *counter.borrow_mut() += 1))
            .build()
            .unwrap();
        assert_eq!(*snapshots.borrow(), 1);

        editor.dispatch(Command::Select(Selection::caret(Point::block(0, 0))));
        type_text(&mut editor, "Hello world");
        editor.dispatch(Command::InsertParagraph);
        type_text(&mut editor, "Second block here");

        assert_eq!(
            editor.metrics(),
            Metrics {
                word_count: 5,
                character_count: 30,
                paragraph_count: 2,
            }
        );
        assert_eq!(
            editor.status_line(),
            "Words: 5 | Characters: 30 | Paragraphs: 2 | Reading time: 1 min"
        );
        assert_eq!(editor.placeholder(), None);
        assert_eq!(*snapshots.borrow(), 4);
    }

    #[test]
    fn test_invalid_initial_content() {
        let json = r#"{"root": {"type": "paragraph", "children": []}}"#;
        let snapshot = SerializedDocument::from_json(json).unwrap();
        let result = Editor::builder(EditorConfig::default())
            .initial_content(snapshot)
            .build();
        assert!(matches!(result, Err(EditorError::Document(_))));
    }

    #[test]
    fn test_shared_store() {
        let store = Rc::new(MetricsStore::new());
        let mut editor = Editor::builder(EditorConfig::default())
            .blocks(vec![Block::paragraph("one two three")])
            .store(Rc::clone(&store))
            .build()
            .unwrap();
        assert_eq!(store.word_count(), 3);

        editor.detach_observer();
        editor.dispatch(Command::Select(Selection::caret(Point::block(0, 13))));
        type_text(&mut editor, " four");
        assert_eq!(store.word_count(), 3);
        assert_eq!(editor.state().text_content(), "one two three four");
    }
}
