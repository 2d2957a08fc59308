//! Editable document model
//!
//! [`DocumentModel`] is the boundary the editor components are written
//! against: subscribe to content and selection changes, send commands,
//! handle keys. [`RichTextDocument`] is the in-memory implementation used
//! by the editor session, the CLI and the tests.
//!
//! ## Notification order
//!
//! ```text
//! dispatch(command)
//!   ├─ content changed   → content handlers, then selection handlers
//!   ├─ selection moved   → selection handlers
//!   └─ failed            → error hook (never returned to the caller)
//! ```

mod command;
mod error;
pub(crate) mod inline;
mod model;
mod node;
mod selection;
mod snapshot;
mod state;

pub use command::{Command, KeyCode, KeyEvent};
pub use error::DocumentError;
pub use model::{ErrorHandler, RichTextDocument};
pub use node::{
    Block, BlockKind, Format, FormatFlags, HeadingTag, Inline, ListItem, ListType, TextRun,
};
pub use selection::{NearestList, NodeKey, Point, Selection};
pub use snapshot::{SerializedDocument, SerializedNode};
pub use state::DocumentState;

use crate::subscription::{Priority, Subscription};

/// Handler invoked with the current document state
pub type StateHandler = dyn FnMut(&DocumentState);

/// Key handler; returning a command marks the key as handled
pub type KeyHandler = dyn FnMut(&mut KeyEvent) -> Option<Command>;

/// An editable document that can be observed and commanded
pub trait DocumentModel {
    /// Current content and selection
    fn state(&self) -> &DocumentState;

    /// Register a handler run after every content change
    fn subscribe_content(&self, handler: Box<StateHandler>) -> Subscription;

    /// Register a handler run after every selection change
    ///
    /// Content changes move the caret, so they notify these handlers too.
    fn subscribe_selection(&self, handler: Box<StateHandler>) -> Subscription;

    /// Register a key handler; higher priorities see keys first
    fn register_key_handler(&self, priority: Priority, handler: Box<KeyHandler>) -> Subscription;

    /// Send a command to the document
    fn dispatch(&mut self, command: Command);

    /// Offer a key press to the key handlers
    ///
    /// # Returns
    /// * `true` if a handler took the key; the host should then skip its
    ///   default behavior
    fn handle_key(&mut self, event: &mut KeyEvent) -> bool;

    /// Re-deliver the current state to content and selection handlers
    fn refresh(&mut self);

    /// Serialize the current state
    fn snapshot(&self) -> SerializedDocument {
        self.state().serialize()
    }
}
