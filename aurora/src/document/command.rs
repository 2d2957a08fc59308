//! Commands and keyboard events accepted by a document model

use super::node::{BlockKind, Format, ListType};
use super::selection::Selection;

/// A named command sent to a document model
///
/// Commands are fire-and-forget: their effect is observed through the
/// next content or selection notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle an inline format on the selection
    ToggleFormat(Format),

    /// Convert the selected blocks to paragraphs, headings or quotes
    SetBlockType(BlockKind),

    /// Wrap the selected blocks in a list, or retype the enclosing list
    InsertList(ListType),

    /// Unwrap the selected lists into paragraphs
    RemoveList,

    /// Type text at the selection, replacing any selected range
    InsertText(String),

    /// Split the block at the selection (Enter)
    InsertParagraph,

    /// Insert a line break inside the current block (Shift+Enter)
    InsertLineBreak,

    /// Delete the selected range or the character before the caret
    DeleteBackward,

    /// Move the selection
    Select(Selection),
}

/// Physical key of a keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key
    Char(char),
    Enter,
    Backspace,
}

/// A key press delivered to the document's key handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key pressed
    pub code: KeyCode,
    /// Control modifier
    pub ctrl: bool,
    /// Command (meta) modifier
    pub meta: bool,
    /// Shift modifier
    pub shift: bool,
    /// Alt/Option modifier
    pub alt: bool,
    default_prevented: bool,
}

impl KeyEvent {
    /// A key press without modifiers
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
            default_prevented: false,
        }
    }

    /// Ctrl + key
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            ctrl: true,
            ..Self::new(code)
        }
    }

    /// Cmd + key
    pub fn meta(code: KeyCode) -> Self {
        Self {
            meta: true,
            ..Self::new(code)
        }
    }

    /// Check whether the platform's command modifier is held
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Stop the host's default handling of this key
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Check if a handler prevented the default handling
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
