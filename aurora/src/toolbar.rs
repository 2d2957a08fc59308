//! Formatting toolbar
//!
//! The toolbar mirrors the selection: which inline formats are active and
//! what kind of block the caret sits in. Its actions translate into
//! document commands, some of them depending on that mirrored state
//! (pressing "quote" inside a quote turns it back into a paragraph).
//!
//! ## Block type classification
//!
//! ```text
//! anchor on the root         → Paragraph
//! anchor inside a list       → OrderedList / UnorderedList
//! anchor inside a heading    → Heading1..3
//! anchor inside a quote      → Quote
//! anything else              → Paragraph
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::document::{
    Block, BlockKind, Command, DocumentModel, DocumentState, Format, FormatFlags, HeadingTag,
    KeyCode, KeyEvent, ListType, NearestList, NodeKey,
};
use crate::subscription::{Priority, Subscription};

/// Kind of block shown in the toolbar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Quote,
    UnorderedList,
    OrderedList,
}

impl BlockType {
    /// Short identifier
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "h1",
            BlockType::Heading2 => "h2",
            BlockType::Heading3 => "h3",
            BlockType::Quote => "quote",
            BlockType::UnorderedList => "ul",
            BlockType::OrderedList => "ol",
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            BlockType::Paragraph => "Paragraph",
            BlockType::Heading1 => "Heading 1",
            BlockType::Heading2 => "Heading 2",
            BlockType::Heading3 => "Heading 3",
            BlockType::Quote => "Quote",
            BlockType::UnorderedList => "Bullet list",
            BlockType::OrderedList => "Numbered list",
        }
    }

    fn from_heading(tag: HeadingTag) -> Self {
        match tag {
            HeadingTag::H1 => BlockType::Heading1,
            HeadingTag::H2 => BlockType::Heading2,
            HeadingTag::H3 => BlockType::Heading3,
        }
    }

    fn from_list(list_type: ListType) -> Self {
        match list_type {
            ListType::Number => BlockType::OrderedList,
            ListType::Bullet => BlockType::UnorderedList,
        }
    }

    /// Classify the block a node lives in
    ///
    /// The nearest enclosing list takes precedence over the top-level
    /// element; the root itself classifies as a paragraph.
    pub fn classify(state: &DocumentState, key: NodeKey) -> Self {
        if key == NodeKey::Root {
            return BlockType::Paragraph;
        }

        if let NearestList::Node(list_type, _) = state.nearest_list(key) {
            return BlockType::from_list(list_type);
        }

        match state.top_level_element(key) {
            Some(Block::Heading { tag, .. }) => BlockType::from_heading(*tag),
            Some(Block::Quote(_)) => BlockType::Quote,
            _ => BlockType::Paragraph,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What the toolbar currently shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolbarState {
    /// Active inline formats at the selection
    pub format: FormatFlags,

    /// Block the selection anchor sits in
    pub block_type: BlockType,
}

impl ToolbarState {
    /// Derive the toolbar state from a document
    ///
    /// Without a selection the previous state is kept.
    pub fn reduce(self, state: &DocumentState) -> Self {
        match state.selection() {
            Some(selection) => Self {
                format: selection.format,
                block_type: BlockType::classify(state, selection.anchor.key),
            },
            None => self,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.format.has(Format::Bold)
    }

    pub fn is_italic(&self) -> bool {
        self.format.has(Format::Italic)
    }

    pub fn is_underline(&self) -> bool {
        self.format.has(Format::Underline)
    }
}

/// A toolbar button or dropdown choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Underline,
    Heading(HeadingTag),
    Quote,
    BulletList,
    NumberedList,
    /// A choice from the block type dropdown
    SelectBlockType(BlockType),
}

/// Command issued by an action, given what the toolbar currently shows
///
/// # Returns
/// * `Some(Command)` - The command to dispatch
/// * `None` - The action does nothing in this state
pub fn command_for(state: &ToolbarState, action: ToolbarAction) -> Option<Command> {
    match action {
        ToolbarAction::Bold => Some(Command::ToggleFormat(Format::Bold)),
        ToolbarAction::Italic => Some(Command::ToggleFormat(Format::Italic)),
        ToolbarAction::Underline => Some(Command::ToggleFormat(Format::Underline)),
        ToolbarAction::Heading(tag) => Some(Command::SetBlockType(BlockKind::Heading(tag))),
        ToolbarAction::Quote if state.block_type == BlockType::Quote => {
            Some(Command::SetBlockType(BlockKind::Paragraph))
        }
        ToolbarAction::Quote => Some(Command::SetBlockType(BlockKind::Quote)),
        ToolbarAction::BulletList if state.block_type == BlockType::UnorderedList => {
            Some(Command::RemoveList)
        }
        ToolbarAction::BulletList => Some(Command::InsertList(ListType::Bullet)),
        ToolbarAction::NumberedList if state.block_type == BlockType::OrderedList => {
            Some(Command::RemoveList)
        }
        ToolbarAction::NumberedList => Some(Command::InsertList(ListType::Number)),
        ToolbarAction::SelectBlockType(block_type) => match block_type {
            BlockType::Heading1 => command_for(state, ToolbarAction::Heading(HeadingTag::H1)),
            BlockType::Heading2 => command_for(state, ToolbarAction::Heading(HeadingTag::H2)),
            BlockType::Heading3 => command_for(state, ToolbarAction::Heading(HeadingTag::H3)),
            BlockType::Quote => command_for(state, ToolbarAction::Quote),
            BlockType::UnorderedList => command_for(state, ToolbarAction::BulletList),
            BlockType::OrderedList => command_for(state, ToolbarAction::NumberedList),
            // Choosing "Paragraph" leaves the block as it is
            BlockType::Paragraph => None,
        },
    }
}

/// Map Ctrl/Cmd+B, I and U to format toggles
///
/// A matching key has its default prevented.
pub fn shortcut_command(event: &mut KeyEvent) -> Option<Command> {
    if !event.has_command_modifier() {
        return None;
    }

    let format = match event.code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'b' => Format::Bold,
            'i' => Format::Italic,
            'u' => Format::Underline,
            _ => return None,
        },
        _ => return None,
    };

    event.prevent_default();
    Some(Command::ToggleFormat(format))
}

/// Toolbar attached to a document
///
/// Tracks the selection and owns the formatting shortcuts. Both
/// registrations end when the toolbar is dropped.
#[derive(Debug)]
pub struct Toolbar {
    state: Rc<RefCell<ToolbarState>>,
    _selection: Subscription,
    _shortcuts: Subscription,
}

impl Toolbar {
    /// Attach to a document, mirroring its current selection
    pub fn attach<M>(model: &M) -> Self
    where
        M: DocumentModel + ?Sized,
    {
        let state = Rc::new(RefCell::new(ToolbarState::default().reduce(model.state())));

        let target = Rc::clone(&state);
        let selection = model.subscribe_selection(Box::new(move |document| {
            let mut current = target.borrow_mut();
            *current = current.reduce(document);
        }));
        let shortcuts = model.register_key_handler(Priority::Critical, Box::new(shortcut_command));

        Self {
            state,
            _selection: selection,
            _shortcuts: shortcuts,
        }
    }

    /// What the toolbar currently shows
    pub fn state(&self) -> ToolbarState {
        *self.state.borrow()
    }

    /// Command an action would issue right now
    pub fn command_for(&self, action: ToolbarAction) -> Option<Command> {
        command_for(&self.state(), action)
    }

    /// Perform an action on a document
    ///
    /// # Returns
    /// * `true` if a command was dispatched
    pub fn apply<M>(&self, model: &mut M, action: ToolbarAction) -> bool
    where
        M: DocumentModel + ?Sized,
    {
        match self.command_for(action) {
            Some(command) => {
                log::debug!("Toolbar {:?} -> {:?}", action, command);
                model.dispatch(command);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Inline, ListItem, Point, RichTextDocument, Selection, TextRun};

    fn manuscript() -> RichTextDocument {
        RichTextDocument::from_blocks(vec![
            Block::Heading {
                tag: HeadingTag::H2,
                children: vec![Inline::Text(TextRun::new("Chapter One"))],
            },
            Block::paragraph("It began."),
            Block::Quote(vec![Inline::Text(TextRun::new("Said someone"))]),
            Block::List {
                list_type: ListType::Number,
                items: vec![ListItem::new(vec![Inline::Text(TextRun::new("first"))])],
            },
        ])
    }

    fn caret(doc: &mut RichTextDocument, point: Point) {
        doc.dispatch(Command::Select(Selection::caret(point)));
    }

    #[test]
    fn test_classify() {
        let doc = manuscript();
        let state = doc.state();
        assert_eq!(BlockType::classify(state, NodeKey::Block(0)), BlockType::Heading2);
        assert_eq!(BlockType::classify(state, NodeKey::Block(1)), BlockType::Paragraph);
        assert_eq!(BlockType::classify(state, NodeKey::Block(2)), BlockType::Quote);
        assert_eq!(
            BlockType::classify(state, NodeKey::ListItem { list: 3, item: 0 }),
            BlockType::OrderedList
        );
        assert_eq!(BlockType::classify(state, NodeKey::Root), BlockType::Paragraph);
    }

    #[test]
    fn test_reduce_without_selection_keeps_state() {
        let previous = ToolbarState {
            format: FormatFlags::new().with(Format::Bold),
            block_type: BlockType::Quote,
        };
        assert_eq!(previous.reduce(&DocumentState::empty()), previous);
    }

    #[test]
    fn test_follows_selection() {
        let mut doc = manuscript();
        let toolbar = Toolbar::attach(&doc);
        assert_eq!(toolbar.state(), ToolbarState::default());

        caret(&mut doc, Point::block(0, 3));
        assert_eq!(toolbar.state().block_type, BlockType::Heading2);

        caret(&mut doc, Point::list_item(3, 0, 2));
        assert_eq!(toolbar.state().block_type, BlockType::OrderedList);

        caret(&mut doc, Point::root(1));
        assert_eq!(toolbar.state().block_type, BlockType::Paragraph);
    }

    #[test]
    fn test_toggle_actions() {
        let quote = ToolbarState {
            block_type: BlockType::Quote,
            ..ToolbarState::default()
        };
        assert_eq!(
            command_for(&quote, ToolbarAction::Quote),
            Some(Command::SetBlockType(BlockKind::Paragraph))
        );
        assert_eq!(
            command_for(&ToolbarState::default(), ToolbarAction::Quote),
            Some(Command::SetBlockType(BlockKind::Quote))
        );

        let bullets = ToolbarState {
            block_type: BlockType::UnorderedList,
            ..ToolbarState::default()
        };
        assert_eq!(command_for(&bullets, ToolbarAction::BulletList), Some(Command::RemoveList));
        assert_eq!(
            command_for(&bullets, ToolbarAction::NumberedList),
            Some(Command::InsertList(ListType::Number))
        );
    }

    #[test]
    fn test_dropdown() {
        let state = ToolbarState::default();
        assert_eq!(
            command_for(&state, ToolbarAction::SelectBlockType(BlockType::Heading3)),
            Some(Command::SetBlockType(BlockKind::Heading(HeadingTag::H3)))
        );
        assert_eq!(command_for(&state, ToolbarAction::SelectBlockType(BlockType::Paragraph)), None);
    }

    #[test]
    fn test_shortcuts() {
        let mut event = KeyEvent::meta(KeyCode::Char('I'));
        assert_eq!(shortcut_command(&mut event), Some(Command::ToggleFormat(Format::Italic)));
        assert!(event.default_prevented());

        let mut plain = KeyEvent::new(KeyCode::Char('b'));
        assert_eq!(shortcut_command(&mut plain), None);
        assert!(!plain.default_prevented());

        let mut other = KeyEvent::ctrl(KeyCode::Char('k'));
        assert_eq!(shortcut_command(&mut other), None);
        assert!(!other.default_prevented());
    }

    #[test]
    fn test_apply_round_trip() {
        let mut doc = manuscript();
        let toolbar = Toolbar::attach(&doc);
        caret(&mut doc, Point::block(1, 0));

        assert!(toolbar.apply(&mut doc, ToolbarAction::BulletList));
        assert_eq!(toolbar.state().block_type, BlockType::UnorderedList);

        assert!(toolbar.apply(&mut doc, ToolbarAction::BulletList));
        assert_eq!(toolbar.state().block_type, BlockType::Paragraph);
        assert_eq!(doc.state().blocks()[1], Block::paragraph("It began."));

        let mut key = KeyEvent::ctrl(KeyCode::Char('u'));
        assert!(doc.handle_key(&mut key));
        assert!(toolbar.state().is_underline());
    }
}
