//! In-memory rich-text document

use std::collections::BTreeSet;
use std::fmt;

use super::command::{Command, KeyCode, KeyEvent};
use super::error::DocumentError;
use super::inline;
use super::node::{Block, BlockKind, Format, Inline, ListItem, ListType};
use super::selection::{NodeKey, Point, Selection};
use super::snapshot::SerializedDocument;
use super::state::DocumentState;
use super::{DocumentModel, KeyHandler, StateHandler};
use crate::subscription::{Priority, Registry, Subscription};

/// Hook receiving errors raised while applying commands
pub type ErrorHandler = Box<dyn FnMut(&DocumentError)>;

/// What a command changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    None,
    Selection,
    Content,
}

/// Position of a point as (container ordinal, offset)
///
/// Block conversions keep every container and its order, so a selection
/// stored this way survives them unchanged.
type Mark = (usize, usize);

/// Built-in bindings for Enter, Shift+Enter and Backspace
///
/// Registered at [`Priority::Editor`] so every other key handler can
/// claim these keys first.
fn editing_command(event: &mut KeyEvent) -> Option<Command> {
    if event.has_command_modifier() {
        return None;
    }

    let command = match event.code {
        KeyCode::Enter if event.shift => Command::InsertLineBreak,
        KeyCode::Enter => Command::InsertParagraph,
        KeyCode::Backspace => Command::DeleteBackward,
        KeyCode::Char(_) => return None,
    };
    event.prevent_default();
    Some(command)
}

/// In-memory rich-text document
pub struct RichTextDocument {
    state: DocumentState,
    content_handlers: Registry<StateHandler>,
    selection_handlers: Registry<StateHandler>,
    key_handlers: Registry<KeyHandler>,
    _editing_keys: Subscription,
    on_error: ErrorHandler,
}

impl RichTextDocument {
    /// Create a document holding one empty paragraph
    pub fn new() -> Self {
        Self::from_state(DocumentState::empty())
    }

    /// Create a document from top-level blocks
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self::from_state(DocumentState::new(blocks))
    }

    /// Create a document from a snapshot
    pub fn from_snapshot(snapshot: &SerializedDocument) -> Result<Self, DocumentError> {
        Ok(Self::from_blocks(snapshot.to_blocks()?))
    }

    fn from_state(state: DocumentState) -> Self {
        let key_handlers: Registry<KeyHandler> = Registry::new();
        let editing_keys =
            key_handlers.register_with_priority(Priority::Editor, Box::new(editing_command));

        Self {
            state,
            content_handlers: Registry::new(),
            selection_handlers: Registry::new(),
            key_handlers,
            _editing_keys: editing_keys,
            on_error: Box::new(|error| log::error!("Document error: {}", error)),
        }
    }

    /// Replace the hook that receives command errors
    ///
    /// The default hook logs the error and carries on.
    pub fn set_error_handler(&mut self, handler: ErrorHandler) {
        self.on_error = handler;
    }

    fn emit_content(&self) {
        let state = &self.state;
        self.content_handlers.for_each(|handler| handler(state));
    }

    fn emit_selection(&self) {
        let state = &self.state;
        self.selection_handlers.for_each(|handler| handler(state));
    }

    fn apply(&mut self, command: Command) -> Result<Change, DocumentError> {
        match command {
            Command::Select(selection) => self.select(selection),
            Command::ToggleFormat(format) => Ok(self.toggle_format(format)),
            Command::SetBlockType(kind) => Ok(self.set_block_type(kind)),
            Command::InsertList(list_type) => Ok(self.insert_list(list_type)),
            Command::RemoveList => Ok(self.remove_list()),
            Command::InsertText(text) => Ok(self.insert_text(&text)),
            Command::InsertParagraph => Ok(self.insert_paragraph()),
            Command::InsertLineBreak => Ok(self.insert_line_break()),
            Command::DeleteBackward => Ok(self.delete_backward()),
        }
    }

    fn current_selection(&self, action: &str) -> Option<Selection> {
        let selection = self.state.selection().copied();
        if selection.is_none() {
            log::warn!("{} ignored: no selection", action);
        }
        selection
    }

    fn select(&mut self, mut selection: Selection) -> Result<Change, DocumentError> {
        for point in [selection.anchor, selection.focus] {
            if !self.state.contains_point(&point) {
                return Err(DocumentError::InvalidPoint { point });
            }
        }
        selection.format = self.state.format_at(&selection.anchor);
        self.state.set_selection(Some(selection));
        Ok(Change::Selection)
    }

    /// Map a point onto a text container
    ///
    /// Root points resolve to the start of the block at their offset, or
    /// to the end of the document past the last block.
    fn resolve(&self, point: Point) -> Option<Point> {
        match point.key {
            NodeKey::Root => {
                let containers = self.state.containers();
                containers
                    .iter()
                    .find(|key| key.top_level_index().is_some_and(|index| index >= point.offset))
                    .map(|key| Point::new(*key, 0))
                    .or_else(|| containers.last().map(|_| self.state.end_point()))
            }
            _ => Some(point),
        }
    }

    /// Resolved selection bounds in document order
    fn bounds(&self, selection: &Selection) -> Option<(Point, Point)> {
        let anchor = self.resolve(selection.anchor)?;
        let focus = self.resolve(selection.focus)?;
        Some(self.state.ordered_points(&Selection::range(anchor, focus)))
    }

    /// Every container touched by `start..end` with the span inside it
    fn spans(&self, start: Point, end: Point) -> Vec<(NodeKey, usize, usize)> {
        let containers = self.state.containers();
        let (Some(first), Some(last)) = (self.state.ordinal(start.key), self.state.ordinal(end.key))
        else {
            return Vec::new();
        };

        containers[first..=last]
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let ordinal = first + i;
                let from = if ordinal == first { start.offset } else { 0 };
                let to = if ordinal == last {
                    end.offset
                } else {
                    self.state.node_len(*key).unwrap_or(0)
                };
                (*key, from, to)
            })
            .collect()
    }

    fn mark(&self, point: Point) -> Option<Mark> {
        let point = self.resolve(point)?;
        Some((self.state.ordinal(point.key)?, point.offset))
    }

    fn unmark(&self, mark: Mark) -> Point {
        let containers = self.state.containers();
        match containers.get(mark.0) {
            Some(key) => Point::new(*key, mark.1),
            None => self.state.end_point(),
        }
    }

    /// Run a structural edit that keeps containers, then restore the selection
    fn restructure(&mut self, selection: Selection, edit: impl FnOnce(&mut Vec<Block>)) {
        let anchor = self.mark(selection.anchor);
        let focus = self.mark(selection.focus);

        edit(self.state.blocks_mut());

        let restored = match (anchor, focus) {
            (Some(anchor), Some(focus)) => Selection {
                anchor: self.unmark(anchor),
                focus: self.unmark(focus),
                format: selection.format,
            },
            _ => selection,
        };
        self.state.set_selection(Some(restored));
    }

    /// Top-level indices of the blocks touched by the selection
    fn touched_blocks(&self, selection: &Selection) -> BTreeSet<usize> {
        let Some((start, end)) = self.bounds(selection) else {
            return BTreeSet::new();
        };
        self.spans(start, end)
            .into_iter()
            .filter_map(|(key, _, _)| key.top_level_index())
            .collect()
    }

    fn toggle_format(&mut self, format: Format) -> Change {
        let Some(mut selection) = self.current_selection("toggle format") else {
            return Change::None;
        };

        let on = !selection.format.has(format);
        selection.format.set(format, on);

        let bounds = self.bounds(&selection);
        let change = match bounds {
            Some((start, end)) if start != end => {
                for (key, from, to) in self.spans(start, end) {
                    if let Some(children) = self.state.inlines_mut(key) {
                        inline::set_format(children, from, to, format, on);
                    }
                }
                Change::Content
            }
            _ => Change::Selection,
        };

        self.state.set_selection(Some(selection));
        change
    }

    fn set_block_type(&mut self, kind: BlockKind) -> Change {
        let Some(selection) = self.current_selection("set block type") else {
            return Change::None;
        };
        let Some((start, end)) = self.bounds(&selection) else {
            return Change::None;
        };
        let keys: Vec<NodeKey> = self
            .spans(start, end)
            .into_iter()
            .map(|(key, _, _)| key)
            .collect();

        self.restructure(selection, |blocks| {
            for key in keys.into_iter().rev() {
                match key {
                    NodeKey::Block(index) => {
                        let block = std::mem::replace(&mut blocks[index], Block::empty_paragraph());
                        let children = block.into_inlines().unwrap_or_default();
                        blocks[index] = Block::of_kind(kind, children);
                    }
                    NodeKey::ListItem { list, item } => extract_list_item(blocks, list, item, kind),
                    NodeKey::Root => {}
                }
            }
        });
        Change::Content
    }

    fn insert_list(&mut self, list_type: ListType) -> Change {
        let Some(selection) = self.current_selection("insert list") else {
            return Change::None;
        };
        let touched = self.touched_blocks(&selection);
        if touched.is_empty() {
            return Change::None;
        }

        self.restructure(selection, |blocks| {
            if touched.iter().all(|index| blocks[*index].is_list()) {
                for index in &touched {
                    if let Block::List { list_type: current, .. } = &mut blocks[*index] {
                        *current = list_type;
                    }
                }
                return;
            }

            let mut rebuilt = Vec::with_capacity(blocks.len());
            let mut pending: Option<Vec<ListItem>> = None;
            for (index, block) in std::mem::take(blocks).into_iter().enumerate() {
                if touched.contains(&index) {
                    let items = pending.get_or_insert_with(Vec::new);
                    match block {
                        Block::List { items: existing, .. } => items.extend(existing),
                        other => {
                            items.push(ListItem::new(other.into_inlines().unwrap_or_default()))
                        }
                    }
                } else {
                    if let Some(items) = pending.take() {
                        rebuilt.push(Block::List { list_type, items });
                    }
                    rebuilt.push(block);
                }
            }
            if let Some(items) = pending.take() {
                rebuilt.push(Block::List { list_type, items });
            }
            *blocks = rebuilt;
        });
        Change::Content
    }

    fn remove_list(&mut self) -> Change {
        let Some(selection) = self.current_selection("remove list") else {
            return Change::None;
        };
        let lists: BTreeSet<usize> = self
            .touched_blocks(&selection)
            .into_iter()
            .filter(|index| self.state.blocks()[*index].is_list())
            .collect();
        if lists.is_empty() {
            return Change::None;
        }

        self.restructure(selection, |blocks| {
            let mut rebuilt = Vec::with_capacity(blocks.len());
            for (index, block) in std::mem::take(blocks).into_iter().enumerate() {
                match block {
                    Block::List { items, .. } if lists.contains(&index) => {
                        rebuilt.extend(
                            items.into_iter().map(|item| Block::Paragraph(item.children)),
                        );
                    }
                    other => rebuilt.push(other),
                }
            }
            *blocks = rebuilt;
        });
        Change::Content
    }

    /// Delete any selected range and return the caret to edit at
    ///
    /// A document without text containers gets an empty paragraph first.
    fn prepare_caret(&mut self, selection: &Selection) -> Point {
        match self.bounds(selection) {
            Some((start, end)) => {
                self.delete_range(start, end);
                start
            }
            None => {
                let blocks = self.state.blocks_mut();
                blocks.push(Block::empty_paragraph());
                Point::block(blocks.len() - 1, 0)
            }
        }
    }

    fn delete_range(&mut self, start: Point, end: Point) {
        if start == end {
            return;
        }
        if start.key == end.key {
            if let Some(children) = self.state.inlines_mut(start.key) {
                inline::delete(children, start.offset, end.offset);
            }
            return;
        }

        let containers = self.state.containers();
        let (Some(first), Some(last)) = (self.state.ordinal(start.key), self.state.ordinal(end.key))
        else {
            return;
        };

        let tail = match self.state.inlines_mut(end.key) {
            Some(children) => inline::split_at(std::mem::take(children), end.offset).1,
            None => Vec::new(),
        };
        if let Some(children) = self.state.inlines_mut(start.key) {
            let length = inline::len(children);
            inline::delete(children, start.offset, length);
            inline::insert(children, start.offset, tail);
        }
        for key in containers[first + 1..=last].iter().rev() {
            self.remove_container(*key);
        }
    }

    fn remove_container(&mut self, key: NodeKey) {
        let blocks = self.state.blocks_mut();
        match key {
            NodeKey::Root => {}
            NodeKey::Block(index) => {
                if index < blocks.len() {
                    blocks.remove(index);
                }
            }
            NodeKey::ListItem { list, item } => {
                let emptied = match blocks.get_mut(list) {
                    Some(Block::List { items, .. }) if item < items.len() => {
                        items.remove(item);
                        items.is_empty()
                    }
                    _ => false,
                };
                if emptied {
                    blocks.remove(list);
                }
            }
        }
    }

    fn insert_text(&mut self, text: &str) -> Change {
        let Some(selection) = self.current_selection("insert text") else {
            return Change::None;
        };
        let caret = self.prepare_caret(&selection);
        if let Some(children) = self.state.inlines_mut(caret.key) {
            inline::insert_text(children, caret.offset, text, selection.format);
        }

        let caret = Point::new(caret.key, caret.offset + text.chars().count());
        self.state.set_selection(Some(Selection {
            format: selection.format,
            ..Selection::caret(caret)
        }));
        Change::Content
    }

    fn insert_line_break(&mut self) -> Change {
        let Some(selection) = self.current_selection("insert line break") else {
            return Change::None;
        };
        let caret = self.prepare_caret(&selection);
        if let Some(children) = self.state.inlines_mut(caret.key) {
            inline::insert(children, caret.offset, vec![Inline::LineBreak]);
        }

        let caret = Point::new(caret.key, caret.offset + 1);
        self.state.set_selection(Some(Selection {
            format: selection.format,
            ..Selection::caret(caret)
        }));
        Change::Content
    }

    fn insert_paragraph(&mut self) -> Change {
        let Some(selection) = self.current_selection("insert paragraph") else {
            return Change::None;
        };
        let caret = self.prepare_caret(&selection);
        let blocks = self.state.blocks_mut();

        let next = match caret.key {
            NodeKey::Block(index) => {
                let block = std::mem::replace(&mut blocks[index], Block::empty_paragraph());
                let (kind, children) = match block {
                    Block::Paragraph(children) => (BlockKind::Paragraph, children),
                    Block::Heading { tag, children } => (BlockKind::Heading(tag), children),
                    Block::Quote(children) => (BlockKind::Quote, children),
                    list @ Block::List { .. } => {
                        blocks[index] = list;
                        return Change::None;
                    }
                };
                let (left, right) = inline::split_at(children, caret.offset);
                // Only a heading split mid-text continues as a heading
                let next_kind = match kind {
                    BlockKind::Heading(tag) if !right.is_empty() => BlockKind::Heading(tag),
                    _ => BlockKind::Paragraph,
                };
                blocks[index] = Block::of_kind(kind, left);
                blocks.insert(index + 1, Block::of_kind(next_kind, right));
                Point::block(index + 1, 0)
            }
            NodeKey::ListItem { list, item } => split_list_item(blocks, list, item, caret.offset),
            NodeKey::Root => return Change::None,
        };

        self.state.set_selection(Some(Selection {
            format: selection.format,
            ..Selection::caret(next)
        }));
        Change::Content
    }

    fn delete_backward(&mut self) -> Change {
        let Some(selection) = self.current_selection("delete") else {
            return Change::None;
        };
        let Some((start, end)) = self.bounds(&selection) else {
            return Change::None;
        };

        let caret = if start != end {
            self.delete_range(start, end);
            start
        } else if start.offset > 0 {
            if let Some(children) = self.state.inlines_mut(start.key) {
                inline::delete(children, start.offset - 1, start.offset);
            }
            Point::new(start.key, start.offset - 1)
        } else {
            let containers = self.state.containers();
            let previous = match self.state.ordinal(start.key) {
                Some(ordinal) if ordinal > 0 => containers[ordinal - 1],
                _ => return Change::None,
            };
            let offset = self.state.node_len(previous).unwrap_or(0);
            let moved = self
                .state
                .inlines_mut(start.key)
                .map(std::mem::take)
                .unwrap_or_default();
            if let Some(children) = self.state.inlines_mut(previous) {
                inline::insert(children, offset, moved);
            }
            self.remove_container(start.key);
            Point::new(previous, offset)
        };

        let mut collapsed = Selection::caret(caret);
        collapsed.format = self.state.format_at(&caret);
        self.state.set_selection(Some(collapsed));
        Change::Content
    }
}

/// Pull one list item out of its list as a text block of `kind`
///
/// The list is split around the item; empty halves are dropped.
fn extract_list_item(blocks: &mut Vec<Block>, list: usize, item: usize, kind: BlockKind) {
    let (list_type, mut items) = match blocks.remove(list) {
        Block::List { list_type, items } if item < items.len() => (list_type, items),
        other => {
            blocks.insert(list, other);
            return;
        }
    };

    let after = items.split_off(item + 1);
    let extracted = items.pop().unwrap_or_default();

    let mut replacement = Vec::with_capacity(3);
    if !items.is_empty() {
        replacement.push(Block::List { list_type, items });
    }
    replacement.push(Block::of_kind(kind, extracted.children));
    if !after.is_empty() {
        replacement.push(Block::List {
            list_type,
            items: after,
        });
    }
    blocks.splice(list..list, replacement);
}

/// Split a list item at `offset`, or leave the list from an empty item
///
/// # Returns
/// * The caret position after the split
fn split_list_item(blocks: &mut Vec<Block>, list: usize, item: usize, offset: usize) -> Point {
    let empty = match blocks.get(list) {
        Some(Block::List { items, .. }) => items.get(item).map(|i| i.children.is_empty()),
        _ => None,
    };

    if empty == Some(true) {
        // Enter on an empty item ends the list here
        extract_list_item(blocks, list, item, BlockKind::Paragraph);
        let paragraph = if item > 0 { list + 1 } else { list };
        return Point::block(paragraph, 0);
    }

    let Some(Block::List { items, .. }) = blocks.get_mut(list) else {
        return Point::list_item(list, item, offset);
    };
    let Some(current) = items.get_mut(item) else {
        return Point::list_item(list, item, offset);
    };
    let (left, right) = inline::split_at(std::mem::take(&mut current.children), offset);
    current.children = left;
    items.insert(item + 1, ListItem::new(right));
    Point::list_item(list, item + 1, 0)
}

impl Default for RichTextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RichTextDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichTextDocument")
            .field("state", &self.state)
            .field("content_handlers", &self.content_handlers)
            .field("selection_handlers", &self.selection_handlers)
            .field("key_handlers", &self.key_handlers)
            .finish()
    }
}

impl DocumentModel for RichTextDocument {
    fn state(&self) -> &DocumentState {
        &self.state
    }

    fn subscribe_content(&self, handler: Box<StateHandler>) -> Subscription {
        self.content_handlers.register(handler)
    }

    fn subscribe_selection(&self, handler: Box<StateHandler>) -> Subscription {
        self.selection_handlers.register(handler)
    }

    fn register_key_handler(&self, priority: Priority, handler: Box<KeyHandler>) -> Subscription {
        self.key_handlers.register_with_priority(priority, handler)
    }

    fn dispatch(&mut self, command: Command) {
        log::debug!("Dispatching {:?}", command);
        match self.apply(command) {
            Ok(Change::Content) => {
                self.emit_content();
                self.emit_selection();
            }
            Ok(Change::Selection) => self.emit_selection(),
            Ok(Change::None) => {}
            Err(error) => (self.on_error)(&error),
        }
    }

    fn handle_key(&mut self, event: &mut KeyEvent) -> bool {
        let mut command = None;
        let handled = self.key_handlers.visit(|handler| match handler(&mut *event) {
            Some(found) => {
                command = Some(found);
                true
            }
            None => false,
        });

        if let Some(command) = command {
            self.dispatch(command);
        }
        handled
    }

    fn refresh(&mut self) {
        self.emit_content();
        self.emit_selection();
    }
}
