//! Read view of a document: block tree plus selection

use itertools::Itertools;

use super::inline;
use super::node::{Block, FormatFlags, Inline};
use super::selection::{NearestList, NodeKey, Point, Selection};
use super::snapshot::SerializedDocument;

/// Current content and selection of a document
///
/// Handlers receive this by reference on every notification. It exposes
/// everything needed to derive metrics and toolbar state without letting
/// the handler mutate the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    blocks: Vec<Block>,
    selection: Option<Selection>,
}

impl DocumentState {
    /// Create a state from top-level blocks, with no selection
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            selection: None,
        }
    }

    /// A document holding a single empty paragraph
    pub fn empty() -> Self {
        Self::new(vec![Block::empty_paragraph()])
    }

    /// Top-level blocks in document order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// Current selection, if the document has one
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub(crate) fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Number of top-level blocks
    pub fn top_level_count(&self) -> usize {
        self.blocks.len()
    }

    /// Flattened text of the whole document
    ///
    /// Top-level blocks are separated by a blank line.
    pub fn text_content(&self) -> String {
        self.blocks.iter().map(Block::text_content).join("\n\n")
    }

    /// Check if the document holds no text at all
    pub fn is_blank(&self) -> bool {
        self.blocks
            .iter()
            .all(|block| block.text_content().is_empty())
    }

    /// Text containers (blocks and list items) in document order
    pub fn containers(&self) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        for (index, block) in self.blocks.iter().enumerate() {
            match block {
                Block::List { items, .. } => {
                    keys.extend(
                        (0..items.len()).map(|item| NodeKey::ListItem { list: index, item }),
                    );
                }
                _ => keys.push(NodeKey::Block(index)),
            }
        }
        keys
    }

    /// Position of a container in document order
    pub fn ordinal(&self, key: NodeKey) -> Option<usize> {
        self.containers().iter().position(|k| *k == key)
    }

    /// Inline content of a text container
    pub fn inlines(&self, key: NodeKey) -> Option<&Vec<Inline>> {
        match key {
            NodeKey::Root => None,
            NodeKey::Block(index) => self.blocks.get(index)?.inlines(),
            NodeKey::ListItem { list, item } => match self.blocks.get(list)? {
                Block::List { items, .. } => items.get(item).map(|i| &i.children),
                _ => None,
            },
        }
    }

    pub(crate) fn inlines_mut(&mut self, key: NodeKey) -> Option<&mut Vec<Inline>> {
        match key {
            NodeKey::Root => None,
            NodeKey::Block(index) => self.blocks.get_mut(index)?.inlines_mut(),
            NodeKey::ListItem { list, item } => match self.blocks.get_mut(list)? {
                Block::List { items, .. } => items.get_mut(item).map(|i| &mut i.children),
                _ => None,
            },
        }
    }

    /// Largest valid offset for a node
    pub fn node_len(&self, key: NodeKey) -> Option<usize> {
        match key {
            NodeKey::Root => Some(self.blocks.len()),
            _ => self.inlines(key).map(|children| inline::len(children)),
        }
    }

    /// Check if a point addresses an existing position
    pub fn contains_point(&self, point: &Point) -> bool {
        self.node_len(point.key)
            .is_some_and(|length| point.offset <= length)
    }

    /// Caret position at the very end of the document
    pub fn end_point(&self) -> Point {
        match self.containers().last() {
            Some(key) => Point::new(*key, self.node_len(*key).unwrap_or(0)),
            None => Point::root(0),
        }
    }

    /// Top-level block containing a node; `None` for the root
    pub fn top_level_element(&self, key: NodeKey) -> Option<&Block> {
        self.blocks.get(key.top_level_index()?)
    }

    /// Nearest list among a node and its ancestors
    pub fn nearest_list(&self, key: NodeKey) -> NearestList {
        for ancestor in key.ancestors() {
            if let NodeKey::Block(index) = ancestor {
                if let Some(Block::List { list_type, .. }) = self.blocks.get(index) {
                    return NearestList::Node(*list_type, ancestor);
                }
            }
        }
        NearestList::None
    }

    /// Format of the text at a point
    pub fn format_at(&self, point: &Point) -> FormatFlags {
        self.inlines(point.key)
            .map(|children| inline::format_at(children, point.offset))
            .unwrap_or_default()
    }

    /// Anchor and focus in document order
    pub fn ordered_points(&self, selection: &Selection) -> (Point, Point) {
        let rank = |point: &Point| (self.ordinal(point.key).unwrap_or(0), point.offset);
        if rank(&selection.focus) < rank(&selection.anchor) {
            (selection.focus, selection.anchor)
        } else {
            (selection.anchor, selection.focus)
        }
    }

    /// Serialize to a snapshot
    pub fn serialize(&self) -> SerializedDocument {
        SerializedDocument::from_blocks(&self.blocks)
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::{ListItem, ListType, TextRun};

    fn sample() -> DocumentState {
        DocumentState::new(vec![
            Block::paragraph("Intro"),
            Block::List {
                list_type: ListType::Number,
                items: vec![
                    ListItem::new(vec![Inline::Text(TextRun::new("first"))]),
                    ListItem::new(vec![Inline::Text(TextRun::new("second"))]),
                ],
            },
            Block::paragraph("Outro"),
        ])
    }

    #[test]
    fn test_text_content_separates_blocks() {
        assert_eq!(sample().text_content(), "Intro\n\nfirst\n\nsecond\n\nOutro");
        assert_eq!(DocumentState::empty().text_content(), "");
        assert!(DocumentState::empty().is_blank());
    }

    #[test]
    fn test_containers_in_order() {
        let state = sample();
        assert_eq!(
            state.containers(),
            vec![
                NodeKey::Block(0),
                NodeKey::ListItem { list: 1, item: 0 },
                NodeKey::ListItem { list: 1, item: 1 },
                NodeKey::Block(2),
            ]
        );
        assert_eq!(state.ordinal(NodeKey::Block(2)), Some(3));
        assert_eq!(state.ordinal(NodeKey::Block(1)), None);
    }

    #[test]
    fn test_contains_point() {
        let state = sample();
        assert!(state.contains_point(&Point::block(0, 5)));
        assert!(!state.contains_point(&Point::block(0, 6)));
        assert!(!state.contains_point(&Point::block(1, 0)));
        assert!(state.contains_point(&Point::list_item(1, 1, 6)));
        assert!(state.contains_point(&Point::root(3)));
        assert!(!state.contains_point(&Point::root(4)));
    }

    #[test]
    fn test_nearest_list() {
        let state = sample();
        assert_eq!(
            state.nearest_list(NodeKey::ListItem { list: 1, item: 0 }),
            NearestList::Node(ListType::Number, NodeKey::Block(1))
        );
        assert_eq!(state.nearest_list(NodeKey::Block(0)), NearestList::None);
        assert_eq!(state.nearest_list(NodeKey::Root), NearestList::None);
    }

    #[test]
    fn test_end_point() {
        assert_eq!(sample().end_point(), Point::block(2, 5));
        assert_eq!(DocumentState::new(Vec::new()).end_point(), Point::root(0));
    }

    #[test]
    fn test_ordered_points() {
        let state = sample();
        let backwards = Selection::range(Point::block(2, 1), Point::block(0, 2));
        let (start, end) = state.ordered_points(&backwards);
        assert_eq!(start, Point::block(0, 2));
        assert_eq!(end, Point::block(2, 1));
    }
}
