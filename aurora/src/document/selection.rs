//! Selection and node addressing

use super::node::{FormatFlags, ListType};

/// Address of a node that can hold a selection point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// The document root; point offsets count top-level children
    Root,

    /// A top-level text block (paragraph, heading or quote)
    Block(usize),

    /// An item inside the list at top-level index `list`
    ListItem {
        /// Top-level index of the list
        list: usize,
        /// Index of the item within the list
        item: usize,
    },
}

impl NodeKey {
    /// Index of the top-level block containing this node
    pub fn top_level_index(&self) -> Option<usize> {
        match *self {
            NodeKey::Root => None,
            NodeKey::Block(index) => Some(index),
            NodeKey::ListItem { list, .. } => Some(list),
        }
    }

    /// The node and its ancestors, innermost first, ending at the root
    pub fn ancestors(&self) -> Vec<NodeKey> {
        match *self {
            NodeKey::Root => vec![NodeKey::Root],
            NodeKey::Block(index) => vec![NodeKey::Block(index), NodeKey::Root],
            NodeKey::ListItem { list, item } => vec![
                NodeKey::ListItem { list, item },
                NodeKey::Block(list),
                NodeKey::Root,
            ],
        }
    }
}

/// A caret position: a node and a character offset inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Node holding the point
    pub key: NodeKey,
    /// Character offset (child offset for the root)
    pub offset: usize,
}

impl Point {
    /// Create a point
    pub fn new(key: NodeKey, offset: usize) -> Self {
        Self { key, offset }
    }

    /// Point inside a top-level text block
    pub fn block(index: usize, offset: usize) -> Self {
        Self::new(NodeKey::Block(index), offset)
    }

    /// Point inside a list item
    pub fn list_item(list: usize, item: usize, offset: usize) -> Self {
        Self::new(NodeKey::ListItem { list, item }, offset)
    }

    /// Point on the root itself
    pub fn root(offset: usize) -> Self {
        Self::new(NodeKey::Root, offset)
    }
}

/// Range selection between an anchor and a focus
///
/// The anchor is where the selection started; the focus may come before
/// it. A collapsed selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started
    pub anchor: Point,

    /// Where the selection ends
    pub focus: Point,

    /// Format applied to text typed at this selection
    pub format: FormatFlags,
}

impl Selection {
    /// Create a range selection
    pub fn range(anchor: Point, focus: Point) -> Self {
        Self {
            anchor,
            focus,
            format: FormatFlags::default(),
        }
    }

    /// Create a collapsed selection
    pub fn caret(point: Point) -> Self {
        Self::range(point, point)
    }

    /// Check if anchor and focus coincide
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Check whether a format is active for this selection
    pub fn has_format(&self, format: super::node::Format) -> bool {
        self.format.has(format)
    }
}

/// Result of looking for the list enclosing a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearestList {
    /// The node is not inside a list
    None,

    /// The nearest enclosing list, its type and address
    Node(ListType, NodeKey),
}
