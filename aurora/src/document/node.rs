//! Document nodes
//!
//! A document is a list of top-level blocks. Paragraphs, headings and
//! quotes hold inline content directly; lists hold items, and each item
//! holds inline content. Inline content is a sequence of formatted text
//! runs and line breaks.

use itertools::Itertools;

/// A single inline text format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Bold,
    Italic,
    Underline,
}

/// Active inline formats of a text run or selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FormatFlags {
    /// Bold formatting
    pub bold: bool,

    /// Italic formatting
    pub italic: bool,

    /// Underline formatting
    pub underline: bool,
}

impl FormatFlags {
    /// Bit used for bold in serialized snapshots
    pub const BOLD_BIT: u32 = 1;
    /// Bit used for italic in serialized snapshots
    pub const ITALIC_BIT: u32 = 1 << 1;
    /// Bit used for underline in serialized snapshots
    pub const UNDERLINE_BIT: u32 = 1 << 3;

    /// Create an empty format set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a format is active
    pub fn has(&self, format: Format) -> bool {
        match format {
            Format::Bold => self.bold,
            Format::Italic => self.italic,
            Format::Underline => self.underline,
        }
    }

    /// Turn a format on or off
    pub fn set(&mut self, format: Format, on: bool) {
        match format {
            Format::Bold => self.bold = on,
            Format::Italic => self.italic = on,
            Format::Underline => self.underline = on,
        }
    }

    /// Flip a format
    pub fn toggle(&mut self, format: Format) {
        let on = !self.has(format);
        self.set(format, on);
    }

    /// Builder-style variant of [`FormatFlags::set`]
    pub fn with(mut self, format: Format) -> Self {
        self.set(format, true);
        self
    }

    /// Check if any formatting is active
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.underline
    }

    /// Encode as the bitmask stored in snapshots
    pub fn to_bits(self) -> u32 {
        let mut bits = 0;
        if self.bold {
            bits |= Self::BOLD_BIT;
        }
        if self.italic {
            bits |= Self::ITALIC_BIT;
        }
        if self.underline {
            bits |= Self::UNDERLINE_BIT;
        }
        bits
    }

    /// Decode a snapshot bitmask; unknown bits are ignored
    pub fn from_bits(bits: u32) -> Self {
        Self {
            bold: bits & Self::BOLD_BIT != 0,
            italic: bits & Self::ITALIC_BIT != 0,
            underline: bits & Self::UNDERLINE_BIT != 0,
        }
    }
}

/// A span of text with consistent formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Formatting applied to the whole run
    pub format: FormatFlags,
}

impl TextRun {
    /// Create a new plain text run
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: FormatFlags::default(),
        }
    }

    /// Create a new text run with the specified formatting
    pub fn with_format(text: impl Into<String>, format: FormatFlags) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the run holds no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Inline content inside a block or list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Formatted text
    Text(TextRun),

    /// Line break inside a block (counts as one character, `\n`)
    LineBreak,
}

impl Inline {
    /// Length in characters
    pub fn len(&self) -> usize {
        match self {
            Inline::Text(run) => run.len(),
            Inline::LineBreak => 1,
        }
    }

    /// Check if the inline contributes no characters
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened text of this inline
    pub fn text_content(&self) -> &str {
        match self {
            Inline::Text(run) => &run.text,
            Inline::LineBreak => "\n",
        }
    }
}

/// Heading level offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingTag {
    H1,
    H2,
    H3,
}

impl HeadingTag {
    /// Heading tag for a numeric level; levels above 3 clamp to `H3`
    pub fn from_level(level: usize) -> Self {
        match level {
            0 | 1 => HeadingTag::H1,
            2 => HeadingTag::H2,
            _ => HeadingTag::H3,
        }
    }

    /// Numeric heading level
    pub fn level(self) -> usize {
        match self {
            HeadingTag::H1 => 1,
            HeadingTag::H2 => 2,
            HeadingTag::H3 => 3,
        }
    }

    /// Tag name as stored in snapshots (`h1`, `h2`, `h3`)
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingTag::H1 => "h1",
            HeadingTag::H2 => "h2",
            HeadingTag::H3 => "h3",
        }
    }

    /// Parse a tag name
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(HeadingTag::H1),
            "h2" => Some(HeadingTag::H2),
            "h3" => Some(HeadingTag::H3),
            _ => None,
        }
    }
}

/// Kind of list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListType {
    /// Unordered (bulleted) list
    Bullet,
    /// Ordered (numbered) list
    Number,
}

impl ListType {
    /// Name as stored in snapshots
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Bullet => "bullet",
            ListType::Number => "number",
        }
    }

    /// Parse a snapshot name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bullet" => Some(ListType::Bullet),
            "number" => Some(ListType::Number),
            _ => None,
        }
    }
}

/// Target kind for converting text blocks in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(HeadingTag),
    Quote,
}

/// A list item holding inline content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    /// The content of the list item
    pub children: Vec<Inline>,
}

impl ListItem {
    /// Create a list item from inline content
    pub fn new(children: Vec<Inline>) -> Self {
        Self { children }
    }

    /// Flattened text of the item
    pub fn text_content(&self) -> String {
        self.children.iter().map(Inline::text_content).collect()
    }
}

/// Top-level block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph of inline content
    Paragraph(Vec<Inline>),

    /// A heading
    Heading {
        /// Heading level
        tag: HeadingTag,
        /// Inline content of the heading
        children: Vec<Inline>,
    },

    /// A block quote
    Quote(Vec<Inline>),

    /// An ordered or unordered list
    List {
        /// Bulleted or numbered
        list_type: ListType,
        /// List items, in order
        items: Vec<ListItem>,
    },
}

impl Block {
    /// Create an empty paragraph
    pub fn empty_paragraph() -> Self {
        Block::Paragraph(Vec::new())
    }

    /// Create a paragraph holding a single plain run
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![Inline::Text(TextRun::new(text))])
    }

    /// Create a block of the given kind around inline content
    pub fn of_kind(kind: BlockKind, children: Vec<Inline>) -> Self {
        match kind {
            BlockKind::Paragraph => Block::Paragraph(children),
            BlockKind::Heading(tag) => Block::Heading { tag, children },
            BlockKind::Quote => Block::Quote(children),
        }
    }

    /// Inline content of a text block; `None` for lists
    pub fn inlines(&self) -> Option<&Vec<Inline>> {
        match self {
            Block::Paragraph(children) | Block::Quote(children) => Some(children),
            Block::Heading { children, .. } => Some(children),
            Block::List { .. } => None,
        }
    }

    /// Mutable inline content of a text block; `None` for lists
    pub fn inlines_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Block::Paragraph(children) | Block::Quote(children) => Some(children),
            Block::Heading { children, .. } => Some(children),
            Block::List { .. } => None,
        }
    }

    /// Take the inline content out of a text block
    pub fn into_inlines(self) -> Option<Vec<Inline>> {
        match self {
            Block::Paragraph(children) | Block::Quote(children) => Some(children),
            Block::Heading { children, .. } => Some(children),
            Block::List { .. } => None,
        }
    }

    /// Check if this block is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Block::List { .. })
    }

    /// Flattened text of the block
    ///
    /// List items are separated by a blank line, the same way top-level
    /// blocks are.
    pub fn text_content(&self) -> String {
        match self {
            Block::List { items, .. } => items.iter().map(ListItem::text_content).join("\n\n"),
            _ => self
                .inlines()
                .map(|children| children.iter().map(Inline::text_content).collect())
                .unwrap_or_default(),
        }
    }
}
