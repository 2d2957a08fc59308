//! Markdown manuscript import
//!
//! Converts pulldown-cmark's event stream into document blocks. The
//! document only knows paragraphs, three heading levels, quotes and flat
//! lists, so richer Markdown is folded into those:
//!
//! - headings deeper than `###` become heading 3
//! - paragraphs inside a block quote become quote blocks
//! - nested list items are appended to the enclosing list
//! - code blocks become paragraphs, one line break per source line
//! - links, images and inline code keep only their text

use pulldown_cmark::{Event, Tag, TagEnd};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::document::inline;
use crate::document::{
    Block, BlockKind, FormatFlags, HeadingTag, Inline, ListItem, ListType, TextRun,
};

/// Errors that can occur when importing a manuscript
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parser state for converting markdown events to blocks
pub struct MarkdownImporter {
    /// Current formatting state
    formatting: FormatFlags,

    /// Inline content of the block being built
    current: Vec<Inline>,

    /// Completed top-level blocks
    blocks: Vec<Block>,

    /// Stack of list contexts (for nested lists)
    list_stack: Vec<ListContext>,

    /// Number of block quotes currently open
    quote_depth: usize,

    /// Tag of the heading being built
    heading: Option<HeadingTag>,

    /// Whether text events belong to a code block
    in_code_block: bool,
}

/// Context for building a list
struct ListContext {
    list_type: ListType,
    items: Vec<ListItem>,
    /// Content of the item being built
    current_item: Option<Vec<Inline>>,
    /// The current item contained a nested list
    item_split: bool,
}

impl MarkdownImporter {
    /// Create a new importer
    pub fn new() -> Self {
        Self {
            formatting: FormatFlags::new(),
            current: Vec::new(),
            blocks: Vec::new(),
            list_stack: Vec::new(),
            quote_depth: 0,
            heading: None,
            in_code_block: false,
        }
    }

    /// Parse markdown content into document blocks
    ///
    /// # Parameters
    /// * `content` - Raw markdown content to parse
    ///
    /// # Returns
    /// * `Vec<Block>` - Top-level blocks; a blank input yields one empty paragraph
    pub fn parse(content: &str) -> Vec<Block> {
        let mut importer = Self::new();

        for event in pulldown_cmark::Parser::new(content) {
            importer.process_event(event);
        }

        importer.finalize()
    }

    /// Read and parse a markdown file
    pub fn import_file<P: AsRef<Path>>(path: P) -> Result<Vec<Block>, ImportError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let blocks = Self::parse(&content);
        log::info!("Imported {} blocks from {}", blocks.len(), path.display());
        Ok(blocks)
    }

    /// Process a single markdown event
    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.handle_start_tag(tag),
            Event::End(tag_end) => self.handle_end_tag(tag_end),
            Event::Text(text) => self.handle_text(&text),
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.push_text(&code)
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.current.push(Inline::LineBreak),
            _ => {}
        }
    }

    /// Handle opening tags
    fn handle_start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.current.clear(),
            Tag::Heading { level, .. } => {
                self.heading = Some(HeadingTag::from_level(level as usize));
                self.current.clear();
            }
            Tag::BlockQuote(_) => self.quote_depth += 1,
            Tag::CodeBlock(_) => {
                self.in_code_block = true;
                self.current.clear();
            }
            Tag::List(start) => self.start_list(start.is_some()),
            Tag::Item => {
                if let Some(list_ctx) = self.list_stack.last_mut() {
                    list_ctx.current_item = Some(Vec::new());
                    list_ctx.item_split = false;
                }
                self.current.clear();
            }
            Tag::Emphasis => self.formatting.italic = true,
            Tag::Strong => self.formatting.bold = true,
            _ => {}
        }
    }

    /// Handle closing tags
    fn handle_end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => self.finish_block(BlockKind::Paragraph),
            TagEnd::Heading(_) => {
                let tag = self.heading.take().unwrap_or(HeadingTag::H3);
                self.finish_block(BlockKind::Heading(tag));
            }
            TagEnd::BlockQuote(_) => self.quote_depth = self.quote_depth.saturating_sub(1),
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                // Fenced code ends with a newline that would add a trailing break
                if self.current.last() == Some(&Inline::LineBreak) {
                    self.current.pop();
                }
                self.finish_block(BlockKind::Paragraph);
            }
            TagEnd::List(_) => self.finish_list(),
            TagEnd::Item => self.finish_list_item(),
            TagEnd::Emphasis => self.formatting.italic = false,
            TagEnd::Strong => self.formatting.bold = false,
            _ => {}
        }
    }

    /// Handle text content
    fn handle_text(&mut self, text: &str) {
        if !self.in_code_block {
            self.push_text(text);
            return;
        }

        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.current.push(Inline::LineBreak);
            }
            self.push_text(line);
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.current
            .push(Inline::Text(TextRun::with_format(text, self.formatting)));
    }

    /// Finish a paragraph, heading or code block
    ///
    /// Inside a list item the content joins the item instead of becoming
    /// a block of its own.
    fn finish_block(&mut self, kind: BlockKind) {
        let mut inlines = std::mem::take(&mut self.current);
        inline::normalize(&mut inlines);

        if let Some(item) = self.list_stack.last_mut().and_then(|ctx| ctx.current_item.as_mut()) {
            if !item.is_empty() && !inlines.is_empty() {
                item.push(Inline::LineBreak);
            }
            item.extend(inlines);
            return;
        }

        if inlines.is_empty() {
            return;
        }

        let kind = match kind {
            BlockKind::Paragraph if self.quote_depth > 0 => BlockKind::Quote,
            other => other,
        };
        self.blocks.push(Block::of_kind(kind, inlines));
    }

    /// Start a list, closing off the enclosing item's text first
    fn start_list(&mut self, ordered: bool) {
        self.flush_item_text();

        if let Some(parent) = self.list_stack.last_mut() {
            if let Some(content) = parent.current_item.take() {
                if !content.is_empty() {
                    parent.items.push(ListItem::new(content));
                }
                parent.current_item = Some(Vec::new());
                parent.item_split = true;
            }
        }

        self.list_stack.push(ListContext {
            list_type: if ordered { ListType::Number } else { ListType::Bullet },
            items: Vec::new(),
            current_item: None,
            item_split: false,
        });
    }

    /// Tight list items carry their text without a paragraph
    fn flush_item_text(&mut self) {
        if self.current.is_empty() {
            return;
        }
        if self.list_stack.last().is_some_and(|ctx| ctx.current_item.is_some()) {
            self.finish_block(BlockKind::Paragraph);
        }
    }

    /// Finish a list item
    fn finish_list_item(&mut self) {
        self.flush_item_text();

        let Some(list_ctx) = self.list_stack.last_mut() else {
            return;
        };

        let Some(mut content) = list_ctx.current_item.take() else {
            return;
        };

        if content.is_empty() && list_ctx.item_split {
            return;
        }

        inline::normalize(&mut content);
        list_ctx.items.push(ListItem::new(content));
    }

    /// Finish a list
    fn finish_list(&mut self) {
        let Some(list_ctx) = self.list_stack.pop() else {
            return;
        };

        if let Some(parent) = self.list_stack.last_mut() {
            parent.items.extend(list_ctx.items);
            return;
        }

        if !list_ctx.items.is_empty() {
            self.blocks.push(Block::List {
                list_type: list_ctx.list_type,
                items: list_ctx.items,
            });
        }
    }

    /// Finalize parsing
    fn finalize(mut self) -> Vec<Block> {
        if !self.current.is_empty() {
            self.finish_block(BlockKind::Paragraph);
        }

        if self.blocks.is_empty() {
            self.blocks.push(Block::empty_paragraph());
        }
        self.blocks
    }
}

impl Default for MarkdownImporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Format;

    fn text(s: &str) -> Inline {
        Inline::Text(TextRun::new(s))
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let blocks =
            MarkdownImporter::parse("# Title\n\nFirst line\nsame paragraph.\n\n#### Deep\n");

        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    tag: HeadingTag::H1,
                    children: vec![text("Title")],
                },
                Block::paragraph("First line same paragraph."),
                Block::Heading {
                    tag: HeadingTag::H3,
                    children: vec![text("Deep")],
                },
            ]
        );
    }

    #[test]
    fn test_inline_formatting() {
        let blocks = MarkdownImporter::parse("plain *soft* **loud**");
        let italic = FormatFlags::new().with(Format::Italic);
        let bold = FormatFlags::new().with(Format::Bold);

        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                text("plain "),
                Inline::Text(TextRun::with_format("soft", italic)),
                text(" "),
                Inline::Text(TextRun::with_format("loud", bold)),
            ])]
        );
    }

    #[test]
    fn test_hard_break() {
        let blocks = MarkdownImporter::parse("one  \ntwo");
        assert_eq!(blocks[0].text_content(), "one\ntwo");
    }

    #[test]
    fn test_block_quote() {
        let blocks = MarkdownImporter::parse("> Call me Ishmael.\n>\n> Some years ago.");
        assert_eq!(
            blocks,
            vec![
                Block::Quote(vec![text("Call me Ishmael.")]),
                Block::Quote(vec![text("Some years ago.")]),
            ]
        );
    }

    #[test]
    fn test_lists() {
        let blocks = MarkdownImporter::parse("- apples\n- pears\n\n1. first\n2. second\n");

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::List {
                list_type: ListType::Bullet,
                items: vec![
                    ListItem::new(vec![text("apples")]),
                    ListItem::new(vec![text("pears")]),
                ],
            }
        );
        assert!(matches!(
            blocks[1],
            Block::List {
                list_type: ListType::Number,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_list_is_flattened() {
        let blocks = MarkdownImporter::parse("- outer\n  - inner\n- last\n");

        match &blocks[..] {
            [Block::List { items, .. }] => {
                let texts: Vec<String> = items.iter().map(ListItem::text_content).collect();
                assert_eq!(texts, vec!["outer", "inner", "last"]);
            }
            other => panic!("expected one list, got {:?}", other),
        }
    }

    #[test]
    fn test_code_block() {
        let blocks = MarkdownImporter::parse("```\nfn main() {}\nlet x = 1;\n```\n");
        assert_eq!(blocks[0].text_content(), "fn main() {}\nlet x = 1;");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(MarkdownImporter::parse(""), vec![Block::empty_paragraph()]);
        assert_eq!(MarkdownImporter::parse("\n\n  \n"), vec![Block::empty_paragraph()]);
    }
}
