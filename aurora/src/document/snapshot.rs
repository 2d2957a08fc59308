//! Serialized document snapshots
//!
//! A snapshot is a JSON tree rooted at `root`, each node tagged with its
//! `type`. Text nodes carry their formats as a bitmask. Unknown fields are
//! ignored on load so richer snapshots from other editors still parse as
//! long as they only use the node types below.

use serde::{Deserialize, Serialize};

use super::error::DocumentError;
use super::node::{Block, FormatFlags, HeadingTag, Inline, ListItem, ListType, TextRun};

/// Serializable snapshot of a whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedDocument {
    /// The root node
    pub root: SerializedNode,
}

/// One node of a snapshot tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SerializedNode {
    Root {
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Paragraph {
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Heading {
        tag: String,
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Quote {
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    List {
        #[serde(rename = "listType")]
        list_type: String,
        #[serde(default = "first_value")]
        start: u64,
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    #[serde(rename = "listitem")]
    ListItem {
        #[serde(default = "first_value")]
        value: u64,
        #[serde(default)]
        children: Vec<SerializedNode>,
    },
    Text {
        text: String,
        #[serde(default)]
        format: u32,
    },
    #[serde(rename = "linebreak")]
    LineBreak,
}

fn first_value() -> u64 {
    1
}

impl SerializedDocument {
    /// Snapshot of a document holding a single empty paragraph
    pub fn empty() -> Self {
        Self::from_blocks(&[Block::empty_paragraph()])
    }

    /// Build a snapshot from top-level blocks
    pub fn from_blocks(blocks: &[Block]) -> Self {
        Self {
            root: SerializedNode::Root {
                children: blocks.iter().map(serialize_block).collect(),
            },
        }
    }

    /// Parse a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::MalformedSnapshot(e.to_string()))
    }

    /// Render as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DocumentError::MalformedSnapshot(e.to_string()))
    }

    /// Rebuild the top-level blocks described by this snapshot
    ///
    /// # Returns
    /// * `Ok(Vec<Block>)` - The blocks, in document order
    /// * `Err(DocumentError)` - The tree uses a node where it cannot appear
    pub fn to_blocks(&self) -> Result<Vec<Block>, DocumentError> {
        let SerializedNode::Root { children } = &self.root else {
            return Err(DocumentError::UnsupportedNode(
                "snapshot must start at a root node".to_string(),
            ));
        };
        children.iter().map(deserialize_block).collect()
    }
}

impl Default for SerializedDocument {
    fn default() -> Self {
        Self::empty()
    }
}

fn serialize_block(block: &Block) -> SerializedNode {
    match block {
        Block::Paragraph(children) => SerializedNode::Paragraph {
            children: serialize_inlines(children),
        },
        Block::Heading { tag, children } => SerializedNode::Heading {
            tag: tag.as_str().to_string(),
            children: serialize_inlines(children),
        },
        Block::Quote(children) => SerializedNode::Quote {
            children: serialize_inlines(children),
        },
        Block::List { list_type, items } => SerializedNode::List {
            list_type: list_type.as_str().to_string(),
            start: 1,
            children: items
                .iter()
                .enumerate()
                .map(|(index, item)| SerializedNode::ListItem {
                    value: index as u64 + 1,
                    children: serialize_inlines(&item.children),
                })
                .collect(),
        },
    }
}

fn serialize_inlines(inlines: &[Inline]) -> Vec<SerializedNode> {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(run) => SerializedNode::Text {
                text: run.text.clone(),
                format: run.format.to_bits(),
            },
            Inline::LineBreak => SerializedNode::LineBreak,
        })
        .collect()
}

fn deserialize_block(node: &SerializedNode) -> Result<Block, DocumentError> {
    match node {
        SerializedNode::Paragraph { children } => {
            Ok(Block::Paragraph(deserialize_inlines(children)?))
        }
        SerializedNode::Heading { tag, children } => {
            let tag = HeadingTag::parse(tag)
                .ok_or_else(|| DocumentError::UnsupportedNode(format!("heading tag '{}'", tag)))?;
            Ok(Block::Heading {
                tag,
                children: deserialize_inlines(children)?,
            })
        }
        SerializedNode::Quote { children } => Ok(Block::Quote(deserialize_inlines(children)?)),
        SerializedNode::List {
            list_type,
            children,
            ..
        } => {
            let list_type = ListType::parse(list_type)
                .ok_or_else(|| {
                    DocumentError::UnsupportedNode(format!("list type '{}'", list_type))
                })?;
            let items = children
                .iter()
                .map(|child| match child {
                    SerializedNode::ListItem { children, .. } => {
                        Ok(ListItem::new(deserialize_inlines(children)?))
                    }
                    other => Err(unexpected(other, "list")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Block::List { list_type, items })
        }
        other => Err(unexpected(other, "root")),
    }
}

fn deserialize_inlines(nodes: &[SerializedNode]) -> Result<Vec<Inline>, DocumentError> {
    nodes
        .iter()
        .map(|node| match node {
            SerializedNode::Text { text, format } => Ok(Inline::Text(TextRun::with_format(
                text.clone(),
                FormatFlags::from_bits(*format),
            ))),
            SerializedNode::LineBreak => Ok(Inline::LineBreak),
            other => Err(unexpected(other, "block")),
        })
        .collect()
}

fn unexpected(node: &SerializedNode, parent: &str) -> DocumentError {
    let name = match node {
        SerializedNode::Root { .. } => "root",
        SerializedNode::Paragraph { .. } => "paragraph",
        SerializedNode::Heading { .. } => "heading",
        SerializedNode::Quote { .. } => "quote",
        SerializedNode::List { .. } => "list",
        SerializedNode::ListItem { .. } => "listitem",
        SerializedNode::Text { .. } => "text",
        SerializedNode::LineBreak => "linebreak",
    };
    DocumentError::UnsupportedNode(format!("'{}' inside {}", name, parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::Format;

    #[test]
    fn test_serialize_shape() {
        let blocks = vec![
            Block::Heading {
                tag: HeadingTag::H2,
                children: vec![Inline::Text(TextRun::new("Chapter"))],
            },
            Block::Paragraph(vec![Inline::Text(TextRun::with_format(
                "bold",
                FormatFlags::new().with(Format::Bold),
            ))]),
        ];
        let json = serde_json::to_value(SerializedDocument::from_blocks(&blocks)).unwrap();

        assert_eq!(json["root"]["type"], "root");
        assert_eq!(json["root"]["children"][0]["type"], "heading");
        assert_eq!(json["root"]["children"][0]["tag"], "h2");
        assert_eq!(json["root"]["children"][1]["children"][0]["format"], 1);
    }

    #[test]
    fn test_parse_foreign_snapshot() {
        // Extra fields such as direction and indent are ignored
        let json = r#"{
            "root": {
                "type": "root",
                "direction": "ltr",
                "children": [
                    {
                        "type": "list",
                        "listType": "number",
                        "start": 1,
                        "tag": "ol",
                        "children": [
                            {"type": "listitem", "value": 1, "indent": 0,
                             "children": [
                                {"type": "text", "text": "Item", "format": 2, "mode": "normal"}
                             ]}
                        ]
                    },
                    {"type": "paragraph", "children": [
                        {"type": "text", "text": "a"},
                        {"type": "linebreak"},
                        {"type": "text", "text": "b"}
                    ]}
                ]
            }
        }"#;

        let blocks = SerializedDocument::from_json(json).unwrap().to_blocks().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text_content(), "Item");
        assert_eq!(blocks[1].text_content(), "a\nb");
        match &blocks[0] {
            Block::List { list_type, items } => {
                assert_eq!(*list_type, ListType::Number);
                assert_eq!(
                    items[0].children[0],
                    Inline::Text(TextRun::with_format(
                        "Item",
                        FormatFlags::new().with(Format::Italic)
                    ))
                );
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_misplaced_nodes() {
        let json = r#"{"root": {"type": "root", "children": [{"type": "text", "text": "loose"}]}}"#;
        let err = SerializedDocument::from_json(json).unwrap().to_blocks().unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedNode(_)));

        let json = r#"{"root": {"type": "root", "children": [{"type": "heading", "tag": "h5"}]}}"#;
        assert!(SerializedDocument::from_json(json).unwrap().to_blocks().is_err());

        assert!(matches!(
            SerializedDocument::from_json("{not json"),
            Err(DocumentError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_empty_snapshot() {
        let blocks = SerializedDocument::empty().to_blocks().unwrap();
        assert_eq!(blocks, vec![Block::empty_paragraph()]);
    }
}
