//! Shared types for blockwiki
//!
//! This crate provides the content model shared by the loader, the list
//! grouper and the renderers: block trees, inline rich-text runs, page
//! metadata and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a page or block in canonical dashed form
/// (`c3d85220-62aa-457a-b414-90c5e9929790`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build a dashed identifier from 32 bare hex characters.
    ///
    /// Returns `None` unless the input is exactly 32 ASCII hex digits.
    pub fn from_compact(hex: &str) -> Option<Self> {
        if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(add_dashes(hex)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier with every dash removed.
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }

    /// First `len` characters of the compact form.
    pub fn prefix(&self, len: usize) -> String {
        self.compact().chars().take(len).collect()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        BlockId(id.to_string())
    }
}

/// Reformat hex into the 8-4-4-4-12 group layout.
///
/// Input shorter than 32 characters yields shorter (possibly empty) groups.
pub fn add_dashes(hex: &str) -> String {
    let bounds = [(0, 8), (8, 12), (12, 16), (16, 20), (20, 32)];
    bounds
        .iter()
        .map(|&(start, end)| hex.get(start..end.min(hex.len())).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("-")
}

/// Which kind of list an item or container belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// Page or callout icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { url: String },
}

impl Icon {
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Icon::Emoji { emoji } => Some(emoji),
            Icon::External { .. } => None,
        }
    }
}

/// Where an image block's bytes live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Hosted by the content source; must be downloaded and cached.
    Hosted { url: String },
    /// Referenced directly by URL; never fetched.
    External { url: String },
    Unknown { kind: String },
}

/// Formatting flags on a text run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// Target of a mention run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mention {
    Page { id: BlockId },
    Date { start: String, end: Option<String> },
    Unknown { kind: String },
}

/// One inline segment of rich text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text {
        content: String,
        #[serde(default)]
        annotations: Annotations,
        #[serde(default)]
        link: Option<String>,
    },
    Mention {
        mention: Mention,
        /// Label that replaces the mentioned page's own title.
        #[serde(default)]
        label: Option<String>,
    },
    Equation {
        expression: String,
    },
    Unknown {
        kind: String,
    },
}

impl RichText {
    /// Unformatted, unlinked text run
    pub fn plain(content: impl Into<String>) -> Self {
        RichText::Text {
            content: content.into(),
            annotations: Annotations::default(),
            link: None,
        }
    }
}

/// Concatenate the raw content of every text run, ignoring mentions and equations.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter()
        .filter_map(|run| match run {
            RichText::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

/// Typed payload of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Synthetic container introduced by the list grouper
    List { list: ListKind },
    ListItem { list: ListKind, text: Vec<RichText> },
    Paragraph { text: Vec<RichText> },
    Heading { level: HeadingLevel, text: Vec<RichText> },
    Toggle { text: Vec<RichText> },
    Code { language: String, text: Vec<RichText> },
    Equation { expression: String },
    Image { source: ImageSource, caption: Vec<RichText> },
    ToDo { checked: bool, text: Vec<RichText> },
    Quote { text: Vec<RichText> },
    Divider,
    Unsupported,
    Callout { icon: Option<Icon>, text: Vec<RichText> },
    Embed { url: String },
    LinkToPage { page_id: BlockId },
    Unknown { kind: String },
}

impl BlockKind {
    /// Type tag as used in logs
    pub fn name(&self) -> &str {
        match self {
            BlockKind::List { list: ListKind::Bulleted } => "bulleted_list",
            BlockKind::List { list: ListKind::Numbered } => "numbered_list",
            BlockKind::ListItem { list: ListKind::Bulleted, .. } => "bulleted_list_item",
            BlockKind::ListItem { list: ListKind::Numbered, .. } => "numbered_list_item",
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { level: HeadingLevel::H1, .. } => "heading_1",
            BlockKind::Heading { level: HeadingLevel::H2, .. } => "heading_2",
            BlockKind::Heading { level: HeadingLevel::H3, .. } => "heading_3",
            BlockKind::Toggle { .. } => "toggle",
            BlockKind::Code { .. } => "code",
            BlockKind::Equation { .. } => "equation",
            BlockKind::Image { .. } => "image",
            BlockKind::ToDo { .. } => "to_do",
            BlockKind::Quote { .. } => "quote",
            BlockKind::Divider => "divider",
            BlockKind::Unsupported => "unsupported",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Embed { .. } => "embed",
            BlockKind::LinkToPage { .. } => "link_to_page",
            BlockKind::Unknown { kind } => kind,
        }
    }
}

/// A node of a page's content tree. Children are owned exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// True for list items of the given kind
    pub fn is_list_item(&self, list: ListKind) -> bool {
        matches!(&self.kind, BlockKind::ListItem { list: l, .. } if *l == list)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        BlockId(id)
    }
}

/// A block as returned by one page of a children listing, before its own
/// children have been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub has_children: bool,
}

/// Page metadata as listed by the content source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub id: BlockId,
    pub title: String,
    #[serde(default)]
    pub icon: Option<Icon>,
    /// Explicit output filename override
    #[serde(default)]
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_dashes_formats_groups() {
        assert_eq!(
            add_dashes("c3d8522062aa457ab41490c5e9929790"),
            "c3d85220-62aa-457a-b414-90c5e9929790"
        );
    }

    #[test]
    fn from_compact_rejects_non_hex() {
        assert!(BlockId::from_compact("not-an-id").is_none());
        assert!(BlockId::from_compact("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").is_none());
        let id = BlockId::from_compact("c3d8522062aa457ab41490c5e9929790").unwrap();
        assert_eq!(id.as_str(), "c3d85220-62aa-457a-b414-90c5e9929790");
    }

    #[test]
    fn compact_and_prefix() {
        let id = BlockId::new("abc12345-0000-1111-2222-333344445555");
        assert_eq!(id.compact(), "abc12345000011112222333344445555");
        assert_eq!(id.prefix(8), "abc12345");
    }

    #[test]
    fn plain_text_skips_non_text_runs() {
        let runs = vec![
            RichText::plain("Hello "),
            RichText::Equation {
                expression: "x".into(),
            },
            RichText::plain("world"),
        ];
        assert_eq!(plain_text(&runs), "Hello world");
    }

    #[test]
    fn list_item_matches_only_its_kind() {
        let item = Block::new(
            "a",
            BlockKind::ListItem {
                list: ListKind::Bulleted,
                text: vec![],
            },
        );
        assert!(item.is_list_item(ListKind::Bulleted));
        assert!(!item.is_list_item(ListKind::Numbered));
    }
}
