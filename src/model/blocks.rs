use super::common::BlockCommon;
use crate::types::{BlockId, Color, DatabaseId, PageId, RichTextItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rich text plus the block-level color most text blocks carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextItem>,
    pub color: Color,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextItem>) -> Self {
        Self {
            rich_text,
            color: Color::Default,
        }
    }
}

/// Paragraph block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParagraphBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading block; the level lives in the `Block` variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeadingBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub is_toggleable: bool,
}

/// Bulleted or numbered list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListItemBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub checked: bool,
}

/// Toggle block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToggleBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Quote block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuoteBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Callout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub icon: Option<Icon>,
    pub content: TextBlockContent,
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub language: String,
    pub caption: Vec<RichTextItem>,
    pub content: TextBlockContent,
}

impl CodeBlock {
    /// The source text, concatenated from every span.
    pub fn source(&self) -> String {
        self.content
            .rich_text
            .iter()
            .map(|item| match &item.text_type {
                crate::types::RichTextType::Text { content, .. } => content.as_str(),
                _ => item.plain_text.as_str(),
            })
            .collect()
    }
}

/// Equation block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquationBlock {
    pub common: BlockCommon,
    pub expression: String,
}

/// Image, video or file block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaBlock {
    pub common: BlockCommon,
    pub file: FileObject,
    pub caption: Vec<RichTextItem>,
}

/// Embed or link preview block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EmbedBlock {
    pub common: BlockCommon,
    pub url: String,
}

/// Bookmark block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BookmarkBlock {
    pub common: BlockCommon,
    pub url: String,
    pub caption: Vec<RichTextItem>,
}

/// Divider block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// Table block; rows arrive as `TableRow` children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    pub cells: Vec<Vec<RichTextItem>>,
}

/// Column list block; columns arrive as `Column` children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnListBlock {
    pub common: BlockCommon,
}

/// Column block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnBlock {
    pub common: BlockCommon,
}

/// Synced block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SyncedBlock {
    pub common: BlockCommon,
    pub synced_from: Option<SyncedFrom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedFrom {
    pub block_id: BlockId,
}

/// Table of contents block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableOfContentsBlock {
    pub common: BlockCommon,
    pub color: Color,
}

/// Link to page block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkToPageBlock {
    pub common: BlockCommon,
    pub target: LinkTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkTarget {
    Page(PageId),
    Database(DatabaseId),
}

/// A block whose type tag this crate does not know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}

/// Reference to binary content hosted by Notion or elsewhere.
///
/// `File` URLs are signed and expire; they must be localized rather than
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileObject {
    External {
        url: String,
    },
    File {
        url: String,
        expiry_time: Option<DateTime<Utc>>,
    },
}

impl FileObject {
    pub fn url(&self) -> &str {
        match self {
            FileObject::External { url } | FileObject::File { url, .. } => url,
        }
    }

    /// Whether the URL is a Notion-hosted, expiring one.
    pub fn is_internal(&self) -> bool {
        matches!(self, FileObject::File { .. })
    }
}

/// Page, database or callout icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Icon {
    Emoji { emoji: String },
    File(FileObject),
}

impl Icon {
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Icon::Emoji { emoji } => Some(emoji),
            Icon::File(_) => None,
        }
    }

    pub fn file(&self) -> Option<&FileObject> {
        match self {
            Icon::Emoji { .. } => None,
            Icon::File(file) => Some(file),
        }
    }
}
