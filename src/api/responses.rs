// src/api/responses.rs
//! Wire types for the Notion REST API.
//!
//! These mirror the JSON payloads closely and are converted into the domain
//! model through `ToDomain`. Only the fields the blog reads are declared;
//! serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Error body returned by Notion for non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct NotionError {
    #[serde(default)]
    pub object: String,
    pub status: u16,
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

/// Trait for converting wire types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, crate::error::AppError>;
}

// --- Shared objects ---

#[derive(Debug, Clone, Deserialize)]
pub struct UrlDto {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostedFileDto {
    pub url: String,
    pub expiry_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileDto {
    External { external: UrlDto },
    File { file: HostedFileDto },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IconDto {
    Emoji { emoji: String },
    External { external: UrlDto },
    File { file: HostedFileDto },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRefDto {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateDto {
    pub start: String,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectDto {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

// --- Rich text ---

#[derive(Debug, Clone, Deserialize)]
pub struct RichTextDto {
    #[serde(flatten)]
    pub content: RichTextContentDto,
    #[serde(default)]
    pub annotations: AnnotationsDto,
    #[serde(default)]
    pub plain_text: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextContentDto {
    Text { text: TextDto },
    Mention { mention: MentionDto },
    Equation { equation: EquationDto },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextDto {
    pub content: String,
    pub link: Option<UrlDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EquationDto {
    pub expression: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MentionDto {
    Page { page: IdRefDto },
    Database { database: IdRefDto },
    User { user: UserDto },
    Date { date: DateDto },
    LinkPreview { link_preview: UrlDto },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationsDto {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "default".to_string()
}

impl Default for AnnotationsDto {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}

// --- Pages and databases ---

#[derive(Debug, Clone, Deserialize)]
pub struct NotionPage {
    pub id: String,
    pub icon: Option<IconDto>,
    pub cover: Option<FileDto>,
    #[serde(default)]
    pub properties: HashMap<String, PropertyDto>,
}

/// Page property values the posts database uses
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyDto {
    Title { title: Vec<RichTextDto> },
    RichText { rich_text: Vec<RichTextDto> },
    Date { date: Option<DateDto> },
    MultiSelect { multi_select: Vec<SelectDto> },
    Files { files: Vec<FileDto> },
    Number { number: Option<f64> },
    Checkbox { checkbox: bool },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotionDatabase {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichTextDto>,
    #[serde(default)]
    pub description: Vec<RichTextDto>,
    pub icon: Option<IconDto>,
    pub cover: Option<FileDto>,
}

// --- Blocks ---

/// A block keeps its type-specific payload untyped until conversion, so
/// unknown block types survive parsing and become `Block::Unsupported`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl NotionBlock {
    /// The object stored under the block's own type key.
    pub fn type_payload(&self) -> Value {
        self.payload
            .get(&self.block_type)
            .cloned()
            .unwrap_or(Value::Object(Map::new()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextDto>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_toggleable: bool,
    #[serde(default)]
    pub checked: bool,
    pub icon: Option<IconDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodePayload {
    #[serde(default)]
    pub rich_text: Vec<RichTextDto>,
    #[serde(default)]
    pub caption: Vec<RichTextDto>,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaPayload {
    #[serde(flatten)]
    pub file: FileDto,
    #[serde(default)]
    pub caption: Vec<RichTextDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlPayload {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichTextDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TablePayload {
    #[serde(default)]
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRowPayload {
    #[serde(default)]
    pub cells: Vec<Vec<RichTextDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncedPayload {
    pub synced_from: Option<SyncedFromDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncedFromDto {
    pub block_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorPayload {
    #[serde(default = "default_color")]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkToPagePayload {
    PageId { page_id: String },
    DatabaseId { database_id: String },
    #[serde(other)]
    Other,
}
