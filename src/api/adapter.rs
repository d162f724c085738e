// src/api/adapter.rs
//! Adapter layer for converting Notion wire types to our domain model.

use super::responses::*;
use crate::error::AppError;
use crate::model::blocks::*;
use crate::model::common::BlockCommon;
use crate::model::{Block, Post, SelectProperty, SiteDatabase};
use crate::types::{
    Annotations, BlockId, Color, DatabaseId, EquationData, Link, Mention, PageId, RichTextItem,
    RichTextType, Slug,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Property names of the posts database
pub mod properties {
    pub const SLUG: &str = "Slug";
    pub const DATE: &str = "Date";
    pub const TAGS: &str = "Tags";
    pub const EXCERPT: &str = "Excerpt";
    pub const FEATURED_IMAGE: &str = "FeaturedImage";
    pub const RANK: &str = "Rank";
    pub const PUBLISHED: &str = "Published";
}

impl ToDomain<Post> for NotionPage {
    fn to_domain(self) -> Result<Post, AppError> {
        convert_post(self)
    }
}

impl ToDomain<SiteDatabase> for NotionDatabase {
    fn to_domain(self) -> Result<SiteDatabase, AppError> {
        Ok(convert_database(self))
    }
}

impl ToDomain<Block> for NotionBlock {
    fn to_domain(self) -> Result<Block, AppError> {
        convert_block(self)
    }
}

/// Convert a row of the posts database into a `Post`.
///
/// The title is read from whichever property has the `title` type; every
/// other field is looked up by its property name.
pub fn convert_post(page: NotionPage) -> Result<Post, AppError> {
    let page_id = PageId::parse(&page.id)?;

    let title = page
        .properties
        .values()
        .find_map(|p| match p {
            PropertyDto::Title { title } => Some(plain_text(title)),
            _ => None,
        })
        .unwrap_or_default();

    let slug = match page.properties.get(properties::SLUG) {
        Some(PropertyDto::RichText { rich_text }) => plain_text(rich_text),
        _ => String::new(),
    };
    let slug = Slug::new(slug)?;

    let date = match page.properties.get(properties::DATE) {
        Some(PropertyDto::Date { date: Some(date) }) => parse_notion_date(&date.start),
        _ => None,
    };

    let tags = match page.properties.get(properties::TAGS) {
        Some(PropertyDto::MultiSelect { multi_select }) => {
            multi_select.iter().map(convert_select).collect()
        }
        _ => Vec::new(),
    };

    let excerpt = match page.properties.get(properties::EXCERPT) {
        Some(PropertyDto::RichText { rich_text }) => {
            Some(plain_text(rich_text)).filter(|s| !s.is_empty())
        }
        _ => None,
    };

    let featured_image = match page.properties.get(properties::FEATURED_IMAGE) {
        Some(PropertyDto::Files { files }) => files.first().cloned().map(convert_file),
        _ => None,
    };

    let rank = match page.properties.get(properties::RANK) {
        Some(PropertyDto::Number { number: Some(n) }) => n.round() as i64,
        _ => 0,
    };

    Ok(Post {
        page_id,
        slug,
        title,
        icon: page.icon.and_then(convert_icon),
        cover: page.cover.map(convert_file),
        tags,
        excerpt,
        featured_image,
        rank,
        date,
    })
}

/// Whether a raw page carries `Published = true`.
pub fn is_published(page: &NotionPage) -> bool {
    matches!(
        page.properties.get(properties::PUBLISHED),
        Some(PropertyDto::Checkbox { checkbox: true })
    )
}

pub fn convert_database(db: NotionDatabase) -> SiteDatabase {
    SiteDatabase {
        title: plain_text(&db.title),
        description: plain_text(&db.description),
        icon: db.icon.and_then(convert_icon),
        cover: db.cover.map(convert_file),
    }
}

/// Convert a block, keeping unknown or unreadable payloads as `Unsupported`.
pub fn convert_block(notion_block: NotionBlock) -> Result<Block, AppError> {
    let common = BlockCommon {
        id: BlockId::parse(&notion_block.id)?,
        children: Vec::new(),
        has_children: notion_block.has_children,
    };
    let block_type = notion_block.block_type.clone();
    let payload = notion_block.type_payload();

    let converted = match block_type.as_str() {
        "paragraph" => payload_as::<TextPayload>(payload).map(|p| {
            Block::Paragraph(ParagraphBlock {
                common: common.clone(),
                content: text_content(p.rich_text, &p.color),
            })
        }),
        "heading_1" | "heading_2" | "heading_3" => payload_as::<TextPayload>(payload).map(|p| {
            let heading = HeadingBlock {
                common: common.clone(),
                content: text_content(p.rich_text, &p.color),
                is_toggleable: p.is_toggleable,
            };
            match block_type.as_str() {
                "heading_1" => Block::Heading1(heading),
                "heading_2" => Block::Heading2(heading),
                _ => Block::Heading3(heading),
            }
        }),
        "bulleted_list_item" | "numbered_list_item" => {
            payload_as::<TextPayload>(payload).map(|p| {
                let item = ListItemBlock {
                    common: common.clone(),
                    content: text_content(p.rich_text, &p.color),
                };
                if block_type == "bulleted_list_item" {
                    Block::BulletedListItem(item)
                } else {
                    Block::NumberedListItem(item)
                }
            })
        }
        "to_do" => payload_as::<TextPayload>(payload).map(|p| {
            Block::ToDo(ToDoBlock {
                common: common.clone(),
                content: text_content(p.rich_text, &p.color),
                checked: p.checked,
            })
        }),
        "toggle" => payload_as::<TextPayload>(payload).map(|p| {
            Block::Toggle(ToggleBlock {
                common: common.clone(),
                content: text_content(p.rich_text, &p.color),
            })
        }),
        "quote" => payload_as::<TextPayload>(payload).map(|p| {
            Block::Quote(QuoteBlock {
                common: common.clone(),
                content: text_content(p.rich_text, &p.color),
            })
        }),
        "callout" => payload_as::<TextPayload>(payload).map(|p| {
            Block::Callout(CalloutBlock {
                common: common.clone(),
                icon: p.icon.and_then(convert_icon),
                content: text_content(p.rich_text, &p.color),
            })
        }),
        "code" => payload_as::<CodePayload>(payload).map(|p| {
            Block::Code(CodeBlock {
                common: common.clone(),
                language: p.language,
                caption: convert_rich_text_array(p.caption),
                content: text_content(p.rich_text, "default"),
            })
        }),
        "equation" => payload_as::<EquationDto>(payload).map(|p| {
            Block::Equation(EquationBlock {
                common: common.clone(),
                expression: p.expression,
            })
        }),
        "image" | "video" | "file" => payload_as::<MediaPayload>(payload).map(|p| {
            let media = MediaBlock {
                common: common.clone(),
                file: convert_file(p.file),
                caption: convert_rich_text_array(p.caption),
            };
            match block_type.as_str() {
                "image" => Block::Image(media),
                "video" => Block::Video(media),
                _ => Block::File(media),
            }
        }),
        "bookmark" => payload_as::<UrlPayload>(payload).map(|p| {
            Block::Bookmark(BookmarkBlock {
                common: common.clone(),
                url: p.url,
                caption: convert_rich_text_array(p.caption),
            })
        }),
        "embed" | "link_preview" => payload_as::<UrlPayload>(payload).map(|p| {
            let embed = EmbedBlock {
                common: common.clone(),
                url: p.url,
            };
            if block_type == "embed" {
                Block::Embed(embed)
            } else {
                Block::LinkPreview(embed)
            }
        }),
        "divider" => Ok(Block::Divider(DividerBlock {
            common: common.clone(),
        })),
        "table_of_contents" => payload_as::<ColorPayload>(payload).map(|p| {
            Block::TableOfContents(TableOfContentsBlock {
                common: common.clone(),
                color: Color::from_api(&p.color),
            })
        }),
        "table" => payload_as::<TablePayload>(payload).map(|p| {
            Block::Table(TableBlock {
                common: common.clone(),
                table_width: p.table_width,
                has_column_header: p.has_column_header,
                has_row_header: p.has_row_header,
            })
        }),
        "table_row" => payload_as::<TableRowPayload>(payload).map(|p| {
            Block::TableRow(TableRowBlock {
                common: common.clone(),
                cells: p.cells.into_iter().map(convert_rich_text_array).collect(),
            })
        }),
        "column_list" => Ok(Block::ColumnList(ColumnListBlock {
            common: common.clone(),
        })),
        "column" => Ok(Block::Column(ColumnBlock {
            common: common.clone(),
        })),
        "synced_block" => payload_as::<SyncedPayload>(payload).map(|p| {
            Block::Synced(SyncedBlock {
                common: common.clone(),
                synced_from: p
                    .synced_from
                    .and_then(|s| BlockId::parse(&s.block_id).ok())
                    .map(|block_id| SyncedFrom { block_id }),
            })
        }),
        "link_to_page" => payload_as::<LinkToPagePayload>(payload).and_then(|p| {
            let target = match p {
                LinkToPagePayload::PageId { page_id } => LinkTarget::Page(PageId::parse(&page_id)?),
                LinkToPagePayload::DatabaseId { database_id } => {
                    LinkTarget::Database(DatabaseId::parse(&database_id)?)
                }
                LinkToPagePayload::Other => {
                    return Err(AppError::MalformedResponse(
                        "link_to_page without a page or database target".to_string(),
                    ))
                }
            };
            Ok(Block::LinkToPage(LinkToPageBlock {
                common: common.clone(),
                target,
            }))
        }),
        _ => {
            log::debug!("Unsupported block type: {}", block_type);
            return Ok(unsupported(common, block_type));
        }
    };

    match converted {
        Ok(block) => Ok(block),
        Err(e) => {
            log::warn!(
                "Could not read {} block {}: {}",
                block_type,
                common.id.as_str(),
                e
            );
            Ok(unsupported(common, block_type))
        }
    }
}

fn unsupported(common: BlockCommon, block_type: String) -> Block {
    Block::Unsupported(UnsupportedBlock { common, block_type })
}

fn payload_as<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, AppError> {
    Ok(serde_json::from_value(payload)?)
}

fn text_content(rich_text: Vec<RichTextDto>, color: &str) -> TextBlockContent {
    TextBlockContent {
        rich_text: convert_rich_text_array(rich_text),
        color: Color::from_api(color),
    }
}

pub fn convert_rich_text_array(items: Vec<RichTextDto>) -> Vec<RichTextItem> {
    items.into_iter().map(convert_rich_text).collect()
}

pub fn convert_rich_text(item: RichTextDto) -> RichTextItem {
    let plain_text = item.plain_text;
    let text_type = match item.content {
        RichTextContentDto::Text { text } => RichTextType::Text {
            content: text.content,
            link: text.link.map(|l| Link { url: l.url }),
        },
        RichTextContentDto::Equation { equation } => RichTextType::Equation(EquationData {
            expression: equation.expression,
        }),
        RichTextContentDto::Mention { mention } => match convert_mention(mention) {
            Some(mention) => RichTextType::Mention(mention),
            None => RichTextType::Text {
                content: plain_text.clone(),
                link: None,
            },
        },
    };

    RichTextItem {
        text_type,
        annotations: Annotations {
            bold: item.annotations.bold,
            italic: item.annotations.italic,
            strikethrough: item.annotations.strikethrough,
            underline: item.annotations.underline,
            code: item.annotations.code,
            color: Color::from_api(&item.annotations.color),
        },
        plain_text,
        href: item.href,
    }
}

fn convert_mention(mention: MentionDto) -> Option<Mention> {
    match mention {
        MentionDto::Page { page } => PageId::parse(&page.id).ok().map(|id| Mention::Page { id }),
        MentionDto::Database { database } => DatabaseId::parse(&database.id)
            .ok()
            .map(|id| Mention::Database { id }),
        MentionDto::User { user } => Some(Mention::User { name: user.name }),
        MentionDto::Date { date } => Some(Mention::Date {
            start: date.start,
            end: date.end,
        }),
        MentionDto::LinkPreview { link_preview } => Some(Mention::LinkPreview {
            url: link_preview.url,
        }),
        MentionDto::Other => None,
    }
}

pub fn convert_file(file: FileDto) -> FileObject {
    match file {
        FileDto::External { external } => FileObject::External { url: external.url },
        FileDto::File { file } => FileObject::File {
            url: file.url,
            expiry_time: file.expiry_time,
        },
    }
}

fn convert_icon(icon: IconDto) -> Option<Icon> {
    match icon {
        IconDto::Emoji { emoji } => Some(Icon::Emoji { emoji }),
        IconDto::External { external } => Some(Icon::File(FileObject::External {
            url: external.url,
        })),
        IconDto::File { file } => Some(Icon::File(FileObject::File {
            url: file.url,
            expiry_time: file.expiry_time,
        })),
        IconDto::Other => None,
    }
}

fn convert_select(select: &SelectDto) -> SelectProperty {
    SelectProperty {
        id: select.id.clone(),
        name: select.name.clone(),
        color: Color::from_api(&select.color),
    }
}

fn plain_text(items: &[RichTextDto]) -> String {
    items.iter().map(|i| i.plain_text.as_str()).collect()
}

/// Notion dates are either `YYYY-MM-DD` or a full ISO timestamp.
fn parse_notion_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
