// src/feed.rs
//! RSS 2.0 feed of published posts, and the reader used by search.

use crate::error::AppError;
use crate::model::{post_link, Post, SiteDatabase};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// One `<item>` of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub pub_date: Option<String>,
}

/// Absolute URL of a post: `{site}{base_path}posts/{slug}`.
pub fn absolute_post_url(site: &str, base_path: &str, slug: &str) -> String {
    format!("{}{}", site.trim_end_matches('/'), post_link(base_path, slug))
}

/// Absolute URL of the blog's home page: `{site}{base_path}`.
pub fn site_home_url(site: &str, base_path: &str) -> String {
    let site = site.trim_end_matches('/');
    match base_path.trim_matches('/') {
        "" => format!("{}/", site),
        base => format!("{}/{}/", site, base),
    }
}

/// The feed items for `posts`, in the order given.
pub fn feed_items(site: &str, base_path: &str, posts: &[Post]) -> Vec<FeedItem> {
    posts
        .iter()
        .map(|post| FeedItem {
            title: post.title.clone(),
            link: absolute_post_url(site, base_path, post.slug.as_str()),
            description: post.excerpt.clone(),
            pub_date: post
                .date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().to_rfc2822()),
        })
        .collect()
}

/// Serializes the site feed.
pub fn render_feed(
    site: &str,
    base_path: &str,
    database: &SiteDatabase,
    posts: &[Post],
) -> Result<String, AppError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("rss").with_attributes([("version", "2.0")]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;
    write_text_element(&mut writer, "title", &database.title)?;
    write_text_element(&mut writer, "description", &database.description)?;
    write_text_element(&mut writer, "link", &site_home_url(site, base_path))?;

    let items = feed_items(site, base_path, posts);
    for item in &items {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &item.title)?;
        write_text_element(&mut writer, "link", &item.link)?;
        write_text_element(&mut writer, "guid", &item.link)?;
        if let Some(description) = &item.description {
            write_text_element(&mut writer, "description", description)?;
        }
        if let Some(pub_date) = &item.pub_date {
            write_text_element(&mut writer, "pubDate", pub_date)?;
        }
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    log::debug!("Rendered feed with {} items", items.len());
    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| AppError::Render(format!("feed is not UTF-8: {}", e)))
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<(), AppError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Link,
    Description,
    PubDate,
}

/// Reads the `<item>` elements of an RSS document, in document order.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, AppError> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut current: Option<FeedItem> = None;
    let mut field: Option<ItemField> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => current = Some(FeedItem::default()),
                b"title" if current.is_some() => field = Some(ItemField::Title),
                b"link" if current.is_some() => field = Some(ItemField::Link),
                b"description" if current.is_some() => field = Some(ItemField::Description),
                b"pubDate" if current.is_some() => field = Some(ItemField::PubDate),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    append_field(item, f, &e.unescape()?);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    append_field(item, f, &String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                    field = None;
                }
                b"title" | b"link" | b"description" | b"pubDate" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(items)
}

fn append_field(item: &mut FeedItem, field: ItemField, text: &str) {
    let target = match field {
        ItemField::Title => &mut item.title,
        ItemField::Link => &mut item.link,
        ItemField::Description => item.description.get_or_insert_with(String::new),
        ItemField::PubDate => item.pub_date.get_or_insert_with(String::new),
    };
    target.push_str(text);
}
