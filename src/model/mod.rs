mod block;
pub mod blocks;
pub mod common;

pub use block::Block;
pub use blocks::*;
pub use common::*;

use crate::types::{PageId, RichTextItem, Slug};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A published blog post, read from one row of the posts database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub page_id: PageId,
    pub slug: Slug,
    pub title: String,
    pub icon: Option<Icon>,
    pub cover: Option<FileObject>,
    pub tags: Vec<SelectProperty>,
    pub excerpt: Option<String>,
    pub featured_image: Option<FileObject>,
    pub rank: i64,
    pub date: Option<NaiveDate>,
}

impl Post {
    /// Emoji used for the page icon, when the icon is an emoji.
    pub fn emoji(&self) -> Option<&str> {
        self.icon.as_ref().and_then(Icon::emoji)
    }

    /// Site-relative link to the post, honoring the configured base path.
    pub fn link(&self, base_path: &str) -> String {
        post_link(base_path, self.slug.as_str())
    }

    /// Listing order: rank descending, then date descending, undated last.
    pub fn listing_order(a: &Post, b: &Post) -> Ordering {
        b.rank.cmp(&a.rank).then_with(|| match (&a.date, &b.date) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
    }
}

pub fn post_link(base_path: &str, slug: &str) -> String {
    let base = base_path.trim_end_matches('/');
    format!("{}/posts/{}", base, slug)
}

/// Site-level metadata carried by the posts database itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SiteDatabase {
    pub title: String,
    pub description: String,
    pub icon: Option<Icon>,
    pub cover: Option<FileObject>,
}

impl SiteDatabase {
    pub fn from_rich_text(
        title: &[RichTextItem],
        description: &[RichTextItem],
        icon: Option<Icon>,
        cover: Option<FileObject>,
    ) -> Self {
        Self {
            title: crate::types::plain_text_of(title),
            description: crate::types::plain_text_of(description),
            icon,
            cover,
        }
    }
}

/// A select or multi-select option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectProperty {
    pub id: Option<String>,
    pub name: String,
    pub color: crate::types::Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, rank: i64, date: Option<&str>) -> Post {
        Post {
            page_id: PageId::new_v4(),
            slug: Slug::new(slug).unwrap(),
            title: slug.to_string(),
            icon: None,
            cover: None,
            tags: vec![],
            excerpt: None,
            featured_image: None,
            rank,
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        }
    }

    #[test]
    fn listing_order_uses_rank_then_date() {
        let mut posts = vec![
            post("old", 0, Some("2023-01-01")),
            post("undated", 0, None),
            post("pinned", 5, Some("2020-01-01")),
            post("new", 0, Some("2024-06-01")),
        ];
        posts.sort_by(Post::listing_order);
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["pinned", "new", "old", "undated"]);
    }

    #[test]
    fn post_link_respects_base_path() {
        assert_eq!(post_link("/", "hello"), "/posts/hello");
        assert_eq!(post_link("/blog/", "hello"), "/blog/posts/hello");
        assert_eq!(post_link("/blog", "hello"), "/blog/posts/hello");
    }

    #[test]
    fn emoji_comes_only_from_emoji_icons() {
        let mut p = post("a", 0, None);
        assert_eq!(p.emoji(), None);
        p.icon = Some(Icon::Emoji {
            emoji: "🚀".to_string(),
        });
        assert_eq!(p.emoji(), Some("🚀"));
        p.icon = Some(Icon::File(FileObject::External {
            url: "https://example.com/i.png".to_string(),
        }));
        assert_eq!(p.emoji(), None);
    }
}
