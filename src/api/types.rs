// src/api/types.rs
//! Type definitions for the Notion API module.

use super::adapter::properties;
use crate::model::Post;
use serde::Deserialize;
use serde_json::{json, Value};

// --- Query Types ---

/// Which rows of the posts database a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostQuery {
    /// Every published post
    Published,
    /// The published post whose `Slug` equals the given value
    BySlug(String),
}

impl PostQuery {
    /// The `filter` object sent with a database query.
    pub fn to_filter(&self) -> Value {
        let published = json!({
            "property": properties::PUBLISHED,
            "checkbox": { "equals": true }
        });
        match self {
            PostQuery::Published => published,
            PostQuery::BySlug(slug) => json!({
                "and": [
                    published,
                    {
                        "property": properties::SLUG,
                        "rich_text": { "equals": slug }
                    }
                ]
            }),
        }
    }

    /// Server-side sort order; callers still sort locally.
    pub fn to_sorts(&self) -> Value {
        json!([
            { "property": properties::RANK, "direction": "descending" },
            { "property": properties::DATE, "direction": "descending" }
        ])
    }

    /// Evaluates the filter against an already-parsed post.
    pub fn matches(&self, post: &Post, published: bool) -> bool {
        match self {
            PostQuery::Published => published,
            PostQuery::BySlug(slug) => published && post.slug.as_str() == slug,
        }
    }
}

// --- API Response Types ---

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

// --- Pagination Types ---

/// Result of a pagination operation.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}
