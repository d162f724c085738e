// src/lib.rs
//! notion-blog library: a Notion database served as a blog.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `SiteConfig`
//! - **Domain model**: `Post`, `SiteDatabase`, `Block` and the block structs
//! - **Content client**: `ContentClient` over a `NotionRepository`
//! - **Rendering**: `render_blocks`, `render_rich_text`, `compose_post_html`
//! - **Assets**: `AssetDownloader`, `local_asset_path`, `local_asset_url`
//! - **OG images**: `OgService`, `EmojiCache`
//! - **Feed and search**: `render_feed`, `parse_feed`, `SearchSession`
//! - **Server**: `create_router`, `AppState`

pub mod api;
pub mod assets;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod feed;
pub mod formatting;
pub mod model;
pub mod og;
pub mod remote;
pub mod search;
pub mod server;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, SiteConfig};

// --- Domain Model ---
pub use crate::model::{Block, BlockCommon, FileObject, Icon, Post, SelectProperty, SiteDatabase};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, Color, DatabaseId, PageId, RichTextItem, RichTextType, Slug,
    ValidatedUrl,
};

// --- Content ---
pub use crate::api::{ContentClient, InMemoryRepository, NotionHttpClient, NotionRepository};
pub use crate::remote::{HttpFetcher, RemoteFetcher, StaticFetcher};

// --- Rendering ---
pub use crate::formatting::{
    compose_post_html, render_block, render_blocks, render_rich_text, RenderNode,
};

// --- Assets ---
pub use crate::assets::{
    local_asset_path, local_asset_url, AssetDownloader, AssetKind, DownloadReport,
};

// --- OG images ---
pub use crate::og::{EmojiCache, EmojiProvider, OgService};

// --- Feed, search and server ---
pub use crate::feed::{parse_feed, render_feed, FeedItem};
pub use crate::search::{SearchAction, SearchKey, SearchSession};
pub use crate::server::{create_router, AppState};
