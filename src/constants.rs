// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Reading these constants should tell you how the blog talks to Notion,
//! how it paces asset downloads and what an OG card looks like.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Maximum nesting depth when recursively fetching block children.
pub const NOTION_MAX_FETCH_DEPTH: u8 = 50;

/// Notion API version header value.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Retry policy for transient Notion failures.
pub const NOTION_RETRY_ATTEMPTS: u32 = 3;
pub const NOTION_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(100);
pub const NOTION_RETRY_MAX_DELAY: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Asset downloads
// ---------------------------------------------------------------------------

/// Posts whose assets are downloaded concurrently in one batch.
pub const ASSET_BATCH_SIZE: usize = 5;

/// Pause between two download batches.
pub const ASSET_BATCH_PAUSE: Duration = Duration::from_secs(2);

/// Directory under the asset root where localized Notion files live.
pub const ASSET_NOTION_DIR: &str = "notion";

// ---------------------------------------------------------------------------
// OG image
// ---------------------------------------------------------------------------

pub const OG_WIDTH: u32 = 1200;
pub const OG_HEIGHT: u32 = 630;
pub const OG_PADDING: u32 = 32;
pub const OG_CARD_RADIUS: u32 = 16;
pub const OG_CARD_COLOR: &str = "#fafafa";
pub const OG_TEXT_COLOR: &str = "#413838";
pub const OG_FONT_SIZE: u32 = 32;
pub const OG_TITLE_FONT_SIZE: u32 = 64;
/// Emoji glyphs are drawn at the title heading size.
pub const OG_EMOJI_SIZE: u32 = 64;

/// Background gradient stops as (offset percent, color).
pub const OG_GRADIENT: [(u32, &str); 3] = [(0, "#FA8BFF"), (52, "#2BD2FF"), (90, "#2BFF88")];

/// Title used for the site-wide card and whenever a post has no title.
pub const DEFAULT_OG_TITLE: &str = "USRM Blog";

/// Slug that selects the site-wide card instead of a post.
pub const DEFAULT_OG_SLUG: &str = "default-og-image";

pub const OG_CACHE_CONTROL: &str = "public, max-age=60, s-maxage=60, stale-while-revalidate=600";

/// CSS2 endpoint with the family already selected; `text` is appended.
pub const GOOGLE_FONTS_CSS_URL: &str = "https://fonts.googleapis.com/css2?family=Noto+Sans+JP:wght@700";

/// An old Safari user agent makes Google Fonts answer with TTF sources,
/// which the rasterizer can load.
pub const LEGACY_SAFARI_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_8; de-at) AppleWebKit/533.21.1 (KHTML, like Gecko) Version/5.0.5 Safari/533.21.1";

pub const FONT_FAMILY: &str = "Noto Sans JP";

// ---------------------------------------------------------------------------
// Site defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_SITE_URL: &str = "http://localhost:4321";
pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_ASSET_DIR: &str = "public";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:4321";
