// src/og/service.rs
//! Request-level OG image generation.

use super::emoji::{load_emoji, EmojiCache, EmojiProvider};
use super::font::load_google_font;
use super::layout::{render_card_svg, CardVariant, OgCard};
use super::raster::rasterize_png;
use crate::api::ContentClient;
use crate::constants::{DEFAULT_OG_SLUG, DEFAULT_OG_TITLE, OG_HEIGHT, OG_WIDTH};
use crate::error::AppError;
use crate::remote::RemoteFetcher;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static OG_FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\.[a-z]+$")
        .expect("Failed to compile OG filename regex - this is a bug in the code")
});

/// The slug named by a request file such as `my-post.png`.
pub fn parse_og_filename(file: &str) -> Option<&str> {
    OG_FILENAME_PATTERN
        .captures(file)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// What a card shows, before any glyph or font is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgSubject {
    pub title: String,
    pub emoji: Option<String>,
    pub variant: CardVariant,
}

/// Generates OG cards for posts and for the site.
#[derive(Clone)]
pub struct OgService {
    content: ContentClient,
    fetcher: Arc<dyn RemoteFetcher>,
    emoji_cache: Arc<EmojiCache>,
    provider: EmojiProvider,
}

impl OgService {
    pub fn new(
        content: ContentClient,
        fetcher: Arc<dyn RemoteFetcher>,
        emoji_cache: Arc<EmojiCache>,
    ) -> Self {
        Self {
            content,
            fetcher,
            emoji_cache,
            provider: EmojiProvider::default(),
        }
    }

    pub fn with_provider(mut self, provider: EmojiProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn emoji_cache(&self) -> &EmojiCache {
        &self.emoji_cache
    }

    /// Title and emoji for `slug`.
    ///
    /// A missing post or an empty title falls back to the site title.
    pub async fn resolve_subject(&self, slug: &str) -> OgSubject {
        if slug == DEFAULT_OG_SLUG {
            return OgSubject {
                title: DEFAULT_OG_TITLE.to_string(),
                emoji: None,
                variant: CardVariant::Site,
            };
        }

        let post = self.content.get_post_by_slug(slug).await;
        if post.is_none() {
            log::warn!("No published post for OG slug '{}'", slug);
        }

        let title = post
            .as_ref()
            .map(|p| p.title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_OG_TITLE)
            .to_string();
        let emoji = post.as_ref().and_then(|p| p.emoji()).map(str::to_string);

        OgSubject {
            title,
            emoji,
            variant: CardVariant::Post,
        }
    }

    /// PNG card for `slug`.
    pub async fn render_png(&self, slug: &str) -> Result<Vec<u8>, AppError> {
        let subject = self.resolve_subject(slug).await;
        log::debug!("Rendering OG card for '{}': {:?}", slug, subject);

        let font_text = format!("{}{}", subject.title, subject.emoji.as_deref().unwrap_or(""));
        let font = load_google_font(self.fetcher.as_ref(), &font_text).await;

        let emoji_svg = match &subject.emoji {
            Some(emoji) => {
                load_emoji(self.fetcher.as_ref(), &self.emoji_cache, self.provider, emoji).await
            }
            None => None,
        };

        let card = OgCard {
            title: subject.title,
            variant: subject.variant,
            emoji_svg,
        };
        let svg = render_card_svg(&card, OG_WIDTH)?;
        rasterize_png(&svg, font, OG_WIDTH, OG_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryRepository;
    use crate::model::{Icon, Post, SiteDatabase};
    use crate::remote::StaticFetcher;
    use crate::types::{DatabaseId, PageId, Slug};

    fn post(slug: &str, title: &str, icon: Option<Icon>) -> Post {
        Post {
            page_id: PageId::new_v4(),
            slug: Slug::new(slug).unwrap(),
            title: title.to_string(),
            icon,
            cover: None,
            tags: vec![],
            excerpt: None,
            featured_image: None,
            rank: 0,
            date: None,
        }
    }

    fn service(repository: InMemoryRepository) -> OgService {
        let content = ContentClient::new(Arc::new(repository), DatabaseId::new_v4());
        OgService::new(content, Arc::new(StaticFetcher::new()), Arc::new(EmojiCache::new()))
    }

    #[test]
    fn filenames_need_an_extension() {
        assert_eq!(parse_og_filename("hello-world.png"), Some("hello-world"));
        assert_eq!(parse_og_filename("v1.2.png"), Some("v1.2"));
        assert_eq!(parse_og_filename("no-extension"), None);
        assert_eq!(parse_og_filename(".png"), None);
    }

    #[tokio::test]
    async fn default_slug_uses_site_title_without_emoji() {
        let og = service(InMemoryRepository::new(SiteDatabase::default()));
        let subject = og.resolve_subject(DEFAULT_OG_SLUG).await;
        assert_eq!(
            subject,
            OgSubject {
                title: "USRM Blog".to_string(),
                emoji: None,
                variant: CardVariant::Site,
            }
        );
    }

    #[tokio::test]
    async fn post_subject_takes_title_and_emoji_icon() {
        let repository = InMemoryRepository::new(SiteDatabase::default()).with_post(post(
            "hello",
            "Hello",
            Some(Icon::Emoji {
                emoji: "\u{1F600}".to_string(),
            }),
        ));
        let subject = service(repository).resolve_subject("hello").await;
        assert_eq!(subject.title, "Hello");
        assert_eq!(subject.emoji.as_deref(), Some("\u{1F600}"));
        assert_eq!(subject.variant, CardVariant::Post);
    }

    #[tokio::test]
    async fn missing_post_or_empty_title_falls_back_to_site_title() {
        let repository = InMemoryRepository::new(SiteDatabase::default())
            .with_post(post("untitled", "  ", None));
        let og = service(repository);

        assert_eq!(og.resolve_subject("untitled").await.title, "USRM Blog");
        let missing = og.resolve_subject("nope").await;
        assert_eq!(missing.title, "USRM Blog");
        assert_eq!(missing.emoji, None);
    }
}
