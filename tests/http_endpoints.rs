// OG image and feed endpoints exercised through the router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use notion_blog::constants::{OG_CACHE_CONTROL, OG_HEIGHT, OG_WIDTH};
use notion_blog::model::Icon;
use notion_blog::og::{rasterize_png, render_card_svg, CardVariant, OgCard};
use notion_blog::{
    create_router, AppState, ContentClient, DatabaseId, EmojiCache, EmojiProvider,
    InMemoryRepository, OgService, PageId, Post, SiteDatabase, Slug, StaticFetcher,
};
use std::sync::Arc;
use tower::ServiceExt;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn post(slug: &str, title: &str, emoji: Option<&str>) -> Post {
    Post {
        page_id: PageId::new_v4(),
        slug: Slug::new(slug).unwrap(),
        title: title.to_string(),
        icon: emoji.map(|e| Icon::Emoji {
            emoji: e.to_string(),
        }),
        cover: None,
        tags: vec![],
        excerpt: Some(format!("About {}", title)),
        featured_image: None,
        rank: 0,
        date: None,
    }
}

fn site_database() -> SiteDatabase {
    SiteDatabase {
        title: "USRM Blog".to_string(),
        description: "Notes".to_string(),
        ..Default::default()
    }
}

fn state(fetcher: Arc<StaticFetcher>, emoji_cache: Arc<EmojiCache>) -> AppState {
    let repository = InMemoryRepository::new(site_database())
        .with_post(post("alpha", "Alpha", Some("\u{1F600}")))
        .with_post(post("beta", "Beta", None));
    let content = ContentClient::new(Arc::new(repository), DatabaseId::new_v4());
    let og = OgService::new(content.clone(), fetcher, emoji_cache)
        .with_provider(EmojiProvider::Twemoji);

    AppState {
        content,
        og,
        site: "https://blog.test".to_string(),
        base_path: "/".to_string(),
    }
}

async fn get(state: AppState, uri: &str) -> axum::response::Response {
    create_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn default_og_image_is_a_cacheable_png() {
    let fetcher = Arc::new(StaticFetcher::new());
    let response = get(
        state(fetcher.clone(), Arc::new(EmojiCache::new())),
        "/og/default-og-image.png",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(response.headers()[header::CACHE_CONTROL], OG_CACHE_CONTROL);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..8], &PNG_SIGNATURE);

    // The site card asks for a font subset of its title and never for an emoji
    let urls: Vec<String> = fetcher.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("text=USRM+Blog"));

    // Without the subset font the title is still drawn
    let blank_card = OgCard {
        title: String::new(),
        variant: CardVariant::Site,
        emoji_svg: None,
    };
    let blank = rasterize_png(
        &render_card_svg(&blank_card, OG_WIDTH).unwrap(),
        None,
        OG_WIDTH,
        OG_HEIGHT,
    )
    .unwrap();
    assert_eq!(&blank[..8], &PNG_SIGNATURE);
    assert_ne!(body.as_ref(), blank.as_slice());
}

#[tokio::test]
async fn post_card_fetches_its_emoji_once() {
    let emoji_url = EmojiProvider::Twemoji.url("1f600");
    let fetcher = Arc::new(StaticFetcher::new().with_body(
        emoji_url.clone(),
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 36 36"><circle cx="18" cy="18" r="18" fill="#FFCC4D"/></svg>"##,
    ));
    let cache = Arc::new(EmojiCache::new());

    for _ in 0..2 {
        let response = get(state(fetcher.clone(), cache.clone()), "/og/alpha.png").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let emoji_requests = fetcher
        .requests()
        .into_iter()
        .filter(|r| r.url == emoji_url)
        .count();
    assert_eq!(emoji_requests, 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn unknown_post_still_gets_a_card() {
    let response = get(
        state(Arc::new(StaticFetcher::new()), Arc::new(EmojiCache::new())),
        "/og/missing.png",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_og_path_is_rejected() {
    let response = get(
        state(Arc::new(StaticFetcher::new()), Arc::new(EmojiCache::new())),
        "/og/alpha",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Invalid URL format");
}

#[tokio::test]
async fn feed_endpoint_serves_rss() {
    let response = get(
        state(Arc::new(StaticFetcher::new()), Arc::new(EmojiCache::new())),
        "/feed",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let xml = String::from_utf8(body.to_vec()).unwrap();
    let items = notion_blog::parse_feed(&xml).unwrap();
    let links: Vec<&str> = items.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(
        links,
        vec!["https://blog.test/posts/alpha", "https://blog.test/posts/beta"]
    );
}
