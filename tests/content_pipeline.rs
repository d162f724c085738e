// Content client and renderer driven by recorded Notion API responses.

use notion_blog::api::parser::{parse_blocks_pagination, parse_database_response, parse_posts_pagination};
use notion_blog::api::ApiResponse;
use notion_blog::{
    compose_post_html, render_blocks, Block, BlockCommon, BlockId, ContentClient, DatabaseId,
    InMemoryRepository, Post, RichTextItem, SiteDatabase,
};
use notion_blog::model::{ParagraphBlock, TextBlockContent, ToggleBlock};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use std::sync::Arc;

fn ok(body: &str) -> ApiResponse<String> {
    ApiResponse {
        data: body.to_string(),
        status: StatusCode::OK,
        url: "https://api.notion.com/v1/test".to_string(),
    }
}

fn fixture_posts() -> Vec<Post> {
    let json = include_str!("fixtures/api_responses/query_posts.json");
    parse_posts_pagination(ok(json)).unwrap().results
}

fn fixture_database() -> SiteDatabase {
    let json = include_str!("fixtures/api_responses/database.json");
    parse_database_response(ok(json)).unwrap()
}

fn fixture_blocks() -> Vec<Block> {
    let json = include_str!("fixtures/api_responses/blocks_alpha.json");
    parse_blocks_pagination(ok(json)).unwrap().results
}

fn client(repository: InMemoryRepository) -> ContentClient {
    ContentClient::new(Arc::new(repository), DatabaseId::new_v4())
}

fn repository_with_fixture_posts() -> InMemoryRepository {
    fixture_posts()
        .into_iter()
        .fold(InMemoryRepository::new(fixture_database()), |repo, post| repo.with_post(post))
}

#[test]
fn query_fixture_yields_published_posts_only() {
    let posts = fixture_posts();

    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["alpha", "beta"]);

    let alpha = &posts[0];
    assert_eq!(alpha.title, "Alpha launch");
    assert_eq!(alpha.emoji(), Some("🚀"));
    assert_eq!(alpha.rank, 2);
    assert_eq!(alpha.excerpt.as_deref(), Some("The first release"));
    assert!(alpha.featured_image.as_ref().is_some_and(|f| f.is_internal()));
}

#[test]
fn database_fixture_maps_site_metadata() {
    let database = fixture_database();
    assert_eq!(database.title, "USRM Blog");
    assert_eq!(database.description, "Notes on building things");
    assert!(database.cover.is_some());
}

#[tokio::test]
async fn post_lookup_by_slug_round_trips() {
    let content = client(repository_with_fixture_posts());

    for post in fixture_posts() {
        let found = content.get_post_by_slug(post.slug.as_str()).await;
        assert_eq!(found.as_ref().map(|p| &p.slug), Some(&post.slug));
    }
    assert_eq!(content.get_post_by_slug("no-such-post").await, None);
    assert_eq!(content.get_post_by_slug("draft").await, None);
}

#[tokio::test]
async fn all_posts_follow_rank_then_date() {
    let content = client(repository_with_fixture_posts());
    let posts = content.get_all_posts().await.unwrap();

    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn upstream_failure_degrades_single_lookup_but_fails_listing() {
    let content = client(InMemoryRepository::new(SiteDatabase::default()).unavailable());

    assert_eq!(content.get_post_by_slug("alpha").await, None);
    assert!(content.get_all_posts().await.is_err());
}

#[tokio::test]
async fn block_tree_is_attached_in_order() {
    let blocks = fixture_blocks();
    let toggle_id = blocks[3].id().clone();
    let page_id = BlockId::new_v4();

    let nested = |text: &str| {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::new(BlockId::new_v4()),
            content: TextBlockContent::new(vec![RichTextItem::plain_text(text)]),
        })
    };
    let repository = InMemoryRepository::new(SiteDatabase::default())
        .with_children(page_id.clone(), blocks)
        .with_children(toggle_id, vec![nested("first"), nested("second")]);

    let tree = client(repository)
        .get_all_blocks_by_block_id(&page_id)
        .await
        .unwrap();

    let types: Vec<&str> = tree.iter().map(|b| b.block_type()).collect();
    assert_eq!(types, vec!["paragraph", "ai_block", "code", "toggle"]);

    let Block::Toggle(ToggleBlock { common, .. }) = &tree[3] else {
        panic!("expected a toggle, got {:?}", tree[3]);
    };
    let children: Vec<String> = common
        .children
        .iter()
        .filter_map(|b| b.rich_text().map(notion_blog::types::plain_text_of))
        .collect();
    assert_eq!(children, vec!["first", "second"]);
}

#[test]
fn unknown_block_is_dropped_and_siblings_render() {
    let html: Vec<String> = render_blocks(&fixture_blocks())
        .iter()
        .map(|n| n.to_html())
        .collect();

    assert_eq!(html.len(), 3);
    assert_eq!(
        html[0],
        "<p>Hello <span class=\"red\"><b>world</b></span></p>"
    );
    assert_eq!(
        html[1],
        "<div class=\"code-block\"><pre class=\"mermaid\">graph TD; A--&gt;B</pre></div>"
    );
    assert!(html[2].starts_with("<details class=\"toggle\"><summary>More</summary>"));
}

#[test]
fn full_page_wraps_rendered_body() {
    let post = fixture_posts().remove(0);
    let assets = tempfile::tempdir().unwrap();
    let html = compose_post_html(&post, &fixture_blocks(), assets.path()).unwrap();

    assert!(html.contains("Alpha launch"));
    assert!(html.contains("<time class=\"post-date\" datetime=\"2024-03-01\">"));
    assert!(html.contains("<pre class=\"mermaid\">"));
    assert!(!html.contains("ai_block"));
}
