// src/api/content.rs
//! Blog-facing content operations on top of a `NotionRepository`.

use super::types::PostQuery;
use super::NotionRepository;
use crate::constants::NOTION_MAX_FETCH_DEPTH;
use crate::error::AppError;
use crate::error_recovery::retry_notion;
use crate::model::{Block, Post, SiteDatabase};
use crate::types::{BlockId, DatabaseId};
use futures::future::{try_join_all, BoxFuture};
use std::sync::Arc;

/// Reads posts, site metadata and block trees from the posts database.
#[derive(Clone)]
pub struct ContentClient {
    repository: Arc<dyn NotionRepository>,
    database_id: DatabaseId,
}

impl ContentClient {
    pub fn new(repository: Arc<dyn NotionRepository>, database_id: DatabaseId) -> Self {
        Self {
            repository,
            database_id,
        }
    }

    pub fn database_id(&self) -> &DatabaseId {
        &self.database_id
    }

    /// All published posts, rank descending then date descending.
    pub async fn get_all_posts(&self) -> Result<Vec<Post>, AppError> {
        let query = PostQuery::Published;
        let mut posts = retry_notion(|| self.repository.query_posts(&self.database_id, &query))
            .await?;
        posts.sort_by(Post::listing_order);
        log::info!("Fetched {} published posts", posts.len());
        Ok(posts)
    }

    /// The published post with this slug.
    ///
    /// Upstream failures are logged and reported as `None`, the same as an
    /// unknown slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        let query = PostQuery::BySlug(slug.to_string());
        match retry_notion(|| self.repository.query_posts(&self.database_id, &query)).await {
            Ok(posts) => posts.into_iter().next(),
            Err(e) => {
                log::error!("Failed to look up post '{}': {}", slug, e);
                None
            }
        }
    }

    /// Title, description, icon and cover of the posts database.
    pub async fn get_database(&self) -> Result<SiteDatabase, AppError> {
        retry_notion(|| self.repository.retrieve_database(&self.database_id)).await
    }

    /// The full block tree under `block_id`.
    ///
    /// Children of sibling blocks are fetched concurrently and attached in
    /// listing order. Any failure fails the whole tree.
    pub async fn get_all_blocks_by_block_id(&self, block_id: &BlockId) -> Result<Vec<Block>, AppError> {
        fetch_tree(self.repository.as_ref(), block_id.clone(), NOTION_MAX_FETCH_DEPTH).await
    }
}

fn fetch_tree(
    repository: &dyn NotionRepository,
    parent: BlockId,
    depth_remaining: u8,
) -> BoxFuture<'_, Result<Vec<Block>, AppError>> {
    Box::pin(async move {
        let mut blocks = retry_notion(|| repository.retrieve_children(&parent)).await?;

        let nested: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.has_children())
            .map(|(i, _)| i)
            .collect();

        if nested.is_empty() {
            return Ok(blocks);
        }
        if depth_remaining == 0 {
            log::warn!(
                "Maximum block depth reached under {}; {} nested blocks left unexpanded",
                parent.as_str(),
                nested.len()
            );
            return Ok(blocks);
        }

        let fetches = nested
            .iter()
            .map(|&i| fetch_tree(repository, blocks[i].id().clone(), depth_remaining - 1));
        let children = try_join_all(fetches).await?;

        for (i, kids) in nested.into_iter().zip(children) {
            blocks[i].set_children(kids);
        }
        Ok(blocks)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryRepository;
    use crate::model::{BlockCommon, ParagraphBlock, TextBlockContent, ToggleBlock};
    use crate::types::{PageId, RichTextItem, Slug};
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str, has_children: bool) -> Block {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon {
                has_children,
                ..BlockCommon::default()
            },
            content: TextBlockContent::new(vec![RichTextItem::plain_text(text)]),
        })
    }

    fn toggle(text: &str) -> Block {
        Block::Toggle(ToggleBlock {
            common: BlockCommon {
                has_children: true,
                ..BlockCommon::default()
            },
            content: TextBlockContent::new(vec![RichTextItem::plain_text(text)]),
        })
    }

    fn post(slug: &str, rank: i64) -> Post {
        Post {
            page_id: PageId::new_v4(),
            slug: Slug::new(slug).unwrap(),
            title: slug.to_uppercase(),
            icon: None,
            cover: None,
            tags: vec![],
            excerpt: None,
            featured_image: None,
            rank,
            date: None,
        }
    }

    fn text_of(block: &Block) -> String {
        crate::types::plain_text_of(block.rich_text().unwrap_or_default())
    }

    #[tokio::test]
    async fn block_tree_is_assembled_in_order() {
        let root = BlockId::new_v4();
        let first = toggle("first");
        let second = toggle("second");
        let grandchild_parent = paragraph("nested", true);

        let repo = InMemoryRepository::default()
            .with_children(
                root.clone(),
                vec![first.clone(), paragraph("middle", false), second.clone()],
            )
            .with_children(
                first.id().clone(),
                vec![paragraph("a", false), grandchild_parent.clone()],
            )
            .with_children(second.id().clone(), vec![paragraph("b", false)])
            .with_children(grandchild_parent.id().clone(), vec![paragraph("deep", false)]);
        let repo = Arc::new(repo);
        let client = ContentClient::new(repo.clone(), DatabaseId::new_v4());

        let tree = client.get_all_blocks_by_block_id(&root).await.unwrap();

        let top: Vec<String> = tree.iter().map(text_of).collect();
        assert_eq!(top, vec!["first", "middle", "second"]);
        let first_children: Vec<String> = tree[0].children().iter().map(text_of).collect();
        assert_eq!(first_children, vec!["a", "nested"]);
        assert_eq!(text_of(&tree[0].children()[1].children()[0]), "deep");
        assert_eq!(text_of(&tree[2].children()[0]), "b");
        assert_eq!(repo.children_calls(), 4);
    }

    #[tokio::test]
    async fn posts_are_sorted_by_rank() {
        let repo = InMemoryRepository::default()
            .with_post(post("low", 1))
            .with_draft(post("draft", 100))
            .with_post(post("high", 9));
        let client = ContentClient::new(Arc::new(repo), DatabaseId::new_v4());

        let posts = client.get_all_posts().await.unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["high", "low"]);
    }

    #[tokio::test]
    async fn slug_lookup_finds_post_or_none() {
        let repo = InMemoryRepository::default().with_post(post("hello", 0));
        let client = ContentClient::new(Arc::new(repo), DatabaseId::new_v4());

        let found = client.get_post_by_slug("hello").await.unwrap();
        assert_eq!(found.slug.as_str(), "hello");
        assert!(client.get_post_by_slug("missing").await.is_none());
    }

    #[tokio::test]
    async fn slug_lookup_degrades_to_none_on_upstream_error() {
        let repo = InMemoryRepository::default()
            .with_post(post("hello", 0))
            .unavailable();
        let client = ContentClient::new(Arc::new(repo), DatabaseId::new_v4());

        assert!(client.get_post_by_slug("hello").await.is_none());
        assert!(client.get_all_posts().await.is_err());
    }
}
