// src/api/memory.rs
//! In-memory `NotionRepository` for tests and offline rendering.

use super::types::PostQuery;
use super::NotionRepository;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, Post, SiteDatabase};
use crate::types::{BlockId, DatabaseId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves a fixed workspace: one database, its posts and block trees.
#[derive(Default)]
pub struct InMemoryRepository {
    database: SiteDatabase,
    posts: Vec<(Post, bool)>,
    children: HashMap<BlockId, Vec<Block>>,
    unavailable: bool,
    children_calls: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new(database: SiteDatabase) -> Self {
        Self {
            database,
            ..Default::default()
        }
    }

    /// Adds a published post.
    pub fn with_post(mut self, post: Post) -> Self {
        self.posts.push((post, true));
        self
    }

    /// Adds a post with `Published` unchecked.
    pub fn with_draft(mut self, post: Post) -> Self {
        self.posts.push((post, false));
        self
    }

    /// Registers the direct children listed under `parent`.
    pub fn with_children(mut self, parent: BlockId, children: Vec<Block>) -> Self {
        self.children.insert(parent, children);
        self
    }

    /// Makes every call fail like an unreachable Notion.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// How many times children were listed.
    pub fn children_calls(&self) -> usize {
        self.children_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable {
            return Err(AppError::NotionService {
                code: NotionErrorCode::Unauthorized,
                message: "workspace unavailable".to_string(),
                status: reqwest::StatusCode::UNAUTHORIZED,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl NotionRepository for InMemoryRepository {
    async fn retrieve_database(&self, _id: &DatabaseId) -> Result<SiteDatabase, AppError> {
        self.check_available()?;
        Ok(self.database.clone())
    }

    async fn query_posts(
        &self,
        _database: &DatabaseId,
        query: &PostQuery,
    ) -> Result<Vec<Post>, AppError> {
        self.check_available()?;
        Ok(self
            .posts
            .iter()
            .filter(|(post, published)| query.matches(post, *published))
            .map(|(post, _)| post.clone())
            .collect())
    }

    async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
        self.check_available()?;
        self.children_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.children.get(parent).cloned().unwrap_or_default())
    }
}
