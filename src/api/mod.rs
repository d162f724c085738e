// src/api/mod.rs
//! Notion API interaction: the ability to read the blog's content.
//!
//! I/O (`client`), wire parsing (`parser`, `responses`, `adapter`) and the
//! blog-facing operations (`content`) are kept apart so the operations can
//! run against any `NotionRepository`.

pub mod adapter;
pub mod client;
pub mod content;
pub mod memory;
pub mod parser;
pub mod responses;
mod simple_pagination;
pub mod types;

use crate::error::AppError;
use crate::model::{Block, Post, SiteDatabase};
use crate::types::{BlockId, DatabaseId};

/// The ability to retrieve content from a Notion workspace.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_database(&self, id: &DatabaseId) -> Result<SiteDatabase, AppError>;

    /// Runs a database query and returns every matching post across pages.
    async fn query_posts(
        &self,
        database: &DatabaseId,
        query: &types::PostQuery,
    ) -> Result<Vec<Post>, AppError>;

    /// Lists the direct children of a block or page, in order.
    async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError>;
}

// Re-export the public interface
pub use client::{ApiResponse, NotionHttpClient};
pub use content::ContentClient;
pub use memory::InMemoryRepository;
pub use types::PostQuery;
