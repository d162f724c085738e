// src/api/parser.rs
//! Turns raw Notion responses into domain values.
//!
//! Success bodies are deserialized into the wire types of `responses` and
//! then converted; error bodies become `AppError::NotionService`.

use super::adapter::is_published;
use super::client::ApiResponse;
use super::responses::{NotionBlock, NotionDatabase, NotionError, NotionPage, ToDomain};
use super::types::PaginatedResponse;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, Post, SiteDatabase};
use reqwest::StatusCode;

/// Database query response
pub type QueryDatabaseResponse = PaginatedResponse<NotionPage>;

/// Block children response
pub type RetrieveBlockChildrenResponse = PaginatedResponse<NotionBlock>;

/// Parse any Notion API response, dispatching on the HTTP status.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        parse_error(&result.data, result.status, &result.url)
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);

        let preview: String = body.chars().take(500).collect();
        AppError::MalformedResponse(format!("{} (body: {})", e, preview))
    })
}

fn parse_error<T>(body: &str, status: StatusCode, url: &str) -> Result<T, AppError> {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        log::debug!(
            "Notion error {} for {} (request {:?})",
            notion_error.code,
            url,
            notion_error.request_id
        );
        return Err(AppError::NotionService {
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            status,
        });
    }

    // Fallback to generic error with HTTP status code
    Err(AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}", status, url),
        status,
    })
}

/// Parse a database object into site metadata
pub fn parse_database_response(result: ApiResponse<String>) -> Result<SiteDatabase, AppError> {
    let notion_database: NotionDatabase = parse_api_response(result)?;
    ToDomain::to_domain(notion_database)
}

/// Parse one page of a database query.
///
/// Rows that are not valid posts (no slug, bad ID) are skipped with a
/// warning instead of failing the whole listing.
pub fn parse_posts_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Post>, AppError> {
    let response: QueryDatabaseResponse = parse_api_response(result)?;

    let mut posts = Vec::with_capacity(response.results.len());
    for page in response.results {
        if !is_published(&page) {
            log::debug!("Skipping unpublished page {}", page.id);
            continue;
        }
        let id = page.id.clone();
        match ToDomain::<Post>::to_domain(page) {
            Ok(post) => posts.push(post),
            Err(e) => log::warn!("Skipping page {}: {}", id, e),
        }
    }

    Ok(PaginatedResponse {
        object: response.object,
        results: posts,
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    })
}

/// Parse one page of block children
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    let blocks = response
        .results
        .into_iter()
        .map(ToDomain::to_domain)
        .collect::<Result<Vec<Block>, AppError>>()?;

    Ok(PaginatedResponse {
        object: response.object,
        results: blocks,
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    })
}
