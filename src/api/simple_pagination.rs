// src/api/simple_pagination.rs
//! Cursor pagination over Notion list endpoints.

use super::types::{PaginatedResponse, PaginationResult};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Fetches every page of a list endpoint, following `next_cursor`.
///
/// `fetch_fn` receives the page size and the cursor of the page to fetch
/// (`None` for the first one). Items are returned in listing order.
pub async fn fetch_all_pages_simple<T, F, Fut>(
    mut fetch_fn: F,
    max_pages: Option<u32>,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(NOTION_API_PAGE_SIZE as u32, cursor).await?;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);
        pages_fetched += 1;

        if !has_more || cursor.is_none() {
            break;
        }
    }

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let result = fetch_all_pages_simple(
            |page_size, cursor| async move {
                assert_eq!(page_size, 100);
                let (results, next) = match cursor.as_deref() {
                    None => (vec![1, 2], Some("c1".to_string())),
                    Some("c1") => (vec![3], Some("c2".to_string())),
                    _ => (vec![4], None),
                };
                Ok(PaginatedResponse {
                    object: "list".to_string(),
                    has_more: next.is_some(),
                    next_cursor: next,
                    results,
                })
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2, 3, 4]);
        assert_eq!(result.pages_fetched, 3);
    }

    #[tokio::test]
    async fn errors_abort_pagination() {
        let result: Result<PaginationResult<u8>, _> = fetch_all_pages_simple(
            |_, _| async { Err(AppError::MalformedResponse("bad".to_string())) },
            None,
        )
        .await;
        assert!(result.is_err());
    }
}
