// src/api/client.rs
//! Pure HTTP client wrapper for Notion API.
//!
//! This module provides a thin wrapper around reqwest for making
//! HTTP requests to the Notion API. It handles authentication and
//! basic request/response operations without parsing or business logic.

use super::types::PostQuery;
use crate::constants::NOTION_API_VERSION;
use crate::error::AppError;
use crate::model::{Block, Post, SiteDatabase};
use crate::types::{ApiKey, BlockId, DatabaseId};
use reqwest::{header, Client, Response};
use serde::Serialize;

const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    /// Creates a client against another API root, such as a local proxy.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The API endpoint path (without base URL)
    /// * `query` - Query string pairs appended to the URL
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);

        let response = self.client.get(url).query(query).send().await?;
        log::debug!("GET {} -> {}", endpoint, response.status());

        Ok(response)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        log::debug!("POST {}", url);
        log::trace!(
            "Request body: {}",
            serde_json::to_string(body).unwrap_or_else(|_| "<unserializable>".to_string())
        );

        let response = self.client.post(url).json(body).send().await?;
        log::debug!("POST {} -> {}", endpoint, response.status());

        Ok(response)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn retrieve_database(&self, id: &DatabaseId) -> Result<SiteDatabase, AppError> {
        let endpoint = format!("databases/{}", id.to_dashed());
        let response = self.get(&endpoint, &[]).await?;
        let result = extract_response_text(response).await?;
        super::parser::parse_database_response(result)
    }

    async fn query_posts(
        &self,
        database: &DatabaseId,
        query: &PostQuery,
    ) -> Result<Vec<Post>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_dashed());
        let pagination_result = super::simple_pagination::fetch_all_pages_simple(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let mut body = serde_json::json!({
                        "page_size": page_size,
                        "filter": query.to_filter(),
                        "sorts": query.to_sorts(),
                    });
                    if let Some(cursor) = cursor {
                        body["start_cursor"] = serde_json::json!(cursor);
                    }
                    let response = self.post(&endpoint, &body).await?;
                    let result = extract_response_text(response).await?;
                    super::parser::parse_posts_pagination(result)
                }
            },
            None,
        )
        .await?;
        Ok(pagination_result.items)
    }

    async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_dashed());
        let pagination_result = super::simple_pagination::fetch_all_pages_simple(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let mut query = vec![("page_size", page_size.to_string())];
                    if let Some(cursor) = cursor {
                        query.push(("start_cursor", cursor));
                    }
                    let response = self.get(&endpoint, &query).await?;
                    let result = extract_response_text(response).await?;
                    super::parser::parse_blocks_pagination(result)
                }
            },
            None,
        )
        .await?;
        Ok(pagination_result.items)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
