// src/remote.rs
//! Fetching from hosts other than Notion: font CSS, font files, emoji
//! glyphs, asset files and the site's own feed.

use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Mutex;

/// The ability to GET remote resources.
#[async_trait::async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// GETs `url` as text, optionally with a specific `User-Agent`.
    /// Non-success statuses are errors.
    async fn fetch_text(&self, url: &str, user_agent: Option<&str>) -> Result<String, AppError>;

    /// GETs `url` as raw bytes. Non-success statuses are errors.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// `RemoteFetcher` backed by reqwest.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> Result<reqwest::Response, AppError> {
        log::debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, agent);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, user_agent: Option<&str>) -> Result<String, AppError> {
        Ok(self.send(url, user_agent).await?.text().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        Ok(self.send(url, None).await?.bytes().await?.to_vec())
    }
}

/// One request seen by a `StaticFetcher`.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub user_agent: Option<String>,
    pub at: tokio::time::Instant,
}

/// Serves canned bodies by exact URL; anything else is a 404.
///
/// Every request is recorded, including the time it was made, so callers
/// can check pacing.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn serve(&self, url: &str, user_agent: Option<&str>) -> Result<Vec<u8>, AppError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                user_agent: user_agent.map(str::to_string),
                at: tokio::time::Instant::now(),
            });
        }
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::UpstreamStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl RemoteFetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str, user_agent: Option<&str>) -> Result<String, AppError> {
        let body = self.serve(url, user_agent)?;
        String::from_utf8(body).map_err(|e| AppError::MalformedResponse(e.to_string()))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.serve(url, None)
    }
}
