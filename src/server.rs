// src/server.rs
//! HTTP endpoints: OG card images and the RSS feed.

use crate::api::ContentClient;
use crate::constants::OG_CACHE_CONTROL;
use crate::error::AppError;
use crate::feed::render_feed;
use crate::og::{parse_og_filename, OgService};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentClient,
    pub og: OgService,
    pub site: String,
    pub base_path: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/og/{file}", get(og_image))
        .route("/feed", get(feed))
        .with_state(state)
}

/// Binds `addr` and serves until the process stops.
pub async fn serve(addr: &str, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Serving on http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn og_image(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    let Some(slug) = parse_og_filename(&file) else {
        log::warn!("Rejected OG request for '{}'", file);
        return (StatusCode::BAD_REQUEST, "Invalid URL format").into_response();
    };

    match state.og.render_png(slug).await {
        Ok(png) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, OG_CACHE_CONTROL),
            ],
            png,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn feed(State(state): State<AppState>) -> Response {
    let fetched = tokio::try_join!(state.content.get_database(), state.content.get_all_posts());
    let xml = fetched.and_then(|(database, posts)| {
        render_feed(&state.site, &state.base_path, &database, &posts)
    });

    match xml {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Request failed: {}", self);
        let status = if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, status.canonical_reason().unwrap_or("Error")).into_response()
    }
}
