//! Post rows tolerate unexpected property shapes.
//!
//! Unknown property types are ignored, rows that cannot become posts are
//! skipped, and Notion error bodies surface as typed errors.

use notion_blog::api::parser::parse_posts_pagination;
use notion_blog::api::ApiResponse;
use notion_blog::{AppError, NotionErrorCode};
use reqwest::StatusCode;

fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
    ApiResponse {
        data: body.to_string(),
        status,
        url: "https://api.notion.com/v1/databases/x/query".to_string(),
    }
}

#[test]
fn unsupported_property_types_are_ignored() {
    let body = r#"{
        "object": "list",
        "results": [
            {
                "object": "page",
                "id": "216cd412-8533-8087-a989-cf37889137c3",
                "properties": {
                    "Name": {
                        "id": "title",
                        "type": "title",
                        "title": [
                            {"type": "text", "text": {"content": "Rollups", "link": null}, "plain_text": "Rollups", "href": null}
                        ]
                    },
                    "Slug": {
                        "id": "s",
                        "type": "rich_text",
                        "rich_text": [
                            {"type": "text", "text": {"content": "rollups", "link": null}, "plain_text": "rollups", "href": null}
                        ]
                    },
                    "Status": {"id": "st", "type": "select", "select": {"id": "x", "name": "Done", "color": "blue"}},
                    "Score": {"id": "f", "type": "formula", "formula": {"type": "number", "number": 3}},
                    "Date": {"id": "d", "type": "date", "date": null},
                    "Rank": {"id": "r", "type": "rich_text", "rich_text": []},
                    "Published": {"id": "p", "type": "checkbox", "checkbox": true}
                }
            }
        ],
        "next_cursor": null,
        "has_more": false
    }"#;

    let page = parse_posts_pagination(response(StatusCode::OK, body)).unwrap();
    assert_eq!(page.results.len(), 1);

    let post = &page.results[0];
    assert_eq!(post.title, "Rollups");
    assert_eq!(post.slug.as_str(), "rollups");
    assert_eq!(post.date, None);
    assert_eq!(post.rank, 0);
    assert!(post.tags.is_empty());
}

#[test]
fn rows_without_slug_are_skipped() {
    let body = r#"{
        "object": "list",
        "results": [
            {
                "object": "page",
                "id": "316cd412-8533-8087-a989-cf37889137c3",
                "properties": {
                    "Name": {"id": "title", "type": "title", "title": []},
                    "Slug": {"id": "s", "type": "rich_text", "rich_text": []},
                    "Published": {"id": "p", "type": "checkbox", "checkbox": true}
                }
            }
        ],
        "next_cursor": null,
        "has_more": false
    }"#;

    let page = parse_posts_pagination(response(StatusCode::OK, body)).unwrap();
    assert!(page.results.is_empty());
}

#[test]
fn error_bodies_become_typed_errors() {
    let body = r#"{
        "object": "error",
        "status": 404,
        "code": "object_not_found",
        "message": "Could not find database with ID: x."
    }"#;

    let err = parse_posts_pagination(response(StatusCode::NOT_FOUND, body)).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        AppError::NotionService {
            code: NotionErrorCode::ObjectNotFound,
            ..
        }
    ));
}

#[test]
fn rate_limits_are_retryable() {
    let body = r#"{"object": "error", "status": 429, "code": "rate_limited", "message": "Slow down"}"#;
    let err = parse_posts_pagination(response(StatusCode::TOO_MANY_REQUESTS, body)).unwrap_err();
    assert!(err.is_retryable());
}
