// src/formatting/page.rs
//! Assembles a full article page from a post and its rendered blocks.

use super::block_renderer::render_blocks;
use super::node::nodes_to_html;
use crate::assets::public_url;
use crate::error::AppError;
use crate::model::{Block, Post};
use handlebars::Handlebars;
use serde_json::json;
use std::path::Path;

const POST_TEMPLATE_NAME: &str = "post";
const POST_TEMPLATE: &str = include_str!("../templates/post.hbs");

/// Renders `blocks` as the body of `post`, framed by its title, date,
/// tags and cover.
///
/// The cover points at its copy under `asset_root` once downloaded.
pub fn compose_post_html(
    post: &Post,
    blocks: &[Block],
    asset_root: &Path,
) -> Result<String, AppError> {
    let handlebars = load_template()?;
    let body = nodes_to_html(&render_blocks(blocks));

    let data = json!({
        "title": post.title,
        "emoji": post.emoji(),
        "date": post.date.map(|d| d.format("%Y-%m-%d").to_string()),
        "cover": post.cover.as_ref().map(|cover| public_url(cover, asset_root)),
        "tags": post.tags.iter().map(|t| json!({
            "name": t.name,
            "color": t.color.css_class(),
        })).collect::<Vec<_>>(),
        "body": body,
    });

    let html = handlebars.render(POST_TEMPLATE_NAME, &data)?;
    log::debug!("Composed page for '{}': {} bytes", post.slug, html.len());
    Ok(html)
}

fn load_template() -> Result<Handlebars<'static>, AppError> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string(POST_TEMPLATE_NAME, POST_TEMPLATE)
        .map_err(|e| AppError::TemplateRenderError {
            name: POST_TEMPLATE_NAME.to_string(),
            message: e.to_string(),
        })?;
    Ok(handlebars)
}
