// src/formatting/rich_text/mod.rs
//! Rich text rendering.

mod annotations;

pub use annotations::{anchor, apply_annotations};

use super::node::RenderNode;
use crate::types::{Mention, RichTextItem, RichTextType};

/// Renders one span: the content, then its link, then the annotation
/// wrappers from the inside out.
pub fn render_rich_text(item: &RichTextItem) -> RenderNode {
    let inner = match &item.text_type {
        RichTextType::Text { content, .. } => anchor(item, RenderNode::text(content.as_str())),
        RichTextType::Equation(equation) => RenderNode::element("span")
            .class("equation")
            .child(RenderNode::text(equation.expression.as_str())),
        RichTextType::Mention(Mention::Page { id }) => render_page_mention(item, id.as_str()),
        RichTextType::Mention(_) => anchor(item, RenderNode::text(item.plain_text.as_str())),
    };

    apply_annotations(&item.annotations, inner)
}

/// Renders a run of spans in order.
pub fn render_rich_texts(items: &[RichTextItem]) -> Vec<RenderNode> {
    items.iter().map(render_rich_text).collect()
}

fn render_page_mention(item: &RichTextItem, page_id: &str) -> RenderNode {
    let label = if item.plain_text.is_empty() {
        "Untitled"
    } else {
        item.plain_text.as_str()
    };
    RenderNode::element("a")
        .attr("href", format!("/posts/{}", page_id))
        .class("mention")
        .attr("title", "Mentioned page")
        .child(RenderNode::element("span").class("mention-icon").child(RenderNode::text("📄")))
        .child(RenderNode::element("span").class("mention-title").child(RenderNode::text(label)))
}
