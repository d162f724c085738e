// src/formatting/rich_text/annotations.rs
//! Annotation wrappers for rich text.
//!
//! Each wrapper is a pass-through when its flag is off, so composing all of
//! them over unannotated text yields the text node unchanged.

use super::super::node::RenderNode;
use crate::types::{Annotations, Color, RichTextItem};

/// Wraps `inner` in every annotation element, innermost first:
/// code, bold, italic, strikethrough, underline, color.
pub fn apply_annotations(annotations: &Annotations, inner: RenderNode) -> RenderNode {
    let node = code(annotations.code, inner);
    let node = bold(annotations.bold, node);
    let node = italic(annotations.italic, node);
    let node = strikethrough(annotations.strikethrough, node);
    let node = underline(annotations.underline, node);
    color(annotations.color, node)
}

/// Links the span when it has an `href`; mentions render their own link.
pub fn anchor(item: &RichTextItem, inner: RenderNode) -> RenderNode {
    match &item.href {
        Some(href) if !item.is_mention() => RenderNode::element("a")
            .attr("href", href.as_str())
            .class("underline")
            .child(inner),
        _ => inner,
    }
}

fn code(on: bool, inner: RenderNode) -> RenderNode {
    if on {
        RenderNode::wrap("code", inner)
    } else {
        inner
    }
}

fn bold(on: bool, inner: RenderNode) -> RenderNode {
    if on {
        RenderNode::wrap("b", inner)
    } else {
        inner
    }
}

fn italic(on: bool, inner: RenderNode) -> RenderNode {
    if on {
        RenderNode::wrap("i", inner)
    } else {
        inner
    }
}

fn strikethrough(on: bool, inner: RenderNode) -> RenderNode {
    if on {
        RenderNode::wrap("s", inner)
    } else {
        inner
    }
}

fn underline(on: bool, inner: RenderNode) -> RenderNode {
    if on {
        RenderNode::wrap("u", inner)
    } else {
        inner
    }
}

fn color(color: Color, inner: RenderNode) -> RenderNode {
    match color.css_class() {
        Some(class) => RenderNode::element("span").class(class).child(inner),
        None => inner,
    }
}
