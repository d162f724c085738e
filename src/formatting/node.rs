// src/formatting/node.rs
//! Structured render output and its HTML serialization.

use std::fmt::Write;

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "source"];

/// A node of rendered output.
///
/// Text and attribute values are escaped when serialized; `Raw` holds
/// markup produced by a trusted renderer (the syntax highlighter).
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Text(String),
    Raw(String),
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<RenderNode>,
    },
    Fragment(Vec<RenderNode>),
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text(text.into())
    }

    pub fn element(tag: &'static str) -> Self {
        RenderNode::Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Shorthand for an element wrapping a single child.
    pub fn wrap(tag: &'static str, child: RenderNode) -> Self {
        RenderNode::element(tag).child(child)
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let RenderNode::Element { attrs, .. } = &mut self {
            attrs.push((name, value.into()));
        }
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: RenderNode) -> Self {
        self.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = RenderNode>) -> Self {
        for node in nodes {
            self.push(node);
        }
        self
    }

    /// Appends a child; on text nodes this is a no-op.
    pub fn push(&mut self, node: RenderNode) {
        match self {
            RenderNode::Element { children, .. } | RenderNode::Fragment(children) => {
                children.push(node)
            }
            RenderNode::Text(_) | RenderNode::Raw(_) => {}
        }
    }

    pub fn tag(&self) -> Option<&'static str> {
        match self {
            RenderNode::Element { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            RenderNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Concatenated text content, ignoring markup.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RenderNode::Text(t) => out.push_str(t),
            RenderNode::Raw(_) => {}
            RenderNode::Element { children, .. } | RenderNode::Fragment(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            RenderNode::Text(text) => out.push_str(&escape_html(text)),
            RenderNode::Raw(html) => out.push_str(html),
            RenderNode::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            RenderNode::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    // Writing to a String cannot fail
                    let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(tag) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }
}

/// Serializes a list of nodes back to back.
pub fn nodes_to_html(nodes: &[RenderNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Basic HTML escaping.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_attributes_are_escaped() {
        let node = RenderNode::element("a")
            .attr("href", "https://x.test/?a=1&b=\"2\"")
            .child(RenderNode::text("<b>not bold</b>"));
        assert_eq!(
            node.to_html(),
            "<a href=\"https://x.test/?a=1&amp;b=&quot;2&quot;\">&lt;b&gt;not bold&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node = RenderNode::element("img").attr("src", "/a.png").attr("alt", "");
        assert_eq!(node.to_html(), "<img src=\"/a.png\" alt=\"\">");
    }

    #[test]
    fn raw_markup_passes_through() {
        let node = RenderNode::wrap("div", RenderNode::Raw("<span>x</span>".to_string()));
        assert_eq!(node.to_html(), "<div><span>x</span></div>");
        assert_eq!(node.text_content(), "");
    }
}
