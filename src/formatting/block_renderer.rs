// src/formatting/block_renderer.rs
//! Block rendering engine: converts Notion blocks to render nodes.
//!
//! Dispatch is an exhaustive match over `Block`. Unsupported blocks render
//! nothing and never stop their siblings from rendering. Container blocks
//! render their children depth-first in listing order.

use super::highlight::highlight_code;
use super::node::RenderNode;
use super::rich_text::render_rich_texts;
use crate::model::blocks::*;
use crate::model::Block;
use crate::types::{Color, RichTextItem};

// --- Public API ---

/// Renders a run of sibling blocks.
///
/// Consecutive bulleted items are grouped into one `<ul>` and consecutive
/// numbered items into one `<ol>`.
pub fn render_blocks(blocks: &[Block]) -> Vec<RenderNode> {
    let mut nodes = Vec::with_capacity(blocks.len());
    let mut list: Option<RenderNode> = None;

    for block in blocks {
        let list_tag = match block {
            Block::BulletedListItem(_) => Some("ul"),
            Block::NumberedListItem(_) => Some("ol"),
            _ => None,
        };

        // Close the open list when the run ends or switches kind
        if list.as_ref().and_then(RenderNode::tag) != list_tag {
            if let Some(open) = list.take() {
                nodes.push(open);
            }
        }

        let Some(node) = render_block(block) else {
            continue;
        };

        match list_tag {
            Some(tag) => list.get_or_insert_with(|| RenderNode::element(tag)).push(node),
            None => nodes.push(node),
        }
    }

    if let Some(open) = list {
        nodes.push(open);
    }
    nodes
}

/// Renders a single block, or `None` for blocks with no visual output.
pub fn render_block(block: &Block) -> Option<RenderNode> {
    let node = match block {
        Block::Paragraph(b) => with_children(
            text_element("p", &b.content.rich_text, b.content.color),
            &b.common,
        ),
        Block::Heading1(b) => render_heading("h1", b),
        Block::Heading2(b) => render_heading("h2", b),
        Block::Heading3(b) => render_heading("h3", b),
        Block::BulletedListItem(b) | Block::NumberedListItem(b) => {
            let item = text_element("li", &b.content.rich_text, b.content.color);
            item.children(render_blocks(&b.common.children))
        }
        Block::ToDo(b) => render_to_do(b),
        Block::Toggle(b) => RenderNode::element("details")
            .class("toggle")
            .child(RenderNode::element("summary").children(render_rich_texts(&b.content.rich_text)))
            .children(render_blocks(&b.common.children)),
        Block::Quote(b) => text_element("blockquote", &b.content.rich_text, b.content.color)
            .children(render_blocks(&b.common.children)),
        Block::Callout(b) => render_callout(b),
        Block::Code(b) => render_code(b),
        Block::Equation(b) => RenderNode::element("div")
            .class("equation")
            .child(RenderNode::text(b.expression.as_str())),
        Block::Divider(_) => RenderNode::element("hr"),
        Block::TableOfContents(b) => {
            let node = RenderNode::element("nav").class("table-of-contents");
            match b.color.css_class() {
                Some(class) => node.attr("data-color", class),
                None => node,
            }
        }
        Block::Image(b) => render_image(b),
        Block::Video(b) => render_video(b),
        Block::File(b) => render_file(b),
        Block::Bookmark(b) => render_bookmark(b),
        Block::Embed(b) => RenderNode::element("div").class("embed").child(
            RenderNode::element("iframe")
                .attr("src", b.url.as_str())
                .attr("loading", "lazy"),
        ),
        Block::LinkPreview(b) => RenderNode::element("div")
            .class("link-preview")
            .child(link(&b.url, RenderNode::text(b.url.as_str()))),
        Block::LinkToPage(b) => render_link_to_page(b),
        Block::Table(b) => render_table(b),
        Block::TableRow(b) => render_table_row(b, false, false),
        Block::ColumnList(b) => RenderNode::element("div")
            .class("column-list")
            .children(render_blocks(&b.common.children)),
        Block::Column(b) => RenderNode::element("div")
            .class("column")
            .children(render_blocks(&b.common.children)),
        Block::Synced(b) => RenderNode::element("div")
            .class("synced-block")
            .children(render_blocks(&b.common.children)),
        Block::Unsupported(b) => {
            log::debug!("Skipping unsupported block type: {}", b.block_type);
            return None;
        }
    };
    Some(node)
}

// --- Helper Functions ---

/// An element holding rich text, with the block color as a class.
fn text_element(tag: &'static str, rich_text: &[RichTextItem], color: Color) -> RenderNode {
    let node = RenderNode::element(tag);
    let node = match color.css_class() {
        Some(class) => node.class(class),
        None => node,
    };
    node.children(render_rich_texts(rich_text))
}

/// Emits `node` followed by its rendered children, if it has any.
fn with_children(node: RenderNode, common: &crate::model::BlockCommon) -> RenderNode {
    if common.children.is_empty() {
        return node;
    }
    RenderNode::Fragment(vec![
        node,
        RenderNode::element("div")
            .class("block-children")
            .children(render_blocks(&common.children)),
    ])
}

fn link(href: &str, inner: RenderNode) -> RenderNode {
    RenderNode::element("a")
        .attr("href", href)
        .attr("rel", "noopener noreferrer")
        .attr("target", "_blank")
        .child(inner)
}

fn caption(items: &[RichTextItem]) -> Option<RenderNode> {
    if items.is_empty() {
        return None;
    }
    Some(
        RenderNode::element("div")
            .class("caption")
            .children(render_rich_texts(items)),
    )
}

fn render_heading(tag: &'static str, b: &HeadingBlock) -> RenderNode {
    let heading = text_element(tag, &b.content.rich_text, b.content.color)
        .attr("id", b.common.id.as_str());
    if b.is_toggleable {
        RenderNode::element("details")
            .class("toggle")
            .child(RenderNode::wrap("summary", heading))
            .children(render_blocks(&b.common.children))
    } else {
        with_children(heading, &b.common)
    }
}

fn render_to_do(b: &ToDoBlock) -> RenderNode {
    let mut checkbox = RenderNode::element("input")
        .attr("type", "checkbox")
        .attr("disabled", "");
    if b.checked {
        checkbox = checkbox.attr("checked", "");
    }
    let label = RenderNode::element("span")
        .class(if b.checked { "to-do-checked" } else { "to-do-text" })
        .children(render_rich_texts(&b.content.rich_text));

    RenderNode::element("div")
        .class("to-do")
        .child(checkbox)
        .child(label)
        .children(render_blocks(&b.common.children))
}

fn render_callout(b: &CalloutBlock) -> RenderNode {
    let class = match b.content.color.css_class() {
        Some(color) => format!("callout {}", color),
        None => "callout".to_string(),
    };

    let icon = match &b.icon {
        Some(Icon::Emoji { emoji }) => Some(RenderNode::text(emoji.as_str())),
        Some(Icon::File(file)) => Some(
            RenderNode::element("img")
                .attr("src", file.url())
                .attr("alt", "Icon in a callout block"),
        ),
        None => None,
    };

    let mut node = RenderNode::element("div").class(class);
    if let Some(icon) = icon {
        node.push(RenderNode::element("div").class("callout-icon").child(icon));
    }
    node.child(
        RenderNode::element("div")
            .class("callout-text")
            .children(render_rich_texts(&b.content.rich_text))
            .children(render_blocks(&b.common.children)),
    )
}

fn render_code(b: &CodeBlock) -> RenderNode {
    let source = b.source();
    let language = b.language.to_lowercase();

    let body = if language == "mermaid" {
        RenderNode::element("pre")
            .class("mermaid")
            .child(RenderNode::text(source))
    } else {
        RenderNode::element("div")
            .class(format!("code language-{}", language.replace(' ', "-")))
            .attr("data-code", source.as_str())
            .child(RenderNode::Raw(highlight_code(&source, &language)))
    };

    let mut node = RenderNode::element("div").class("code-block").child(body);
    if let Some(caption) = caption(&b.caption) {
        node.push(caption);
    }
    node
}

fn render_image(b: &MediaBlock) -> RenderNode {
    let alt = crate::types::plain_text_of(&b.caption);
    let img = RenderNode::element("img")
        .attr("src", b.file.url())
        .attr("alt", alt)
        .attr("loading", "lazy");

    let mut figure = RenderNode::element("figure").class("image").child(img);
    if let Some(caption) = caption(&b.caption) {
        figure.push(RenderNode::wrap("figcaption", caption));
    }
    figure
}

fn render_video(b: &MediaBlock) -> RenderNode {
    let url = b.file.url();
    let player = match youtube_embed_url(url) {
        Some(embed) => RenderNode::element("iframe")
            .attr("src", embed)
            .attr("allowfullscreen", ""),
        None => RenderNode::element("video")
            .attr("src", url)
            .attr("controls", ""),
    };

    let mut node = RenderNode::element("div").class("video").child(player);
    if let Some(caption) = caption(&b.caption) {
        node.push(caption);
    }
    node
}

/// Embed URL for YouTube watch and short links.
fn youtube_embed_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let id = match host {
        "youtu.be" => parsed.path().trim_start_matches('/').to_string(),
        "www.youtube.com" | "youtube.com" => parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())?,
        _ => return None,
    };
    if id.is_empty() {
        return None;
    }
    Some(format!("https://www.youtube.com/embed/{}", id))
}

fn render_file(b: &MediaBlock) -> RenderNode {
    let url = b.file.url();
    let name = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "File".to_string());

    let mut node = RenderNode::element("div")
        .class("file")
        .child(link(url, RenderNode::text(format!("📎 {}", name))));
    if let Some(caption) = caption(&b.caption) {
        node.push(caption);
    }
    node
}

fn render_bookmark(b: &BookmarkBlock) -> RenderNode {
    let mut node = RenderNode::element("div")
        .class("bookmark")
        .child(link(&b.url, RenderNode::text(b.url.as_str())));
    if let Some(caption) = caption(&b.caption) {
        node.push(caption);
    }
    node
}

fn render_link_to_page(b: &LinkToPageBlock) -> RenderNode {
    let href = match &b.target {
        LinkTarget::Page(id) => format!("/posts/{}", id.as_str()),
        LinkTarget::Database(id) => format!("https://www.notion.so/{}", id.as_str()),
    };
    RenderNode::element("div").class("link-to-page").child(
        RenderNode::element("a")
            .attr("href", href)
            .child(RenderNode::text("📄 Linked page")),
    )
}

fn render_table(b: &TableBlock) -> RenderNode {
    let mut header = Vec::new();
    let mut body = Vec::new();

    for (index, child) in b.common.children.iter().enumerate() {
        let Block::TableRow(row) = child else {
            log::debug!("Ignoring non-row child of table: {}", child.block_type());
            continue;
        };
        let is_header = b.has_column_header && index == 0;
        let node = render_table_row(row, is_header, b.has_row_header);
        if is_header {
            header.push(node);
        } else {
            body.push(node);
        }
    }

    let mut table = RenderNode::element("table");
    if !header.is_empty() {
        table.push(RenderNode::element("thead").children(header));
    }
    table.push(RenderNode::element("tbody").children(body));
    RenderNode::element("div").class("table-wrapper").child(table)
}

fn render_table_row(row: &TableRowBlock, header_row: bool, row_header: bool) -> RenderNode {
    let cells = row.cells.iter().enumerate().map(|(i, cell)| {
        let tag = if header_row || (row_header && i == 0) {
            "th"
        } else {
            "td"
        };
        RenderNode::element(tag).children(render_rich_texts(cell))
    });
    RenderNode::element("tr").children(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockCommon;
    use crate::types::RichTextItem;
    use pretty_assertions::assert_eq;

    fn content(text: &str) -> TextBlockContent {
        TextBlockContent::new(vec![RichTextItem::plain_text(text)])
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::default(),
            content: content(text),
        })
    }

    fn bullet(text: &str) -> Block {
        Block::BulletedListItem(ListItemBlock {
            common: BlockCommon::default(),
            content: content(text),
        })
    }

    fn numbered(text: &str) -> Block {
        Block::NumberedListItem(ListItemBlock {
            common: BlockCommon::default(),
            content: content(text),
        })
    }

    fn unsupported() -> Block {
        Block::Unsupported(UnsupportedBlock {
            common: BlockCommon::default(),
            block_type: "ai_block".to_string(),
        })
    }

    fn code(language: &str, source: &str) -> Block {
        Block::Code(CodeBlock {
            common: BlockCommon::default(),
            language: language.to_string(),
            caption: vec![RichTextItem::plain_text("caption here")],
            content: content(source),
        })
    }

    #[test]
    fn unsupported_blocks_render_nothing_and_siblings_survive() {
        assert!(render_block(&unsupported()).is_none());

        let nodes = render_blocks(&[paragraph("before"), unsupported(), paragraph("after")]);
        let html: Vec<String> = nodes.iter().map(RenderNode::to_html).collect();
        assert_eq!(html, vec!["<p>before</p>", "<p>after</p>"]);
    }

    #[test]
    fn consecutive_list_items_are_grouped() {
        let nodes = render_blocks(&[
            bullet("a"),
            bullet("b"),
            numbered("one"),
            paragraph("p"),
            bullet("c"),
        ]);
        let html: Vec<String> = nodes.iter().map(RenderNode::to_html).collect();
        assert_eq!(
            html,
            vec![
                "<ul><li>a</li><li>b</li></ul>",
                "<ol><li>one</li></ol>",
                "<p>p</p>",
                "<ul><li>c</li></ul>",
            ]
        );
    }

    #[test]
    fn toggle_renders_children_in_order() {
        let toggle = Block::Toggle(ToggleBlock {
            common: BlockCommon::default().with_children(vec![paragraph("one"), paragraph("two")]),
            content: content("title"),
        });
        assert_eq!(
            render_block(&toggle).unwrap().to_html(),
            "<details class=\"toggle\"><summary>title</summary><p>one</p><p>two</p></details>"
        );
    }

    #[test]
    fn mermaid_code_is_passed_through_raw() {
        let node = render_block(&code("Mermaid", "graph TD; A-->B")).unwrap();
        let html = node.to_html();
        assert!(html.contains("<pre class=\"mermaid\">graph TD; A--&gt;B</pre>"));
        assert!(html.contains("<div class=\"caption\">caption here</div>"));
    }

    #[test]
    fn other_code_is_highlighted() {
        let html = render_block(&code("Python", "print('hi')")).unwrap().to_html();
        assert!(html.contains("language-python"));
        assert!(html.contains("<pre style="));
    }

    #[test]
    fn table_uses_header_flags() {
        let row = |a: &str, b: &str| {
            Block::TableRow(TableRowBlock {
                common: BlockCommon::default(),
                cells: vec![
                    vec![RichTextItem::plain_text(a)],
                    vec![RichTextItem::plain_text(b)],
                ],
            })
        };
        let table = Block::Table(TableBlock {
            common: BlockCommon::default().with_children(vec![row("k", "v"), row("a", "1")]),
            table_width: 2,
            has_column_header: true,
            has_row_header: false,
        });
        assert_eq!(
            render_block(&table).unwrap().to_html(),
            "<div class=\"table-wrapper\"><table><thead><tr><th>k</th><th>v</th></tr></thead>\
             <tbody><tr><td>a</td><td>1</td></tr></tbody></table></div>"
        );
    }

    #[test]
    fn youtube_links_are_embedded() {
        assert_eq!(
            youtube_embed_url("https://www.youtube.com/watch?v=abc123").as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
        assert_eq!(youtube_embed_url("https://example.com/v.mp4"), None);
    }
}
