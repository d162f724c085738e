// src/formatting/mod.rs
//! Renders Notion blocks and rich text into HTML.

// Sub-modules
pub mod block_renderer;
pub mod highlight;
pub mod node;
mod page;
pub mod rich_text;

pub use block_renderer::{render_block, render_blocks};
pub use node::{escape_html, nodes_to_html, RenderNode};
pub use page::compose_post_html;
pub use rich_text::{render_rich_text, render_rich_texts};
