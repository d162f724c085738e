// src/og/mod.rs
//! Open Graph card images.
//!
//! A card is laid out as SVG, drawn with a Google Fonts subset and an
//! optional emoji glyph, then rasterized to PNG.

pub mod emoji;
pub mod font;
pub mod layout;
pub mod raster;
mod service;

pub use emoji::{emoji_code, load_emoji, EmojiCache, EmojiProvider};
pub use font::load_google_font;
pub use layout::{render_card_svg, CardVariant, OgCard};
pub use raster::rasterize_png;
pub use service::{parse_og_filename, OgService, OgSubject};
