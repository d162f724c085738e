// src/og/layout.rs
//! SVG layout of the OG card.

use crate::constants::{
    FONT_FAMILY, OG_CARD_COLOR, OG_CARD_RADIUS, OG_EMOJI_SIZE, OG_FONT_SIZE, OG_GRADIENT,
    OG_HEIGHT, OG_PADDING, OG_TEXT_COLOR, OG_TITLE_FONT_SIZE,
};
use crate::error::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use handlebars::Handlebars;
use serde_json::json;
use std::sync::Arc;

const CARD_TEMPLATE_NAME: &str = "og_card";
const CARD_TEMPLATE: &str = include_str!("../templates/og_card.hbs");

const LINE_HEIGHT: f32 = 1.25;
const EMOJI_GAP: f32 = 16.0;
/// Inner margin keeping text off the card's rounded edge
const TEXT_MARGIN: u32 = 48;

/// Which card layout to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    /// Site-wide card: the title as a large heading
    Site,
    /// Post card: emoji glyph above a smaller title
    Post,
}

/// Everything drawn on a card.
#[derive(Debug, Clone)]
pub struct OgCard {
    pub title: String,
    pub variant: CardVariant,
    /// SVG source of the emoji glyph, post cards only
    pub emoji_svg: Option<Arc<str>>,
}

impl OgCard {
    fn font_size(&self) -> u32 {
        match self.variant {
            CardVariant::Site => OG_TITLE_FONT_SIZE,
            CardVariant::Post => OG_FONT_SIZE,
        }
    }

    fn emoji(&self) -> Option<&str> {
        match self.variant {
            CardVariant::Post => self.emoji_svg.as_deref(),
            CardVariant::Site => None,
        }
    }
}

/// Renders the card as a standalone SVG document of `OG_WIDTH` x `OG_HEIGHT`.
pub fn render_card_svg(card: &OgCard, width: u32) -> Result<String, AppError> {
    let height = OG_HEIGHT;
    let font_size = card.font_size();
    let card_width = width.saturating_sub(2 * OG_PADDING);
    let card_height = height.saturating_sub(2 * OG_PADDING);
    let center_x = width as f32 / 2.0;

    let lines = wrap_title(
        &card.title,
        font_size,
        card_width.saturating_sub(2 * TEXT_MARGIN),
    );
    let line_height = font_size as f32 * LINE_HEIGHT;
    let emoji_block = match card.emoji() {
        Some(_) => OG_EMOJI_SIZE as f32 + EMOJI_GAP,
        None => 0.0,
    };
    let block_height = emoji_block + lines.len() as f32 * line_height;
    let top = (height as f32 - block_height) / 2.0;

    let emoji = card.emoji().map(|svg| {
        json!({
            "x": center_x - OG_EMOJI_SIZE as f32 / 2.0,
            "y": top,
            "size": OG_EMOJI_SIZE,
            "href": svg_data_url(svg),
        })
    });

    // Baselines sit roughly one font size below the top of each line box
    let first_baseline = top + emoji_block + (line_height + font_size as f32 * 0.7) / 2.0;
    let lines = lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            json!({
                "x": center_x,
                "y": first_baseline + i as f32 * line_height,
                "text": text,
            })
        })
        .collect::<Vec<_>>();

    let data = json!({
        "width": width,
        "height": height,
        "stops": OG_GRADIENT
            .iter()
            .map(|(offset, color)| json!({ "offset": offset, "color": color }))
            .collect::<Vec<_>>(),
        "card": {
            "x": OG_PADDING,
            "y": OG_PADDING,
            "width": card_width,
            "height": card_height,
            "radius": OG_CARD_RADIUS,
            "color": OG_CARD_COLOR,
        },
        "emoji": emoji,
        "font_family": FONT_FAMILY,
        "font_size": font_size,
        "text_color": OG_TEXT_COLOR,
        "lines": lines,
    });

    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string(CARD_TEMPLATE_NAME, CARD_TEMPLATE)
        .map_err(|e| AppError::TemplateRenderError {
            name: CARD_TEMPLATE_NAME.to_string(),
            message: e.to_string(),
        })?;
    Ok(handlebars.render(CARD_TEMPLATE_NAME, &data)?)
}

fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Greedy line breaking on an estimated advance width.
///
/// Latin text breaks between words; every other character may break on
/// its own, which suits CJK titles.
pub fn wrap_title(title: &str, font_size: u32, max_width: u32) -> Vec<String> {
    let max_width = max_width as f32;
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;

    for token in break_tokens(title.trim()) {
        let width = advance_width(&token, font_size);
        if line_width + width > max_width && !line.trim().is_empty() {
            lines.push(line.trim_end().to_string());
            line.clear();
            line_width = 0.0;
            if token == " " {
                continue;
            }
        }
        line.push_str(&token);
        line_width += width;
    }

    if !line.trim().is_empty() {
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn break_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_ascii() && !c.is_whitespace() {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if c.is_whitespace() {
            tokens.push(" ".to_string());
        } else {
            tokens.push(c.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

fn advance_width(token: &str, font_size: u32) -> f32 {
    token
        .chars()
        .map(|c| if c.is_ascii() { 0.6 } else { 1.0 })
        .sum::<f32>()
        * font_size as f32
}
