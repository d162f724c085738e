// src/og/emoji.rs
//! Emoji glyph lookup on public SVG emoji CDNs.

use crate::remote::RemoteFetcher;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

const ZERO_WIDTH_JOINER: char = '\u{200D}';
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// An SVG emoji set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum EmojiProvider {
    Twemoji,
    Openmoji,
    Blobmoji,
    Noto,
    #[default]
    Fluent,
    FluentFlat,
}

impl EmojiProvider {
    /// Where this provider serves the glyph for `code`.
    pub fn url(self, code: &str) -> String {
        match self {
            EmojiProvider::Twemoji => format!(
                "https://cdnjs.cloudflare.com/ajax/libs/twemoji/14.0.2/svg/{}.svg",
                code.to_lowercase()
            ),
            EmojiProvider::Openmoji => format!(
                "https://cdn.jsdelivr.net/npm/@svgmoji/openmoji@2.0.0/svg/{}.svg",
                code.to_uppercase()
            ),
            EmojiProvider::Blobmoji => format!(
                "https://cdn.jsdelivr.net/npm/@svgmoji/blob@2.0.0/svg/{}.svg",
                code.to_uppercase()
            ),
            EmojiProvider::Noto => format!(
                "https://cdn.jsdelivr.net/gh/svgmoji/svgmoji/packages/svgmoji__noto/svg/{}.svg",
                code.to_uppercase()
            ),
            EmojiProvider::Fluent => format!(
                "https://cdn.jsdelivr.net/gh/shuding/fluentui-emoji-unicode/assets/{}_color.svg",
                code.to_lowercase()
            ),
            EmojiProvider::FluentFlat => format!(
                "https://cdn.jsdelivr.net/gh/shuding/fluentui-emoji-unicode/assets/{}_flat.svg",
                code.to_lowercase()
            ),
        }
    }
}

impl fmt::Display for EmojiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmojiProvider::Twemoji => "twemoji",
            EmojiProvider::Openmoji => "openmoji",
            EmojiProvider::Blobmoji => "blobmoji",
            EmojiProvider::Noto => "noto",
            EmojiProvider::Fluent => "fluent",
            EmojiProvider::FluentFlat => "fluentFlat",
        };
        f.write_str(name)
    }
}

/// Code point sequence naming an emoji on the CDNs, e.g. `1f468-200d-1f4bb`.
///
/// U+FE0F is dropped unless the sequence contains a zero width joiner.
pub fn emoji_code(emoji: &str) -> String {
    let keep_selectors = emoji.contains(ZERO_WIDTH_JOINER);
    emoji
        .chars()
        .filter(|&c| keep_selectors || c != VARIATION_SELECTOR_16)
        .map(|c| format!("{:x}", c as u32))
        .collect::<Vec<_>>()
        .join("-")
}

/// Fetched SVG glyphs keyed by `provider:code`.
///
/// Entries are only ever added. Failed lookups are not stored, so a later
/// request tries again.
#[derive(Debug, Default)]
pub struct EmojiCache {
    glyphs: DashMap<String, Arc<str>>,
}

impl EmojiCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(provider: EmojiProvider, code: &str) -> String {
        format!("{}:{}", provider, code)
    }

    pub fn get(&self, key: &str) -> Option<Arc<str>> {
        self.glyphs.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Stores `svg` unless the key is already present; returns the stored glyph.
    pub fn insert_if_absent(&self, key: String, svg: String) -> Arc<str> {
        Arc::clone(self.glyphs.entry(key).or_insert_with(|| Arc::from(svg)).value())
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The SVG source of `emoji`, from the cache or the provider's CDN.
pub async fn load_emoji(
    fetcher: &dyn RemoteFetcher,
    cache: &EmojiCache,
    provider: EmojiProvider,
    emoji: &str,
) -> Option<Arc<str>> {
    let code = emoji_code(emoji);
    let key = EmojiCache::key(provider, &code);
    if let Some(svg) = cache.get(&key) {
        return Some(svg);
    }

    match fetcher.fetch_text(&provider.url(&code), None).await {
        Ok(svg) => Some(cache.insert_if_absent(key, svg)),
        Err(e) => {
            log::warn!("Emoji glyph {} unavailable: {}", key, e);
            None
        }
    }
}
