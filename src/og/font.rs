// src/og/font.rs
//! Subset font loading from Google Fonts.

use crate::constants::{GOOGLE_FONTS_CSS_URL, LEGACY_SAFARI_USER_AGENT};
use crate::remote::RemoteFetcher;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static FONT_SRC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"src: url\((.+)\) format\('(opentype|truetype)'\)")
        .expect("Failed to compile font source regex - this is a bug in the code")
});

/// CSS2 URL for a font subset covering exactly the characters of `text`.
pub fn font_css_url(text: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(GOOGLE_FONTS_CSS_URL)?;
    url.query_pairs_mut().append_pair("text", text);
    Ok(url.into())
}

/// The first TTF/OTF source declared in a CSS2 response.
pub fn extract_font_url(css: &str) -> Option<&str> {
    FONT_SRC_PATTERN
        .captures(css)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Downloads a font subset able to draw `text`.
///
/// Returns `None` on any failure; the card is then drawn without the
/// custom font.
pub async fn load_google_font(fetcher: &dyn RemoteFetcher, text: &str) -> Option<Vec<u8>> {
    let css_url = match font_css_url(text) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Could not build font URL: {}", e);
            return None;
        }
    };

    let css = match fetcher
        .fetch_text(&css_url, Some(LEGACY_SAFARI_USER_AGENT))
        .await
    {
        Ok(css) => css,
        Err(e) => {
            log::warn!("Font CSS request failed: {}", e);
            return None;
        }
    };

    let Some(font_url) = extract_font_url(&css) else {
        log::warn!("Font CSS declared no TrueType or OpenType source");
        return None;
    };

    match fetcher.fetch_bytes(font_url).await {
        Ok(bytes) => {
            log::debug!("Loaded font subset: {} bytes", bytes.len());
            Some(bytes)
        }
        Err(e) => {
            log::warn!("Font download failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::StaticFetcher;

    const CSS: &str = "@font-face {\n  font-family: 'Noto Sans JP';\n  src: url(https://fonts.gstatic.com/l/font?kit=abc) format('truetype');\n}\n";

    #[test]
    fn css_url_carries_encoded_text() {
        let url = font_css_url("Hi there").unwrap();
        assert!(url.starts_with(GOOGLE_FONTS_CSS_URL));
        assert!(url.ends_with("&text=Hi+there"));
    }

    #[test]
    fn extracts_truetype_source() {
        assert_eq!(
            extract_font_url(CSS),
            Some("https://fonts.gstatic.com/l/font?kit=abc")
        );
        assert_eq!(extract_font_url("src: url(x.woff2) format('woff2')"), None);
    }

    #[tokio::test]
    async fn loads_font_with_legacy_user_agent() {
        let css_url = font_css_url("USRM Blog").unwrap();
        let fetcher = StaticFetcher::new()
            .with_body(css_url.clone(), CSS)
            .with_body("https://fonts.gstatic.com/l/font?kit=abc", vec![0u8, 1, 0, 0]);

        let font = load_google_font(&fetcher, "USRM Blog").await;
        assert_eq!(font, Some(vec![0, 1, 0, 0]));

        let requests = fetcher.requests();
        assert_eq!(requests[0].url, css_url);
        assert_eq!(requests[0].user_agent.as_deref(), Some(LEGACY_SAFARI_USER_AGENT));
    }

    #[tokio::test]
    async fn missing_css_means_no_font() {
        let fetcher = StaticFetcher::new();
        assert_eq!(load_google_font(&fetcher, "x").await, None);
    }
}
