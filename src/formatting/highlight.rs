// src/formatting/highlight.rs
//! Code syntax highlighting using syntect.

use super::node::escape_html;
use once_cell::sync::Lazy;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Grammar used when a block's language is unknown
const FALLBACK_LANGUAGE: &str = "javascript";

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

static THEME: Lazy<Option<Theme>> = Lazy::new(|| {
    let theme_set = ThemeSet::load_defaults();
    theme_set
        .themes
        .get("InspiredGitHub")
        .or_else(|| theme_set.themes.get("base16-ocean.light"))
        .cloned()
});

/// Finds the grammar for a (lowercased) language name.
fn find_syntax(language: &str) -> &'static SyntaxReference {
    let ss = &*SYNTAX_SET;
    ss.find_syntax_by_token(language)
        .or_else(|| ss.find_syntax_by_extension(language))
        .or_else(|| {
            log::debug!("No grammar for '{}', using {}", language, FALLBACK_LANGUAGE);
            ss.find_syntax_by_token(FALLBACK_LANGUAGE)
        })
        .unwrap_or_else(|| ss.find_syntax_plain_text())
}

/// Highlights `code` as `language`, returning a complete `<pre>` element.
pub fn highlight_code(code: &str, language: &str) -> String {
    let language = language.to_lowercase();
    let syntax = find_syntax(&language);

    let Some(theme) = THEME.as_ref() else {
        return plain_code_block(code);
    };

    match highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme) {
        Ok(html) => html,
        Err(e) => {
            log::warn!("Highlighting {} code failed: {}", language, e);
            plain_code_block(code)
        }
    }
}

fn plain_code_block(code: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(code))
}
