//! # Markup Utilities
//!
//! Editor content is rich-text markup (`<p>Hello <b>world</b></p>`). Several
//! decisions need the plain text behind it: the empty-content rule, the
//! auto-generated title, and search filtering. Nothing here ever rewrites the
//! stored markup; these functions only read it.
//!
//! ## Stripping
//!
//! [`strip_markup`] removes tags. Block-level tags (paragraphs, list items,
//! headings, line breaks) become a newline so words in adjacent blocks do not
//! run together. Non-breaking spaces (`&nbsp;`) become plain spaces, since the
//! editor emits them for runs of whitespace. No other entity is decoded.
//!
//! Stripping is idempotent: the output never contains a `<` followed by a
//! `>`, so a second pass has nothing left to remove.
//!
//! ## Titles
//!
//! [`derive_title`] takes the first [`TITLE_WORDS`] words of the plain text
//! and appends [`ELLIPSIS`] when more words follow.

use once_cell::sync::Lazy;
use regex::Regex;

pub const TITLE_WORDS: usize = 5;
pub const ELLIPSIS: &str = "...";

static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(p|div|br|li|ul|ol|h[1-6]|blockquote|pre|tr|hr)\b[^>]*>")
        .expect("block tag pattern is valid")
});

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Removes markup tags, keeping block boundaries as newlines.
pub fn strip_markup(markup: &str) -> String {
    let blocks = BLOCK_TAG.replace_all(markup, "\n");
    let text = ANY_TAG.replace_all(&blocks, "");
    text.replace("&nbsp;", " ")
}

/// Stripped text with whitespace runs collapsed to single spaces and trimmed.
pub fn plain_text(markup: &str) -> String {
    strip_markup(markup)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the markup carries no visible text (`""`, `<p></p>`, `<p>  </p>`).
pub fn is_blank(markup: &str) -> bool {
    strip_markup(markup).trim().is_empty()
}

pub fn derive_title(markup: &str) -> String {
    let stripped = strip_markup(markup);
    let words: Vec<&str> = stripped.split_whitespace().collect();
    if words.len() > TITLE_WORDS {
        format!("{}{}", words[..TITLE_WORDS].join(" "), ELLIPSIS)
    } else {
        words.join(" ")
    }
}

/// First `max_chars` characters of the plain text, for list rows.
pub fn preview(markup: &str, max_chars: usize) -> String {
    let text = plain_text(markup);
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Wraps plain text in a paragraph, escaping the characters markup reserves.
pub fn paragraph(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<p>{}</p>", escaped)
}
