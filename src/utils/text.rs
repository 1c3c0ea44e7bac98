//! Plain-text helpers for content pulled from posts.

use regex::Regex;
use std::sync::LazyLock;

/// `<script>`/`<style>` blocks including their bodies.
static RE_HIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Remove markup, decode the common entities and collapse whitespace.
pub fn strip_tags(html: &str) -> String {
    let text = RE_HIDDEN.replace_all(html, " ");
    let text = RE_TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    collapse_whitespace(&text)
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    RE_SPACE.replace_all(text, " ").trim().to_owned()
}

/// Shorten to at most `max_chars` characters, cutting at a word boundary
/// when one exists in the second half.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let text = collapse_whitespace(text);
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(space) if space >= cut.len() / 2 => cut[..space].trim_end().to_owned(),
        _ => cut,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}
