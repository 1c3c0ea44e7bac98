//! Class-based FAQ extraction.
//!
//! Scans rendered post HTML for elements whose `class` list contains the
//! question class or the answer class, and pairs every question with the next
//! answer that follows it. Nested elements of the same tag name are balanced;
//! everything else about the markup is taken at face value.

use super::{FaqExtractor, QaPair};
use crate::utils::text::strip_tags;
use regex::Regex;
use std::sync::LazyLock;

static RE_OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<([a-z][a-z0-9-]*)\b([^>]*)>").unwrap());

static RE_CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap());

/// HTML void elements never carry text content.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Question,
    Answer,
}

/// Default [`FaqExtractor`] working on raw HTML text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassFaqExtractor;

impl FaqExtractor for ClassFaqExtractor {
    fn extract(&self, question_class: &str, answer_class: &str, content: &str) -> Vec<QaPair> {
        if question_class.is_empty() || answer_class.is_empty() || content.is_empty() {
            return Vec::new();
        }

        let lower = content.to_ascii_lowercase();
        let mut pairs = Vec::new();
        let mut pending: Option<String> = None;
        let mut pos = 0;

        while let Some(caps) = RE_OPEN_TAG.captures_at(content, pos) {
            let (Some(whole), Some(tag), Some(attrs)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                break;
            };
            pos = whole.end();

            let tag = tag.as_str().to_ascii_lowercase();
            let Some(mark) = classify(attrs.as_str(), question_class, answer_class) else {
                continue;
            };
            if VOID_TAGS.contains(&tag.as_str()) || attrs.as_str().trim_end().ends_with('/') {
                continue;
            }
            let Some((inner_end, close_end)) = find_close(&lower, &tag, whole.end()) else {
                continue;
            };

            let text = strip_tags(&content[whole.end()..inner_end]);
            pos = close_end;
            if text.is_empty() {
                continue;
            }

            match mark {
                Mark::Question => pending = Some(text),
                Mark::Answer => {
                    if let Some(question) = pending.take() {
                        pairs.push(QaPair {
                            question,
                            answer: text,
                        });
                    }
                }
            }
        }

        pairs
    }
}

/// Which mark, if any, the element's class list carries.
fn classify(attrs: &str, question_class: &str, answer_class: &str) -> Option<Mark> {
    let caps = RE_CLASS_ATTR.captures(attrs)?;
    let classes = caps.get(1).or(caps.get(2)).or(caps.get(3))?.as_str();
    let has = |wanted: &str| classes.split_whitespace().any(|c| c == wanted);

    if has(question_class) {
        Some(Mark::Question)
    } else if has(answer_class) {
        Some(Mark::Answer)
    } else {
        None
    }
}

/// Locate the matching `</tag>` for an element opened before `from`.
///
/// Returns `(start of closing tag, end of closing tag)`.
fn find_close(lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = 1usize;
    let mut cursor = from;

    loop {
        let next_close = find_tag(lower, &close, cursor)?;
        let next_open = find_tag(lower, &open, cursor).filter(|&i| i < next_close);

        match next_open {
            Some(i) => {
                depth += 1;
                cursor = i + open.len();
            }
            None => {
                depth -= 1;
                let end = lower[next_close..].find('>').map(|i| next_close + i + 1)?;
                if depth == 0 {
                    return Some((next_close, end));
                }
                cursor = end;
            }
        }
    }
}

/// First `needle` at or after `from` that ends on a tag-name boundary.
///
/// `<p` inside `<pre` and `</p` inside `</pre>` are skipped.
fn find_tag(lower: &str, needle: &str, from: usize) -> Option<usize> {
    let mut cursor = from;
    loop {
        let at = lower[cursor..].find(needle).map(|i| cursor + i)?;
        if is_tag_boundary(lower, at + needle.len()) {
            return Some(at);
        }
        cursor = at + needle.len();
    }
}

/// `<div` must be followed by whitespace, `>` or `/` to open a `div`.
fn is_tag_boundary(lower: &str, at: usize) -> bool {
    matches!(
        lower.as_bytes().get(at),
        Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')
    )
}
