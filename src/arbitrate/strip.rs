//! Removal of competing JSON-LD from buffered output.
//!
//! Two passes:
//!
//! 1. every `ld+json` script block without the ownership marker is removed
//! 2. caller patterns run over what is left, except where a match overlaps a
//!    marked block or contains the marker itself

use super::ArbitrationError;
use crate::{emit::MARKER, utils::html::ld_json_blocks};
use regex::Regex;
use std::ops::Range;

/// Compiled stripping rules.
#[derive(Debug, Clone, Default)]
pub struct Stripper {
    patterns: Vec<Regex>,
}

impl Stripper {
    /// Compile caller patterns; the first invalid one is an error.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ArbitrationError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|err| ArbitrationError::Pattern(p.to_owned(), err))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Strip `html`, returning the text and how many foreign blocks were removed.
    pub fn strip(&self, html: &str) -> (String, usize) {
        let foreign: Vec<Range<usize>> = ld_json_blocks(html)
            .into_iter()
            .filter(|block| !block.has_marker(MARKER))
            .map(|block| block.range)
            .collect();
        let removed = foreign.len();
        let mut text = cut(html, &foreign);

        for pattern in &self.patterns {
            let owned = owned_ranges(&text);
            let matches: Vec<Range<usize>> = pattern
                .find_iter(&text)
                .filter(|m| !m.is_empty())
                .filter(|m| !m.as_str().contains(MARKER))
                .map(|m| m.range())
                .filter(|range| !owned.iter().any(|o| overlaps(o, range)))
                .collect();
            if !matches.is_empty() {
                text = cut(&text, &matches);
            }
        }

        (text, removed)
    }
}

/// Byte ranges of marked blocks.
fn owned_ranges(text: &str) -> Vec<Range<usize>> {
    ld_json_blocks(text)
        .into_iter()
        .filter(|block| block.has_marker(MARKER))
        .map(|block| block.range)
        .collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// `text` without the given sorted, non-overlapping ranges.
fn cut(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for range in ranges {
        out.push_str(&text[pos..range.start]);
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}
