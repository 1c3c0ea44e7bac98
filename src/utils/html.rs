//! JSON-LD `<script>` block scanning over raw HTML text.

use regex::Regex;
use std::{ops::Range, sync::LazyLock};

/// `<script ... type="application/ld+json" ...>body</script>`, any attribute order.
static RE_LD_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<script\b([^>]*\btype\s*=\s*["']?application/ld\+json["']?[^>]*)>(.*?)</script\s*>"#,
    )
    .unwrap()
});

/// One JSON-LD block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdJsonBlock<'a> {
    /// Byte range of the whole element, tags included.
    pub range: Range<usize>,
    /// Raw attribute text of the opening tag.
    pub attrs: &'a str,
    /// Element body.
    pub body: &'a str,
}

impl LdJsonBlock<'_> {
    /// Whether the opening tag carries `marker` (an exact attribute string).
    pub fn has_marker(&self, marker: &str) -> bool {
        self.attrs.contains(marker)
    }
}

/// All JSON-LD blocks in document order.
pub fn ld_json_blocks(text: &str) -> Vec<LdJsonBlock<'_>> {
    RE_LD_JSON
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(LdJsonBlock {
                range: whole.range(),
                attrs: caps.get(1)?.as_str(),
                body: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_blocks() {
        let html = r#"<head><script type="application/ld+json">{"a":1}</script>
<script src="x.js"></script>
<SCRIPT data-x="1" type='application/ld+json'>
{"b":2}
</SCRIPT ></head>"#;
        let blocks = ld_json_blocks(html);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].body, r#"{"a":1}"#);
        assert_eq!(blocks[1].body.trim(), r#"{"b":2}"#);
        assert!(blocks[1].has_marker(r#"data-x="1""#));
        assert_eq!(&html[blocks[0].range.clone()], r#"<script type="application/ld+json">{"a":1}</script>"#);
    }

    #[test]
    fn test_ignores_other_scripts() {
        assert!(ld_json_blocks(r#"<script type="text/javascript">var a;</script>"#).is_empty());
    }
}
