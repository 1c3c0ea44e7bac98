//! Host-side collaborators consumed by the builder.
//!
//! The core never talks to a database, a DOM or a commerce plugin directly.
//! Everything it needs from the host flows through the traits here:
//!
//! | Trait              | Supplies                                        |
//! |--------------------|-------------------------------------------------|
//! | [`ContentStore`]   | posts, terms, archive listings, image metadata  |
//! | [`FaqExtractor`]   | question/answer pairs from post content         |
//! | [`CommerceAdapter`]| product price, currency, availability           |
//!
//! [`MemoryStore`] implements the store and the commerce adapter from a JSON
//! fixture; [`ClassFaqExtractor`] is the default FAQ extractor.

mod faq;
mod memory;

pub use faq::ClassFaqExtractor;
pub use memory::{Fixture, FixtureError, MemoryStore};

use crate::{config::SchemaType, context::PageContext};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Records
// ============================================================================

/// A post, page or any other singular content item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Post {
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    /// Parent post for hierarchical post types.
    #[serde(default)]
    pub parent: Option<u64>,

    #[serde(default)]
    pub post_type: String,

    #[serde(default)]
    pub excerpt: String,

    /// Rendered HTML content.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub author: Option<Author>,

    /// Publication date, RFC 3339 or site-local `YYYY-MM-DD HH:MM:SS`.
    #[serde(default)]
    pub published: String,

    #[serde(default)]
    pub modified: String,

    /// Featured image attachment id.
    #[serde(default)]
    pub featured_image: Option<u64>,

    /// Per-post content model override.
    #[serde(default, deserialize_with = "lenient_schema_type")]
    pub schema_type: SchemaType,

    /// Arbitrary post meta (used by the product fallback chain).
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A taxonomy term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Term {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub taxonomy: String,

    #[serde(default)]
    pub parent: Option<u64>,

    /// Whether the taxonomy nests (categories do, tags do not).
    #[serde(default)]
    pub hierarchical: bool,
}

/// Resolved image attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One entry of an archive listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveItem {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// One extracted FAQ entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Product facts supplied by a commerce integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Unknown override names behave like `auto`.
fn lenient_schema_type<'de, D: Deserializer<'de>>(de: D) -> Result<SchemaType, D::Error> {
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw
        .and_then(|s| s.parse::<SchemaType>().ok())
        .unwrap_or_default())
}

// ============================================================================
// Traits
// ============================================================================

/// Read access to site content.
pub trait ContentStore {
    fn post(&self, id: u64) -> Option<Post>;

    fn term(&self, id: u64) -> Option<Term>;

    /// Posts listed on an archive-like page, in display order.
    fn archive_items(&self, ctx: &PageContext) -> Vec<ArchiveItem>;

    /// Image metadata for an attachment id.
    fn image(&self, id: u64) -> Option<ImageMeta>;
}

/// Extracts FAQ entries marked up with CSS classes.
pub trait FaqExtractor {
    fn extract(&self, question_class: &str, answer_class: &str, content: &str) -> Vec<QaPair>;
}

/// Optional commerce integration.
pub trait CommerceAdapter {
    fn product(&self, post_id: u64) -> Option<ProductFields>;
}

/// Collaborators for one build.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub store: &'a dyn ContentStore,
    pub faq: &'a dyn FaqExtractor,
    pub commerce: Option<&'a dyn CommerceAdapter>,
}

impl<'a> Sources<'a> {
    /// Store with the default FAQ extractor and no commerce adapter.
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self {
            store,
            faq: &ClassFaqExtractor,
            commerce: None,
        }
    }

    pub fn with_faq(mut self, faq: &'a dyn FaqExtractor) -> Self {
        self.faq = faq;
        self
    }

    pub fn with_commerce(mut self, commerce: &'a dyn CommerceAdapter) -> Self {
        self.commerce = Some(commerce);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_schema_type_lenient() {
        let post: Post = serde_json::from_str(r#"{"id":1,"schema_type":"faqpage"}"#).unwrap();
        assert_eq!(post.schema_type, SchemaType::FaqPage);

        let post: Post = serde_json::from_str(r#"{"id":1,"schema_type":"Recipe"}"#).unwrap();
        assert_eq!(post.schema_type, SchemaType::Auto);

        let post: Post = serde_json::from_str(r#"{"id":1}"#).unwrap();
        assert_eq!(post.schema_type, SchemaType::Auto);
    }
}
