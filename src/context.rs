//! Page context: what is being rendered right now.
//!
//! The host resolves a [`PageContext`] once per request and hands it to the
//! builder, the breadcrumb resolver and the arbitrator. It is never mutated
//! during a render.

use serde::{Deserialize, Serialize};

/// Kind of page being rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    FrontPage,
    BlogHome,
    Singular,
    Page,
    Category,
    Tag,
    Taxonomy,
    Author,
    Search,
    Archive,
    #[default]
    General,
}

impl PageKind {
    /// Listing pages: breadcrumb `[Home, current]` and an archive ItemList.
    pub const fn is_archive_like(self) -> bool {
        matches!(
            self,
            Self::BlogHome
                | Self::Category
                | Self::Tag
                | Self::Taxonomy
                | Self::Author
                | Self::Search
                | Self::Archive
        )
    }

    /// Term listings whose overrides come from `[taxonomy.*]`.
    pub const fn is_term_archive(self) -> bool {
        matches!(self, Self::Category | Self::Tag | Self::Taxonomy)
    }

    /// WebPage specialization inferred from the page kind.
    pub const fn specialization(self) -> Option<&'static str> {
        match self {
            Self::FrontPage => Some("HomePage"),
            Self::BlogHome | Self::Category | Self::Tag | Self::Taxonomy | Self::Archive => {
                Some("CollectionPage")
            }
            Self::Search => Some("SearchResultsPage"),
            Self::Author => Some("ProfilePage"),
            Self::Singular | Self::Page | Self::General => None,
        }
    }
}

/// Resolved description of the current page.
///
/// # Example
/// ```json
/// { "kind": "singular", "post_id": 42, "post_type": "post",
///   "title": "Hello", "url": "https://acme.example/hello/" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageContext {
    #[serde(default, alias = "type")]
    pub kind: PageKind,

    #[serde(default)]
    pub post_id: Option<u64>,

    /// Queried term for category/tag/taxonomy listings.
    #[serde(default, alias = "term")]
    pub term_id: Option<u64>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub post_type: Option<String>,

    #[serde(default)]
    pub taxonomy: Option<String>,
}

impl PageContext {
    /// Front page context for `url`.
    pub fn front_page(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: PageKind::FrontPage,
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Taxonomy of a term listing, implied for categories and tags.
    pub fn taxonomy_name(&self) -> Option<&str> {
        match (self.taxonomy.as_deref(), self.kind) {
            (Some(taxonomy), _) if !taxonomy.is_empty() => Some(taxonomy),
            (_, PageKind::Category) => Some("category"),
            (_, PageKind::Tag) => Some("post_tag"),
            _ => None,
        }
    }

    /// Trimmed page url, `None` when blank.
    pub fn page_url(&self) -> Option<&str> {
        Some(self.url.trim()).filter(|url| !url.is_empty())
    }
}
