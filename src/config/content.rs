//! `[schema]`, `[breadcrumb]`, `[content.*]` and `[taxonomy.*]` sections.
//!
//! Controls which content node a page gets and whether it carries a breadcrumb.

use super::{Priority, defaults};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// ============================================================================
// Enums
// ============================================================================

/// Content model requested for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaType {
    /// Defer to the next rule in the cascade.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    WebPage,
    Article,
    NewsArticle,
    BlogPosting,
    #[serde(rename = "FAQPage")]
    FaqPage,
    #[serde(rename = "QAPage")]
    QaPage,
    Product,
    CollectionPage,
    ItemList,
}

impl SchemaType {
    /// schema.org type name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::WebPage => "WebPage",
            Self::Article => "Article",
            Self::NewsArticle => "NewsArticle",
            Self::BlogPosting => "BlogPosting",
            Self::FaqPage => "FAQPage",
            Self::QaPage => "QAPage",
            Self::Product => "Product",
            Self::CollectionPage => "CollectionPage",
            Self::ItemList => "ItemList",
        }
    }

    pub const fn is_article(self) -> bool {
        matches!(self, Self::Article | Self::NewsArticle | Self::BlogPosting)
    }

    pub const fn is_listing(self) -> bool {
        matches!(self, Self::CollectionPage | Self::ItemList)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = String;

    /// Case-insensitive parse of the schema.org name or `auto`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            Self::Auto,
            Self::WebPage,
            Self::Article,
            Self::NewsArticle,
            Self::BlogPosting,
            Self::FaqPage,
            Self::QaPage,
            Self::Product,
            Self::CollectionPage,
            Self::ItemList,
        ];
        let s = s.trim();
        all.into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown schema type `{s}`"))
    }
}

// ============================================================================
// Sections
// ============================================================================

/// `[schema]` section - global content-model defaults.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Content model used when no override applies.
    #[serde(default = "defaults::schema::default_type")]
    #[educe(Default = defaults::schema::default_type())]
    pub default_type: SchemaType,

    /// FAQ extraction enabled unless a content type turns it off.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub faq: bool,

    /// CSS class marking FAQ questions in post content.
    #[serde(default = "defaults::schema::faq_question_class")]
    #[educe(Default = defaults::schema::faq_question_class())]
    pub faq_question_class: String,

    /// CSS class marking FAQ answers in post content.
    #[serde(default = "defaults::schema::faq_answer_class")]
    #[educe(Default = defaults::schema::faq_answer_class())]
    pub faq_answer_class: String,
}

/// `[breadcrumb]` section.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BreadcrumbConfig {
    /// Emit BreadcrumbList unless a content type turns it off.
    #[serde(default = "defaults::r#true", alias = "enabled")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Label of the first trail entry.
    #[serde(default = "defaults::breadcrumb::home_label")]
    #[educe(Default = defaults::breadcrumb::home_label())]
    pub home_label: String,
}

/// `[content.<post_type>]` / `[taxonomy.<name>]` override.
///
/// # Example
/// ```toml
/// [content.post]
/// schema_type = "BlogPosting"
///
/// [content.faq]
/// schema_type = "FAQPage"
/// breadcrumb = false
///
/// [taxonomy.product_cat]
/// schema_type = "ItemList"
/// priority = "external"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentOverride {
    #[serde(default, alias = "type")]
    pub schema_type: SchemaType,

    #[serde(default)]
    pub breadcrumb: Option<bool>,

    #[serde(default)]
    pub faq: Option<bool>,

    /// Who owns structured data output for this content type.
    #[serde(default)]
    pub priority: Option<Priority>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_schema_type_names() {
        assert_eq!("faqpage".parse::<SchemaType>().unwrap(), SchemaType::FaqPage);
        assert_eq!(" BlogPosting ".parse::<SchemaType>().unwrap(), SchemaType::BlogPosting);
        assert_eq!("AUTO".parse::<SchemaType>().unwrap(), SchemaType::Auto);
        assert!("Recipe".parse::<SchemaType>().is_err());
        assert_eq!(SchemaType::QaPage.to_string(), "QAPage");
    }

    #[test]
    fn test_content_overrides() {
        let config = r#"
            [schema]
            default_type = "Article"

            [content.faq]
            schema_type = "FAQPage"
            breadcrumb = false

            [taxonomy.genre]
            type = "ItemList"
            faq = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.schema.default_type, SchemaType::Article);
        let faq = &config.content["faq"];
        assert_eq!(faq.schema_type, SchemaType::FaqPage);
        assert_eq!(faq.breadcrumb, Some(false));
        assert_eq!(config.taxonomy["genre"].schema_type, SchemaType::ItemList);
        assert_eq!(config.taxonomy["genre"].faq, Some(false));
    }

    #[test]
    fn test_schema_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.schema.default_type, SchemaType::WebPage);
        assert!(config.schema.faq);
        assert_eq!(config.schema.faq_question_class, "faq-question");
        assert!(config.breadcrumb.enable);
        assert_eq!(config.breadcrumb.home_label, "Home");
    }
}
