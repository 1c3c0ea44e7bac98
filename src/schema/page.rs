//! Page subgraph: primary image, WebPage, content node, BreadcrumbList, ItemList.
//!
//! # Content type cascade
//!
//! The content model is the first non-`auto` answer among the rules that apply:
//!
//! 1. the post's own override
//! 2. the post type (or taxonomy) override
//! 3. the global default
//!
//! FAQPage with extraction disabled, or with nothing extracted, degrades to the
//! global default.

use super::{PageIds, Resolved, Scope, Skip, content, crumbs, id_ref, object};
use crate::{
    breadcrumb::resolve_trail,
    config::{SchemaType, SiteConfig},
    context::PageContext,
    source::Post,
    utils::{date::to_iso8601, text::strip_tags},
};
use serde_json::{Value, json};

/// Inputs visible to the cascade.
struct Cascade<'a> {
    config: &'a SiteConfig,
    ctx: &'a PageContext,
    post: Option<&'a Post>,
}

/// `(applies, source)`: the first rule that applies and answers non-`auto` wins.
type Rule = (fn(&Cascade<'_>) -> bool, fn(&Cascade<'_>) -> SchemaType);

const CASCADE: &[Rule] = &[
    (has_post, from_post),
    (has_override, from_override),
    (always, from_default),
];

fn has_post(input: &Cascade<'_>) -> bool {
    input.post.is_some()
}

fn has_override(input: &Cascade<'_>) -> bool {
    input.config.override_for(input.ctx).is_some()
}

fn always(_: &Cascade<'_>) -> bool {
    true
}

fn from_post(input: &Cascade<'_>) -> SchemaType {
    input.post.map(|post| post.schema_type).unwrap_or_default()
}

fn from_override(input: &Cascade<'_>) -> SchemaType {
    input
        .config
        .override_for(input.ctx)
        .map(|o| o.schema_type)
        .unwrap_or_default()
}

fn from_default(input: &Cascade<'_>) -> SchemaType {
    global_default(input.config)
}

/// Configured default, `WebPage` when it is itself `auto`.
fn global_default(config: &SiteConfig) -> SchemaType {
    match config.schema.default_type {
        SchemaType::Auto => SchemaType::WebPage,
        other => other,
    }
}

/// Content model for the page.
pub fn resolve_content_type(
    config: &SiteConfig,
    ctx: &PageContext,
    post: Option<&Post>,
) -> SchemaType {
    let input = Cascade { config, ctx, post };
    let resolved = CASCADE
        .iter()
        .filter(|(applies, _)| applies(&input))
        .map(|(_, source)| source(&input))
        .find(|t| *t != SchemaType::Auto)
        .unwrap_or(SchemaType::WebPage);

    if resolved == SchemaType::FaqPage && !config.faq_enabled(ctx) {
        return non_faq_default(config);
    }
    resolved
}

/// Global default, never FAQPage.
fn non_faq_default(config: &SiteConfig) -> SchemaType {
    match global_default(config) {
        SchemaType::FaqPage => SchemaType::WebPage,
        other => other,
    }
}

/// Resolve every page node in emission order.
pub(super) fn page_nodes(scope: &Scope<'_>, publisher: Option<Value>) -> Vec<Resolved> {
    let Some(url) = scope.ctx.page_url() else {
        return vec![Err(Skip::because("WebPage skipped: page url is missing"))];
    };
    let ids = PageIds::new(url);
    let post = scope.ctx.post_id.and_then(|id| scope.sources.store.post(id));
    let kind = resolve_content_type(scope.config, scope.ctx, post.as_ref());

    let primary_image = primary_image(scope, post.as_ref(), &ids);
    let has_image = primary_image.is_ok();

    let page = Page {
        scope,
        ids: &ids,
        post: post.as_ref(),
        publisher: publisher.as_ref(),
        has_image,
    };

    let mut main = page.content_node(kind);
    if kind == SchemaType::FaqPage && main.is_err() {
        main = page.content_node(non_faq_default(scope.config));
    }

    let breadcrumb = if scope.config.breadcrumb_enabled(scope.ctx) {
        let trail = resolve_trail(scope.ctx, scope.config, scope.sources.store);
        crumbs::breadcrumb_list(&trail, &ids)
    } else {
        Err(Skip::silent())
    };

    let item_list = if scope.ctx.kind.is_archive_like() || kind.is_listing() {
        content::item_list(&scope.sources.store.archive_items(scope.ctx), &ids)
    } else {
        Err(Skip::silent())
    };

    let webpage = page.webpage(breadcrumb.is_ok());
    vec![primary_image, webpage, main, breadcrumb, item_list]
}

/// `#primaryimage` from the post's featured image.
fn primary_image(scope: &Scope<'_>, post: Option<&Post>, ids: &PageIds) -> Resolved {
    let image = post
        .and_then(|post| post.featured_image)
        .and_then(|id| scope.sources.store.image(id))
        .filter(|image| !image.url.trim().is_empty())
        .ok_or(Skip::silent())?;

    Ok(object(json!({
        "@type": "ImageObject",
        "@id": ids.primary_image,
        "url": image.url,
        "contentUrl": image.url,
        "width": image.width,
        "height": image.height,
        "inLanguage": scope.config.base.language.trim(),
    })))
}

/// Everything a page-level resolver reads.
pub(super) struct Page<'s, 'a> {
    pub scope: &'s Scope<'a>,
    pub ids: &'s PageIds,
    pub post: Option<&'s Post>,
    pub publisher: Option<&'s Value>,
    pub has_image: bool,
}

impl Page<'_, '_> {
    /// Page title, falling back to the post title.
    pub fn title(&self) -> String {
        let title = self.scope.ctx.title.trim();
        if !title.is_empty() {
            return title.to_owned();
        }
        self.post.map(|post| post.title.trim().to_owned()).unwrap_or_default()
    }

    pub fn description(&self) -> String {
        self.post.map(|post| strip_tags(&post.excerpt)).unwrap_or_default()
    }

    /// `(datePublished, dateModified)`, modified falling back to published.
    pub fn dates(&self) -> (Option<String>, Option<String>) {
        let Some(post) = self.post else { return (None, None) };
        let offset = self.scope.config.base.offset();
        let published = to_iso8601(&post.published, offset);
        let modified = to_iso8601(&post.modified, offset).or_else(|| published.clone());
        (published, modified)
    }

    pub fn language(&self) -> &str {
        self.scope.config.base.language.trim()
    }

    fn content_node(&self, kind: SchemaType) -> Resolved {
        match kind {
            SchemaType::Article | SchemaType::NewsArticle | SchemaType::BlogPosting => {
                content::article(self, kind)
            }
            SchemaType::FaqPage => content::faq(self),
            SchemaType::QaPage => content::qa(self),
            SchemaType::Product => content::product(self),
            // listing models are carried by the ItemList node
            SchemaType::WebPage
            | SchemaType::CollectionPage
            | SchemaType::ItemList
            | SchemaType::Auto => Err(Skip::silent()),
        }
    }

    /// `#webpage`, typed by the page kind.
    fn webpage(&self, has_breadcrumb: bool) -> Resolved {
        let scope = self.scope;
        let page_type = match scope.ctx.kind.specialization() {
            Some(special) => json!(["WebPage", special]),
            None => json!("WebPage"),
        };
        let (published, modified) = self.dates();

        let mut node = object(json!({
            "@type": page_type,
            "@id": self.ids.webpage,
            "url": self.ids.url,
            "name": self.title(),
            "description": self.description(),
            "isPartOf": id_ref(&scope.ids.website),
            "inLanguage": self.language(),
            "datePublished": published,
            "dateModified": modified,
        }));
        if self.has_image {
            node.insert("primaryImageOfPage".into(), id_ref(&self.ids.primary_image));
        }
        if has_breadcrumb {
            node.insert("breadcrumb".into(), id_ref(&self.ids.breadcrumb));
        }
        if let Some(publisher) = self.publisher {
            node.insert("publisher".into(), publisher.clone());
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentOverride;

    fn config(default_type: SchemaType) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.schema.default_type = default_type;
        config
    }

    fn ctx(post_type: &str) -> PageContext {
        PageContext {
            post_id: Some(1),
            post_type: Some(post_type.into()),
            ..Default::default()
        }
    }

    fn post(schema_type: SchemaType) -> Post {
        Post {
            id: 1,
            schema_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_cascade_order() {
        let mut config = config(SchemaType::Article);
        config.content.insert(
            "product".into(),
            ContentOverride {
                schema_type: SchemaType::Product,
                ..Default::default()
            },
        );

        let p = post(SchemaType::QaPage);
        assert_eq!(resolve_content_type(&config, &ctx("product"), Some(&p)), SchemaType::QaPage);
        let p = post(SchemaType::Auto);
        assert_eq!(resolve_content_type(&config, &ctx("product"), Some(&p)), SchemaType::Product);
        assert_eq!(resolve_content_type(&config, &ctx("page"), Some(&p)), SchemaType::Article);
        assert_eq!(resolve_content_type(&config, &ctx("page"), None), SchemaType::Article);
    }

    #[test]
    fn test_auto_default_is_webpage() {
        let config = config(SchemaType::Auto);
        assert_eq!(resolve_content_type(&config, &ctx("post"), None), SchemaType::WebPage);
    }

    #[test]
    fn test_faq_disabled_degrades() {
        let mut config = config(SchemaType::BlogPosting);
        config.schema.faq = false;
        let p = post(SchemaType::FaqPage);
        assert_eq!(
            resolve_content_type(&config, &ctx("post"), Some(&p)),
            SchemaType::BlogPosting
        );

        let mut config = self::config(SchemaType::FaqPage);
        config.schema.faq = false;
        assert_eq!(resolve_content_type(&config, &ctx("post"), None), SchemaType::WebPage);
    }
}
