//! Content nodes: Article family, FAQPage, QAPage, Product, ItemList.

use super::{PageIds, Resolved, Skip, id_ref, object, page::Page};
use crate::{
    config::SchemaType,
    source::{ArchiveItem, Post},
    utils::text::{strip_tags, truncate_chars},
};
use serde_json::{Value, json};

/// Headline length accepted by rich results.
const HEADLINE_MAX: usize = 110;

/// Archive listings are cut to this many entries.
const ITEMLIST_MAX: usize = 10;

const SCHEMA_ORG: &str = "https://schema.org/";

// ============================================================================
// Article
// ============================================================================

/// `#article` as Article, NewsArticle or BlogPosting.
pub(super) fn article(page: &Page<'_, '_>, kind: SchemaType) -> Resolved {
    let post = require_post(page, kind)?;

    let title = page.title();
    let headline = if title.is_empty() {
        truncate_chars(&strip_tags(&post.excerpt), HEADLINE_MAX)
    } else {
        truncate_chars(&title, HEADLINE_MAX)
    };
    let (published, modified) = page.dates();

    let mut node = object(json!({
        "@type": kind.as_str(),
        "@id": page.ids.article,
        "headline": headline,
        "description": page.description(),
        "datePublished": published,
        "dateModified": modified,
        "mainEntityOfPage": id_ref(&page.ids.webpage),
        "isPartOf": id_ref(&page.ids.webpage),
        "inLanguage": page.language(),
    }));
    if let Some(author) = post.author.as_ref().filter(|a| !a.name.trim().is_empty()) {
        node.insert(
            "author".into(),
            json!({ "@type": "Person", "name": author.name.trim(), "url": author.url.trim() }),
        );
    }
    if page.has_image {
        node.insert("image".into(), id_ref(&page.ids.primary_image));
    }
    if let Some(publisher) = page.publisher {
        node.insert("publisher".into(), publisher.clone());
    }
    Ok(node)
}

// ============================================================================
// FAQPage / QAPage
// ============================================================================

/// `#faq` from the class-marked pairs in the post content.
pub(super) fn faq(page: &Page<'_, '_>) -> Resolved {
    let post = require_post(page, SchemaType::FaqPage)?;
    let schema = &page.scope.config.schema;
    let pairs = page.scope.sources.faq.extract(
        &schema.faq_question_class,
        &schema.faq_answer_class,
        &post.content,
    );
    if pairs.is_empty() {
        return Err(Skip::because("FAQPage skipped: no question/answer pairs found"));
    }

    let questions: Vec<Value> = pairs
        .iter()
        .map(|pair| {
            json!({
                "@type": "Question",
                "name": pair.question,
                "acceptedAnswer": { "@type": "Answer", "text": pair.answer },
            })
        })
        .collect();

    Ok(object(json!({
        "@type": "FAQPage",
        "@id": page.ids.faq,
        "mainEntity": questions,
        "isPartOf": id_ref(&page.ids.webpage),
        "inLanguage": page.language(),
    })))
}

/// `#qa`: the page title as the question, the excerpt or content as its answer.
///
/// Without a post the title answers itself.
pub(super) fn qa(page: &Page<'_, '_>) -> Resolved {
    let question = page.title();
    if question.is_empty() {
        return Err(Skip::because("QAPage skipped: title is missing"));
    }

    let answer = page
        .post
        .into_iter()
        .flat_map(|post| [strip_tags(&post.excerpt), strip_tags(&post.content)])
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| question.clone());
    let (published, _) = page.dates();

    Ok(object(json!({
        "@type": "QAPage",
        "@id": page.ids.qa,
        "mainEntity": {
            "@type": "Question",
            "name": question,
            "text": question,
            "answerCount": 1,
            "dateCreated": published,
            "acceptedAnswer": {
                "@type": "Answer",
                "text": answer,
                "url": page.ids.url,
            },
        },
        "isPartOf": id_ref(&page.ids.webpage),
        "inLanguage": page.language(),
    })))
}

// ============================================================================
// Product
// ============================================================================

/// Post meta keys tried in order, after the commerce adapter.
const PRICE_KEYS: &[&str] = &["_price", "_sale_price", "_regular_price", "price", "product_price"];
const CURRENCY_KEYS: &[&str] = &["_currency", "currency", "product_currency"];
const AVAILABILITY_KEYS: &[&str] = &["_stock_status", "availability", "stock_status"];
const SKU_KEYS: &[&str] = &["_sku", "sku"];
const BRAND_KEYS: &[&str] = &["_brand", "brand"];

/// `#product`, one Offer from the commerce adapter or post meta.
///
/// Pages without a post get the default offer.
pub(super) fn product(page: &Page<'_, '_>) -> Resolved {
    let name = page.title();
    if name.is_empty() {
        return Err(Skip::because("Product skipped: name is missing"));
    }

    let post = page.post;
    let fields = post
        .zip(page.scope.sources.commerce)
        .and_then(|(post, commerce)| commerce.product(post.id))
        .unwrap_or_default();
    let field = |adapter: &Option<String>, keys: &[&str], accept: fn(&str) -> Option<String>| {
        adapter.as_deref().and_then(accept).or_else(|| {
            let meta = &post?.meta;
            keys.iter().filter_map(|k| meta.get(*k)).find_map(|v| accept(v))
        })
    };

    let price = field(&fields.price, PRICE_KEYS, normalize_price).unwrap_or_else(|| "0".into());
    let currency = field(&fields.currency, CURRENCY_KEYS, normalize_currency)
        .unwrap_or_else(|| default_currency(page).into());
    let availability = field(&fields.availability, AVAILABILITY_KEYS, normalize_availability)
        .unwrap_or_else(|| format!("{SCHEMA_ORG}InStock"));
    let sku = field(&fields.sku, SKU_KEYS, non_blank);
    let brand = field(&fields.brand, BRAND_KEYS, non_blank);

    let mut node = object(json!({
        "@type": "Product",
        "@id": page.ids.product,
        "name": name,
        "description": page.description(),
        "sku": sku,
        "offers": {
            "@type": "Offer",
            "price": price,
            "priceCurrency": currency,
            "availability": availability,
            "url": page.ids.url,
        },
        "mainEntityOfPage": id_ref(&page.ids.webpage),
    }));
    if let Some(brand) = brand {
        node.insert("brand".into(), json!({ "@type": "Brand", "name": brand }));
    }
    if page.has_image {
        node.insert("image".into(), id_ref(&page.ids.primary_image));
    }
    Ok(node)
}

fn default_currency(page: &Page<'_, '_>) -> &'static str {
    if page.scope.config.base.is_japanese() { "JPY" } else { "USD" }
}

fn non_blank(raw: &str) -> Option<String> {
    Some(raw.trim()).filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Non-negative decimal, thousands separators removed.
fn normalize_price(raw: &str) -> Option<String> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(cleaned)
}

/// ISO 4217 code, upper-cased.
fn normalize_currency(raw: &str) -> Option<String> {
    let code = raw.trim();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

/// Stock status or schema.org ItemAvailability → full schema.org url.
fn normalize_availability(raw: &str) -> Option<String> {
    let key: String = raw
        .trim()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    let name = match key.as_str() {
        "instock" => "InStock",
        "outofstock" => "OutOfStock",
        "onbackorder" | "backorder" => "BackOrder",
        "preorder" => "PreOrder",
        "discontinued" => "Discontinued",
        "limitedavailability" => "LimitedAvailability",
        _ => return None,
    };
    Some(format!("{SCHEMA_ORG}{name}"))
}

// ============================================================================
// ItemList
// ============================================================================

/// `#itemlist` of the first archive entries.
pub(super) fn item_list(items: &[ArchiveItem], ids: &PageIds) -> Resolved {
    let elements: Vec<Value> = items
        .iter()
        .filter(|item| !item.url.trim().is_empty())
        .take(ITEMLIST_MAX)
        .enumerate()
        .map(|(i, item)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "url": item.url.trim(),
                "name": item.title.trim(),
            })
        })
        .collect();
    if elements.is_empty() {
        return Err(Skip::silent());
    }

    Ok(object(json!({
        "@type": "ItemList",
        "@id": ids.itemlist,
        "numberOfItems": elements.len(),
        "itemListElement": elements,
    })))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn require_post<'p>(page: &Page<'p, '_>, kind: SchemaType) -> Result<&'p Post, Skip> {
    page.post
        .ok_or_else(|| Skip::because(format!("{kind} skipped: page has no post")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SiteConfig,
        context::PageContext,
        schema::{IdMap, Scope},
        source::{MemoryStore, ProductFields, Sources},
    };

    fn product_post() -> Post {
        Post {
            id: 5,
            title: "Widget".into(),
            url: "http://x.test/widget/".into(),
            ..Default::default()
        }
    }

    fn resolve(
        config: &SiteConfig,
        ctx: &PageContext,
        post: Option<&Post>,
        store: &MemoryStore,
        commerce: bool,
        resolver: fn(&Page<'_, '_>) -> Resolved,
    ) -> Resolved {
        let mut sources = Sources::new(store);
        if commerce {
            sources = sources.with_commerce(store);
        }
        let scope = Scope {
            config,
            ctx,
            sources,
            ids: IdMap::new("http://x.test/"),
        };
        let ids = PageIds::new(&ctx.url);
        let page = Page {
            scope: &scope,
            ids: &ids,
            post,
            publisher: None,
            has_image: false,
        };
        resolver(&page)
    }

    fn build_product(config: &SiteConfig, post: &Post, store: &MemoryStore, commerce: bool) -> Resolved {
        let ctx = PageContext {
            post_id: Some(post.id),
            url: post.url.clone(),
            ..Default::default()
        };
        resolve(config, &ctx, Some(post), store, commerce, product)
    }

    fn postless_ctx() -> PageContext {
        PageContext {
            title: "Gift card".into(),
            url: "http://x.test/gift-card/".into(),
            post_type: Some("product".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_product_defaults_by_locale() {
        let store = MemoryStore::new();
        let mut config = SiteConfig::default();
        config.base.language = "ja".into();

        let node = build_product(&config, &product_post(), &store, false).unwrap();
        assert_eq!(node["name"], "Widget");
        assert_eq!(node["offers"]["price"], "0");
        assert_eq!(node["offers"]["priceCurrency"], "JPY");
        assert_eq!(node["offers"]["availability"], "https://schema.org/InStock");

        config.base.language = "en-US".into();
        let node = build_product(&config, &product_post(), &store, false).unwrap();
        assert_eq!(node["offers"]["priceCurrency"], "USD");
    }

    #[test]
    fn test_product_meta_chain() {
        let store = MemoryStore::new();
        let config = SiteConfig::default();
        let mut post = product_post();
        post.meta.insert("_price".into(), "abc".into());
        post.meta.insert("price".into(), "1,200".into());
        post.meta.insert("currency".into(), "eur".into());
        post.meta.insert("_stock_status".into(), "outofstock".into());
        post.meta.insert("_sku".into(), "W-1".into());

        let node = build_product(&config, &post, &store, false).unwrap();
        assert_eq!(node["offers"]["price"], "1200");
        assert_eq!(node["offers"]["priceCurrency"], "EUR");
        assert_eq!(node["offers"]["availability"], "https://schema.org/OutOfStock");
        assert_eq!(node["sku"], "W-1");
        assert!(node.get("brand").is_none());
    }

    #[test]
    fn test_product_commerce_adapter_first() {
        let mut store = MemoryStore::new();
        store.insert_product(
            5,
            ProductFields {
                price: Some("980".into()),
                brand: Some("Acme".into()),
                ..Default::default()
            },
        );
        let config = SiteConfig::default();
        let mut post = product_post();
        post.meta.insert("_price".into(), "10".into());
        post.meta.insert("_currency".into(), "GBP".into());

        let node = build_product(&config, &post, &store, true).unwrap();
        assert_eq!(node["offers"]["price"], "980");
        // fields the adapter lacks still come from meta
        assert_eq!(node["offers"]["priceCurrency"], "GBP");
        assert_eq!(node["brand"]["name"], "Acme");

        let node = build_product(&config, &post, &store, false).unwrap();
        assert_eq!(node["offers"]["price"], "10");
    }

    #[test]
    fn test_product_without_post() {
        let mut store = MemoryStore::new();
        store.insert_product(0, ProductFields { price: Some("50".into()), ..Default::default() });
        let mut config = SiteConfig::default();
        config.base.language = "ja-JP".into();

        let node = resolve(&config, &postless_ctx(), None, &store, true, product).unwrap();
        assert_eq!(node["name"], "Gift card");
        assert_eq!(node["@id"], "http://x.test/gift-card/#product");
        assert_eq!(
            node["offers"],
            json!({
                "@type": "Offer",
                "price": "0",
                "priceCurrency": "JPY",
                "availability": "https://schema.org/InStock",
                "url": "http://x.test/gift-card/",
            })
        );
    }

    #[test]
    fn test_qa_without_post() {
        let store = MemoryStore::new();
        let config = SiteConfig::default();

        let node = resolve(&config, &postless_ctx(), None, &store, false, qa).unwrap();
        assert_eq!(node["mainEntity"]["name"], "Gift card");
        assert_eq!(node["mainEntity"]["acceptedAnswer"]["text"], "Gift card");

        let ctx = PageContext { title: String::new(), ..postless_ctx() };
        let skip = resolve(&config, &ctx, None, &store, false, qa).unwrap_err();
        assert_eq!(skip.0.as_deref(), Some("QAPage skipped: title is missing"));
    }

    #[test]
    fn test_qa_answer_from_post() {
        let store = MemoryStore::new();
        let config = SiteConfig::default();
        let post = Post {
            id: 3,
            content: "<p>Ship in <b>two</b> days.</p>".into(),
            ..Default::default()
        };

        let node = resolve(&config, &postless_ctx(), Some(&post), &store, false, qa).unwrap();
        assert_eq!(node["mainEntity"]["acceptedAnswer"]["text"], "Ship in two days.");
    }

    #[test]
    fn test_normalizers() {
        assert_eq!(normalize_price(" 19.99 ").as_deref(), Some("19.99"));
        assert_eq!(normalize_price("-1"), None);
        assert_eq!(normalize_currency("jpy").as_deref(), Some("JPY"));
        assert_eq!(normalize_currency("yen"), Some("YEN".into()));
        assert_eq!(normalize_currency("¥"), None);
        assert_eq!(
            normalize_availability("https://schema.org/PreOrder").as_deref(),
            Some("https://schema.org/PreOrder")
        );
        assert_eq!(
            normalize_availability("on_backorder").as_deref(),
            Some("https://schema.org/BackOrder")
        );
        assert_eq!(normalize_availability("maybe"), None);
    }

    #[test]
    fn test_item_list_skips_blank_urls() {
        let ids = PageIds::new("http://x.test/blog/");
        let items = vec![
            ArchiveItem { url: "".into(), title: "blank".into() },
            ArchiveItem { url: "http://x.test/a/".into(), title: "A".into() },
        ];
        let node = item_list(&items, &ids).unwrap();
        assert_eq!(node["numberOfItems"], 1);
        assert_eq!(node["itemListElement"][0]["position"], 1);
        assert!(item_list(&[], &ids).is_err());
    }
}
