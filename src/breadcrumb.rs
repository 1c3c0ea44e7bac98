//! Breadcrumb trail resolution.
//!
//! Walks the post or term hierarchy and produces an ordered `label/url` trail
//! shared by the BreadcrumbList node and any HTML breadcrumb the host renders.
//!
//! # Rules (first match wins)
//!
//! | Page                         | Trail                                   |
//! |------------------------------|-----------------------------------------|
//! | front page                   | empty                                   |
//! | has a post id                | Home, post ancestors (root first), page |
//! | hierarchical taxonomy term   | Home, term ancestors (root first), page |
//! | anything else                | Home, page                              |
//!
//! Entries with an empty label are dropped, and a trail shorter than two
//! entries is replaced by an empty one.

use crate::{
    config::SiteConfig,
    context::{PageContext, PageKind},
    source::ContentStore,
};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Ancestor walks give up past this depth.
const MAX_DEPTH: usize = 32;

/// One entry of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub label: String,
    pub url: String,
}

impl BreadcrumbItem {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Resolve the breadcrumb trail for the current page.
pub fn resolve_trail(
    ctx: &PageContext,
    config: &SiteConfig,
    store: &dyn ContentStore,
) -> Vec<BreadcrumbItem> {
    if ctx.kind == PageKind::FrontPage {
        return Vec::new();
    }

    let home = BreadcrumbItem::new(config.breadcrumb.home_label.trim(), config.base.site_url());
    let mut trail = vec![home];

    if let Some(post_id) = ctx.post_id {
        let post = store.post(post_id);
        trail.extend(post_ancestors(post.as_ref().and_then(|p| p.parent), post_id, store));
        let label = non_empty(&ctx.title).or(post.as_ref().map(|p| p.title.as_str()));
        let url = non_empty(&ctx.url).or(post.as_ref().map(|p| p.url.as_str()));
        trail.push(BreadcrumbItem::new(label.unwrap_or_default(), url.unwrap_or_default()));
    } else if let Some(term) = ctx.term_id.and_then(|id| store.term(id)).filter(|t| t.hierarchical)
    {
        trail.extend(term_ancestors(term.parent, term.id, store));
        let label = non_empty(&ctx.title).unwrap_or(&term.name);
        let url = non_empty(&ctx.url).unwrap_or(&term.url);
        trail.push(BreadcrumbItem::new(label, url));
    } else {
        trail.push(BreadcrumbItem::new(ctx.title.trim(), ctx.url.trim()));
    }

    trail.retain(|item| !item.label.trim().is_empty());
    if trail.len() < 2 {
        return Vec::new();
    }
    trail
}

/// Post ancestors ordered root first.
fn post_ancestors(
    mut parent: Option<u64>,
    self_id: u64,
    store: &dyn ContentStore,
) -> Vec<BreadcrumbItem> {
    let mut seen = FxHashSet::default();
    seen.insert(self_id);
    let mut chain = Vec::new();

    while let Some(id) = parent {
        if chain.len() >= MAX_DEPTH || !seen.insert(id) {
            break;
        }
        let Some(post) = store.post(id) else { break };
        chain.push(BreadcrumbItem::new(post.title.trim(), post.url.trim()));
        parent = post.parent;
    }

    chain.reverse();
    chain
}

/// Term ancestors ordered root first.
fn term_ancestors(
    mut parent: Option<u64>,
    self_id: u64,
    store: &dyn ContentStore,
) -> Vec<BreadcrumbItem> {
    let mut seen = FxHashSet::default();
    seen.insert(self_id);
    let mut chain = Vec::new();

    while let Some(id) = parent {
        if chain.len() >= MAX_DEPTH || !seen.insert(id) {
            break;
        }
        let Some(term) = store.term(id) else { break };
        chain.push(BreadcrumbItem::new(term.name.trim(), term.url.trim()));
        parent = term.parent;
    }

    chain.reverse();
    chain
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemoryStore, Post, Term};

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.url = "http://x.test".into();
        config
    }

    fn post(id: u64, parent: Option<u64>) -> Post {
        Post {
            id,
            title: format!("Post {id}"),
            url: format!("http://x.test/{id}/"),
            parent,
            ..Default::default()
        }
    }

    fn singular(id: u64) -> PageContext {
        PageContext {
            kind: PageKind::Page,
            post_id: Some(id),
            title: format!("Post {id}"),
            url: format!("http://x.test/{id}/"),
            ..Default::default()
        }
    }

    #[test]
    fn test_front_page_is_empty() {
        let store = MemoryStore::new();
        let mut ctx = PageContext::front_page("http://x.test/", "Home");
        ctx.post_id = Some(1);
        assert!(resolve_trail(&ctx, &config(), &store).is_empty());
    }

    #[test]
    fn test_post_with_ancestors() {
        let mut store = MemoryStore::new();
        store.insert_post(post(1, None));
        store.insert_post(post(2, Some(1)));
        store.insert_post(post(3, Some(2)));

        let trail = resolve_trail(&singular(3), &config(), &store);
        let labels: Vec<_> = trail.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Home", "Post 1", "Post 2", "Post 3"]);
        assert_eq!(trail[0].url, "http://x.test/");
        assert_eq!(trail[3].url, "http://x.test/3/");
    }

    #[test]
    fn test_trail_length_is_ancestors_plus_two() {
        let mut store = MemoryStore::new();
        store.insert_post(post(1, None));
        for id in 2..=6 {
            store.insert_post(post(id, Some(id - 1)));
        }
        for (id, ancestors) in [(1u64, 0usize), (3, 2), (6, 5)] {
            assert_eq!(resolve_trail(&singular(id), &config(), &store).len(), ancestors + 2);
        }
    }

    #[test]
    fn test_cycle_terminates() {
        let mut store = MemoryStore::new();
        store.insert_post(post(1, Some(2)));
        store.insert_post(post(2, Some(1)));
        let trail = resolve_trail(&singular(1), &config(), &store);
        assert_eq!(trail.len(), 3);
    }

    #[test]
    fn test_hierarchical_term() {
        let mut store = MemoryStore::new();
        for (id, parent) in [(10, None), (11, Some(10))] {
            store.insert_term(Term {
                id,
                name: format!("Cat {id}"),
                url: format!("http://x.test/cat/{id}/"),
                taxonomy: "category".into(),
                parent,
                hierarchical: true,
            });
        }
        let ctx = PageContext {
            kind: PageKind::Category,
            term_id: Some(11),
            title: "Cat 11".into(),
            url: "http://x.test/cat/11/".into(),
            ..Default::default()
        };
        let labels: Vec<_> = resolve_trail(&ctx, &config(), &store)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, vec!["Home", "Cat 10", "Cat 11"]);
    }

    #[test]
    fn test_flat_term_and_search() {
        let mut store = MemoryStore::new();
        store.insert_term(Term {
            id: 5,
            name: "rust".into(),
            parent: Some(4),
            ..Default::default()
        });
        let tag = PageContext {
            kind: PageKind::Tag,
            term_id: Some(5),
            title: "rust".into(),
            url: "http://x.test/tag/rust/".into(),
            ..Default::default()
        };
        assert_eq!(resolve_trail(&tag, &config(), &store).len(), 2);

        let search = PageContext {
            kind: PageKind::Search,
            title: "Search results".into(),
            url: "http://x.test/?s=q".into(),
            ..Default::default()
        };
        assert_eq!(
            resolve_trail(&search, &config(), &store),
            vec![
                BreadcrumbItem::new("Home", "http://x.test/"),
                BreadcrumbItem::new("Search results", "http://x.test/?s=q"),
            ]
        );
    }

    #[test]
    fn test_empty_labels_dropped_below_floor() {
        let store = MemoryStore::new();
        let ctx = PageContext {
            kind: PageKind::General,
            url: "http://x.test/x/".into(),
            ..Default::default()
        };
        assert!(resolve_trail(&ctx, &config(), &store).is_empty());
    }

    #[test]
    fn test_home_label_override() {
        let store = MemoryStore::new();
        let mut config = config();
        config.breadcrumb.home_label = "トップ".into();
        let ctx = PageContext {
            kind: PageKind::Archive,
            title: "2024".into(),
            ..Default::default()
        };
        assert_eq!(resolve_trail(&ctx, &config, &store)[0].label, "トップ");
    }

    #[test]
    fn test_unknown_post_uses_context() {
        let store = MemoryStore::new();
        let trail = resolve_trail(&singular(9), &config(), &store);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].label, "Post 9");
    }
}
