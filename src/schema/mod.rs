//! schema.org graph construction.
//!
//! [`build`] turns a configuration and a page context into one ordered
//! [`Graph`]. Each node comes from a resolver that either returns a complete
//! node or a [`Skip`]; nothing is ever emitted half-built.
//!
//! # Architecture
//!
//! ```text
//! build(config, ctx, sources)
//!     │
//!     ├── IdMap::new(site_url)            deterministic ids
//!     ├── identity::logo / organization   #logo, #org
//!     ├── business::local_business        #lb-main, #lb-image
//!     ├── identity::website               #website (+ publisher)
//!     └── page::page_nodes                #primaryimage, #webpage, content,
//!                                         #breadcrumb, #itemlist
//! ```
//!
//! # Node order
//!
//! Organization, Logo, LocalBusiness, LocalBusiness image, WebSite, then the
//! page subgraph. The order is fixed so two builds of the same input are
//! structurally identical.

mod business;
mod content;
mod crumbs;
mod identity;
pub mod ids;
mod page;

pub use ids::{IdMap, PageIds};
pub use page::resolve_content_type;

use crate::{config::SiteConfig, context::PageContext, source::Sources};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// JSON-LD `@context` of every emitted document.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// A single schema.org node.
pub type Node = Map<String, Value>;

// ============================================================================
// Graph
// ============================================================================

/// Ordered `@graph` contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node whose own `@id` equals `id`.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.get("@id").and_then(Value::as_str) == Some(id))
    }

    /// Wrap into `{"@context": ..., "@graph": [...]}`.
    pub fn to_document(&self) -> Value {
        json!({
            "@context": SCHEMA_CONTEXT,
            "@graph": self.nodes,
        })
    }
}

/// Result of a build with its advisories.
#[derive(Debug, Clone, Default)]
pub struct Build {
    pub graph: Graph,
    /// Human-readable reasons for skipped nodes.
    pub advisories: Vec<String>,
}

// ============================================================================
// Resolver plumbing
// ============================================================================

/// A node whose preconditions were not met.
///
/// Carries an optional advisory explaining what was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip(pub Option<String>);

impl Skip {
    /// Nothing to report (feature simply not configured).
    pub const fn silent() -> Self {
        Self(None)
    }

    pub fn because(reason: impl Into<String>) -> Self {
        Self(Some(reason.into()))
    }
}

/// Outcome of a single resolver.
pub type Resolved = Result<Node, Skip>;

/// Shared, read-only inputs of one build.
pub struct Scope<'a> {
    pub config: &'a SiteConfig,
    pub ctx: &'a PageContext,
    pub sources: Sources<'a>,
    pub ids: IdMap,
}

/// Accumulates nodes and advisories in build order.
#[derive(Default)]
struct Collector {
    graph: Graph,
    advisories: Vec<String>,
}

impl Collector {
    /// Push the node or record why it was skipped; returns whether it exists.
    fn take(&mut self, resolved: Resolved) -> bool {
        match resolved {
            Ok(node) => {
                self.graph.push(node);
                true
            }
            Err(Skip(reason)) => {
                self.advisories.extend(reason);
                false
            }
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Build the page graph.
pub fn build(config: &SiteConfig, ctx: &PageContext, sources: Sources<'_>) -> Graph {
    build_report(config, ctx, sources).graph
}

/// Build the page graph and keep the advisories of skipped nodes.
pub fn build_report(config: &SiteConfig, ctx: &PageContext, sources: Sources<'_>) -> Build {
    let site_url = config.base.site_url();
    let mut out = Collector::default();

    if site_url.is_empty() {
        out.advisories
            .push("graph skipped: neither [base.url] nor [base.home_url] is set".into());
        return Build {
            graph: out.graph,
            advisories: out.advisories,
        };
    }

    let scope = Scope {
        config,
        ctx,
        sources,
        ids: IdMap::new(&site_url),
    };

    let logo = identity::logo(&scope);
    let has_logo = logo.is_ok();
    let has_org = out.take(identity::organization(&scope, has_logo));
    out.take(logo);

    let lb_image = business::business_image(&scope);
    let has_business = out.take(business::local_business(&scope, has_org, lb_image.is_ok()));
    if has_business {
        out.take(lb_image);
    }

    let publisher = identity::publisher(&scope, has_org);
    out.take(identity::website(&scope, publisher.clone()));

    for resolved in page::page_nodes(&scope, publisher) {
        out.take(resolved);
    }

    Build {
        graph: out.graph,
        advisories: out.advisories,
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// `{"@id": id}` reference.
pub(crate) fn id_ref(id: &str) -> Value {
    json!({ "@id": id })
}

/// Unwrap a `json!` object literal into a node.
pub(crate) fn object(value: Value) -> Node {
    match value {
        Value::Object(map) => map,
        _ => Node::new(),
    }
}

/// `@type` names of a JSON object, scalar or array form.
pub fn type_names(value: &Value) -> Vec<&str> {
    match value.get("@type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Every `{"@id": X}` reference (an object whose only key is `@id`) under `value`.
pub fn references(value: &Value) -> Vec<&str> {
    let mut refs = Vec::new();
    collect_refs(value, &mut refs);
    refs
}

fn collect_refs<'v>(value: &'v Value, refs: &mut Vec<&'v str>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1
                && let Some(Value::String(id)) = map.get("@id")
            {
                refs.push(id);
                return;
            }
            for child in map.values() {
                collect_refs(child, refs);
            }
        }
        Value::Array(items) => items.iter().for_each(|child| collect_refs(child, refs)),
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
