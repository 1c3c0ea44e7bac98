//! Final output: build, validate, fall back, serialize.
//!
//! # Pipeline
//!
//! ```text
//! schema::build_report ─► validate ─► cleaned @graph non-empty? ─► script tag
//!                                         │ no
//!                                         └─► WebSite-only fallback ─► script tag
//!                                                 │ empty
//!                                                 └─► nothing
//! ```
//!
//! Invalid graphs are still emitted once cleaned; validation findings are
//! logged, never fatal.

use crate::{
    arbitrate::owns_output,
    config::SiteConfig,
    context::PageContext,
    log,
    schema::{self, SCHEMA_CONTEXT, ids},
    source::Sources,
    validate::{ValidationResult, strip_empty, validate},
};
use serde_json::{Value, json};

/// Ownership attribute carried by every emitted script element.
pub const MARKER: &str = r#"data-schemagraph="owned""#;

/// Everything one compile produced.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Script element to place in the page head, if anything is emitted.
    pub script: Option<String>,
    pub validation: ValidationResult,
    pub advisories: Vec<String>,
    /// Whether the WebSite-only fallback replaced an empty graph.
    pub fallback: bool,
}

/// Build and serialize the page graph, regardless of output ownership.
pub fn compile(config: &SiteConfig, ctx: &PageContext, sources: Sources<'_>) -> Compiled {
    let report = schema::build_report(config, ctx, sources);
    for advisory in &report.advisories {
        log!("graph"; "{}", advisory);
    }

    let validation = validate(&report.graph.to_document());
    for error in &validation.errors {
        log!("validate"; "{}", error);
    }

    let (payload, fallback) = if has_graph(&validation.schema) {
        (Some(validation.schema.clone()), false)
    } else {
        (fallback_document(config), true)
    };

    Compiled {
        script: payload.as_ref().map(script_tag),
        validation,
        advisories: report.advisories,
        fallback,
    }
}

/// Script element for the page, `None` when another emitter owns it or when
/// there is nothing to emit.
pub fn render(config: &SiteConfig, ctx: &PageContext, sources: Sources<'_>) -> Option<String> {
    if !owns_output(config, ctx) {
        return None;
    }
    compile(config, ctx, sources).script
}

/// `<script type="application/ld+json" data-schemagraph="owned">…</script>`
///
/// `</` is written as `<\/` so string content cannot close the element.
pub fn script_tag(document: &Value) -> String {
    let json = document.to_string().replace("</", "<\\/");
    format!(r#"<script type="application/ld+json" {MARKER}>{json}</script>"#)
}

fn has_graph(document: &Value) -> bool {
    document
        .get("@graph")
        .and_then(Value::as_array)
        .is_some_and(|graph| !graph.is_empty())
}

/// Minimal WebSite document, `None` when even that would be empty.
fn fallback_document(config: &SiteConfig) -> Option<Value> {
    let base = &config.base;
    let site_url = base.site_url();
    let name = [base.name.trim(), config.entity.name.trim()]
        .into_iter()
        .find(|name| !name.is_empty())
        .unwrap_or_default();
    if site_url.is_empty() && name.is_empty() {
        return None;
    }

    let id = (!site_url.is_empty()).then(|| format!("{site_url}{}", ids::WEBSITE));
    let document = json!({
        "@context": SCHEMA_CONTEXT,
        "@graph": [{
            "@type": "WebSite",
            "@id": id,
            "name": name,
            "url": site_url,
        }],
    });
    Some(strip_empty(&document))
}
