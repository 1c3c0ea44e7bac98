//! Three-phase structured-data diagnostics over rendered text.
//!
//! ```text
//! Presence ──► Validity ──► Quality
//!    │ error       │ error
//!    └─────────────┴──────────► stop
//! ```
//!
//! - **Presence**: the text carries parseable JSON-LD and, when asked, a node
//!   of the target type.
//! - **Validity**: required fields on that node.
//! - **Quality**: recommended fields, minimum sizes and consistency groups.
//!   Warnings unless the spec sets `error_on_fail`.
//!
//! The result status is the worst severity seen; details from every phase that
//! ran are kept. An error result carries its first error as the message.

mod cache;
mod extract;
mod spec;

pub use cache::DiagnosticsCache;
pub use extract::{extract_json, find_typed, root_node};
pub use spec::{CheckSpec, LengthCheck};

use crate::{
    config::{EntityKind, SiteConfig},
    context::PageContext,
    emit,
    source::Sources,
    validate::has_field,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

// ============================================================================
// Result types
// ============================================================================

/// Severity, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Presence,
    Validity,
    Quality,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Presence => "presence",
            Self::Validity => "validity",
            Self::Quality => "quality",
        })
    }
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticResult {
    pub status: Status,
    /// One-line summary of the outcome.
    pub message: String,
    /// Last phase that ran.
    pub phase: Phase,
    pub details: Vec<String>,
}

impl DiagnosticResult {
    fn new() -> Self {
        Self {
            status: Status::Info,
            message: String::new(),
            phase: Phase::Presence,
            details: Vec::new(),
        }
    }

    fn report(&mut self, status: Status, detail: impl Into<String>) {
        let detail = detail.into();
        if status == Status::Error && self.status != Status::Error {
            self.message = detail.clone();
        }
        self.status = self.status.max(status);
        self.details.push(detail);
    }

    fn summarize(mut self) -> Self {
        match self.status {
            Status::Info => self.message = "all checks passed".to_owned(),
            Status::Warning => self.message = format!("{} quality issue(s)", self.details.len()),
            Status::Error => {}
        }
        self
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Run the three phases of `spec` over `text`.
pub fn evaluate(text: &str, spec: &CheckSpec) -> DiagnosticResult {
    run(text, spec).summarize()
}

fn run(text: &str, spec: &CheckSpec) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    // Presence
    let document = match extract_json(text) {
        Ok(document) => document,
        Err(reason) => {
            result.report(Status::Error, reason);
            return result;
        }
    };
    let node = match spec.target_type.as_deref().map(str::trim) {
        Some(target) if !target.is_empty() => match find_typed(&document, target) {
            Some(node) => node,
            None => {
                result.report(Status::Error, format!("no {target} node found"));
                return result;
            }
        },
        _ => root_node(&document),
    };

    // Validity
    result.phase = Phase::Validity;
    let missing: Vec<&str> = spec
        .required
        .iter()
        .map(String::as_str)
        .filter(|field| !has_field(node, field))
        .collect();
    if !missing.is_empty() {
        result.report(
            Status::Error,
            format!("missing required fields: {}", missing.join(", ")),
        );
        return result;
    }

    // Quality
    result.phase = Phase::Quality;
    let severity = if spec.error_on_fail { Status::Error } else { Status::Warning };
    for issue in quality_issues(node, spec) {
        result.report(severity, issue);
    }
    result
}

fn quality_issues(node: &Value, spec: &CheckSpec) -> Vec<String> {
    let mut issues: Vec<String> = spec
        .recommended
        .iter()
        .filter(|field| !has_field(node, field))
        .map(|field| format!("recommended field missing: {field}"))
        .collect();

    if let Some(check) = &spec.min_items {
        let count = lookup(node, &check.field)
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        if count < check.min {
            issues.push(format!(
                "{} has {count} items, expected at least {}",
                check.field, check.min
            ));
        }
    }

    if let Some(check) = &spec.min_length {
        let length = lookup(node, &check.field)
            .and_then(Value::as_str)
            .map_or(0, |s| s.trim().chars().count());
        if length < check.min {
            issues.push(format!(
                "{} is {length} characters, expected at least {}",
                check.field, check.min
            ));
        }
    }

    if !spec.consistency.is_empty() {
        let (present, absent): (Vec<&str>, Vec<&str>) = spec
            .consistency
            .iter()
            .map(String::as_str)
            .partition(|field| has_field(node, field));
        if !present.is_empty() && !absent.is_empty() {
            issues.push(format!(
                "inconsistent fields: {} present but {} missing",
                present.join(", "),
                absent.join(", ")
            ));
        }
    }

    issues
}

/// Value at a dot path, first array element where the path crosses an array.
fn lookup<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => items.first()?.get(segment),
        other => other.get(segment),
    })
}

// ============================================================================
// Site self-check
// ============================================================================

/// One entry of [`site_health`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub type_name: String,
    pub result: DiagnosticResult,
}

/// Render the front page and evaluate the site-wide nodes it should carry.
pub fn site_health(config: &SiteConfig, sources: Sources<'_>) -> Vec<HealthCheck> {
    let site_url = config.base.site_url();
    let ctx = PageContext::front_page(site_url, config.base.name.trim());
    let text = emit::compile(config, &ctx, sources).script.unwrap_or_default();

    let mut types = Vec::new();
    if config.entity.kind == EntityKind::Organization {
        types.push("Organization");
    }
    types.push("WebSite");
    if business_configured(config) {
        types.push("LocalBusiness");
    }

    types
        .into_iter()
        .map(|type_name| HealthCheck {
            type_name: type_name.to_owned(),
            result: evaluate(&text, &CheckSpec::for_type(type_name)),
        })
        .collect()
}

fn business_configured(config: &SiteConfig) -> bool {
    let lb = &config.local_business;
    !lb.phone.trim().is_empty() || lb.address.missing_fields().len() < 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryStore;
    use serde_json::json;

    fn spec(target: &str) -> CheckSpec {
        CheckSpec::for_type(target)
    }

    #[test]
    fn test_empty_input() {
        let result = evaluate("", &CheckSpec::default());
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.phase, Phase::Presence);
        assert_eq!(result.details, vec!["no data"]);
        assert_eq!(result.message, "no data");

        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["status"], "error");
        assert_eq!(wire["phase"], "presence");
        assert_eq!(wire["message"], "no data");
    }

    #[test]
    fn test_target_not_found() {
        let result = evaluate(r#"{"@type":"WebSite","name":"a","url":"u"}"#, &spec("Product"));
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.phase, Phase::Presence);
        assert_eq!(result.details, vec!["no Product node found"]);
    }

    #[test]
    fn test_validity_short_circuits() {
        let text = r#"<script type="application/ld+json">{"@type":"Organization","name":"Acme"}</script>"#;
        let result = evaluate(text, &spec("Organization"));
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.phase, Phase::Validity);
        assert_eq!(result.details, vec!["missing required fields: url"]);
        assert_eq!(result.message, "missing required fields: url");
    }

    #[test]
    fn test_quality_warnings() {
        let text = json!({"@graph": [{"@type": "Organization", "name": "Acme", "url": "http://x.test/"}]}).to_string();
        let result = evaluate(&text, &spec("Organization"));
        assert_eq!(result.status, Status::Warning);
        assert_eq!(result.phase, Phase::Quality);
        assert_eq!(result.message, "2 quality issue(s)");
        assert_eq!(
            result.details,
            vec!["recommended field missing: logo", "recommended field missing: sameAs"]
        );
    }

    #[test]
    fn test_quality_promoted_to_error() {
        let mut check = CheckSpec {
            min_items: Some(LengthCheck { field: "itemListElement".into(), min: 3 }),
            min_length: Some(LengthCheck { field: "name".into(), min: 5 }),
            consistency: vec!["geo.latitude".into(), "geo.longitude".into()],
            ..Default::default()
        };
        let text = json!({"@type": "ItemList", "name": "ab", "itemListElement": [1, 2], "geo": {"latitude": 1}}).to_string();

        let result = evaluate(&text, &check);
        assert_eq!(result.status, Status::Warning);
        assert_eq!(result.details.len(), 3);
        assert!(result.details[2].contains("geo.longitude missing"));

        check.error_on_fail = true;
        let result = evaluate(&text, &check);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.phase, Phase::Quality);
        assert_eq!(result.message, result.details[0]);
    }

    #[test]
    fn test_clean_pass() {
        let text = json!({"@type": "BreadcrumbList", "itemListElement": [{"position": 1}]}).to_string();
        let result = evaluate(&text, &spec("BreadcrumbList"));
        assert_eq!(result.status, Status::Info);
        assert_eq!(result.phase, Phase::Quality);
        assert_eq!(serde_json::to_value(&result).unwrap()["status"], "info");
        assert!(result.details.is_empty());
        assert_eq!(result.message, "all checks passed");
    }

    #[test]
    fn test_site_health() {
        let config = SiteConfig::from_options(&json!({
            "company_name": "Acme",
            "site_name": "Acme Site",
            "site_url": "http://x.test",
            "phone": "03-0000-0000",
            "address": {"street": "1-1", "locality": "A", "region": "B", "country": "JP"}
        }));
        let store = MemoryStore::new();
        let checks = site_health(&config, Sources::new(&store));

        let names: Vec<_> = checks.iter().map(|c| c.type_name.as_str()).collect();
        assert_eq!(names, vec!["Organization", "WebSite", "LocalBusiness"]);
        assert!(checks.iter().all(|c| c.result.status != Status::Error), "{checks:?}");
    }

    #[test]
    fn test_lookup_through_arrays() {
        let value = json!({"offers": [{"price": "1"}]});
        assert_eq!(lookup(&value, "offers.price"), Some(&json!("1")));
        assert_eq!(lookup(&value, "offers.sku"), None);
    }
}
