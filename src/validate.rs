//! Graph validation and empty-value stripping.
//!
//! [`validate`] checks every typed object against [`RULES`] and returns the
//! cleaned document next to its findings. The cleaned document is what gets
//! emitted, valid or not.

use crate::schema::{references, type_names};
use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_json::{Map, Value};

/// Required and recommended fields of one schema.org type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub type_name: &'static str,
    /// Subtypes checked with the same lists.
    pub aliases: &'static [&'static str],
    pub required: &'static [&'static str],
    pub recommended: &'static [&'static str],
}

impl Rule {
    fn matches(&self, type_name: &str) -> bool {
        self.type_name == type_name || self.aliases.contains(&type_name)
    }
}

/// Field rules, dot paths for nested values.
pub const RULES: &[Rule] = &[
    Rule {
        type_name: "Article",
        aliases: &["NewsArticle", "BlogPosting"],
        required: &["headline", "author", "datePublished"],
        recommended: &["image", "dateModified", "publisher"],
    },
    Rule {
        type_name: "LocalBusiness",
        aliases: &["Restaurant", "Store", "ProfessionalService", "MedicalBusiness", "LodgingBusiness"],
        required: &[
            "name",
            "address.streetAddress",
            "address.addressLocality",
            "address.addressRegion",
            "address.addressCountry",
            "telephone",
        ],
        recommended: &["geo", "openingHoursSpecification", "url", "image"],
    },
    Rule {
        type_name: "Product",
        aliases: &[],
        required: &["name", "offers"],
        recommended: &[
            "offers.price",
            "offers.priceCurrency",
            "offers.availability",
            "image",
            "description",
        ],
    },
    Rule {
        type_name: "FAQPage",
        aliases: &[],
        required: &["mainEntity"],
        recommended: &[],
    },
    Rule {
        type_name: "QAPage",
        aliases: &[],
        required: &["mainEntity"],
        recommended: &["mainEntity.acceptedAnswer"],
    },
    Rule {
        type_name: "WebSite",
        aliases: &[],
        required: &["name", "url"],
        recommended: &["potentialAction"],
    },
    Rule {
        type_name: "WebPage",
        aliases: &["HomePage", "CollectionPage", "SearchResultsPage", "ProfilePage"],
        required: &["url"],
        recommended: &["name"],
    },
    Rule {
        type_name: "BreadcrumbList",
        aliases: &[],
        required: &["itemListElement"],
        recommended: &[],
    },
    Rule {
        type_name: "ItemList",
        aliases: &[],
        required: &["itemListElement"],
        recommended: &[],
    },
    Rule {
        type_name: "Organization",
        aliases: &[],
        required: &["name", "url"],
        recommended: &["logo", "sameAs"],
    },
];

/// Rule covering `type_name`, directly or as an alias.
pub fn rule_for(type_name: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.matches(type_name))
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Input with empty values stripped.
    pub schema: Value,
}

/// Validate a graph document (or any JSON-LD value).
pub fn validate(document: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    visit(document, &mut errors, &mut warnings);

    let schema = strip_empty(document);
    warnings.extend(dangling_references(&schema));

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        schema,
    }
}

fn visit(value: &Value, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            check_node(value, errors, warnings);
            map.values().for_each(|child| visit(child, errors, warnings));
        }
        Value::Array(items) => items.iter().for_each(|child| visit(child, errors, warnings)),
        _ => {}
    }
}

/// Apply each matching rule once, reported under the node's own type name.
fn check_node(node: &Value, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let mut applied = FxHashSet::default();
    for type_name in type_names(node) {
        let Some(rule) = rule_for(type_name) else { continue };
        if !applied.insert(rule.type_name) {
            continue;
        }
        for field in rule.required.iter().filter(|f| !has_field(node, f)) {
            errors.push(format!("{type_name}: {field} is missing"));
        }
        for field in rule.recommended.iter().filter(|f| !has_field(node, f)) {
            warnings.push(format!("{type_name}: {field} is recommended"));
        }
    }
}

/// Whether a dot path resolves to a non-empty value.
///
/// Arrays along the path match when any element does.
pub fn has_field(value: &Value, path: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    path_present(value, &segments)
}

fn path_present(value: &Value, segments: &[&str]) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return !is_empty(value);
    };
    match value {
        Value::Object(map) => map.get(*head).is_some_and(|child| path_present(child, rest)),
        Value::Array(items) => items.iter().any(|item| path_present(item, segments)),
        _ => false,
    }
}

/// Empty: null, blank string, empty array or object. `0` and `"0"` are values.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Remove empty leaves and containers bottom-up.
///
/// Array order and key order are preserved. Returns `Null` when nothing is
/// left. Stripping a stripped value is a no-op.
pub fn strip_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .iter()
                .map(|(key, child)| (key.clone(), strip_empty(child)))
                .filter(|(_, child)| !is_empty(child))
                .collect();
            if cleaned.is_empty() { Value::Null } else { Value::Object(cleaned) }
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items
                .iter()
                .map(strip_empty)
                .filter(|child| !is_empty(child))
                .collect();
            if cleaned.is_empty() { Value::Null } else { Value::Array(cleaned) }
        }
        Value::String(s) if s.trim().is_empty() => Value::Null,
        other => other.clone(),
    }
}

/// `@id` references that no object in the document declares.
fn dangling_references(document: &Value) -> Vec<String> {
    let mut declared = FxHashSet::default();
    collect_ids(document, &mut declared);
    let mut reported = FxHashSet::default();

    references(document)
        .into_iter()
        .filter(|id| !declared.contains(id) && reported.insert(*id))
        .map(|id| format!("Graph: reference {id} does not resolve"))
        .collect()
}

fn collect_ids<'v>(value: &'v Value, ids: &mut FxHashSet<&'v str>) {
    match value {
        Value::Object(map) => {
            // a bare {"@id": ..} is a reference, not a declaration
            if map.len() > 1
                && let Some(Value::String(id)) = map.get("@id")
            {
                ids.insert(id);
            }
            map.values().for_each(|child| collect_ids(child, ids));
        }
        Value::Array(items) => items.iter().for_each(|child| collect_ids(child, ids)),
        _ => {}
    }
}
