//! BreadcrumbList node from a resolved trail.

use super::{PageIds, Resolved, Skip, object};
use crate::breadcrumb::BreadcrumbItem;
use serde_json::{Value, json};

/// `#breadcrumb`; positions start at 1, the last item carries no url.
pub(super) fn breadcrumb_list(trail: &[BreadcrumbItem], ids: &PageIds) -> Resolved {
    if trail.len() < 2 {
        return Err(Skip::silent());
    }

    let last = trail.len() - 1;
    let elements: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut element = json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": item.label,
            });
            if i != last && !item.url.is_empty() {
                element["item"] = Value::String(item.url.clone());
            }
            element
        })
        .collect();

    Ok(object(json!({
        "@type": "BreadcrumbList",
        "@id": ids.breadcrumb,
        "itemListElement": elements,
    })))
}
