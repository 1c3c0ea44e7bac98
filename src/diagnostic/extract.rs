//! Presence helpers: pull JSON-LD out of rendered text and find nodes in it.

use crate::{schema::type_names, utils::html::ld_json_blocks};
use serde_json::{Value, json};

/// Parse the JSON-LD carried by `text`.
///
/// Accepts a page with one or more `ld+json` script blocks (several blocks are
/// wrapped into a synthetic `{"@graph": [...]}`) or bare JSON.
pub fn extract_json(text: &str) -> Result<Value, String> {
    if text.trim().is_empty() {
        return Err("no data".into());
    }

    let blocks = ld_json_blocks(text);
    if blocks.is_empty() {
        return serde_json::from_str(text.trim()).map_err(|err| format!("invalid JSON: {err}"));
    }

    let mut values = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let value: Value = serde_json::from_str(block.body.trim())
            .map_err(|err| format!("invalid JSON in block {}: {err}", i + 1))?;
        values.push(value);
    }

    match values.len() {
        1 => Ok(values.remove(0)),
        _ => Ok(json!({ "@graph": values })),
    }
}

/// First object (depth first, document order) whose `@type` includes `target`.
pub fn find_typed<'v>(value: &'v Value, target: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => {
            if type_names(value).contains(&target) {
                return Some(value);
            }
            map.values().find_map(|child| find_typed(child, target))
        }
        Value::Array(items) => items.iter().find_map(|child| find_typed(child, target)),
        _ => None,
    }
}

/// Node checked when no target type is given: the first `@graph` member, or
/// the document itself.
pub fn root_node(value: &Value) -> &Value {
    value
        .get("@graph")
        .and_then(Value::as_array)
        .and_then(|graph| graph.first())
        .unwrap_or(value)
}
