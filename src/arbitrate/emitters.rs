//! Extension points of known third-party structured-data emitters.
//!
//! When this crate owns the output, the host applies each override so the
//! other emitter produces nothing.

use serde::Serialize;
use serde_json::{Value, json};

/// One `(extension_point_id, override_value)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Override {
    pub extension_point: &'static str,
    pub value: Value,
}

/// Known emitters in registration order.
pub fn known_emitters() -> Vec<Override> {
    let entry = |extension_point, value| Override {
        extension_point,
        value,
    };
    vec![
        entry("wpseo_json_ld_output", json!(false)),
        entry("wpseo_schema_graph", json!([])),
        entry("rank_math/json_ld", json!([])),
        entry("aioseo_schema_disable", json!(true)),
        entry("seopress_schemas_jsonld_output", json!(false)),
        entry("the_seo_framework_ldjson_scripts", json!("")),
        entry("woocommerce_structured_data_product", json!([])),
        entry("woocommerce_structured_data_breadcrumblist", json!([])),
        entry("jetpack_json_ld", json!(null)),
    ]
}
