//! Site configuration management for `schemagraph.toml`.
//!
//! # Sections
//!
//! | Section              | Purpose                                        |
//! |----------------------|------------------------------------------------|
//! | `[base]`             | Site identity (name, url, language)            |
//! | `[entity]`           | Organization / person, logo, social links      |
//! | `[local_business]`   | Storefront address, phone, geo, opening hours  |
//! | `[schema]`           | Default content model, FAQ extraction          |
//! | `[breadcrumb]`       | BreadcrumbList toggle and home label           |
//! | `[content.<type>]`   | Per post type overrides                        |
//! | `[taxonomy.<name>]`  | Per taxonomy overrides                         |
//! | `[arbitration]`      | Output ownership and competitor stripping      |
//!
//! # Example
//!
//! ```toml
//! [base]
//! name = "Acme"
//! url = "https://acme.example"
//! language = "ja"
//!
//! [entity]
//! name = "Acme Inc."
//! logo = "https://acme.example/logo.png"
//!
//! [content.post]
//! schema_type = "BlogPosting"
//! ```
//!
//! # Legacy options
//!
//! Hosts that still store a flat options bag (`company_name`, `site_url`,
//! `breadcrumb_enabled`, `address.street`, ...) go through
//! [`SiteConfig::from_options`], the single place where old keys are migrated.

mod arbitration;
mod base;
mod business;
mod content;
pub mod defaults;
mod entity;
mod error;

pub use arbitration::{ArbitrationConfig, Priority};
pub use base::BaseConfig;
pub use business::{AddressConfig, Coordinate, GeoConfig, LocalBusinessConfig, OpeningHours};
pub use content::{BreadcrumbConfig, ContentOverride, SchemaConfig, SchemaType};
pub use entity::{EntityConfig, EntityKind};
pub use error::ConfigError;

use crate::{context::PageContext, log};
use anyhow::{Result, bail};
use educe::Educe;
use regex::Regex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing schemagraph.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub base: BaseConfig,

    #[serde(default)]
    pub entity: EntityConfig,

    #[serde(default)]
    pub local_business: LocalBusinessConfig,

    #[serde(default)]
    pub schema: SchemaConfig,

    #[serde(default)]
    pub breadcrumb: BreadcrumbConfig,

    /// Overrides keyed by post type.
    #[serde(default)]
    pub content: BTreeMap<String, ContentOverride>,

    /// Overrides keyed by taxonomy.
    #[serde(default)]
    pub taxonomy: BTreeMap<String, ContentOverride>,

    #[serde(default)]
    pub arbitration: ArbitrationConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let mut config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        config.normalize();
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Build a configuration from loosely-typed structured input.
    ///
    /// Never fails: a non-mapping value yields the default configuration and a
    /// section that does not deserialize falls back to its own default.
    pub fn coerce(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            log!("config"; "configuration is not a mapping, using defaults");
            return Self::default();
        };

        let mut config = Self {
            base: section(map, "base"),
            entity: section(map, "entity"),
            local_business: section(map, "local_business"),
            schema: section(map, "schema"),
            breadcrumb: section(map, "breadcrumb"),
            content: section(map, "content"),
            taxonomy: section(map, "taxonomy"),
            arbitration: section(map, "arbitration"),
            ..Default::default()
        };
        config.normalize();
        config
    }

    /// Migrate a flat legacy options bag into a typed configuration.
    ///
    /// Old and new key spellings are both accepted; when both are present the
    /// new spelling wins.
    pub fn from_options(options: &Value) -> Self {
        let Some(map) = options.as_object() else {
            log!("config"; "options are not a mapping, using defaults");
            return Self::default();
        };
        let nested = migrate_options(map);
        Self::coerce(&nested)
    }

    /// Canonicalize values once after loading.
    pub fn normalize(&mut self) {
        self.base.url = self.base.url.trim().to_owned();
        self.base.home_url = self.base.home_url.trim().to_owned();
        self.base.language = self.base.language.trim().to_owned();

        if self.breadcrumb.home_label.trim().is_empty() {
            self.breadcrumb.home_label = defaults::breadcrumb::home_label();
        }

        for class in [
            &mut self.schema.faq_question_class,
            &mut self.schema.faq_answer_class,
        ] {
            *class = class.trim().trim_start_matches('.').to_owned();
        }
    }

    /// Validate configuration before rendering
    pub fn validate(&self) -> Result<()> {
        let url = self.base.site_url();
        if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.schema.faq_question_class.is_empty() || self.schema.faq_answer_class.is_empty() {
            bail!(ConfigError::Validation(
                "[schema.faq_question_class] and [schema.faq_answer_class] must not be empty"
                    .into()
            ));
        }

        for pattern in &self.arbitration.strip_patterns {
            if let Err(err) = Regex::new(pattern) {
                bail!(ConfigError::Validation(format!(
                    "[arbitration.strip_patterns] invalid pattern `{pattern}`: {err}"
                )));
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Per-context lookups
    // ------------------------------------------------------------------------

    /// Override that applies to the page, by post type or taxonomy.
    pub fn override_for(&self, ctx: &PageContext) -> Option<&ContentOverride> {
        if ctx.kind.is_term_archive() {
            return ctx.taxonomy_name().and_then(|t| self.taxonomy.get(t));
        }
        ctx.post_type
            .as_deref()
            .and_then(|post_type| self.content.get(post_type))
    }

    /// Whether BreadcrumbList is enabled for the page.
    pub fn breadcrumb_enabled(&self, ctx: &PageContext) -> bool {
        self.override_for(ctx)
            .and_then(|o| o.breadcrumb)
            .unwrap_or(self.breadcrumb.enable)
    }

    /// Whether FAQ extraction is enabled for the page.
    pub fn faq_enabled(&self, ctx: &PageContext) -> bool {
        self.override_for(ctx)
            .and_then(|o| o.faq)
            .unwrap_or(self.schema.faq)
    }

    /// Output owner for the page.
    pub fn priority_for(&self, ctx: &PageContext) -> Priority {
        self.override_for(ctx)
            .and_then(|o| o.priority)
            .unwrap_or(self.arbitration.priority)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Deserialize one section, dropping the fields that do not fit.
///
/// Fields are kept one at a time, so a single bad value only resets itself.
fn section<T: DeserializeOwned + Default>(map: &Map<String, Value>, key: &str) -> T {
    let value = match map.get(key) {
        None | Some(Value::Null) => return T::default(),
        Some(value) => value,
    };
    if let Ok(section) = serde_json::from_value(value.clone()) {
        return section;
    }
    let Some(fields) = value.as_object() else {
        log!("config"; "[{key}] ignored: not a table");
        return T::default();
    };

    let mut accepted = Map::new();
    for (field, value) in fields {
        accepted.insert(field.clone(), value.clone());
        if let Err(err) = serde_json::from_value::<T>(Value::Object(accepted.clone())) {
            log!("config"; "[{key}.{field}] ignored: {err}");
            accepted.remove(field);
        }
    }
    serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
}

/// First non-empty value among `keys`.
fn pick<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !is_blank(value))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Scalar as text; numbers are stringified.
fn text(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(s) => Some(Value::String(s.trim().to_owned())),
        Value::Number(n) => Some(Value::String(n.to_string())),
        _ => None,
    }
}

/// Boolean-ish legacy flags ("1", "yes", "on", true, 1).
fn flag(value: Option<&Value>) -> Option<Value> {
    let on = match value? {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => return None,
    };
    Some(Value::Bool(on))
}

fn id(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Number(n) => n.as_u64().map(Value::from),
        Value::String(s) => s.trim().parse::<u64>().ok().map(Value::from),
        _ => None,
    }
}

/// Social links given as an array or as newline separated text.
fn links(value: Option<&Value>) -> Option<Value> {
    let links: Vec<Value> = match value? {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| Value::String(s.trim().to_owned()))
            .collect(),
        Value::String(s) => s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Value::String(l.to_owned()))
            .collect(),
        _ => return None,
    };
    Some(Value::Array(links))
}

/// Insert `value` under `key` unless it is absent.
fn put(target: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        target.insert(key.to_owned(), value);
    }
}

/// Map a flat legacy options bag onto the sectioned layout.
fn migrate_options(map: &Map<String, Value>) -> Value {
    let nested_address = map.get("address").and_then(Value::as_object);
    let address_field = |nested: &[&str], flat: &[&str]| {
        nested_address
            .and_then(|address| text(pick(address, nested)))
            .or_else(|| text(pick(map, flat)))
    };

    let mut base = Map::new();
    put(&mut base, "name", text(pick(map, &["site_name", "blogname"])));
    put(&mut base, "url", text(pick(map, &["site_url", "url"])));
    put(&mut base, "home_url", text(pick(map, &["home_url", "home"])));
    put(&mut base, "description", text(pick(map, &["site_description", "description"])));
    put(&mut base, "language", text(pick(map, &["language", "locale"])));
    put(&mut base, "utc_offset", text(pick(map, &["utc_offset", "gmt_offset"])));

    let mut entity = Map::new();
    put(&mut entity, "kind", text(pick(map, &["entity_type"])).map(lowercase));
    put(&mut entity, "name", text(pick(map, &["organization_name", "company_name"])));
    put(&mut entity, "alternate_name", text(pick(map, &["alternate_name"])));
    put(&mut entity, "person_name", text(pick(map, &["person_name"])));
    put(&mut entity, "publisher", text(pick(map, &["publisher_entity"])).map(lowercase));
    put(&mut entity, "logo", text(pick(map, &["logo_url", "logo"])));
    put(&mut entity, "logo_id", id(pick(map, &["logo_id"])));
    put(&mut entity, "same_as", links(pick(map, &["same_as", "social_links"])));

    let mut address = Map::new();
    put(&mut address, "street_address", address_field(&["street_address", "street"], &["address_street", "street_address"]));
    put(&mut address, "address_locality", address_field(&["address_locality", "locality", "city"], &["address_locality", "address_city"]));
    put(&mut address, "address_region", address_field(&["address_region", "region", "state"], &["address_region", "address_state"]));
    put(&mut address, "address_country", address_field(&["address_country", "country"], &["address_country"]));
    put(&mut address, "postal_code", address_field(&["postal_code", "postal", "zip"], &["address_postal", "postal_code"]));

    let nested_geo = map.get("geo").and_then(Value::as_object);
    let coordinate = |nested: &[&str], flat: &[&str]| {
        nested_geo
            .and_then(|geo| pick(geo, nested))
            .or_else(|| pick(map, flat))
            .filter(|v| v.is_number() || v.is_string())
            .cloned()
    };
    let mut geo = Map::new();
    put(&mut geo, "latitude", coordinate(&["latitude", "lat"], &["latitude", "geo_lat"]));
    put(&mut geo, "longitude", coordinate(&["longitude", "lng", "lon"], &["longitude", "geo_lng"]));

    let mut business = Map::new();
    put(&mut business, "kind", text(pick(map, &["business_type"])));
    put(&mut business, "name", text(pick(map, &["business_name"])));
    put(&mut business, "phone", text(pick(map, &["telephone", "phone"])));
    put(&mut business, "email", text(pick(map, &["business_email", "email"])));
    put(&mut business, "price_range", text(pick(map, &["price_range"])));
    put(&mut business, "image", text(pick(map, &["store_image", "business_image"])));
    put(&mut business, "image_id", id(pick(map, &["store_image_id"])));
    business.insert("address".into(), Value::Object(address));
    business.insert("geo".into(), Value::Object(geo));
    if let Some(hours) = map.get("opening_hours").filter(|v| v.is_array()) {
        business.insert("opening_hours".into(), hours.clone());
    }

    let mut breadcrumb = Map::new();
    // the newer key wins over the legacy one
    put(
        &mut breadcrumb,
        "enable",
        flag(map.get("enable_breadcrumbs")).or_else(|| flag(map.get("breadcrumb_enabled"))),
    );
    put(&mut breadcrumb, "home_label", text(pick(map, &["breadcrumb_home_label"])));

    let mut schema = Map::new();
    put(&mut schema, "default_type", schema_type(pick(map, &["default_schema_type"])));
    put(&mut schema, "faq", flag(map.get("faq_enabled")));
    put(&mut schema, "faq_question_class", text(pick(map, &["faq_question_class"])));
    put(&mut schema, "faq_answer_class", text(pick(map, &["faq_answer_class"])));

    let mut arbitration = Map::new();
    put(&mut arbitration, "priority", text(pick(map, &["schema_priority", "priority"])).map(lowercase));
    put(&mut arbitration, "debug", flag(map.get("debug")));

    let mut out = json!({
        "base": base,
        "entity": entity,
        "local_business": business,
        "breadcrumb": breadcrumb,
        "schema": schema,
        "arbitration": arbitration,
    });
    if let Some(target) = out.as_object_mut() {
        for key in ["content", "taxonomy"] {
            if let Some(overrides) = map.get(key).filter(|v| v.is_object()) {
                target.insert(key.to_owned(), overrides.clone());
            }
        }
    }
    out
}

/// Schema type name in any letter case, canonicalized.
fn schema_type(value: Option<&Value>) -> Option<Value> {
    let raw = value?.as_str()?;
    match raw.parse::<SchemaType>() {
        Ok(kind) => Some(Value::String(kind.as_str().to_owned())),
        Err(err) => {
            log!("config"; "default_schema_type ignored: {err}");
            None
        }
    }
}

fn lowercase(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_ascii_lowercase()),
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PageKind;

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            name = "Acme"
            url = " http://x.test "
        "#,
        )
        .unwrap();
        assert_eq!(config.base.url, "http://x.test");
        assert_eq!(config.base.site_url(), "http://x.test/");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(SiteConfig::from_str("[base\nname = 1").is_err());
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        assert!(SiteConfig::from_str("[unknown_section]\nfield = 1").is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemagraph.toml");
        fs::write(&path, "[base]\nname = \"Acme\"\n").unwrap();

        let config = SiteConfig::from_path(&path).unwrap();
        assert_eq!(config.base.name, "Acme");
        assert_eq!(config.config_path, path);

        assert!(SiteConfig::from_path(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_coerce_non_mapping() {
        let config = SiteConfig::coerce(&json!("garbage"));
        assert_eq!(config.base.name, "");
        assert!(config.breadcrumb.enable);

        let config = SiteConfig::coerce(&json!([1, 2, 3]));
        assert_eq!(config.schema.default_type, SchemaType::WebPage);
    }

    #[test]
    fn test_coerce_bad_section_falls_back() {
        let config = SiteConfig::coerce(&json!({
            "base": { "name": "Acme" },
            "entity": { "name": ["not", "a", "string"] },
            "breadcrumb": "yes",
        }));
        assert_eq!(config.base.name, "Acme");
        assert_eq!(config.entity.name, "");
        assert!(config.breadcrumb.enable);
    }

    #[test]
    fn test_coerce_keeps_valid_fields_of_bad_section() {
        let config = SiteConfig::coerce(&json!({
            "schema": {
                "default_type": "NotAType",
                "faq": false,
                "faq_question_class": "q",
            },
        }));
        assert_eq!(config.schema.default_type, SchemaType::WebPage);
        assert!(!config.schema.faq);
        assert_eq!(config.schema.faq_question_class, "q");
    }

    #[test]
    fn test_from_options_schema_type_any_case() {
        let config = SiteConfig::from_options(&json!({
            "default_schema_type": "faqpage",
            "faq_enabled": "0",
            "faq_question_class": "my-q",
        }));
        assert_eq!(config.schema.default_type, SchemaType::FaqPage);
        assert!(!config.schema.faq);
        assert_eq!(config.schema.faq_question_class, "my-q");

        let config = SiteConfig::from_options(&json!({
            "default_schema_type": "bogus",
            "faq_question_class": "my-q",
        }));
        assert_eq!(config.schema.default_type, SchemaType::WebPage);
        assert_eq!(config.schema.faq_question_class, "my-q");
    }

    #[test]
    fn test_from_options_scenario() {
        let config = SiteConfig::from_options(&json!({
            "company_name": "Acme",
            "site_url": "http://x.test",
            "phone": "03-0000-0000",
            "address": {
                "street": "1-1",
                "locality": "A",
                "region": "B",
                "country": "JP",
                "postal": "100-0001"
            }
        }));
        assert_eq!(config.entity.name, "Acme");
        assert_eq!(config.base.site_url(), "http://x.test/");
        assert_eq!(config.local_business.phone, "03-0000-0000");
        assert_eq!(config.local_business.address.street_address, "1-1");
        assert_eq!(config.local_business.address.postal_code, "100-0001");
    }

    #[test]
    fn test_from_options_breadcrumb_flags() {
        let config = SiteConfig::from_options(&json!({ "breadcrumb_enabled": "0" }));
        assert!(!config.breadcrumb.enable);

        // new key wins over legacy key
        let config = SiteConfig::from_options(&json!({
            "breadcrumb_enabled": false,
            "enable_breadcrumbs": true,
        }));
        assert!(config.breadcrumb.enable);
    }

    #[test]
    fn test_from_options_flat_address_and_links() {
        let config = SiteConfig::from_options(&json!({
            "address_street": "1-1",
            "address_city": "A",
            "address_state": "B",
            "address_country": "US",
            "telephone": 5550100,
            "social_links": "https://x.com/acme\n\nhttps://github.com/acme\n",
            "entity_type": "Person",
            "geo_lat": "35.1",
            "geo_lng": 139.2,
        }));
        let address = &config.local_business.address;
        assert_eq!(address.address_locality, "A");
        assert_eq!(address.address_region, "B");
        assert_eq!(config.local_business.phone, "5550100");
        assert_eq!(config.entity.same_as.len(), 2);
        assert_eq!(config.entity.kind, EntityKind::Person);
        assert_eq!(config.local_business.geo.position(), Some((35.1, 139.2)));
    }

    #[test]
    fn test_from_options_non_mapping() {
        let config = SiteConfig::from_options(&Value::Null);
        assert_eq!(config.base.site_url(), "");
    }

    #[test]
    fn test_normalize_classes_and_label() {
        let mut config = SiteConfig::default();
        config.schema.faq_question_class = " .q ".into();
        config.breadcrumb.home_label = "  ".into();
        config.normalize();
        assert_eq!(config.schema.faq_question_class, "q");
        assert_eq!(config.breadcrumb.home_label, "Home");
    }

    #[test]
    fn test_validate() {
        let mut config = SiteConfig::default();
        assert!(config.validate().is_ok());

        config.base.url = "ftp://x.test".into();
        assert!(config.validate().is_err());

        config.base.url = "https://x.test".into();
        config.arbitration.strip_patterns = vec!["(unclosed".into()];
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("strip_patterns"));
    }

    #[test]
    fn test_per_context_lookups() {
        let config = SiteConfig::from_str(
            r#"
            [breadcrumb]
            enable = true

            [content.product]
            breadcrumb = false
            priority = "external"

            [taxonomy.category]
            faq = false
        "#,
        )
        .unwrap();

        let product = PageContext {
            kind: PageKind::Singular,
            post_type: Some("product".into()),
            ..Default::default()
        };
        assert!(!config.breadcrumb_enabled(&product));
        assert_eq!(config.priority_for(&product), Priority::External);
        assert!(config.faq_enabled(&product));

        let category = PageContext {
            kind: PageKind::Category,
            post_type: Some("product".into()),
            ..Default::default()
        };
        assert!(config.breadcrumb_enabled(&category));
        assert!(!config.faq_enabled(&category));
        assert_eq!(config.priority_for(&category), Priority::Own);
    }
}
