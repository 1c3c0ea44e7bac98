//! LocalBusiness and its storefront image.
//!
//! The node is all-or-nothing: a name, a telephone and the four address fields
//! must be present, otherwise it is skipped with an advisory.

use super::{Resolved, Scope, Skip, id_ref, identity::org_name, object};
use crate::config::{LocalBusinessConfig, OpeningHours};
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

/// `HH:MM` or `HH:MM:SS`, 24-hour clock.
static RE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d)?$").unwrap());

const DAYS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

const MAP_SEARCH: &str = "https://www.google.com/maps/search/?api=1&query=";

/// `#lb-main`.
pub(super) fn local_business(scope: &Scope<'_>, has_org: bool, has_image: bool) -> Resolved {
    let lb = &scope.config.local_business;
    if !is_configured(lb) {
        return Err(Skip::silent());
    }

    let name = business_name(scope);
    let mut missing = Vec::new();
    if name.is_empty() {
        missing.push("name");
    }
    if lb.phone.trim().is_empty() {
        missing.push("telephone");
    }
    missing.extend(lb.address.missing_fields());
    if !missing.is_empty() {
        return Err(Skip::because(format!(
            "LocalBusiness skipped: missing fields {}",
            missing.join(", ")
        )));
    }

    let address = &lb.address;
    let url = if lb.url.trim().is_empty() { scope.ids.site_url.as_str() } else { lb.url.trim() };
    let mut node = object(json!({
        "@type": business_type(&lb.kind),
        "@id": scope.ids.lb_main,
        "name": name,
        "url": url,
        "telephone": lb.phone.trim(),
        "email": lb.email.trim(),
        "priceRange": lb.price_range.trim(),
        "address": {
            "@type": "PostalAddress",
            "streetAddress": address.street_address.trim(),
            "addressLocality": address.address_locality.trim(),
            "addressRegion": address.address_region.trim(),
            "postalCode": address.postal_code.trim(),
            "addressCountry": address.address_country.trim(),
        },
    }));

    if has_image {
        node.insert("image".into(), id_ref(&scope.ids.lb_image));
    }

    if let Some((lat, lng)) = lb.geo.position() {
        node.insert(
            "geo".into(),
            json!({ "@type": "GeoCoordinates", "latitude": lat, "longitude": lng }),
        );
        let query = format!("{lat},{lng}");
        node.insert(
            "hasMap".into(),
            Value::String(format!("{MAP_SEARCH}{}", urlencoding::encode(&query))),
        );
    }

    let hours: Vec<Value> = lb.opening_hours.iter().filter_map(opening_hours).collect();
    if !hours.is_empty() {
        node.insert("openingHoursSpecification".into(), Value::Array(hours));
    }

    if has_org {
        node.insert("parentOrganization".into(), id_ref(&scope.ids.org));
        node.insert("branchOf".into(), id_ref(&scope.ids.org));
    }

    Ok(node)
}

/// `#lb-image`, emitted only alongside the business.
pub(super) fn business_image(scope: &Scope<'_>) -> Resolved {
    let lb = &scope.config.local_business;
    let image = lb
        .image_id
        .and_then(|id| scope.sources.store.image(id))
        .filter(|image| !image.url.trim().is_empty());
    let (url, width, height) = match image {
        Some(image) => (image.url, image.width, image.height),
        None => (lb.image.trim().to_owned(), None, None),
    };
    if url.is_empty() {
        return Err(Skip::silent());
    }

    Ok(object(json!({
        "@type": "ImageObject",
        "@id": scope.ids.lb_image,
        "url": url,
        "contentUrl": url,
        "width": width,
        "height": height,
    })))
}

/// Whether any business field was filled in at all.
fn is_configured(lb: &LocalBusinessConfig) -> bool {
    let address = &lb.address;
    [
        &lb.name,
        &lb.phone,
        &address.street_address,
        &address.address_locality,
        &address.address_region,
        &address.address_country,
        &address.postal_code,
    ]
    .iter()
    .any(|field| !field.trim().is_empty())
}

/// Business name, then organization name, then site name.
fn business_name<'a>(scope: &Scope<'a>) -> &'a str {
    let name = scope.config.local_business.name.trim();
    if name.is_empty() { org_name(scope) } else { name }
}

/// `"LocalBusiness"` or `["LocalBusiness", <subtype>]`.
fn business_type(kind: &str) -> Value {
    match kind.trim() {
        "" | "LocalBusiness" => json!("LocalBusiness"),
        subtype => json!(["LocalBusiness", subtype]),
    }
}

/// One validated OpeningHoursSpecification, `None` when malformed.
fn opening_hours(entry: &OpeningHours) -> Option<Value> {
    let opens = entry.opens.trim();
    let closes = entry.closes.trim();
    if !RE_TIME.is_match(opens) || !RE_TIME.is_match(closes) {
        return None;
    }

    let days = entry
        .days
        .iter()
        .map(|day| canonical_day(day))
        .collect::<Option<Vec<_>>>()?;
    if days.is_empty() {
        return None;
    }

    Some(json!({
        "@type": "OpeningHoursSpecification",
        "dayOfWeek": days,
        "opens": opens,
        "closes": closes,
    }))
}

/// `"mon"`, `"monday"`, `"https://schema.org/Monday"` → `"Monday"`.
fn canonical_day(day: &str) -> Option<&'static str> {
    let day = day.trim();
    let day = day.rsplit('/').next().unwrap_or(day).to_ascii_lowercase();
    if day.len() < 3 {
        return None;
    }
    DAYS.iter()
        .copied()
        .find(|name| name.to_ascii_lowercase().starts_with(&day))
}
