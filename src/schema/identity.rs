//! Site identity nodes: Organization, Logo, WebSite, and the publisher value.

use super::{Resolved, Scope, Skip, id_ref, object};
use crate::config::EntityKind;
use serde_json::{Value, json};

/// Logo dimensions when image metadata has none.
const DEFAULT_LOGO_SIZE: u32 = 512;

/// Organization display name: entity name, then site name.
pub(super) fn org_name<'a>(scope: &Scope<'a>) -> &'a str {
    let entity = scope.config.entity.name.trim();
    if entity.is_empty() { scope.config.base.name.trim() } else { entity }
}

/// `#org`, only when the site represents an organization.
pub(super) fn organization(scope: &Scope<'_>, has_logo: bool) -> Resolved {
    let entity = &scope.config.entity;
    if entity.kind != EntityKind::Organization {
        return Err(Skip::silent());
    }
    let name = org_name(scope);
    if name.is_empty() {
        return Err(Skip::because("Organization skipped: name is missing"));
    }

    let mut node = object(json!({
        "@type": "Organization",
        "@id": scope.ids.org,
        "name": name,
        "alternateName": entity.alternate_name.trim(),
        "url": scope.ids.site_url,
        "description": scope.config.base.description.trim(),
        "sameAs": entity.social_links(),
    }));

    if has_logo {
        node.insert("logo".into(), id_ref(&scope.ids.logo));
        node.insert("image".into(), id_ref(&scope.ids.logo));
    }

    let phone = entity.phone.trim();
    let email = entity.email.trim();
    if !phone.is_empty() || !email.is_empty() {
        node.insert(
            "contactPoint".into(),
            json!({
                "@type": "ContactPoint",
                "contactType": "customer service",
                "telephone": phone,
                "email": email,
            }),
        );
    }

    Ok(node)
}

/// `#logo` from the logo attachment, else the configured logo url.
///
/// Built for either entity kind; only the Organization references it.
pub(super) fn logo(scope: &Scope<'_>) -> Resolved {
    let entity = &scope.config.entity;
    let image = entity
        .logo_id
        .and_then(|id| scope.sources.store.image(id))
        .filter(|image| !image.url.trim().is_empty());
    let (url, width, height) = match image {
        Some(image) => (image.url, image.width, image.height),
        None => (entity.logo.trim().to_owned(), None, None),
    };
    if url.is_empty() {
        return Err(Skip::silent());
    }

    Ok(object(json!({
        "@type": "ImageObject",
        "@id": scope.ids.logo,
        "url": url,
        "contentUrl": url,
        "width": width.unwrap_or(DEFAULT_LOGO_SIZE),
        "height": height.unwrap_or(DEFAULT_LOGO_SIZE),
        "caption": org_name(scope),
        "inLanguage": scope.config.base.language.trim(),
    })))
}

/// Publisher value shared by WebSite, WebPage and articles.
///
/// A reference to `#org` when it exists and the publisher is the organization,
/// otherwise an inline Person or Organization.
pub(super) fn publisher(scope: &Scope<'_>, has_org: bool) -> Option<Value> {
    let entity = &scope.config.entity;
    match entity.publisher_kind() {
        EntityKind::Organization if has_org => Some(id_ref(&scope.ids.org)),
        EntityKind::Organization => {
            let name = org_name(scope);
            (!name.is_empty()).then(|| {
                json!({
                    "@type": "Organization",
                    "name": name,
                    "url": scope.ids.site_url,
                })
            })
        }
        EntityKind::Person => {
            let name = [entity.person_name.trim(), org_name(scope)]
                .into_iter()
                .find(|name| !name.is_empty())?;
            Some(json!({ "@type": "Person", "name": name }))
        }
    }
}

/// `#website`.
pub(super) fn website(scope: &Scope<'_>, publisher: Option<Value>) -> Resolved {
    let base = &scope.config.base;
    let site_url = &scope.ids.site_url;
    let name = if base.name.trim().is_empty() { org_name(scope) } else { base.name.trim() };

    let mut node = object(json!({
        "@type": "WebSite",
        "@id": scope.ids.website,
        "url": site_url,
        "name": name,
        "description": base.description.trim(),
        "inLanguage": base.language.trim(),
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{site_url}?s={{search_term_string}}"),
            },
            "query-input": "required name=search_term_string",
        },
    }));
    if let Some(publisher) = publisher {
        node.insert("publisher".into(), publisher);
    }
    Ok(node)
}
