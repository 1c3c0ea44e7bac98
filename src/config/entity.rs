//! `[entity]` section configuration.
//!
//! Describes who the site represents: an organization or a person.

use educe::Educe;
use serde::{Deserialize, Serialize};

/// Kind of entity the site speaks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Company, shop, association (default).
    #[default]
    #[serde(alias = "Organization", alias = "company")]
    Organization,
    /// Individual author.
    #[serde(alias = "Person")]
    Person,
}

/// `[entity]` section in schemagraph.toml.
///
/// # Example
/// ```toml
/// [entity]
/// kind = "organization"
/// name = "Acme Inc."
/// logo = "https://acme.example/logo.png"
/// same_as = ["https://x.com/acme"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct EntityConfig {
    /// Organization or person.
    #[serde(default, alias = "entity_type")]
    pub kind: EntityKind,

    /// Organization name; the site name is used when empty.
    #[serde(default, alias = "company_name", alias = "organization_name")]
    pub name: String,

    #[serde(default)]
    pub alternate_name: String,

    /// Name used for a person publisher.
    #[serde(default)]
    pub person_name: String,

    /// Which entity publishes content; follows `kind` when unset.
    #[serde(default, alias = "publisher_entity")]
    pub publisher: Option<EntityKind>,

    /// Logo url. Ignored when `logo_id` resolves.
    #[serde(default, alias = "logo_url")]
    pub logo: String,

    /// Logo attachment id, resolved through the host image resolver.
    #[serde(default)]
    pub logo_id: Option<u64>,

    /// Social profile urls (`sameAs`).
    #[serde(default, alias = "social_links")]
    pub same_as: Vec<String>,

    /// Customer service phone for `contactPoint`.
    #[serde(default)]
    pub phone: String,

    /// Customer service email for `contactPoint`.
    #[serde(default)]
    pub email: String,
}

impl EntityConfig {
    /// Effective publisher kind.
    pub fn publisher_kind(&self) -> EntityKind {
        self.publisher.unwrap_or(self.kind)
    }

    /// Social links that are absolute http(s) urls, trimmed and deduplicated.
    pub fn social_links(&self) -> Vec<String> {
        let mut links: Vec<String> = Vec::new();
        for link in &self.same_as {
            let link = link.trim();
            let absolute = link.starts_with("https://") || link.starts_with("http://");
            if absolute && !links.iter().any(|l| l == link) {
                links.push(link.to_owned());
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_entity_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.entity.kind, EntityKind::Organization);
        assert_eq!(config.entity.publisher_kind(), EntityKind::Organization);
        assert!(config.entity.logo_id.is_none());
    }

    #[test]
    fn test_entity_aliases() {
        let config = r#"
            [entity]
            entity_type = "person"
            company_name = "Acme"
            publisher_entity = "organization"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert_eq!(config.entity.kind, EntityKind::Person);
        assert_eq!(config.entity.name, "Acme");
        assert_eq!(config.entity.publisher_kind(), EntityKind::Organization);
    }

    #[test]
    fn test_social_links_filtered() {
        let entity = EntityConfig {
            same_as: vec![
                " https://x.com/acme ".into(),
                "@acme".into(),
                "https://x.com/acme".into(),
                "http://facebook.com/acme".into(),
            ],
            ..Default::default()
        };
        assert_eq!(
            entity.social_links(),
            vec!["https://x.com/acme", "http://facebook.com/acme"]
        );
    }
}
