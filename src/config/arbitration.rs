//! `[arbitration]` section configuration.
//!
//! Decides who owns structured-data output and how competing output is stripped.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// Owner of structured data on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// This compiler emits, competitors are suppressed (default).
    #[default]
    #[serde(rename = "self", alias = "own")]
    Own,
    /// Another emitter owns the page; this compiler stays silent.
    External,
}

/// `[arbitration]` section in schemagraph.toml.
///
/// # Example
/// ```toml
/// [arbitration]
/// priority = "self"
/// head_scope = true
/// document_scope = true
/// debug = true
/// strip_patterns = ['<!-- legacy-seo -->.*?<!-- /legacy-seo -->']
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ArbitrationConfig {
    #[serde(default = "defaults::arbitration::priority")]
    #[educe(Default = defaults::arbitration::priority())]
    pub priority: Priority,

    /// Buffer and strip the head segment.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub head_scope: bool,

    /// Buffer and strip the whole document (only honored in debug mode).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub document_scope: bool,

    /// Debug-diagnostic mode.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub debug: bool,

    /// Extra regex patterns removed from buffered output.
    #[serde(default)]
    pub strip_patterns: Vec<String>,
}

impl ArbitrationConfig {
    /// Whether the whole-document scope is active.
    pub fn document_scope_active(&self) -> bool {
        self.debug && self.document_scope
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_arbitration_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.arbitration.priority, Priority::Own);
        assert!(config.arbitration.head_scope);
        assert!(!config.arbitration.document_scope_active());
    }

    #[test]
    fn test_document_scope_requires_debug() {
        let config: SiteConfig = toml::from_str(
            r#"
            [arbitration]
            priority = "external"
            document_scope = true
        "#,
        )
        .unwrap();
        assert_eq!(config.arbitration.priority, Priority::External);
        assert!(!config.arbitration.document_scope_active());

        let config: SiteConfig = toml::from_str(
            r#"
            [arbitration]
            document_scope = true
            debug = true
        "#,
        )
        .unwrap();
        assert!(config.arbitration.document_scope_active());
    }
}
