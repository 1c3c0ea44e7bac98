//! `[base]` section configuration.
//!
//! Contains site identity: name, url, description and language.

use super::defaults;
use chrono::{FixedOffset, Offset, Utc};
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in schemagraph.toml - site identity.
///
/// # Example
/// ```toml
/// [base]
/// name = "Acme"
/// url = "https://acme.example/"
/// language = "ja"
/// utc_offset = "+09:00"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site name used by WebSite and as the organization name fallback.
    #[serde(default, alias = "site_name")]
    pub name: String,

    /// Canonical site url. Every core `@id` is derived from it.
    #[serde(default, alias = "site_url")]
    pub url: String,

    /// Site home url, used when `url` is empty.
    #[serde(default)]
    pub home_url: String,

    /// Site tagline for WebSite and Organization descriptions.
    #[serde(default)]
    pub description: String,

    /// BCP 47 language code (e.g., "ja", "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Offset applied to naive post dates (e.g., "+09:00").
    #[serde(default = "defaults::base::utc_offset")]
    #[educe(Default = defaults::base::utc_offset())]
    pub utc_offset: String,
}

impl BaseConfig {
    /// Normalized site url: trimmed, trailing slash, falls back to `home_url`.
    ///
    /// Returns an empty string when neither is configured.
    pub fn site_url(&self) -> String {
        let url = match self.url.trim() {
            "" => self.home_url.trim(),
            url => url,
        };
        if url.is_empty() || url.ends_with('/') {
            url.to_owned()
        } else {
            format!("{url}/")
        }
    }

    /// Parsed `utc_offset`, UTC when malformed.
    pub fn offset(&self) -> FixedOffset {
        parse_offset(&self.utc_offset).unwrap_or_else(|| Utc.fix())
    }

    /// Whether the site language is Japanese (drives locale defaults).
    pub fn is_japanese(&self) -> bool {
        let lang = self.language.trim().to_ascii_lowercase();
        lang == "ja" || lang.starts_with("ja-") || lang.starts_with("ja_")
    }
}

/// Parse "+HH:MM" / "-HH:MM" / "Z" into a fixed offset.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.is_empty() {
        return Some(Utc.fix());
    }
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => (1, s),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            name = "Acme"
            url = "https://acme.example"
            description = "Tools"
            language = "ja"
            utc_offset = "+09:00"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.name, "Acme");
        assert_eq!(config.base.site_url(), "https://acme.example/");
        assert_eq!(config.base.offset().local_minus_utc(), 9 * 3600);
        assert!(config.base.is_japanese());
    }

    #[test]
    fn test_base_config_defaults() {
        let config: SiteConfig = toml::from_str("[base]\nname = \"x\"").unwrap();

        assert_eq!(config.base.language, "en-US");
        assert_eq!(config.base.utc_offset, "+00:00");
        assert_eq!(config.base.site_url(), "");
        assert!(!config.base.is_japanese());
    }

    #[test]
    fn test_site_url_falls_back_to_home() {
        let base = BaseConfig {
            url: "   ".into(),
            home_url: " http://x.test ".into(),
            ..Default::default()
        };
        assert_eq!(base.site_url(), "http://x.test/");
    }

    #[test]
    fn test_site_url_keeps_trailing_slash() {
        let base = BaseConfig {
            url: "http://x.test/blog/".into(),
            ..Default::default()
        };
        assert_eq!(base.site_url(), "http://x.test/blog/");
    }

    #[test]
    fn test_alias_site_url() {
        let config: SiteConfig = toml::from_str("[base]\nsite_url = \"http://x.test\"").unwrap();
        assert_eq!(config.base.site_url(), "http://x.test/");
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("+25:00").is_none());
        assert!(parse_offset("abc").is_none());
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<SiteConfig, _> = toml::from_str("[base]\nunknown_field = 1");
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }
}
