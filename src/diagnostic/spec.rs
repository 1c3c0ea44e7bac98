//! Check specs: what the evaluator looks for in a rendered document.
//!
//! # Example
//!
//! ```toml
//! target_type = "LocalBusiness"
//! required = ["name", "address.streetAddress"]
//! recommended = ["geo"]
//! consistency = ["geo.latitude", "geo.longitude"]
//! error_on_fail = false
//!
//! [min_items]
//! field = "openingHoursSpecification"
//! min = 1
//! ```

use crate::{config::ConfigError, validate::rule_for};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Minimum size of a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LengthCheck {
    pub field: String,
    pub min: usize,
}

/// Checks applied by [`evaluate`](super::evaluate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckSpec {
    /// Node to look for; the document root (or first `@graph` member) when unset.
    #[serde(alias = "type")]
    pub target_type: Option<String>,

    pub required: Vec<String>,

    pub recommended: Vec<String>,

    /// Minimum number of items in an array field.
    pub min_items: Option<LengthCheck>,

    /// Minimum character count of a string field.
    pub min_length: Option<LengthCheck>,

    /// Fields that must be present together or not at all.
    pub consistency: Vec<String>,

    /// Report quality issues as errors.
    #[serde(alias = "errorOnFail")]
    pub error_on_fail: bool,
}

impl CheckSpec {
    /// Spec for `type_name` derived from the validator rules.
    ///
    /// Types without a rule only get the presence check.
    pub fn for_type(type_name: &str) -> Self {
        let to_owned =
            |fields: &[&str]| -> Vec<String> { fields.iter().map(|f| (*f).to_string()).collect() };
        let (required, recommended) = rule_for(type_name)
            .map(|rule| (to_owned(rule.required), to_owned(rule.recommended)))
            .unwrap_or_default();

        Self {
            target_type: Some(type_name.to_owned()),
            required,
            recommended,
            ..Default::default()
        }
    }

    /// Parse a check spec from TOML text
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::from)?)
    }

    /// Load a check spec from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }
}
