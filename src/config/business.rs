//! `[local_business]` section configuration.
//!
//! Storefront details: address, phone, coordinates and opening hours.
//! Address keys accept the legacy short names (`street`, `locality`, ...).

use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[local_business]` section in schemagraph.toml.
///
/// # Example
/// ```toml
/// [local_business]
/// kind = "Restaurant"
/// phone = "03-0000-0000"
///
/// [local_business.address]
/// street = "1-1"
/// locality = "Chiyoda"
/// region = "Tokyo"
/// country = "JP"
/// postal = "100-0001"
///
/// [local_business.geo]
/// latitude = 35.68
/// longitude = "139.76"
///
/// [[local_business.opening_hours]]
/// days = ["Monday", "Tuesday"]
/// opens = "09:00"
/// closes = "18:00"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct LocalBusinessConfig {
    /// schema.org LocalBusiness subtype (e.g., "Restaurant").
    #[serde(default, alias = "type", alias = "business_type")]
    pub kind: String,

    /// Business name; falls back to the entity name, then the site name.
    #[serde(default, alias = "business_name")]
    pub name: String,

    #[serde(default, alias = "telephone")]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    /// Storefront page url; the site url when empty.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub price_range: String,

    /// Storefront image url.
    #[serde(default, alias = "image_url")]
    pub image: String,

    /// Storefront image attachment id.
    #[serde(default)]
    pub image_id: Option<u64>,

    #[serde(default)]
    pub address: AddressConfig,

    #[serde(default)]
    pub geo: GeoConfig,

    #[serde(default)]
    pub opening_hours: Vec<OpeningHours>,
}

/// Postal address fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressConfig {
    #[serde(default, alias = "street")]
    pub street_address: String,

    #[serde(default, alias = "locality", alias = "city")]
    pub address_locality: String,

    #[serde(default, alias = "region", alias = "state")]
    pub address_region: String,

    #[serde(default, alias = "country")]
    pub address_country: String,

    #[serde(default, alias = "postal", alias = "zip")]
    pub postal_code: String,
}

impl AddressConfig {
    /// Names of required address fields that are blank, in schema.org terms.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("streetAddress", &self.street_address),
            ("addressLocality", &self.address_locality),
            ("addressRegion", &self.address_region),
            ("addressCountry", &self.address_country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A coordinate given either as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// Numeric value, `None` for non-numeric or non-finite input.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoConfig {
    #[serde(default, alias = "lat")]
    pub latitude: Option<Coordinate>,

    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<Coordinate>,
}

impl GeoConfig {
    /// Validated `(lat, lng)`; `None` when missing, non-numeric or out of range.
    pub fn position(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_ref()?.value()?;
        let lng = self.longitude.as_ref()?.value()?;
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)).then_some((lat, lng))
    }
}

/// One opening-hours entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningHours {
    #[serde(default, alias = "day_of_week")]
    pub days: Vec<String>,
    #[serde(default)]
    pub opens: String,
    #[serde(default)]
    pub closes: String,
}
