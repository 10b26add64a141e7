//! Response shapes for the geolocation enrichment service.
//!
//! The service answers JSON in the MaxMind GeoIP2 shape. Every field is
//! independently optional: a missing or malformed nested field degrades to
//! "absent" and is persisted as NULL, never a hard failure.

use serde::Deserialize;

/// Localized name map. Only the English name is consumed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Names {
    /// English name, when present.
    pub en: Option<String>,
}

/// A named entity (country, subdivision, or city).
///
/// The three shapes are structurally identical, so one struct is reused by
/// composition everywhere a name-bearing entity appears.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NamedEntity {
    /// Localized names for the entity.
    pub names: Names,
}

/// Geographic coordinates and timezone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// IANA timezone name.
    pub time_zone: Option<String>,
}

/// Network traits; only the ISP name is consumed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Traits {
    /// ISP name.
    pub isp: Option<String>,
}

/// Geolocation result for one client IP.
///
/// `GeoInfo::default()` is the "enrichment unavailable" value: a record built
/// from it carries only the IP/timestamp fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoInfo {
    /// Country of the IP.
    pub country: Option<NamedEntity>,
    /// Subdivisions of the country; the first is used as the region.
    pub subdivisions: Option<Vec<NamedEntity>>,
    /// City of the IP.
    pub city: Option<NamedEntity>,
    /// Coordinates and timezone.
    pub location: Option<Location>,
    /// Network traits.
    pub traits: Option<Traits>,
}

impl GeoInfo {
    /// English country name, if present.
    pub fn country_name(&self) -> Option<&str> {
        self.country.as_ref()?.names.en.as_deref()
    }

    /// English name of the first subdivision, used as the region.
    pub fn region(&self) -> Option<&str> {
        self.subdivisions.as_ref()?.first()?.names.en.as_deref()
    }

    /// English city name, if present.
    pub fn city_name(&self) -> Option<&str> {
        self.city.as_ref()?.names.en.as_deref()
    }

    /// Latitude, if present.
    pub fn latitude(&self) -> Option<f64> {
        self.location.as_ref()?.latitude
    }

    /// Longitude, if present.
    pub fn longitude(&self) -> Option<f64> {
        self.location.as_ref()?.longitude
    }

    /// IANA timezone name, if present.
    pub fn timezone(&self) -> Option<&str> {
        self.location.as_ref()?.time_zone.as_deref()
    }

    /// ISP name, if present.
    pub fn isp(&self) -> Option<&str> {
        self.traits.as_ref()?.isp.as_deref()
    }
}
