//! Persisted record model.

use crate::enrich::GeoInfo;
use crate::extract::ExtractedEvent;

/// One row of the `logs` table.
///
/// Created once per distinct extracted event that passes the dedup check;
/// never updated or deleted. Enrichment columns are NULL when the lookup
/// failed or the provider had no data for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// First IP token of the source line.
    pub server_ip: String,
    /// Normalized UTC timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Second IP token of the source line.
    pub client_ip: String,
    /// English country name.
    pub country_name: Option<String>,
    /// English name of the first subdivision.
    pub region: Option<String>,
    /// English city name.
    pub city: Option<String>,
    /// IANA timezone name.
    pub timezone: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// ISP name.
    pub org: Option<String>,
}

impl LogRecord {
    /// Combines an extracted event with its enrichment result.
    pub fn from_event(event: &ExtractedEvent, geo: &GeoInfo) -> Self {
        Self {
            server_ip: event.server_ip.clone(),
            timestamp: event.timestamp_sql(),
            client_ip: event.client_ip.clone(),
            country_name: geo.country_name().map(str::to_string),
            region: geo.region().map(str::to_string),
            city: geo.city_name().map(str::to_string),
            timezone: geo.timezone().map(str::to_string),
            latitude: geo.latitude(),
            longitude: geo.longitude(),
            org: geo.isp().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_event;

    #[test]
    fn test_record_from_event_with_empty_enrichment() {
        let event = extract_event("1.2.3.4 5.6.7.8 [10/Oct/2023:13:55:36 +0000]")
            .expect("line should extract");
        let record = LogRecord::from_event(&event, &GeoInfo::default());

        assert_eq!(record.server_ip, "1.2.3.4");
        assert_eq!(record.client_ip, "5.6.7.8");
        assert_eq!(record.timestamp, "2023-10-10 13:55:36");
        assert_eq!(record.country_name, None);
        assert_eq!(record.latitude, None);
        assert_eq!(record.org, None);
    }

    #[test]
    fn test_record_from_event_carries_enrichment_fields() {
        let event = extract_event("1.2.3.4 5.6.7.8 [10/Oct/2023:13:55:36 +0000]")
            .expect("line should extract");
        let geo: GeoInfo = serde_json::from_str(
            r#"{"country": {"names": {"en": "Brazil"}}, "location": {"latitude": -23.5}}"#,
        )
        .expect("geo should deserialize");
        let record = LogRecord::from_event(&event, &geo);

        assert_eq!(record.country_name.as_deref(), Some("Brazil"));
        assert_eq!(record.latitude, Some(-23.5));
        assert_eq!(record.region, None);
        assert_eq!(record.city, None);
    }
}
