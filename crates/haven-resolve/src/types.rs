//! Wire-facing response types.
//!
//! Serialized in camelCase: these shapes are the public API contract and the
//! unit of cache storage.

use serde::{Deserialize, Serialize};

use haven_core::geo::GeoCoordinate;
use haven_core::postal::Country;
use haven_geocode::GeocoderUsed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Local,
    National,
}

/// A directory resource within matching radius of the requested location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalResource {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub website: String,
    pub phone: String,
    pub distance_km: f64,
    pub distance_mi: f64,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

/// An always-available hotline-style resource from the compiled-in catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalResource {
    pub name: String,
    pub description: String,
    pub website: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

/// The assembled resolution payload: what callers receive and what the cache
/// stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResponse {
    pub locals: Vec<LocalResource>,
    pub nationals: Vec<NationalResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoCoordinate>,
    pub country: Country,
    pub geocoder: GeocoderUsed,
    pub latency_ms: u64,
    pub cached: bool,
    pub local_count: usize,
    pub national_count: usize,
    /// Advisory message in degraded mode; never set on a full resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_response_serializes_in_camel_case() {
        let response = ResolvedResponse {
            locals: vec![],
            nationals: vec![],
            location: None,
            country: Country::Us,
            geocoder: GeocoderUsed::None,
            latency_ms: 12,
            cached: false,
            local_count: 0,
            national_count: 0,
            error: Some("Could not locate postal code".to_owned()),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["latencyMs"].as_u64(), Some(12));
        assert_eq!(json["localCount"].as_u64(), Some(0));
        assert_eq!(json["geocoder"].as_str(), Some("none"));
        assert_eq!(json["country"].as_str(), Some("US"));
        assert!(json.get("location").is_none(), "absent location is omitted");
    }

    #[test]
    fn local_resource_reports_type_local() {
        let resource = LocalResource {
            name: "Midtown Counseling Collective".to_owned(),
            description: Some("Community counseling center".to_owned()),
            website: "https://midtowncounseling.example.org".to_owned(),
            phone: "212-555-0188".to_owned(),
            distance_km: 3.2,
            distance_mi: 1.99,
            kind: ResourceKind::Local,
        };
        let json = serde_json::to_value(&resource).expect("serialize");
        assert_eq!(json["type"].as_str(), Some("local"));
        assert!(json["distanceMi"].as_f64().is_some());
    }
}
