//! Integration tests for the geocoding clients and stack using wiremock.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use haven_core::postal::normalize;
use haven_geocode::{GeocodeError, GeocodeProvider, GeocoderStack, GeocoderUsed};
use haven_geocode::{GeocodioClient, MapboxClient};

fn mapbox(base_url: &str) -> MapboxClient {
    MapboxClient::with_base_url("pk.test-token", 4, base_url)
        .expect("client construction should not fail")
}

fn geocodio(base_url: &str) -> GeocodioClient {
    GeocodioClient::with_base_url("gcd-test-key", 4, base_url)
        .expect("client construction should not fail")
}

fn mapbox_feature_body() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "id": "postcode.276781",
                "center": [-73.9967, 40.7484],
                "place_name": "New York, New York 10001, United States",
                "context": [
                    { "id": "place.2618194", "text": "New York" },
                    { "id": "region.17349", "text": "New York", "short_code": "US-NY" },
                    { "id": "country.8790", "text": "United States", "short_code": "us" }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn mapbox_parses_feature_with_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/10001.json"))
        .and(query_param("access_token", "pk.test-token"))
        .and(query_param("country", "us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mapbox_feature_body()))
        .mount(&server)
        .await;

    let code = normalize("10001", None).expect("valid ZIP");
    let coord = mapbox(&server.uri())
        .resolve(&code)
        .await
        .expect("should parse feature");

    assert!((coord.lat - 40.7484).abs() < 1e-9);
    assert!((coord.lng - (-73.9967)).abs() < 1e-9);
    assert_eq!(coord.city.as_deref(), Some("New York"));
    assert_eq!(coord.region.as_deref(), Some("NY"));
    assert_eq!(coord.country, "US");
}

#[tokio::test]
async fn mapbox_empty_feature_set_is_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "type": "FeatureCollection", "features": [] })),
        )
        .mount(&server)
        .await;

    let code = normalize("99999", None).expect("valid ZIP");
    let result = mapbox(&server.uri()).resolve(&code).await;

    assert!(matches!(result, Err(GeocodeError::NoMatch { .. })));
}

#[tokio::test]
async fn mapbox_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let code = normalize("10001", None).expect("valid ZIP");
    let result = mapbox(&server.uri()).resolve(&code).await;

    assert!(matches!(result, Err(GeocodeError::Deserialize { .. })));
}

#[tokio::test]
async fn mapbox_out_of_range_center_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [ { "center": [-200.0, 95.0] } ]
        })))
        .mount(&server)
        .await;

    let code = normalize("10001", None).expect("valid ZIP");
    let result = mapbox(&server.uri()).resolve(&code).await;

    assert!(matches!(result, Err(GeocodeError::OutOfRange { .. })));
}

#[tokio::test]
async fn geocodio_parses_address_components() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "input": { "formatted_address": "M5V 2T6" },
        "results": [
            {
                "address_components": {
                    "city": "Toronto",
                    "state": "ON",
                    "zip": "M5V 2T6",
                    "country": "Canada"
                },
                "formatted_address": "Toronto, ON M5V 2T6",
                "location": { "lat": 43.6453, "lng": -79.3931 },
                "accuracy": 1.0
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1.7/geocode"))
        .and(query_param("q", "M5V 2T6"))
        .and(query_param("country", "CA"))
        .and(query_param("api_key", "gcd-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let code = normalize("m5v2t6", None).expect("valid postal code");
    let coord = geocodio(&server.uri())
        .resolve(&code)
        .await
        .expect("should parse result");

    assert!((coord.lat - 43.6453).abs() < 1e-9);
    assert_eq!(coord.city.as_deref(), Some("Toronto"));
    assert_eq!(coord.region.as_deref(), Some("ON"));
    assert_eq!(coord.country, "CA");
}

#[tokio::test]
async fn geocodio_empty_results_is_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })))
        .mount(&server)
        .await;

    let code = normalize("10001", None).expect("valid ZIP");
    let result = geocodio(&server.uri()).resolve(&code).await;

    assert!(matches!(result, Err(GeocodeError::NoMatch { .. })));
}

#[tokio::test]
async fn stack_falls_back_to_secondary_when_primary_returns_5xx() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&primary_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.7/geocode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "address_components": { "city": "New York", "state": "NY" },
                    "location": { "lat": 40.7484, "lng": -73.9967 }
                }
            ]
        })))
        .mount(&secondary_server)
        .await;

    let stack = GeocoderStack::new(
        Some(mapbox(&primary_server.uri())),
        Some(geocodio(&secondary_server.uri())),
        Duration::from_secs(4),
        Duration::ZERO,
    );

    let code = normalize("10001", None).expect("valid ZIP");
    let (coord, used) = stack.resolve(&code).await;

    assert!(coord.is_some());
    assert_eq!(used, GeocoderUsed::Secondary);
}

#[tokio::test]
async fn stack_degrades_when_both_providers_fail() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&primary_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&secondary_server)
        .await;

    let stack = GeocoderStack::new(
        Some(mapbox(&primary_server.uri())),
        Some(geocodio(&secondary_server.uri())),
        Duration::from_secs(4),
        Duration::ZERO,
    );

    let code = normalize("10001", None).expect("valid ZIP");
    let (coord, used) = stack.resolve(&code).await;

    assert!(coord.is_none());
    assert_eq!(used, GeocoderUsed::None);
}
