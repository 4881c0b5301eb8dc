//! Client for the Geocodio API (secondary provider).
//!
//! Geocodio covers the US and Canada and answers with a flat results list;
//! each result carries an `address_components` object and a `location` point.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use haven_core::geo::{self, GeoCoordinate};
use haven_core::postal::NormalizedCode;

use crate::error::GeocodeError;
use crate::mapbox::parse_base_url;
use crate::provider::GeocodeProvider;

const DEFAULT_BASE_URL: &str = "https://api.geocod.io/";

/// Client for the Geocodio forward-geocoding endpoint.
pub struct GeocodioClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct GeocodioResponse {
    results: Vec<GeocodioResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodioResult {
    #[serde(default)]
    address_components: AddressComponents,
    location: Point,
}

#[derive(Debug, Default, Deserialize)]
struct AddressComponents {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Point {
    lat: f64,
    lng: f64,
}

impl GeocodioClient {
    /// Creates a new client pointed at the production Geocodio API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::Config`] if `base_url` is
    /// not a usable URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent("haven/0.1 (resource-locator)")
            .build()?;

        let base_url = parse_base_url(base_url)?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    fn build_url(&self, code: &NormalizedCode) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("base URL validated at construction");
            segments.pop_if_empty().push("v1.7").push("geocode");
        }
        url.query_pairs_mut()
            .append_pair("q", &code.normalized)
            .append_pair("country", &code.country.to_string())
            .append_pair("limit", "1")
            .append_pair("api_key", &self.api_key);
        url
    }
}

#[async_trait]
impl GeocodeProvider for GeocodioClient {
    fn name(&self) -> &'static str {
        "geocodio"
    }

    async fn resolve(&self, code: &NormalizedCode) -> Result<GeoCoordinate, GeocodeError> {
        let url = self.build_url(code);
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let parsed: GeocodioResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("geocodio({})", code.normalized),
                source: e,
            })?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch {
                query: code.normalized.clone(),
            })?;

        let Point { lat, lng } = result.location;
        if !geo::in_bounds(lat, lng) {
            return Err(GeocodeError::OutOfRange { lat, lng });
        }

        Ok(GeoCoordinate {
            lat,
            lng,
            city: result.address_components.city,
            region: result.address_components.state,
            country: code.country.to_string(),
        })
    }
}
