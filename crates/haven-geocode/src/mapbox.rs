//! Client for the Mapbox forward-geocoding API (primary provider).
//!
//! Mapbox answers with a GeoJSON `FeatureCollection`; the best match carries
//! its coordinate in `center` (`[lng, lat]` order) and optional place/region
//! context entries, which are folded into the returned coordinate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use haven_core::geo::{self, GeoCoordinate};
use haven_core::postal::NormalizedCode;

use crate::error::GeocodeError;
use crate::provider::GeocodeProvider;

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";

/// Client for the Mapbox geocoding v5 endpoint.
///
/// Use [`MapboxClient::new`] for production or
/// [`MapboxClient::with_base_url`] to point at a mock server in tests.
pub struct MapboxClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]` per the GeoJSON convention.
    center: [f64; 2],
    #[serde(default)]
    context: Vec<ContextEntry>,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    id: String,
    text: String,
    #[serde(default)]
    short_code: Option<String>,
}

impl MapboxClient {
    /// Creates a new client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::Config`] if `base_url` is
    /// not a usable URL.
    pub fn with_base_url(
        access_token: &str,
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
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// Builds the request URL with a percent-encoded query path segment.
    ///
    /// Canadian codes contain a space, so the code goes through
    /// `path_segments_mut` rather than string formatting.
    fn build_url(&self, code: &NormalizedCode) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("base URL validated at construction");
            segments
                .pop_if_empty()
                .push("geocoding")
                .push("v5")
                .push("mapbox.places")
                .push(&format!("{}.json", code.normalized));
        }
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("country", &code.country.to_string().to_lowercase())
            .append_pair("types", "postcode")
            .append_pair("limit", "1");
        url
    }
}

pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, GeocodeError> {
    // Normalise: exactly one trailing slash so appended path segments land
    // under the root rather than replacing the last segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised)
        .map_err(|e| GeocodeError::Config(format!("invalid base URL '{base_url}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(GeocodeError::Config(format!(
            "base URL '{base_url}' cannot carry a path"
        )));
    }
    Ok(url)
}

#[async_trait]
impl GeocodeProvider for MapboxClient {
    fn name(&self) -> &'static str {
        "mapbox"
    }

    async fn resolve(&self, code: &NormalizedCode) -> Result<GeoCoordinate, GeocodeError> {
        let url = self.build_url(code);
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let parsed: FeatureCollection =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("mapbox({})", code.normalized),
                source: e,
            })?;

        let feature = parsed
            .features
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch {
                query: code.normalized.clone(),
            })?;

        let [lng, lat] = feature.center;
        if !geo::in_bounds(lat, lng) {
            return Err(GeocodeError::OutOfRange { lat, lng });
        }

        let mut city = None;
        let mut region = None;
        for entry in &feature.context {
            if city.is_none() && entry.id.starts_with("place.") {
                city = Some(entry.text.clone());
            }
            if region.is_none() && entry.id.starts_with("region.") {
                // short_code is "US-NY" / "CA-ON"; keep the subdivision part.
                region = Some(
                    entry
                        .short_code
                        .as_deref()
                        .and_then(|sc| sc.split('-').nth(1))
                        .map_or_else(|| entry.text.clone(), ToOwned::to_owned),
                );
            }
        }

        Ok(GeoCoordinate {
            lat,
            lng,
            city,
            region,
            country: code.country.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use haven_core::postal::normalize;

    use super::*;

    fn test_client(base_url: &str) -> MapboxClient {
        MapboxClient::with_base_url("pk.test-token", 4, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_encodes_code_and_credentials() {
        let client = test_client("https://api.mapbox.com");
        let code = normalize("10001", None).expect("valid ZIP");
        let url = client.build_url(&code);
        assert_eq!(
            url.as_str(),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/10001.json\
             ?access_token=pk.test-token&country=us&types=postcode&limit=1"
        );
    }

    #[test]
    fn build_url_percent_encodes_canadian_codes() {
        let client = test_client("https://api.mapbox.com");
        let code = normalize("M5V 2T6", None).expect("valid postal code");
        let url = client.build_url(&code);
        assert!(
            url.path().ends_with("/M5V%202T6.json"),
            "space should be percent-encoded: {url}"
        );
        assert!(url.query().is_some_and(|q| q.contains("country=ca")));
    }

    #[test]
    fn with_base_url_rejects_unusable_url() {
        let result = MapboxClient::with_base_url("pk.test", 4, "not a url");
        assert!(matches!(result, Err(GeocodeError::Config(_))));
    }
}
