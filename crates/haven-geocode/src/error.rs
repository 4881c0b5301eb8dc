use thiserror::Error;

/// Errors returned by the geocoding provider clients.
///
/// The orchestrator treats every variant identically — any failure means "no
/// coordinate from this attempt" — so the distinctions exist for logs and
/// tests, not for control flow.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client, or a non-2xx
    /// status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client misconfiguration, e.g. an unusable base URL.
    #[error("geocoder configuration error: {0}")]
    Config(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered successfully but returned an empty result set.
    #[error("no geocoding match for query {query:?}")]
    NoMatch { query: String },

    /// The provider returned a coordinate outside WGS84 bounds.
    #[error("provider returned out-of-range coordinate ({lat}, {lng})")]
    OutOfRange { lat: f64, lng: f64 },
}
