use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use haven_core::geo::GeoCoordinate;
use haven_core::postal::NormalizedCode;

use crate::error::GeocodeError;

/// Which provider produced a resolution, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderUsed {
    Primary,
    Secondary,
    None,
}

impl std::fmt::Display for GeocoderUsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocoderUsed::Primary => write!(f, "primary"),
            GeocoderUsed::Secondary => write!(f, "secondary"),
            GeocoderUsed::None => write!(f, "none"),
        }
    }
}

/// A single geocoding backend: postal code in, coordinate out.
///
/// Implementations own their HTTP specifics and response parsing; the
/// orchestrator only sees this capability.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Short provider label used in logs.
    fn name(&self) -> &'static str;

    /// Resolve a normalized postal code to a coordinate.
    ///
    /// # Errors
    ///
    /// Any [`GeocodeError`] — timeout, transport failure, non-2xx status,
    /// malformed body, or an empty result set.
    async fn resolve(&self, code: &NormalizedCode) -> Result<GeoCoordinate, GeocodeError>;
}
