//! Geocoding clients and the provider-fallback orchestrator.
//!
//! Two external providers are supported: Mapbox forward geocoding (primary)
//! and Geocodio (secondary). Both implement [`GeocodeProvider`] and normalize
//! their responses into the same [`haven_core::geo::GeoCoordinate`] shape, so
//! nothing downstream branches on provider identity. [`GeocoderStack`] chains
//! them with per-attempt timeouts, a single retry per provider, and graceful
//! exhaustion.

mod error;
mod geocodio;
mod mapbox;
mod orchestrator;
mod provider;

pub use error::GeocodeError;
pub use geocodio::GeocodioClient;
pub use mapbox::MapboxClient;
pub use orchestrator::GeocoderStack;
pub use provider::{GeocodeProvider, GeocoderUsed};
