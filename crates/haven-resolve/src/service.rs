//! The resolution pipeline: validate → cache → geocode → match → compose.
//!
//! [`ResolverService`] owns every collaborator as an injected field — no
//! module-level state — so tests build isolated instances with mock providers
//! and fixture directories.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use haven_core::postal::{self, Country, NormalizedCode, PostalError};
use haven_geocode::{GeocodeProvider, GeocoderStack, GeocoderUsed};

use crate::directory::{DirectoryError, ResourceDirectory};
use crate::matcher;
use crate::nationals::nationals_for;
use crate::store::TtlStore;
use crate::types::{LocalResource, NationalResource, ResolvedResponse};

/// Advisory message attached to degraded (geocode-failed) responses.
pub const DEGRADED_ADVISORY: &str = "Could not locate postal code";

/// Failures a caller can observe.
///
/// Provider outages never appear here: geocoding exhaustion degrades into a
/// national-only success. Only malformed input and a dead directory surface.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidFormat(#[from] PostalError),

    #[error("resource directory lookup failed: {0}")]
    Directory(#[from] DirectoryError),
}

pub struct ResolverService<P, S> {
    directory: Arc<dyn ResourceDirectory>,
    geocoder: GeocoderStack<P, S>,
    cache: Arc<dyn TtlStore<ResolvedResponse>>,
    success_ttl: Duration,
    degraded_ttl: Duration,
}

impl<P: GeocodeProvider, S: GeocodeProvider> ResolverService<P, S> {
    pub fn new(
        directory: Arc<dyn ResourceDirectory>,
        geocoder: GeocoderStack<P, S>,
        cache: Arc<dyn TtlStore<ResolvedResponse>>,
        success_ttl: Duration,
        degraded_ttl: Duration,
    ) -> Self {
        Self {
            directory,
            geocoder,
            cache,
            success_ttl,
            degraded_ttl,
        }
    }

    /// Resolves a raw postal code into ranked local resources plus the
    /// national catalog.
    ///
    /// A live cache hit short-circuits the entire geocode-and-match pipeline
    /// and comes back with `cached: true`. On a miss the geocoder stack runs;
    /// exhaustion composes a degraded national-only response (cached under
    /// the short TTL so a transient outage self-heals) rather than an error.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidFormat`]: the code matches neither supported
    ///   format. Never cached.
    /// - [`ResolveError::Directory`]: the location directory could not be
    ///   queried. Distinct from "no nearby results", which is an empty list.
    pub async fn resolve(
        &self,
        raw_code: &str,
        hint: Option<Country>,
    ) -> Result<ResolvedResponse, ResolveError> {
        let started = Instant::now();
        let code = postal::normalize(raw_code, hint)?;
        let key = cache_key(&code);

        if let Some(mut hit) = self.cache.get(&key).await {
            hit.cached = true;
            hit.latency_ms = elapsed_ms(started);
            tracing::debug!(key = %key, "postal code served from cache");
            return Ok(hit);
        }

        let (location, geocoder_used) = self.geocoder.resolve(&code).await;

        let response = match location {
            Some(coord) => {
                let candidates = self.directory.list_active_with_coordinates().await?;
                let locals = matcher::nearby(&coord, &candidates);
                tracing::info!(
                    code = %code.normalized,
                    geocoder = %geocoder_used,
                    local_count = locals.len(),
                    "resolved postal code"
                );
                compose(
                    locals,
                    nationals_for(code.country),
                    coord,
                    code.country,
                    geocoder_used,
                    elapsed_ms(started),
                )
            }
            None => {
                tracing::warn!(
                    code = %code.normalized,
                    "geocoding exhausted; composing national-only response"
                );
                degraded(nationals_for(code.country), code.country, elapsed_ms(started))
            }
        };

        let ttl = if response.geocoder == GeocoderUsed::None {
            self.degraded_ttl
        } else {
            self.success_ttl
        };
        self.cache.put(&key, response.clone(), ttl).await;

        Ok(response)
    }

    /// Live cache entry count, for the health surface.
    pub async fn cache_entry_count(&self) -> usize {
        self.cache.entry_count().await
    }

    /// Which provider slot is configured, for the health surface.
    #[must_use]
    pub fn configured_geocoder(&self) -> GeocoderUsed {
        self.geocoder.configured()
    }
}

fn cache_key(code: &NormalizedCode) -> String {
    format!("{}:{}", code.country, code.normalized)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn compose(
    locals: Vec<LocalResource>,
    nationals: Vec<NationalResource>,
    location: haven_core::geo::GeoCoordinate,
    country: Country,
    geocoder: GeocoderUsed,
    latency_ms: u64,
) -> ResolvedResponse {
    ResolvedResponse {
        local_count: locals.len(),
        national_count: nationals.len(),
        locals,
        nationals,
        location: Some(location),
        country,
        geocoder,
        latency_ms,
        cached: false,
        error: None,
    }
}

fn degraded(nationals: Vec<NationalResource>, country: Country, latency_ms: u64) -> ResolvedResponse {
    ResolvedResponse {
        locals: Vec::new(),
        local_count: 0,
        national_count: nationals.len(),
        nationals,
        location: None,
        country,
        geocoder: GeocoderUsed::None,
        latency_ms,
        cached: false,
        error: Some(DEGRADED_ADVISORY.to_owned()),
    }
}
