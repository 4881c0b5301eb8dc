//! Provider-fallback orchestration.
//!
//! [`GeocoderStack`] walks primary → secondary, giving each configured
//! provider two attempts (one retry after a short backoff) under a per-attempt
//! timeout. Exhausting every attempt is a valid outcome, not an error: the
//! caller composes a national-only response instead.

use std::time::Duration;

use haven_core::geo::GeoCoordinate;
use haven_core::postal::NormalizedCode;

use crate::provider::{GeocodeProvider, GeocoderUsed};

/// The primary/secondary provider chain.
///
/// Either slot may be unconfigured (missing credential); the stack skips it.
/// A stack with no providers resolves everything to `(None, "none")`.
pub struct GeocoderStack<P, S> {
    primary: Option<P>,
    secondary: Option<S>,
    attempt_timeout: Duration,
    retry_backoff: Duration,
}

impl<P: GeocodeProvider, S: GeocodeProvider> GeocoderStack<P, S> {
    #[must_use]
    pub fn new(
        primary: Option<P>,
        secondary: Option<S>,
        attempt_timeout: Duration,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            primary,
            secondary,
            attempt_timeout,
            retry_backoff,
        }
    }

    /// Which slot is first in line, by configuration — not by last success.
    #[must_use]
    pub fn configured(&self) -> GeocoderUsed {
        if self.primary.is_some() {
            GeocoderUsed::Primary
        } else if self.secondary.is_some() {
            GeocoderUsed::Secondary
        } else {
            GeocoderUsed::None
        }
    }

    /// Resolve a postal code, falling back across providers.
    ///
    /// Per provider: one attempt, a short backoff, one retry. Timeouts,
    /// non-2xx statuses, malformed bodies, and empty result sets are all the
    /// same failure; no attempt is retried more than once. `(None, "none")`
    /// after all attempts is the degraded-but-valid outcome.
    pub async fn resolve(&self, code: &NormalizedCode) -> (Option<GeoCoordinate>, GeocoderUsed) {
        if let Some(primary) = &self.primary {
            if let Some(coord) = self.attempt_with_retry(primary, code).await {
                return (Some(coord), GeocoderUsed::Primary);
            }
        }

        if let Some(secondary) = &self.secondary {
            if let Some(coord) = self.attempt_with_retry(secondary, code).await {
                return (Some(coord), GeocoderUsed::Secondary);
            }
        }

        (None, GeocoderUsed::None)
    }

    async fn attempt_with_retry<G: GeocodeProvider>(
        &self,
        provider: &G,
        code: &NormalizedCode,
    ) -> Option<GeoCoordinate> {
        if let Some(coord) = self.attempt(provider, code, 1).await {
            return Some(coord);
        }
        tokio::time::sleep(self.retry_backoff).await;
        self.attempt(provider, code, 2).await
    }

    async fn attempt<G: GeocodeProvider>(
        &self,
        provider: &G,
        code: &NormalizedCode,
        attempt: u32,
    ) -> Option<GeoCoordinate> {
        match tokio::time::timeout(self.attempt_timeout, provider.resolve(code)).await {
            Ok(Ok(coord)) => Some(coord),
            Ok(Err(err)) => {
                tracing::warn!(
                    provider = provider.name(),
                    attempt,
                    error = %err,
                    "geocode attempt failed"
                );
                None
            }
            Err(_elapsed) => {
                tracing::warn!(
                    provider = provider.name(),
                    attempt,
                    timeout_ms = u64::try_from(self.attempt_timeout.as_millis()).unwrap_or(u64::MAX),
                    "geocode attempt timed out; discarding any late result"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use haven_core::postal::normalize;

    use crate::error::GeocodeError;

    use super::*;

    /// Scripted provider: counts calls, optionally succeeds with a fixed
    /// coordinate or sleeps past any reasonable timeout.
    #[derive(Clone)]
    struct MockProvider {
        calls: Arc<AtomicU32>,
        coord: Option<GeoCoordinate>,
        hang: bool,
    }

    impl MockProvider {
        fn succeeding(lat: f64, lng: f64) -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                coord: Some(GeoCoordinate {
                    lat,
                    lng,
                    city: None,
                    region: None,
                    country: "US".to_owned(),
                }),
                hang: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                coord: None,
                hang: false,
            }
        }

        fn hanging() -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                coord: None,
                hang: true,
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn resolve(&self, code: &NormalizedCode) -> Result<GeoCoordinate, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            self.coord.clone().ok_or(GeocodeError::NoMatch {
                query: code.normalized.clone(),
            })
        }
    }

    fn stack(
        primary: Option<MockProvider>,
        secondary: Option<MockProvider>,
    ) -> GeocoderStack<MockProvider, MockProvider> {
        GeocoderStack::new(
            primary,
            secondary,
            Duration::from_millis(50),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn primary_success_skips_secondary() {
        let primary = MockProvider::succeeding(40.75, -73.99);
        let secondary = MockProvider::failing();
        let s = stack(Some(primary.clone()), Some(secondary.clone()));

        let code = normalize("10001", None).expect("valid ZIP");
        let (coord, used) = s.resolve(&code).await;

        assert!(coord.is_some());
        assert_eq!(used, GeocoderUsed::Primary);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn primary_failure_retries_once_then_falls_back() {
        let primary = MockProvider::failing();
        let secondary = MockProvider::succeeding(40.75, -73.99);
        let s = stack(Some(primary.clone()), Some(secondary.clone()));

        let code = normalize("10001", None).expect("valid ZIP");
        let (coord, used) = s.resolve(&code).await;

        assert!(coord.is_some());
        assert_eq!(used, GeocoderUsed::Secondary);
        assert_eq!(primary.call_count(), 2, "primary gets exactly one retry");
        assert_eq!(secondary.call_count(), 1);
    }

    #[tokio::test]
    async fn both_failing_exhausts_four_attempts() {
        let primary = MockProvider::failing();
        let secondary = MockProvider::failing();
        let s = stack(Some(primary.clone()), Some(secondary.clone()));

        let code = normalize("10001", None).expect("valid ZIP");
        let (coord, used) = s.resolve(&code).await;

        assert!(coord.is_none());
        assert_eq!(used, GeocoderUsed::None);
        assert_eq!(primary.call_count(), 2);
        assert_eq!(secondary.call_count(), 2);
    }

    #[tokio::test]
    async fn missing_primary_credential_starts_at_secondary() {
        let secondary = MockProvider::succeeding(43.65, -79.38);
        let s = stack(None, Some(secondary.clone()));

        let code = normalize("M5V 2T6", None).expect("valid postal code");
        let (coord, used) = s.resolve(&code).await;

        assert!(coord.is_some());
        assert_eq!(used, GeocoderUsed::Secondary);
        assert_eq!(secondary.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_stack_resolves_to_none() {
        let s: GeocoderStack<MockProvider, MockProvider> = stack(None, None);
        let code = normalize("10001", None).expect("valid ZIP");
        let (coord, used) = s.resolve(&code).await;
        assert!(coord.is_none());
        assert_eq!(used, GeocoderUsed::None);
    }

    #[tokio::test]
    async fn hanging_provider_times_out_and_falls_back() {
        let primary = MockProvider::hanging();
        let secondary = MockProvider::succeeding(40.75, -73.99);
        let s = stack(Some(primary.clone()), Some(secondary.clone()));

        let code = normalize("10001", None).expect("valid ZIP");
        let (coord, used) = s.resolve(&code).await;

        assert!(coord.is_some());
        assert_eq!(used, GeocoderUsed::Secondary);
        assert_eq!(primary.call_count(), 2, "both timed-out attempts counted");
    }

    #[test]
    fn configured_reports_first_available_slot() {
        assert_eq!(
            stack(Some(MockProvider::failing()), None).configured(),
            GeocoderUsed::Primary
        );
        assert_eq!(
            stack(None, Some(MockProvider::failing())).configured(),
            GeocoderUsed::Secondary
        );
        assert_eq!(
            stack(None, None).configured(),
            GeocoderUsed::None
        );
    }
}
