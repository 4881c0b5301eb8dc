//! Per-client fixed-window admission control.
//!
//! A best-effort abuse guard in front of the paid geocoding dependency, not a
//! billing control: windows live in process memory and do not survive
//! restarts. State is owned by the limiter and injected where needed, so each
//! test can build an isolated instance.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Stale windows are swept opportunistically once the map grows past this.
const PRUNE_THRESHOLD: usize = 1024;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected { retry_after_secs: u64 },
}

impl Admission {
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window limiter keyed by client identifier.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts a request against `client_id`'s current window.
    ///
    /// The first request from a client, or any request after the window
    /// lapses, resets the window and is admitted. Within a window the count
    /// is incremented and compared against the quota; rejections carry the
    /// seconds remaining until the window resets.
    pub async fn check(&self, client_id: &str) -> Admission {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if let Some(window) = windows.get_mut(client_id) {
            if now < window.reset_at {
                window.count += 1;
                if window.count <= self.max_requests {
                    return Admission::Admitted;
                }
                let retry_after_secs = window
                    .reset_at
                    .saturating_duration_since(now)
                    .as_secs()
                    .max(1);
                return Admission::Rejected { retry_after_secs };
            }
        }

        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, window| window.reset_at > now);
        }

        windows.insert(
            client_id.to_owned(),
            Window {
                count: 1,
                reset_at: now + self.window,
            },
        );
        Admission::Admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn quota_boundary_admits_nth_and_rejects_nth_plus_one() {
        let limiter = RateLimiter::new(30, Duration::from_secs(60));
        for i in 1..=30 {
            assert!(
                limiter.check("203.0.113.7").await.is_admitted(),
                "request {i} should be admitted"
            );
        }
        let admission = limiter.check("203.0.113.7").await;
        assert!(
            matches!(admission, Admission::Rejected { retry_after_secs } if retry_after_secs >= 1),
            "31st request should be rejected with retry guidance, got {admission:?}"
        );
    }

    #[tokio::test]
    async fn clients_have_independent_windows() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("client-a").await.is_admitted());
        assert!(!limiter.check("client-a").await.is_admitted());
        assert!(limiter.check("client-b").await.is_admitted());
    }

    #[tokio::test]
    async fn window_reset_readmits_client() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        assert!(limiter.check("client-a").await.is_admitted());
        assert!(!limiter.check("client-a").await.is_admitted());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(
            limiter.check("client-a").await.is_admitted(),
            "a fresh window should admit again"
        );
    }

    #[tokio::test]
    async fn prune_drops_expired_windows() {
        let limiter = RateLimiter::new(1, Duration::ZERO);
        for i in 0..PRUNE_THRESHOLD {
            limiter.check(&format!("client-{i}")).await;
        }
        // Every window above expired instantly; the next insert sweeps them.
        limiter.check("fresh-client").await;
        assert!(limiter.windows.lock().await.len() <= 2);
    }
}
