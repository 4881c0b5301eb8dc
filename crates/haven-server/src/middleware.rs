use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use haven_resolve::{Admission, RateLimiter};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Serialize)]
struct RateLimitBody {
    error: RateLimitErrorBody,
}

#[derive(Debug, Serialize)]
struct RateLimitErrorBody {
    code: &'static str,
    message: &'static str,
    retry_after_secs: u64,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the per-client request quota.
///
/// Rejected requests never reach the handler, so they cannot consume a
/// geocoder call or mutate the cache.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_id(req.headers());

    match limiter.check(&client).await {
        Admission::Admitted => next.run(req).await,
        Admission::Rejected { retry_after_secs } => {
            tracing::debug!(client = %client, retry_after_secs, "rate limit exceeded");
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitBody {
                    error: RateLimitErrorBody {
                        code: "rate_limited",
                        message: "rate limit exceeded; retry after the indicated delay",
                        retry_after_secs,
                    },
                }),
            )
                .into_response();
            if let Ok(val) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, val);
            }
            response
        }
    }
}

/// Client identifier from the trusted proxy header.
///
/// Takes the first (client-most) entry of `x-forwarded-for`; direct
/// connections without the header share one bucket.
fn client_id(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| "direct".to_owned(), ToOwned::to_owned)
}
