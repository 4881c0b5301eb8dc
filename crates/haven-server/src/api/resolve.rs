use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use haven_core::postal::Country;
use haven_resolve::{ResolveError, ResolvedResponse};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResolveRequest {
    code: String,
    #[serde(default)]
    country_hint: Option<Country>,
}

pub(super) async fn resolve_code(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ResolveRequest>,
) -> Result<Json<ApiResponse<ResolvedResponse>>, ApiError> {
    match state.service.resolve(&body.code, body.country_hint).await {
        Ok(data) => Ok(Json(ApiResponse {
            data,
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(ResolveError::InvalidFormat(e)) => {
            Err(ApiError::new(req_id.0, "invalid_format", e.to_string()))
        }
        Err(ResolveError::Directory(e)) => {
            tracing::error!(error = %e, "location directory query failed");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "resource directory unavailable",
            ))
        }
    }
}
