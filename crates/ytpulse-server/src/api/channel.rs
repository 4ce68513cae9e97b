use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use ytpulse_analyzer::{resolve_channel, AnalyzeError, ChannelRecord};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ChannelQuery {
    handle: Option<String>,
}

/// `GET /channel?handle=` resolves a channel without touching its uploads.
pub(super) async fn get_channel(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ChannelQuery>, QueryRejection>,
) -> Result<Json<ChannelRecord>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    let handle = query
        .handle
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| ApiError::unprocessable("missing required query parameter: handle"))?;

    match resolve_channel(state.api.as_ref(), &handle).await {
        Ok(channel) => Ok(Json(channel)),
        Err(AnalyzeError::NotFound { .. }) => Err(ApiError::not_found()),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, channel = %handle, error = %e, "channel lookup failed");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
