use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use ytpulse_analyzer::{analyze_channel, AnalysisOptions, AnalysisReport};

use crate::middleware::RequestId;

use super::{classify_upstream, ApiError, AppState};

/// Query parameters arrive as strings so a malformed integer maps to our own
/// 422 body instead of axum's plain-text rejection.
#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeQuery {
    channel: Option<String>,
    max_videos: Option<String>,
    limit: Option<String>,
}

impl AnalyzeQuery {
    fn options(&self) -> Result<AnalysisOptions, ApiError> {
        let max_videos = parse_int(
            "max_videos",
            self.max_videos.as_deref(),
            AnalysisOptions::DEFAULT_MAX_VIDEOS,
        )?;
        let limit = parse_int("limit", self.limit.as_deref(), AnalysisOptions::DEFAULT_LIMIT)?;
        AnalysisOptions::new(max_videos, limit).map_err(|e| ApiError::unprocessable(e.to_string()))
    }
}

fn parse_int(name: &str, raw: Option<&str>, default: usize) -> Result<i64, ApiError> {
    match raw {
        None => Ok(i64::try_from(default).unwrap_or(i64::MAX)),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::unprocessable(format!("{name} must be an integer, got '{raw}'"))),
    }
}

/// `GET /analyze?channel=&max_videos=&limit=` runs the full pipeline.
pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    let options = query.options()?;
    let channel = query
        .channel
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::unprocessable("missing required query parameter: channel"))?;

    tracing::info!(
        request_id = %req_id.0,
        channel = %channel,
        max_videos = options.max_videos(),
        limit = options.limit(),
        "analyze request"
    );

    let report = analyze_channel(state.api.as_ref(), &channel, options)
        .await
        .map_err(|e| {
            let api_error = classify_upstream(&e);
            if api_error.is_server_error() {
                tracing::error!(
                    request_id = %req_id.0,
                    channel = %channel,
                    status = api_error.status.as_u16(),
                    error = %e,
                    "analysis failed"
                );
            } else {
                tracing::info!(
                    request_id = %req_id.0,
                    channel = %channel,
                    status = api_error.status.as_u16(),
                    error = %e,
                    "analysis rejected"
                );
            }
            api_error
        })?;

    Ok(Json(report))
}
