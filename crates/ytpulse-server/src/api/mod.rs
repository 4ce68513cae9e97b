mod analyze;
mod channel;
#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, request::Parts, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use ytpulse_analyzer::AnalyzeError;
use ytpulse_youtube::YoutubeApi;

use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Shared, immutable handler state.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn YoutubeApi>,
    pub started_at: Instant,
    pub api_key_loaded: bool,
}

impl AppState {
    pub fn new(api: Arc<dyn YoutubeApi>, api_key_loaded: bool) -> Self {
        Self {
            api,
            started_at: Instant::now(),
            api_key_loaded,
        }
    }
}

/// Error response: `{"detail": "..."}` with the chosen status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Channel not found")
    }

    /// 5xx responses are our fault or upstream's; 4xx are the caller's.
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                detail: &self.detail,
            }),
        )
            .into_response()
    }
}

/// Maps an analysis failure for `/analyze`.
///
/// Upstream messages that mention quota, or carry a 403, become 503 with a
/// fixed detail; anything else is passed through as a 500.
pub(super) fn classify_upstream(error: &AnalyzeError) -> ApiError {
    match error {
        AnalyzeError::NotFound { .. } => ApiError::not_found(),
        AnalyzeError::Upstream(_) => {
            let message = error.to_string();
            if message.to_lowercase().contains("quota") || message.contains("403") {
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Quota exceeded or restricted",
                )
            } else {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

/// Whether `origin` matches one of `allowed`.
///
/// Entries are exact origins, or `scheme://*.domain`, which matches any
/// subdomain of `domain` (but not `domain` itself).
pub(super) fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|pattern| match pattern.split_once("://*.") {
        Some((scheme, domain)) => origin
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .and_then(|host| host.strip_suffix(domain))
            .and_then(|sub| sub.strip_suffix('.'))
            .is_some_and(|sub| !sub.is_empty() && !sub.contains('/')),
        None => pattern == origin,
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let origins = origins.to_vec();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| origin_allowed(&origins, origin))
            },
        ))
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/channel", get(channel::get_channel))
        .route("/analyze", get(analyze::analyze))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(cors_origins))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct RootData {
    message: &'static str,
}

async fn root() -> Json<RootData> {
    Json(RootData {
        message: "ytpulse channel analyzer is running",
    })
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    api_key_loaded: bool,
    uptime_s: f64,
    version: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthData> {
    let uptime = state.started_at.elapsed().as_secs_f64();
    Json(HealthData {
        status: "ok",
        api_key_loaded: state.api_key_loaded,
        uptime_s: (uptime * 10.0).round() / 10.0,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::test_support::{body_json, get, get_with_headers, StubApi};
    use super::*;
    use ytpulse_youtube::YoutubeError;

    fn origins() -> Vec<String> {
        vec![
            "https://*.anvil.app".to_string(),
            "https://dashboard.example.com".to_string(),
        ]
    }

    #[test]
    fn wildcard_origin_matches_subdomains_only() {
        let allowed = origins();
        assert!(origin_allowed(&allowed, "https://my-app.anvil.app"));
        assert!(origin_allowed(&allowed, "https://a.b.anvil.app"));
        assert!(!origin_allowed(&allowed, "https://anvil.app"));
        assert!(!origin_allowed(&allowed, "http://my-app.anvil.app"));
        assert!(!origin_allowed(&allowed, "https://evilanvil.app"));
        assert!(!origin_allowed(&allowed, "https://anvil.app.evil.com"));
    }

    #[test]
    fn exact_origin_matches_verbatim() {
        let allowed = origins();
        assert!(origin_allowed(&allowed, "https://dashboard.example.com"));
        assert!(!origin_allowed(&allowed, "https://dashboard.example.com:8443"));
    }

    #[test]
    fn quota_messages_classify_as_service_unavailable() {
        let err = AnalyzeError::Upstream(YoutubeError::Api {
            status: 400,
            message: "Daily Quota Exceeded".to_string(),
        });
        let api_err = classify_upstream(&err);
        assert_eq!(api_err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api_err.detail, "Quota exceeded or restricted");
    }

    #[test]
    fn forbidden_status_classifies_as_service_unavailable() {
        let err = AnalyzeError::Upstream(YoutubeError::Api {
            status: 403,
            message: "The caller does not have permission".to_string(),
        });
        assert_eq!(classify_upstream(&err).status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn other_upstream_failures_pass_message_through() {
        let err = AnalyzeError::Upstream(YoutubeError::MissingField {
            context: "channel UCx".to_string(),
            field: "contentDetails.relatedPlaylists.uploads",
        });
        let api_err = classify_upstream(&err);
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.detail, err.to_string());
    }

    #[test]
    fn not_found_classifies_as_404() {
        let err = AnalyzeError::NotFound {
            identifier: "ghost".to_string(),
        };
        let api_err = classify_upstream(&err);
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert_eq!(api_err.detail, "Channel not found");
    }

    #[test]
    fn only_upstream_failures_count_as_server_errors() {
        let not_found = classify_upstream(&AnalyzeError::NotFound {
            identifier: "ghost".to_string(),
        });
        let quota = classify_upstream(&AnalyzeError::Upstream(YoutubeError::Api {
            status: 403,
            message: "quotaExceeded".to_string(),
        }));

        assert!(!not_found.is_server_error());
        assert!(!ApiError::unprocessable("bad limit").is_server_error());
        assert!(quota.is_server_error());
    }

    #[tokio::test]
    async fn root_reports_running() {
        let response = get(StubApi::default(), "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "ytpulse channel analyzer is running");
    }

    #[tokio::test]
    async fn health_reports_key_uptime_and_version() {
        let response = get(StubApi::default(), "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["api_key_loaded"], true);
        assert!(json["uptime_s"].as_f64().is_some_and(|v| v >= 0.0));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn unknown_route_still_carries_request_id() {
        let response = get(StubApi::default(), "/nope").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn cors_echoes_allowed_wildcard_origin() {
        let response = get_with_headers(
            StubApi::default(),
            "/health",
            &[("origin", "https://my-dash.anvil.app")],
        )
        .await;

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("https://my-dash.anvil.app")
        );
    }

    #[tokio::test]
    async fn cors_ignores_unlisted_origin() {
        let response = get_with_headers(
            StubApi::default(),
            "/health",
            &[("origin", "https://evil.example.com")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
