//! Router test helpers and a canned [`YoutubeApi`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use ytpulse_youtube::{
    ChannelListResponse, ChannelLookup, PlaylistItemListResponse, VideoListResponse, YoutubeApi,
    YoutubeError,
};

use super::{build_app, AppState};

/// Serves one channel (`UCstub`, uploads `UUstub`) whose uploads are `uploads`,
/// each with `views = 1000 * (n + 1)`, `likes = 10 * (n + 1)`, `comments = n`.
#[derive(Default, Clone)]
pub struct StubApi {
    pub missing_channel: bool,
    pub uploads: Vec<String>,
    /// When set, every call fails with `YoutubeError::Api { status, message }`.
    pub failure: Option<(u16, String)>,
}

impl StubApi {
    pub fn with_uploads(count: usize) -> Self {
        Self {
            uploads: (0..count).map(|n| format!("vid-{n}")).collect(),
            ..Self::default()
        }
    }

    pub fn missing_channel() -> Self {
        Self {
            missing_channel: true,
            ..Self::default()
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), YoutubeError> {
        match &self.failure {
            Some((status, message)) => Err(YoutubeError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("stub payload should deserialize")
}

#[async_trait]
impl YoutubeApi for StubApi {
    async fn list_channels(
        &self,
        _lookup: ChannelLookup<'_>,
    ) -> Result<ChannelListResponse, YoutubeError> {
        self.check()?;
        if self.missing_channel {
            return Ok(parse(json!({ "items": [] })));
        }
        Ok(parse(json!({
            "items": [{
                "id": "UCstub",
                "snippet": { "title": "Stub Channel", "description": "stubbed" },
                "contentDetails": { "relatedPlaylists": { "uploads": "UUstub" } },
                "statistics": { "subscriberCount": "10", "viewCount": "9000" }
            }]
        })))
    }

    async fn list_playlist_items(
        &self,
        _playlist_id: &str,
        _page_size: u32,
        _page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, YoutubeError> {
        self.check()?;
        let items: Vec<Value> = self
            .uploads
            .iter()
            .map(|id| json!({ "contentDetails": { "videoId": id } }))
            .collect();
        Ok(parse(json!({ "items": items })))
    }

    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse, YoutubeError> {
        self.check()?;
        let items: Vec<Value> = ids
            .iter()
            .filter_map(|id| {
                let n: u64 = id.strip_prefix("vid-")?.parse().ok()?;
                Some(json!({
                    "id": id,
                    "snippet": { "title": format!("Video {n}"), "publishedAt": "2024-03-01T00:00:00Z" },
                    "statistics": {
                        "viewCount": (1000 * (n + 1)).to_string(),
                        "likeCount": (10 * (n + 1)).to_string(),
                        "commentCount": n.to_string()
                    }
                }))
            })
            .collect();
        Ok(parse(json!({ "items": items })))
    }
}

pub fn app(api: StubApi) -> axum::Router {
    let origins = vec!["https://*.anvil.app".to_string()];
    build_app(AppState::new(Arc::new(api), true), &origins)
}

pub async fn get(api: StubApi, uri: &str) -> Response {
    get_with_headers(api, uri, &[]).await
}

pub async fn get_with_headers(api: StubApi, uri: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app(api)
        .oneshot(builder.body(Body::empty()).expect("request"))
        .await
        .expect("response")
}

pub async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}
