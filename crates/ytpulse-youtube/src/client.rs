//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API key management, a per-call timeout and typed
//! response deserialization. Non-2xx answers are surfaced as
//! [`YoutubeError::Api`] carrying the status and Google's error message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::api::{ChannelLookup, YoutubeApi};
use crate::error::YoutubeError;
use crate::types::{
    ChannelListResponse, ErrorEnvelope, PlaylistItemListResponse, VideoListResponse,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Client for the YouTube Data API.
///
/// Use [`YoutubeClient::new`] for production or [`YoutubeClient::with_base_url`]
/// to point at a mock server in tests. The inner `reqwest::Client` pools
/// connections; no response data is kept between calls.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("ytpulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash, so joining "channels" appends a segment
        // instead of replacing "v3".
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| YoutubeError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Builds the request URL for `resource` with percent-encoded query parameters.
    fn build_url(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(resource)
            .map_err(|e| YoutubeError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body into `T`.
    ///
    /// `context` names the call in error messages; it must not contain the key.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), call = context, "YouTube API error");
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Extracts a readable message from Google's error envelope, falling back to
/// the status reason when the body is not the standard shape.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let reasons: Vec<&str> = envelope
                .error
                .errors
                .iter()
                .filter_map(|d| d.reason.as_deref())
                .collect();
            let message = if envelope.error.message.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_owned()
            } else {
                envelope.error.message
            };
            if reasons.is_empty() {
                message
            } else {
                format!("{message} [{}]", reasons.join(", "))
            }
        }
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
    }
}

#[async_trait]
impl YoutubeApi for YoutubeClient {
    async fn list_channels(
        &self,
        lookup: ChannelLookup<'_>,
    ) -> Result<ChannelListResponse, YoutubeError> {
        let (param, value) = match lookup {
            ChannelLookup::Id(id) => ("id", id),
            ChannelLookup::Handle(handle) => ("forHandle", handle),
        };
        let url = self.build_url(
            "channels",
            &[("part", "snippet,contentDetails,statistics"), (param, value)],
        )?;
        self.request_json(url, &format!("channels.list({param}={value})"))
            .await
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, YoutubeError> {
        let page_size = page_size.to_string();
        let mut params = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.build_url("playlistItems", &params)?;
        self.request_json(url, &format!("playlistItems.list(playlistId={playlist_id})"))
            .await
    }

    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse, YoutubeError> {
        let joined = ids.join(",");
        let url = self.build_url(
            "videos",
            &[("part", "snippet,statistics"), ("id", joined.as_str())],
        )?;
        self.request_json(url, &format!("videos.list({} ids)", ids.len()))
            .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
