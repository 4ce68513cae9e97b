//! YouTube Data API v3 response types.
//!
//! Only the parts of each resource requested via `part=` are modelled. Counters
//! in `statistics` arrive as decimal strings (`"viewCount": "1234"`); they are
//! parsed into `u64` here, while channel statistics are kept as raw JSON and
//! passed through untouched.

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub content_details: Option<ChannelContentDetails>,
    #[serde(default)]
    pub statistics: Map<String, Value>,
}

impl ChannelItem {
    /// Id of the channel's auto-generated uploads playlist, if the payload has one.
    #[must_use]
    pub fn uploads_playlist_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|d| d.related_playlists.as_ref())
            .and_then(|p| p.uploads.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    #[serde(default)]
    pub uploads: Option<String>,
}

// ---------------------------------------------------------------------------
// playlistItems.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl PlaylistItemListResponse {
    /// Video ids on this page, in playlist order.
    pub fn video_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .map(|item| item.content_details.video_id.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    /// ISO-8601 timestamp, kept verbatim.
    pub published_at: String,
}

/// Per-video counters. `None` means the field was absent from the payload,
/// which happens when the uploader hides likes or disables comments.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub comment_count: Option<u64>,
}

/// Accepts a counter encoded either as a decimal string or a JSON number.
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(u64),
        Text(String),
    }

    match Option::<RawCount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawCount::Number(n)) => Ok(Some(n)),
        Some(RawCount::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid count '{s}'"))),
    }
}

// ---------------------------------------------------------------------------
// error envelope
// ---------------------------------------------------------------------------

/// Google's standard error body: `{"error": {"code": 403, "message": "...", "errors": [...]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
}
