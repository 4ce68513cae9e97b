//! In-memory [`YoutubeApi`] used by the pipeline tests.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use ytpulse_youtube::{
    ChannelListResponse, ChannelLookup, PlaylistItemListResponse, VideoListResponse, YoutubeApi,
    YoutubeError,
};

/// Which call should fail. Indices are zero-based call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Channels,
    Page(usize),
    Videos(usize),
}

#[derive(Default)]
pub struct FakeApi {
    channels: Vec<Value>,
    pages: Vec<Vec<String>>,
    videos: HashMap<String, Value>,
    fail: Option<FailPoint>,
    lookups: Mutex<Vec<String>>,
    page_calls: AtomicUsize,
    page_sizes: Mutex<Vec<u32>>,
    video_batches: Mutex<Vec<usize>>,
}

/// `vid-000`, `vid-001`, ... for each index in `range`.
pub fn video_ids(range: Range<usize>) -> Vec<String> {
    range.map(|n| format!("vid-{n:03}")).collect()
}

/// A `channels.list` item; `uploads: None` omits the uploads playlist.
pub fn channel_json(id: &str, uploads: Option<&str>) -> Value {
    let mut item = json!({
        "id": id,
        "snippet": { "title": "Fake Channel", "description": "a channel for tests" },
        "statistics": { "subscriberCount": "1234", "videoCount": "99" }
    });
    if let Some(uploads) = uploads {
        item["contentDetails"] = json!({ "relatedPlaylists": { "uploads": uploads } });
    } else {
        item["contentDetails"] = json!({ "relatedPlaylists": {} });
    }
    item
}

fn video_json(id: &str, views: Option<u64>, likes: Option<u64>, comments: Option<u64>) -> Value {
    let mut stats = serde_json::Map::new();
    for (key, value) in [("viewCount", views), ("likeCount", likes), ("commentCount", comments)] {
        if let Some(value) = value {
            stats.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    json!({
        "id": id,
        "snippet": { "title": format!("Video {id}"), "publishedAt": "2024-01-01T00:00:00Z" },
        "statistics": stats
    })
}

fn parse<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fake payload should deserialize")
}

fn quota_error() -> YoutubeError {
    YoutubeError::Api {
        status: 403,
        message: "The request cannot be completed because you have exceeded your quota. [quotaExceeded]"
            .to_string(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: Value) -> Self {
        self.channels.push(channel);
        self
    }

    /// Each inner vec is one page; every page but the last carries a token.
    pub fn with_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.pages = pages;
        self
    }

    /// Registers `vid-NNN` videos with `views = 100 + n`, `likes = n`, `comments = 1`.
    pub fn with_videos(mut self, range: Range<usize>) -> Self {
        for n in range {
            let id = format!("vid-{n:03}");
            let value = video_json(&id, Some(100 + n as u64), Some(n as u64), Some(1));
            self.videos.insert(id, value);
        }
        self
    }

    pub fn with_video(
        mut self,
        id: &str,
        views: Option<u64>,
        likes: Option<u64>,
        comments: Option<u64>,
    ) -> Self {
        self.videos
            .insert(id.to_string(), video_json(id, views, likes, comments));
        self
    }

    pub fn failing(mut self, point: FailPoint) -> Self {
        self.fail = Some(point);
        self
    }

    pub fn channel_lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lock").clone()
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn page_sizes(&self) -> Vec<u32> {
        self.page_sizes.lock().expect("lock").clone()
    }

    pub fn video_batches(&self) -> Vec<usize> {
        self.video_batches.lock().expect("lock").clone()
    }
}

#[async_trait]
impl YoutubeApi for FakeApi {
    async fn list_channels(
        &self,
        lookup: ChannelLookup<'_>,
    ) -> Result<ChannelListResponse, YoutubeError> {
        let recorded = match lookup {
            ChannelLookup::Id(id) => format!("id:{id}"),
            ChannelLookup::Handle(handle) => format!("handle:{handle}"),
        };
        self.lookups.lock().expect("lock").push(recorded);

        if self.fail == Some(FailPoint::Channels) {
            return Err(quota_error());
        }
        Ok(parse(json!({ "items": self.channels })))
    }

    async fn list_playlist_items(
        &self,
        _playlist_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, YoutubeError> {
        let call = self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.page_sizes.lock().expect("lock").push(page_size);

        if self.fail == Some(FailPoint::Page(call)) {
            return Err(quota_error());
        }

        let index = page_token
            .and_then(|token| token.strip_prefix("page-"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let ids = self.pages.get(index).cloned().unwrap_or_default();
        let items: Vec<Value> = ids
            .iter()
            .map(|id| json!({ "contentDetails": { "videoId": id } }))
            .collect();

        let mut body = json!({ "items": items });
        if index + 1 < self.pages.len() {
            body["nextPageToken"] = json!(format!("page-{}", index + 1));
        }
        Ok(parse(body))
    }

    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse, YoutubeError> {
        let call = {
            let mut batches = self.video_batches.lock().expect("lock");
            batches.push(ids.len());
            batches.len() - 1
        };

        if self.fail == Some(FailPoint::Videos(call)) {
            return Err(quota_error());
        }

        let items: Vec<Value> = ids
            .iter()
            .filter_map(|id| self.videos.get(id).cloned())
            .collect();
        Ok(parse(json!({ "items": items })))
    }
}
