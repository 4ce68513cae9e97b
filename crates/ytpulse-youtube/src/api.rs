use async_trait::async_trait;

use crate::error::YoutubeError;
use crate::types::{ChannelListResponse, PlaylistItemListResponse, VideoListResponse};

/// How a channel is looked up in `channels.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLookup<'a> {
    /// Canonical channel id (`UC...`), sent as `id=`.
    Id(&'a str),
    /// Human-readable handle, sent as `forHandle=`.
    Handle(&'a str),
}

/// The three read operations the analysis pipeline needs from the provider.
///
/// Implemented by [`crate::YoutubeClient`] against the real API; tests supply
/// in-memory fakes.
#[async_trait]
pub trait YoutubeApi: Send + Sync {
    /// `channels.list` with `part=snippet,contentDetails,statistics`.
    async fn list_channels(
        &self,
        lookup: ChannelLookup<'_>,
    ) -> Result<ChannelListResponse, YoutubeError>;

    /// One page of `playlistItems.list` with `part=contentDetails`.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, YoutubeError>;

    /// `videos.list` with `part=snippet,statistics` for up to 50 ids.
    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse, YoutubeError>;
}
