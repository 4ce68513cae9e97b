//! YouTube Data API v3 access for ytpulse.
//!
//! [`YoutubeApi`] is the seam the analysis pipeline talks to; [`YoutubeClient`]
//! is the `reqwest` implementation used in production. Only the three read
//! endpoints the pipeline needs are modelled: `channels.list`,
//! `playlistItems.list` and `videos.list`.

pub mod api;
pub mod client;
pub mod error;
pub mod pagination;
pub mod types;

pub use api::{ChannelLookup, YoutubeApi};
pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use pagination::{upload_pages, MAX_PAGE_SIZE};
pub use types::{
    ChannelItem, ChannelListResponse, PlaylistItemListResponse, VideoItem, VideoListResponse,
    VideoStatistics,
};
