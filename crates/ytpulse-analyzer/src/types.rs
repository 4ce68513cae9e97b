//! Records produced by the pipeline and the report handed to callers.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use ytpulse_youtube::VideoItem;

use crate::ranking::{quota_estimate, rank, Ranking};

/// A resolved channel. `uploads_collection_id` is always present; resolution
/// fails rather than produce a record without it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "uploads_playlist")]
    pub uploads_collection_id: String,
    /// Provider statistics, passed through verbatim (counts as decimal strings).
    #[serde(rename = "stats")]
    pub statistics: Map<String, Value>,
}

/// One sampled video with its counters and derived engagement rate.
///
/// Absent like/comment counters are reported as `0` with `incomplete = true`,
/// so a caller can tell "zero" from "unknown". An absent view counter is `0`
/// but does not mark the record incomplete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub engagement_rate: f64,
    pub incomplete: bool,
}

impl ItemRecord {
    /// Builds a record from raw counters, `None` meaning "absent from the payload".
    #[must_use]
    pub fn from_counts(
        id: impl Into<String>,
        title: impl Into<String>,
        published_at: impl Into<String>,
        views: Option<u64>,
        likes: Option<u64>,
        comments: Option<u64>,
    ) -> Self {
        let incomplete = likes.is_none() || comments.is_none();
        let views = views.unwrap_or(0);
        let likes = likes.unwrap_or(0);
        let comments = comments.unwrap_or(0);

        Self {
            id: id.into(),
            title: title.into(),
            published_at: published_at.into(),
            views,
            likes,
            comments,
            engagement_rate: engagement_rate(likes, comments, views),
            incomplete,
        }
    }
}

impl From<VideoItem> for ItemRecord {
    fn from(video: VideoItem) -> Self {
        let stats = video.statistics;
        Self::from_counts(
            video.id,
            video.snippet.title,
            video.snippet.published_at,
            stats.view_count,
            stats.like_count,
            stats.comment_count,
        )
    }
}

/// `(likes + comments) / views`, or exactly `0.0` when there are no views.
#[must_use]
pub fn engagement_rate(likes: u64, comments: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = likes.saturating_add(comments) as f64 / views as f64;
    rate
}

/// Result of one analysis request.
///
/// Owns the channel and every sampled item in enumeration order. Rankings are
/// not stored: [`AnalysisReport::ranking`] derives them as borrowed views over
/// `videos`, which is also what serialization emits.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    channel: ChannelRecord,
    enumerated: usize,
    limit: usize,
    videos: Vec<ItemRecord>,
}

impl AnalysisReport {
    /// `enumerated` is the number of upload ids listed, which drives the quota
    /// estimate; `videos` may be shorter when the provider dropped some ids.
    #[must_use]
    pub fn new(
        channel: ChannelRecord,
        enumerated: usize,
        limit: usize,
        videos: Vec<ItemRecord>,
    ) -> Self {
        Self {
            channel,
            enumerated,
            limit,
            videos,
        }
    }

    #[must_use]
    pub fn channel(&self) -> &ChannelRecord {
        &self.channel
    }

    #[must_use]
    pub fn videos(&self) -> &[ItemRecord] {
        &self.videos
    }

    #[must_use]
    pub fn sampled_videos(&self) -> usize {
        self.videos.len()
    }

    #[must_use]
    pub fn enumerated_videos(&self) -> usize {
        self.enumerated
    }

    #[must_use]
    pub fn quota_estimate_units(&self) -> Option<u64> {
        quota_estimate(self.enumerated)
    }

    #[must_use]
    pub fn ranking(&self) -> Ranking<'_> {
        rank(&self.videos, self.limit)
    }
}

#[derive(Serialize)]
struct ChannelSummary<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    stats: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct ReportBody<'a> {
    channel: ChannelSummary<'a>,
    sampled_videos: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    quota_estimate_units: Option<u64>,
    top_engagement: &'a [&'a ItemRecord],
    top_views: &'a [&'a ItemRecord],
    videos: &'a [ItemRecord],
}

impl Serialize for AnalysisReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ranking = self.ranking();
        ReportBody {
            channel: ChannelSummary {
                id: &self.channel.id,
                title: &self.channel.title,
                description: &self.channel.description,
                stats: &self.channel.statistics,
            },
            sampled_videos: self.sampled_videos(),
            quota_estimate_units: self.quota_estimate_units(),
            top_engagement: &ranking.top_engagement,
            top_views: &ranking.top_views,
            videos: &self.videos,
        }
        .serialize(serializer)
    }
}
