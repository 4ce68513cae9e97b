//! Analysis pipeline orchestration.

use std::fmt;

use ytpulse_youtube::YoutubeApi;

use crate::details::fetch_details;
use crate::enumerate::enumerate_uploads;
use crate::error::{AnalyzeError, OptionsError};
use crate::resolve::resolve_channel;
use crate::types::AnalysisReport;

/// Validated knobs for one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    max_videos: usize,
    limit: usize,
}

impl AnalysisOptions {
    pub const DEFAULT_MAX_VIDEOS: usize = 50;
    pub const MAX_VIDEOS_CAP: usize = 200;
    pub const DEFAULT_LIMIT: usize = 5;
    pub const LIMIT_CAP: usize = 20;

    /// Validates `max_videos` in `1..=200` and `limit` in `1..=20`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError`] naming the first out-of-range parameter.
    pub fn new(max_videos: i64, limit: i64) -> Result<Self, OptionsError> {
        let max_videos = in_range(max_videos, Self::MAX_VIDEOS_CAP).ok_or(
            OptionsError::MaxVideos {
                value: max_videos,
                max: Self::MAX_VIDEOS_CAP,
            },
        )?;
        let limit = in_range(limit, Self::LIMIT_CAP).ok_or(OptionsError::Limit {
            value: limit,
            max: Self::LIMIT_CAP,
        })?;
        Ok(Self { max_videos, limit })
    }

    #[must_use]
    pub fn max_videos(&self) -> usize {
        self.max_videos
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_videos: Self::DEFAULT_MAX_VIDEOS,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

fn in_range(value: i64, max: usize) -> Option<usize> {
    usize::try_from(value)
        .ok()
        .filter(|v| (1..=max).contains(v))
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Resolving,
    Enumerating,
    BatchFetching,
    Ranking,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolving => "resolving",
            Self::Enumerating => "enumerating",
            Self::BatchFetching => "batch_fetching",
            Self::Ranking => "ranking",
        })
    }
}

fn log_failure(stage: Stage, identifier: &str, err: &AnalyzeError) {
    tracing::warn!(stage = %stage, channel = identifier, error = %err, "analysis failed");
}

/// Runs one analysis: resolve, enumerate, fetch details, rank.
///
/// Stages run strictly in order and the first failure aborts the request.
/// A channel with no uploads produces a report with empty lists and no quota
/// estimate, after exactly one provider call.
///
/// # Errors
///
/// - [`AnalyzeError::NotFound`] if the channel does not resolve.
/// - [`AnalyzeError::Upstream`] for any provider failure at any stage.
pub async fn analyze_channel<A>(
    api: &A,
    identifier: &str,
    options: AnalysisOptions,
) -> Result<AnalysisReport, AnalyzeError>
where
    A: YoutubeApi + ?Sized,
{
    tracing::debug!(stage = %Stage::Resolving, channel = identifier, "analysis stage");
    let channel = resolve_channel(api, identifier)
        .await
        .inspect_err(|e| log_failure(Stage::Resolving, identifier, e))?;

    tracing::debug!(
        stage = %Stage::Enumerating,
        channel = %channel.id,
        max_videos = options.max_videos,
        "analysis stage"
    );
    let ids = enumerate_uploads(api, &channel.uploads_collection_id, options.max_videos)
        .await
        .inspect_err(|e| log_failure(Stage::Enumerating, identifier, e))?;

    if ids.is_empty() {
        tracing::info!(channel = %channel.id, "channel has no uploads");
        return Ok(AnalysisReport::new(channel, 0, options.limit, Vec::new()));
    }

    tracing::debug!(stage = %Stage::BatchFetching, channel = %channel.id, ids = ids.len(), "analysis stage");
    let videos = fetch_details(api, &ids)
        .await
        .inspect_err(|e| log_failure(Stage::BatchFetching, identifier, e))?;

    tracing::debug!(stage = %Stage::Ranking, channel = %channel.id, videos = videos.len(), "analysis stage");
    let report = AnalysisReport::new(channel, ids.len(), options.limit, videos);

    tracing::info!(
        channel = %report.channel().id,
        enumerated = report.enumerated_videos(),
        sampled = report.sampled_videos(),
        quota_units = ?report.quota_estimate_units(),
        "analysis complete"
    );

    Ok(report)
}
