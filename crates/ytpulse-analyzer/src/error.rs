use thiserror::Error;
use ytpulse_youtube::YoutubeError;

/// Failure of an analysis request. Every stage aborts the whole request; no
/// partial result accompanies an error.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The provider returned no channel for the identifier.
    #[error("channel '{identifier}' not found")]
    NotFound { identifier: String },

    /// Transport, provider-side or payload failure at any stage.
    #[error(transparent)]
    Upstream(#[from] YoutubeError),
}

/// Rejected analysis parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("max_videos must be between 1 and {max}, got {value}")]
    MaxVideos { value: i64, max: usize },

    #[error("limit must be between 1 and {max}, got {value}")]
    Limit { value: i64, max: usize },
}
