//! Channel analysis pipeline for ytpulse.
//!
//! Resolves a channel, enumerates its most recent uploads, fetches their
//! statistics in batches and ranks them by engagement and by views. Each stage
//! talks to the provider only through [`ytpulse_youtube::YoutubeApi`], so the
//! whole pipeline runs unchanged against a fake in tests.

pub mod details;
pub mod enumerate;
pub mod error;
pub mod pipeline;
pub mod ranking;
pub mod resolve;
pub mod types;

#[cfg(test)]
mod fake;

pub use details::fetch_details;
pub use enumerate::enumerate_uploads;
pub use error::{AnalyzeError, OptionsError};
pub use pipeline::{analyze_channel, AnalysisOptions};
pub use ranking::{quota_estimate, rank, Ranking};
pub use resolve::{channel_lookup, resolve_channel};
pub use types::{AnalysisReport, ChannelRecord, ItemRecord};

/// Largest page the uploads listing returns and largest id batch accepted by
/// the video details endpoint.
pub const BATCH_SIZE: usize = ytpulse_youtube::MAX_PAGE_SIZE as usize;
