//! Command handlers. Each returns the JSON document `main` prints.

use anyhow::Context;
use serde_json::Value;
use ytpulse_analyzer::{analyze_channel, resolve_channel, AnalysisOptions};
use ytpulse_youtube::YoutubeApi;

/// Resolves `handle` and returns the channel record.
///
/// # Errors
///
/// Returns an error if the channel does not exist or the provider call fails.
pub(crate) async fn run_channel<A>(api: &A, handle: &str) -> anyhow::Result<Value>
where
    A: YoutubeApi + ?Sized,
{
    let channel = resolve_channel(api, handle)
        .await
        .with_context(|| format!("failed to resolve channel '{handle}'"))?;
    Ok(serde_json::to_value(channel)?)
}

/// Runs a full analysis of `channel` and returns the report.
///
/// # Errors
///
/// Returns an error if any pipeline stage fails.
pub(crate) async fn run_analyze<A>(
    api: &A,
    channel: &str,
    options: AnalysisOptions,
) -> anyhow::Result<Value>
where
    A: YoutubeApi + ?Sized,
{
    let report = analyze_channel(api, channel, options)
        .await
        .with_context(|| format!("failed to analyze channel '{channel}'"))?;

    if report.sampled_videos() == 0 {
        tracing::info!(channel, "channel has no uploads to rank");
    }
    Ok(serde_json::to_value(&report)?)
}
