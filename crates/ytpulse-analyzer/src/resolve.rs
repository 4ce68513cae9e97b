//! Channel resolution: identifier in, [`ChannelRecord`] out.

use ytpulse_youtube::{ChannelLookup, YoutubeApi, YoutubeError};

use crate::error::AnalyzeError;
use crate::types::ChannelRecord;

/// Every canonical channel id starts with this prefix.
const CHANNEL_ID_PREFIX: &str = "UC";

/// Decides whether `identifier` is a channel id or a handle.
#[must_use]
pub fn channel_lookup(identifier: &str) -> ChannelLookup<'_> {
    if identifier.starts_with(CHANNEL_ID_PREFIX) {
        ChannelLookup::Id(identifier)
    } else {
        ChannelLookup::Handle(identifier)
    }
}

/// Resolves `identifier` with exactly one `channels.list` call.
///
/// # Errors
///
/// - [`AnalyzeError::NotFound`] if the provider returns no channel.
/// - [`AnalyzeError::Upstream`] on provider failure, or when the channel has
///   no uploads playlist.
pub async fn resolve_channel<A>(api: &A, identifier: &str) -> Result<ChannelRecord, AnalyzeError>
where
    A: YoutubeApi + ?Sized,
{
    let lookup = channel_lookup(identifier);
    let response = api.list_channels(lookup).await?;

    let Some(item) = response.items.into_iter().next() else {
        return Err(AnalyzeError::NotFound {
            identifier: identifier.to_owned(),
        });
    };

    let uploads_collection_id = item
        .uploads_playlist_id()
        .map(str::to_owned)
        .ok_or_else(|| YoutubeError::MissingField {
            context: format!("channel {}", item.id),
            field: "contentDetails.relatedPlaylists.uploads",
        })?;

    Ok(ChannelRecord {
        id: item.id,
        title: item.snippet.title,
        description: item.snippet.description,
        uploads_collection_id,
        statistics: item.statistics,
    })
}
