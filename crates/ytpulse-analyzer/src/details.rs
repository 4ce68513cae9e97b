//! Batched video detail lookups.

use ytpulse_youtube::YoutubeApi;

use crate::error::AnalyzeError;
use crate::types::ItemRecord;
use crate::BATCH_SIZE;

/// Fetches statistics for `ids` in consecutive batches of 50, one request per
/// batch, and turns every returned video into an [`ItemRecord`].
///
/// Output follows the provider's order within each batch and batch order
/// across batches. Ids the provider does not return (deleted or private
/// videos) are dropped, so the result can be shorter than `ids`.
///
/// # Errors
///
/// Returns [`AnalyzeError::Upstream`] if any batch request fails; records from
/// earlier batches are discarded.
pub async fn fetch_details<A>(api: &A, ids: &[String]) -> Result<Vec<ItemRecord>, AnalyzeError>
where
    A: YoutubeApi + ?Sized,
{
    let mut records = Vec::with_capacity(ids.len());

    for batch in ids.chunks(BATCH_SIZE) {
        let response = api.list_videos(batch).await?;

        if response.items.len() < batch.len() {
            tracing::debug!(
                requested = batch.len(),
                returned = response.items.len(),
                "provider omitted some videos from a details batch"
            );
        }

        records.extend(response.items.into_iter().map(ItemRecord::from));
    }

    Ok(records)
}
