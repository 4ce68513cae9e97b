//! Upload enumeration over the uploads playlist's page stream.

use std::pin::pin;

use futures::TryStreamExt;
use ytpulse_youtube::{upload_pages, YoutubeApi};

use crate::error::AnalyzeError;
use crate::BATCH_SIZE;

/// Hard stop against a provider that keeps handing out continuation tokens.
const MAX_PAGES: usize = 200;

/// Collects up to `max_items` video ids from the uploads playlist, newest first.
///
/// Pages are requested one at a time and enumeration stops as soon as the cap
/// is reached (the last page may be cut short) or the playlist has no further
/// page. Full pages need `ceil(max_items / 50)` requests; short pages (the
/// provider filters private and deleted entries) are followed as long as a
/// continuation token comes back, up to [`MAX_PAGES`] requests.
///
/// # Errors
///
/// Returns [`AnalyzeError::Upstream`] if any page request fails. Ids from
/// earlier pages are discarded in that case.
pub async fn enumerate_uploads<A>(
    api: &A,
    uploads_collection_id: &str,
    max_items: usize,
) -> Result<Vec<String>, AnalyzeError>
where
    A: YoutubeApi + ?Sized,
{
    if max_items == 0 {
        return Ok(Vec::new());
    }

    let mut ids: Vec<String> = Vec::with_capacity(max_items.min(BATCH_SIZE * 4));
    let mut pages = pin!(upload_pages(api, uploads_collection_id));
    let mut fetched_pages = 0usize;

    while let Some(page) = pages.try_next().await? {
        fetched_pages += 1;

        let remaining = max_items - ids.len();
        ids.extend(page.video_ids().take(remaining).map(str::to_owned));

        if ids.len() >= max_items {
            break;
        }
        if fetched_pages >= MAX_PAGES {
            tracing::warn!(
                playlist = uploads_collection_id,
                collected = ids.len(),
                max_items,
                pages = fetched_pages,
                "page limit reached before the item cap"
            );
            break;
        }
    }

    Ok(ids)
}
