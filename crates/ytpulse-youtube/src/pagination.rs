//! Token-driven pagination over a playlist's items.
//!
//! `playlistItems.list` returns at most [`MAX_PAGE_SIZE`] items per call plus an
//! opaque `nextPageToken`. [`upload_pages`] turns that protocol into a `Stream`
//! of pages: the first request carries no token, each following request carries
//! the token of the previous page, and the stream ends after a page without one.
//! Requests are only issued as the consumer polls, so dropping the stream early
//! stops pagination.

use futures::stream::{self, Stream};

use crate::api::YoutubeApi;
use crate::error::YoutubeError;
use crate::types::PlaylistItemListResponse;

/// Largest `maxResults` the API accepts for `playlistItems.list` and the
/// largest id batch for `videos.list`.
pub const MAX_PAGE_SIZE: u32 = 50;

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Streams the pages of `playlist_id`, in order.
///
/// An error ends the stream: the failed page is yielded as `Err` and nothing
/// follows it.
pub fn upload_pages<'a, A>(
    api: &'a A,
    playlist_id: &'a str,
) -> impl Stream<Item = Result<PlaylistItemListResponse, YoutubeError>> + Send + 'a
where
    A: YoutubeApi + ?Sized,
{
    stream::try_unfold(Cursor::Start, move |cursor| async move {
        let token = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
        };

        let page = api
            .list_playlist_items(playlist_id, MAX_PAGE_SIZE, token.as_deref())
            .await?;

        let next = match page.next_page_token.as_deref() {
            Some(token) if !token.is_empty() => Cursor::Next(token.to_owned()),
            _ => Cursor::Done,
        };

        tracing::debug!(
            playlist = playlist_id,
            items = page.items.len(),
            has_next = matches!(next, Cursor::Next(_)),
            "fetched playlist page"
        );

        Ok(Some((page, next)))
    })
}
