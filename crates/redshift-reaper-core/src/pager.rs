//! Marker-driven pagination as a lazy stream
//!
//! [`paginate`] turns a "fetch one page for this marker" function into a
//! single-pass stream of items. Pages are requested only when the consumer
//! has drained the previous one, so a large listing is never held in memory
//! as a whole. The first error ends the stream.

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::future::Future;

use crate::error::ApiError;
use crate::model::Page;

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Stream every item of a paginated listing
pub fn paginate<'a, T, F, Fut>(fetch: F) -> BoxStream<'a, Result<T, ApiError>>
where
    T: Send + 'a,
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Page<T>, ApiError>> + Send + 'a,
{
    let pages = stream::try_unfold((fetch, Cursor::Start), |(mut fetch, cursor)| async move {
        let marker = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(marker) => Some(marker),
        };

        let page = fetch(marker).await?;
        let next = match page.marker {
            Some(marker) if !marker.is_empty() => Cursor::Next(marker),
            _ => Cursor::Done,
        };

        Ok::<_, ApiError>(Some((page.items, (fetch, next))))
    });

    pages
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, ApiError>)))
        .try_flatten()
        .boxed()
}
