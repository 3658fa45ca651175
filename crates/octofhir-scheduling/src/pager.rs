//! Link-following pagination as a lazy stream of typed pages.
//!
//! The first page is requested on the first poll. Each later page is requested
//! only when the consumer polls again and the previous page carried a `next`
//! link. A page without a `next` link ends the stream. The stream cannot be
//! restarted; run the search again for a fresh pass.

use futures_util::Stream;
use futures_util::stream;

use crate::bundle::Page;
use crate::error::SchedulingError;
use crate::gateway::{FhirGateway, SearchQuery};
use crate::resource::FhirResource;

enum Cursor {
    Start(SearchQuery),
    Next(String),
    Done,
}

/// Pages of `T` produced by `query`, following `next` links.
pub fn pages<'a, G, T>(
    gateway: &'a G,
    query: SearchQuery,
) -> impl Stream<Item = Result<Page<T>, SchedulingError>> + 'a
where
    G: FhirGateway + ?Sized,
    T: FhirResource + 'a,
{
    stream::try_unfold(Cursor::Start(query), move |cursor| advance::<G, T>(gateway, cursor))
}

async fn advance<G, T>(
    gateway: &G,
    cursor: Cursor,
) -> Result<Option<(Page<T>, Cursor)>, SchedulingError>
where
    G: FhirGateway + ?Sized,
    T: FhirResource,
{
    let bundle = match cursor {
        Cursor::Start(query) => gateway.search(&query).await?,
        Cursor::Next(url) => gateway.fetch_page(&url).await?,
        Cursor::Done => return Ok(None),
    };
    let page = Page::<T>::from_bundle(bundle);
    let cursor = match &page.next {
        Some(url) => Cursor::Next(url.clone()),
        None => Cursor::Done,
    };
    Ok(Some((page, cursor)))
}
