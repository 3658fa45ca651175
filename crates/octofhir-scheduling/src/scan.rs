//! First-match scanning over a stream of pages.
//!
//! Entries are checked in page order. The first positive check ends the scan:
//! no further entries are checked and no further pages are requested. Running
//! out of pages yields `Ok(None)`, which callers must handle explicitly. A
//! failed fetch or check aborts the scan with that error.

use std::future::Future;

use futures_util::future;
use futures_util::{Stream, TryStreamExt, pin_mut};

use crate::bundle::Page;
use crate::error::SchedulingError;
use crate::resource::FhirResource;

/// Hook for watching a scan. All methods default to doing nothing.
pub trait ScanObserver: Send + Sync {
    /// A page arrived; `page` counts from 1.
    fn page_fetched(&self, _resource_type: &'static str, _page: usize, _entries: usize) {}

    fn candidate_checked(&self, _resource_type: &'static str, _page: usize, _index: usize) {}

    fn matched(&self, _resource_type: &'static str, _page: usize, _index: usize) {}

    /// The last page was scanned without a match.
    fn exhausted(&self, _resource_type: &'static str, _pages: usize) {}
}

pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Reports scan progress as `tracing` events.
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn page_fetched(&self, resource_type: &'static str, page: usize, entries: usize) {
        tracing::info!(resource_type, page, entries, "Fetched search page");
    }

    fn candidate_checked(&self, resource_type: &'static str, page: usize, index: usize) {
        tracing::debug!(resource_type, page, index, "Checking candidate");
    }

    fn matched(&self, resource_type: &'static str, page: usize, index: usize) {
        tracing::info!(resource_type, page, index, "Found matching resource");
    }

    fn exhausted(&self, resource_type: &'static str, pages: usize) {
        tracing::info!(resource_type, pages, "No matching resource on any page");
    }
}

/// Returns the first `Some` produced by `check`, visiting candidates in order.
///
/// `check` takes ownership of each candidate so it can hand it back inside the
/// result; it may itself run further requests.
pub async fn find_map_first<T, U, S, F, Fut>(
    pages: S,
    observer: &dyn ScanObserver,
    mut check: F,
) -> Result<Option<U>, SchedulingError>
where
    T: FhirResource,
    S: Stream<Item = Result<Page<T>, SchedulingError>>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<Option<U>, SchedulingError>>,
{
    pin_mut!(pages);
    let mut page_no = 0;
    while let Some(page) = pages.try_next().await? {
        page_no += 1;
        observer.page_fetched(T::RESOURCE_TYPE, page_no, page.items.len());
        for (index, candidate) in page.items.into_iter().enumerate() {
            observer.candidate_checked(T::RESOURCE_TYPE, page_no, index);
            if let Some(found) = check(candidate).await? {
                observer.matched(T::RESOURCE_TYPE, page_no, index);
                return Ok(Some(found));
            }
        }
    }
    observer.exhausted(T::RESOURCE_TYPE, page_no);
    Ok(None)
}

/// Returns the first candidate satisfying `predicate`.
pub async fn first_match<T, S, P>(
    pages: S,
    observer: &dyn ScanObserver,
    mut predicate: P,
) -> Result<Option<T>, SchedulingError>
where
    T: FhirResource,
    S: Stream<Item = Result<Page<T>, SchedulingError>>,
    P: FnMut(&T) -> bool,
{
    find_map_first(pages, observer, |candidate| {
        future::ready(Ok(predicate(&candidate).then_some(candidate)))
    })
    .await
}
