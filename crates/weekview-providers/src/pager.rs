//! Draining a paginated feed into one ordered sequence.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::error::EventSourceError;
use crate::raw_event::RawEvent;
use crate::source::{CalendarQuery, EventSource, PageCursor};

/// Where a drain stands between two fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageState {
    Start,
    HasMore(PageCursor),
    Done,
}

/// A drain stopped before the last page.
///
/// The records received before the failure are kept for diagnostics only.
#[derive(Debug, Error)]
#[error("event feed failed after {pages_fetched} page(s): {error}")]
pub struct DrainError {
    #[source]
    pub error: EventSourceError,
    /// Records from the pages that did arrive, in order.
    pub partial: Vec<RawEvent>,
    pub pages_fetched: usize,
}

impl DrainError {
    pub fn into_source_error(self) -> EventSourceError {
        self.error
    }
}

/// Fetches every page of `query` and concatenates them in received order.
///
/// Pages are requested one after another, each with the cursor of the
/// previous one. Nothing is re-sorted. A feed that hands out a cursor it
/// already handed out is treated as broken.
///
/// # Errors
///
/// The first page failure aborts the drain and is returned as a
/// [`DrainError`].
pub async fn drain<S>(source: &S, query: &CalendarQuery) -> Result<Vec<RawEvent>, DrainError>
where
    S: EventSource + ?Sized,
{
    let mut records = Vec::new();
    let mut pages_fetched = 0;
    let mut seen = HashSet::new();
    let mut state = PageState::Start;

    loop {
        let cursor = match &state {
            PageState::Start => None,
            PageState::HasMore(cursor) => Some(cursor),
            PageState::Done => break,
        };

        let page = match source.fetch_page(query, cursor).await {
            Ok(page) => page,
            Err(error) => {
                return Err(DrainError {
                    error,
                    partial: records,
                    pages_fetched,
                });
            }
        };
        pages_fetched += 1;

        debug!(
            source = source.name(),
            page = pages_fetched,
            events = page.events.len(),
            has_more = page.has_more(),
            "fetched event page"
        );
        records.extend(page.events);

        state = match page.next {
            None => PageState::Done,
            Some(next) if !seen.insert(next.clone()) => {
                let error = EventSourceError::invalid_response(format!(
                    "feed repeated continuation cursor {}",
                    next
                ))
                .with_source_name(source.name());
                return Err(DrainError {
                    error,
                    partial: records,
                    pages_fetched,
                });
            }
            Some(next) => PageState::HasMore(next),
        };
    }

    Ok(records)
}
