//! In-process event sources.
//!
//! [`MemorySource`] pages over a fixed list of records, the way a remote feed
//! would. [`ScriptedSource`] replays a prepared sequence of page results and
//! is meant for exercising failure paths.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{EventSourceError, EventSourceResult};
use crate::raw_event::RawEvent;
use crate::source::{BoxFuture, CalendarQuery, EventPage, EventSource, MAX_PAGE_SIZE, PageCursor};

/// A feed backed by a list of records.
///
/// Records are served in list order, without filtering by window.
#[derive(Debug)]
pub struct MemorySource {
    name: String,
    events: Vec<RawEvent>,
    max_page_size: u32,
    requests: AtomicUsize,
    queries: Mutex<Vec<CalendarQuery>>,
}

impl MemorySource {
    pub fn new(events: Vec<RawEvent>) -> Self {
        Self {
            name: "memory".to_string(),
            events,
            max_page_size: MAX_PAGE_SIZE,
            requests: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Builder method to set the source name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method to cap the page size below what queries ask for.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.max_page_size = page_size.max(1);
        self
    }

    /// Number of pages requested so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Every query received, in order.
    pub fn seen_queries(&self) -> Vec<CalendarQuery> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn page_at(&self, query: &CalendarQuery, offset: usize) -> EventPage {
        let size = query.page_size.min(self.max_page_size).max(1) as usize;
        let end = (offset + size).min(self.events.len());
        let events = self.events.get(offset..end).unwrap_or_default().to_vec();

        if end < self.events.len() {
            EventPage::with_next(events, PageCursor::new(format!("offset:{}", end)))
        } else {
            EventPage::last(events)
        }
    }
}

fn parse_offset(cursor: &PageCursor) -> Option<usize> {
    cursor.as_str().strip_prefix("offset:")?.parse().ok()
}

impl EventSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_page<'a>(
        &'a self,
        query: &'a CalendarQuery,
        cursor: Option<&'a PageCursor>,
    ) -> BoxFuture<'a, EventSourceResult<EventPage>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(query.clone());

        let result = match cursor {
            None => Ok(self.page_at(query, 0)),
            Some(cursor) => match parse_offset(cursor) {
                Some(offset) if offset <= self.events.len() => Ok(self.page_at(query, offset)),
                _ => Err(EventSourceError::bad_request(format!("unknown cursor {}", cursor))
                    .with_source_name(&self.name)),
            },
        };

        Box::pin(async move { result })
    }
}

/// A feed that replays prepared page results, one per request.
#[derive(Debug)]
pub struct ScriptedSource {
    pages: Mutex<VecDeque<EventSourceResult<EventPage>>>,
    cursors: Mutex<Vec<Option<PageCursor>>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<EventSourceResult<EventPage>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            cursors: Mutex::new(Vec::new()),
        }
    }

    /// Number of pages requested so far.
    pub fn requests(&self) -> usize {
        self.cursors().len()
    }

    /// The cursor passed with each request, in order.
    pub fn cursors(&self) -> Vec<Option<PageCursor>> {
        self.cursors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch_page<'a>(
        &'a self,
        _query: &'a CalendarQuery,
        cursor: Option<&'a PageCursor>,
    ) -> BoxFuture<'a, EventSourceResult<EventPage>> {
        self.cursors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(cursor.cloned());

        let next = self
            .pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(EventSourceError::internal("no scripted page left")));

        Box::pin(async move { next.map_err(|e| e.with_source_name("scripted")) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_event::RawDateTime;
    use chrono::{TimeZone, Utc};
    use weekview_core::TimeWindow;

    fn query() -> CalendarQuery {
        CalendarQuery::new(
            TimeWindow::new(
                Utc.with_ymd_and_hms(2025, 8, 10, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 8, 17, 0, 0, 0).unwrap(),
            ),
            "UTC",
        )
    }

    fn events(count: usize) -> Vec<RawEvent> {
        (0..count)
            .map(|i| {
                RawEvent::new(
                    RawDateTime::new("2025-08-12T09:00:00"),
                    RawDateTime::new("2025-08-12T10:00:00"),
                )
                .with_subject(format!("{i}"))
            })
            .collect()
    }

    mod memory_source {
        use super::*;

        #[tokio::test]
        async fn pages_by_query_size() {
            let source = MemorySource::new(events(60));
            let q = query();

            let first = source.fetch_page(&q, None).await.unwrap();
            assert_eq!(first.events.len(), 50);
            let cursor = first.next.unwrap();
            assert_eq!(cursor.as_str(), "offset:50");

            let second = source.fetch_page(&q, Some(&cursor)).await.unwrap();
            assert_eq!(second.events.len(), 10);
            assert!(second.next.is_none());
            assert_eq!(source.requests(), 2);
        }

        #[tokio::test]
        async fn exact_multiple_has_no_trailing_page() {
            let source = MemorySource::new(events(50));
            let page = source.fetch_page(&query(), None).await.unwrap();
            assert_eq!(page.events.len(), 50);
            assert!(page.next.is_none());
        }

        #[tokio::test]
        async fn rejects_foreign_cursor() {
            let source = MemorySource::new(events(3)).with_name("fixture");
            let cursor = PageCursor::new("https://example.com/next");

            let err = source.fetch_page(&query(), Some(&cursor)).await.unwrap_err();

            assert_eq!(err.source_name(), Some("fixture"));
            assert!(!err.is_retryable());
        }
    }

    mod scripted_source {
        use super::*;

        #[tokio::test]
        async fn replays_then_runs_dry() {
            let source = ScriptedSource::new(vec![Ok(EventPage::last(events(1)))]);
            let q = query();

            assert_eq!(source.fetch_page(&q, None).await.unwrap().events.len(), 1);
            let err = source.fetch_page(&q, None).await.unwrap_err();
            assert_eq!(err.source_name(), Some("scripted"));
            assert_eq!(source.requests(), 2);
        }
    }
}
