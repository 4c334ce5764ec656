//! EventSource trait definition.
//!
//! An [`EventSource`] is a remote, time-ordered, cursor-paginated query API.
//! It answers one question: "give me the next page for this query after this
//! cursor". Draining all pages is the job of [`drain`](crate::drain).

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use weekview_core::TimeWindow;

use crate::error::EventSourceResult;
use crate::raw_event::RawEvent;

/// Largest page a feed is asked for.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Fields requested from the feed.
pub const SELECT_FIELDS: [&str; 4] = ["subject", "organizer", "start", "end"];

/// A boxed future for async trait methods.
///
/// Using boxed futures keeps the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sort order of the returned events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventOrder {
    /// Ascending by start time.
    #[default]
    StartAscending,
}

/// The query sent for every page of one drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarQuery {
    /// The absolute range to list events for.
    pub window: TimeWindow,
    /// Zone the feed should express wall-clock times in.
    pub preferred_timezone: String,
    /// Requested page size, between 1 and [`MAX_PAGE_SIZE`].
    pub page_size: u32,
    pub select: &'static [&'static str],
    pub order: EventOrder,
}

impl CalendarQuery {
    /// Creates a query with the maximum page size and the standard field list.
    pub fn new(window: TimeWindow, preferred_timezone: impl Into<String>) -> Self {
        Self {
            window,
            preferred_timezone: preferred_timezone.into(),
            page_size: MAX_PAGE_SIZE,
            select: &SELECT_FIELDS,
            order: EventOrder::StartAscending,
        }
    }

    /// Builder method to set the page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// An opaque continuation token handed out by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPage {
    /// Events in the order the feed returned them.
    pub events: Vec<RawEvent>,
    /// Present when more pages follow.
    pub next: Option<PageCursor>,
}

impl EventPage {
    /// A final page.
    pub fn last(events: Vec<RawEvent>) -> Self {
        Self { events, next: None }
    }

    /// A page followed by more.
    pub fn with_next(events: Vec<RawEvent>, next: PageCursor) -> Self {
        Self {
            events,
            next: Some(next),
        }
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// A paginated, time-ordered event feed.
///
/// # Implementation Notes
///
/// - Implementations should be `Send + Sync` for use in async contexts
/// - A page must hold at most `query.page_size` events
/// - A cursor must carry everything needed to continue the same query,
///   including the preferred zone
/// - Timeouts are the transport's concern
pub trait EventSource: Send + Sync {
    /// Returns the name of this source (e.g. "graph").
    fn name(&self) -> &str;

    /// Fetches one page: the first when `cursor` is `None`, otherwise the
    /// page the cursor points at.
    ///
    /// # Errors
    ///
    /// Returns [`EventSourceError`](crate::EventSourceError) on transport,
    /// authentication or feed failures.
    fn fetch_page<'a>(
        &'a self,
        query: &'a CalendarQuery,
        cursor: Option<&'a PageCursor>,
    ) -> BoxFuture<'a, EventSourceResult<EventPage>>;
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_page<'a>(
        &'a self,
        query: &'a CalendarQuery,
        cursor: Option<&'a PageCursor>,
    ) -> BoxFuture<'a, EventSourceResult<EventPage>> {
        (**self).fetch_page(query, cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 8, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 8, 17, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn query_defaults() {
        let query = CalendarQuery::new(window(), "UTC");
        assert_eq!(query.page_size, 50);
        assert_eq!(query.select, &["subject", "organizer", "start", "end"]);
        assert_eq!(query.order, EventOrder::StartAscending);
        assert_eq!(query.preferred_timezone, "UTC");
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(CalendarQuery::new(window(), "UTC").with_page_size(500).page_size, 50);
        assert_eq!(CalendarQuery::new(window(), "UTC").with_page_size(0).page_size, 1);
        assert_eq!(CalendarQuery::new(window(), "UTC").with_page_size(10).page_size, 10);
    }

    #[test]
    fn page_constructors() {
        let page = EventPage::with_next(vec![], PageCursor::new("abc"));
        assert!(page.has_more());
        assert_eq!(page.next.as_ref().map(PageCursor::as_str), Some("abc"));
        assert!(!EventPage::last(vec![]).has_more());
    }
}
