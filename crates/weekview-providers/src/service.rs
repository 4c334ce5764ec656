//! Building the week view for one request.
//!
//! ```text
//! resolve_timezone ─▶ compute_week_window ─▶ drain ─▶ normalize_events ─▶ CalendarView
//! ```
//!
//! Recoverable failures are caught here and only here: the caller receives
//! an empty week plus an error [`Alert`]. An authentication challenge is the
//! one failure handed back as an error, so the caller can send the user
//! through sign-in again.

use chrono::NaiveDate;
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{info, warn};
use weekview_core::{Alert, CalendarView, WeekWindow, compute_week_window, resolve_timezone};

use crate::error::{EventSourceError, MalformedEventError};
use crate::normalize::normalize_events;
use crate::pager::drain;
use crate::source::{CalendarQuery, EventSource};

/// Notice shown when the feed fails.
pub const FEED_ERROR_MESSAGE: &str = "Error getting calendar view";

/// Notice shown when the feed returns a record that cannot be displayed.
pub const MALFORMED_EVENT_MESSAGE: &str = "Could not load calendar";

/// The user has to sign in again before the week can be shown.
#[derive(Debug, Error)]
#[error("re-authentication required: {cause}")]
pub struct ReauthenticationRequired {
    #[source]
    cause: EventSourceError,
}

impl ReauthenticationRequired {
    /// The feed error that triggered the challenge, unmodified.
    pub fn cause(&self) -> &EventSourceError {
        &self.cause
    }

    pub fn into_cause(self) -> EventSourceError {
        self.cause
    }
}

/// Why a build could not produce events.
#[derive(Debug, Error)]
enum BuildError {
    #[error(transparent)]
    Source(#[from] EventSourceError),

    #[error(transparent)]
    Malformed(#[from] MalformedEventError),
}

/// What the presentation layer renders: the week and an optional notice.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CalendarPage {
    pub view: CalendarView,
    pub alert: Option<Alert>,
}

impl CalendarPage {
    pub fn new(view: CalendarView) -> Self {
        Self { view, alert: None }
    }

    /// An empty week with an error notice.
    pub fn failed(window: WeekWindow, alert: Alert) -> Self {
        Self {
            view: CalendarView::empty(window),
            alert: Some(alert),
        }
    }
}

/// Builds the Sunday-start week containing `today`.
///
/// `timezone_preference` may be absent, blank or unknown; all of those mean
/// UTC.
///
/// # Errors
///
/// Returns [`ReauthenticationRequired`] when the feed demands a new sign-in.
/// Every other failure produces `Ok` with an empty week and an error alert.
pub async fn build_week_view<S>(
    source: &S,
    today: NaiveDate,
    timezone_preference: Option<&str>,
) -> Result<CalendarPage, ReauthenticationRequired>
where
    S: EventSource + ?Sized,
{
    let tz = resolve_timezone(timezone_preference);
    let window = compute_week_window(today, &tz);

    match load_week(source, &window, &tz).await {
        Ok(view) => {
            info!(
                source = source.name(),
                timezone = tz.name(),
                week = %view.week_label(),
                events = view.events().len(),
                "built week view"
            );
            Ok(CalendarPage::new(view))
        }
        Err(BuildError::Source(cause)) if cause.is_auth_challenge() => {
            info!(source = source.name(), "event feed requires sign-in");
            Err(ReauthenticationRequired { cause })
        }
        Err(BuildError::Source(error)) => {
            warn!(source = source.name(), error = %error, "showing empty week after feed failure");
            let alert = Alert::error(FEED_ERROR_MESSAGE).with_debug(error.to_string());
            Ok(CalendarPage::failed(window, alert))
        }
        Err(BuildError::Malformed(error)) => {
            warn!(source = source.name(), error = %error, "showing empty week after malformed event");
            let alert = Alert::error(MALFORMED_EVENT_MESSAGE).with_debug(error.to_string());
            Ok(CalendarPage::failed(window, alert))
        }
    }
}

async fn load_week<S>(source: &S, window: &WeekWindow, tz: &Tz) -> Result<CalendarView, BuildError>
where
    S: EventSource + ?Sized,
{
    let query = CalendarQuery::new(*window.utc(), tz.name());

    let records = drain(source, &query).await.map_err(|e| {
        if !e.partial.is_empty() {
            warn!(
                pages = e.pages_fetched,
                records = e.partial.len(),
                "discarding partially drained events"
            );
        }
        e.into_source_error()
    })?;

    let events = normalize_events(&records, tz)?;
    Ok(CalendarView::new(*window, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySource, ScriptedSource};
    use crate::raw_event::{RawDateTime, RawEvent};
    use crate::source::{EventPage, PageCursor};
    use chrono::{NaiveDateTime, TimeZone, Utc, Weekday};
    use weekview_core::AlertLevel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn local(m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(2025, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn raw(subject: &str, start: &str, end: &str) -> RawEvent {
        RawEvent::new(
            RawDateTime::new(start).with_time_zone("UTC"),
            RawDateTime::new(end).with_time_zone("UTC"),
        )
        .with_subject(subject)
        .with_organizer("Ada")
    }

    fn listed_on(page: &CalendarPage, subject: &str) -> Vec<Weekday> {
        page.view
            .days()
            .iter()
            .filter(|day| day.events.iter().any(|e| e.subject() == subject))
            .map(|day| day.weekday)
            .collect()
    }

    mod happy_path {
        use super::*;

        #[tokio::test]
        async fn tuesday_meeting_in_utc_week() {
            let source = MemorySource::new(vec![raw(
                "Sync",
                "2025-08-12T09:00:00.0000000",
                "2025-08-12T10:00:00.0000000",
            )]);

            let page = build_week_view(&source, date(2025, 8, 13), None).await.unwrap();

            assert!(page.alert.is_none());
            let utc = page.view.window().utc();
            assert_eq!(utc.start(), Utc.with_ymd_and_hms(2025, 8, 10, 0, 0, 0).unwrap());
            assert_eq!(utc.end(), Utc.with_ymd_and_hms(2025, 8, 17, 0, 0, 0).unwrap());
            assert_eq!(listed_on(&page, "Sync"), vec![Weekday::Tue]);
            assert_eq!(page.view.day(Weekday::Tue).len(), 1);
            assert_eq!(page.view.week_label(), "August 10, 2025 - August 16, 2025");
        }

        #[tokio::test]
        async fn null_preference_means_utc() {
            let source = MemorySource::new(Vec::new());

            let page = build_week_view(&source, date(2025, 8, 13), None).await.unwrap();

            let window = page.view.window();
            assert_eq!(window.timezone(), Tz::UTC);
            assert_eq!(window.local().start, local(8, 10, 0, 0));
            assert_eq!(window.local().end, local(8, 17, 0, 0));
        }

        #[tokio::test]
        async fn unknown_preference_means_utc() {
            let source = MemorySource::new(Vec::new());
            let page = build_week_view(&source, date(2025, 8, 13), Some("Mars/Olympus_Mons"))
                .await
                .unwrap();
            assert_eq!(page.view.window().timezone(), Tz::UTC);
            assert!(page.alert.is_none());
        }

        #[tokio::test]
        async fn query_uses_resolved_zone_and_utc_window() {
            let source = MemorySource::new(Vec::new());

            build_week_view(&source, date(2025, 8, 13), Some("Pacific Standard Time"))
                .await
                .unwrap();

            let queries = source.seen_queries();
            assert_eq!(queries.len(), 1);
            assert_eq!(queries[0].preferred_timezone, "America/Los_Angeles");
            assert_eq!(
                queries[0].window.start(),
                Utc.with_ymd_and_hms(2025, 8, 10, 7, 0, 0).unwrap()
            );
            assert_eq!(queries[0].page_size, 50);
        }

        #[tokio::test]
        async fn utc_stamped_event_shown_in_viewer_zone() {
            let source = MemorySource::new(vec![raw(
                "Late call",
                "2025-08-12T23:30:00Z",
                "2025-08-13T00:30:00Z",
            )]);

            let page = build_week_view(&source, date(2025, 8, 13), Some("Asia/Tokyo"))
                .await
                .unwrap();

            let event = &page.view.events()[0];
            assert_eq!(event.start(), local(8, 13, 8, 30));
            assert_eq!(event.end(), local(8, 13, 9, 30));
            assert_eq!(listed_on(&page, "Late call"), vec![Weekday::Wed]);
        }

        #[tokio::test]
        async fn multi_page_feed_keeps_order() {
            let events: Vec<RawEvent> = (0..120)
                .map(|i| {
                    raw(
                        &format!("e{i:03}"),
                        "2025-08-14T08:00:00",
                        "2025-08-14T08:30:00",
                    )
                })
                .collect();
            let source = MemorySource::new(events);

            let page = build_week_view(&source, date(2025, 8, 14), Some("UTC"))
                .await
                .unwrap();

            assert_eq!(source.requests(), 3);
            let thursday = page.view.day(Weekday::Thu);
            assert_eq!(thursday.len(), 120);
            assert_eq!(thursday.events[0].subject(), "e000");
            assert_eq!(thursday.events[119].subject(), "e119");
        }

        #[tokio::test]
        async fn boundary_events_land_where_expected() {
            let source = MemorySource::new(vec![
                raw("before", "2025-08-08T09:00:00", "2025-08-09T10:00:00"),
                raw("offsite", "2025-08-11T09:00:00", "2025-08-13T17:00:00"),
                raw("carry-in", "2025-08-09T22:00:00", "2025-08-10T01:00:00"),
                raw("after", "2025-08-17T00:00:00", "2025-08-17T01:00:00"),
            ]);

            let page = build_week_view(&source, date(2025, 8, 10), None).await.unwrap();

            assert!(listed_on(&page, "before").is_empty());
            assert!(listed_on(&page, "after").is_empty());
            assert_eq!(listed_on(&page, "offsite"), vec![Weekday::Mon, Weekday::Wed]);
            assert_eq!(listed_on(&page, "carry-in"), vec![Weekday::Sun]);
            assert_eq!(page.view.events().len(), 4);
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn auth_challenge_is_propagated() {
            let source = ScriptedSource::new(vec![Err(EventSourceError::unauthorized(
                "InvalidAuthenticationToken",
            ))]);

            let err = build_week_view(&source, date(2025, 8, 13), None)
                .await
                .unwrap_err();

            assert!(err.cause().is_auth_challenge());
            assert!(err.cause().message().contains("InvalidAuthenticationToken"));
        }

        #[tokio::test]
        async fn auth_challenge_mid_drain_is_propagated() {
            let source = ScriptedSource::new(vec![
                Ok(EventPage::with_next(
                    vec![raw("one", "2025-08-12T09:00:00", "2025-08-12T10:00:00")],
                    PageCursor::new("p2"),
                )),
                Err(EventSourceError::unauthorized("expired")),
            ]);

            assert!(build_week_view(&source, date(2025, 8, 13), None).await.is_err());
        }

        #[tokio::test]
        async fn transient_failure_yields_empty_week_and_alert() {
            let source = ScriptedSource::new(vec![
                Ok(EventPage::with_next(
                    vec![raw("one", "2025-08-12T09:00:00", "2025-08-12T10:00:00")],
                    PageCursor::new("p2"),
                )),
                Err(EventSourceError::unavailable("503 Service Unavailable")),
            ]);

            let page = build_week_view(&source, date(2025, 8, 13), Some("Europe/Paris"))
                .await
                .unwrap();

            assert!(page.view.is_empty());
            assert_eq!(page.view.window().timezone(), chrono_tz::Europe::Paris);
            assert_eq!(page.view.window().start_date(), date(2025, 8, 10));
            let alert = page.alert.unwrap();
            assert_eq!(alert.level, AlertLevel::Danger);
            assert_eq!(alert.message, FEED_ERROR_MESSAGE);
            assert!(alert.debug_info.unwrap().contains("503 Service Unavailable"));
        }

        #[tokio::test]
        async fn other_failure_yields_alert() {
            let source = ScriptedSource::new(vec![Err(EventSourceError::forbidden(
                "ErrorAccessDenied",
            ))]);

            let page = build_week_view(&source, date(2025, 8, 13), None).await.unwrap();

            assert!(page.view.is_empty());
            assert_eq!(page.alert.unwrap().message, FEED_ERROR_MESSAGE);
        }

        #[tokio::test]
        async fn malformed_event_aborts_whole_week() {
            let source = MemorySource::new(vec![
                raw("fine", "2025-08-12T09:00:00", "2025-08-12T10:00:00"),
                raw("broken", "2025-08-12T11:00:00", "2025-08-12T12:00:00").with_end(None),
            ]);

            let page = build_week_view(&source, date(2025, 8, 13), None).await.unwrap();

            assert!(page.view.is_empty());
            let alert = page.alert.unwrap();
            assert_eq!(alert.message, MALFORMED_EVENT_MESSAGE);
            let debug = alert.debug_info.unwrap();
            assert!(debug.contains("#1"));
            assert!(debug.contains("end time is missing"));
        }
    }

    #[test]
    fn page_serializes_view_and_alert() {
        let window = compute_week_window(date(2025, 8, 13), &Tz::UTC);
        let page = CalendarPage::failed(window, Alert::error(FEED_ERROR_MESSAGE));

        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["view"]["label"], "August 10, 2025 - August 16, 2025");
        assert_eq!(json["alert"]["level"], "danger");
    }
}
