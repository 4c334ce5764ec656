//! Time types for the week view.
//!
//! This module provides [`TimeWindow`] for absolute UTC query ranges,
//! [`LocalWindow`] for the same range expressed as wall-clock time in the
//! viewer's zone, and [`WeekWindow`] which ties the two together with the
//! zone needed to project between them.
//!
//! The week always starts on Sunday. Both boundaries are anchored to local
//! midnight independently, so a week containing a daylight-saving transition
//! is 167 or 169 hours long but always exactly seven calendar days.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Number of days in the displayed week.
pub const DAYS_IN_WEEK: i64 = 7;

/// A time window for querying calendar events.
///
/// Represents a half-open interval `[start, end)` in UTC. The fields are
/// private so a window cannot be bent out of shape after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Unchecked wire shape of a [`TimeWindow`].
#[derive(Deserialize)]
struct WindowBounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<WindowBounds> for TimeWindow {
    type Error = String;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        Self::try_new(bounds.start, bounds.end).ok_or_else(|| {
            format!(
                "window start {} is not before end {}",
                bounds.start, bounds.end
            )
        })
    }
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not strictly before `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start < end, "TimeWindow start must be < end");
        Self { start, end }
    }

    /// Creates a time window, returning `None` unless `start < end`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Start of the window (inclusive).
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window (exclusive).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }
}

/// A half-open wall-clock interval `[start, end)` in the viewer's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalWindow {
    /// Start of the window (inclusive).
    pub start: NaiveDateTime,
    /// End of the window (exclusive).
    pub end: NaiveDateTime,
}

impl LocalWindow {
    /// Projects a UTC window into the given zone.
    pub fn project(window: &TimeWindow, tz: &Tz) -> Self {
        Self {
            start: window.start().with_timezone(tz).naive_local(),
            end: window.end().with_timezone(tz).naive_local(),
        }
    }

    /// Checks if a wall-clock datetime falls within this window.
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        self.start <= dt && dt < self.end
    }

    /// The calendar date the window starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// The bounds of one displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    utc: TimeWindow,
    local: LocalWindow,
    timezone: Tz,
}

impl WeekWindow {
    /// The absolute bounds, as sent to the event feed.
    pub fn utc(&self) -> &TimeWindow {
        &self.utc
    }

    /// The same bounds as wall-clock time in [`WeekWindow::timezone`].
    pub fn local(&self) -> &LocalWindow {
        &self.local
    }

    /// The zone the week was computed in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The local date of the first day (always a Sunday).
    pub fn start_date(&self) -> NaiveDate {
        self.local.start_date()
    }

    /// Dates of the seven days, Sunday first.
    pub fn dates(&self) -> [NaiveDate; 7] {
        let first = self.start_date();
        std::array::from_fn(|i| first + Duration::days(i as i64))
    }
}

/// Returns the Sunday on or before `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    // 0 = Sunday, so the offset is in [-6, 0].
    let offset_days = -i64::from(today.weekday().num_days_from_sunday());
    today + Duration::days(offset_days)
}

/// Computes the Sunday-start week enclosing `today` in `tz`.
///
/// `today` is treated as an unanchored calendar date. The start is the
/// zone's local midnight of the preceding (or same) Sunday and the end is
/// local midnight seven calendar days later, each converted to UTC on its own.
pub fn compute_week_window(today: NaiveDate, tz: &Tz) -> WeekWindow {
    let first = start_of_week(today);
    let start = local_midnight_to_utc(first, tz);
    let end = local_midnight_to_utc(first + Duration::days(DAYS_IN_WEEK), tz);
    let utc = TimeWindow::new(start, end);

    WeekWindow {
        utc,
        local: LocalWindow::project(&utc, tz),
        timezone: *tz,
    }
}

/// Converts local midnight of `date` in `tz` to a UTC instant.
///
/// An ambiguous midnight resolves to the earlier instant. When midnight does
/// not exist (a spring-forward gap starting at 00:00) the first valid local
/// time after it is used.
pub fn local_midnight_to_utc(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&midnight).earliest() {
        return dt.with_timezone(&Utc);
    }

    // Gaps are at most a few hours, so step forward by quarter hours.
    (1..=96)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
