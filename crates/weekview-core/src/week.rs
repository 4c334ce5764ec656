//! Week bucketing and the assembled calendar view.
//!
//! A [`CalendarView`] owns the week's events once. Each [`DayView`] is a
//! borrowed, filtered projection over that list, computed a single time per
//! view by [`bucket`].
//!
//! # Membership
//!
//! An event is listed under weekday `D` when it ends after the week starts
//! and either
//! - it starts on `D` inside the week, or
//! - it ends on `D` before the week ends.
//!
//! Days strictly between the start day and the end day of a multi-day event
//! do not list it, so one event shows up at most twice.

use chrono::{Duration, NaiveDate, Weekday};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::event::DisplayEvent;
use crate::time::{LocalWindow, WeekWindow};

/// The seven weekdays in display order.
pub const WEEK_DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Date format used by the week label, e.g. "August 10, 2025".
const LABEL_DATE_FORMAT: &str = "%B %-d, %Y";

/// Checks whether `event` belongs under `day` for the given local window.
pub fn is_on_day(event: &DisplayEvent, day: Weekday, window: &LocalWindow) -> bool {
    if event.end() <= window.start {
        return false;
    }

    let starts_here = event.start_weekday() == day && window.contains(event.start());
    let ends_here = event.end_weekday() == day && event.end() < window.end;

    starts_here || ends_here
}

/// Partitions `events` into seven day buckets, Sunday first.
///
/// Each bucket holds indexes into `events`, in input order. Nothing is
/// re-sorted: the feed already delivers events by ascending start time.
pub fn bucket(events: &[DisplayEvent], window: &LocalWindow) -> [Vec<usize>; 7] {
    std::array::from_fn(|i| {
        let day = WEEK_DAYS[i];
        events
            .iter()
            .enumerate()
            .filter(|(_, event)| is_on_day(event, day, window))
            .map(|(index, _)| index)
            .collect()
    })
}

/// Formats the human-readable label of a week starting on `start`.
pub fn week_label(start: NaiveDate) -> String {
    let last = start + Duration::days(6);
    format!(
        "{} - {}",
        start.format(LABEL_DATE_FORMAT),
        last.format(LABEL_DATE_FORMAT)
    )
}

/// One day of the week view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DayView<'a> {
    /// Local calendar date of this day.
    pub date: NaiveDate,
    /// Weekday of this day.
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    /// Events listed under this day, in feed order.
    pub events: Vec<&'a DisplayEvent>,
}

impl DayView<'_> {
    /// Returns true if nothing is listed under this day.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events listed under this day.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

fn serialize_weekday<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*weekday))
}

/// Full English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// The assembled week: its window plus the events bucketed per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    window: WeekWindow,
    events: Vec<DisplayEvent>,
    buckets: [Vec<usize>; 7],
}

impl CalendarView {
    /// Builds the view, bucketing `events` against the window's local bounds.
    pub fn new(window: WeekWindow, events: Vec<DisplayEvent>) -> Self {
        let buckets = bucket(&events, window.local());
        Self {
            window,
            events,
            buckets,
        }
    }

    /// A week with no events, shown alongside an error notice.
    pub fn empty(window: WeekWindow) -> Self {
        Self::new(window, Vec::new())
    }

    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    /// All events of the week in feed order, including ones no day lists.
    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    /// Returns true if the week holds no events at all.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The view of one weekday.
    pub fn day(&self, weekday: Weekday) -> DayView<'_> {
        let index = weekday.num_days_from_sunday() as usize;
        DayView {
            date: self.window.start_date() + Duration::days(index as i64),
            weekday,
            events: self.buckets[index]
                .iter()
                .map(|&i| &self.events[i])
                .collect(),
        }
    }

    /// The seven day views, Sunday first.
    pub fn days(&self) -> [DayView<'_>; 7] {
        WEEK_DAYS.map(|weekday| self.day(weekday))
    }

    /// Label such as "August 10, 2025 - August 16, 2025".
    pub fn week_label(&self) -> String {
        week_label(self.window.start_date())
    }
}

impl Serialize for CalendarView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let local = self.window.local();
        let mut state = serializer.serialize_struct("CalendarView", 5)?;
        state.serialize_field("label", &self.week_label())?;
        state.serialize_field("timezone", self.window.timezone().name())?;
        state.serialize_field("start", &local.start)?;
        state.serialize_field("end", &local.end)?;
        state.serialize_field("days", &self.days())?;
        state.end()
    }
}
