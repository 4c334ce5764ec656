//! Display-ready calendar events.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// An event as shown in the week view.
///
/// Times are wall-clock values in the viewer's zone. Both are always
/// present; no ordering between them is enforced, so a feed that reports an
/// end before the start is passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayEvent {
    subject: String,
    organizer: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DisplayEvent {
    /// Creates a new display event.
    pub fn new(
        subject: impl Into<String>,
        organizer: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            subject: subject.into(),
            organizer: organizer.into(),
            start,
            end,
        }
    }

    /// The event subject, empty when the feed had none.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The organizer's display name, empty when the feed had none.
    pub fn organizer(&self) -> &str {
        &self.organizer
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Weekday the event starts on.
    pub fn start_weekday(&self) -> Weekday {
        self.start.weekday()
    }

    /// Weekday the event ends on.
    pub fn end_weekday(&self) -> Weekday {
        self.end.weekday()
    }

    /// Returns true if start and end fall on different calendar dates.
    pub fn spans_days(&self) -> bool {
        self.start.date() != self.end.date()
    }

    /// Returns true if the feed reported an end earlier than the start.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Checks if the event starts on the given date.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start.date() == date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn accessors() {
        let event = DisplayEvent::new("Standup", "Ada", at(12, 9, 0), at(12, 9, 15));
        assert_eq!(event.subject(), "Standup");
        assert_eq!(event.organizer(), "Ada");
        assert_eq!(event.start(), at(12, 9, 0));
        assert_eq!(event.end(), at(12, 9, 15));
        assert_eq!(event.start_weekday(), Weekday::Tue);
        assert!(!event.spans_days());
        assert!(!event.is_reversed());
        assert!(event.starts_on(NaiveDate::from_ymd_opt(2025, 8, 12).unwrap()));
    }

    #[test]
    fn multi_day() {
        let event = DisplayEvent::new("Offsite", "", at(11, 9, 0), at(13, 17, 0));
        assert!(event.spans_days());
        assert_eq!(event.start_weekday(), Weekday::Mon);
        assert_eq!(event.end_weekday(), Weekday::Wed);
    }

    #[test]
    fn reversed_times_are_kept() {
        let event = DisplayEvent::new("Broken", "", at(12, 10, 0), at(12, 9, 0));
        assert!(event.is_reversed());
        assert_eq!(event.start(), at(12, 10, 0));
        assert_eq!(event.end(), at(12, 9, 0));
    }

    #[test]
    fn serde_roundtrip() {
        let event = DisplayEvent::new("Review", "Grace", at(14, 15, 0), at(14, 16, 0));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: DisplayEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
