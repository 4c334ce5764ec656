//! Raw event records as delivered by an event feed.
//!
//! A [`RawEvent`] is transport-agnostic and keeps every field optional: the
//! feed may omit anything, and deciding what is required is the job of
//! [`normalize_event`](crate::normalize_event).

use serde::{Deserialize, Serialize};

/// A wall-clock timestamp paired with the label of the zone it is in.
///
/// `date_time` is kept as received. Feeds that honor a preferred zone send
/// naive values such as `2025-08-12T09:00:00.0000000` already expressed in
/// that zone; others send RFC 3339 values with an explicit offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDateTime {
    pub date_time: String,
    pub time_zone: Option<String>,
}

impl RawDateTime {
    /// Creates a timestamp with no zone label.
    pub fn new(date_time: impl Into<String>) -> Self {
        Self {
            date_time: date_time.into(),
            time_zone: None,
        }
    }

    /// Builder method to set the zone label.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

/// A raw calendar event from a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub subject: Option<String>,
    /// The organizer's display name.
    pub organizer: Option<String>,
    pub start: Option<RawDateTime>,
    pub end: Option<RawDateTime>,
}

impl RawEvent {
    /// Creates an event with the given start and end and nothing else.
    pub fn new(start: RawDateTime, end: RawDateTime) -> Self {
        Self {
            subject: None,
            organizer: None,
            start: Some(start),
            end: Some(end),
        }
    }

    /// Builder method to set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Builder method to set the organizer name.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    /// Builder method to replace the start.
    pub fn with_start(mut self, start: Option<RawDateTime>) -> Self {
        self.start = start;
        self
    }

    /// Builder method to replace the end.
    pub fn with_end(mut self, end: Option<RawDateTime>) -> Self {
        self.end = end;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let event = RawEvent::new(
            RawDateTime::new("2025-08-12T09:00:00.0000000").with_time_zone("UTC"),
            RawDateTime::new("2025-08-12T10:00:00.0000000").with_time_zone("UTC"),
        )
        .with_subject("Planning")
        .with_organizer("Ada");

        assert_eq!(event.subject.as_deref(), Some("Planning"));
        assert_eq!(event.organizer.as_deref(), Some("Ada"));
        assert_eq!(
            event.start.as_ref().and_then(|s| s.time_zone.as_deref()),
            Some("UTC")
        );
    }

    #[test]
    fn default_is_empty() {
        let event = RawEvent::default();
        assert!(event.subject.is_none());
        assert!(event.start.is_none());
        assert!(event.end.is_none());
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let event: RawEvent = serde_json::from_str(r#"{"subject": "Lunch"}"#).unwrap();
        assert_eq!(event.subject.as_deref(), Some("Lunch"));
        assert!(event.organizer.is_none());
        assert!(event.start.is_none());
    }
}
