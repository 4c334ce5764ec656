//! RawEvent to DisplayEvent conversion.
//!
//! Normalization validates that both boundaries are present and parsable and
//! turns them into wall-clock values. Text fields default to the empty string.
//!
//! Accepted timestamp shapes:
//! - naive ISO 8601, optionally with a fraction of any precision
//!   (`2025-08-12T09:00:00.0000000`), taken as-is
//! - RFC 3339 with an offset (`2025-08-12T09:00:00Z`), an absolute instant
//!   projected into the viewer's zone whatever the record's label says
//! - a bare date (`2025-08-12`), taken as local midnight

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use weekview_core::DisplayEvent;

use crate::error::{MalformedEventError, TimeField};
use crate::raw_event::{RawDateTime, RawEvent};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Converts a [`RawEvent`] to a [`DisplayEvent`] in the viewer's zone `tz`.
///
/// # Errors
///
/// Returns [`MalformedEventError`] if the start or end is absent or cannot
/// be parsed. The error carries no index; use [`normalize_events`] to get
/// positions.
pub fn normalize_event(raw: &RawEvent, tz: &Tz) -> Result<DisplayEvent, MalformedEventError> {
    let start = parse_boundary(raw.start.as_ref(), TimeField::Start, tz)?;
    let end = parse_boundary(raw.end.as_ref(), TimeField::End, tz)?;

    Ok(DisplayEvent::new(
        raw.subject.clone().unwrap_or_default(),
        raw.organizer.clone().unwrap_or_default(),
        start,
        end,
    ))
}

/// Normalizes a drained sequence, preserving order.
///
/// Stops at the first malformed record; the error carries its index.
pub fn normalize_events(
    raw_events: &[RawEvent],
    tz: &Tz,
) -> Result<Vec<DisplayEvent>, MalformedEventError> {
    raw_events
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_event(raw, tz).map_err(|e| e.at_index(index)))
        .collect()
}

fn parse_boundary(
    raw: Option<&RawDateTime>,
    field: TimeField,
    tz: &Tz,
) -> Result<NaiveDateTime, MalformedEventError> {
    let raw = raw.ok_or(MalformedEventError::MissingTime { index: None, field })?;

    parse_wall_clock(raw.date_time.trim(), tz).ok_or_else(|| {
        MalformedEventError::UnparsableTime {
            index: None,
            field,
            value: raw.date_time.clone(),
        }
    })
}

/// Parses one timestamp into a wall-clock value in `tz`.
///
/// Naive values already are wall-clock in the preferred zone: a feed that
/// honors the preference sends them that way.
fn parse_wall_clock(value: &str, tz: &Tz) -> Option<NaiveDateTime> {
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(tz).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
