//! Graph `calendarView` response bodies and status classification.

use serde::Deserialize;

use crate::error::{EventSourceError, EventSourceResult};
use crate::raw_event::{RawDateTime, RawEvent};
use crate::source::{EventPage, PageCursor};

/// Longest slice of an unparsable error body quoted in a message.
const MAX_BODY_EXCERPT: usize = 200;

/// Response from `GET /me/calendarView`.
#[derive(Debug, Deserialize)]
struct CalendarViewResponse {
    #[serde(default)]
    value: Vec<GraphEvent>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

/// A single event, restricted to the selected fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphEvent {
    subject: Option<String>,
    organizer: Option<GraphRecipient>,
    start: Option<GraphDateTime>,
    end: Option<GraphDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphRecipient {
    email_address: Option<GraphEmailAddress>,
}

#[derive(Debug, Deserialize)]
struct GraphEmailAddress {
    name: Option<String>,
}

/// `dateTimeTimeZone` resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDateTime {
    date_time: Option<String>,
    time_zone: Option<String>,
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl GraphDateTime {
    /// A boundary without `dateTime` counts as absent.
    fn into_raw(self) -> Option<RawDateTime> {
        Some(RawDateTime {
            date_time: self.date_time?,
            time_zone: self.time_zone,
        })
    }
}

impl From<GraphEvent> for RawEvent {
    fn from(event: GraphEvent) -> Self {
        Self {
            subject: event.subject,
            organizer: event
                .organizer
                .and_then(|o| o.email_address)
                .and_then(|a| a.name),
            start: event.start.and_then(GraphDateTime::into_raw),
            end: event.end.and_then(GraphDateTime::into_raw),
        }
    }
}

/// Parses a successful page body.
pub(crate) fn parse_page(body: &str) -> EventSourceResult<EventPage> {
    let response: CalendarViewResponse = serde_json::from_str(body).map_err(|e| {
        EventSourceError::invalid_response(format!("failed to parse calendar view: {}", e))
            .with_cause(e)
    })?;

    Ok(EventPage {
        events: response.value.into_iter().map(RawEvent::from).collect(),
        next: response
            .next_link
            .filter(|link| !link.is_empty())
            .map(PageCursor::new),
    })
}

/// Maps a non-success status and its body to an error.
///
/// The Graph error message, when present, becomes the diagnostic text.
pub(crate) fn classify_status(
    status: u16,
    body: &str,
    retry_after: Option<u64>,
) -> EventSourceError {
    let detail = error_detail(body);
    let message = format!("calendar view request failed ({}): {}", status, detail);

    match status {
        401 => EventSourceError::unauthorized(message),
        403 => EventSourceError::forbidden(message),
        408 => EventSourceError::timeout(message),
        429 => EventSourceError::throttled(match retry_after {
            Some(secs) => format!("{}, retry after {} seconds", message, secs),
            None => message,
        }),
        502..=504 => EventSourceError::unavailable(message),
        500..=599 => EventSourceError::server(message),
        400..=499 => EventSourceError::bad_request(message),
        _ => EventSourceError::invalid_response(message),
    }
}

fn error_detail(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<GraphErrorResponse>(body) {
        let GraphErrorBody { code, message } = envelope.error;
        return match (code, message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message,
            (Some(code), None) => code,
            (None, None) => "no error details".to_string(),
        };
    }

    let body = body.trim();
    if body.is_empty() {
        return "empty response body".to_string();
    }
    body.chars().take(MAX_BODY_EXCERPT).collect()
}
