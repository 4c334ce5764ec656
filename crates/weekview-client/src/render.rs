//! Terminal and JSON rendering of a calendar page.

use chrono::{Datelike, NaiveDateTime, Weekday};
use weekview_core::week::weekday_name;
use weekview_core::{DisplayEvent, TimeFormat};
use weekview_providers::CalendarPage;

/// Shown in place of an empty subject.
const NO_SUBJECT: &str = "(no subject)";

/// Shown under a day with no events.
const NO_EVENTS: &str = "No events";

/// Renders a [`CalendarPage`] for the terminal.
#[derive(Debug, Clone, Default)]
pub struct WeekRenderer {
    time_format: TimeFormat,
    heading: Option<String>,
}

impl WeekRenderer {
    pub fn new(time_format: TimeFormat) -> Self {
        Self {
            time_format,
            heading: None,
        }
    }

    /// Prints `heading` above the week label, e.g. the user's name.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        let heading = heading.into();
        self.heading = (!heading.trim().is_empty()).then_some(heading);
        self
    }

    /// Plain text, one block per day, Sunday first.
    pub fn render_text(&self, page: &CalendarPage) -> String {
        let mut lines = Vec::new();

        if let Some(ref heading) = self.heading {
            lines.push(heading.clone());
        }
        lines.push(format!(
            "{} ({})",
            page.view.week_label(),
            page.view.window().timezone().name()
        ));
        if let Some(ref alert) = page.alert {
            lines.push(alert.to_string());
        }

        for day in page.view.days() {
            lines.push(String::new());
            lines.push(format!(
                "{}, {}",
                weekday_name(day.weekday),
                day.date.format("%B %-d")
            ));
            if day.is_empty() {
                lines.push(format!("  {}", NO_EVENTS));
            }
            for event in &day.events {
                lines.push(self.event_line(event));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Pretty-printed JSON of the whole page.
    pub fn render_json(&self, page: &CalendarPage) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(page)
    }

    fn event_line(&self, event: &DisplayEvent) -> String {
        let start = self.time_format.format(&event.start());
        let end = if event.spans_days() {
            format!("{} {}", short_weekday(event.end()), self.time_format.format(&event.end()))
        } else {
            self.time_format.format(&event.end())
        };

        let subject = match event.subject().trim() {
            "" => NO_SUBJECT,
            s => s,
        };

        match event.organizer().trim() {
            "" => format!("  {} - {}  {}", start, end, subject),
            organizer => format!("  {} - {}  {} ({})", start, end, subject, organizer),
        }
    }
}

fn short_weekday(dt: NaiveDateTime) -> &'static str {
    match dt.weekday() {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}
