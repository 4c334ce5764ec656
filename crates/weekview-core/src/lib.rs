//! Core types: time windows, timezones, events, week bucketing, formatting

pub mod alert;
pub mod claims;
pub mod event;
pub mod format;
pub mod time;
pub mod timezone;
pub mod tracing;
pub mod week;

pub use alert::{Alert, AlertLevel};
pub use claims::{ClaimSet, UserClaims};
pub use event::DisplayEvent;
pub use format::{DEFAULT_TIME_FORMAT, TimeFormat};
pub use time::{LocalWindow, TimeWindow, WeekWindow, compute_week_window, start_of_week};
pub use timezone::{resolve_timezone, windows_to_iana};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use week::{CalendarView, DayView, WEEK_DAYS, week_label};
