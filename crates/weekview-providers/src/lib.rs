//! Event feed abstraction and the week-view pipeline.
//!
//! This crate connects a paginated event feed to the week model of
//! `weekview-core`:
//!
//! - [`EventSource`] - one page of a time-ordered, cursor-paginated feed
//! - [`drain`] - follows cursors until the feed is exhausted
//! - [`normalize_event`] - validates a [`RawEvent`] into a display event
//! - [`build_week_view`] - the whole request, with error triage
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │ Microsoft Graph │    │  Memory / test  │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          │     EventSource      │
//!          └──────────┬───────────┘
//!                     │  drain()
//!                     ▼
//!              ┌─────────────┐
//!              │  RawEvent   │
//!              └──────┬──────┘
//!                     │  normalize_events()
//!                     ▼
//!              ┌──────────────┐
//!              │ DisplayEvent │──▶ CalendarView (7 days)
//!              └──────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use weekview_providers::{build_week_view, MemorySource};
//!
//! let page = build_week_view(&source, today, Some("Pacific Standard Time")).await?;
//! for day in page.view.days() {
//!     println!("{}: {} events", day.date, day.len());
//! }
//! ```

pub mod auth;
pub mod error;
#[cfg(feature = "graph")]
pub mod graph;
pub mod memory;
pub mod normalize;
pub mod pager;
pub mod raw_event;
pub mod service;
pub mod source;

// Re-export main types at crate root
pub use auth::{AccessToken, Authenticator, StaticToken};
pub use error::{
    EventSourceError, EventSourceResult, MalformedEventError, SourceErrorCode, SourceErrorKind,
    TimeField,
};
pub use memory::{MemorySource, ScriptedSource};
pub use normalize::{normalize_event, normalize_events};
pub use pager::{DrainError, drain};
pub use raw_event::{RawDateTime, RawEvent};
pub use service::{
    CalendarPage, FEED_ERROR_MESSAGE, MALFORMED_EVENT_MESSAGE, ReauthenticationRequired,
    build_week_view,
};
pub use source::{
    BoxFuture, CalendarQuery, EventOrder, EventPage, EventSource, MAX_PAGE_SIZE, PageCursor,
    SELECT_FIELDS,
};
