//! Microsoft Graph event source.
//!
//! [`GraphEventSource`] lists events with `GET /me/calendarView`, one page of
//! at most 50 events per request:
//!
//! - the window goes in `startDateTime` / `endDateTime` as UTC instants
//! - `Prefer: outlook.timezone="<zone>"` makes Graph return wall-clock times
//!   in the viewer's zone
//! - `$select=subject,organizer,start,end` and `$orderby=start/dateTime`
//!   keep pages small and time-ordered
//! - `@odata.nextLink` is followed verbatim, with the same `Prefer` header
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use weekview_providers::graph::{GraphConfig, GraphEventSource};
//! use weekview_providers::StaticToken;
//!
//! let source = GraphEventSource::new(
//!     GraphConfig::new().with_page_size(25),
//!     Arc::new(StaticToken::new(token)),
//! )?;
//! ```

mod client;
mod config;
mod wire;

pub use client::GraphEventSource;
pub use config::GraphConfig;
