//! The calendar service seen from the decision code.
//!
//! The poll cycle and decision engine take a `&C where C: CalendarClient`
//! instead of reaching for a shared handle, so tests can drive them with an
//! in-memory calendar.

use std::future::Future;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::CalendarResult;
use crate::event::Event;

/// Google's alias for the user's main calendar.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Upper bound on events examined per poll cycle.
pub const UPCOMING_PAGE_SIZE: usize = 100;

pub trait CalendarClient {
    /// Single occurrences starting at or after `from`, ordered by start,
    /// deleted events excluded, at most `max_results`.
    fn upcoming_events(
        &self,
        from: DateTime<Utc>,
        max_results: usize,
    ) -> impl Future<Output = CalendarResult<Vec<Event>>> + Send;

    /// Single, non-deleted occurrences intersecting `[start, end]`.
    fn events_in_window(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> impl Future<Output = CalendarResult<Vec<Event>>> + Send;

    /// Persist the user's response status on the event, leaving the other
    /// attendees' answers as the calendar has them.
    fn update_event(
        &self,
        event: &Event,
        notify_attendees: bool,
    ) -> impl Future<Output = CalendarResult<()>> + Send;
}
