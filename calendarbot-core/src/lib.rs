//! Core logic for calendarbot.
//!
//! Given the user's upcoming events, answers each pending invitation:
//! - `interval`: time ranges and the one-minute-nudge overlap rule
//! - `attendee` / `conflict`: finding accepted same-day events that overlap
//! - `decision`: the accept/decline decision for one event
//! - `poll`: a single pass over upcoming events
//!
//! The calendar service itself is behind the `CalendarClient` trait.

pub mod attendee;
pub mod calendar;
pub mod conflict;
pub mod decision;
pub mod error;
pub mod event;
pub mod interval;
pub mod poll;

pub use calendar::{CalendarClient, DEFAULT_CALENDAR_ID, UPCOMING_PAGE_SIZE};
pub use decision::{Decision, DecisionEngine, Evaluation, Response};
pub use error::{CalendarError, CalendarResult, DecisionError, TimestampError};
pub use event::{Attendee, Event, ResponseStatus};
pub use interval::Interval;
pub use poll::{PollReport, run_once};
