//! Error types for calendarbot.

use thiserror::Error;

/// A start or end timestamp that can't be turned into an interval.
#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("event has no {0} date-time")]
    Missing(&'static str),

    #[error("invalid {field} timestamp '{value}': {source}")]
    Invalid {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("end {end} is before start {start}")]
    Inverted { start: String, end: String },
}

/// Failure reported by a `CalendarClient`.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("{context}: {message}")]
    Request { context: String, message: String },
}

impl CalendarError {
    pub fn request(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CalendarError::Request {
            context: context.into(),
            message: format!("{:#}", err),
        }
    }
}

/// Why a single event could not be decided or its decision not saved.
///
/// Every variant is scoped to one event: the poll cycle logs it and moves on.
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("Bad timestamp on '{summary}': {source}")]
    Timestamp {
        summary: String,
        #[source]
        source: TimestampError,
    },

    #[error("No attendee matching {email} on '{summary}'")]
    AttendeeNotFound { summary: String, email: String },

    #[error("Failed to fetch same-day events for '{summary}': {source}")]
    Fetch {
        summary: String,
        #[source]
        source: CalendarError,
    },

    #[error("Failed to update '{summary}': {source}")]
    Update {
        summary: String,
        #[source]
        source: CalendarError,
    },
}

/// Result type alias for calendar client operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
