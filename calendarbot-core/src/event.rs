//! Provider-neutral event types.
//!
//! Providers convert their API responses into these types. Start and end
//! stay in their RFC 3339 text form until the decision code parses them, so
//! a malformed or missing timestamp only affects the event that carries it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single calendar event occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Display title
    pub summary: String,
    /// RFC 3339 start with explicit offset. `None` for all-day events.
    pub start: Option<String>,
    /// RFC 3339 end with explicit offset. `None` for all-day events.
    pub end: Option<String>,
    pub attendees: Vec<Attendee>,
}

/// An event attendee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    /// Display name
    pub name: Option<String>,
    pub email: String,
    pub response_status: ResponseStatus,
}

impl Attendee {
    pub fn new(email: impl Into<String>, response_status: ResponseStatus) -> Self {
        Attendee {
            name: None,
            email: email.into(),
            response_status,
        }
    }
}

/// An attendee's answer to an invitation.
///
/// Uses Google Calendar's spelling on the wire. Anything unrecognised is
/// kept verbatim so it survives a round-trip to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    NeedsAction,
    Tentative,
    Accepted,
    Declined,
    Other(String),
}

impl ResponseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ResponseStatus::NeedsAction => "needsAction",
            ResponseStatus::Tentative => "tentative",
            ResponseStatus::Accepted => "accepted",
            ResponseStatus::Declined => "declined",
            ResponseStatus::Other(s) => s,
        }
    }

    /// Whether the user still owes an answer (`needsAction` or `tentative`).
    pub fn is_pending(&self) -> bool {
        matches!(self, ResponseStatus::NeedsAction | ResponseStatus::Tentative)
    }
}

impl From<&str> for ResponseStatus {
    fn from(s: &str) -> Self {
        match s {
            "needsAction" => ResponseStatus::NeedsAction,
            "tentative" => ResponseStatus::Tentative,
            "accepted" => ResponseStatus::Accepted,
            "declined" => ResponseStatus::Declined,
            other => ResponseStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResponseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResponseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ResponseStatus::from(s.as_str()))
    }
}
