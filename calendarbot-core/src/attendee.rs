//! Locating the configured user among an event's attendees.

use crate::event::Attendee;

/// First attendee whose email equals `email` exactly (case-sensitive).
pub fn find_self<'a>(email: &str, attendees: &'a [Attendee]) -> Option<&'a Attendee> {
    attendees.iter().find(|a| a.email == email)
}

pub fn find_self_mut<'a>(email: &str, attendees: &'a mut [Attendee]) -> Option<&'a mut Attendee> {
    attendees.iter_mut().find(|a| a.email == email)
}
