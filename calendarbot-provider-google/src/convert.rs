//! Conversion between Google Calendar API events and core events.

use calendarbot_core::{Attendee, Event, ResponseStatus, attendee::find_self};
use chrono_tz::Tz;
use google_calendar::types::EventDateTime;

/// Convert an API event, rendering its date-times in the event's own time
/// zone, or `calendar_zone` when the event doesn't name one.
///
/// All-day events carry only a date and come out with `start`/`end` unset.
pub fn from_google(event: google_calendar::types::Event, calendar_zone: Tz) -> Event {
    let attendees = event
        .attendees
        .iter()
        .map(|a| Attendee {
            name: if a.display_name.is_empty() {
                None
            } else {
                Some(a.display_name.clone())
            },
            email: a.email.clone(),
            response_status: ResponseStatus::from(a.response_status.as_str()),
        })
        .collect();

    Event {
        start: render_time(event.start.as_ref(), calendar_zone),
        end: render_time(event.end.as_ref(), calendar_zone),
        summary: if event.summary.is_empty() {
            "(No title)".to_string()
        } else {
            event.summary
        },
        id: event.id,
        attendees,
    }
}

pub fn is_cancelled(event: &google_calendar::types::Event) -> bool {
    event.status == "cancelled" || event.id.is_empty()
}

/// Copy `email`'s response status from `local` onto `remote`.
///
/// Other attendees keep whatever the API returned, so answers that arrived
/// after `local` was fetched aren't overwritten.
pub fn apply_own_response(
    remote: &mut google_calendar::types::Event,
    local: &Event,
    email: &str,
) {
    let Some(mine) = find_self(email, &local.attendees) else {
        return;
    };
    if let Some(attendee) = remote.attendees.iter_mut().find(|a| a.email == email) {
        attendee.response_status = mine.response_status.as_str().to_string();
    }
}

pub fn parse_zone(name: &str) -> Option<Tz> {
    if name.is_empty() {
        return None;
    }
    name.parse().ok()
}

fn render_time(time: Option<&EventDateTime>, calendar_zone: Tz) -> Option<String> {
    let time = time?;
    let date_time = time.date_time?;
    let zone = parse_zone(&time.time_zone).unwrap_or(calendar_zone);
    Some(date_time.with_timezone(&zone).to_rfc3339())
}
