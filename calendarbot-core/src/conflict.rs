//! Checking a pending event against the user's accepted commitments.

use crate::attendee::find_self;
use crate::event::{Event, ResponseStatus};
use crate::interval::Interval;

/// First candidate the user has accepted whose interval overlaps `pending`.
///
/// Candidates without the user as attendee, not `accepted`, or with
/// unparseable times are skipped. Stops at the first hit.
pub fn find_conflict<'a>(
    pending: &Interval,
    candidates: &'a [Event],
    email: &str,
) -> Option<(&'a Event, Interval)> {
    candidates.iter().find_map(|candidate| {
        let me = find_self(email, &candidate.attendees)?;
        if me.response_status != ResponseStatus::Accepted {
            return None;
        }

        let interval = match Interval::parse(candidate.start.as_deref(), candidate.end.as_deref())
        {
            Ok(interval) => interval,
            Err(e) => {
                tracing::warn!(candidate = %candidate.summary, "skipping candidate: {}", e);
                return None;
            }
        };

        pending.overlaps(&interval).then_some((candidate, interval))
    })
}

pub fn has_conflict(pending: &Interval, candidates: &[Event], email: &str) -> bool {
    find_conflict(pending, candidates, email).is_some()
}
