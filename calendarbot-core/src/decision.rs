//! Accept/decline decisions for a single event.

use std::fmt;

use crate::attendee::{find_self, find_self_mut};
use crate::calendar::CalendarClient;
use crate::conflict::find_conflict;
use crate::error::DecisionError;
use crate::event::{Event, ResponseStatus};
use crate::interval::Interval;

/// The answer sent on the user's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Declined,
}

impl Decision {
    fn from_conflict(conflict: bool) -> Self {
        if conflict {
            Decision::Declined
        } else {
            Decision::Accepted
        }
    }
}

impl From<Decision> for ResponseStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted => ResponseStatus::Accepted,
            Decision::Declined => ResponseStatus::Declined,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ResponseStatus::from(*self).as_str())
    }
}

/// A decided event ready to be written back.
///
/// `event` is a copy of the fetched event with the user's status replaced;
/// the fetched event itself is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub event: Event,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The user already answered; carries the existing status.
    NoAction(ResponseStatus),
    Respond(Response),
}

pub struct DecisionEngine<'a, C> {
    client: &'a C,
    email: &'a str,
}

impl<'a, C: CalendarClient> DecisionEngine<'a, C> {
    pub fn new(client: &'a C, email: &'a str) -> Self {
        DecisionEngine { client, email }
    }

    /// Decide how to answer `event` without writing anything back.
    ///
    /// Only pending events (`needsAction`/`tentative`) trigger the same-day
    /// fetch; everything else is a no-op.
    pub async fn evaluate(&self, event: &Event) -> Result<Evaluation, DecisionError> {
        let interval = Interval::parse(event.start.as_deref(), event.end.as_deref()).map_err(
            |source| DecisionError::Timestamp {
                summary: event.summary.clone(),
                source,
            },
        )?;

        let me = find_self(self.email, &event.attendees).ok_or_else(|| {
            DecisionError::AttendeeNotFound {
                summary: event.summary.clone(),
                email: self.email.to_string(),
            }
        })?;

        if !me.response_status.is_pending() {
            tracing::debug!(
                event = %event.summary,
                status = %me.response_status,
                "already answered"
            );
            return Ok(Evaluation::NoAction(me.response_status.clone()));
        }

        tracing::info!(
            event = %event.summary,
            status = %me.response_status,
            "{} needs a response ({})",
            event.summary,
            interval
        );

        let window = interval.day_window();
        let candidates = self
            .client
            .events_in_window(window.start(), window.end())
            .await
            .map_err(|source| DecisionError::Fetch {
                summary: event.summary.clone(),
                source,
            })?;

        tracing::info!("found {} events for analysis", candidates.len());

        let conflict = find_conflict(&interval, &candidates, self.email);
        if let Some((candidate, candidate_interval)) = conflict {
            tracing::info!(
                candidate = %candidate.summary,
                "found intersection with {} ({})",
                candidate.summary,
                candidate_interval
            );
        }

        let decision = Decision::from_conflict(conflict.is_some());
        Ok(Evaluation::Respond(respond(event, self.email, decision)))
    }

    /// Write the decided status back, asking the provider to notify the
    /// other attendees. One call, no retry.
    pub async fn apply(&self, response: &Response) -> Result<(), DecisionError> {
        let event = &response.event;
        tracing::info!(
            event = %event.summary,
            "{} event {}",
            match response.decision {
                Decision::Accepted => "accepting",
                Decision::Declined => "declining",
            },
            event.summary
        );

        self.client
            .update_event(event, true)
            .await
            .map_err(|source| DecisionError::Update {
                summary: event.summary.clone(),
                source,
            })
    }
}

fn respond(event: &Event, email: &str, decision: Decision) -> Response {
    let mut event = event.clone();
    if let Some(me) = find_self_mut(email, &mut event.attendees) {
        me.response_status = decision.into();
    }
    Response { event, decision }
}
