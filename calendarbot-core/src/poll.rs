//! One pass over the user's upcoming events.

use chrono::{DateTime, Utc};

use crate::calendar::{CalendarClient, UPCOMING_PAGE_SIZE};
use crate::decision::{Decision, DecisionEngine, Evaluation};
use crate::error::CalendarResult;

/// Tally of a single poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Upcoming events returned by the calendar.
    pub examined: usize,
    /// Events a decision was made for, whether or not the update stuck.
    pub processed: usize,
    pub accepted: usize,
    pub declined: usize,
    /// Events the user had already answered.
    pub skipped: usize,
    /// Events that could not be decided (bad data or fetch failure).
    pub failed: usize,
    /// Decisions that could not be written back.
    pub update_failures: usize,
}

/// Evaluate every upcoming event once, applying decisions as they are made.
///
/// Only the initial listing can fail the cycle. Per-event problems are
/// logged and counted; the next cycle sees fresh data and tries again.
pub async fn run_once<C: CalendarClient>(
    client: &C,
    email: &str,
    now: DateTime<Utc>,
) -> CalendarResult<PollReport> {
    tracing::info!("checking calendar {}", now.to_rfc3339());

    let events = client.upcoming_events(now, UPCOMING_PAGE_SIZE).await?;
    let mut report = PollReport {
        examined: events.len(),
        ..Default::default()
    };

    if events.is_empty() {
        tracing::info!("no upcoming events found");
        return Ok(report);
    }

    let engine = DecisionEngine::new(client, email);

    for event in &events {
        let response = match engine.evaluate(event).await {
            Ok(Evaluation::NoAction(_)) => {
                report.skipped += 1;
                continue;
            }
            Ok(Evaluation::Respond(response)) => response,
            Err(e) => {
                tracing::error!("{}", e);
                report.failed += 1;
                continue;
            }
        };

        report.processed += 1;
        match response.decision {
            Decision::Accepted => report.accepted += 1,
            Decision::Declined => report.declined += 1,
        }

        if let Err(e) = engine.apply(&response).await {
            tracing::error!("{}; will retry next cycle", e);
            report.update_failures += 1;
        }
    }

    if report.processed == 0 {
        tracing::info!("no upcoming events that need action found");
    } else {
        tracing::info!(
            processed = report.processed,
            accepted = report.accepted,
            declined = report.declined,
            "cycle finished"
        );
    }

    Ok(report)
}
