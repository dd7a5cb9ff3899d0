//! `CalendarClient` backed by the Google Calendar API.

use calendarbot_core::{CalendarClient, CalendarError, CalendarResult, Event};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use google_calendar::Client;
use google_calendar::types::{MinAccessRole, OrderBy, SendUpdates};
use tokio::sync::Mutex;

use crate::app_config::Credentials;
use crate::convert::{apply_own_response, from_google, is_cancelled, parse_zone};
use crate::session::Session;

pub struct GoogleCalendar {
    creds: Credentials,
    session: Mutex<Session>,
    calendar_id: String,
    /// Account whose answers are written back.
    email: String,
    /// Zone for event times that don't name their own.
    time_zone: Tz,
}

impl GoogleCalendar {
    /// Wrap `email`'s authorized session, looking up the calendar's time zone.
    pub async fn connect(
        creds: Credentials,
        mut session: Session,
        calendar_id: impl Into<String>,
        email: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let calendar_id = calendar_id.into();
        session.refresh_if_needed(&creds).await?;

        let time_zone = calendar_time_zone(&session.client(&creds), &calendar_id)
            .await
            .unwrap_or_else(|| {
                tracing::warn!("could not determine time zone of {}, using UTC", calendar_id);
                chrono_tz::UTC
            });
        tracing::debug!(calendar = %calendar_id, zone = %time_zone, "connected");

        Ok(GoogleCalendar {
            creds,
            session: Mutex::new(session),
            calendar_id,
            email: email.into(),
            time_zone,
        })
    }

    async fn client(&self) -> CalendarResult<Client> {
        let mut session = self.session.lock().await;
        session
            .refresh_if_needed(&self.creds)
            .await
            .map_err(|e| CalendarError::request("Failed to refresh OAuth session", e))?;
        Ok(session.client(&self.creds))
    }

    fn convert(&self, events: Vec<google_calendar::types::Event>) -> Vec<Event> {
        events
            .into_iter()
            .filter(|e| !is_cancelled(e))
            .map(|e| from_google(e, self.time_zone))
            .collect()
    }
}

impl CalendarClient for GoogleCalendar {
    async fn upcoming_events(
        &self,
        from: DateTime<Utc>,
        max_results: usize,
    ) -> CalendarResult<Vec<Event>> {
        let client = self.client().await?;
        let max_results = i64::try_from(max_results).unwrap_or(i64::MAX);

        let response = client
            .events()
            .list(
                &self.calendar_id,
                "", // i_cal_uid
                0,  // max_attendees
                max_results,
                OrderBy::StartTime,
                "", // page_token
                &[],
                "", // search query
                &[],
                false, // show_deleted
                false, // show_hidden_invitations
                true,  // single_events
                "",    // time_max
                &from.to_rfc3339(),
                "", // time_zone
                "", // updated_min
            )
            .await
            .map_err(|e| CalendarError::request("Unable to retrieve upcoming events", e))?;

        Ok(self.convert(response.body))
    }

    async fn events_in_window(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> CalendarResult<Vec<Event>> {
        let client = self.client().await?;

        let response = client
            .events()
            .list_all(
                &self.calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false,
                false,
                true, // single_events
                &end.to_rfc3339(),
                &start.to_rfc3339(),
                "",
                "",
            )
            .await
            .map_err(|e| CalendarError::request("Failed to fetch events", e))?;

        Ok(self.convert(response.body))
    }

    async fn update_event(&self, event: &Event, notify_attendees: bool) -> CalendarResult<()> {
        let client = self.client().await?;

        // Start from the stored event so fields we don't model survive the PUT
        let mut remote = client
            .events()
            .get(&self.calendar_id, &event.id, 0, "")
            .await
            .map_err(|e| {
                CalendarError::request(format!("Failed to load event: {}", event.summary), e)
            })?
            .body;

        apply_own_response(&mut remote, event, &self.email);

        let send_updates = if notify_attendees {
            SendUpdates::All
        } else {
            SendUpdates::None
        };

        client
            .events()
            .update(
                &self.calendar_id,
                &event.id,
                0,
                0,
                notify_attendees,
                send_updates,
                false,
                &remote,
            )
            .await
            .map_err(|e| {
                CalendarError::request(format!("Failed to update event: {}", event.summary), e)
            })?;

        Ok(())
    }
}

/// Time zone configured on the calendar, from the user's calendar list.
async fn calendar_time_zone(client: &Client, calendar_id: &str) -> Option<Tz> {
    let response = client
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .map_err(|e| tracing::warn!("failed to list calendars: {}", e))
        .ok()?;

    response
        .body
        .into_iter()
        .find(|cal| {
            cal.id == calendar_id
                || (calendar_id == calendarbot_core::DEFAULT_CALENDAR_ID && cal.primary)
        })
        .and_then(|cal| parse_zone(&cal.time_zone))
}
