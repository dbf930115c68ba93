//! Google Calendar REST v3 client.
//!
//! Implements [`CalendarStore`] against the `calendars/{id}/events`
//! endpoints. Queries always ask for non-deleted, recurrence-expanded
//! events ordered by start time and follow `nextPageToken` until the listing
//! is exhausted. `timeMax` is an exclusive bound on event start times, which
//! matches the engine's half-open period windows exactly.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tally_auth::TokenProvider;
use tracing::debug;

use crate::store::{CalendarStore, StoreError, StoreResult};
use crate::types::{CalendarEvent, EventDraft, TimeWindow};

/// Production endpoint root.
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar backend.
pub struct GoogleCalendar {
    http: reqwest::Client,
    base_url: String,
    calendar_id: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleCalendar {
    /// Create a client for one calendar, authenticating through `tokens`.
    pub fn new(calendar_id: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            calendar_id: calendar_id.into(),
            tokens,
        }
    }

    /// Override the endpoint root (tests point this at a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> StoreResult<T> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl CalendarStore for GoogleCalendar {
    async fn query(
        &self,
        keyword: &str,
        window: Option<TimeWindow>,
    ) -> StoreResult<Vec<CalendarEvent>> {
        let token = self.tokens.bearer_token().await?;
        let url = self.events_url();

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&[
                    ("q", keyword),
                    ("showDeleted", "false"),
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                ]);
            if let Some(w) = window {
                req = req.query(&[
                    ("timeMin", w.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    ("timeMax", w.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ]);
            }
            if let Some(ref t) = page_token {
                req = req.query(&[("pageToken", t.as_str())]);
            }

            let list: EventList = Self::parse_response(req.send().await?).await?;
            for wire in list.items.unwrap_or_default() {
                events.push(wire.into_event()?);
            }

            match list.next_page_token {
                Some(t) => page_token = Some(t),
                None => break,
            }
        }

        debug!(keyword, count = events.len(), "calendar query");
        Ok(events)
    }

    async fn delete(&self, event_id: &str) -> StoreResult<()> {
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}/{event_id}", self.events_url());
        let resp = self.http.delete(&url).bearer_auth(&token).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        debug!(event_id, "calendar delete");
        Ok(())
    }

    async fn insert(&self, draft: EventDraft) -> StoreResult<CalendarEvent> {
        let token = self.tokens.bearer_token().await?;
        let body = InsertBody {
            summary: &draft.summary,
            start: InsertTime {
                date: draft.start_date,
                time_zone: &draft.time_zone,
            },
            end: InsertTime {
                date: draft.end_date,
                time_zone: &draft.time_zone,
            },
            color_id: draft.color_id.as_deref(),
        };

        let resp = self
            .http
            .post(self.events_url())
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let wire: WireEvent = Self::parse_response(resp).await?;
        let event = wire.into_event()?;
        debug!(id = %event.id, summary = %event.summary, "calendar insert");
        Ok(event)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

/// `events.list` response page.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventList {
    items: Option<Vec<WireEvent>>,
    next_page_token: Option<String>,
}

/// Event resource as returned by the API.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    id: Option<String>,
    summary: Option<String>,
    start: Option<WireTime>,
    end: Option<WireTime>,
    color_id: Option<String>,
}

/// Start/end marker: timed events carry `dateTime`, all-day events `date`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTime {
    date: Option<NaiveDate>,
    date_time: Option<DateTime<Utc>>,
}

impl WireEvent {
    fn into_event(self) -> StoreResult<CalendarEvent> {
        let id = self
            .id
            .ok_or_else(|| StoreError::Malformed("event missing id".to_string()))?;
        let start = instant(self.start)
            .ok_or_else(|| StoreError::Malformed(format!("event {id} missing start")))?;
        let end = instant(self.end)
            .ok_or_else(|| StoreError::Malformed(format!("event {id} missing end")))?;
        Ok(CalendarEvent {
            id,
            summary: self.summary.unwrap_or_default(),
            start,
            end,
            color_id: self.color_id,
        })
    }
}

fn instant(time: Option<WireTime>) -> Option<DateTime<Utc>> {
    let time = time?;
    if let Some(dt) = time.date_time {
        return Some(dt);
    }
    time.date.map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// `events.insert` request body for an all-day event.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertBody<'a> {
    summary: &'a str,
    start: InsertTime<'a>,
    end: InsertTime<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertTime<'a> {
    date: NaiveDate,
    time_zone: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
