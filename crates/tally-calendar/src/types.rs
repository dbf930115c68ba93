//! Domain types for calendar events.

use chrono::{DateTime, NaiveDate, Utc};

/// One event as observed in the remote store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Store-assigned identifier.
    pub id: String,
    /// Free-form summary text (carries the tag prefix and, for payments,
    /// the amount).
    pub summary: String,
    /// Start instant. All-day events resolve to midnight UTC of their date.
    pub start: DateTime<Utc>,
    /// End instant (exclusive).
    pub end: DateTime<Utc>,
    /// Visual color tag, when set.
    pub color_id: Option<String>,
}

/// Description of an all-day event to create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDraft {
    /// Summary text.
    pub summary: String,
    /// First day of the event.
    pub start_date: NaiveDate,
    /// Day after the last day (exclusive, per the wire contract).
    pub end_date: NaiveDate,
    /// IANA zone label attached to the event.
    pub time_zone: String,
    /// Visual color tag.
    pub color_id: Option<String>,
}

/// Half-open query window `[start, end)` over event start times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Exclusive upper bound.
    pub end: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
