//! The calendar store contract.
//!
//! Everything the reconciliation engine needs from a calendar backend fits
//! in three operations; [`CalendarStore`] is that seam. The production
//! implementation is [`crate::google::GoogleCalendar`]; tests run against
//! [`crate::memory::InMemoryStore`].

use async_trait::async_trait;

use crate::types::{CalendarEvent, EventDraft, TimeWindow};

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by calendar store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Could not obtain a bearer token.
    #[error("auth error: {0}")]
    Auth(#[from] tally_auth::AuthError),

    /// The store returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },

    /// The store returned a payload missing required fields.
    #[error("malformed event payload: {0}")]
    Malformed(String),
}

/// Remote event store operations.
///
/// Implementors must be `Send + Sync`; the engine holds the store behind a
/// shared reference across an entire reconciliation pass.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// List events whose text matches `keyword`, optionally bounded to a
    /// start-time window, ordered by start time. Deleted events are
    /// excluded and recurring events are expanded to single instances.
    async fn query(
        &self,
        keyword: &str,
        window: Option<TimeWindow>,
    ) -> StoreResult<Vec<CalendarEvent>>;

    /// Remove one event by identifier. Fails if the event no longer exists.
    async fn delete(&self, event_id: &str) -> StoreResult<()>;

    /// Create a single all-day event spanning `[start_date, end_date)`.
    async fn insert(&self, draft: EventDraft) -> StoreResult<CalendarEvent>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
