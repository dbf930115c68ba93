//! In-memory calendar store.
//!
//! Deterministic [`CalendarStore`] used by engine tests and dry runs: events
//! live in a vector behind a mutex, ids are sequential, and all-day drafts
//! resolve to midnight UTC. Query semantics mirror the remote store —
//! keyword substring match, half-open start-time window, start-time order.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use parking_lot::Mutex;

use crate::store::{CalendarStore, StoreError, StoreResult};
use crate::types::{CalendarEvent, EventDraft, TimeWindow};

/// Vector-backed store for tests.
#[derive(Default)]
pub struct InMemoryStore {
    events: Mutex<Vec<CalendarEvent>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timed event directly, bypassing the insert contract. Returns
    /// the assigned id.
    pub fn seed(&self, summary: &str, start: DateTime<Utc>) -> String {
        let id = self.alloc_id();
        self.events.lock().push(CalendarEvent {
            id: id.clone(),
            summary: summary.to_string(),
            start,
            end: start + chrono::Duration::hours(1),
            color_id: None,
        });
        id
    }

    /// Snapshot of every stored event, in insertion order.
    pub fn snapshot(&self) -> Vec<CalendarEvent> {
        self.events.lock().clone()
    }

    fn alloc_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("mem-{n}")
    }
}

#[async_trait]
impl CalendarStore for InMemoryStore {
    async fn query(
        &self,
        keyword: &str,
        window: Option<TimeWindow>,
    ) -> StoreResult<Vec<CalendarEvent>> {
        let mut matches: Vec<CalendarEvent> = self
            .events
            .lock()
            .iter()
            .filter(|e| e.summary.contains(keyword))
            .filter(|e| window.is_none_or(|w| e.start >= w.start && e.start < w.end))
            .cloned()
            .collect();
        matches.sort_by_key(|e| e.start);
        Ok(matches)
    }

    async fn delete(&self, event_id: &str) -> StoreResult<()> {
        let mut events = self.events.lock();
        match events.iter().position(|e| e.id == event_id) {
            Some(idx) => {
                let _ = events.remove(idx);
                Ok(())
            }
            None => Err(StoreError::Api {
                status: 404,
                message: format!("event {event_id} not found"),
            }),
        }
    }

    async fn insert(&self, draft: EventDraft) -> StoreResult<CalendarEvent> {
        let event = CalendarEvent {
            id: self.alloc_id(),
            summary: draft.summary,
            start: draft.start_date.and_time(NaiveTime::MIN).and_utc(),
            end: draft.end_date.and_time(NaiveTime::MIN).and_utc(),
            color_id: draft.color_id,
        };
        self.events.lock().push(event.clone());
        Ok(event)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
