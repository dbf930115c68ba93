//! # tally-calendar
//!
//! The calendar store contract and its implementations.
//!
//! The reconciliation engine sees calendars through the [`CalendarStore`]
//! trait: keyword query with an optional start-time window, delete by id,
//! and all-day insert. [`GoogleCalendar`] is the production backend
//! (Calendar REST v3, paginated listing, bearer auth via
//! [`tally_auth::TokenProvider`]); [`InMemoryStore`] backs tests.

#![deny(unsafe_code)]

pub mod google;
pub mod memory;
pub mod store;
pub mod types;

pub use google::GoogleCalendar;
pub use memory::InMemoryStore;
pub use store::{CalendarStore, StoreError, StoreResult};
pub use types::{CalendarEvent, EventDraft, TimeWindow};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
