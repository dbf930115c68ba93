//! # tally-core
//!
//! Foundation types for the tally daemon.
//!
//! This crate provides the pure leaves the rest of the workspace builds on:
//!
//! - **Amounts**: currency token extraction from free text and 2-dp formatting
//! - **Periods**: billing-period boundary math keyed by an anchor day-of-month
//! - **Clock**: an injectable time source so period math is testable
//! - **Constants**: the summary/payment tag conventions shared across crates

#![deny(unsafe_code)]

pub mod amount;
pub mod clock;
pub mod constants;
pub mod period;

pub use amount::{extract_amount, format_amount};
pub use clock::{Clock, FixedClock, SystemClock};
pub use constants::{CURRENCY_GLYPH, PAYMENT_TAG, TOTAL_COLOR_ID, TOTAL_TAG};
pub use period::{AnchorMonth, Period, PlacementPolicy};
