//! Payment aggregation.
//!
//! One tagged range query per period, summed with [`Decimal`] so cents
//! survive any number of additions. A payment event whose text yields no
//! recognizable amount contributes zero; that is normal data, not an error.

use rust_decimal::Decimal;
use tally_calendar::{CalendarStore, TimeWindow};
use tally_core::{PAYMENT_TAG, extract_amount};
use tracing::debug;

use crate::errors::EngineResult;

/// Sum the amounts of all payment events starting within `window`.
pub async fn total_for(store: &dyn CalendarStore, window: TimeWindow) -> EngineResult<Decimal> {
    let events = store.query(PAYMENT_TAG, Some(window)).await?;

    let mut total = Decimal::ZERO;
    for event in &events {
        match extract_amount(&event.summary) {
            Some(amount) => total += amount,
            None => {
                debug!(id = %event.id, summary = %event.summary, "payment event without a parseable amount, skipped");
            }
        }
    }

    debug!(events = events.len(), %total, "aggregated payment events");
    Ok(total)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
