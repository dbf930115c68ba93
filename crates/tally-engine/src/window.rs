//! Window driver.
//!
//! One pass reconciles the live current period plus the next eleven: compute
//! boundaries, aggregate payments, replace the total event. The live period
//! aggregates from "now" forward only; future periods aggregate in full.
//! The first store failure aborts the rest of the pass — periods already
//! reconciled keep their new state, later ones go untouched until the next
//! pass.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tally_calendar::{CalendarStore, TimeWindow};
use tally_core::clock::Clock;
use tally_core::period::{AnchorMonth, period_containing, period_offset};
use tracing::info;

use crate::aggregate::total_for;
use crate::config::EngineConfig;
use crate::errors::EngineResult;
use crate::reconcile::{placement_date, reconcile};

/// Future periods processed after the live one (12 periods per pass total).
pub const FUTURE_PERIODS: i32 = 11;

/// One period's outcome within a pass.
#[derive(Clone, Debug)]
pub struct ReconciledPeriod {
    /// The period's anchor month.
    pub anchor: AnchorMonth,
    /// Date the total event was placed on.
    pub placement: NaiveDate,
    /// Aggregated payment total.
    pub total: Decimal,
}

/// Outcome of one full reconciliation pass.
#[derive(Clone, Debug, Default)]
pub struct PassSummary {
    /// Periods reconciled, live first, then offsets in order.
    pub periods: Vec<ReconciledPeriod>,
}

/// Run one reconciliation pass over the live period and the future window.
pub async fn run_once(
    store: &dyn CalendarStore,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> EngineResult<PassSummary> {
    let mut summary = PassSummary::default();
    // Totals inserted so far in this pass; the purge inside each reconcile
    // spares these, so the pass converges to twelve totals.
    let mut inserted: Vec<String> = Vec::new();

    // Live current period: aggregation starts no earlier than now.
    let now = clock.now_utc();
    let period = period_containing(now, config.pay_date_day, config.time_zone);
    let window = TimeWindow {
        start: now.max(period.start.with_timezone(&Utc)),
        end: period.end.with_timezone(&Utc),
    };
    info!(from = %window.start, to = %window.end, "checking payment events");
    let total = total_for(store, window).await?;

    let live_day = now.with_timezone(&config.time_zone).day();
    let placement = placement_date(
        config.placement_policy,
        period.anchor,
        config.pay_date_day,
        Some(live_day),
    );
    let id = reconcile(store, config, placement, total, &inserted).await?;
    inserted.push(id);
    summary.periods.push(ReconciledPeriod {
        anchor: period.anchor,
        placement,
        total,
    });

    // Future window: full periods, no clamp, no placement roll. "now" is
    // re-read per period rather than snapshotted for the pass; only the live
    // path above depends on sub-day precision.
    for offset in 1..=FUTURE_PERIODS {
        let now = clock.now_utc();
        let period = period_offset(now, offset, config.pay_date_day, config.time_zone);
        let window = TimeWindow {
            start: period.start.with_timezone(&Utc),
            end: period.end.with_timezone(&Utc),
        };
        let total = total_for(store, window).await?;
        let placement = placement_date(
            config.placement_policy,
            period.anchor,
            config.pay_date_day,
            None,
        );
        let id = reconcile(store, config, placement, total, &inserted).await?;
        inserted.push(id);
        summary.periods.push(ReconciledPeriod {
            anchor: period.anchor,
            placement,
            total,
        });
    }

    Ok(summary)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
