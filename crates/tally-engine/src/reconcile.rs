//! Summary reconciliation.
//!
//! For one period and one computed total: work out the placement date, purge
//! existing total events, insert one fresh all-day total.
//!
//! The purge is global — no time filter, the whole store — sparing only
//! totals inserted earlier in the same pass. Totals for periods outside the
//! current window are therefore discarded on every pass and only come back
//! if a later pass regenerates them.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tally_calendar::{CalendarStore, EventDraft};
use tally_core::{AnchorMonth, PlacementPolicy, TOTAL_COLOR_ID, TOTAL_TAG, format_amount};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::errors::EngineResult;

/// Compute the single date that hosts a period's total.
///
/// `live_day_of_month` is `Some` only when reconciling the live current
/// period; under the pay-date policy, a live day past the pay day rolls the
/// placement one month forward. Window-driven future calls pass `None` and
/// never roll.
pub fn placement_date(
    policy: PlacementPolicy,
    anchor: AnchorMonth,
    pay_date_day: u32,
    live_day_of_month: Option<u32>,
) -> NaiveDate {
    match policy {
        PlacementPolicy::EndOfMonth => anchor.last_day(),
        PlacementPolicy::StartOfMonth => anchor.first_day(),
        PlacementPolicy::PayDate => {
            let rolled = live_day_of_month.is_some_and(|day| day > pay_date_day);
            if rolled {
                anchor.shifted(1).pay_date(pay_date_day)
            } else {
                anchor.pay_date(pay_date_day)
            }
        }
    }
}

/// Replace every total event in the store with one fresh total at
/// `placement`, returning the inserted event's id.
///
/// The purge spares only `protect` — the totals inserted earlier in the same
/// pass — so a 12-period pass converges to exactly twelve totals while
/// anything left over from previous passes or configurations still gets
/// swept on every call. A standalone call passes no protected ids and is
/// idempotent: run twice, one total remains.
///
/// Any store failure aborts immediately: a failed delete leaves stale totals
/// behind, a failed insert leaves none, and either way the next successful
/// pass repairs the calendar.
pub async fn reconcile(
    store: &dyn CalendarStore,
    config: &EngineConfig,
    placement: NaiveDate,
    total: Decimal,
    protect: &[String],
) -> EngineResult<String> {
    let stale = store.query(TOTAL_TAG, None).await?;
    for event in stale {
        if event.summary.starts_with(TOTAL_TAG) && !protect.contains(&event.id) {
            store.delete(&event.id).await?;
            debug!(id = %event.id, "purged stale total");
        }
    }

    let summary = format!("{TOTAL_TAG} {}", format_amount(total));
    let draft = EventDraft {
        summary: summary.clone(),
        start_date: placement,
        end_date: placement + Duration::days(1),
        time_zone: config.time_zone.name().to_string(),
        color_id: Some(TOTAL_COLOR_ID.to_string()),
    };
    let created = store.insert(draft).await?;

    info!(%placement, %summary, "reconciled period total");
    Ok(created.id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
