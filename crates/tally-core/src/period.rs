//! Billing-period boundary math.
//!
//! A billing period is a half-open interval `[start, end)` of zone-aware
//! instants, keyed by the month its pay date falls in (the *anchor month*).
//! For anchor month `(Y, M)` and pay day `D`, the period runs from local
//! midnight of `(Y, M, D)` up to (but excluding) local midnight of the same
//! construction one month later. Consecutive anchor months therefore tile
//! time with no gaps or overlaps.
//!
//! All month/day rollover funnels through [`normalize_date`], which accepts
//! out-of-range components (month 13, Feb 31) and rolls them forward the way
//! the rest of the arithmetic expects.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Rule selecting which single date within a period hosts the summary event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementPolicy {
    /// Last calendar day of the period's anchor month.
    #[default]
    EndOfMonth,
    /// First calendar day of the period's anchor month.
    StartOfMonth,
    /// The pay day itself within the anchor month.
    PayDate,
}

impl PlacementPolicy {
    /// Parse a selector string (case-insensitive). `None` for unrecognized
    /// values; callers treat that as a fatal configuration error.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "end-of-month" => Some(Self::EndOfMonth),
            "start-of-month" => Some(Self::StartOfMonth),
            "pay-date" => Some(Self::PayDate),
            _ => None,
        }
    }
}

/// A calendar month, 1-based, that anchors one billing period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorMonth {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1–12.
    pub month: u32,
}

impl AnchorMonth {
    /// Construct from a year and 1-based month.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The anchor month shifted by a signed number of months, with year
    /// rollover in both directions.
    pub fn shifted(self, months: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months);
        let year = i32::try_from(total.div_euclid(12)).expect("year within supported range");
        let month = u32::try_from(total.rem_euclid(12) + 1).expect("month in 1..=12");
        Self { year, month }
    }

    /// First calendar day of the month.
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("year within supported range")
    }

    /// Last calendar day of the month.
    pub fn last_day(self) -> NaiveDate {
        self.shifted(1).first_day() - Duration::days(1)
    }

    /// The pay date within this month. A pay day past the month's length
    /// rolls into the following month (see [`normalize_date`]).
    pub fn pay_date(self, pay_date_day: u32) -> NaiveDate {
        let month = i32::try_from(self.month).expect("month fits in i32");
        normalize_date(self.year, month, pay_date_day)
    }
}

/// One billing period: a half-open interval of zone-aware instants plus the
/// anchor month that keys it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    /// Month the period is keyed by.
    pub anchor: AnchorMonth,
    /// Inclusive start, local midnight on the pay date.
    pub start: DateTime<Tz>,
    /// Exclusive end, local midnight on the following month's pay date.
    pub end: DateTime<Tz>,
}

/// Resolve `(year, month, day)` with possibly out-of-range month and day into
/// a calendar date, rolling overflow forward and underflow backward.
///
/// Month 13 of 2024 is January 2025; month 0 is December 2023. A day past the
/// end of the (normalized) month rolls into the next: Feb 31 2025 is Mar 3.
pub fn normalize_date(year: i32, month: i32, day: u32) -> NaiveDate {
    let total = i64::from(year) * 12 + i64::from(month) - 1;
    let norm_year = i32::try_from(total.div_euclid(12)).expect("year within supported range");
    let norm_month = u32::try_from(total.rem_euclid(12) + 1).expect("month in 1..=12");
    let first =
        NaiveDate::from_ymd_opt(norm_year, norm_month, 1).expect("year within supported range");
    first + Duration::days(i64::from(day) - 1)
}

/// The anchor month of the period containing `now`: the current local month
/// when the local day-of-month has reached the pay day, otherwise the
/// previous month (December wraps to the prior year).
pub fn current_anchor(now: DateTime<Utc>, pay_date_day: u32, tz: Tz) -> AnchorMonth {
    let local = now.with_timezone(&tz);
    let anchor = AnchorMonth::new(local.year(), local.month());
    if local.day() >= pay_date_day {
        anchor
    } else {
        anchor.shifted(-1)
    }
}

/// The period keyed by a given anchor month.
pub fn period_for_anchor(anchor: AnchorMonth, pay_date_day: u32, tz: Tz) -> Period {
    let start = local_midnight(tz, anchor.pay_date(pay_date_day));
    let end = local_midnight(tz, anchor.shifted(1).pay_date(pay_date_day));
    Period { anchor, start, end }
}

/// The period containing `now`.
pub fn period_containing(now: DateTime<Utc>, pay_date_day: u32, tz: Tz) -> Period {
    period_for_anchor(current_anchor(now, pay_date_day, tz), pay_date_day, tz)
}

/// The period whose anchor month sits `offset` months after the month
/// anchoring the period that contains `now`. Offsets tile contiguously:
/// `period_offset(now, n).end == period_offset(now, n + 1).start`.
pub fn period_offset(now: DateTime<Utc>, offset: i32, pay_date_day: u32, tz: Tz) -> Period {
    let anchor = current_anchor(now, pay_date_day, tz).shifted(offset);
    period_for_anchor(anchor, pay_date_day, tz)
}

/// Local midnight of `date` in `tz`. When a DST transition skips midnight,
/// the earliest valid instant of that day is used instead.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let mut naive = date.and_time(NaiveTime::MIN);
    loop {
        if let Some(instant) = tz.from_local_datetime(&naive).earliest() {
            return instant;
        }
        naive += Duration::minutes(30);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
