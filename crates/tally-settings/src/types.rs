//! Settings types and validation.

use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tally_core::PlacementPolicy;

use crate::errors::{Result, SettingsError};

/// Process-wide configuration, loaded once at startup and immutable after.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Where in a period the generated total is placed.
    pub placement_policy: PlacementPolicy,
    /// Anchor day-of-month delimiting billing periods (1–31).
    pub pay_date_day: u32,
    /// IANA zone name used for all period arithmetic.
    pub time_zone: String,
    /// Minutes between reconciliation passes.
    pub tick_interval_minutes: u64,
    /// Calendar the daemon operates on.
    pub calendar_id: String,
    /// Default tracing filter (overridden by `RUST_LOG`).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            placement_policy: PlacementPolicy::EndOfMonth,
            pay_date_day: 1,
            time_zone: "UTC".to_string(),
            tick_interval_minutes: 60,
            calendar_id: "primary".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Range-check every field that serde cannot reject on its own.
    ///
    /// Called by the loader after merging; a failure here is fatal at
    /// startup.
    pub fn validate(&self) -> Result<()> {
        if !(1..=31).contains(&self.pay_date_day) {
            return Err(SettingsError::InvalidValue(format!(
                "payDateDay must be 1-31, got {}",
                self.pay_date_day
            )));
        }
        if self.tick_interval_minutes == 0 {
            return Err(SettingsError::InvalidValue(
                "tickIntervalMinutes must be positive".to_string(),
            ));
        }
        if self.calendar_id.is_empty() {
            return Err(SettingsError::InvalidValue(
                "calendarId must not be empty".to_string(),
            ));
        }
        let _ = self.time_zone()?;
        Ok(())
    }

    /// Parse the configured zone name.
    pub fn time_zone(&self) -> Result<Tz> {
        Tz::from_str(&self.time_zone).map_err(|_| {
            SettingsError::InvalidValue(format!("unknown time zone {:?}", self.time_zone))
        })
    }

    /// The tick interval as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_minutes * 60)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
