//! Engine configuration.

use std::time::Duration;

use chrono_tz::Tz;
use tally_core::PlacementPolicy;
use tally_settings::{Settings, SettingsError};

/// Validated, parsed configuration the engine runs with.
///
/// Built once at startup from [`Settings`]; the string-typed zone has
/// already been resolved to a [`Tz`], so nothing in the engine can hit a
/// configuration error at runtime.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Where in a period the generated total is placed.
    pub placement_policy: PlacementPolicy,
    /// Anchor day-of-month delimiting billing periods.
    pub pay_date_day: u32,
    /// Zone for all period arithmetic.
    pub time_zone: Tz,
    /// Delay between the end of one pass and the start of the next.
    pub tick_interval: Duration,
}

impl EngineConfig {
    /// Parse settings into an engine configuration.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        Ok(Self {
            placement_policy: settings.placement_policy,
            pay_date_day: settings.pay_date_day,
            time_zone: settings.time_zone()?,
            tick_interval: settings.tick_interval(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
