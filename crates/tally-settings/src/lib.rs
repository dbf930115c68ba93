//! # tally-settings
//!
//! Configuration management with layered sources for the tally daemon.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`Settings::default()`]
//! 2. **User file** — `~/.tally/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `TALLY_*` overrides (highest priority)
//!
//! Range and selector validation happens once, at load time; an unrecognized
//! placement policy or time zone is a fatal startup error.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::Settings;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
