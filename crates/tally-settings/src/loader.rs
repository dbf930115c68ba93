//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply `TALLY_*` environment variable overrides (highest priority)
//! 4. Validate the merged result; range or zone errors are fatal
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tally_core::PlacementPolicy;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::Settings;

/// Resolve the path to the settings file (`~/.tally/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tally").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<Settings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, starts from defaults. Invalid JSON, an
/// unrecognized placement policy, an unknown time zone, or an out-of-range
/// anchor day are all errors — startup configuration problems are fatal.
pub fn load_settings_from_path(path: &Path) -> Result<Settings> {
    let defaults = serde_json::to_value(Settings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: Settings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings)?;
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Numeric overrides are range-checked; invalid values are logged and
/// ignored, falling back to the file/default value. The placement policy
/// selector is the exception: an unrecognized value there is a fatal
/// configuration error, not a silent fallback.
pub fn apply_env_overrides(settings: &mut Settings) -> Result<()> {
    if let Some(v) = read_env_string("TALLY_PLACEMENT_POLICY") {
        settings.placement_policy = PlacementPolicy::parse(&v).ok_or_else(|| {
            SettingsError::InvalidValue(format!("unrecognized placement policy {v:?}"))
        })?;
    }
    if let Some(v) = read_env_u32("TALLY_PAY_DATE_DAY", 1, 31) {
        settings.pay_date_day = v;
    }
    if let Some(v) = read_env_string("TALLY_TIME_ZONE") {
        settings.time_zone = v;
    }
    if let Some(v) = read_env_u64("TALLY_TICK_MINUTES", 1, 10_080) {
        settings.tick_interval_minutes = v;
    }
    if let Some(v) = read_env_string("TALLY_CALENDAR_ID") {
        settings.calendar_id = v;
    }
    if let Some(v) = read_env_string("TALLY_LOG_LEVEL") {
        settings.log_level = v;
    }
    Ok(())
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings.pay_date_day, Settings::default().pay_date_day);
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"payDateDay": 16, "placementPolicy": "pay-date"}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.pay_date_day, 16);
        assert_eq!(
            settings.placement_policy,
            tally_core::PlacementPolicy::PayDate
        );
        // Untouched fields keep defaults.
        assert_eq!(settings.calendar_id, "primary");
    }

    #[test]
    fn invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn unrecognized_policy_in_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"placementPolicy": "fortnightly"}"#).unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn out_of_range_day_in_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"payDateDay": 45}"#).unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn unknown_zone_in_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"timeZone": "Nowhere/Imaginary"}"#).unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn deep_merge_objects_recursively() {
        let target = serde_json::json!({"a": {"x": 1, "y": 2}, "b": 3});
        let source = serde_json::json!({"a": {"y": 20}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"]["x"], 1);
        assert_eq!(merged["a"]["y"], 20);
        assert_eq!(merged["b"], 3);
    }

    #[test]
    fn deep_merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn deep_merge_primitives_replace() {
        let merged = deep_merge(serde_json::json!(1), serde_json::json!(2));
        assert_eq!(merged, serde_json::json!(2));
    }

    #[test]
    fn parse_u32_range_bounds() {
        assert_eq!(parse_u32_range("16", 1, 31), Some(16));
        assert_eq!(parse_u32_range("1", 1, 31), Some(1));
        assert_eq!(parse_u32_range("31", 1, 31), Some(31));
        assert_eq!(parse_u32_range("0", 1, 31), None);
        assert_eq!(parse_u32_range("32", 1, 31), None);
        assert_eq!(parse_u32_range("sixteen", 1, 31), None);
        assert_eq!(parse_u32_range("-4", 1, 31), None);
    }

    #[test]
    fn parse_u64_range_bounds() {
        assert_eq!(parse_u64_range("60", 1, 10_080), Some(60));
        assert_eq!(parse_u64_range("0", 1, 10_080), None);
        assert_eq!(parse_u64_range("99999", 1, 10_080), None);
    }

    #[test]
    fn env_policy_override_applies_and_validates() {
        let mut settings = Settings::default();
        // No env var set: untouched.
        apply_env_overrides(&mut settings).unwrap();
        assert_eq!(
            settings.placement_policy,
            tally_core::PlacementPolicy::EndOfMonth
        );
    }

    #[test]
    fn settings_path_under_tally_dir() {
        let path = settings_path();
        assert!(path.to_string_lossy().contains(".tally"));
        assert!(path.to_string_lossy().ends_with("settings.json"));
    }
}
