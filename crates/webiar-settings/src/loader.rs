//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. If `~/.webiar/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `WEBIAR_*` environment overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::Settings;

/// Resolve the path to the settings file (`~/.webiar/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".webiar").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<Settings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
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
    apply_env_overrides(&mut settings);
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
/// Each env var has strict parsing rules; invalid values are silently
/// ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup` — the process environment in
/// production, a plain table in tests.
fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("WEBIAR_SERVER_URL").and_then(parse_string) {
        settings.server.url = v;
    }
    if let Some(v) = lookup("WEBIAR_RECONNECT_DELAY_MS").and_then(|v| parse_u64(&v, 1, 3_600_000))
    {
        settings.server.reconnect_delay_ms = v;
    }
    if let Some(v) = lookup("WEBIAR_PREVIEW_HOST").and_then(parse_string) {
        settings.preview.host = v;
    }
    if let Some(v) = lookup("WEBIAR_PREVIEW_PORT").and_then(|v| parse_u16(&v, 0, 65535)) {
        settings.preview.port = v;
    }
    if let Some(v) = lookup("WEBIAR_LOG_LEVEL").and_then(parse_string) {
        settings.logging.level = v;
    }
}

/// Non-empty trimmed string, or `None`.
fn parse_string(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an integer within `[min, max]`, or `None`.
fn parse_u64(value: &str, min: u64, max: u64) -> Option<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

/// Parse a port-sized integer within `[min, max]`, or `None`.
fn parse_u16(value: &str, min: u16, max: u16) -> Option<u16> {
    value
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::DEFAULT_SERVER_URL;

    #[test]
    fn missing_file_returns_defaults() {
        let settings =
            load_settings_from_path(Path::new("/nonexistent/webiar/settings.json")).unwrap();
        assert_eq!(settings.server.url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"server":{{"url":"ws://localhost:8080/ws"}},"preview":{{"port":4000}}}}"#
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.url, "ws://localhost:8080/ws");
        assert_eq!(settings.preview.port, 4000);
        // Untouched keys keep their defaults
        assert_eq!(settings.server.reconnect_delay_ms, 3000);
        assert_eq!(settings.preview.host, "127.0.0.1");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{broken").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn deep_merge_merges_objects_per_key() {
        let target = serde_json::json!({"a": {"x": 1, "y": 2}});
        let source = serde_json::json!({"a": {"y": 3}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"]["x"], 1);
        assert_eq!(merged["a"]["y"], 3);
    }

    #[test]
    fn deep_merge_replaces_arrays_and_primitives() {
        let target = serde_json::json!({"list": [1, 2, 3], "n": 1});
        let source = serde_json::json!({"list": [9], "n": 2});
        let merged = deep_merge(target, source);
        assert_eq!(merged["list"], serde_json::json!([9]));
        assert_eq!(merged["n"], 2);
    }

    #[test]
    fn deep_merge_skips_nulls() {
        let target = serde_json::json!({"keep": "me"});
        let source = serde_json::json!({"keep": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["keep"], "me");
    }

    #[test]
    fn deep_merge_adds_new_keys() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"b": 2});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn overrides_map_every_variable_to_its_field() {
        let mut settings = Settings::default();
        apply_overrides(
            &mut settings,
            lookup_from(&[
                ("WEBIAR_SERVER_URL", "ws://localhost:7777/ws"),
                ("WEBIAR_RECONNECT_DELAY_MS", "500"),
                ("WEBIAR_PREVIEW_HOST", "0.0.0.0"),
                ("WEBIAR_PREVIEW_PORT", "4000"),
                ("WEBIAR_LOG_LEVEL", "debug"),
            ]),
        );
        assert_eq!(settings.server.url, "ws://localhost:7777/ws");
        assert_eq!(settings.server.reconnect_delay_ms, 500);
        assert_eq!(settings.preview.host, "0.0.0.0");
        assert_eq!(settings.preview.port, 4000);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn invalid_override_values_are_ignored() {
        let mut settings = Settings::default();
        apply_overrides(
            &mut settings,
            lookup_from(&[
                ("WEBIAR_RECONNECT_DELAY_MS", "soon"),
                ("WEBIAR_PREVIEW_PORT", "99999"),
                ("WEBIAR_SERVER_URL", "   "),
            ]),
        );
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn absent_variables_leave_settings_untouched() {
        let mut settings = Settings::default();
        settings.server.url = "ws://from-file/ws".into();
        apply_overrides(&mut settings, lookup_from(&[]));
        assert_eq!(settings.server.url, "ws://from-file/ws");
        assert_eq!(settings.server.reconnect_delay_ms, 3000);
    }

    #[test]
    fn override_beats_file_value() {
        let mut settings = Settings::default();
        settings.server.url = "ws://from-file/ws".into();
        apply_overrides(
            &mut settings,
            lookup_from(&[("WEBIAR_SERVER_URL", "ws://from-env/ws")]),
        );
        assert_eq!(settings.server.url, "ws://from-env/ws");
    }

    #[test]
    fn parse_u64_rejects_out_of_range() {
        assert_eq!(parse_u64("0", 1, 100), None);
        assert_eq!(parse_u64("101", 1, 100), None);
        assert_eq!(parse_u64("50", 1, 100), Some(50));
    }

    #[test]
    fn parse_u64_rejects_garbage() {
        assert_eq!(parse_u64("soon", 1, 100), None);
        assert_eq!(parse_u64("", 1, 100), None);
        assert_eq!(parse_u64("-3", 1, 100), None);
    }

    #[test]
    fn parse_u16_accepts_zero_port() {
        assert_eq!(parse_u16("0", 0, 65535), Some(0));
        assert_eq!(parse_u16("65536", 0, 65535), None);
    }

    #[test]
    fn parse_string_rejects_blank() {
        assert_eq!(parse_string("  ".into()), None);
        assert_eq!(parse_string("ws://x".into()), Some("ws://x".into()));
    }
}
