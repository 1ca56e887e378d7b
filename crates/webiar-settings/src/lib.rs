//! # webiar-settings
//!
//! Configuration for the webiar client, loaded from three layers
//! (in priority order):
//!
//! 1. **Compiled defaults** — [`Settings::default()`]
//! 2. **User file** — `~/.webiar/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `WEBIAR_*` overrides (highest priority)
//!
//! The file may be partial; anything it doesn't set keeps its default.
//! Invalid env var values are silently ignored.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{LoggingSettings, PreviewSettings, ServerSettings, Settings};
