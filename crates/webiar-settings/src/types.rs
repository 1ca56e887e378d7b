//! Settings schema and compiled defaults.

use serde::{Deserialize, Serialize};

/// Default worker endpoint the client dials.
pub const DEFAULT_SERVER_URL: &str = "wss://webiar.mizulegendsstudios.workers.dev/ws";

/// Fixed delay between reconnect attempts, in milliseconds.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;

/// Top-level settings for the webiar client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Remote worker connection settings.
    pub server: ServerSettings,
    /// Local preview server settings.
    pub preview: PreviewSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            preview: PreviewSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Connection settings for the remote worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// WebSocket URL of the worker.
    pub url: String,
    /// Delay between reconnect attempts in milliseconds. The retry policy
    /// is a fixed delay, forever — no backoff, no cap.
    pub reconnect_delay_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.into(),
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

/// Local preview HTTP server settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind (`0` for auto-assign).
    pub port: u16,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default tracing filter (overridden by `RUST_LOG`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}
