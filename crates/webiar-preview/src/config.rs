//! Preview server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the preview server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
        }
    }
}
