//! Frame codec errors.

use thiserror::Error;

/// Errors from encoding or decoding a wire frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// An outbound frame failed to serialize.
    #[error("failed to encode frame: {source}")]
    Encode {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// An inbound frame was malformed: invalid JSON, a missing field,
    /// or an unrecognized `type` tag.
    #[error("failed to decode frame: {source}")]
    Decode {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}
