//! Client errors.

use thiserror::Error;
use tokio_tungstenite::tungstenite;
use webiar_wire::FrameError;

/// Errors from the connection layer.
///
/// Every variant is treated as transient by the supervisor: the
/// connection is torn down, the failure is logged, and a reconnect is
/// scheduled after the fixed delay. Nothing is surfaced to the user
/// beyond the offline indicator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The initial dial failed.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        /// The URL that was dialed.
        url: String,
        /// Underlying tungstenite error.
        #[source]
        source: tungstenite::Error,
    },

    /// The established socket failed mid-stream.
    #[error("websocket transport error: {0}")]
    Transport(#[source] tungstenite::Error),

    /// A frame failed to encode or decode.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// An internal channel closed; the owning task is gone.
    #[error("{0} channel closed")]
    ChannelClosed(&'static str),
}
