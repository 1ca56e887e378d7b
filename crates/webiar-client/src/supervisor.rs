//! Reconnect supervision with a fixed retry delay.
//!
//! The supervisor owns the socket: it dials, hands the connection its
//! channels, and whenever the connection ends — failed dial, server
//! close, transport error — waits the configured delay and dials again.
//! The retry policy is deliberately a fixed delay, forever: no backoff
//! growth, no max-retry cap, no jitter. The loop exits only on
//! cancellation or when the session side drops its channels.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use webiar_wire::{ClientFrame, ServerFrame};

use crate::connection::{ConnectionExit, run_connection};
use crate::errors::ClientError;
use crate::state::{ConnectionEvent, ConnectionState, apply};

/// Options for the reconnect supervisor.
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    /// WebSocket URL of the worker.
    pub url: String,
    /// Fixed delay between reconnect attempts.
    pub reconnect_delay: Duration,
}

/// Run the connect/reconnect loop until `cancel` fires.
///
/// `status` starts in whatever state the caller seeded (conventionally
/// [`ConnectionState::Connecting`]) and tracks the lifecycle from there.
/// At most one socket is alive at a time: a new dial only starts after
/// the previous connection has fully returned.
pub async fn run_supervisor(
    options: ConnectOptions,
    mut outbound: mpsc::Receiver<ClientFrame>,
    inbound: mpsc::Sender<ServerFrame>,
    status: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
) {
    loop {
        match run_connection(&options.url, &mut outbound, &inbound, &status, &cancel).await {
            Ok(ConnectionExit::Cancelled) => break,
            Ok(exit) => {
                debug!(?exit, "connection ended");
            }
            Err(e @ ClientError::ChannelClosed(_)) => {
                // Teardown, not a transport failure: the session side is
                // gone, so there is nobody left to reconnect for.
                info!(error = %e, "session channel closed, stopping");
                break;
            }
            Err(e) => {
                // All transport failures retry the same way; only the log
                // differs.
                warn!(error = %e, "connection failed");
                let _ = apply(&status, ConnectionEvent::Errored);
            }
        }

        let _ = apply(&status, ConnectionEvent::Closed);
        info!(
            delay_ms = options.reconnect_delay.as_millis(),
            "offline, reconnect scheduled"
        );

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(options.reconnect_delay) => {
                let _ = apply(&status, ConnectionEvent::RetryElapsed);
            }
        }
    }

    info!("supervisor stopped");
}
