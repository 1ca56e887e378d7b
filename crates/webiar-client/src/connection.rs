//! One socket lifetime: dial, pump frames both ways, report how it ended.

use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use webiar_wire::{ClientFrame, ServerFrame, decode, encode};

use crate::errors::ClientError;
use crate::state::{ConnectionEvent, ConnectionState, apply};

/// How a connection ended, when it ended without a transport error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionExit {
    /// The server sent a close frame.
    ServerClosed,
    /// The stream ended without a close frame.
    StreamEnded,
    /// The cancellation token fired; no reconnect should follow.
    Cancelled,
}

/// Run a single connection to the worker.
///
/// Dials `url`, publishes `Online` on success, then pumps until the
/// socket dies or `cancel` fires. Outbound frames are drained from
/// `outbound`; decoded inbound frames go to `inbound`. Undecodable
/// inbound text is logged and skipped — a bad frame must not take the
/// connection down with it.
pub(crate) async fn run_connection(
    url: &str,
    outbound: &mut mpsc::Receiver<ClientFrame>,
    inbound: &mpsc::Sender<ServerFrame>,
    status: &watch::Sender<ConnectionState>,
    cancel: &CancellationToken,
) -> Result<ConnectionExit, ClientError> {
    let (ws, _) = connect_async(url)
        .await
        .map_err(|source| ClientError::Connect {
            url: url.to_owned(),
            source,
        })?;

    let _ = apply(status, ConnectionEvent::Opened);
    info!(url, "connected to worker");

    let (mut ws_tx, mut ws_rx) = ws.split();

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                return Ok(ConnectionExit::Cancelled);
            }
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    return Err(ClientError::ChannelClosed("outbound"));
                };
                let text = encode(&frame)?;
                debug!(len = text.len(), "sending frame");
                ws_tx
                    .send(Message::Text(text.into()))
                    .await
                    .map_err(ClientError::Transport)?;
            }
            msg = ws_rx.next() => {
                match msg {
                    None => {
                        info!("stream ended");
                        return Ok(ConnectionExit::StreamEnded);
                    }
                    Some(Err(e)) => return Err(ClientError::Transport(e)),
                    Some(Ok(Message::Text(text))) => {
                        match decode(&text) {
                            Ok(frame) => {
                                let _ = apply(status, ConnectionEvent::MessageReceived);
                                if inbound.send(frame).await.is_err() {
                                    return Err(ClientError::ChannelClosed("inbound"));
                                }
                            }
                            Err(e) => warn!(error = %e, "skipping undecodable frame"),
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("server closed the connection");
                        return Ok(ConnectionExit::ServerClosed);
                    }
                    // Pings are answered by tungstenite on the next flush;
                    // binary frames are not part of this protocol.
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
