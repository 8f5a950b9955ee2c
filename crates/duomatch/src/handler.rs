//! Per-connection handler: event decoding and outbound delivery.
//!
//! Each accepted connection gets its own task running [`handle_connection`].
//! The flow is:
//!   1. Register an outbound channel with the matchmaker (which greets the
//!      client with `connected`)
//!   2. Spawn a writer task pumping server events to the socket
//!   3. Loop: decode text frames into client events and forward them
//!   4. On close or error, tell the matchmaker the connection is gone

use duomatch_protocol::{ClientEvent, Codec, ConnectionId, ServerEvent};
use duomatch_room::MatchmakerHandle;
use duomatch_transport::WsConnection;
use tokio::sync::mpsc;

use crate::ServerError;

/// Drop guard that reports the disconnect when the handler exits.
///
/// This keeps the registry honest even if the handler unwinds: the room the
/// connection was in is torn down and its peer is notified. Since `Drop` is
/// synchronous, the async notification is fired from a detached task.
struct DisconnectGuard {
    conn: ConnectionId,
    matchmaker: MatchmakerHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let conn = self.conn;
        let matchmaker = self.matchmaker.clone();
        tokio::spawn(async move {
            let _ = matchmaker.disconnect(conn).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WsConnection,
    matchmaker: MatchmakerHandle,
    codec: impl Codec + Clone,
) -> Result<(), ServerError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ServerEvent>();
    matchmaker.connect(conn_id, event_tx).await?;
    let guard = DisconnectGuard { conn: conn_id, matchmaker: matchmaker.clone() };

    let (mut sender, mut receiver) = conn.split();

    // Writer task: drains outbound events until the matchmaker drops this
    // connection's channel (on disconnect) or the socket dies.
    let writer_codec = codec.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let text = match writer_codec.encode(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        %conn_id, error = %e, "failed to encode server event"
                    );
                    continue;
                }
            };
            if sender.send(&text).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Read loop: decode-or-skip. A frame that isn't a known client event
    // is logged and dropped; the connection stays up.
    loop {
        match receiver.recv().await {
            Ok(Some(text)) => match codec.decode::<ClientEvent>(&text) {
                Ok(event) => matchmaker.inbound(conn_id, event).await?,
                Err(e) => {
                    tracing::debug!(
                        %conn_id, error = %e, "undecodable client event"
                    );
                }
            },
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        }
    }

    // Dropping the guard reports the disconnect; the matchmaker removes
    // this connection's channel and the writer task winds down.
    drop(guard);
    let _ = writer.await;
    Ok(())
}
