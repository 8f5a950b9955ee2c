//! WebSocket listener and connection types, built on `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use duomatch_protocol::ConnectionId;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

use crate::TransportError;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;

/// Listens for incoming WebSocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds a listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self { listener })
    }

    /// Returns the local address the listener is bound to.
    ///
    /// Binding to port 0 and reading the address back is how tests get a
    /// free port.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for and accepts the next incoming connection.
    pub async fn accept(&self) -> Result<WsConnection, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            TransportError::AcceptFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;

        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        Ok(WsConnection { id, ws })
    }
}

/// A single accepted WebSocket connection.
pub struct WsConnection {
    id: ConnectionId,
    ws: WsStream,
}

impl WsConnection {
    /// Returns the unique identifier for this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Splits the connection into independent sender and receiver halves.
    ///
    /// The halves can live on different tasks, so outbound events are never
    /// queued behind a read that is still waiting for the client.
    pub fn split(self) -> (WsSender, WsReceiver) {
        let (sink, stream) = self.ws.split();
        (WsSender { sink }, WsReceiver { stream })
    }
}

/// The writing half of a connection.
pub struct WsSender {
    sink: SplitSink<WsStream, Message>,
}

impl WsSender {
    /// Sends one text frame to the remote peer.
    pub async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        self.sink
            .send(Message::text(text))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
                ))
            })
    }

    /// Sends a close frame to the remote peer.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.sink.close().await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }
}

/// The reading half of a connection.
pub struct WsReceiver {
    stream: SplitStream<WsStream>,
}

impl WsReceiver {
    /// Receives the next text frame from the remote peer.
    ///
    /// Binary frames carrying valid UTF-8 are accepted as text; control
    /// frames (ping/pong) are handled internally. Returns `Ok(None)` when
    /// the connection is cleanly closed.
    pub async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    let text = String::from_utf8(data.into()).map_err(|e| {
                        TransportError::ReceiveFailed(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            e,
                        ))
                    })?;
                    return Ok(Some(text));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }
}
