//! Server builder and accept loop.
//!
//! Ties the layers together: transport (WebSocket listener) → protocol
//! (JSON codec) → room (matchmaker actor). One handler task per accepted
//! connection; all of them talk to the single matchmaker through its
//! command channel.

use duomatch_protocol::JsonCodec;
use duomatch_room::{MatchConfig, MatchmakerHandle, spawn_matchmaker};
use duomatch_transport::WsListener;

use crate::ServerError;
use crate::handler::handle_connection;

/// Builder for configuring and starting a Duomatch server.
///
/// # Example
///
/// ```rust,no_run
/// use duomatch::ServerBuilder;
///
/// # async fn run() -> Result<(), duomatch::ServerError> {
/// let server = ServerBuilder::new().bind("0.0.0.0:8080").build().await?;
/// server.run().await
/// # }
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    match_config: MatchConfig,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            match_config: MatchConfig::default(),
        }
    }

    /// Sets the address to bind the listener to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the matchmaker configuration.
    pub fn match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Binds the listener and spawns the matchmaker.
    pub async fn build(self) -> Result<Server, ServerError> {
        let listener = WsListener::bind(&self.bind_addr).await?;
        let matchmaker = spawn_matchmaker(self.match_config);

        Ok(Server { listener, matchmaker, codec: JsonCodec })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Duomatch server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server {
    listener: WsListener,
    matchmaker: MatchmakerHandle,
    codec: JsonCodec,
}

impl Server {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns a handler task for each incoming connection. Runs until the
    /// process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("duomatch server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let matchmaker = self.matchmaker.clone();
                    let codec = self.codec;
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, matchmaker, codec).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
