//! # Duomatch
//!
//! Realtime matchmaking and turn-relay server for a two-player symbol
//! game. Two WebSocket clients are paired into a named room, each is
//! assigned one of two marks, and move payloads and turn signals are
//! relayed between them until the game ends or a player disconnects.
//!
//! This crate is the boundary layer: it accepts connections, decodes
//! client events, and pumps server events back out. All match state lives
//! in the [`duomatch_room`] matchmaker behind a command channel.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use duomatch::{ServerBuilder, ServerError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let server = ServerBuilder::new().bind("0.0.0.0:8080").build().await?;
//!     server.run().await
//! }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::ServerError;
pub use server::{Server, ServerBuilder};
