//! WebSocket transport for Duomatch.
//!
//! Accepts incoming connections, stamps each with a process-unique
//! [`ConnectionId`](duomatch_protocol::ConnectionId), and exposes split
//! sender/receiver halves so a connection can be pumped by independent
//! reader and writer tasks. One frame carries one JSON event; framing and
//! delivery are this crate's whole job — it never looks inside a frame.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsConnection, WsListener, WsReceiver, WsSender};
