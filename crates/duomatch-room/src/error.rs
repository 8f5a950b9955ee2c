//! Error types for the room layer.
//!
//! Every variant is recoverable and local to one request: the matchmaker
//! turns these into `{success: false, message}` responses for the
//! originating connection, and the process carries on.

use duomatch_protocol::ConnectionId;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room name is missing or too short.
    #[error("room name must be at least 2 characters")]
    InvalidName,

    /// A live room already holds this name.
    #[error("room \"{0}\" already exists")]
    AlreadyExists(String),

    /// No live room has this name.
    #[error("room \"{0}\" not found")]
    NotFound(String),

    /// Both participant slots are occupied.
    #[error("room \"{0}\" is full")]
    RoomFull(String),

    /// A connection tried to join the room it created.
    #[error("cannot join a room you created")]
    SelfJoin,

    /// The connection already participates in a live room.
    #[error("connection {0} is already in room \"{1}\"")]
    AlreadyInRoom(ConnectionId, String),

    /// A lookup found no room or no opponent for this connection.
    #[error("connection {0} is not in any room")]
    UnknownConnection(ConnectionId),

    /// The matchmaker's command channel is closed.
    #[error("matchmaker is unavailable")]
    Unavailable,
}
