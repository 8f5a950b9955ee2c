//! Unified error type for the server crate.

use duomatch_room::RoomError;
use duomatch_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps the layer-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls, so
/// `?` converts lower-layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A room-layer error; from this crate that is only ever
    /// [`RoomError::Unavailable`] — the matchmaker stopped.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Environment configuration was invalid at startup.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
