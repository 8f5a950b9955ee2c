//! Wire protocol for Duomatch.
//!
//! This crate defines the vocabulary that clients and the server share:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Mark`], [`RoomPhase`],
//!   [`RoomSnapshot`], etc.) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those events are
//!   converted to and from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding.
//!
//! The protocol layer sits between transport (frames) and the room layer
//! (match state). It doesn't know about sockets or registries — it only
//! knows how to name and serialize events.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ClientEvent, ConnectionId, Mark, ParticipantInfo, RoomPhase,
    RoomSnapshot, ServerEvent,
};
