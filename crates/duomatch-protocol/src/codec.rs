//! Codec trait and the JSON implementation.
//!
//! A codec converts between event types and the text that travels in a
//! WebSocket frame. The rest of the stack only sees the [`Codec`] trait, so
//! a binary format could be swapped in without touching the router or the
//! room layer.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes events to frame text and decodes frame text back into events.
///
/// `Send + Sync + 'static` because a codec is shared across the server's
/// connection tasks for the whole process lifetime.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into the text of one frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one frame's text back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the text is malformed or does
    /// not match the expected event shape.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that speaks JSON via `serde_json`.
///
/// Human-readable frames: events can be inspected in browser DevTools and
/// pasted straight into tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
