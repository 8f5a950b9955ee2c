//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into frame text).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed. Common causes: malformed JSON, an unknown
    /// event tag, or missing required fields.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
