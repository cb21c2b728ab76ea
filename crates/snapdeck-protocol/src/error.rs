//! Error types for the protocol layer.
//!
//! Each crate in Snapdeck defines its own error enum. A `ProtocolError`
//! always means a message could not be encoded or decoded — never a game
//! rule violation (those live in the game crate).

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a structured message to JSON failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A structured message could not be parsed from JSON.
    ///
    /// Common causes: malformed JSON, a missing `event` tag, or a
    /// `data` payload whose shape doesn't match the event.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A binary frame declared an event code this protocol doesn't know.
    #[error("unknown event code {0}")]
    UnknownEvent(u8),

    /// A binary frame is shorter than the minimum length its event
    /// requires, or its record area contains a partial record.
    #[error("truncated frame: need at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}
