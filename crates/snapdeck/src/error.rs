//! Error types for the game core.

use snapdeck_cards::DeckError;
use snapdeck_protocol::ProtocolError;

use crate::GamePhase;

/// Errors surfaced by the game core's fallible operations.
///
/// Note the deliberate asymmetry with inbound handling: malformed
/// frames, stale claims, and unknown-peer references arriving off the
/// wire are logged and dropped inside the manager, never returned —
/// a misbehaving peer must not be able to error out everyone else's
/// state machine.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Deck generation failed (invalid order).
    #[error(transparent)]
    Deck(#[from] DeckError),

    /// A message could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A host-only operation was invoked on a follower.
    #[error("operation requires the host role")]
    NotHost,

    /// The operation is not valid in the current phase.
    #[error("operation not valid in phase {0}")]
    InvalidPhase(GamePhase),
}
