//! The session phase state machine.

use std::fmt;

/// The lifecycle phase of a session on one device.
///
/// ```text
/// Lobby ──(StartGame received, or host's start)──→ Playing
/// ```
///
/// - **Lobby**: peers are discovering each other, the host is admitting
///   players and assigning ids, join announcements are collected.
/// - **Playing**: the deck is live; only round events mutate state.
///
/// There is no transition back: a session that loses its host ends, it
/// never returns to the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Lobby,
    Playing,
}

impl GamePhase {
    /// Returns `true` while the session is still assembling players.
    pub fn is_lobby(self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` once the round is live.
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Playing => write!(f, "Playing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_predicates() {
        assert!(GamePhase::Lobby.is_lobby());
        assert!(!GamePhase::Lobby.is_playing());
        assert!(GamePhase::Playing.is_playing());
        assert!(!GamePhase::Playing.is_lobby());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(GamePhase::Lobby.to_string(), "Lobby");
        assert_eq!(GamePhase::Playing.to_string(), "Playing");
    }
}
