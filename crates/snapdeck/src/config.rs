//! Game configuration.

/// Per-device configuration for one session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Display name announced to other peers.
    pub player_name: String,

    /// Deck order `p` (must behave like a prime; the generated deck has
    /// p² + p + 1 cards). Only the host's value matters — followers use
    /// whatever deck the host broadcasts.
    pub deck_order: u8,

    /// Whether this device hosts the session: advertises the lobby,
    /// assigns player ids, generates the deck, and adjudicates claims.
    pub is_host: bool,

    /// Fixed shuffle seed. `None` seeds from the OS; set it in tests for
    /// reproducible decks.
    pub shuffle_seed: Option<u64>,
}

impl GameConfig {
    /// A follower configuration with the default deck order.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            ..Self::default()
        }
    }

    /// A host configuration with the default deck order.
    pub fn host(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            is_host: true,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: "player".to_string(),
            deck_order: 7,
            is_host: false,
            shuffle_seed: None,
        }
    }
}
