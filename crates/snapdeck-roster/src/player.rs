//! A single player's identity and draw history.

use serde::{Deserialize, Serialize};
use snapdeck_protocol::{PeerId, PlayerId};

/// One participant in the session.
///
/// Created when a peer announces presence, removed when it disconnects.
/// `cards` is the append-only history of deck indices the player has
/// drawn — the authoritative "who drew what" ledger lives in the host's
/// copies of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Host-assigned game id, unique within the session.
    pub id: PlayerId,
    /// Human-readable display name.
    pub name: String,
    /// The peer's transport identity hash.
    pub identity: PeerId,
    /// Set once the peer has announced it is ready to play.
    pub joined: bool,
    /// Deck indices drawn so far, oldest first.
    cards: Vec<u8>,
}

impl Player {
    /// Creates a fresh, not-yet-joined player with an empty hand.
    pub fn new(id: PlayerId, name: impl Into<String>, identity: PeerId) -> Self {
        Self {
            id,
            name: name.into(),
            identity,
            joined: false,
            cards: Vec::new(),
        }
    }

    /// Appends a drawn deck index to the player's history.
    pub fn draw_card(&mut self, deck_index: u8) {
        self.cards.push(deck_index);
    }

    /// The newest card in the player's hand, if any.
    pub fn last_card(&self) -> Option<u8> {
        self.cards.last().copied()
    }

    /// Total cards drawn so far.
    pub fn cards_held(&self) -> usize {
        self.cards.len()
    }

    /// The full draw history, oldest first.
    pub fn cards(&self) -> &[u8] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_starts_unjoined_with_empty_hand() {
        let player = Player::new(PlayerId(0), "alice", PeerId(1));
        assert!(!player.joined);
        assert_eq!(player.cards_held(), 0);
        assert_eq!(player.last_card(), None);
    }

    #[test]
    fn test_draw_card_appends_in_order() {
        let mut player = Player::new(PlayerId(0), "alice", PeerId(1));
        player.draw_card(4);
        player.draw_card(9);
        assert_eq!(player.cards(), &[4, 9]);
        assert_eq!(player.last_card(), Some(9));
        assert_eq!(player.cards_held(), 2);
    }
}
