//! The scoreboard: the roster registry for one session.

use snapdeck_protocol::{PeerId, PlayerId};

use crate::Player;

/// Owns the mapping from transport identity to [`Player`].
///
/// Players are kept in insertion order (join order), unique by
/// transport identity. Ids count up monotonically and are never reused,
/// even after a removal — a stale frame referencing a departed player
/// must not silently hit a newcomer. Once all 256 ids are spent the
/// scoreboard refuses further admissions.
#[derive(Debug, Default)]
pub struct Scoreboard {
    players: Vec<Player>,
    /// Wider than [`PlayerId`] so exhaustion is a refusal, not a wrap.
    next_id: u16,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a peer, assigning the next sequential id.
    ///
    /// Idempotent by identity: returns `Some(new_id)` only the first
    /// time an identity is seen, `None` on re-announcement. Also `None`
    /// once the id space is exhausted (256 admissions, counting
    /// departed players).
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        identity: PeerId,
    ) -> Option<PlayerId> {
        if self.player_by_identity(identity).is_some() {
            tracing::debug!(%identity, "peer re-announced, keeping existing entry");
            return None;
        }
        let Ok(id) = u8::try_from(self.next_id) else {
            tracing::warn!(%identity, "player id space exhausted, admission refused");
            return None;
        };
        let id = PlayerId(id);
        self.next_id += 1;
        let player = Player::new(id, name, identity);
        tracing::info!(%identity, player_id = %id, name = %player.name, "player added");
        self.players.push(player);
        Some(id)
    }

    /// Deletes the player with this identity. No-op if absent.
    pub fn remove_player(&mut self, identity: PeerId) -> Option<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.identity == identity)?;
        let player = self.players.remove(index);
        tracing::info!(%identity, player_id = %player.id, "player removed");
        Some(player)
    }

    /// Marks an existing player as joined.
    ///
    /// Returns `false` if the identity is unknown — a join announcement
    /// can legitimately arrive independently of roster sync, and the
    /// caller decides whether to drop it.
    pub fn player_is_joining(&mut self, identity: PeerId) -> bool {
        match self.player_by_identity_mut(identity) {
            Some(player) => {
                player.joined = true;
                true
            }
            None => false,
        }
    }

    /// `true` only when the roster is non-empty and every player's
    /// joined flag is set.
    pub fn has_everybody_joined(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.joined)
    }

    /// The roster in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Mutable roster access, join order preserved.
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Looks up a player by transport identity.
    pub fn player_by_identity(&self, identity: PeerId) -> Option<&Player> {
        self.players.iter().find(|p| p.identity == identity)
    }

    fn player_by_identity_mut(&mut self, identity: PeerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.identity == identity)
    }

    /// Looks up a player by game id.
    pub fn player_by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Mutable lookup by game id.
    pub fn player_by_id_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Player names in join order, for `PeerList` snapshots.
    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Number of players on the roster.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if no players are known.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
