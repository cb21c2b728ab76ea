//! The game state machine: one [`GameManager`] per device.
//!
//! The manager owns every piece of mutable session state — the deck,
//! the scoreboard, and the session cursors — and is the single place
//! where inbound protocol messages are interpreted. It is synchronous
//! and single-threaded by design: the transport contract guarantees
//! deliveries arrive one at a time, so no locking happens here.
//!
//! Authority model: the host is the only writer of turn/draw state.
//! Followers emit claims and mirror the host's `CardsBatch` broadcasts;
//! they never advance the ledger themselves. Because broadcasts are not
//! looped back to their sender, the emitting device applies each
//! frame's effect locally at the point of emission.

use rand::rngs::StdRng;
use rand::SeedableRng;

use snapdeck_cards::Deck;
use snapdeck_protocol::{
    PeerId, PlayerId, PlayerRecord, Recipient, RoundMessage, StructuredMessage,
};
use snapdeck_roster::Scoreboard;
use snapdeck_transport::{Inbound, PeerTransport};

use crate::{
    DeckObserver, GameConfig, GameError, GamePhase, WaitingRoomObserver,
};

/// The per-device orchestrator for one session.
pub struct GameManager<T: PeerTransport> {
    transport: T,
    config: GameConfig,
    phase: GamePhase,
    scoreboard: Scoreboard,

    /// The session deck: generated by the host, received by followers.
    deck: Option<Deck>,

    /// Next unissued deck index. Host authority; followers mirror it
    /// from `CardsBatch` broadcasts.
    current_card: u8,
    /// Deck index of the card currently on the shared table.
    current_deck_card: u8,
    /// Deck index of the local player's current hand card.
    current_player_card: u8,

    /// The id the host assigned to this device. The host knows its own
    /// immediately; followers learn theirs from `PlayerIdAssigned`.
    my_game_id: PlayerId,
    /// The host's transport identity, once known. Departure of this
    /// peer is fatal to the session.
    host_identity: Option<PeerId>,

    rng: StdRng,
    deck_observer: Option<Box<dyn DeckObserver>>,
    waiting_room: Option<Box<dyn WaitingRoomObserver>>,
}

impl<T: PeerTransport> GameManager<T> {
    /// Creates a manager and seats the local player on its own roster.
    ///
    /// A host starts advertising immediately and records itself as the
    /// session's host identity.
    pub fn new(transport: T, config: GameConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let local = transport.local_identity();
        let mut scoreboard = Scoreboard::new();
        // The first admission into a fresh scoreboard always yields id 0.
        let my_game_id = scoreboard
            .add_player(config.player_name.clone(), local)
            .unwrap_or(PlayerId(0));

        let host_identity = config.is_host.then_some(local);
        if config.is_host {
            transport.begin_hosting();
        }

        Self {
            transport,
            config,
            phase: GamePhase::Lobby,
            scoreboard,
            deck: None,
            current_card: 0,
            current_deck_card: 0,
            current_player_card: 0,
            my_game_id,
            host_identity,
            rng,
            deck_observer: None,
            waiting_room: None,
        }
    }

    /// Installs the in-round view observer.
    pub fn set_deck_observer(&mut self, observer: Box<dyn DeckObserver>) {
        self.deck_observer = Some(observer);
    }

    /// Installs the lobby view observer.
    pub fn set_waiting_room_observer(
        &mut self,
        observer: Box<dyn WaitingRoomObserver>,
    ) {
        self.waiting_room = Some(observer);
    }

    // -- Local actions ------------------------------------------------------

    /// Announces that the local player is ready to play.
    ///
    /// On the host this may complete the lobby and start the game.
    pub fn join_game(&mut self) {
        let local = self.transport.local_identity();
        self.scoreboard.player_is_joining(local);
        self.transport.send_structured(
            Recipient::All,
            &StructuredMessage::JoinGame { identity: local },
        );
        if self.config.is_host {
            self.try_start();
        }
    }

    /// Starts the round (host only): generates and broadcasts the deck,
    /// then deals the first card to every joined player in one batch.
    ///
    /// # Errors
    /// [`GameError::NotHost`] on a follower, [`GameError::InvalidPhase`]
    /// once already playing, or a [`GameError::Deck`] for a bad order.
    /// Generation happens before anything is sent, so a failure leaves
    /// no peer half-started.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        if !self.config.is_host {
            return Err(GameError::NotHost);
        }
        if !self.phase.is_lobby() {
            return Err(GameError::InvalidPhase(self.phase));
        }

        let deck = Deck::generate(self.config.deck_order, &mut self.rng)?;
        tracing::info!(
            order = self.config.deck_order,
            cards = deck.len(),
            "deck generated"
        );

        self.transport.stop_advertising();
        self.transport
            .send_structured(Recipient::All, &StructuredMessage::StartGame);
        self.phase = GamePhase::Playing;
        if let Some(observer) = self.waiting_room.as_deref_mut() {
            observer.game_view_requested();
        }

        self.transport.broadcast_deck(&deck);
        self.deck = Some(deck);

        let first_draw: Vec<PlayerId> = self
            .scoreboard
            .players()
            .iter()
            .filter(|p| p.joined)
            .map(|p| p.id)
            .collect();
        self.issue_cards_batch(&first_draw);
        Ok(())
    }

    /// Local-optimistic answer check: does `answer` appear on both the
    /// table card and the local hand card?
    ///
    /// On a match a `ClickAttempt` claim is broadcast (and, on the
    /// host, adjudicated immediately) and `true` is returned. A miss is
    /// a logged no-op — nothing is sent, final say stays with the host.
    pub fn check_answer(&mut self, answer: u16) -> bool {
        let matched = match &self.deck {
            None => {
                tracing::warn!(answer, "answer checked before a deck is present");
                return false;
            }
            Some(deck) => {
                let table = deck.get(self.current_deck_card);
                let hand = deck.get(self.current_player_card);
                match (table, hand) {
                    (Some(table), Some(hand)) => {
                        table.contains(answer) && hand.contains(answer)
                    }
                    _ => false,
                }
            }
        };
        if !matched {
            tracing::debug!(answer, "wrong answer, blocked locally");
            return false;
        }

        let claim = RoundMessage::ClickAttempt {
            deck_card: self.current_deck_card,
            player: self.my_game_id,
        };
        self.transport.send_round(&claim);
        tracing::debug!(answer, table = self.current_deck_card, "match, claim sent");

        if self.config.is_host {
            // Own broadcasts are not looped back.
            self.handle_click(self.current_deck_card, self.my_game_id);
        }
        true
    }

    // -- Inbound dispatch ---------------------------------------------------

    /// Feeds one transport delivery into the state machine.
    ///
    /// Never fails: malformed frames, stale claims, and unknown-peer
    /// references are logged and dropped here, exactly once.
    pub fn deliver(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Structured { sender, message } => {
                self.on_structured(sender, message);
            }
            Inbound::Binary(frame) => self.on_binary(&frame),
            Inbound::Deck(deck) => self.on_deck_received(deck),
            Inbound::PeerJoined { name, identity } => {
                self.on_peer_joined(&name, identity);
            }
            Inbound::PeerLeft(identity) => self.on_peer_left(identity),
        }
    }

    fn on_peer_joined(&mut self, name: &str, identity: PeerId) {
        if let Some(new_id) = self.scoreboard.add_player(name, identity) {
            if self.config.is_host {
                self.transport.send_structured(
                    Recipient::Peer(identity),
                    &StructuredMessage::PlayerIdAssigned { id: new_id },
                );
            }
        }
        self.broadcast_roster();
    }

    fn on_peer_left(&mut self, identity: PeerId) {
        if self.scoreboard.remove_player(identity).is_none() {
            tracing::debug!(%identity, "departure of unknown peer ignored");
            return;
        }
        self.broadcast_roster();

        if self.host_identity == Some(identity) {
            tracing::warn!(%identity, "host left, closing the session");
            self.host_identity = None;
            if let Some(observer) = self.waiting_room.as_deref_mut() {
                observer.waiting_room_closed();
            }
        }
    }

    fn on_structured(&mut self, sender: PeerId, message: StructuredMessage) {
        match message {
            StructuredMessage::PeerList { names } => {
                if let Some(observer) = self.waiting_room.as_deref_mut() {
                    observer.peer_list_changed(&names);
                }
            }
            StructuredMessage::PlayerIdAssigned { id } => {
                tracing::info!(%sender, %id, "game id assigned by host");
                self.my_game_id = id;
                // Only the host assigns ids, so the sender is the host.
                self.host_identity = Some(sender);
            }
            StructuredMessage::JoinGame { identity } => {
                if !self.scoreboard.player_is_joining(identity) {
                    tracing::warn!(%identity, "join from unknown peer dropped");
                    return;
                }
                if self.config.is_host {
                    self.try_start();
                }
            }
            StructuredMessage::StartGame => {
                if !self.phase.is_lobby() {
                    tracing::debug!("duplicate StartGame ignored");
                    return;
                }
                self.phase = GamePhase::Playing;
                tracing::info!("game starting");
                if let Some(observer) = self.waiting_room.as_deref_mut() {
                    observer.game_view_requested();
                }
            }
            StructuredMessage::CardShown { card } => {
                self.current_player_card = card;
                self.notify_hand_card(card);
            }
            StructuredMessage::DeckAdvance { card } => {
                self.current_deck_card = card;
                self.notify_deck_card(card);
            }
        }
    }

    fn on_binary(&mut self, frame: &[u8]) {
        match RoundMessage::decode(frame) {
            Ok(RoundMessage::ClickAttempt { deck_card, player }) => {
                self.handle_click(deck_card, player);
            }
            Ok(RoundMessage::CardsBatch {
                next_deck_card,
                records,
                ..
            }) => {
                self.apply_cards_batch(next_deck_card, &records);
            }
            Err(error) => {
                tracing::warn!(%error, len = frame.len(), "malformed frame dropped");
            }
        }
    }

    fn on_deck_received(&mut self, deck: Deck) {
        tracing::info!(cards = deck.len(), "deck received from host");
        self.deck = Some(deck);
    }

    // -- Round mechanics ----------------------------------------------------

    /// Adjudicates a claim (host only). First valid claim wins: the
    /// claimed table index must still be the current one, and the
    /// claimant must be on the roster. Everything else is a no-op.
    fn handle_click(&mut self, deck_card: u8, player: PlayerId) {
        if !self.config.is_host {
            tracing::trace!(%player, "claim ignored, this device is not the host");
            return;
        }
        if deck_card != self.current_deck_card {
            tracing::debug!(
                %player,
                claimed = deck_card,
                table = self.current_deck_card,
                "stale claim dropped"
            );
            return;
        }
        if self.scoreboard.player_by_id(player).is_none() {
            tracing::warn!(%player, "claim from unknown player dropped");
            return;
        }
        tracing::info!(%player, table = deck_card, "claim accepted");
        self.issue_cards_batch(&[player]);
    }

    /// Deals the next deck card to each listed player (roster order,
    /// one card each), broadcasts the resulting ledger, and applies it
    /// locally.
    fn issue_cards_batch(&mut self, draw_for: &[PlayerId]) {
        let deck_len = match &self.deck {
            Some(deck) => deck.len(),
            None => {
                tracing::warn!("cannot issue cards without a deck");
                return;
            }
        };

        for player in self.scoreboard.players_mut() {
            if !draw_for.contains(&player.id) {
                continue;
            }
            if usize::from(self.current_card) >= deck_len {
                tracing::info!(player = %player.id, "deck exhausted, nothing to deal");
                break;
            }
            player.draw_card(self.current_card);
            self.current_card += 1;
        }

        let remaining = deck_len.saturating_sub(usize::from(self.current_card));
        let records: Vec<PlayerRecord> = self
            .scoreboard
            .players()
            .iter()
            .filter_map(|p| {
                let last_card = p.last_card()?;
                Some(PlayerRecord {
                    player: p.id,
                    last_card,
                    cards_held: p.cards_held().min(usize::from(u8::MAX)) as u8,
                })
            })
            .collect();

        let message = RoundMessage::CardsBatch {
            next_deck_card: self.current_card,
            remaining: remaining.min(usize::from(u8::MAX)) as u8,
            records,
        };
        self.transport.send_round(&message);

        if let RoundMessage::CardsBatch {
            next_deck_card,
            records,
            ..
        } = message
        {
            self.apply_cards_batch(next_deck_card, &records);
        }
    }

    /// Mirrors a ledger broadcast into the local cursors and views.
    fn apply_cards_batch(&mut self, next_deck_card: u8, records: &[PlayerRecord]) {
        // The table card doubles as the host's next unissued index, so
        // this keeps every follower's draw cursor in step with the
        // host's (on the host itself the two are already equal).
        self.current_card = next_deck_card;
        self.current_deck_card = next_deck_card;
        self.notify_deck_card(next_deck_card);

        if let Some(record) =
            records.iter().find(|r| r.player == self.my_game_id)
        {
            self.current_player_card = record.last_card;
            self.notify_hand_card(record.last_card);
        }
    }

    /// Starts the game if the lobby is complete. Host only; callers
    /// guarantee that.
    fn try_start(&mut self) {
        if !self.phase.is_lobby() || !self.scoreboard.has_everybody_joined() {
            return;
        }
        if let Err(error) = self.start_game() {
            tracing::error!(%error, "failed to start game");
        }
    }

    fn broadcast_roster(&mut self) {
        let names = self.scoreboard.names();
        self.transport.send_structured(
            Recipient::All,
            &StructuredMessage::PeerList {
                names: names.clone(),
            },
        );
        if let Some(observer) = self.waiting_room.as_deref_mut() {
            observer.peer_list_changed(&names);
        }
    }

    fn notify_deck_card(&mut self, index: u8) {
        let card = self.deck.as_ref().and_then(|deck| deck.get(index));
        match (card, self.deck_observer.as_deref_mut()) {
            (Some(card), Some(observer)) => observer.deck_card_changed(card),
            (None, _) => {
                tracing::debug!(index, "no table card to show at this index");
            }
            _ => {}
        }
    }

    fn notify_hand_card(&mut self, index: u8) {
        let card = self.deck.as_ref().and_then(|deck| deck.get(index));
        match (card, self.deck_observer.as_deref_mut()) {
            (Some(card), Some(observer)) => observer.hand_card_changed(card),
            (None, _) => {
                tracing::debug!(index, "no hand card to show at this index");
            }
            _ => {}
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current session phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether this device hosts the session.
    pub fn is_host(&self) -> bool {
        self.config.is_host
    }

    /// The id the host assigned to this device.
    pub fn my_game_id(&self) -> PlayerId {
        self.my_game_id
    }

    /// Next unissued deck index.
    pub fn current_card(&self) -> u8 {
        self.current_card
    }

    /// Deck index of the shared table card.
    pub fn current_deck_card(&self) -> u8 {
        self.current_deck_card
    }

    /// Deck index of the local hand card.
    pub fn current_player_card(&self) -> u8 {
        self.current_player_card
    }

    /// The roster as this device sees it.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// The session deck, once present.
    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    /// The transport handle (mainly for tests and demos).
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

// =========================================================================
// Tests
// =========================================================================
