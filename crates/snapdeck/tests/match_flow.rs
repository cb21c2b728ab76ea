//! End-to-end session flows: several managers wired over the in-memory
//! transport, deliveries pumped until the network is quiet.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedReceiver;

use snapdeck::{
    Card, DeckObserver, GameConfig, GameManager, Inbound, MemoryEndpoint,
    MemoryHub, PeerId, PlayerId, WaitingRoomObserver,
};

// =========================================================================
// Harness
// =========================================================================

struct Peer {
    manager: GameManager<MemoryEndpoint>,
    inbox: UnboundedReceiver<Inbound>,
}

fn spawn_peer(hub: &MemoryHub, name: &str, identity: u64, host: bool) -> Peer {
    let (endpoint, inbox) = hub.attach(name, PeerId(identity));
    let base = if host {
        GameConfig::host(name)
    } else {
        GameConfig::new(name)
    };
    let config = GameConfig {
        deck_order: 3,
        shuffle_seed: Some(99),
        ..base
    };
    Peer {
        manager: GameManager::new(endpoint, config),
        inbox,
    }
}

/// Drains every inbox into its manager, repeating until a full pass
/// delivers nothing. Deliveries triggered by deliveries (the host
/// reacting to a claim, followers reacting to the batch) settle within
/// one call.
fn pump(peers: &mut [Peer]) {
    loop {
        let mut delivered = false;
        for peer in peers.iter_mut() {
            while let Ok(inbound) = peer.inbox.try_recv() {
                peer.manager.deliver(inbound);
                delivered = true;
            }
        }
        if !delivered {
            break;
        }
    }
}

/// Host "alice" plus followers "bob" and "carol", lobby completed and
/// the order-3 match started: 13 cards, first deal done.
fn started_match() -> (MemoryHub, Vec<Peer>) {
    let hub = MemoryHub::new();
    let mut peers = vec![
        spawn_peer(&hub, "alice", 1, true),
        spawn_peer(&hub, "bob", 2, false),
        spawn_peer(&hub, "carol", 3, false),
    ];
    pump(&mut peers);
    for peer in peers.iter_mut() {
        peer.manager.join_game();
    }
    pump(&mut peers);
    assert!(
        peers.iter().all(|p| p.manager.phase().is_playing()),
        "the lobby should have completed"
    );
    (hub, peers)
}

/// The symbol shared between this peer's table card and hand card, as
/// that peer sees them.
fn matching_symbol(peer: &Peer) -> u16 {
    let deck = peer.manager.deck().expect("deck is present once playing");
    let table = deck.get(peer.manager.current_deck_card()).unwrap();
    let hand = deck.get(peer.manager.current_player_card()).unwrap();
    table
        .shared_symbol(hand)
        .expect("any two deck cards share exactly one symbol")
}

fn draw_history(peer: &Peer, id: u8) -> Vec<u8> {
    peer.manager
        .scoreboard()
        .player_by_id(PlayerId(id))
        .map(|p| p.cards().to_vec())
        .unwrap_or_default()
}

#[derive(Clone, Default)]
struct ViewProbe {
    events: Arc<Mutex<Vec<String>>>,
}

impl ViewProbe {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl WaitingRoomObserver for ViewProbe {
    fn peer_list_changed(&mut self, names: &[String]) {
        self.events
            .lock()
            .unwrap()
            .push(format!("peers:{}", names.join(",")));
    }

    fn waiting_room_closed(&mut self) {
        self.events.lock().unwrap().push("closed".into());
    }

    fn game_view_requested(&mut self) {
        self.events.lock().unwrap().push("game".into());
    }
}

#[derive(Clone, Default)]
struct CardProbe {
    seen: Arc<Mutex<Vec<(&'static str, Card)>>>,
}

impl CardProbe {
    fn seen(&self) -> Vec<(&'static str, Card)> {
        self.seen.lock().unwrap().clone()
    }
}

impl DeckObserver for CardProbe {
    fn deck_card_changed(&mut self, card: &Card) {
        self.seen.lock().unwrap().push(("table", card.clone()));
    }

    fn hand_card_changed(&mut self, card: &Card) {
        self.seen.lock().unwrap().push(("hand", card.clone()));
    }
}

// =========================================================================
// Lobby
// =========================================================================

#[test]
fn test_lobby_assigns_ids_in_admission_order() {
    let hub = MemoryHub::new();
    let mut peers = vec![
        spawn_peer(&hub, "alice", 1, true),
        spawn_peer(&hub, "bob", 2, false),
        spawn_peer(&hub, "carol", 3, false),
    ];
    pump(&mut peers);

    assert_eq!(peers[0].manager.my_game_id(), PlayerId(0));
    assert_eq!(peers[1].manager.my_game_id(), PlayerId(1));
    assert_eq!(peers[2].manager.my_game_id(), PlayerId(2));

    // Everyone converged on the full three-player roster.
    for peer in &peers {
        assert_eq!(peer.manager.scoreboard().len(), 3);
        assert!(peer.manager.phase().is_lobby());
    }
}

#[test]
fn test_game_does_not_start_until_everyone_joined() {
    let hub = MemoryHub::new();
    let mut peers = vec![
        spawn_peer(&hub, "alice", 1, true),
        spawn_peer(&hub, "bob", 2, false),
    ];
    pump(&mut peers);

    peers[0].manager.join_game();
    pump(&mut peers);
    assert!(peers[0].manager.phase().is_lobby());
    assert!(peers[1].manager.phase().is_lobby());

    peers[1].manager.join_game();
    pump(&mut peers);
    assert!(peers[0].manager.phase().is_playing());
    assert!(peers[1].manager.phase().is_playing());
}

#[test]
fn test_waiting_room_observer_sees_roster_then_game() {
    let hub = MemoryHub::new();
    let mut peers = vec![
        spawn_peer(&hub, "alice", 1, true),
        spawn_peer(&hub, "bob", 2, false),
    ];
    let probe = ViewProbe::default();
    peers[1].manager.set_waiting_room_observer(Box::new(probe.clone()));
    pump(&mut peers);

    for peer in peers.iter_mut() {
        peer.manager.join_game();
    }
    pump(&mut peers);

    let events = probe.events();
    assert!(events.iter().any(|e| e.starts_with("peers:")));
    assert_eq!(events.last().map(String::as_str), Some("game"));
    assert!(!events.contains(&"closed".to_string()));
}

// =========================================================================
// Round start
// =========================================================================

#[test]
fn test_start_deals_one_card_to_every_player() {
    let (_hub, peers) = started_match();

    // Identical decks everywhere.
    assert_eq!(peers[0].manager.deck().unwrap().len(), 13);
    assert_eq!(peers[0].manager.deck(), peers[1].manager.deck());
    assert_eq!(peers[0].manager.deck(), peers[2].manager.deck());

    // Three players drew indices 0, 1, 2; the table card is index 3,
    // and every peer mirrors the host's draw cursor.
    for peer in &peers {
        assert_eq!(peer.manager.current_deck_card(), 3);
        assert_eq!(peer.manager.current_card(), 3);
    }
    assert_eq!(peers[0].manager.current_player_card(), 0);
    assert_eq!(peers[1].manager.current_player_card(), 1);
    assert_eq!(peers[2].manager.current_player_card(), 2);

    // The host's ledger shows one card per player.
    for id in 0..3 {
        assert_eq!(draw_history(&peers[0], id), vec![id]);
    }
}

#[test]
fn test_deck_observer_shows_table_and_hand_at_start() {
    let hub = MemoryHub::new();
    let mut peers = vec![
        spawn_peer(&hub, "alice", 1, true),
        spawn_peer(&hub, "bob", 2, false),
    ];
    let probe = CardProbe::default();
    peers[1].manager.set_deck_observer(Box::new(probe.clone()));
    pump(&mut peers);
    for peer in peers.iter_mut() {
        peer.manager.join_game();
    }
    pump(&mut peers);

    let deck = peers[1].manager.deck().unwrap().clone();
    let seen = probe.seen();
    // Two players drew 0 and 1; the table card is index 2.
    assert!(seen.contains(&("table", deck.get(2).unwrap().clone())));
    assert!(seen.contains(&("hand", deck.get(1).unwrap().clone())));
}

// =========================================================================
// Claims
// =========================================================================

#[test]
fn test_accepted_claim_advances_every_peer() {
    let (_hub, mut peers) = started_match();

    let answer = matching_symbol(&peers[1]);
    assert!(peers[1].manager.check_answer(answer));
    pump(&mut peers);

    for peer in &peers {
        assert_eq!(peer.manager.current_deck_card(), 4);
    }
    // Bob drew the old table card; his hand follows it everywhere the
    // ledger is mirrored.
    assert_eq!(draw_history(&peers[0], 1), vec![1, 3]);
    assert_eq!(peers[1].manager.current_player_card(), 3);
    // Nobody else drew.
    assert_eq!(draw_history(&peers[0], 0), vec![0]);
    assert_eq!(draw_history(&peers[0], 2), vec![2]);
}

#[test]
fn test_simultaneous_claims_first_arrival_wins() {
    let (_hub, mut peers) = started_match();

    // Bob and carol both spot their match before either hears about
    // the other's claim. Bob's reaches the host first.
    let bob_answer = matching_symbol(&peers[1]);
    let carol_answer = matching_symbol(&peers[2]);
    assert!(peers[1].manager.check_answer(bob_answer));
    assert!(peers[2].manager.check_answer(carol_answer));
    pump(&mut peers);

    assert_eq!(draw_history(&peers[0], 1).len(), 2, "winner drew a card");
    assert_eq!(draw_history(&peers[0], 2).len(), 1, "loser drew nothing");
    for peer in &peers {
        assert_eq!(peer.manager.current_deck_card(), 4, "one advance only");
    }
}

#[test]
fn test_wrong_answer_never_leaves_the_device() {
    let (_hub, mut peers) = started_match();

    // The one shared symbol is excluded, so any other probe is wrong;
    // symbol 9999 is on no card at all.
    assert!(!peers[1].manager.check_answer(9999));
    pump(&mut peers);

    for peer in &peers {
        assert_eq!(peer.manager.current_deck_card(), 3, "nothing advanced");
    }
}

#[test]
fn test_host_can_win_its_own_table_card() {
    let (_hub, mut peers) = started_match();

    let answer = matching_symbol(&peers[0]);
    assert!(peers[0].manager.check_answer(answer));
    pump(&mut peers);

    assert_eq!(draw_history(&peers[0], 0), vec![0, 3]);
    for peer in &peers {
        assert_eq!(peer.manager.current_deck_card(), 4);
    }
}

// =========================================================================
// Departures
// =========================================================================

#[test]
fn test_departed_player_vanishes_from_the_ledger() {
    let (hub, mut peers) = started_match();

    let carol = peers.remove(2);
    hub.detach(PeerId(3));
    drop(carol);
    pump(&mut peers);

    assert_eq!(peers[0].manager.scoreboard().len(), 2);

    // The round carries on for the survivors.
    let answer = matching_symbol(&peers[1]);
    assert!(peers[1].manager.check_answer(answer));
    pump(&mut peers);

    assert_eq!(draw_history(&peers[0], 1), vec![1, 3]);
    assert!(
        peers[0]
            .manager
            .scoreboard()
            .player_by_id(PlayerId(2))
            .is_none(),
        "carol is gone from the roster"
    );
    assert_eq!(peers[0].manager.current_deck_card(), 4);
    assert_eq!(peers[1].manager.current_deck_card(), 4);
}

#[test]
fn test_host_loss_closes_the_waiting_room() {
    let hub = MemoryHub::new();
    let mut peers = vec![
        spawn_peer(&hub, "alice", 1, true),
        spawn_peer(&hub, "bob", 2, false),
    ];
    let probe = ViewProbe::default();
    peers[1].manager.set_waiting_room_observer(Box::new(probe.clone()));
    pump(&mut peers); // bob learns the host from his id assignment

    let host = peers.remove(0);
    hub.detach(PeerId(1));
    drop(host);
    pump(&mut peers);

    assert!(probe.events().contains(&"closed".to_string()));
}

#[test]
fn test_follower_loss_does_not_close_the_waiting_room() {
    let hub = MemoryHub::new();
    let mut peers = vec![
        spawn_peer(&hub, "alice", 1, true),
        spawn_peer(&hub, "bob", 2, false),
        spawn_peer(&hub, "carol", 3, false),
    ];
    let probe = ViewProbe::default();
    peers[1].manager.set_waiting_room_observer(Box::new(probe.clone()));
    pump(&mut peers);

    let carol = peers.remove(2);
    hub.detach(PeerId(3));
    drop(carol);
    pump(&mut peers);

    assert!(!probe.events().contains(&"closed".to_string()));
    assert_eq!(peers[1].manager.scoreboard().len(), 2);
}
