//! A full three-player match played by bots over the in-memory hub.
//!
//! Run with `RUST_LOG=info cargo run -p local-match` to watch the
//! protocol traffic. Each "turn" the bots race for the table card; the
//! winner is whoever first names the one symbol their hand card shares
//! with it.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use snapdeck::{
    GameConfig, GameManager, Inbound, MemoryEndpoint, MemoryHub, PeerId,
};

struct Seat {
    name: &'static str,
    manager: GameManager<MemoryEndpoint>,
    inbox: UnboundedReceiver<Inbound>,
}

/// Drains every inbox into its manager until the hub is quiet.
fn pump(seats: &mut [Seat]) {
    loop {
        let mut delivered = false;
        for seat in seats.iter_mut() {
            while let Ok(inbound) = seat.inbox.try_recv() {
                seat.manager.deliver(inbound);
                delivered = true;
            }
        }
        if !delivered {
            break;
        }
    }
}

/// What this seat would shout: the one symbol its hand card shares with
/// the table card, if both are visible.
fn spotted_symbol(seat: &Seat) -> Option<u16> {
    let deck = seat.manager.deck()?;
    let table = deck.get(seat.manager.current_deck_card())?;
    let hand = deck.get(seat.manager.current_player_card())?;
    table.shared_symbol(hand)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let hub = MemoryHub::new();
    let mut seats = Vec::new();
    for (index, name) in ["alice", "bob", "carol"].into_iter().enumerate() {
        let identity = PeerId(index as u64 + 1);
        let (endpoint, inbox) = hub.attach(name, identity);
        let config = GameConfig {
            deck_order: 3,
            ..if index == 0 {
                GameConfig::host(name)
            } else {
                GameConfig::new(name)
            }
        };
        seats.push(Seat {
            name,
            manager: GameManager::new(endpoint, config),
            inbox,
        });
    }
    pump(&mut seats);

    for seat in seats.iter_mut() {
        seat.manager.join_game();
    }
    pump(&mut seats);

    let deck_size = seats[0]
        .manager
        .deck()
        .map(snapdeck::Deck::len)
        .expect("the host generated a deck at game start");
    println!("match started: {deck_size} cards on the pile");

    // Race for the table card until the pile runs out. A rotating
    // head start keeps any one bot from sweeping the whole deck.
    let mut turn = 0usize;
    while usize::from(seats[0].manager.current_card()) < deck_size {
        let table_before = seats[0].manager.current_deck_card();
        for offset in 0..seats.len() {
            let racer = (turn + offset) % seats.len();
            let Some(symbol) = spotted_symbol(&seats[racer]) else {
                continue;
            };
            if seats[racer].manager.check_answer(symbol) {
                println!(
                    "card {table_before}: {} spotted symbol {symbol}",
                    seats[racer].name
                );
                break;
            }
        }
        pump(&mut seats);
        if seats[0].manager.current_deck_card() == table_before {
            // Nobody could claim the table card; the match is stuck.
            break;
        }
        turn += 1;
    }

    println!("pile exhausted, final score:");
    for player in seats[0].manager.scoreboard().players() {
        println!("  {:<8} {} cards", player.name, player.cards_held());
    }
    let winner = seats[0]
        .manager
        .scoreboard()
        .players()
        .iter()
        .max_by_key(|p| p.cards_held())
        .expect("the roster is never empty");
    println!("{} wins!", winner.name);
}
