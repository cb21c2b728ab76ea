//! # Snapdeck
//!
//! Peer-synchronized core for a real-time card-matching game.
//!
//! Every device runs the same [`GameManager`] over a [`PeerTransport`];
//! one device is the host. The host generates a projective-plane deck
//! (any two cards share exactly one symbol), deals over the wire, and
//! adjudicates match claims; followers mirror its broadcasts. The UI
//! hangs off the [`DeckObserver`] and [`WaitingRoomObserver`] seams.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use snapdeck::{GameConfig, GameManager, MemoryHub, PeerId};
//!
//! let hub = MemoryHub::new();
//! let (endpoint, _inbox) = hub.attach("alice", PeerId(1));
//! let mut host = GameManager::new(endpoint, GameConfig::host("alice"));
//! host.join_game();
//! // feed `_inbox` deliveries into `host.deliver(..)` as they arrive
//! ```

mod config;
mod error;
mod manager;
mod observer;
mod phase;

pub use config::GameConfig;
pub use error::GameError;
pub use manager::GameManager;
pub use observer::{DeckObserver, WaitingRoomObserver};
pub use phase::GamePhase;

pub use snapdeck_cards::{Card, Deck, DeckError};
pub use snapdeck_protocol::{
    Event, PeerId, PlayerId, PlayerRecord, ProtocolError, Recipient,
    RoundMessage, StructuredMessage,
};
pub use snapdeck_roster::{Player, Scoreboard};
pub use snapdeck_transport::{Inbound, MemoryEndpoint, MemoryHub, PeerTransport};
