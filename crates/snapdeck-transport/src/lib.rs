//! Transport abstraction layer for Snapdeck.
//!
//! The game core never talks to the network directly; it drives a
//! [`PeerTransport`] for outbound traffic and consumes [`Inbound`]
//! deliveries for everything that arrives. Discovery, connection
//! establishment, and actual byte delivery are the transport's problem.
//!
//! # Delivery contract
//!
//! Implementations must guarantee:
//! - sends are fire-and-forget: the core never awaits delivery,
//! - broadcasts are **not** delivered back to the sender,
//! - messages from one sender arrive in the order they were sent
//!   (no ordering guarantee across different senders),
//! - inbound deliveries are handed to the core one at a time, never
//!   concurrently.

mod memory;

pub use memory::{MemoryEndpoint, MemoryHub};

use snapdeck_cards::Deck;
use snapdeck_protocol::{PeerId, Recipient, RoundMessage, StructuredMessage};

/// Everything a transport can deliver into the game core.
///
/// Structured deliveries carry the sender's identity — a transport
/// always knows which connection a message came in on, and the core
/// uses it to learn who the host is.
#[derive(Debug, Clone)]
pub enum Inbound {
    /// A decoded lobby-phase message.
    Structured {
        sender: PeerId,
        message: StructuredMessage,
    },
    /// A raw in-round binary frame, not yet validated.
    Binary(Vec<u8>),
    /// The host's full deck payload.
    Deck(Deck),
    /// The transport discovered a peer.
    PeerJoined { name: String, identity: PeerId },
    /// The transport lost a peer.
    PeerLeft(PeerId),
}

/// Outbound interface the game core requires from a transport.
pub trait PeerTransport {
    /// Sends a structured message; broadcast or unicast per `recipient`.
    fn send_structured(&self, recipient: Recipient, message: &StructuredMessage);

    /// Broadcasts an in-round binary frame to all peers.
    fn send_binary(&self, frame: &[u8]);

    /// Broadcasts the full generated deck to all peers, once per game.
    fn broadcast_deck(&self, deck: &Deck);

    /// This device's stable identity for the session.
    fn local_identity(&self) -> PeerId;

    /// Makes this device visible to joiners (host only).
    fn begin_hosting(&self);

    /// Stops advertising the session, typically at game start.
    fn stop_advertising(&self);

    /// Encodes and broadcasts a round message in one step.
    fn send_round(&self, message: &RoundMessage) {
        self.send_binary(&message.encode());
    }
}
