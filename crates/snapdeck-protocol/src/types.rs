//! Core protocol types shared by both wire encodings.
//!
//! Snapdeck speaks two parallel formats over the same event vocabulary:
//! structured JSON messages for the lobby (variable payload shapes, low
//! rate) and packed binary frames for in-round events (fixed layout,
//! high rate). The [`Event`] codes here are stable across both.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A peer's transport identity: the stable hash the transport layer
/// assigns to a device for the lifetime of a session.
///
/// Distinct from [`PlayerId`]: a `PeerId` exists as soon as the transport
/// discovers the device, before the host has admitted it to the game.
///
/// `#[serde(transparent)]` keeps the JSON form a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// A player's game id, assigned by the host in admission order.
///
/// Deliberately a `u8`: it travels in single-byte fields of the binary
/// round frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who a structured message is addressed to.
///
/// Most lobby traffic is broadcast; the one exception is
/// [`StructuredMessage::PlayerIdAssigned`], which the host unicasts to
/// the peer it just admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connected peer except the sender.
    All,
    /// One specific peer.
    Peer(PeerId),
}

// ---------------------------------------------------------------------------
// Event codes
// ---------------------------------------------------------------------------

/// The closed set of protocol event kinds.
///
/// Codes are part of the wire format and must never be renumbered; the
/// gaps (4 and the unused low codes) are reserved by earlier protocol
/// revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Event {
    /// Legacy single-card path: the local player's hand card changed.
    CardShown = 1,
    /// A peer claims it matched a symbol on the current table card.
    ClickAttempt = 2,
    /// The host's full shuffled deck, sent once at game start.
    DeckPayload = 3,
    /// Legacy single-card path: the shared table card advanced.
    DeckAdvance = 5,
    /// The transport discovered a new peer.
    PeerJoined = 6,
    /// The transport lost a peer.
    PeerLeft = 7,
    /// Roster snapshot: the names of every known player, in join order.
    PeerList = 8,
    /// A peer announces it is ready to play.
    JoinGame = 9,
    /// The host declares the lobby complete; everyone enters the round.
    StartGame = 10,
    /// The host's id assignment for the receiving peer.
    PlayerIdAssigned = 11,
    /// A draw ledger update: table card plus one record per player.
    CardsBatch = 12,
}

impl Event {
    /// The stable wire code for this event.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Event {
    type Error = crate::ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::CardShown),
            2 => Ok(Self::ClickAttempt),
            3 => Ok(Self::DeckPayload),
            5 => Ok(Self::DeckAdvance),
            6 => Ok(Self::PeerJoined),
            7 => Ok(Self::PeerLeft),
            8 => Ok(Self::PeerList),
            9 => Ok(Self::JoinGame),
            10 => Ok(Self::StartGame),
            11 => Ok(Self::PlayerIdAssigned),
            12 => Ok(Self::CardsBatch),
            other => Err(crate::ProtocolError::UnknownEvent(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Structured messages (lobby phase)
// ---------------------------------------------------------------------------

/// A lobby-phase message, encoded as adjacently tagged JSON:
/// `{ "event": "PeerList", "data": { "names": [...] } }`.
///
/// One strongly typed variant per event — payloads are decoded exactly
/// once, at the transport boundary, never re-inspected as loose
/// key/value data further in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum StructuredMessage {
    /// Roster snapshot, broadcast on every roster change.
    PeerList { names: Vec<String> },

    /// Host → one peer: the game id assigned to it.
    PlayerIdAssigned { id: PlayerId },

    /// Any peer → all: "I'm ready". Carries the sender's transport
    /// identity so the host can flip the matching join flag.
    JoinGame { identity: PeerId },

    /// Host → all: lobby complete, present the game view.
    StartGame,

    /// Legacy single-card path: the receiver's hand card is now this
    /// deck index.
    CardShown { card: u8 },

    /// Legacy single-card path: the table card is now this deck index.
    DeckAdvance { card: u8 },
}

impl StructuredMessage {
    /// The stable event code shared with the binary encoding.
    pub fn event(&self) -> Event {
        match self {
            Self::PeerList { .. } => Event::PeerList,
            Self::PlayerIdAssigned { .. } => Event::PlayerIdAssigned,
            Self::JoinGame { .. } => Event::JoinGame,
            Self::StartGame => Event::StartGame,
            Self::CardShown { .. } => Event::CardShown,
            Self::DeckAdvance { .. } => Event::DeckAdvance,
        }
    }

    /// Serializes this message to its JSON wire form.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    ///
    /// [`ProtocolError::Encode`]: crate::ProtocolError::Encode
    pub fn encode(&self) -> Result<Vec<u8>, crate::ProtocolError> {
        serde_json::to_vec(self).map_err(crate::ProtocolError::Encode)
    }

    /// Parses a message from its JSON wire form.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] for malformed input or a
    /// payload that doesn't match its event tag.
    ///
    /// [`ProtocolError::Decode`]: crate::ProtocolError::Decode
    pub fn decode(data: &[u8]) -> Result<Self, crate::ProtocolError> {
        serde_json::from_slice(data).map_err(crate::ProtocolError::Decode)
    }
}

// =========================================================================
// Tests
// =========================================================================
