//! Wire protocol for Snapdeck.
//!
//! This crate defines the "language" peers speak to each other:
//!
//! - **Types** ([`Event`], [`StructuredMessage`], [`PeerId`],
//!   [`PlayerId`], [`Recipient`]) — the message structures and
//!   identities that appear on the wire.
//! - **Frames** ([`RoundMessage`], [`PlayerRecord`]) — the packed
//!   binary encoding used for high-frequency round events.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw bytes) and the
//! game state machine. It knows nothing about rosters, decks, or turn
//! order — only how messages are shaped and serialized.
//!
//! ```text
//! Transport (bytes) → Protocol (typed message) → GameManager
//! ```

mod error;
mod frame;
mod types;

pub use error::ProtocolError;
pub use frame::{PlayerRecord, RoundMessage};
pub use types::{Event, PeerId, PlayerId, Recipient, StructuredMessage};
