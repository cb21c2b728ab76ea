//! Card and deck types for Snapdeck, plus the deck generator.
//!
//! A deck is built with a finite-projective-plane construction: for a
//! prime order `p` it yields `p² + p + 1` cards of `p + 1` symbols each,
//! with the property the whole game rests on — **any two distinct cards
//! share exactly one symbol**. The host generates the deck once, shuffles
//! it once, and ships the permuted sequence verbatim to every peer, so
//! all devices index the identical ordering for the whole session.

mod card;
mod deck;
mod error;

pub use card::Card;
pub use deck::{projective_plane, Deck};
pub use error::DeckError;
