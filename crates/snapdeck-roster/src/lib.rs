//! Player records and the scoreboard roster.
//!
//! The [`Scoreboard`] owns the authoritative list of players for a
//! session: who they are, whether they have joined, and which deck
//! indices they have drawn so far.
//!
//! # Concurrency note
//!
//! `Scoreboard` is deliberately not thread-safe. All protocol state is
//! owned by one logical processing context per device and mutated only
//! from sequential inbound-message handling, so a plain `Vec` with no
//! locking is correct here.

mod player;
mod scoreboard;

pub use player::Player;
pub use scoreboard::Scoreboard;
