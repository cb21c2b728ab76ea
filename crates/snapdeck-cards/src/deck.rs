//! Deck construction and shuffling.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Card, DeckError};

/// Largest order whose deck (p² + p + 1 cards) still fits the
/// single-byte card indices used by the round frames.
const MAX_ORDER: u8 = 15;

/// The full ordered card sequence for one session.
///
/// Built once by the host at game start, shuffled once, then only ever
/// indexed — the permutation is the sole source of per-game variation
/// for a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Generates a shuffled deck of the given order.
    ///
    /// The construction is deterministic; the injected `rng` drives only
    /// the final unbiased permutation, so tests can seed it for
    /// reproducible decks.
    ///
    /// # Errors
    /// [`DeckError::InvalidOrder`] for `order < 2`,
    /// [`DeckError::OrderTooLarge`] for `order > 15`. The construction
    /// itself additionally assumes `order` behaves like a prime; for
    /// composite orders some card pairs will share more than one symbol.
    pub fn generate(order: u8, rng: &mut impl Rng) -> Result<Self, DeckError> {
        let mut cards = projective_plane(order)?;
        cards.shuffle(rng);
        Ok(Self { cards })
    }

    /// Wraps an already-ordered card sequence, e.g. one received from
    /// the host's deck broadcast.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// The card at a wire index.
    pub fn get(&self, index: u8) -> Option<&Card> {
        self.cards.get(usize::from(index))
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the deck holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The full card sequence in deck order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// Builds the deterministic, unshuffled projective-plane card sequence
/// for order `p`: `p² + p + 1` cards of `p + 1` symbols each, every two
/// distinct cards sharing exactly one symbol.
///
/// Layout of the symbol space:
/// - symbols `0 .. p²` are the "grid" symbols,
/// - symbol `p²` marks the row class,
/// - symbols `p² + 1 ..= p² + p` mark the slope classes.
///
/// # Errors
/// Same bounds as [`Deck::generate`].
pub fn projective_plane(p: u8) -> Result<Vec<Card>, DeckError> {
    if p < 2 {
        return Err(DeckError::InvalidOrder(p));
    }
    if p > MAX_ORDER {
        return Err(DeckError::OrderTooLarge(p));
    }

    let p = u16::from(p);
    let mut cards = Vec::with_capacity(usize::from(p * p + p + 1));

    // Row cards: one per row of the grid, all tagged with the row-class
    // symbol p².
    for i in 0..p {
        let symbols = (0..p).map(|j| i * p + j).chain([p * p]);
        cards.push(Card::new(symbols));
    }

    // Line cards: one per (slope, offset) pair, each tagged with its
    // slope-class symbol p² + 1 + i.
    for i in 0..p {
        for j in 0..p {
            let symbols =
                (0..p).map(|k| k * p + (j + i * k) % p).chain([p * p + 1 + i]);
            cards.push(Card::new(symbols));
        }
    }

    // The card of all p + 1 class symbols ties the rows and slopes
    // together.
    cards.push(Card::new((0..=p).map(|i| p * p + i)));

    Ok(cards)
}

// =========================================================================
// Tests
// =========================================================================
