//! The [`Card`] type: an identity-less set of symbol ids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One playing card: a set of symbol identifiers.
///
/// Cards have no identity of their own — two cards with the same symbol
/// set compare equal. Within one generated deck, any two distinct cards
/// intersect in exactly one symbol. Immutable after creation.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Card {
    symbols: BTreeSet<u16>,
}

impl Card {
    /// Creates a card from the given symbols. Duplicates collapse.
    pub fn new(symbols: impl IntoIterator<Item = u16>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Returns `true` if the card shows this symbol.
    pub fn contains(&self, symbol: u16) -> bool {
        self.symbols.contains(&symbol)
    }

    /// The symbol this card shares with `other`, if there is exactly
    /// one. For two distinct cards of a well-formed deck this is always
    /// `Some`; for anything else it returns `None` rather than guessing.
    pub fn shared_symbol(&self, other: &Card) -> Option<u16> {
        let mut common = self.symbols.intersection(&other.symbols);
        let first = common.next().copied()?;
        match common.next() {
            None => Some(first),
            Some(_) => None,
        }
    }

    /// Iterates the card's symbols in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = u16> + '_ {
        self.symbols.iter().copied()
    }

    /// Number of symbols on the card.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the card shows no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
