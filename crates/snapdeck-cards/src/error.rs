//! Error types for deck generation.

/// Errors that can occur while generating a deck.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// The requested order is too small — below 2 the construction
    /// degenerates into empty and duplicate cards.
    #[error("deck order {0} is invalid: must be at least 2")]
    InvalidOrder(u8),

    /// The requested order would produce a deck too large to address
    /// with the single-byte card indices of the round frames
    /// (order 15 → 241 cards; order 16 would need 273).
    #[error("deck order {0} is too large: card indices must fit in a byte")]
    OrderTooLarge(u8),
}
